// Season aggregation: per-team statistics and the standings table.

pub mod standings;
pub mod stats;

pub use standings::{rank_teams, rank_teams_default, Standing, TiebreakCriterion, TiebreakOrder};
pub use stats::{aggregate, Outcome, TeamStats, TeamStatsTable};
