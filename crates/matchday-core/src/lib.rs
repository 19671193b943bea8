// Library root: tournament analytics over free-text match records.
//
// Pipeline: record (parse, filter) -> season (aggregate, rank) -> report.
// Every stage is a pure function over its inputs; `pipeline` wires them up.

pub mod config;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod season;

pub use record::{filter_matches, parse_match, FormatError, Match, MatchFilter};
pub use report::{generate_report, AnalyticsReport, Upset};
pub use season::{
    aggregate, rank_teams, rank_teams_default, Standing, TeamStats, TeamStatsTable,
    TiebreakCriterion, TiebreakOrder,
};
