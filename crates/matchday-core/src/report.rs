// Season summary report: leaders, records, upsets and distributions.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::record::Match;
use crate::season::{Standing, TeamStatsTable};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A decisive match won by the lower-ranked side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upset {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub winner_rank: usize,
    pub loser_rank: usize,
}

impl Upset {
    /// How many places separate the winner from the loser.
    pub fn rank_gap(&self) -> usize {
        self.winner_rank.abs_diff(self.loser_rank)
    }
}

/// Summary analytics for one season.
///
/// `Default` is the empty report returned for empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub tournament_leader: Option<String>,
    pub most_goals_match: Option<Match>,
    pub highest_attendance_match: Option<Match>,
    pub most_efficient_team: Option<String>,
    pub biggest_upset: Option<Upset>,
    /// Total goals in a match -> number of matches with that total.
    pub goal_distribution: BTreeMap<u64, usize>,
    /// Team -> average attendance, ordered by team name.
    pub attendance_by_team: BTreeMap<String, f64>,
}

impl AnalyticsReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Build the report from the season's matches, statistics and standings.
///
/// Returns the empty report if any input is empty. All "largest" picks keep
/// the first candidate found: input order for matches, table order for teams.
pub fn generate_report(
    matches: &[Match],
    stats: &TeamStatsTable,
    standings: &[Standing],
) -> AnalyticsReport {
    if matches.is_empty() || stats.is_empty() || standings.is_empty() {
        return AnalyticsReport::default();
    }

    AnalyticsReport {
        tournament_leader: tournament_leader(standings),
        most_goals_match: first_max_by_key(matches, Match::total_goals).cloned(),
        highest_attendance_match: first_max_by_key(matches, |m| u64::from(m.attendance()))
            .cloned(),
        most_efficient_team: most_efficient_team(stats),
        biggest_upset: biggest_upset(matches, standings),
        goal_distribution: goal_distribution(matches),
        attendance_by_team: stats
            .iter()
            .map(|s| (s.team().to_string(), s.avg_attendance()))
            .collect(),
    }
}

/// The rank-1 team; alphabetically first if several share rank 1.
fn tournament_leader(standings: &[Standing]) -> Option<String> {
    standings
        .iter()
        .min_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.team.cmp(&b.team)))
        .map(|s| s.team.clone())
}

/// Like `Iterator::max_by_key`, but the first maximal element wins.
fn first_max_by_key<F>(matches: &[Match], key: F) -> Option<&Match>
where
    F: Fn(&Match) -> u64,
{
    let mut best: Option<(&Match, u64)> = None;
    for m in matches {
        let value = key(m);
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((m, value));
        }
    }
    best.map(|(m, _)| m)
}

/// Highest points per match (2-decimal precision), first in table order on a tie.
fn most_efficient_team(stats: &TeamStatsTable) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for team in stats {
        let efficiency = team.points_per_match();
        if best.map_or(true, |(_, top)| efficiency > top) {
            best = Some((team.team(), efficiency));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// The decisive match with the widest rank gap where the winner was ranked
/// below the loser. Draws and teams missing from the standings are skipped.
fn biggest_upset(matches: &[Match], standings: &[Standing]) -> Option<Upset> {
    let mut ranks: HashMap<&str, usize> = HashMap::new();
    for s in standings {
        ranks.entry(s.team.as_str()).or_insert(s.rank);
    }

    let mut best: Option<Upset> = None;
    for m in matches {
        let (Some(winner), Some(loser)) = (m.winner(), m.loser()) else {
            continue;
        };
        let (Some(&winner_rank), Some(&loser_rank)) = (ranks.get(winner), ranks.get(loser))
        else {
            continue;
        };
        if winner_rank <= loser_rank {
            continue;
        }
        let gap = winner_rank - loser_rank;
        if best.as_ref().map_or(true, |b| gap > b.rank_gap()) {
            best = Some(Upset {
                fixture: m.clone(),
                winner_rank,
                loser_rank,
            });
        }
    }
    best
}

fn goal_distribution(matches: &[Match]) -> BTreeMap<u64, usize> {
    let mut dist = BTreeMap::new();
    for m in matches {
        *dist.entry(m.total_goals()).or_insert(0) += 1;
    }
    dist
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
