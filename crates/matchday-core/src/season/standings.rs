// Standings table: tiebreak cascade and competition ("1224") ranking.

use serde::{Deserialize, Serialize};

use super::stats::{TeamStats, TeamStatsTable};

// ---------------------------------------------------------------------------
// Tiebreak criteria
// ---------------------------------------------------------------------------

/// A statistic teams are compared on, higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiebreakCriterion {
    Points,
    GoalDiff,
    GoalsFor,
    Wins,
}

/// Points, then goal difference, then goals scored.
pub const DEFAULT_TIEBREAKERS: [TiebreakCriterion; 3] = [
    TiebreakCriterion::Points,
    TiebreakCriterion::GoalDiff,
    TiebreakCriterion::GoalsFor,
];

impl TiebreakCriterion {
    /// Parse a config key (`points`, `goal_diff`, `goals_for`, `wins`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "points" => Some(TiebreakCriterion::Points),
            "goal_diff" => Some(TiebreakCriterion::GoalDiff),
            "goals_for" => Some(TiebreakCriterion::GoalsFor),
            "wins" => Some(TiebreakCriterion::Wins),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TiebreakCriterion::Points => "points",
            TiebreakCriterion::GoalDiff => "goal_diff",
            TiebreakCriterion::GoalsFor => "goals_for",
            TiebreakCriterion::Wins => "wins",
        }
    }

    pub fn value(self, stats: &TeamStats) -> i64 {
        match self {
            TiebreakCriterion::Points => i64::from(stats.points()),
            TiebreakCriterion::GoalDiff => stats.goal_diff(),
            TiebreakCriterion::GoalsFor => stats.goals_for() as i64,
            TiebreakCriterion::Wins => i64::from(stats.wins()),
        }
    }
}

/// Ordered, never-empty list of tiebreak criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TiebreakOrder(Vec<TiebreakCriterion>);

impl TiebreakOrder {
    /// Use `criteria` as given; an empty list means the default order.
    pub fn new(criteria: Vec<TiebreakCriterion>) -> Self {
        if criteria.is_empty() {
            return Self::default();
        }
        TiebreakOrder(criteria)
    }

    /// Build from config keys. Unknown keys are skipped; if none are left the
    /// default order is used.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let criteria = keys
            .into_iter()
            .filter_map(|k| TiebreakCriterion::from_key(k.as_ref()))
            .collect();
        Self::new(criteria)
    }

    pub fn criteria(&self) -> &[TiebreakCriterion] {
        &self.0
    }

    fn sort_key(&self, stats: &TeamStats) -> Vec<i64> {
        self.0.iter().map(|c| c.value(stats)).collect()
    }
}

impl Default for TiebreakOrder {
    fn default() -> Self {
        TiebreakOrder(DEFAULT_TIEBREAKERS.to_vec())
    }
}

impl From<Vec<String>> for TiebreakOrder {
    fn from(keys: Vec<String>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<TiebreakOrder> for Vec<String> {
    fn from(order: TiebreakOrder) -> Self {
        order.0.iter().map(|c| c.key().to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based; tied teams share a rank and the next group skips ahead.
    pub rank: usize,
    pub team: String,
    pub points: u32,
    pub goal_diff: i64,
}

/// Rank teams by `order`, each criterion descending.
///
/// A team whose full criterion tuple equals the previous team's shares its
/// rank; otherwise its rank is its 1-based position, so two teams tied at 1
/// are followed by rank 3. Tied teams are listed alphabetically.
pub fn rank_teams(stats: &TeamStatsTable, order: &TiebreakOrder) -> Vec<Standing> {
    let mut keyed: Vec<(Vec<i64>, &TeamStats)> =
        stats.iter().map(|s| (order.sort_key(s), s)).collect();
    keyed.sort_by(|(key_a, a), (key_b, b)| {
        key_b.cmp(key_a).then_with(|| a.team().cmp(b.team()))
    });

    let mut standings = Vec::with_capacity(keyed.len());
    let mut previous: Option<&Vec<i64>> = None;
    let mut rank = 0;

    for (position, (key, team)) in keyed.iter().enumerate() {
        if previous != Some(key) {
            rank = position + 1;
            previous = Some(key);
        }
        standings.push(Standing {
            rank,
            team: team.team().to_string(),
            points: team.points(),
            goal_diff: team.goal_diff(),
        });
    }

    standings
}

/// [`rank_teams`] with points, goal difference, goals scored.
pub fn rank_teams_default(stats: &TeamStatsTable) -> Vec<Standing> {
    rank_teams(stats, &TiebreakOrder::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
