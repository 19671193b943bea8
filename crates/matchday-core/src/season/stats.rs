// Per-team season statistics folded from a chronological match list.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::debug;

use crate::record::Match;

/// Points for a win; a draw is worth 1 and a loss 0.
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

// ---------------------------------------------------------------------------
// Match outcome
// ---------------------------------------------------------------------------

/// Result of a single match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => POINTS_FOR_WIN,
            Outcome::Draw => POINTS_FOR_DRAW,
            Outcome::Loss => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// TeamStats
// ---------------------------------------------------------------------------

/// Cumulative statistics for one team.
///
/// Read-only outside this module. `goal_diff` always equals
/// `goals_for - goals_against`; `win_streak` and `avg_attendance` are set once
/// the whole season has been folded.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TeamStats {
    team: String,
    points: u32,
    matches_played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u64,
    goals_against: u64,
    goal_diff: i64,
    home_points: u32,
    away_points: u32,
    win_streak: u32,
    avg_attendance: f64,
}

impl TeamStats {
    fn new(team: &str) -> Self {
        TeamStats {
            team: team.to_string(),
            points: 0,
            matches_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_diff: 0,
            home_points: 0,
            away_points: 0,
            win_streak: 0,
            avg_attendance: 0.0,
        }
    }

    fn record(&mut self, goals_for: u32, goals_against: u32, at_home: bool) -> Outcome {
        let outcome = Outcome::from_goals(goals_for, goals_against);

        self.matches_played += 1;
        self.goals_for += u64::from(goals_for);
        self.goals_against += u64::from(goals_against);
        self.goal_diff = self.goals_for as i64 - self.goals_against as i64;

        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }

        let earned = outcome.points();
        self.points += earned;
        if at_home {
            self.home_points += earned;
        } else {
            self.away_points += earned;
        }

        outcome
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn goals_for(&self) -> u64 {
        self.goals_for
    }

    pub fn goals_against(&self) -> u64 {
        self.goals_against
    }

    pub fn goal_diff(&self) -> i64 {
        self.goal_diff
    }

    /// Points earned as team1 (the home side).
    pub fn home_points(&self) -> u32 {
        self.home_points
    }

    /// Points earned as team2 (the away side).
    pub fn away_points(&self) -> u32 {
        self.away_points
    }

    /// Consecutive wins ending at the team's most recent match.
    pub fn win_streak(&self) -> u32 {
        self.win_streak
    }

    pub fn avg_attendance(&self) -> f64 {
        self.avg_attendance
    }

    /// Points per match played, rounded to 2 decimals.
    pub fn points_per_match(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        round2(f64::from(self.points) / f64::from(self.matches_played))
    }
}

// ---------------------------------------------------------------------------
// TeamStatsTable
// ---------------------------------------------------------------------------

/// Team name -> [`TeamStats`], iterated in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStatsTable {
    entries: Vec<TeamStats>,
    index: HashMap<String, usize>,
}

impl TeamStatsTable {
    pub fn get(&self, team: &str) -> Option<&TeamStats> {
        self.index.get(team).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, team: &str) -> bool {
        self.index.contains_key(team)
    }

    /// All teams in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TeamStats> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a TeamStatsTable {
    type Item = &'a TeamStats;
    type IntoIter = std::slice::Iter<'a, TeamStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as a JSON-style object keyed by team name, in insertion order.
impl Serialize for TeamStatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for stats in &self.entries {
            map.serialize_entry(&stats.team, stats)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Running state for one team while the season is folded.
struct Accumulator {
    stats: TeamStats,
    results: Vec<Outcome>,
    attendance_total: u64,
}

impl Accumulator {
    fn new(team: &str) -> Self {
        Accumulator {
            stats: TeamStats::new(team),
            results: Vec::new(),
            attendance_total: 0,
        }
    }

    fn record(&mut self, goals_for: u32, goals_against: u32, at_home: bool, attendance: u32) {
        let outcome = self.stats.record(goals_for, goals_against, at_home);
        self.results.push(outcome);
        self.attendance_total += u64::from(attendance);
    }

    fn finish(mut self) -> TeamStats {
        let streak = self
            .results
            .iter()
            .rev()
            .take_while(|o| **o == Outcome::Win)
            .count();
        self.stats.win_streak = streak as u32;
        self.stats.avg_attendance =
            round2(self.attendance_total as f64 / f64::from(self.stats.matches_played));
        self.stats
    }
}

/// Fold a match list into per-team statistics.
///
/// Matches are stable-sorted by date first, so same-day fixtures keep their
/// input order. Every record counts, duplicates included. Teams enter the
/// table on their first appearance (team1 before team2).
pub fn aggregate(matches: &[Match]) -> TeamStatsTable {
    let mut chronological: Vec<&Match> = matches.iter().collect();
    chronological.sort_by_key(|m| m.date());

    let mut accumulators: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in chronological {
        let home = slot_for(&mut accumulators, &mut index, m.team1());
        let away = slot_for(&mut accumulators, &mut index, m.team2());

        accumulators[home].record(m.score1(), m.score2(), true, m.attendance());
        accumulators[away].record(m.score2(), m.score1(), false, m.attendance());
    }

    let entries: Vec<TeamStats> = accumulators.into_iter().map(Accumulator::finish).collect();
    debug!("aggregated {} matches into {} teams", matches.len(), entries.len());

    TeamStatsTable { entries, index }
}

fn slot_for(
    accumulators: &mut Vec<Accumulator>,
    index: &mut HashMap<String, usize>,
    team: &str,
) -> usize {
    if let Some(&i) = index.get(team) {
        return i;
    }
    accumulators.push(Accumulator::new(team));
    let i = accumulators.len() - 1;
    index.insert(team.to_string(), i);
    i
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
