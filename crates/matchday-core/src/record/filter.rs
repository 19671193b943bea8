// Match selection by combinable criteria.

use chrono::NaiveDate;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::parse::{parse_strict_date, Match};

/// A set of optional criteria, combined with logical AND.
///
/// An empty filter accepts every match. Deserializes from a key/value table
/// (TOML or JSON); keys other than the ones below are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFilter {
    /// Team appears as team1 or team2.
    pub team: Option<String>,
    /// Inclusive lower date bound.
    #[serde(deserialize_with = "optional_date")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(deserialize_with = "optional_date")]
    pub date_to: Option<NaiveDate>,
    pub min_attendance: Option<u32>,
    pub max_attendance: Option<u32>,
    /// score1 + score2 must reach this total.
    pub min_total_goals: Option<u64>,
    /// Exact stadium name.
    pub stadium: Option<String>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn min_attendance(mut self, attendance: u32) -> Self {
        self.min_attendance = Some(attendance);
        self
    }

    pub fn max_attendance(mut self, attendance: u32) -> Self {
        self.max_attendance = Some(attendance);
        self
    }

    pub fn min_total_goals(mut self, goals: u64) -> Self {
        self.min_total_goals = Some(goals);
        self
    }

    pub fn stadium(mut self, stadium: impl Into<String>) -> Self {
        self.stadium = Some(stadium.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single match satisfies every criterion that is set.
    pub fn accepts(&self, m: &Match) -> bool {
        if let Some(team) = &self.team {
            if !m.involves(team) {
                return false;
            }
        }
        if let Some(stadium) = &self.stadium {
            if m.stadium() != stadium {
                return false;
            }
        }
        if self.date_from.is_some_and(|from| m.date() < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| m.date() > to) {
            return false;
        }
        if self.min_attendance.is_some_and(|min| m.attendance() < min) {
            return false;
        }
        if self.max_attendance.is_some_and(|max| m.attendance() > max) {
            return false;
        }
        if self.min_total_goals.is_some_and(|min| m.total_goals() < min) {
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Date fields
// ---------------------------------------------------------------------------

/// A filter bound written either as `"2024-03-01"` or as a bare TOML local
/// date `2024-03-01`. The toml deserializer hands the latter over as a
/// single-entry map holding the date's text.
struct BoundDate(NaiveDate);

impl<'de> Deserialize<'de> for BoundDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoundDateVisitor)
    }
}

struct BoundDateVisitor;

impl BoundDateVisitor {
    fn parse<E: de::Error>(&self, text: &str) -> Result<BoundDate, E> {
        parse_strict_date(text)
            .map(BoundDate)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(text), self))
    }
}

impl<'de> Visitor<'de> for BoundDateVisitor {
    type Value = BoundDate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YYYY-MM-DD date")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BoundDate, E> {
        self.parse(v)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BoundDate, A::Error> {
        match map.next_entry::<String, String>()? {
            Some((_, text)) => self.parse(&text),
            None => Err(de::Error::invalid_length(0, &self)),
        }
    }
}

fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(Option::<BoundDate>::deserialize(deserializer)?.map(|d| d.0))
}

/// Select the matches accepted by `filter`, preserving input order.
pub fn filter_matches(matches: &[Match], filter: &MatchFilter) -> Vec<Match> {
    matches.iter().filter(|m| filter.accepts(m)).cloned().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
