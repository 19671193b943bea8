// Match record parsing: `YYYY-MM-DD | Team1 (X:Y) Team2 | Stadium | Attendance`.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Exact field separator of the wire format (space, pipe, space).
pub const FIELD_SEPARATOR: &str = " | ";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Why a match record was rejected.
///
/// Each variant corresponds to one validation rule, checked in declaration
/// order, so a malformed line always reports the first rule it breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected 4 parts separated by ' | ', found {found}")]
    SegmentCount { found: usize },

    #[error("invalid date format: expected YYYY-MM-DD")]
    InvalidDate,

    #[error("invalid teams/score format: expected 'Team1 (X:Y) Team2'")]
    InvalidTeamsScore,

    #[error("invalid score: must be non-negative integers")]
    InvalidScore,

    #[error("invalid attendance: must be a positive integer")]
    InvalidAttendance,

    #[error("team names and stadium cannot be empty")]
    EmptyField,
}

// ---------------------------------------------------------------------------
// Match fact
// ---------------------------------------------------------------------------

/// One validated, immutable match result.
///
/// `team1` is the home side and `team2` the away side. Construct through
/// [`parse_match`] or [`Match::new`]; both enforce the same invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    date: NaiveDate,
    team1: String,
    score1: u32,
    team2: String,
    score2: u32,
    stadium: String,
    attendance: u32,
}

impl Match {
    /// Build a match from already-typed parts.
    ///
    /// Names and stadium are trimmed and must be non-empty; attendance must
    /// be positive.
    pub fn new(
        date: NaiveDate,
        team1: &str,
        score1: u32,
        team2: &str,
        score2: u32,
        stadium: &str,
        attendance: u32,
    ) -> Result<Self, FormatError> {
        if attendance == 0 {
            return Err(FormatError::InvalidAttendance);
        }

        let (team1, team2, stadium) = (team1.trim(), team2.trim(), stadium.trim());
        if team1.is_empty() || team2.is_empty() || stadium.is_empty() {
            return Err(FormatError::EmptyField);
        }

        Ok(Match {
            date,
            team1: team1.to_string(),
            score1,
            team2: team2.to_string(),
            score2,
            stadium: stadium.to_string(),
            attendance,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn team1(&self) -> &str {
        &self.team1
    }

    pub fn team2(&self) -> &str {
        &self.team2
    }

    pub fn score1(&self) -> u32 {
        self.score1
    }

    pub fn score2(&self) -> u32 {
        self.score2
    }

    pub fn stadium(&self) -> &str {
        &self.stadium
    }

    pub fn attendance(&self) -> u32 {
        self.attendance
    }

    /// Goals scored by both sides combined.
    pub fn total_goals(&self) -> u64 {
        u64::from(self.score1) + u64::from(self.score2)
    }

    /// Whether `team` played in this match on either side.
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn is_draw(&self) -> bool {
        self.score1 == self.score2
    }

    /// Name of the winning side, or `None` for a draw.
    pub fn winner(&self) -> Option<&str> {
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(self.team1.as_str()),
            std::cmp::Ordering::Less => Some(self.team2.as_str()),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Name of the losing side, or `None` for a draw.
    pub fn loser(&self) -> Option<&str> {
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(self.team2.as_str()),
            std::cmp::Ordering::Less => Some(self.team1.as_str()),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Renders the record back in wire format.
impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{} ({}:{}) {}{sep}{}{sep}{}",
            self.date.format(DATE_FORMAT),
            self.team1,
            self.score1,
            self.score2,
            self.team2,
            self.stadium,
            self.attendance,
            sep = FIELD_SEPARATOR,
        )
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one raw match line into a [`Match`].
///
/// Rules are checked in this order, failing fast on the first violation:
/// segment count, date, teams/score shape, score values, attendance, empty
/// names.
pub fn parse_match(line: &str) -> Result<Match, FormatError> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let &[date_part, teams_part, stadium_part, attendance_part] = parts.as_slice() else {
        return Err(FormatError::SegmentCount { found: parts.len() });
    };

    let date = parse_strict_date(date_part).ok_or(FormatError::InvalidDate)?;
    let (team1, raw_score1, raw_score2, team2) = split_teams_and_score(teams_part)?;
    let score1 = parse_score(raw_score1)?;
    let score2 = parse_score(raw_score2)?;
    let attendance = parse_attendance(attendance_part)?;

    Match::new(date, team1, score1, team2, score2, stadium_part, attendance)
}

/// Strict `YYYY-MM-DD`: exactly ten characters, dashes at positions 4 and 7,
/// digits elsewhere, and a date that exists on the calendar from year 1 on.
pub(crate) fn parse_strict_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .filter(|d| d.year() >= 1)
}

/// Split `Team1 (X:Y) Team2` into `(team1, X, Y, team2)`, all trimmed.
///
/// Uses the first `(` and the first `)` after it. Team names may come back
/// empty; that is reported later as [`FormatError::EmptyField`].
fn split_teams_and_score(segment: &str) -> Result<(&str, &str, &str, &str), FormatError> {
    let open = segment.find('(').ok_or(FormatError::InvalidTeamsScore)?;
    let close = segment[open + 1..]
        .find(')')
        .map(|offset| open + 1 + offset)
        .ok_or(FormatError::InvalidTeamsScore)?;

    let tokens: Vec<&str> = segment[open + 1..close].split(':').map(str::trim).collect();
    let &[score1, score2] = tokens.as_slice() else {
        return Err(FormatError::InvalidTeamsScore);
    };
    if score1.is_empty() || score2.is_empty() {
        return Err(FormatError::InvalidTeamsScore);
    }

    Ok((
        segment[..open].trim(),
        score1,
        score2,
        segment[close + 1..].trim(),
    ))
}

fn parse_score(token: &str) -> Result<u32, FormatError> {
    token.parse::<u32>().map_err(|_| FormatError::InvalidScore)
}

/// Attendance accepts surrounding whitespace and `_` digit separators
/// (`45_000`).
fn parse_attendance(segment: &str) -> Result<u32, FormatError> {
    let cleaned = segment.trim().replace('_', "");
    match cleaned.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FormatError::InvalidAttendance),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
