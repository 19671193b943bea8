// End-to-end season pipeline: raw lines -> matches -> stats -> standings -> report.

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::config::AnalyticsConfig;
use crate::record::{filter_matches, parse_match, FormatError, Match, MatchFilter};
use crate::report::{generate_report, AnalyticsReport};
use crate::season::{aggregate, rank_teams, Standing, TeamStatsTable, TiebreakOrder};

// ---------------------------------------------------------------------------
// Parsing a batch of lines
// ---------------------------------------------------------------------------

/// A line that failed to parse, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedLine {
    /// 1-based position in the input.
    pub line_number: usize,
    pub line: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: FormatError,
}

/// Result of parsing many lines: the good matches plus what was skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedBatch {
    pub matches: Vec<Match>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse every non-blank line. Failures are logged and collected, never fatal.
pub fn parse_lines<I, S>(lines: I) -> ParsedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = ParsedBatch::default();

    for (i, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match parse_match(line) {
            Ok(m) => batch.matches.push(m),
            Err(error) => {
                warn!("skipping line {}: {}", i + 1, error);
                batch.rejected.push(RejectedLine {
                    line_number: i + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }

    debug!(
        "parsed {} matches, rejected {} lines",
        batch.matches.len(),
        batch.rejected.len()
    );
    batch
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Every stage's output for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAnalysis {
    /// The matches that passed the filter, in input order.
    pub matches: Vec<Match>,
    pub stats: TeamStatsTable,
    pub standings: Vec<Standing>,
    pub report: AnalyticsReport,
}

/// Filter, aggregate, rank and summarise. Recomputes everything from
/// `matches` on every call.
pub fn analyze(matches: &[Match], filter: &MatchFilter, order: &TiebreakOrder) -> SeasonAnalysis {
    let selected = filter_matches(matches, filter);
    if !filter.is_empty() {
        debug!("filter kept {} of {} matches", selected.len(), matches.len());
    }

    let stats = aggregate(&selected);
    let standings = rank_teams(&stats, order);
    let report = generate_report(&selected, &stats, &standings);

    info!(
        "analysed {} matches across {} teams, leader: {}",
        selected.len(),
        stats.len(),
        report.tournament_leader.as_deref().unwrap_or("none")
    );

    SeasonAnalysis {
        matches: selected,
        stats,
        standings,
        report,
    }
}

/// Analysis plus the input lines that could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    #[serde(flatten)]
    pub analysis: SeasonAnalysis,
    pub rejected: Vec<RejectedLine>,
}

/// Parse `lines` and analyse them with the filter and tiebreakers from `config`.
pub fn run<I, S>(lines: I, config: &AnalyticsConfig) -> SeasonReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ParsedBatch { matches, rejected } = parse_lines(lines);
    let analysis = analyze(&matches, &config.filter, &config.ranking.tiebreakers);
    SeasonReport { analysis, rejected }
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
