// Match records: wire-format parsing and selection.

pub mod filter;
pub mod parse;

pub use filter::{filter_matches, MatchFilter};
pub use parse::{parse_match, FormatError, Match, FIELD_SEPARATOR};
