// Integration tests for the season analytics pipeline.
//
// These run the public API end to end over the fixture season in
// tests/fixtures/season.txt and over the small scenarios the engine is
// expected to reproduce exactly.

use chrono::NaiveDate;

use matchday_core::config::AnalyticsConfig;
use matchday_core::pipeline::{self, parse_lines};
use matchday_core::*;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture_lines() -> Vec<String> {
    let text = std::fs::read_to_string(format!("{FIXTURES}/season.txt"))
        .expect("fixture season should exist");
    text.lines().map(str::to_string).collect()
}

fn fixture_matches() -> Vec<Match> {
    parse_lines(fixture_lines()).matches
}

fn parse_all(lines: &[&str]) -> Vec<Match> {
    lines.iter().map(|l| parse_match(l).unwrap()).collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn scenario_a_parse_valid_record() {
    let m = parse_match("2024-03-10 | Real (2:1) Barca | Camp Nou | 45000").unwrap();
    assert_eq!(m.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(m.team1(), "Real");
    assert_eq!(m.score1(), 2);
    assert_eq!(m.team2(), "Barca");
    assert_eq!(m.score2(), 1);
    assert_eq!(m.stadium(), "Camp Nou");
    assert_eq!(m.attendance(), 45000);
}

#[test]
fn scenario_b_parse_negative_score() {
    let err = parse_match("2024-03-10 | Real (-1:1) Barca | Camp Nou | 45000").unwrap_err();
    assert_eq!(err, FormatError::InvalidScore);
    assert!(err.to_string().starts_with("invalid score"));
}

#[test]
fn scenario_c_trailing_win_streak() {
    let stats = aggregate(&parse_all(&[
        "2024-01-01 | A (1:0) B | S | 100",
        "2024-01-08 | C (2:0) A | S | 100",
        "2024-01-15 | A (3:2) D | S | 100",
    ]));
    let a = stats.get("A").unwrap();
    assert_eq!(a.win_streak(), 1);
    assert_eq!(a.wins(), 2);
    assert_eq!(a.losses(), 1);
    // 3 * wins + draws.
    assert_eq!(a.points(), 6);
}

#[test]
fn scenario_d_tied_teams_then_skipped_rank() {
    // P and Q: 10 points, +5, 20 scored. R: 9 points.
    let stats = aggregate(&parse_all(&[
        "2024-02-01 | P (8:5) F1 | S | 100",
        "2024-02-02 | P (5:4) F2 | S | 100",
        "2024-02-03 | P (4:3) F3 | S | 100",
        "2024-02-04 | P (3:3) F4 | S | 100",
        "2024-02-01 | Q (8:5) G1 | S | 100",
        "2024-02-02 | Q (5:4) G2 | S | 100",
        "2024-02-03 | Q (4:3) G3 | S | 100",
        "2024-02-04 | Q (3:3) G4 | S | 100",
        "2024-02-05 | R (2:0) H1 | S | 100",
        "2024-02-06 | R (2:0) H2 | S | 100",
        "2024-02-07 | R (2:0) H3 | S | 100",
    ]));
    let standings = rank_teams_default(&stats);
    let top: Vec<(usize, &str, u32)> = standings
        .iter()
        .take(3)
        .map(|s| (s.rank, s.team.as_str(), s.points))
        .collect();
    assert_eq!(top, vec![(1, "P", 10), (1, "Q", 10), (3, "R", 9)]);
}

#[test]
fn scenario_e_report_on_empty_input() {
    let report = generate_report(&[], &TeamStatsTable::default(), &[]);
    assert_eq!(report.tournament_leader, None);
    assert_eq!(report.most_goals_match, None);
    assert_eq!(report.biggest_upset, None);
    assert!(report.goal_distribution.is_empty());
}

// ===========================================================================
// Fixture season
// ===========================================================================

#[test]
fn fixture_parses_with_three_rejections() {
    let batch = parse_lines(fixture_lines());
    assert_eq!(batch.matches.len(), 12);

    let rejected: Vec<(usize, &FormatError)> = batch
        .rejected
        .iter()
        .map(|r| (r.line_number, &r.error))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (14, &FormatError::SegmentCount { found: 5 }),
            (15, &FormatError::InvalidScore),
            (16, &FormatError::InvalidDate),
        ]
    );
}

#[test]
fn fixture_team_stats() {
    let stats = aggregate(&fixture_matches());

    let order: Vec<&str> = stats.iter().map(TeamStats::team).collect();
    assert_eq!(order, vec!["Rovers", "United", "City", "Athletic"]);

    let rovers = stats.get("Rovers").unwrap();
    assert_eq!(rovers.matches_played(), 6);
    assert_eq!((rovers.wins(), rovers.draws(), rovers.losses()), (4, 1, 1));
    assert_eq!(rovers.points(), 13);
    assert_eq!((rovers.goals_for(), rovers.goals_against()), (9, 8));
    assert_eq!(rovers.goal_diff(), 1);
    assert_eq!((rovers.home_points(), rovers.away_points()), (10, 3));
    assert_eq!(rovers.win_streak(), 1);
    assert!(approx_eq(rovers.avg_attendance(), 19125.0));

    let united = stats.get("United").unwrap();
    assert_eq!(united.points(), 10);
    assert_eq!(united.goal_diff(), 2);
    assert_eq!(united.win_streak(), 0);
    assert!(approx_eq(united.avg_attendance(), 22683.33));

    let athletic = stats.get("Athletic").unwrap();
    assert_eq!(athletic.win_streak(), 1);
    assert_eq!(athletic.goal_diff(), -1);

    let city = stats.get("City").unwrap();
    assert_eq!(city.goal_diff(), -2);
    assert!(approx_eq(city.avg_attendance(), 22766.67));
}

#[test]
fn fixture_standings() {
    let standings = rank_teams_default(&aggregate(&fixture_matches()));
    let table: Vec<(usize, &str, u32, i64)> = standings
        .iter()
        .map(|s| (s.rank, s.team.as_str(), s.points, s.goal_diff))
        .collect();
    assert_eq!(
        table,
        vec![
            (1, "Rovers", 13, 1),
            (2, "United", 10, 2),
            (3, "Athletic", 5, -1),
            (4, "City", 5, -2),
        ]
    );
}

#[test]
fn fixture_report() {
    let matches = fixture_matches();
    let stats = aggregate(&matches);
    let standings = rank_teams_default(&stats);
    let report = generate_report(&matches, &stats, &standings);

    assert_eq!(report.tournament_leader.as_deref(), Some("Rovers"));
    assert_eq!(report.most_efficient_team.as_deref(), Some("Rovers"));

    let most_goals = report.most_goals_match.as_ref().unwrap();
    assert_eq!((most_goals.team1(), most_goals.team2()), ("United", "City"));
    assert_eq!(report.highest_attendance_match.as_ref().unwrap().attendance(), 30100);

    let upset = report.biggest_upset.as_ref().unwrap();
    assert_eq!(upset.fixture.team1(), "City");
    assert_eq!(upset.fixture.team2(), "Rovers");
    assert_eq!((upset.winner_rank, upset.loser_rank), (4, 1));

    let dist: Vec<(u64, usize)> = report.goal_distribution.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        dist,
        vec![(0, 1), (1, 3), (2, 1), (3, 4), (4, 1), (5, 1), (6, 1)]
    );
    assert_eq!(dist.iter().map(|(_, n)| n).sum::<usize>(), matches.len());

    let teams: Vec<&str> = report.attendance_by_team.keys().map(String::as_str).collect();
    assert_eq!(teams, vec!["Athletic", "City", "Rovers", "United"]);
    assert!(approx_eq(report.attendance_by_team["Athletic"], 18875.0));
}

#[test]
fn fixture_filtered_by_team_and_date() {
    let filter = MatchFilter::new()
        .team("Rovers")
        .date_to(NaiveDate::from_ymd_opt(2024, 3, 23).unwrap());
    let selected = filter_matches(&fixture_matches(), &filter);
    assert_eq!(selected.len(), 4);
    assert!(selected.iter().all(|m| m.involves("Rovers")));
}

#[test]
fn fixture_wins_first_ordering() {
    let stats = aggregate(&fixture_matches());
    let order = TiebreakOrder::from_keys(["wins", "goals_for"]);
    let standings = rank_teams(&stats, &order);
    // Athletic and City both have one win; City scored more.
    let tail: Vec<(usize, &str)> = standings[2..]
        .iter()
        .map(|s| (s.rank, s.team.as_str()))
        .collect();
    assert_eq!(tail, vec![(3, "City"), (4, "Athletic")]);
}

// ===========================================================================
// Full run from config
// ===========================================================================

#[test]
fn run_with_config_filter_and_tiebreakers() {
    let config: AnalyticsConfig = toml::from_str(
        r#"
[ranking]
tiebreakers = ["points"]

[filter]
stadium = "Riverside"
"#,
    )
    .unwrap();

    let result = pipeline::run(fixture_lines(), &config);
    assert_eq!(result.rejected.len(), 3);
    assert_eq!(result.analysis.matches.len(), 4);
    assert!(result
        .analysis
        .matches
        .iter()
        .all(|m| m.stadium() == "Riverside"));
    assert_eq!(result.analysis.standings[0].team, "Rovers");
    assert_eq!(result.analysis.stats.get("Rovers").unwrap().matches_played(), 4);
}

#[test]
fn repeated_runs_are_identical() {
    let config = AnalyticsConfig::default();
    let first = pipeline::run(fixture_lines(), &config);
    let second = pipeline::run(fixture_lines(), &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
