// Season analytics runner.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the JSON report)
// 2. Load config (copying defaults/ into config/ on first run)
// 3. Read match lines from the configured file, or stdin
// 4. Run the pipeline and print the season report as JSON

use std::io::{self, BufRead, Write};

use anyhow::Context;
use matchday_core::config::{self, AnalyticsConfig};
use matchday_core::pipeline;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: tiebreakers={:?}, filter active: {}",
        config.ranking.tiebreakers.criteria(),
        !config.filter.is_empty()
    );

    // 3. Read input
    let lines = read_lines(&config)?;
    info!("Read {} input lines", lines.len());

    // 4. Analyse and print
    let season = pipeline::run(&lines, &config);
    if !season.rejected.is_empty() {
        info!("{} lines were rejected", season.rejected.len());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &season).context("failed to serialize report")?;
    writeln!(out).context("failed to write report")?;

    Ok(())
}

/// Match lines from `input.path`, or stdin when no path is configured.
fn read_lines(config: &AnalyticsConfig) -> anyhow::Result<Vec<String>> {
    match &config.input.path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read match file {path}"))?;
            Ok(text.lines().map(str::to_string).collect())
        }
        None => {
            info!("No input.path configured, reading matches from stdin");
            io::stdin()
                .lock()
                .lines()
                .collect::<Result<Vec<_>, _>>()
                .context("failed to read matches from stdin")
        }
    }
}

/// Initialize tracing to stderr with an env-overridable filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchday=info,matchday_core=info,warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
