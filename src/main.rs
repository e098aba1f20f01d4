//! Customer profiler binary entrypoint.
//! Loads settings and the transaction table, builds the profile and writes
//! the snapshot to the configured path.

use anyhow::Context;
use customer_profiler::ingest::csv_source::CsvFileSource;
use customer_profiler::{pipeline, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `PROFILER_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("customer_profiler=info,warn"));

    let json = std::env::var("PROFILER_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::load_default().context("loading profiler settings")?;
    tracing::debug!(?settings, "settings");

    let source = CsvFileSource::new(&settings.table_path).with_max_rows(settings.max_rows);
    let run = pipeline::run(&source, &settings)
        .with_context(|| format!("profiling {}", settings.table_path.display()))?;

    tracing::info!(
        populations = ?run.cohorts.inverse(),
        "customers in the profile belong to {} populations",
        run.cohorts.len()
    );

    let snapshot = run.into_snapshot();
    snapshot.write_to(&settings.profile_path)?;
    tracing::info!(path = %settings.profile_path.display(), "saved profile");

    Ok(())
}
