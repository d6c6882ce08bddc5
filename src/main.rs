use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use college_sync::config::{DEFAULT_CSV_PATH, DEFAULT_DATABASE_PATH, DEFAULT_DISTRICT_NAME};
use college_sync::{run_import, ImportConfig};

/// Sync a district's college application export into the database.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// CSV export to import
    #[arg(default_value = DEFAULT_CSV_PATH)]
    csv_path: PathBuf,

    /// SQLite database file
    #[arg(long, env = "COLLEGE_SYNC_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// District that owns every student in the export
    #[arg(long, env = "COLLEGE_SYNC_DISTRICT", default_value = DEFAULT_DISTRICT_NAME)]
    district: String,
}

impl Cli {
    fn into_config(self) -> ImportConfig {
        ImportConfig::new(self.district)
            .with_database_path(self.database)
            .with_csv_path(self.csv_path)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout only carries the summary
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config();
    info!(
        csv = %config.csv_path.display(),
        database = %config.database_path.display(),
        district = %config.district_name,
        "starting import"
    );

    let summary = run_import(&config)
        .with_context(|| format!("Failed to import {}", config.csv_path.display()))?;

    println!("Import Summary: {}", serde_json::to_string(&summary)?);

    Ok(())
}
