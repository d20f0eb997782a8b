mod calendar;
mod config;
mod db;
mod error;
mod export;
mod models;
mod run;
mod service;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = config::Config::from_env()?;
    config.ensure_data_dir()?;
    let mut db = db::Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {}", config.db_path.display()))?;

    let result = run::as_cli(&args, &mut db, &config);
    if let Err(e) = &result {
        let transient = e
            .downcast_ref::<error::Error>()
            .is_some_and(|e| e.kind().is_transient());
        if transient {
            eprintln!("The database could not complete the request; it may succeed if retried.");
        }
    }
    result
}
