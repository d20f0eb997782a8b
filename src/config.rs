use anyhow::{Context, Result};
use std::path::PathBuf;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    /// Email of the acting user, if one is configured.
    pub(crate) user: Option<String>,
}

impl Config {
    /// `SPENDLOG_DB` overrides the database location, `SPENDLOG_USER` names
    /// the acting user.
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup("SPENDLOG_DB").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        let user = lookup("SPENDLOG_USER")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(Self { db_path, user })
    }

    /// Create the database's parent directory if it is missing.
    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        if let Some(dir) = self.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendlog", "spendlog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join("spendlog.db"))
}
