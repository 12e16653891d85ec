use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".serenity-suites";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "hotel.sqlite";
/// Log folder inside the data directory.
const LOG_DIR_NAME: &str = "logs";
/// Points the app at a specific database file instead of the default.
pub const DB_PATH_ENV: &str = "SERENITY_SUITES_DB";

/// Where the application keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolve paths from the user's home directory, honouring the
    /// `SERENITY_SUITES_DB` override for the database file.
    pub fn from_env() -> Result<Self> {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let db_override = env::var_os(DB_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::resolve(home, db_override)
    }

    fn resolve(home: Option<PathBuf>, db_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = match (&home, &db_override) {
            (Some(home), _) => home.join(DATA_DIR_NAME),
            // Without a home directory the logs sit next to the overridden
            // database so we can still start.
            (None, Some(db)) => db
                .parent()
                .map(|parent| parent.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME)),
            (None, None) => return Err(anyhow!("could not locate home directory")),
        };

        let db_path = db_override.unwrap_or_else(|| data_dir.join(DB_FILE_NAME));
        Ok(Self {
            db_path,
            log_dir: data_dir.join(LOG_DIR_NAME),
        })
    }
}
