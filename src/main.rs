//! Binary entry point: resolve paths, start file logging, open the SQLite
//! store, and hand control to the Ratatui event loop until the clerk exits.
use serenity_suites::{logging, open_database, run_app, seed_rooms_if_empty, App, AppConfig};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config.log_dir)?;

    // Storage problems are shown inside the UI; only the terminal is fatal.
    let mut app = match open_database(&config.db_path) {
        Ok(conn) => {
            if let Err(err) = seed_rooms_if_empty(&conn) {
                tracing::warn!(error = %err, "could not seed default rooms");
            }
            App::new(conn)
        }
        Err(err) => {
            tracing::error!(
                path = %config.db_path.display(),
                error = %format!("{err:#}"),
                "could not open database"
            );
            App::without_database(err)
        }
    };
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal session ended with an error");
    }
    result
}
