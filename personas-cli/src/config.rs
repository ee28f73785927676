//! Environment loading
//!
//! Connection settings come from the `DB_*` variables. A `.env` file in the
//! working directory is loaded before argument parsing, so clap `env`
//! fallbacks see it too. Variables already set in the process take
//! precedence over the file.

use std::path::PathBuf;

use tracing::{debug, info, warn};

pub type DotenvResult = Result<PathBuf, dotenvy::Error>;

/// Load `.env` from the current directory (or a parent), if present.
pub fn load_dotenv() -> DotenvResult {
    dotenvy::dotenv()
}

/// Log the outcome of [`load_dotenv`] once tracing is up.
pub fn report_dotenv(result: &DotenvResult) {
    match result {
        Ok(path) => info!("Loaded configuration from {}", path.display()),
        Err(e) if e.not_found() => {
            debug!("No .env file found, using environment variables only")
        }
        Err(e) => warn!(error = %e, "Failed to parse .env file"),
    }
}
