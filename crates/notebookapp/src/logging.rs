//! Tracing bootstrap.
//!
//! The library only emits `tracing` events. Binaries call [`init_tracing`]
//! once to print them to stderr. `NOTEBOOK_LOG` overrides the level passed in.

use crate::error::{NotebookError, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NOTEBOOK_LOG";

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(level: &str) -> Result<()> {
    LOGGING.get_or_try_init(|| -> Result<()> {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|err| NotebookError::Config(format!("invalid log level `{level}`: {err}")))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|err| NotebookError::Config(err.to_string()))
    })?;
    Ok(())
}
