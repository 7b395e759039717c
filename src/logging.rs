use crate::error::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. With a log file everything down to debug
/// goes to the file; otherwise only warnings reach stderr so the progress bar
/// stays readable. `RUST_LOG` overrides either default.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let default_level = if log_file.is_some() || verbose {
        "ghcontrib=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
