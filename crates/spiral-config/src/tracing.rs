use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Configures the global tracing subscriber.
///
/// Events go to stdout and, when `log_file` is given, to that file as well.
/// The file is truncated first. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let file = log_file
        .map(|path| {
            File::create(path).map_err(|source| InitError::LogFile {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stdout().is_terminal());
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| InitError::AlreadyInitialised)
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to create log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
