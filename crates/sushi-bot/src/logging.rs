use std::fs::{self, File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::{self, NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the background writer alive; drop it to flush pending events.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("creating log directory at {path:?}: {source}")]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("creating log file at {path:?}: {source}")]
    CreateFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Installs the process-wide subscriber described by `logging`.
///
/// Returns `Ok(None)` when logging is disabled. A subscriber that is already
/// installed is left in place.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>, LoggingError> {
    if !logging.enable {
        return Ok(None);
    }

    let (writer, guard) = match &logging.file {
        Some(path) => {
            let file = create_log_file(path)?;
            non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    install(filter, writer, logging.json);

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path: logging.file.clone(),
    }))
}

fn create_log_file(path: &Path) -> Result<File, LoggingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| LoggingError::CreateDir {
            source,
            path: parent.to_path_buf(),
        })?;
    }
    File::create(path).map_err(|source| LoggingError::CreateFile {
        source,
        path: path.to_path_buf(),
    })
}

fn install(filter: EnvFilter, writer: NonBlocking, json: bool) {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer);

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    if json {
        let subscriber = builder.json().with_current_span(false).finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = builder.with_target(true).finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
