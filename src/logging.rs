//! Tracing setup shared by the desktop client and the headless runner.
//!
//! Each launch gets its own file under the app `logs` directory, named after
//! the kind of session, plus a console layer. Only the newest
//! [`MAX_LOG_FILES`] files of a session kind are kept.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, fmt::writer::BoxMakeWriter, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Log files retained per session kind.
pub const MAX_LOG_FILES: usize = 10;

/// Filter directives, in `RUST_LOG` syntax.
pub const LOG_FILTER_ENV: &str = "BRDGEN_LOG";

/// HTTP and TLS internals stay quiet unless asked for.
const DEFAULT_FILTER: &str = "info,ureq=warn,rustls=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Which binary is logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogSession {
    /// The egui client; console output on stdout.
    Desktop,
    /// `brdgen-run`; stdout carries the report, so the console layer uses stderr.
    Headless,
}

impl LogSession {
    fn file_prefix(self) -> &'static str {
        match self {
            Self::Desktop => "brdgen",
            Self::Headless => "brdgen-run",
        }
    }

    fn console(self) -> BoxMakeWriter {
        match self {
            Self::Desktop => BoxMakeWriter::new(std::io::stdout),
            Self::Headless => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log directory unavailable: {0}")]
    AppDir(#[from] AppDirError),
    #[error("Failed to list log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file time: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Logging for the desktop client.
pub fn init() -> Result<PathBuf, LoggingError> {
    init_for(LogSession::Desktop)
}

/// Install the global subscriber and return the log file path.
///
/// A second call returns the error from `set_global_default`; callers treat
/// any error as "continue without file logs".
pub fn init_for(session: LogSession) -> Result<PathBuf, LoggingError> {
    let log_dir = app_dirs::logs_dir()?;
    let file_name = log_file_name(session, now_local_or_utc())?;
    let log_path = log_dir.join(&file_name);
    touch(&log_path)?;
    prune_old_logs(&log_dir, session, MAX_LOG_FILES)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&log_dir, file_name));
    let timer = local_timer();
    let subscriber = Registry::default()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(session.console()),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!(path = %log_path.display(), ?session, "Logging initialized");
    Ok(log_path)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn touch(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|source| LoggingError::CreateFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Delete the oldest logs of `session` beyond `keep`. Other files are left alone.
fn prune_old_logs(dir: &Path, session: LogSession, keep: usize) -> Result<(), LoggingError> {
    let stem = format!("{}_", session.file_prefix());
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&stem) && name.ends_with(".log")
        })
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect();

    logs.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in logs.into_iter().skip(keep) {
        if let Err(err) = fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "Could not prune log file");
        }
    }
    Ok(())
}

fn log_file_name(session: LogSession, now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{}_{}.log", session.file_prefix(), now.format(NAME_FORMAT)?))
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    #[test]
    fn file_names_carry_the_session_kind() {
        let fixed = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(
            log_file_name(LogSession::Desktop, fixed).unwrap(),
            "brdgen_2023-11-14_22-13-20.log"
        );
        assert_eq!(
            log_file_name(LogSession::Headless, fixed).unwrap(),
            "brdgen-run_2023-11-14_22-13-20.log"
        );
    }

    #[test]
    fn pruning_only_touches_the_same_session_kind() {
        let dir = tempdir().unwrap();
        for idx in 0..4 {
            touch(&dir.path().join(format!("brdgen_{idx}.log"))).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        touch(&dir.path().join("brdgen-run_0.log")).unwrap();
        touch(&dir.path().join("notes.txt")).unwrap();

        prune_old_logs(dir.path(), LogSession::Desktop, 2).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec!["brdgen-run_0.log", "brdgen_2.log", "brdgen_3.log", "notes.txt"]
        );
    }
}
