use std::fmt;
use std::path::PathBuf;

use crate::persist::{PersistError, WriteOutcome};
use crate::sites::HandlerError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Anything that can end a download job early.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error("job panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("worker pool is shut down")]
    ShutDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobReport {
    File(WriteOutcome),
    Site {
        handler: &'static str,
        saved: Vec<PathBuf>,
        skipped: usize,
    },
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobReport::File(WriteOutcome::Written { path, bytes }) => {
                write!(f, "saved {} ({bytes} bytes)", path.display())
            }
            JobReport::File(WriteOutcome::Skipped { path }) => {
                write!(f, "skipped existing {}", path.display())
            }
            JobReport::Site {
                handler,
                saved,
                skipped,
            } => write!(
                f,
                "{handler}: saved {} file(s), skipped {skipped}",
                saved.len()
            ),
        }
    }
}

/// Render an error and all of its sources, one per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str("\n  caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
