//! Common error type for the harmonization pipeline

use std::path::PathBuf;

/// Error from building or projecting the pooled dataset.
///
/// `Load` is recoverable at the pool boundary: the affected country is
/// skipped and its siblings continue. Every other variant aborts the run.
#[derive(Debug)]
pub enum PipelineError {
    /// A raw source file was unreachable or unreadable.
    Load { path: PathBuf, message: String },
    /// A required column is missing, or column types conflict across sources.
    Schema(String),
    /// Malformed country list or derivation parameters.
    Config(String),
    /// Filesystem failure while persisting an artifact.
    Io(std::io::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load { path, message } => {
                write!(f, "load failed for {}: {message}", path.display())
            }
            Self::Schema(msg) => write!(f, "schema: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl PipelineError {
    /// A fatal error aborts the whole build; a non-fatal one only skips the
    /// country it occurred in.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Load { .. })
    }

    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
