use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort processing of a single document.
///
/// None of these are retried: an incomplete script set would ship a broken
/// page, so every variant is surfaced to the operator.
#[derive(Debug, Error)]
pub enum InjectError {
    /// A documentation page gave no usable script tags for an element the
    /// validator reported missing, or the fetch timed out.
    #[error("could not resolve script tags for `{element}` from {url}: {reason}")]
    Lookup {
        element: String,
        url: String,
        reason: String,
    },

    #[error("placeholder `{placeholder}` not found in document")]
    PlaceholderNotFound { placeholder: String },

    #[error("validator failed: {0}")]
    Validator(String),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InjectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InjectError>;
