use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Gave up on {url} after {attempts} attempts (last status {status})")]
    TransientFetch {
        url: String,
        status: StatusCode,
        attempts: u32,
    },

    #[error("Could not decode {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Cache I/O failed at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl PipelineError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// A non-retryable HTTP status. The body is kept (truncated) for context.
    pub fn from_status(url: &str, status: StatusCode, body: &str) -> Self {
        PipelineError::Decode {
            url: url.to_string(),
            reason: format!("HTTP {}: {}", status, Self::truncate_body(body)),
        }
    }

    pub fn decode(url: &str, reason: impl std::fmt::Display) -> Self {
        PipelineError::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::TransientFetch { .. })
    }
}
