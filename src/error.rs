//! Structured error types for the Formflow layout engine.
//!
//! Layout itself never fails on geometry: page overflow is handled by page
//! breaks and malformed width specifiers fall back to auto distribution.
//! What can fail is parsing the input and the backend that measures and
//! draws text. Either one aborts the whole document.

use thiserror::Error;

/// Raised by a [`Backend`](crate::backend::Backend) when it cannot measure
/// or draw something.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        BackendError(msg.into())
    }
}

/// The unified error type returned by all public Formflow API functions.
#[derive(Debug, Error)]
pub enum FormflowError {
    /// JSON input failed to parse as a valid Formflow document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },
    /// The measurement or rendering backend failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
    /// A font could not be loaded or parsed.
    #[error("Font error: {0}")]
    Font(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FormflowError> = std::result::Result<T, E>;

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FormflowError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check element \"type\" and body \"kind\" tags.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FormflowError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: FormflowError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn backend_error_converts() {
        let err: FormflowError = BackendError::new("no glyphs").into();
        assert_eq!(err.to_string(), "Backend error: no glyphs");
    }
}
