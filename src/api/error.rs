//! Daemon error payloads and their classification into [`Error`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Error kinds reported by the daemon in the `error` field of a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Path already exists
    Conflict,
    /// Path does not exist
    NotFound,
    /// Caller may not touch this path
    Forbidden,
    /// Request was malformed
    BadRequest,
    /// Server allocation is full
    QuotaExceeded,
    /// Anything else
    Unknown,
}

impl From<&str> for RemoteErrorKind {
    fn from(kind: &str) -> Self {
        match kind {
            "Conflict" => RemoteErrorKind::Conflict,
            "NotFound" => RemoteErrorKind::NotFound,
            "Forbidden" => RemoteErrorKind::Forbidden,
            "BadRequest" => RemoteErrorKind::BadRequest,
            "QuotaExceeded" => RemoteErrorKind::QuotaExceeded,
            _ => RemoteErrorKind::Unknown,
        }
    }
}

impl RemoteErrorKind {
    /// Get human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            RemoteErrorKind::Conflict => "Resource already exists",
            RemoteErrorKind::NotFound => "Resource does not exist",
            RemoteErrorKind::Forbidden => "Access denied",
            RemoteErrorKind::BadRequest => "Invalid arguments",
            RemoteErrorKind::QuotaExceeded => "Disk quota exceeded",
            RemoteErrorKind::Unknown => "Operation failed",
        }
    }
}

/// Structured error body, e.g. `{"error":"Conflict","message":"Already exists: a.txt"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteErrorBody {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteErrorBody {
    pub fn kind(&self) -> RemoteErrorKind {
        RemoteErrorKind::from(self.error.as_str())
    }
}

/// Find the first JSON object embedded anywhere in `raw` that looks like an
/// error body. Trailing text after the object is ignored.
pub fn extract_error_body(raw: &str) -> Option<RemoteErrorBody> {
    raw.match_indices('{').find_map(|(idx, _)| {
        let mut stream = serde_json::Deserializer::from_str(&raw[idx..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value @ Value::Object(_))) => serde_json::from_value(value).ok(),
            _ => None,
        }
    })
}

/// Turn raw error text from the daemon into a classified [`Error`].
///
/// Structured extraction is tried first; anything that does not parse falls
/// back to the raw text. This never fails.
pub fn classify(raw: &str) -> Error {
    let Some(body) = extract_error_body(raw) else {
        let raw = raw.trim();
        if raw.is_empty() {
            return Error::OperationFailed(RemoteErrorKind::Unknown.description().to_string());
        }
        return Error::OperationFailed(raw.to_string());
    };

    let kind = body.kind();
    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    match kind {
        RemoteErrorKind::Conflict => {
            let name = message.and_then(|m| m.strip_prefix("Already exists:")).map(str::trim);
            match name {
                Some(name) if !name.is_empty() => {
                    Error::Conflict(format!("\"{}\" already exists", name))
                }
                _ => Error::Conflict(message.unwrap_or(kind.description()).to_string()),
            }
        }
        _ => Error::OperationFailed(message.unwrap_or(kind.description()).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_extraction() {
        let raw = r#"Request failed: {"error":"Conflict","message":"Already exists: foo.txt"}"#;
        let err = classify(raw);
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "\"foo.txt\" already exists");
    }

    #[test]
    fn test_bare_json_body() {
        let err = classify(r#"{"error":"Conflict","message":"Already exists: my dir"}"#);
        assert_eq!(err.to_string(), "\"my dir\" already exists");
    }

    #[test]
    fn test_conflict_without_name() {
        let err = classify(r#"{"error":"Conflict"}"#);
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Resource already exists");
    }

    #[test]
    fn test_structured_non_conflict() {
        let err = classify(r#"{"error":"Forbidden","message":"Path escapes server root"}"#);
        assert!(matches!(err, Error::OperationFailed(_)));
        assert_eq!(err.to_string(), "Path escapes server root");

        let err = classify(r#"{"error":"NotFound"}"#);
        assert_eq!(err.to_string(), "Resource does not exist");
    }

    #[test]
    fn test_raw_fallback() {
        assert_eq!(classify("  connection reset  ").to_string(), "connection reset");
        assert_eq!(classify("").to_string(), "Operation failed");
        // Broken JSON must not panic and degrades to the raw text
        assert_eq!(
            classify(r#"oops {"error": "Conflict""#).to_string(),
            r#"oops {"error": "Conflict""#
        );
    }

    #[test]
    fn test_skips_non_error_objects() {
        let raw = r#"ctx {"a":1} then {"error":"Conflict","message":"Already exists: b"}"#;
        assert_eq!(classify(raw).to_string(), "\"b\" already exists");
    }

    #[test]
    fn test_kind_conversion() {
        assert_eq!(RemoteErrorKind::from("Conflict"), RemoteErrorKind::Conflict);
        assert_eq!(RemoteErrorKind::from("NotFound"), RemoteErrorKind::NotFound);
        assert_eq!(RemoteErrorKind::from("whatever"), RemoteErrorKind::Unknown);
    }
}
