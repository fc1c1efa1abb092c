//! JSON output plumbing for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{DeclkitError, OutputErrorCode};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a DeclkitError.
    pub fn from_error(err: &DeclkitError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();
        let details = match err {
            DeclkitError::InvalidArguments { details, .. } => details.clone(),
            DeclkitError::ParseError {
                file, line, col, ..
            } => Some(serde_json::json!({
                "file": file,
                "line": line,
                "col": col,
            })),
            DeclkitError::FileNotFound { path } | DeclkitError::Io { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            DeclkitError::InternalError { .. } => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Response emitted when a command fails as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Build the response for `err`.
    pub fn from_error(err: &DeclkitError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for CLI, ensuring consistency.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_code_and_status() {
        let err = DeclkitError::file_not_found("missing.swift");
        let response = ErrorResponse::from_error(&err);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&response).unwrap()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["details"]["path"], "missing.swift");
    }

    #[test]
    fn internal_error_has_no_details() {
        let info = ErrorInfo::from_error(&DeclkitError::internal("boom"));
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn emit_response_is_deterministic() {
        let response = ErrorResponse::from_error(&DeclkitError::parse("a.swift", 1, 2, "x"));
        let mut first = Vec::new();
        let mut second = Vec::new();
        emit_response(&response, &mut first).unwrap();
        emit_response(&response, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn compact_is_single_line() {
        let response = ErrorResponse::from_error(&DeclkitError::internal("boom"));
        let mut out = Vec::new();
        emit_response_compact(&response, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
