//! Error bridges from library errors to the unified `DeclkitError`.
//!
//! These live in the root crate because `declkit-core` sits below the
//! parser and cannot name its error type.

use declkit_core::error::DeclkitError;
use declkit_core::text::byte_offset_to_position_str;
use declkit_syntax::ParseError;

/// Convert a parse failure in `file` into a positioned `DeclkitError`.
pub fn parse_failure(file: &str, source: &str, err: &ParseError) -> DeclkitError {
    let (line, col) = byte_offset_to_position_str(source, err.offset());
    DeclkitError::parse(file, line, col, err.to_string())
}

/// Convert a failure to parse a standalone type expression.
pub fn type_failure(source: &str, err: &ParseError) -> DeclkitError {
    DeclkitError::invalid_args_with_details(
        format!("cannot parse type {:?}: {}", source, err),
        serde_json::json!({ "offset": err.offset() }),
    )
}
