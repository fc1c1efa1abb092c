//! declkit: declaration extraction for Swift source.
//!
//! Parses Swift files into a lossless syntax tree, collects every
//! declaration into typed records, and decomposes type annotations into
//! parameter descriptors. The `declkit` binary exposes the same pipeline
//! as JSON.

// Core infrastructure - re-exported from declkit-core
pub use declkit_core::error;
pub use declkit_core::output;
pub use declkit_core::text;

// Extraction - re-exported from declkit-swift
pub use declkit_swift::codec;
pub use declkit_swift::model;
pub use declkit_swift::signature;
pub use declkit_swift::walker;
pub use declkit_swift::{decompose_type, extract, locate};

// Scanning and CLI responses
pub mod report;
pub mod scan;

// Error bridges - converts parser errors to DeclkitError
pub mod error_bridges;
