//! Core infrastructure for declkit.
//!
//! This crate provides language-agnostic infrastructure:
//! - Byte spans, source locations and the line index
//! - Error types and error codes
//! - JSON output plumbing for CLI responses

pub mod error;
pub mod output;
pub mod text;
