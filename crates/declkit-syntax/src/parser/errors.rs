// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::tokenizer::TokError;

/// Errors raised while building a syntax tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokError),
    #[error("expected {expected}, found {found:?} at byte {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String, offset: usize },
    #[error("nesting deeper than {limit} levels at byte {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
}

impl ParseError {
    /// Byte offset where parsing stopped.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Tokenizer(err) => err.offset(),
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnexpectedEof { offset, .. }
            | ParseError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}
