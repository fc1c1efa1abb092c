// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Concrete syntax trees for a Swift-style declaration grammar.
//!
//! The parser gives full structure to declarations and type expressions;
//! statement and expression bodies are kept as opaque token runs.
//!
//! ```
//! use declkit_syntax::{parse_type, SyntaxKind};
//!
//! let tree = parse_type("(Int) -> Void").unwrap();
//! let ty = tree.root().child_type().unwrap();
//! assert_eq!(ty.kind(), SyntaxKind::FunctionType);
//! ```

pub mod kind;
pub mod parser;
pub mod tokenizer;
pub mod tree;
pub mod visitor;

pub use kind::{SyntaxKind, TokenKind};
pub use parser::{parse_source, parse_type, ParseError};
pub use tokenizer::{tokenize, TokError, Token};
pub use tree::{NodeId, NodeRef, SyntaxElement, SyntaxTree, TokenId, TokenRef};
pub use visitor::{walk, walk_node, VisitResult, Visitor};
