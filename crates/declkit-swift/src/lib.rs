// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Swift declaration extraction for declkit.
//!
//! This crate turns a [`declkit_syntax::SyntaxTree`] into declaration
//! records. It includes:
//! - Type signature decomposition into parameter descriptors
//! - The declaration walker and owner resolution
//! - Ordered serialization of descriptor lists
//! - The location pass

pub mod codec;
pub mod locate;
pub mod model;
pub(crate) mod node;
pub mod owner;
pub mod signature;
pub mod walker;

pub use locate::locate;
pub use model::{
    ClosureParameter, DeclarationHeader, DeclarationKind, FileDeclarations, Owner,
    ParameterDescriptor, ParameterFields, StandardParameter, TupleParameter,
};
pub use owner::resolve_owner;
pub use signature::{decompose, decompose_type};
pub use walker::{walk, DeclarationCollector};

use declkit_syntax::{parse_source, ParseError};

/// Parse `source`, collect its declarations and resolve their locations.
pub fn extract(source: &str) -> Result<FileDeclarations, ParseError> {
    let tree = parse_source(source)?;
    let mut declarations = walk(&tree);
    locate(&mut declarations, Some(source));
    Ok(declarations)
}
