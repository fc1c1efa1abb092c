// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parameter descriptors from type annotations.

pub mod closure;
pub mod decompose;
pub mod label;
pub mod void;

pub use closure::{assemble, effects, input_side, output_side, InputSide, OutputSide};
pub use decompose::decompose;
pub use label::{labels_for, Labels};
pub use void::{is_void_list, is_void_spelling, VOID_SPELLINGS};

use declkit_syntax::{parse_type, ParseError};

use crate::model::{ParameterDescriptor, ParameterFields, StandardParameter};

/// Parse `source` as a standalone type and decompose it.
pub fn decompose_type(source: &str) -> Result<ParameterDescriptor, ParseError> {
    let tree = parse_type(source)?;
    let descriptor = tree.root().child_type().map(decompose).unwrap_or_else(|| {
        ParameterDescriptor::Standard(StandardParameter {
            fields: ParameterFields::new(source.trim()),
            parameters: Vec::new(),
        })
    });
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_propagate() {
        assert!(decompose_type("(Int").is_err());
        assert!(decompose_type("Int Int").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_not_part_of_the_type() {
        let descriptor = decompose_type("  [String: Int]  ").unwrap();
        assert_eq!(descriptor.type_text(), "[String: Int]");
    }
}
