// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Void spellings.

use declkit_core::text::strip_whitespace;

use crate::model::ParameterDescriptor;

/// Every spelling that collapses to an empty descriptor list.
pub const VOID_SPELLINGS: [&str; 8] = [
    "Void", "(Void)", "Void?", "(Void?)", "()", "(())", "()?", "(()?)",
];

/// Returns true if `text`, ignoring whitespace, is a void spelling.
pub fn is_void_spelling(text: &str) -> bool {
    let compact = strip_whitespace(text);
    VOID_SPELLINGS.contains(&compact.as_str())
}

/// A descriptor list is void when it is empty or holds a single element
/// whose attribute-free type is a void spelling.
pub fn is_void_list(list: &[ParameterDescriptor]) -> bool {
    match list {
        [] => true,
        [only] => is_void_spelling(&only.fields().type_without_attributes),
        _ => false,
    }
}
