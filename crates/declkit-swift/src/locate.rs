// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Location pass.
//!
//! Records are built with empty locations. Once the source buffer is at
//! hand, [`locate`] resolves every header's span through a [`LineIndex`].
//! `end_location` is the position just past the declaration's last
//! character.

use declkit_core::text::{LineIndex, SourceLocation};

use crate::model::FileDeclarations;

/// Fill `start_location`/`end_location` of every record.
///
/// Without a source buffer both locations are set to the empty sentinel.
pub fn locate(declarations: &mut FileDeclarations, source: Option<&str>) {
    let Some(source) = source else {
        declarations.for_each_header_mut(|header| {
            header.start_location = SourceLocation::empty();
            header.end_location = SourceLocation::empty();
        });
        return;
    };
    let index = LineIndex::new(source);
    declarations.for_each_header_mut(|header| {
        header.start_location = index.location(header.span.start);
        header.end_location = index.location(header.span.end);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::walk;
    use declkit_syntax::parse_source;

    const SOURCE: &str = "import Foundation\n\nstruct Café {\n  let naïve = 1\n}\n";

    #[test]
    fn locations_are_one_indexed() {
        let tree = parse_source(SOURCE).unwrap();
        let mut decls = walk(&tree);
        locate(&mut decls, Some(SOURCE));

        let import = &decls.imports[0].header;
        assert_eq!(import.start_location, SourceLocation::new(1, 1, 0));
        assert_eq!(import.end_location.line, Some(1));
        assert_eq!(import.end_location.column, Some(18));

        let ty = &decls.types[0].header;
        assert_eq!(ty.start_location.line, Some(3));
        assert_eq!(ty.end_location.line, Some(5));
        assert_eq!(ty.end_location.column, Some(2));

        let var = &decls.variables[0].header;
        assert_eq!(var.start_location.line, Some(4));
        assert_eq!(var.start_location.column, Some(3));
        // Columns count chars: "  let naïve = 1" is 15 chars long.
        assert_eq!(var.end_location.column, Some(16));
    }

    #[test]
    fn missing_source_gives_empty_locations() {
        let tree = parse_source(SOURCE).unwrap();
        let mut decls = walk(&tree);
        locate(&mut decls, None);
        assert!(decls.types[0].header.start_location.is_empty());
        assert_eq!(decls.types[0].header.end_location, SourceLocation::empty());
    }
}
