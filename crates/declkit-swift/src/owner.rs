// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Owner resolution.

use declkit_syntax::NodeRef;

use crate::model::Owner;
use crate::node;

/// The nearest enclosing class, struct, enum, actor, protocol or
/// extension of `decl`. Top-level declarations have no owner.
pub fn resolve_owner(decl: NodeRef<'_>) -> Option<Owner> {
    decl.ancestors()
        .find(|ancestor| ancestor.kind().is_container_decl())
        .map(owner_of)
}

/// The owner record describing `container` itself.
pub fn owner_of(container: NodeRef<'_>) -> Owner {
    Owner {
        attributes: node::attributes(container),
        modifiers: node::modifiers(container),
        keyword: node::keyword(container),
        name: node::name(container),
    }
}
