// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Depth-first traversal over a [`SyntaxTree`].

use crate::tree::{NodeRef, SyntaxTree};

/// Result of visiting a node, controlling whether traversal continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitResult {
    /// Visit this node's children.
    #[default]
    Continue,
    /// Skip this node's children but continue with siblings.
    SkipChildren,
    /// Stop the traversal entirely.
    Stop,
}

/// Callbacks invoked by [`walk`].
///
/// `leave` is called after a node's children were visited, or right after
/// `visit` when they were skipped. It is not called once traversal stops.
pub trait Visitor<'t> {
    fn visit(&mut self, node: NodeRef<'t>) -> VisitResult {
        let _ = node;
        VisitResult::Continue
    }

    fn leave(&mut self, node: NodeRef<'t>) {
        let _ = node;
    }
}

/// Walk every node of `tree` in source order, starting at the root.
pub fn walk<'t, V: Visitor<'t>>(tree: &'t SyntaxTree, visitor: &mut V) {
    walk_node(tree.root(), visitor);
}

/// Walk `node` and its descendants. Returns false if traversal stopped.
pub fn walk_node<'t, V: Visitor<'t>>(node: NodeRef<'t>, visitor: &mut V) -> bool {
    match visitor.visit(node) {
        VisitResult::Stop => return false,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for child in node.child_nodes() {
                if !walk_node(child, visitor) {
                    return false;
                }
            }
        }
    }
    visitor.leave(node);
    true
}
