// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arena-backed concrete syntax tree.
//!
//! Nodes live in a flat vector and refer to their parent and children by
//! index, so ancestor walks are plain index chases. A node's children are
//! an ordered mix of nodes and tokens ([`SyntaxElement`]); trivia is not
//! stored, but the text of any node can be sliced out of the source using
//! the spans of its first and last tokens.
//!
//! [`NodeRef`] is the navigation handle used by all consumers.

use std::fmt;

use declkit_core::text::Span;

use crate::kind::{SyntaxKind, TokenKind};
use crate::tokenizer::Token;

/// Index of a node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a token in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    /// Position of the token in the token stream.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child slot: either a nested node or a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: SyntaxKind,
    parent: Option<NodeId>,
    children: Vec<SyntaxElement>,
    first_token: Option<TokenId>,
    last_token: Option<TokenId>,
}

/// A parsed source buffer.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    tokens: Vec<Token>,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SyntaxTree {
    /// The root node (`SourceFile` or `TypeRoot`).
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    /// Handle for `id`.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Handle for `id`.
    pub fn token(&self, id: TokenId) -> TokenRef<'_> {
        TokenRef { tree: self, id }
    }

    /// The source buffer this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

// ============================================================================
// Navigation handles
// ============================================================================

/// Copyable handle to a node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.tree.data(self.id).kind
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree.data(self.id).parent.map(|id| self.tree.node(id))
    }

    /// Ancestors, nearest first, excluding `self`.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// All children in source order.
    pub fn children(&self) -> &'t [SyntaxElement] {
        &self.tree.data(self.id).children
    }

    /// Child nodes in source order.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeRef<'t>> {
        let tree = self.tree;
        self.children().iter().filter_map(move |child| match child {
            SyntaxElement::Node(id) => Some(tree.node(*id)),
            SyntaxElement::Token(_) => None,
        })
    }

    /// Tokens that are direct children of this node.
    pub fn child_tokens(&self) -> impl Iterator<Item = TokenRef<'t>> {
        let tree = self.tree;
        self.children().iter().filter_map(move |child| match child {
            SyntaxElement::Token(id) => Some(tree.token(*id)),
            SyntaxElement::Node(_) => None,
        })
    }

    /// First child node of `kind`.
    pub fn child(&self, kind: SyntaxKind) -> Option<NodeRef<'t>> {
        self.child_nodes().find(|n| n.kind() == kind)
    }

    /// First child node that is a type expression.
    pub fn child_type(&self) -> Option<NodeRef<'t>> {
        self.child_nodes().find(|n| n.kind().is_type())
    }

    /// Returns true if a direct child token has exactly this text.
    pub fn has_token(&self, text: &str) -> bool {
        self.child_tokens().any(|t| t.text() == text)
    }

    /// First direct child token with this text.
    pub fn token_with_text(&self, text: &str) -> Option<TokenRef<'t>> {
        self.child_tokens().find(|t| t.text() == text)
    }

    pub fn first_token(&self) -> Option<TokenRef<'t>> {
        self.tree
            .data(self.id)
            .first_token
            .map(|id| self.tree.token(id))
    }

    pub fn last_token(&self) -> Option<TokenRef<'t>> {
        self.tree
            .data(self.id)
            .last_token
            .map(|id| self.tree.token(id))
    }

    /// All tokens covered by this node, in order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'t>> {
        let tree = self.tree;
        let range = match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => first.id.index()..last.id.index() + 1,
            _ => 0..0,
        };
        range.map(move |idx| tree.token(TokenId(idx as u32)))
    }

    /// Byte span from the first to the last token. Empty nodes get an
    /// empty span at offset 0.
    pub fn span(&self) -> Span {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::default(),
        }
    }

    /// Source text of this node, trimmed of surrounding trivia.
    pub fn text(&self) -> &'t str {
        let span = self.span();
        &self.tree.source[span.start..span.end]
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.id, self.text())
    }
}

/// Copyable handle to a token in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct TokenRef<'t> {
    tree: &'t SyntaxTree,
    id: TokenId,
}

impl<'t> TokenRef<'t> {
    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.tree.tokens[self.id.index()].kind
    }

    pub fn span(&self) -> Span {
        self.tree.tokens[self.id.index()].span
    }

    pub fn newline_before(&self) -> bool {
        self.tree.tokens[self.id.index()].newline_before
    }

    pub fn text(&self) -> &'t str {
        let span = self.span();
        &self.tree.source[span.start..span.end]
    }

    /// Identifier or keyword.
    pub fn is_word(&self) -> bool {
        matches!(self.kind(), TokenKind::Identifier | TokenKind::Keyword)
    }
}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind(), self.text())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental arena builder used by the parser.
///
/// Nodes are opened with [`start_node`](Self::start_node), receive tokens
/// and child nodes, and are closed with [`finish_node`](Self::finish_node).
/// A just-finished node can be wrapped in a new parent with
/// [`wrap_last`](Self::wrap_last) for postfix constructs such as `T?`.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub(crate) fn start_node(&mut self, kind: SyntaxKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
            first_token: None,
            last_token: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()]
                .children
                .push(SyntaxElement::Node(id));
        }
        self.stack.push(id);
        id
    }

    pub(crate) fn push_token(&mut self, token: usize) {
        if let Some(&open) = self.stack.last() {
            self.nodes[open.index()]
                .children
                .push(SyntaxElement::Token(TokenId(token as u32)));
        }
    }

    pub(crate) fn finish_node(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let (first, last) = {
            let data = &self.nodes[id.index()];
            let first = data
                .children
                .iter()
                .find_map(|child| self.element_first(*child));
            let last = data
                .children
                .iter()
                .rev()
                .find_map(|child| self.element_last(*child));
            (first, last)
        };
        let data = &mut self.nodes[id.index()];
        data.first_token = first;
        data.last_token = last;
        Some(id)
    }

    /// Wrap the last child of the open node in a new open node of `kind`.
    ///
    /// Returns `None` when the open node's last child is not a node.
    pub(crate) fn wrap_last(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        let open = *self.stack.last()?;
        let child = match self.nodes[open.index()].children.last() {
            Some(SyntaxElement::Node(child)) => *child,
            _ => return None,
        };
        let wrapper = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: Some(open),
            children: vec![SyntaxElement::Node(child)],
            first_token: None,
            last_token: None,
        });
        self.nodes[child.index()].parent = Some(wrapper);
        if let Some(slot) = self.nodes[open.index()].children.last_mut() {
            *slot = SyntaxElement::Node(wrapper);
        }
        self.stack.push(wrapper);
        Some(wrapper)
    }

    /// Change the kind of a node (used when `(...)` turns out to be a
    /// function type once the arrow is seen).
    pub(crate) fn retag(&mut self, id: NodeId, kind: SyntaxKind) {
        self.nodes[id.index()].kind = kind;
    }

    pub(crate) fn build(self, source: String, tokens: Vec<Token>, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            source,
            tokens,
            nodes: self.nodes,
            root,
        }
    }

    fn element_first(&self, element: SyntaxElement) -> Option<TokenId> {
        match element {
            SyntaxElement::Token(id) => Some(id),
            SyntaxElement::Node(id) => self.nodes[id.index()].first_token,
        }
    }

    fn element_last(&self, element: SyntaxElement) -> Option<TokenId> {
        match element {
            SyntaxElement::Token(id) => Some(id),
            SyntaxElement::Node(id) => self.nodes[id.index()].last_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn build_optional_int() -> SyntaxTree {
        // TypeRoot > OptionalType > IdentifierType
        let source = "Int?".to_string();
        let tokens = tokenize(&source).unwrap();
        let mut builder = TreeBuilder::default();
        let root = builder.start_node(SyntaxKind::TypeRoot);
        builder.start_node(SyntaxKind::IdentifierType);
        builder.push_token(0);
        builder.finish_node();
        builder.wrap_last(SyntaxKind::OptionalType);
        builder.push_token(1);
        builder.finish_node();
        builder.finish_node();
        builder.build(source, tokens, root)
    }

    #[test]
    fn wrap_last_reparents_child() {
        let tree = build_optional_int();
        let root = tree.root();
        let optional = root.child_nodes().next().unwrap();
        assert_eq!(optional.kind(), SyntaxKind::OptionalType);
        assert_eq!(optional.text(), "Int?");
        let inner = optional.child_nodes().next().unwrap();
        assert_eq!(inner.kind(), SyntaxKind::IdentifierType);
        assert_eq!(inner.parent(), Some(optional));
        assert_eq!(inner.text(), "Int");
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let tree = build_optional_int();
        let optional = tree.root().child_nodes().next().unwrap();
        let inner = optional.child_nodes().next().unwrap();
        let kinds: Vec<_> = inner.ancestors().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::OptionalType, SyntaxKind::TypeRoot]);
    }

    #[test]
    fn first_and_last_tokens() {
        let tree = build_optional_int();
        let root = tree.root();
        assert_eq!(root.first_token().unwrap().text(), "Int");
        assert_eq!(root.last_token().unwrap().text(), "?");
        assert_eq!(root.tokens().count(), 2);
        assert_eq!(root.span(), Span::new(0, 4));
    }

    #[test]
    fn empty_node_has_empty_text() {
        let source = "()".to_string();
        let tokens = tokenize(&source).unwrap();
        let mut builder = TreeBuilder::default();
        let root = builder.start_node(SyntaxKind::TupleType);
        builder.push_token(0);
        builder.start_node(SyntaxKind::TupleTypeElementList);
        builder.finish_node();
        builder.push_token(1);
        builder.finish_node();
        let tree = builder.build(source, tokens, root);
        let list = tree.root().child(SyntaxKind::TupleTypeElementList).unwrap();
        assert_eq!(list.text(), "");
        assert!(list.first_token().is_none());
        assert_eq!(tree.root().text(), "()");
    }
}
