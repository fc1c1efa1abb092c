// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fixture tests for the declkit-syntax parser.
//!
//! Every fixture must parse, every token must be owned by exactly one node
//! in source order, and every child must point back at its parent.

use std::collections::BTreeMap;
use std::path::PathBuf;

use declkit_syntax::{
    parse_source, walk, NodeRef, SyntaxElement, SyntaxKind, SyntaxTree, VisitResult, Visitor,
};

fn load_fixture(name: &str) -> SyntaxTree {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e));
    parse_source(&contents).unwrap_or_else(|e| panic!("{}: {}", name, e))
}

fn collect_tokens(node: NodeRef<'_>, out: &mut Vec<usize>) {
    for child in node.children() {
        match child {
            SyntaxElement::Token(id) => out.push(id.index()),
            SyntaxElement::Node(id) => {
                let child = node.tree().node(*id);
                assert_eq!(child.parent(), Some(node), "parent link of {:?}", child);
                collect_tokens(child, out);
            }
        }
    }
}

fn assert_well_formed(tree: &SyntaxTree) {
    let mut seen = Vec::new();
    collect_tokens(tree.root(), &mut seen);
    let expected: Vec<usize> = (0..tree.token_count()).collect();
    assert_eq!(seen, expected);
}

#[derive(Default)]
struct DeclCounter {
    counts: BTreeMap<String, usize>,
}

impl<'t> Visitor<'t> for DeclCounter {
    fn visit(&mut self, node: NodeRef<'t>) -> VisitResult {
        if node.kind().is_decl() {
            *self.counts.entry(node.kind().to_string()).or_default() += 1;
        }
        VisitResult::Continue
    }
}

fn decl_counts(tree: &SyntaxTree) -> Vec<(String, usize)> {
    let mut counter = DeclCounter::default();
    walk(tree, &mut counter);
    counter.counts.into_iter().collect()
}

fn counts(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
    let mut out: Vec<_> = pairs.iter().map(|(k, n)| (k.to_string(), *n)).collect();
    out.sort();
    out
}

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn fixture_models() {
    let tree = load_fixture("models.swift");
    assert_well_formed(&tree);
    assert_eq!(
        decl_counts(&tree),
        counts(&[
            ("EnumCaseDecl", 3),
            ("EnumDecl", 1),
            ("ExtensionDecl", 1),
            ("ImportDecl", 1),
            ("InitializerDecl", 1),
            ("StructDecl", 1),
            ("VariableDecl", 6),
        ])
    );
}

#[test]
fn fixture_service() {
    let tree = load_fixture("service.swift");
    assert_well_formed(&tree);
    assert_eq!(
        decl_counts(&tree),
        counts(&[
            ("AssociatedTypeDecl", 1),
            ("ClassDecl", 1),
            ("DeinitializerDecl", 1),
            ("FunctionDecl", 6),
            ("IfConfigDecl", 1),
            ("ImportDecl", 1),
            ("OperatorDecl", 1),
            ("ProtocolDecl", 1),
            ("SubscriptDecl", 2),
            ("TypealiasDecl", 1),
            ("VariableDecl", 4),
        ])
    );
}

// =============================================================================
// Inline cases
// =============================================================================

#[test]
fn function_parameter_types() {
    let tree = parse_source(
        "func load(_ url: URL, completion: ((Data?) -> Void)? = nil, retries: Int...) {}",
    )
    .unwrap();
    assert_well_formed(&tree);
    let func = tree.root().child(SyntaxKind::FunctionDecl).unwrap();
    let params: Vec<_> = func
        .child(SyntaxKind::FunctionSignature)
        .unwrap()
        .child(SyntaxKind::ParameterClause)
        .unwrap()
        .child_nodes()
        .collect();
    assert_eq!(params.len(), 3);
    let types: Vec<_> = params
        .iter()
        .map(|p| p.child_type().unwrap().text())
        .collect();
    assert_eq!(types, vec!["URL", "((Data?) -> Void)?", "Int"]);
    assert!(params[1].child(SyntaxKind::InitializerClause).is_some());
    assert!(params[2].has_token("..."));
}

#[test]
fn nested_types_keep_member_blocks() {
    let tree = parse_source("struct Outer {\n  enum Inner { case a }\n  class Deep { func f() {} }\n}")
        .unwrap();
    assert_well_formed(&tree);
    let members: Vec<_> = tree
        .root()
        .child(SyntaxKind::StructDecl)
        .unwrap()
        .child(SyntaxKind::MemberBlock)
        .unwrap()
        .child_nodes()
        .map(|n| n.kind())
        .collect();
    assert_eq!(members, vec![SyntaxKind::EnumDecl, SyntaxKind::ClassDecl]);
}

#[test]
fn failable_initializer() {
    let tree = parse_source("init?(rawValue: String) { return nil }").unwrap();
    let decl = tree.root().child(SyntaxKind::InitializerDecl).unwrap();
    assert!(decl.has_token("?"));
    assert!(decl.child(SyntaxKind::CodeBlock).is_some());
}

#[test]
fn statements_between_declarations() {
    let tree = parse_source("let a = [1, 2]\nprint(a)\nfunc f() {}\n").unwrap();
    assert_well_formed(&tree);
    let kinds: Vec<_> = tree.root().child_nodes().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VariableDecl,
            SyntaxKind::Statement,
            SyntaxKind::FunctionDecl
        ]
    );
}

#[test]
fn error_reports_offset() {
    let err = parse_source("struct {}").unwrap_err();
    assert_eq!(err.offset(), 7);
    assert!(err.to_string().contains("expected name"));
}

#[test]
fn parameter_packs_and_suppressed_conformances() {
    let tree = parse_source(
        "func g<each T>(_ t: repeat each T) {}\nstruct Box<T: ~Copyable>: ~Copyable {}\n",
    )
    .unwrap();
    assert_well_formed(&tree);
    let func = tree.root().child(SyntaxKind::FunctionDecl).unwrap();
    let param = func
        .child(SyntaxKind::FunctionSignature)
        .unwrap()
        .child(SyntaxKind::ParameterClause)
        .unwrap()
        .child_nodes()
        .next()
        .unwrap();
    let annotation = param.child_type().unwrap();
    assert_eq!(annotation.kind(), SyntaxKind::AttributedType);
    assert_eq!(annotation.text(), "repeat each T");

    let boxed = tree.root().child(SyntaxKind::StructDecl).unwrap();
    let constraint = boxed
        .child(SyntaxKind::GenericParameterClause)
        .unwrap()
        .child(SyntaxKind::GenericParameter)
        .unwrap()
        .child_type()
        .unwrap();
    assert_eq!(constraint.kind(), SyntaxKind::SuppressedType);
    assert_eq!(constraint.text(), "~Copyable");
    assert!(boxed.child(SyntaxKind::InheritanceClause).is_some());
}

#[test]
fn pathological_nesting_fails_cleanly() {
    let source = format!("let x: {}Int{}\n", "(".repeat(5000), ")".repeat(5000));
    let err = parse_source(&source).unwrap_err();
    assert!(err.to_string().contains("nesting deeper than"));
}
