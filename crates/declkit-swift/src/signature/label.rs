// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Labels inherited from the element that carries a type annotation.

use declkit_syntax::{NodeRef, SyntaxKind};

/// Names and markers of a parameter-like element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    pub name: String,
    pub second_name: String,
    pub variadic: bool,
    pub default_argument: Option<String>,
}

/// The element carrying `annotation`: a function parameter, tuple element,
/// enum case parameter or the root of a standalone type, found by walking
/// up past at most one optional wrapper.
pub fn carrying_element(annotation: NodeRef<'_>) -> Option<NodeRef<'_>> {
    let mut parent = annotation.parent()?;
    if parent.kind().is_optional_wrapper() {
        parent = parent.parent()?;
    }
    matches!(
        parent.kind(),
        SyntaxKind::FunctionParameter
            | SyntaxKind::TupleTypeElement
            | SyntaxKind::EnumCaseParameter
            | SyntaxKind::TypeRoot
    )
    .then_some(parent)
}

/// Labels for `annotation`; empty when it is not carried by an element.
pub fn labels_for(annotation: NodeRef<'_>) -> Labels {
    carrying_element(annotation)
        .map(element_labels)
        .unwrap_or_default()
}

/// Names are the word tokens before the element's `:`.
pub fn element_labels(element: NodeRef<'_>) -> Labels {
    let mut names = Vec::new();
    let mut has_colon = false;
    for token in element.child_tokens() {
        if token.text() == ":" {
            has_colon = true;
            break;
        }
        if token.is_word() {
            names.push(token.text().to_string());
        }
    }
    if !has_colon {
        names.clear();
    }
    let mut names = names.into_iter();
    Labels {
        name: names.next().unwrap_or_default(),
        second_name: names.next().unwrap_or_default(),
        variadic: element.has_token("..."),
        default_argument: element
            .child(SyntaxKind::InitializerClause)
            .and_then(|init| init.child(SyntaxKind::Expr))
            .map(|expr| expr.text().to_string()),
    }
}
