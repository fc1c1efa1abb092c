// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Readers for the parts declarations share: attributes, modifiers,
//! keywords, names, generic clauses, inheritance and accessor blocks.

use declkit_syntax::{NodeRef, SyntaxKind, TokenRef};

use crate::model::{Attribute, GenericParameter, Modifier};

/// Accessor keywords recognized inside an accessor block.
const ACCESSOR_NAMES: &[&str] = &[
    "get",
    "set",
    "willSet",
    "didSet",
    "init",
    "_read",
    "_modify",
    "unsafeAddress",
    "unsafeMutableAddress",
];

/// Effects that may follow an accessor keyword (`get async throws`).
const ACCESSOR_EFFECTS: &[&str] = &["async", "throws", "mutating", "nonmutating"];

/// Source text from the start of `from` to the end of `node`.
fn text_from<'t>(node: NodeRef<'t>, from: TokenRef<'t>) -> &'t str {
    let end = node.span().end;
    node.tree()
        .source()
        .get(from.span().start..end)
        .unwrap_or_default()
}

/// Text of `node` without its first token, or `None` if nothing follows.
pub(crate) fn text_after_first_token(node: NodeRef<'_>) -> Option<String> {
    let second = node.tokens().nth(1)?;
    Some(text_from(node, second).trim().to_string())
}

pub(crate) fn attribute(node: NodeRef<'_>) -> Attribute {
    let name: String = node
        .child_tokens()
        .skip(1)
        .map(|t| t.text())
        .collect();
    let arguments = node.child(SyntaxKind::AttributeArguments).map(|args| {
        let text = args.text();
        text.strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(text)
            .trim()
            .to_string()
    });
    Attribute { name, arguments }
}

/// Attributes in the node's own attribute list.
pub(crate) fn attributes(node: NodeRef<'_>) -> Vec<Attribute> {
    node.child(SyntaxKind::AttributeList)
        .map(|list| list.child_nodes().map(attribute).collect())
        .unwrap_or_default()
}

pub(crate) fn modifiers(node: NodeRef<'_>) -> Vec<Modifier> {
    let Some(list) = node.child(SyntaxKind::ModifierList) else {
        return Vec::new();
    };
    list.child_nodes()
        .filter_map(|modifier| {
            let tokens: Vec<_> = modifier.child_tokens().collect();
            let name = tokens.first()?.text().to_string();
            let detail = match tokens.as_slice() {
                [_, open, detail, _] if open.text() == "(" => Some(detail.text().to_string()),
                _ => None,
            };
            Some(Modifier { name, detail })
        })
        .collect()
}

/// The declaration keyword: the first token owned directly by the node.
pub(crate) fn keyword(node: NodeRef<'_>) -> String {
    node.child_tokens()
        .next()
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

/// Text of the `Name` child, or for extensions the extended type.
pub(crate) fn name(node: NodeRef<'_>) -> String {
    if let Some(name) = node.child(SyntaxKind::Name) {
        return name.text().to_string();
    }
    if node.kind() == SyntaxKind::ExtensionDecl {
        if let Some(extended) = node.child_type() {
            return extended.text().to_string();
        }
    }
    String::new()
}

pub(crate) fn generic_parameters(node: NodeRef<'_>) -> Vec<GenericParameter> {
    let Some(clause) = node.child(SyntaxKind::GenericParameterClause) else {
        return Vec::new();
    };
    clause
        .child_nodes()
        .filter(|p| p.kind() == SyntaxKind::GenericParameter)
        .filter_map(|param| {
            let name = param
                .child_tokens()
                .filter(|t| t.is_word())
                .last()?
                .text()
                .to_string();
            let constraint = param.child_type().map(|t| t.text().to_string());
            Some(GenericParameter { name, constraint })
        })
        .collect()
}

pub(crate) fn inherited_types(node: NodeRef<'_>) -> Vec<String> {
    node.child(SyntaxKind::InheritanceClause)
        .map(|clause| {
            clause
                .child_nodes()
                .filter_map(|inherited| inherited.child_type())
                .map(|t| t.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Requirements after `where`.
pub(crate) fn where_clause(node: NodeRef<'_>) -> Option<String> {
    node.child(SyntaxKind::GenericWhereClause)
        .and_then(text_after_first_token)
}

/// Accessor keywords at the top level of an accessor block, in order.
///
/// A block without accessor keywords (`{ a + b }`) is an implicit getter
/// and yields an empty list.
pub(crate) fn accessors(block: NodeRef<'_>) -> Vec<String> {
    let tokens: Vec<TokenRef<'_>> = block.tokens().collect();
    let mut found = Vec::new();
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.text() {
            "{" | "(" | "[" => {
                depth += 1;
                continue;
            }
            "}" | ")" | "]" => {
                depth = depth.saturating_sub(1);
                continue;
            }
            _ => {}
        }
        if depth != 1 || !ACCESSOR_NAMES.contains(&token.text()) {
            continue;
        }
        let previous = i.checked_sub(1).map(|p| tokens[p].text()).unwrap_or_default();
        let next = tokens.get(i + 1).map(|t| t.text()).unwrap_or_default();
        let starts_item = token.newline_before()
            || matches!(previous, "{" | "}")
            || ACCESSOR_NAMES.contains(&previous)
            || ACCESSOR_EFFECTS.contains(&previous);
        let used_as_value = matches!(next, "." | "=" | "?" | "[");
        if starts_item && !used_as_value {
            found.push(token.text().to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use declkit_syntax::parse_source;

    fn first_decl(source: &str, test: impl FnOnce(NodeRef<'_>)) {
        let tree = parse_source(source).unwrap();
        let decl = tree.root().child_nodes().next().unwrap();
        test(decl);
    }

    #[test]
    fn attribute_names_and_arguments() {
        first_decl("@available(iOS 13, *) @objc func f() {}", |decl| {
            assert_eq!(
                attributes(decl),
                vec![
                    Attribute {
                        name: "available".to_string(),
                        arguments: Some("iOS 13, *".to_string()),
                    },
                    Attribute {
                        name: "objc".to_string(),
                        arguments: None,
                    },
                ]
            );
        });
    }

    #[test]
    fn modifier_details() {
        first_decl("public private(set) var x = 1", |decl| {
            assert_eq!(
                modifiers(decl),
                vec![
                    Modifier {
                        name: "public".to_string(),
                        detail: None,
                    },
                    Modifier {
                        name: "private".to_string(),
                        detail: Some("set".to_string()),
                    },
                ]
            );
            assert_eq!(keyword(decl), "var");
        });
    }

    #[test]
    fn generic_clauses() {
        first_decl(
            "struct Box<each T, U: Equatable>: Sequence, Sendable where U: Hashable {}",
            |decl| {
                assert_eq!(name(decl), "Box");
                assert_eq!(
                    generic_parameters(decl),
                    vec![
                        GenericParameter {
                            name: "T".to_string(),
                            constraint: None,
                        },
                        GenericParameter {
                            name: "U".to_string(),
                            constraint: Some("Equatable".to_string()),
                        },
                    ]
                );
                assert_eq!(inherited_types(decl), vec!["Sequence", "Sendable"]);
                assert_eq!(where_clause(decl).as_deref(), Some("U: Hashable"));
            },
        );
    }

    #[test]
    fn extension_name_is_extended_type() {
        first_decl("extension Array.Index where Element == Int {}", |decl| {
            assert_eq!(name(decl), "Array.Index");
            assert_eq!(where_clause(decl).as_deref(), Some("Element == Int"));
        });
    }

    mod accessor_tests {
        use super::*;

        fn accessors_of(source: &str) -> Vec<String> {
            let tree = parse_source(source).unwrap();
            let decl = tree.root().child_nodes().next().unwrap();
            let block = decl
                .child(SyntaxKind::PatternBinding)
                .and_then(|b| b.child(SyntaxKind::AccessorBlock))
                .unwrap();
            accessors(block)
        }

        #[test]
        fn protocol_requirement() {
            assert_eq!(accessors_of("var x: Int { get set }"), vec!["get", "set"]);
            assert_eq!(
                accessors_of("var x: Int { get async throws }"),
                vec!["get"]
            );
        }

        #[test]
        fn observers() {
            assert_eq!(
                accessors_of("var x = 0 {\n  willSet { print(newValue) }\n  didSet(old) { }\n}"),
                vec!["willSet", "didSet"]
            );
        }

        #[test]
        fn implicit_getter() {
            assert!(accessors_of("var total: Int { a + b }").is_empty());
            assert!(accessors_of("var s: Int {\n  set.count\n}").is_empty());
        }

        #[test]
        fn nested_keywords_are_ignored() {
            assert_eq!(
                accessors_of("var x: Int {\n  get { cache.get { 1 } }\n  set { }\n}"),
                vec!["get", "set"]
            );
        }
    }
}
