// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type signature decomposition.
//!
//! [`decompose`] takes an *annotation node* (the outermost type node under a
//! parameter, tuple element, type annotation, return clause or generic
//! argument) and produces a [`ParameterDescriptor`].
//!
//! # Peeling
//!
//! The variant is chosen from the *core node*, reached by repeatedly
//! peeling three kinds of wrapper off the annotation:
//!
//! - attributed types (`@escaping T`, `inout T`), collecting attribute
//!   names and the `inout` specifier on the way
//! - optional wrappers (`T?`, `T!`)
//! - transparent parentheses: a tuple with exactly one element that has no
//!   label, no ellipsis, no default and is not itself a void spelling
//!
//! # Dispatch
//!
//! | Core | Variant |
//! |---|---|
//! | void spelling or `()` | `Standard` (never unwrapped further) |
//! | function type | `Closure` |
//! | tuple type | `Tuple` |
//! | `Result<...>` | `Standard` with decomposed generic arguments |
//! | anything else | `Standard` |
//!
//! # Optionality
//!
//! A descriptor is optional when the walk up from its core node, passing
//! through attributed types and transparent tuples only, reaches an
//! optional wrapper. Anchoring the walk at the core keeps a closure's own
//! optionality separate from that of its return type.

use declkit_syntax::{NodeRef, SyntaxKind};
use tracing::trace;

use super::closure;
use super::label::{element_labels, labels_for};
use super::void::is_void_spelling;
use crate::model::{ParameterDescriptor, ParameterFields, StandardParameter, TupleParameter};
use crate::node;

/// Decompose the type annotation rooted at `annotation`.
pub fn decompose(annotation: NodeRef<'_>) -> ParameterDescriptor {
    let peeled = peel(annotation);
    let core = peeled.core;

    let labels = labels_for(annotation);
    let mut fields =
        ParameterFields::new(annotation.text()).with_names(labels.name, labels.second_name);
    fields.variadic = labels.variadic;
    fields.default_argument = labels.default_argument;
    fields.attributes = peeled.attributes;
    fields.is_inout = peeled.is_inout;
    fields.type_without_attributes = strip_leading_attributes(annotation).text().to_string();
    fields.is_optional = is_optional(core);

    if is_void_core(core) {
        return standard(fields, Vec::new());
    }

    match core.kind() {
        SyntaxKind::FunctionType => ParameterDescriptor::Closure(closure::assemble(core, fields)),
        SyntaxKind::TupleType => ParameterDescriptor::Tuple(TupleParameter {
            fields,
            arguments: element_types(core).map(decompose).collect(),
        }),
        SyntaxKind::IdentifierType if is_result(core) => {
            let parameters = core
                .child(SyntaxKind::GenericArgumentClause)
                .map(|clause| {
                    clause
                        .child_nodes()
                        .filter_map(|arg| arg.child_type())
                        .map(decompose)
                        .collect()
                })
                .unwrap_or_default();
            standard(fields, parameters)
        }
        SyntaxKind::IdentifierType
        | SyntaxKind::MemberType
        | SyntaxKind::ArrayType
        | SyntaxKind::DictionaryType => standard(fields, Vec::new()),
        other => {
            trace!(kind = %other, text = core.text(), "no structure for type, using standard");
            standard(fields, Vec::new())
        }
    }
}

fn standard(fields: ParameterFields, parameters: Vec<ParameterDescriptor>) -> ParameterDescriptor {
    ParameterDescriptor::Standard(StandardParameter { fields, parameters })
}

struct Peeled<'t> {
    core: NodeRef<'t>,
    attributes: Vec<String>,
    is_inout: bool,
}

fn peel(annotation: NodeRef<'_>) -> Peeled<'_> {
    let mut core = annotation;
    let mut attributes = Vec::new();
    let mut is_inout = false;
    loop {
        let next = match core.kind() {
            SyntaxKind::AttributedType => {
                if let Some(list) = core.child(SyntaxKind::AttributeList) {
                    attributes.extend(list.child_nodes().map(|a| node::attribute(a).name));
                }
                is_inout |= core.has_token("inout");
                core.child_type()
            }
            SyntaxKind::OptionalType | SyntaxKind::ImplicitlyUnwrappedOptionalType => {
                core.child_type()
            }
            SyntaxKind::TupleType => transparent_element(core),
            _ => None,
        };
        match next {
            Some(inner) => core = inner,
            None => {
                return Peeled {
                    core,
                    attributes,
                    is_inout,
                }
            }
        }
    }
}

/// Element types of a tuple or function type's parenthesized list.
pub(crate) fn element_types<'t>(node: NodeRef<'t>) -> impl Iterator<Item = NodeRef<'t>> {
    node.child(SyntaxKind::TupleTypeElementList)
        .into_iter()
        .flat_map(|list| list.child_nodes())
        .filter_map(|element| element.child_type())
}

/// The sole element type of a transparent tuple.
pub(crate) fn transparent_element(tuple: NodeRef<'_>) -> Option<NodeRef<'_>> {
    if tuple.kind() != SyntaxKind::TupleType {
        return None;
    }
    let list = tuple.child(SyntaxKind::TupleTypeElementList)?;
    let mut elements = list.child_nodes();
    let element = elements.next()?;
    if elements.next().is_some() {
        return None;
    }
    let labels = element_labels(element);
    if !labels.name.is_empty() || labels.variadic || labels.default_argument.is_some() {
        return None;
    }
    let inner = element.child_type()?;
    if is_void_spelling(inner.text()) {
        return None;
    }
    Some(inner)
}

/// `node` with any leading attributes and specifiers removed.
pub(crate) fn strip_leading_attributes(mut node: NodeRef<'_>) -> NodeRef<'_> {
    while node.kind() == SyntaxKind::AttributedType {
        match node.child_type() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn is_void_core(core: NodeRef<'_>) -> bool {
    if is_void_spelling(core.text()) {
        return true;
    }
    core.kind() == SyntaxKind::TupleType && element_types(core).next().is_none()
}

fn is_optional(core: NodeRef<'_>) -> bool {
    let mut current = core;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            SyntaxKind::OptionalType | SyntaxKind::ImplicitlyUnwrappedOptionalType => return true,
            SyntaxKind::AttributedType => current = parent,
            SyntaxKind::TupleTypeElement => {
                let Some(tuple) = parent.parent().and_then(|list| list.parent()) else {
                    return false;
                };
                if transparent_element(tuple).is_none() {
                    return false;
                }
                current = tuple;
            }
            _ => return false,
        }
    }
    false
}

fn is_result(core: NodeRef<'_>) -> bool {
    core.first_token().is_some_and(|t| t.text() == "Result")
        && core.child(SyntaxKind::GenericArgumentClause).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::decompose_type;

    fn fields(source: &str) -> ParameterFields {
        decompose_type(source).unwrap().fields().clone()
    }

    mod peel_tests {
        use super::*;

        #[test]
        fn redundant_parentheses_are_transparent() {
            let descriptor = decompose_type("((Int))").unwrap();
            assert!(descriptor.as_standard().is_some());
            assert_eq!(descriptor.type_text(), "((Int))");
        }

        #[test]
        fn labeled_single_element_is_a_tuple() {
            let descriptor = decompose_type("(count: Int)").unwrap();
            let tuple = descriptor.as_tuple().unwrap();
            assert_eq!(tuple.arguments.len(), 1);
            assert_eq!(tuple.arguments[0].fields().name, "count");
        }

        #[test]
        fn inout_and_attributes() {
            let f = fields("inout [Int]");
            assert!(f.is_inout);
            assert_eq!(f.type_without_attributes, "[Int]");

            let f = fields("@escaping @Sendable () -> Void");
            assert_eq!(f.attributes, vec!["escaping", "Sendable"]);
            assert_eq!(f.type_without_attributes, "() -> Void");
            assert!(!f.is_inout);
        }
    }

    mod optional_tests {
        use super::*;

        #[test]
        fn optional_standard() {
            assert!(fields("Int?").is_optional);
            assert!(fields("Int!").is_optional);
            assert!(fields("(Int)?").is_optional);
            assert!(!fields("[Int?]").is_optional);
        }

        #[test]
        fn optional_closure_is_not_confused_with_optional_output() {
            let descriptor = decompose_type("() -> Int?").unwrap();
            let closure = descriptor.as_closure().unwrap();
            assert!(!closure.fields.is_optional);
            assert!(closure.outputs[0].is_optional());
        }

        #[test]
        fn multi_element_tuple_stops_the_walk() {
            let descriptor = decompose_type("(Int, String)?").unwrap();
            let tuple = descriptor.as_tuple().unwrap();
            assert!(tuple.fields.is_optional);
            assert!(!tuple.arguments[0].is_optional());
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn void_sentinel_is_standard() {
            for spelling in ["()", "Void", "(Void)", "(())", "Void?"] {
                let descriptor = decompose_type(spelling).unwrap();
                assert!(descriptor.as_standard().is_some(), "{}", spelling);
            }
        }

        #[test]
        fn result_arguments_are_decomposed() {
            let descriptor = decompose_type("Result<[User], (Error) -> Void>").unwrap();
            let standard = descriptor.as_standard().unwrap();
            assert_eq!(standard.parameters.len(), 2);
            assert_eq!(standard.parameters[0].type_text(), "[User]");
            assert!(standard.parameters[1].as_closure().is_some());
        }

        #[test]
        fn other_generics_are_flat() {
            let descriptor = decompose_type("Array<(Int) -> Void>").unwrap();
            assert!(descriptor.as_standard().unwrap().parameters.is_empty());
        }

        #[test]
        fn unsupported_shapes_degrade_to_standard() {
            for source in ["some View", "any Error & Sendable", "Int.Type"] {
                let descriptor = decompose_type(source).unwrap();
                assert_eq!(descriptor.type_text(), source);
                assert!(descriptor.as_standard().is_some());
            }
        }
    }
}
