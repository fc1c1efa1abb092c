// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Closure assembly: splitting a function type at its arrow.

use declkit_syntax::{NodeRef, SyntaxKind};

use super::decompose::{decompose, element_types, strip_leading_attributes};
use super::void::is_void_spelling;
use crate::model::{ClosureParameter, ParameterDescriptor, ParameterFields};

/// Decomposed parameter list before the arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSide {
    pub inputs: Vec<ParameterDescriptor>,
    /// Text of the parenthesized list.
    pub input_type: String,
    pub is_void: bool,
}

/// Decomposed return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSide {
    pub outputs: Vec<ParameterDescriptor>,
    /// Text of the return type; empty when there is none.
    pub output_type: String,
    pub is_void: bool,
}

/// Build the closure descriptor for `function`, a `FunctionType` node,
/// around the already computed shared `fields`.
pub fn assemble(function: NodeRef<'_>, fields: ParameterFields) -> ClosureParameter {
    let input = input_side(function);
    let output = output_side(function.child_type());
    let (is_async, is_throwing) = effects(function.child(SyntaxKind::EffectSpecifiers));
    let is_escaping = fields.attributes.iter().any(|a| a == "escaping");
    ClosureParameter {
        is_auto_escaping: fields.is_optional,
        is_escaping,
        fields,
        inputs: input.inputs,
        outputs: output.outputs,
        is_void_input: input.is_void,
        is_void_output: output.is_void,
        is_async,
        is_throwing,
        input_type: input.input_type,
        output_type: output.output_type,
        declaration_text: function.text().to_string(),
    }
}

/// An empty list or a single void-spelling element is a void input.
pub fn input_side(function: NodeRef<'_>) -> InputSide {
    let types: Vec<NodeRef<'_>> = element_types(function).collect();
    let is_void = match types.as_slice() {
        [] => true,
        [only] => is_void_spelling(strip_leading_attributes(*only).text()),
        _ => false,
    };
    InputSide {
        inputs: if is_void {
            Vec::new()
        } else {
            types.into_iter().map(decompose).collect()
        },
        input_type: parenthesized_text(function),
        is_void,
    }
}

/// A tuple return type is a result-list container: its elements are
/// spliced into the outputs. Any other type is the single output.
pub fn output_side(return_type: Option<NodeRef<'_>>) -> OutputSide {
    let Some(ret) = return_type else {
        return OutputSide {
            outputs: Vec::new(),
            output_type: String::new(),
            is_void: true,
        };
    };
    let output_type = ret.text().to_string();
    if is_void_spelling(strip_leading_attributes(ret).text()) {
        return OutputSide {
            outputs: Vec::new(),
            output_type,
            is_void: true,
        };
    }
    let outputs = if ret.kind() == SyntaxKind::TupleType {
        element_types(ret).map(decompose).collect()
    } else {
        vec![decompose(ret)]
    };
    OutputSide {
        outputs,
        output_type,
        is_void: false,
    }
}

/// `(is_async, is_throwing)` from an effect specifier node.
pub fn effects(specifiers: Option<NodeRef<'_>>) -> (bool, bool) {
    let Some(specifiers) = specifiers else {
        return (false, false);
    };
    let mut is_async = false;
    let mut is_throwing = false;
    for token in specifiers.child_tokens() {
        match token.text() {
            "async" | "reasync" => is_async = true,
            "throws" | "rethrows" => is_throwing = true,
            _ => {}
        }
    }
    (is_async, is_throwing)
}

/// Text from the function type's `(` through its matching `)`.
fn parenthesized_text(function: NodeRef<'_>) -> String {
    let (Some(open), Some(close)) = (function.first_token(), function.token_with_text(")")) else {
        return String::new();
    };
    function
        .tree()
        .source()
        .get(open.span().start..close.span().end)
        .unwrap_or_default()
        .to_string()
}
