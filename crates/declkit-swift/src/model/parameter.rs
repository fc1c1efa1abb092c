// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parameter descriptors: the normalized form of a type annotation.
//!
//! A [`ParameterDescriptor`] is one of three variants. Every variant carries
//! the same [`ParameterFields`] (labels, type text, optionality); tuples and
//! closures add their nested descriptor lists.
//!
//! Nested lists serialize through [`crate::codec::ordered`] so that element
//! order survives a round trip even though the variants are mixed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec;

/// Fields shared by every descriptor variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterFields {
    /// Attribute names without the `@` (`escaping`, `Sendable`, ...).
    pub attributes: Vec<String>,
    /// First (external) name, `_` when the label is omitted, empty if none.
    pub name: String,
    /// Second (internal) name, empty if none.
    pub second_name: String,
    /// Source text of the annotation.
    #[serde(rename = "type")]
    pub type_text: String,
    pub variadic: bool,
    pub default_argument: Option<String>,
    pub is_inout: bool,
    pub is_optional: bool,
    pub preferred_name: Option<String>,
    /// Type text with leading attributes and specifiers removed.
    pub type_without_attributes: String,
    pub is_label_omitted: bool,
}

impl ParameterFields {
    /// Fields for an unlabeled annotation.
    pub fn new(type_text: impl Into<String>) -> Self {
        let type_text = type_text.into();
        ParameterFields {
            type_without_attributes: type_text.clone(),
            type_text,
            ..Default::default()
        }
    }

    /// Set both names and recompute the name-derived fields.
    pub fn with_names(mut self, name: impl Into<String>, second_name: impl Into<String>) -> Self {
        self.name = name.into();
        self.second_name = second_name.into();
        self.is_label_omitted = self.name == "_";
        self.preferred_name = preferred_name(&self.name, &self.second_name);
        self
    }
}

/// The documentation name of a parameter: the second name wins, then the
/// first name unless it is the `_` placeholder.
pub fn preferred_name(name: &str, second_name: &str) -> Option<String> {
    if !second_name.is_empty() {
        Some(second_name.to_string())
    } else if !name.is_empty() && name != "_" {
        Some(name.to_string())
    } else {
        None
    }
}

/// A simple named type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardParameter {
    #[serde(flatten)]
    pub fields: ParameterFields,
    /// Decomposed generic arguments of a `Result<Success, Failure>`;
    /// empty for every other type.
    #[serde(with = "codec::ordered", default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// A parenthesized group of possibly labeled elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleParameter {
    #[serde(flatten)]
    pub fields: ParameterFields,
    #[serde(with = "codec::ordered", default)]
    pub arguments: Vec<ParameterDescriptor>,
}

/// A function type, split into its input and output sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureParameter {
    #[serde(flatten)]
    pub fields: ParameterFields,
    #[serde(with = "codec::ordered", default)]
    pub inputs: Vec<ParameterDescriptor>,
    #[serde(with = "codec::ordered", default)]
    pub outputs: Vec<ParameterDescriptor>,
    pub is_void_input: bool,
    pub is_void_output: bool,
    pub is_escaping: bool,
    /// An optional closure escapes without an explicit attribute.
    pub is_auto_escaping: bool,
    pub is_async: bool,
    pub is_throwing: bool,
    /// Text of the parenthesized input list.
    pub input_type: String,
    /// Text of the return type.
    pub output_type: String,
    /// Text of the whole function type.
    pub declaration_text: String,
}

impl ClosureParameter {
    /// Parenthesized, comma-joined descriptions of the inputs.
    pub fn raw_input(&self) -> String {
        join_descriptions(&self.inputs)
    }

    /// Parenthesized, comma-joined descriptions of the outputs.
    pub fn raw_output(&self) -> String {
        join_descriptions(&self.outputs)
    }
}

fn join_descriptions(list: &[ParameterDescriptor]) -> String {
    let parts: Vec<String> = list.iter().map(|p| p.to_string()).collect();
    format!("({})", parts.join(", "))
}

/// Normalized description of one type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum ParameterDescriptor {
    Standard(StandardParameter),
    Tuple(TupleParameter),
    Closure(ClosureParameter),
}

impl ParameterDescriptor {
    pub fn fields(&self) -> &ParameterFields {
        match self {
            ParameterDescriptor::Standard(p) => &p.fields,
            ParameterDescriptor::Tuple(p) => &p.fields,
            ParameterDescriptor::Closure(p) => &p.fields,
        }
    }

    /// Serialized tag: `standard`, `tuple` or `closure`.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ParameterDescriptor::Standard(_) => "standard",
            ParameterDescriptor::Tuple(_) => "tuple",
            ParameterDescriptor::Closure(_) => "closure",
        }
    }

    pub fn type_text(&self) -> &str {
        &self.fields().type_text
    }

    pub fn is_optional(&self) -> bool {
        self.fields().is_optional
    }

    pub fn as_closure(&self) -> Option<&ClosureParameter> {
        match self {
            ParameterDescriptor::Closure(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&TupleParameter> {
        match self {
            ParameterDescriptor::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_standard(&self) -> Option<&StandardParameter> {
        match self {
            ParameterDescriptor::Standard(s) => Some(s),
            _ => None,
        }
    }
}

/// `name second: Type... = default` for labeled elements, the type text
/// otherwise.
impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields();
        match (fields.name.is_empty(), fields.second_name.is_empty()) {
            (true, _) => write!(f, "{}", fields.type_text)?,
            (false, true) => write!(f, "{}: {}", fields.name, fields.type_text)?,
            (false, false) => write!(
                f,
                "{} {}: {}",
                fields.name, fields.second_name, fields.type_text
            )?,
        }
        if fields.variadic {
            write!(f, "...")?;
        }
        if let Some(default) = &fields.default_argument {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod name_tests {
        use super::*;

        #[test]
        fn second_name_wins() {
            let fields = ParameterFields::new("Int").with_names("_", "count");
            assert!(fields.is_label_omitted);
            assert_eq!(fields.preferred_name.as_deref(), Some("count"));
        }

        #[test]
        fn first_name_fallback() {
            let fields = ParameterFields::new("Int").with_names("count", "");
            assert!(!fields.is_label_omitted);
            assert_eq!(fields.preferred_name.as_deref(), Some("count"));
        }

        #[test]
        fn placeholder_alone_has_no_preferred_name() {
            let fields = ParameterFields::new("Int").with_names("_", "");
            assert!(fields.is_label_omitted);
            assert_eq!(fields.preferred_name, None);
        }

        #[test]
        fn unlabeled() {
            let fields = ParameterFields::new("Int");
            assert!(!fields.is_label_omitted);
            assert_eq!(fields.preferred_name, None);
            assert_eq!(fields.type_without_attributes, "Int");
        }
    }

    mod display_tests {
        use super::*;

        fn standard(fields: ParameterFields) -> ParameterDescriptor {
            ParameterDescriptor::Standard(StandardParameter {
                fields,
                parameters: Vec::new(),
            })
        }

        #[test]
        fn labeled_forms() {
            assert_eq!(standard(ParameterFields::new("Int")).to_string(), "Int");
            assert_eq!(
                standard(ParameterFields::new("Int").with_names("count", "")).to_string(),
                "count: Int"
            );
            assert_eq!(
                standard(ParameterFields::new("Int").with_names("_", "count")).to_string(),
                "_ count: Int"
            );
        }

        #[test]
        fn variadic_and_default() {
            let mut fields = ParameterFields::new("Int").with_names("values", "");
            fields.variadic = true;
            assert_eq!(standard(fields).to_string(), "values: Int...");

            let mut fields = ParameterFields::new("Bool").with_names("animated", "");
            fields.default_argument = Some("true".to_string());
            assert_eq!(standard(fields).to_string(), "animated: Bool = true");
        }

        #[test]
        fn raw_input_joins_descriptions() {
            let closure = ClosureParameter {
                inputs: vec![
                    standard(ParameterFields::new("String")),
                    standard(ParameterFields::new("Int").with_names("_", "age")),
                ],
                ..Default::default()
            };
            assert_eq!(closure.raw_input(), "(String, _ age: Int)");
            assert_eq!(closure.raw_output(), "()");
        }
    }
}
