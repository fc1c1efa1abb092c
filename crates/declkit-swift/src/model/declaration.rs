// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration records and the per-file collection they are grouped in.

use std::fmt;
use std::hash::{Hash, Hasher};

use declkit_core::text::{SourceLocation, Span};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::model::parameter::ParameterDescriptor;

/// `@name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Text between the parentheses, if any.
    pub arguments: Option<String>,
}

/// `name(detail)`, e.g. `private(set)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub detail: Option<String>,
}

/// `<Name: Constraint>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericParameter {
    pub name: String,
    pub constraint: Option<String>,
}

/// The nearest enclosing container of a declaration.
///
/// Equality and hashing use `keyword` and `name` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
}

impl PartialEq for Owner {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword && self.name == other.name
    }
}

impl Eq for Owner {}

impl Hash for Owner {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyword.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.name)
    }
}

/// Fields every declaration record starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationHeader {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub owner: Option<Owner>,
    /// Byte span of the declaration node.
    pub span: Span,
    /// Filled in by [`crate::locate::locate`]; empty until then.
    pub start_location: SourceLocation,
    pub end_location: SourceLocation,
}

impl DeclarationHeader {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

// ============================================================================
// Records
// ============================================================================

/// class, struct, enum, actor, protocol or extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub generic_parameters: Vec<GenericParameter>,
    pub inherited_types: Vec<String>,
    pub where_clause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(with = "codec::ordered")]
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<String>,
    #[serde(with = "codec::ordered")]
    pub returns: Vec<ParameterDescriptor>,
    pub is_void_return: bool,
    pub is_async: bool,
    pub is_throwing: bool,
    pub where_clause: Option<String>,
    pub has_body: bool,
}

impl FunctionDeclaration {
    /// `name(label:label:)`, using `_` for omitted labels.
    pub fn selector(&self) -> String {
        let labels: String = self
            .parameters
            .iter()
            .map(|p| format!("{}:", p.fields().name))
            .collect();
        format!("{}({})", self.header.name, labels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializerDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    /// `init?` or `init!`.
    pub is_failable: bool,
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(with = "codec::ordered")]
    pub parameters: Vec<ParameterDescriptor>,
    pub is_async: bool,
    pub is_throwing: bool,
    pub where_clause: Option<String>,
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeinitializerDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(with = "codec::ordered")]
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<String>,
    #[serde(with = "codec::ordered")]
    pub returns: Vec<ParameterDescriptor>,
    pub accessors: Vec<String>,
}

/// One binding of a `var`/`let` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub type_annotation: Option<ParameterDescriptor>,
    pub initializer: Option<String>,
    /// `get`, `set`, `willSet`, `didSet`, ...
    pub accessors: Vec<String>,
    pub is_computed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypealiasDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub generic_parameters: Vec<GenericParameter>,
    pub aliased: ParameterDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedTypeDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub inherited_types: Vec<String>,
    pub default_type: Option<String>,
}

/// One element of a `case` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumCaseDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    #[serde(with = "codec::ordered")]
    pub associated_values: Vec<ParameterDescriptor>,
    pub raw_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    /// `struct` in `import struct Foundation.Date`.
    pub import_kind: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    /// `prefix`, `infix` or `postfix`.
    pub fixity: Option<String>,
    pub precedence_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceGroupDeclaration {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    pub body: String,
}

/// A `#if` block. Its keyword is `#if` and its name is the first condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBlock {
    #[serde(flatten)]
    pub header: DeclarationHeader,
    /// `#if DEBUG`, `#elseif os(iOS)`, `#else`.
    pub clauses: Vec<String>,
}

// ============================================================================
// Kinds
// ============================================================================

/// The collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Type,
    Function,
    Initializer,
    Deinitializer,
    Subscript,
    Variable,
    Typealias,
    AssociatedType,
    EnumCase,
    Import,
    Operator,
    PrecedenceGroup,
    ConditionalBlock,
}

impl DeclarationKind {
    pub const ALL: [DeclarationKind; 13] = [
        DeclarationKind::Type,
        DeclarationKind::Function,
        DeclarationKind::Initializer,
        DeclarationKind::Deinitializer,
        DeclarationKind::Subscript,
        DeclarationKind::Variable,
        DeclarationKind::Typealias,
        DeclarationKind::AssociatedType,
        DeclarationKind::EnumCase,
        DeclarationKind::Import,
        DeclarationKind::Operator,
        DeclarationKind::PrecedenceGroup,
        DeclarationKind::ConditionalBlock,
    ];

    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Type => "type",
            DeclarationKind::Function => "function",
            DeclarationKind::Initializer => "initializer",
            DeclarationKind::Deinitializer => "deinitializer",
            DeclarationKind::Subscript => "subscript",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Typealias => "typealias",
            DeclarationKind::AssociatedType => "associated_type",
            DeclarationKind::EnumCase => "enum_case",
            DeclarationKind::Import => "import",
            DeclarationKind::Operator => "operator",
            DeclarationKind::PrecedenceGroup => "precedence_group",
            DeclarationKind::ConditionalBlock => "conditional_block",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access to the shared header of any record.
pub trait Declaration {
    const KIND: DeclarationKind;

    fn header(&self) -> &DeclarationHeader;

    fn header_mut(&mut self) -> &mut DeclarationHeader;
}

macro_rules! impl_declaration {
    ($($record:ty => $kind:ident),* $(,)?) => {
        $(
            impl Declaration for $record {
                const KIND: DeclarationKind = DeclarationKind::$kind;

                fn header(&self) -> &DeclarationHeader {
                    &self.header
                }

                fn header_mut(&mut self) -> &mut DeclarationHeader {
                    &mut self.header
                }
            }
        )*
    };
}

impl_declaration! {
    TypeDeclaration => Type,
    FunctionDeclaration => Function,
    InitializerDeclaration => Initializer,
    DeinitializerDeclaration => Deinitializer,
    SubscriptDeclaration => Subscript,
    VariableDeclaration => Variable,
    TypealiasDeclaration => Typealias,
    AssociatedTypeDeclaration => AssociatedType,
    EnumCaseDeclaration => EnumCase,
    ImportDeclaration => Import,
    OperatorDeclaration => Operator,
    PrecedenceGroupDeclaration => PrecedenceGroup,
    ConditionalBlock => ConditionalBlock,
}

// ============================================================================
// Per-file collection
// ============================================================================

/// Every declaration of one file, grouped by kind in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeclarations {
    pub types: Vec<TypeDeclaration>,
    pub functions: Vec<FunctionDeclaration>,
    pub initializers: Vec<InitializerDeclaration>,
    pub deinitializers: Vec<DeinitializerDeclaration>,
    pub subscripts: Vec<SubscriptDeclaration>,
    pub variables: Vec<VariableDeclaration>,
    pub typealiases: Vec<TypealiasDeclaration>,
    pub associated_types: Vec<AssociatedTypeDeclaration>,
    pub enum_cases: Vec<EnumCaseDeclaration>,
    pub imports: Vec<ImportDeclaration>,
    pub operators: Vec<OperatorDeclaration>,
    pub precedence_groups: Vec<PrecedenceGroupDeclaration>,
    pub conditional_blocks: Vec<ConditionalBlock>,
}

fn headers_of<D: Declaration>(records: &[D]) -> Vec<&DeclarationHeader> {
    records.iter().map(Declaration::header).collect()
}

fn each_header_mut<D: Declaration>(records: &mut [D], f: &mut impl FnMut(&mut DeclarationHeader)) {
    for record in records {
        f(record.header_mut());
    }
}

impl FileDeclarations {
    /// Headers of every record of `kind`, in source order.
    pub fn headers(&self, kind: DeclarationKind) -> Vec<&DeclarationHeader> {
        match kind {
            DeclarationKind::Type => headers_of(&self.types),
            DeclarationKind::Function => headers_of(&self.functions),
            DeclarationKind::Initializer => headers_of(&self.initializers),
            DeclarationKind::Deinitializer => headers_of(&self.deinitializers),
            DeclarationKind::Subscript => headers_of(&self.subscripts),
            DeclarationKind::Variable => headers_of(&self.variables),
            DeclarationKind::Typealias => headers_of(&self.typealiases),
            DeclarationKind::AssociatedType => headers_of(&self.associated_types),
            DeclarationKind::EnumCase => headers_of(&self.enum_cases),
            DeclarationKind::Import => headers_of(&self.imports),
            DeclarationKind::Operator => headers_of(&self.operators),
            DeclarationKind::PrecedenceGroup => headers_of(&self.precedence_groups),
            DeclarationKind::ConditionalBlock => headers_of(&self.conditional_blocks),
        }
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: DeclarationKind) -> usize {
        self.headers(kind).len()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        DeclarationKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to every header, kind by kind.
    pub fn for_each_header_mut(&mut self, mut f: impl FnMut(&mut DeclarationHeader)) {
        each_header_mut(&mut self.types, &mut f);
        each_header_mut(&mut self.functions, &mut f);
        each_header_mut(&mut self.initializers, &mut f);
        each_header_mut(&mut self.deinitializers, &mut f);
        each_header_mut(&mut self.subscripts, &mut f);
        each_header_mut(&mut self.variables, &mut f);
        each_header_mut(&mut self.typealiases, &mut f);
        each_header_mut(&mut self.associated_types, &mut f);
        each_header_mut(&mut self.enum_cases, &mut f);
        each_header_mut(&mut self.imports, &mut f);
        each_header_mut(&mut self.operators, &mut f);
        each_header_mut(&mut self.precedence_groups, &mut f);
        each_header_mut(&mut self.conditional_blocks, &mut f);
    }
}
