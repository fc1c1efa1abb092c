// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node and token kind discriminators.

use std::fmt;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain, backticked (`` `default` ``) or dollar (`$0`) identifier.
    Identifier,
    /// Reserved word.
    Keyword,
    /// Integer literal, including hex/octal/binary forms.
    IntegerLiteral,
    /// Floating point literal.
    FloatLiteral,
    /// String literal of any flavor (single line, multi-line, raw).
    StringLiteral,
    /// `#if`, `#else`, `#available`, ...
    PoundDirective,
    /// `@`
    At,
    /// `->`
    Arrow,
    /// `...`
    Ellipsis,
    /// `\` (key paths)
    Backslash,
    /// Any other single punctuation or operator character.
    Punct,
}

/// Words the tokenizer classifies as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "associatedtype",
    "class",
    "deinit",
    "enum",
    "extension",
    "fileprivate",
    "func",
    "import",
    "init",
    "inout",
    "internal",
    "let",
    "open",
    "operator",
    "private",
    "precedencegroup",
    "protocol",
    "public",
    "rethrows",
    "static",
    "struct",
    "subscript",
    "typealias",
    "var",
    "break",
    "case",
    "catch",
    "continue",
    "default",
    "defer",
    "do",
    "else",
    "fallthrough",
    "for",
    "guard",
    "if",
    "in",
    "repeat",
    "return",
    "throw",
    "switch",
    "where",
    "while",
    "Any",
    "as",
    "false",
    "is",
    "nil",
    "self",
    "Self",
    "super",
    "throws",
    "true",
    "try",
];

/// Returns true if `word` is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Node kinds produced by the parser.
///
/// Names follow SwiftSyntax conventions so that the extraction layer reads
/// like the grammar it walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Roots
    SourceFile,
    TypeRoot,

    // Declarations
    ImportDecl,
    ClassDecl,
    StructDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
    FunctionDecl,
    InitializerDecl,
    DeinitializerDecl,
    SubscriptDecl,
    VariableDecl,
    TypealiasDecl,
    AssociatedTypeDecl,
    EnumCaseDecl,
    OperatorDecl,
    PrecedenceGroupDecl,
    IfConfigDecl,

    // Declaration parts
    IfConfigClause,
    IfConfigCondition,
    AttributeList,
    Attribute,
    AttributeArguments,
    ModifierList,
    DeclModifier,
    Name,
    ImportPath,
    MemberBlock,
    CodeBlock,
    AccessorBlock,
    OpaqueBlock,
    GenericParameterClause,
    GenericParameter,
    GenericWhereClause,
    InheritanceClause,
    InheritedType,
    FunctionSignature,
    ParameterClause,
    FunctionParameter,
    EffectSpecifiers,
    ReturnClause,
    PatternBinding,
    Pattern,
    TypeAnnotation,
    TypeInitializer,
    InitializerClause,
    EnumCaseElement,
    EnumCaseParameterClause,
    EnumCaseParameter,
    OperatorPrecedence,

    // Opaque runs
    Expr,
    Statement,

    // Types
    IdentifierType,
    MemberType,
    GenericArgumentClause,
    GenericArgument,
    OptionalType,
    ImplicitlyUnwrappedOptionalType,
    ArrayType,
    DictionaryType,
    TupleType,
    TupleTypeElementList,
    TupleTypeElement,
    FunctionType,
    AttributedType,
    SomeOrAnyType,
    CompositionType,
    MetatypeType,
    SuppressedType,
}

impl SyntaxKind {
    /// Returns true for nodes that denote a type expression.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierType
                | SyntaxKind::MemberType
                | SyntaxKind::OptionalType
                | SyntaxKind::ImplicitlyUnwrappedOptionalType
                | SyntaxKind::ArrayType
                | SyntaxKind::DictionaryType
                | SyntaxKind::TupleType
                | SyntaxKind::FunctionType
                | SyntaxKind::AttributedType
                | SyntaxKind::SomeOrAnyType
                | SyntaxKind::CompositionType
                | SyntaxKind::MetatypeType
                | SyntaxKind::SuppressedType
        )
    }

    /// Returns true for both optional wrappers (`T?` and `T!`).
    pub fn is_optional_wrapper(self) -> bool {
        matches!(
            self,
            SyntaxKind::OptionalType | SyntaxKind::ImplicitlyUnwrappedOptionalType
        )
    }

    /// Returns true for declarations that own a member block.
    pub fn is_container_decl(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDecl
                | SyntaxKind::StructDecl
                | SyntaxKind::EnumDecl
                | SyntaxKind::ActorDecl
                | SyntaxKind::ProtocolDecl
                | SyntaxKind::ExtensionDecl
        )
    }

    /// Returns true for every declaration kind.
    pub fn is_decl(self) -> bool {
        matches!(
            self,
            SyntaxKind::ImportDecl
                | SyntaxKind::ClassDecl
                | SyntaxKind::StructDecl
                | SyntaxKind::EnumDecl
                | SyntaxKind::ActorDecl
                | SyntaxKind::ProtocolDecl
                | SyntaxKind::ExtensionDecl
                | SyntaxKind::FunctionDecl
                | SyntaxKind::InitializerDecl
                | SyntaxKind::DeinitializerDecl
                | SyntaxKind::SubscriptDecl
                | SyntaxKind::VariableDecl
                | SyntaxKind::TypealiasDecl
                | SyntaxKind::AssociatedTypeDecl
                | SyntaxKind::EnumCaseDecl
                | SyntaxKind::OperatorDecl
                | SyntaxKind::PrecedenceGroupDecl
                | SyntaxKind::IfConfigDecl
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_are_decls() {
        for kind in [
            SyntaxKind::ClassDecl,
            SyntaxKind::StructDecl,
            SyntaxKind::EnumDecl,
            SyntaxKind::ActorDecl,
            SyntaxKind::ProtocolDecl,
            SyntaxKind::ExtensionDecl,
        ] {
            assert!(kind.is_container_decl());
            assert!(kind.is_decl());
            assert!(!kind.is_type());
        }
        assert!(!SyntaxKind::FunctionDecl.is_container_decl());
    }

    #[test]
    fn optional_wrappers() {
        assert!(SyntaxKind::OptionalType.is_optional_wrapper());
        assert!(SyntaxKind::ImplicitlyUnwrappedOptionalType.is_optional_wrapper());
        assert!(!SyntaxKind::TupleType.is_optional_wrapper());
    }

    #[test]
    fn keyword_lookup() {
        assert!(is_keyword("func"));
        assert!(is_keyword("Self"));
        assert!(!is_keyword("actor"));
        assert!(!is_keyword("escaping"));
    }
}
