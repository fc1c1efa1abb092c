// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration parsing.

use super::{PResult, Parser};
use crate::kind::{SyntaxKind, TokenKind};

/// Words that introduce a declaration.
const DECL_KEYWORDS: &[&str] = &[
    "import",
    "class",
    "struct",
    "enum",
    "actor",
    "protocol",
    "extension",
    "func",
    "init",
    "deinit",
    "subscript",
    "var",
    "let",
    "typealias",
    "associatedtype",
    "case",
    "operator",
    "precedencegroup",
];

/// Declaration modifiers.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "package",
    "static",
    "class",
    "final",
    "override",
    "mutating",
    "nonmutating",
    "lazy",
    "weak",
    "unowned",
    "dynamic",
    "optional",
    "required",
    "convenience",
    "indirect",
    "prefix",
    "postfix",
    "infix",
    "nonisolated",
    "distributed",
    "consuming",
    "borrowing",
    "__consuming",
    "isolated",
];

/// Modifiers that accept a parenthesized detail, as in `private(set)`.
const DETAIL_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "package",
    "unowned",
    "nonisolated",
];

/// Details accepted inside a modifier's parentheses.
const MODIFIER_DETAILS: &[&str] = &["set", "safe", "unsafe"];

/// Member keywords that can follow the `class` modifier.
const CLASS_MEMBER_KEYWORDS: &[&str] = &["func", "var", "let", "subscript", "typealias", "init"];

const IMPORT_KINDS: &[&str] = &[
    "typealias", "struct", "class", "enum", "protocol", "let", "var", "func",
];

impl<'s> Parser<'s> {
    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    /// If a declaration starts at the cursor, the index of its keyword.
    ///
    /// Attributes come first, then modifiers.
    pub(super) fn declaration_keyword_pos(&self) -> Option<usize> {
        let mut i = self.pos;
        while self.kind_at(i) == Some(TokenKind::At) {
            i = self.skip_attribute_at(i)?;
        }
        while let Some(next) = self.modifier_end_at(i) {
            i = next;
        }
        let keyword = self.text_at(i);
        if !self.is_word_at(i) || !DECL_KEYWORDS.contains(&keyword) {
            return None;
        }
        // `actor` is contextual: only a declaration when a name follows.
        if keyword == "actor" && !self.is_word_at(i + 1) {
            return None;
        }
        Some(i)
    }

    fn skip_attribute_at(&self, at: usize) -> Option<usize> {
        if !self.is_word_at(at + 1) {
            return None;
        }
        let mut i = at + 2;
        while self.text_at(i) == "." && self.is_word_at(i + 1) && self.adjacent_at(i) {
            i += 2;
        }
        if self.text_at(i) == "(" && self.adjacent_at(i) {
            i = self.skip_group_at(i)?;
        }
        Some(i)
    }

    /// Index past the modifier at `i`, if there is one.
    fn modifier_end_at(&self, i: usize) -> Option<usize> {
        let word = self.text_at(i);
        if !self.is_word_at(i) || !MODIFIERS.contains(&word) {
            return None;
        }
        let next = self.text_at(i + 1);
        if word == "class"
            && !(MODIFIERS.contains(&next) || CLASS_MEMBER_KEYWORDS.contains(&next))
        {
            return None;
        }
        if DETAIL_MODIFIERS.contains(&word)
            && next == "("
            && MODIFIER_DETAILS.contains(&self.text_at(i + 2))
            && self.text_at(i + 3) == ")"
        {
            return Some(i + 4);
        }
        Some(i + 1)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    pub(super) fn parse_declaration(&mut self, keyword_pos: usize) -> PResult<()> {
        let kind = match self.text_at(keyword_pos) {
            "import" => SyntaxKind::ImportDecl,
            "class" => SyntaxKind::ClassDecl,
            "struct" => SyntaxKind::StructDecl,
            "enum" => SyntaxKind::EnumDecl,
            "actor" => SyntaxKind::ActorDecl,
            "protocol" => SyntaxKind::ProtocolDecl,
            "extension" => SyntaxKind::ExtensionDecl,
            "func" => SyntaxKind::FunctionDecl,
            "init" => SyntaxKind::InitializerDecl,
            "deinit" => SyntaxKind::DeinitializerDecl,
            "subscript" => SyntaxKind::SubscriptDecl,
            "var" | "let" => SyntaxKind::VariableDecl,
            "typealias" => SyntaxKind::TypealiasDecl,
            "associatedtype" => SyntaxKind::AssociatedTypeDecl,
            "case" => SyntaxKind::EnumCaseDecl,
            "operator" => SyntaxKind::OperatorDecl,
            _ => SyntaxKind::PrecedenceGroupDecl,
        };

        self.start(kind);
        if self.at_kind(TokenKind::At) {
            self.parse_attribute_list()?;
        }
        if self.pos < keyword_pos {
            self.parse_modifier_list(keyword_pos);
        }
        self.bump(); // keyword

        match kind {
            SyntaxKind::ImportDecl => self.parse_import_rest()?,
            SyntaxKind::ClassDecl
            | SyntaxKind::StructDecl
            | SyntaxKind::EnumDecl
            | SyntaxKind::ActorDecl
            | SyntaxKind::ProtocolDecl => {
                self.parse_name()?;
                self.parse_type_decl_rest()?;
            }
            SyntaxKind::ExtensionDecl => {
                self.parse_type()?;
                self.parse_type_decl_rest()?;
            }
            SyntaxKind::FunctionDecl => self.parse_function_rest()?,
            SyntaxKind::InitializerDecl => self.parse_initializer_rest()?,
            SyntaxKind::DeinitializerDecl => {
                if self.at("{") {
                    self.parse_item_block(SyntaxKind::CodeBlock)?;
                }
            }
            SyntaxKind::SubscriptDecl => self.parse_subscript_rest()?,
            SyntaxKind::VariableDecl => self.parse_variable_rest()?,
            SyntaxKind::TypealiasDecl => self.parse_typealias_rest()?,
            SyntaxKind::AssociatedTypeDecl => self.parse_associated_type_rest()?,
            SyntaxKind::EnumCaseDecl => self.parse_enum_case_rest()?,
            SyntaxKind::OperatorDecl => self.parse_operator_rest()?,
            _ => {
                self.parse_name()?;
                self.start(SyntaxKind::OpaqueBlock);
                if !self.at("{") {
                    return Err(self.error_here("'{'"));
                }
                self.bump_group()?;
                self.finish_node();
            }
        }

        self.finish_node();
        Ok(())
    }

    pub(super) fn parse_attribute_list(&mut self) -> PResult<()> {
        self.start(SyntaxKind::AttributeList);
        while self.at_kind(TokenKind::At) {
            self.start(SyntaxKind::Attribute);
            self.bump();
            self.expect_word("attribute name")?;
            while self.at(".") && self.nth_is_word(1) && self.adjacent_at(self.pos) {
                self.bump();
                self.bump();
            }
            if self.at("(") && self.adjacent_at(self.pos) {
                self.start(SyntaxKind::AttributeArguments);
                self.bump_group()?;
                self.finish_node();
            }
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_modifier_list(&mut self, keyword_pos: usize) {
        self.start(SyntaxKind::ModifierList);
        while self.pos < keyword_pos {
            let end = self.modifier_end_at(self.pos).unwrap_or(self.pos + 1);
            self.start(SyntaxKind::DeclModifier);
            while self.pos < end {
                self.bump();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_name(&mut self) -> PResult<()> {
        self.start(SyntaxKind::Name);
        self.expect_word("name")?;
        self.finish_node();
        Ok(())
    }

    fn parse_import_rest(&mut self) -> PResult<()> {
        if IMPORT_KINDS.contains(&self.current_text()) && self.nth_is_word(1) {
            self.bump();
        }
        self.start(SyntaxKind::ImportPath);
        self.expect_word("module name")?;
        while self.at(".") && (self.nth_is_word(1) || self.kind_at(self.pos + 1) == Some(TokenKind::Punct)) {
            self.bump();
            self.bump();
        }
        self.finish_node();
        Ok(())
    }

    /// Clauses shared by nominal types and extensions, then the member block.
    fn parse_type_decl_rest(&mut self) -> PResult<()> {
        if self.at("<") {
            self.parse_generic_parameter_clause()?;
        }
        if self.at(":") {
            self.parse_inheritance_clause()?;
        }
        if self.at("where") {
            self.parse_where_clause()?;
        }
        self.parse_item_block(SyntaxKind::MemberBlock)
    }

    fn parse_function_rest(&mut self) -> PResult<()> {
        self.start(SyntaxKind::Name);
        if self.nth_is_word(0) {
            self.bump();
        } else {
            self.bump_operator_name()?;
        }
        self.finish_node();
        if self.at("<") {
            self.parse_generic_parameter_clause()?;
        }
        self.parse_function_signature()?;
        if self.at("where") {
            self.parse_where_clause()?;
        }
        if self.at("{") {
            self.parse_item_block(SyntaxKind::CodeBlock)?;
        }
        Ok(())
    }

    /// Operator names are runs of adjacent operator tokens.
    fn bump_operator_name(&mut self) -> PResult<()> {
        let is_operator_token = |parser: &Parser<'_>| match parser.kind_at(parser.pos) {
            Some(TokenKind::Punct) => !matches!(
                parser.current_text(),
                "(" | ")" | "[" | "]" | "{" | "}" | "," | ":" | ";"
            ),
            Some(TokenKind::Arrow | TokenKind::Ellipsis) => true,
            _ => false,
        };
        if !is_operator_token(self) {
            return Err(self.error_here("name"));
        }
        self.bump();
        while is_operator_token(self) && self.adjacent_at(self.pos) {
            self.bump();
        }
        Ok(())
    }

    fn parse_initializer_rest(&mut self) -> PResult<()> {
        if (self.at("?") || self.at("!")) && self.adjacent_at(self.pos) {
            self.bump();
        }
        if self.at("<") {
            self.parse_generic_parameter_clause()?;
        }
        self.parse_function_signature()?;
        if self.at("where") {
            self.parse_where_clause()?;
        }
        if self.at("{") {
            self.parse_item_block(SyntaxKind::CodeBlock)?;
        }
        Ok(())
    }

    fn parse_subscript_rest(&mut self) -> PResult<()> {
        if self.at("<") {
            self.parse_generic_parameter_clause()?;
        }
        self.parse_function_signature()?;
        if self.at("where") {
            self.parse_where_clause()?;
        }
        if self.at("{") {
            self.parse_accessor_block()?;
        }
        Ok(())
    }

    fn parse_accessor_block(&mut self) -> PResult<()> {
        self.start(SyntaxKind::AccessorBlock);
        self.bump_group()?;
        self.finish_node();
        Ok(())
    }

    fn parse_function_signature(&mut self) -> PResult<()> {
        self.start(SyntaxKind::FunctionSignature);
        self.parse_parameter_clause()?;
        if self.at_effect() {
            self.parse_effect_specifiers()?;
        }
        if self.at_kind(TokenKind::Arrow) {
            self.start(SyntaxKind::ReturnClause);
            self.bump();
            self.parse_type()?;
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_parameter_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::ParameterClause);
        self.expect("(")?;
        while !self.at(")") {
            if self.at_eof() {
                return Err(self.error_here("')'"));
            }
            self.parse_function_parameter()?;
        }
        self.bump();
        self.finish_node();
        Ok(())
    }

    /// `[attributes] name [second]: Type [...] [= default] [,]`
    fn parse_function_parameter(&mut self) -> PResult<()> {
        self.start(SyntaxKind::FunctionParameter);
        if self.at_kind(TokenKind::At) {
            self.parse_attribute_list()?;
        }
        self.expect_word("parameter name")?;
        if self.nth_is_word(0) {
            self.bump();
        }
        self.expect(":")?;
        self.parse_type()?;
        if self.at_kind(TokenKind::Ellipsis) {
            self.bump();
        }
        if self.at("=") {
            self.parse_initializer_clause()?;
        }
        if self.at(",") {
            self.bump();
        } else if !self.at(")") {
            return Err(self.error_here("',' or ')'"));
        }
        self.finish_node();
        Ok(())
    }

    pub(super) fn parse_initializer_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::InitializerClause);
        self.bump(); // =
        self.parse_expr()?;
        self.finish_node();
        Ok(())
    }

    fn parse_variable_rest(&mut self) -> PResult<()> {
        loop {
            self.parse_pattern_binding()?;
            if self.at(",") {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_pattern_binding(&mut self) -> PResult<()> {
        self.start(SyntaxKind::PatternBinding);
        self.start(SyntaxKind::Pattern);
        if self.at("(") {
            self.bump_group()?;
        } else {
            self.expect_word("pattern")?;
        }
        self.finish_node();
        if self.at(":") {
            self.start(SyntaxKind::TypeAnnotation);
            self.bump();
            self.parse_type()?;
            self.finish_node();
        }
        if self.at("=") {
            self.parse_initializer_clause()?;
        }
        if self.at("{") {
            self.parse_accessor_block()?;
        }
        self.finish_node();
        Ok(())
    }

    fn parse_type_initializer(&mut self) -> PResult<()> {
        self.start(SyntaxKind::TypeInitializer);
        self.expect("=")?;
        self.parse_type()?;
        self.finish_node();
        Ok(())
    }

    fn parse_typealias_rest(&mut self) -> PResult<()> {
        self.parse_name()?;
        if self.at("<") {
            self.parse_generic_parameter_clause()?;
        }
        self.parse_type_initializer()?;
        if self.at("where") {
            self.parse_where_clause()?;
        }
        Ok(())
    }

    fn parse_associated_type_rest(&mut self) -> PResult<()> {
        self.parse_name()?;
        if self.at(":") {
            self.parse_inheritance_clause()?;
        }
        if self.at("=") {
            self.parse_type_initializer()?;
        }
        if self.at("where") {
            self.parse_where_clause()?;
        }
        Ok(())
    }

    fn parse_enum_case_rest(&mut self) -> PResult<()> {
        loop {
            self.start(SyntaxKind::EnumCaseElement);
            self.parse_name()?;
            if self.at("(") {
                self.start(SyntaxKind::EnumCaseParameterClause);
                self.bump();
                while !self.at(")") {
                    if self.at_eof() {
                        return Err(self.error_here("')'"));
                    }
                    self.parse_tuple_element(SyntaxKind::EnumCaseParameter)?;
                }
                self.bump();
                self.finish_node();
            }
            if self.at("=") {
                self.parse_initializer_clause()?;
            }
            self.finish_node();
            if self.at(",") {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_operator_rest(&mut self) -> PResult<()> {
        self.start(SyntaxKind::Name);
        if self.nth_is_word(0) {
            self.bump();
        } else {
            self.bump_operator_name()?;
        }
        self.finish_node();
        if self.at(":") {
            self.start(SyntaxKind::OperatorPrecedence);
            self.bump();
            self.expect_word("precedence group")?;
            while self.at(",") {
                self.bump();
                self.expect_word("precedence group")?;
            }
            self.finish_node();
        }
        if self.at("{") {
            self.start(SyntaxKind::OpaqueBlock);
            self.bump_group()?;
            self.finish_node();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clauses
    // ------------------------------------------------------------------

    fn parse_generic_parameter_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::GenericParameterClause);
        self.bump(); // <
        while !self.at(">") {
            if self.at_eof() {
                return Err(self.error_here("'>'"));
            }
            self.start(SyntaxKind::GenericParameter);
            if self.at("each") && self.nth_is_word(1) {
                self.bump();
            }
            self.expect_word("generic parameter name")?;
            if self.at(":") {
                self.bump();
                self.parse_type()?;
            }
            if self.at(",") {
                self.bump();
            } else if !self.at(">") {
                return Err(self.error_here("',' or '>'"));
            }
            self.finish_node();
        }
        self.bump();
        self.finish_node();
        Ok(())
    }

    fn parse_inheritance_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::InheritanceClause);
        self.bump(); // :
        loop {
            self.start(SyntaxKind::InheritedType);
            self.parse_type()?;
            let more = self.at(",");
            if more {
                self.bump();
            }
            self.finish_node();
            if !more {
                break;
            }
        }
        self.finish_node();
        Ok(())
    }

    /// Requirements are kept as a flat token run. A line break ends the
    /// clause unless the previous line ended mid-requirement.
    fn parse_where_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::GenericWhereClause);
        self.bump(); // where
        let mut consumed = 0usize;
        let mut depth = 0usize;
        while !self.at_eof() {
            if depth == 0 {
                if self.at("{") || self.at("}") || self.at(";") || self.at_if_config_boundary() {
                    break;
                }
                let previous = self.text_at(self.pos - 1);
                if consumed > 0 && self.at_newline() && !matches!(previous, "," | ":" | "&" | "=") {
                    break;
                }
            }
            match self.current_text() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            consumed += 1;
        }
        if consumed == 0 {
            return Err(self.error_here("generic requirement"));
        }
        self.finish_node();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::kind::SyntaxKind;
    use crate::parser::parse_source;
    use crate::tree::NodeRef;

    fn only_decl(tree: &crate::tree::SyntaxTree) -> NodeRef<'_> {
        let mut decls = tree.root().child_nodes();
        let decl = decls.next().expect("one declaration");
        assert!(decls.next().is_none());
        decl
    }

    #[test]
    fn attributes_then_modifiers() {
        let tree = parse_source("@objc @available(iOS 13, *) public static func run() {}").unwrap();
        let decl = only_decl(&tree);
        assert_eq!(decl.kind(), SyntaxKind::FunctionDecl);
        let attrs = decl.child(SyntaxKind::AttributeList).unwrap();
        assert_eq!(attrs.child_nodes().count(), 2);
        let mods: Vec<_> = decl
            .child(SyntaxKind::ModifierList)
            .unwrap()
            .child_nodes()
            .map(|m| m.text())
            .collect();
        assert_eq!(mods, vec!["public", "static"]);
        assert_eq!(decl.child(SyntaxKind::Name).unwrap().text(), "run");
    }

    #[test]
    fn class_as_modifier_and_keyword() {
        let tree = parse_source("final class C { class func make() {} }").unwrap();
        let class = only_decl(&tree);
        assert_eq!(class.kind(), SyntaxKind::ClassDecl);
        let member = class
            .child(SyntaxKind::MemberBlock)
            .unwrap()
            .child_nodes()
            .next()
            .unwrap();
        assert_eq!(member.kind(), SyntaxKind::FunctionDecl);
        assert_eq!(member.child(SyntaxKind::ModifierList).unwrap().text(), "class");
    }

    #[test]
    fn modifier_detail() {
        let tree = parse_source("private(set) var count: Int = 0").unwrap();
        let decl = only_decl(&tree);
        let modifier = decl
            .child(SyntaxKind::ModifierList)
            .unwrap()
            .child(SyntaxKind::DeclModifier)
            .unwrap();
        assert_eq!(modifier.text(), "private(set)");
    }

    #[test]
    fn actor_needs_a_name() {
        let tree = parse_source("actor Counter {}\nactor.run()").unwrap();
        let kinds: Vec<_> = tree.root().child_nodes().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::ActorDecl, SyntaxKind::Statement]);
    }

    #[test]
    fn operator_function_name() {
        let tree = parse_source("static func ==(lhs: A, rhs: A) -> Bool { true }").unwrap();
        let decl = only_decl(&tree);
        assert_eq!(decl.child(SyntaxKind::Name).unwrap().text(), "==");
    }

    #[test]
    fn variable_with_several_bindings() {
        let tree = parse_source("var a = 1, b: Int, c: String { \"\" }").unwrap();
        let decl = only_decl(&tree);
        let bindings: Vec<_> = decl.child_nodes().filter(|n| n.kind() == SyntaxKind::PatternBinding).collect();
        assert_eq!(bindings.len(), 3);
        assert!(bindings[0].child(SyntaxKind::InitializerClause).is_some());
        assert!(bindings[2].child(SyntaxKind::AccessorBlock).is_some());
    }

    #[test]
    fn enum_cases() {
        let tree = parse_source("enum E { case a, b(Int, label: String) = 3 }").unwrap();
        let decl = only_decl(&tree);
        let case = decl
            .child(SyntaxKind::MemberBlock)
            .unwrap()
            .child(SyntaxKind::EnumCaseDecl)
            .unwrap();
        let elements: Vec<_> = case.child_nodes().collect();
        assert_eq!(elements.len(), 2);
        let params = elements[1].child(SyntaxKind::EnumCaseParameterClause).unwrap();
        assert_eq!(params.child_nodes().count(), 2);
        assert!(elements[1].child(SyntaxKind::InitializerClause).is_some());
    }

    #[test]
    fn where_clause_ends_at_brace() {
        let tree = parse_source("extension Array: P where Element: Equatable, Element: Hashable {\n}").unwrap();
        let decl = only_decl(&tree);
        assert_eq!(decl.kind(), SyntaxKind::ExtensionDecl);
        assert_eq!(
            decl.child(SyntaxKind::GenericWhereClause).unwrap().text(),
            "where Element: Equatable, Element: Hashable"
        );
    }

    #[test]
    fn import_paths() {
        let tree = parse_source("@testable import struct Foundation.Date").unwrap();
        let decl = only_decl(&tree);
        assert_eq!(decl.child(SyntaxKind::ImportPath).unwrap().text(), "Foundation.Date");
    }

    #[test]
    fn operator_and_precedence_group() {
        let tree = parse_source("infix operator <*> : Apply\nprecedencegroup Apply { associativity: left }").unwrap();
        let kinds: Vec<_> = tree.root().child_nodes().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::OperatorDecl, SyntaxKind::PrecedenceGroupDecl]);
        let op = tree.root().child(SyntaxKind::OperatorDecl).unwrap();
        assert_eq!(op.child(SyntaxKind::Name).unwrap().text(), "<*>");
        assert_eq!(op.child(SyntaxKind::OperatorPrecedence).unwrap().text(), ": Apply");
    }

    #[test]
    fn parameter_needs_separator() {
        assert!(parse_source("func f(a: Int b: Int) {}").is_err());
    }
}
