// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type expression parsing.
//!
//! Precedence, loosest first: composition (`A & B`), attributed and
//! specified types (`@escaping T`, `inout T`, `repeat each T`),
//! `some`/`any` and suppressed conformances (`~Copyable`), postfix
//! (`T?`, `T!`, `T.Type`, `A.B`), primary.

use super::{PResult, Parser};
use crate::kind::{SyntaxKind, TokenKind};

/// Ownership and isolation specifiers that prefix a type.
const TYPE_SPECIFIERS: &[&str] = &[
    "inout",
    "borrowing",
    "consuming",
    "__owned",
    "__shared",
    "isolated",
    "sending",
    "repeat",
    "each",
];

impl<'s> Parser<'s> {
    pub(super) fn parse_type(&mut self) -> PResult<()> {
        self.nested(Self::parse_type_inner)
    }

    fn parse_type_inner(&mut self) -> PResult<()> {
        self.parse_non_composition_type()?;
        if self.at("&") {
            self.wrap(SyntaxKind::CompositionType)?;
            while self.at("&") {
                self.bump();
                self.parse_non_composition_type()?;
            }
            self.finish_node();
        }
        Ok(())
    }

    fn at_type_specifier(&self) -> bool {
        TYPE_SPECIFIERS.contains(&self.current_text())
            && self.nth_is_word(0)
            && (self.nth_is_word(1) || matches!(self.nth_text(1), "(" | "[" | "@"))
    }

    fn parse_non_composition_type(&mut self) -> PResult<()> {
        if self.at_kind(TokenKind::At) || self.at_type_specifier() {
            self.start(SyntaxKind::AttributedType);
            while self.at_type_specifier() {
                self.bump();
            }
            if self.at_kind(TokenKind::At) {
                self.parse_attribute_list()?;
            }
            self.parse_postfix_type()?;
            self.finish_node();
            return Ok(());
        }
        if (self.at("some") || self.at("any"))
            && (self.nth_is_word(1) || self.nth_text(1) == "(")
        {
            self.start(SyntaxKind::SomeOrAnyType);
            self.bump();
            self.parse_postfix_type()?;
            self.finish_node();
            return Ok(());
        }
        if self.at("~") {
            self.start(SyntaxKind::SuppressedType);
            self.bump();
            self.parse_postfix_type()?;
            self.finish_node();
            return Ok(());
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> PResult<()> {
        self.parse_primary_type()?;
        loop {
            if self.at("?") {
                self.wrap(SyntaxKind::OptionalType)?;
                self.bump();
                self.finish_node();
            } else if self.at("!") {
                self.wrap(SyntaxKind::ImplicitlyUnwrappedOptionalType)?;
                self.bump();
                self.finish_node();
            } else if self.at(".") && self.nth_is_word(1) {
                if matches!(self.nth_text(1), "Type" | "Protocol") {
                    self.wrap(SyntaxKind::MetatypeType)?;
                    self.bump();
                    self.bump();
                } else {
                    self.wrap(SyntaxKind::MemberType)?;
                    self.bump();
                    self.bump();
                    if self.at("<") {
                        self.parse_generic_argument_clause()?;
                    }
                }
                self.finish_node();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_primary_type(&mut self) -> PResult<()> {
        if self.at("(") {
            return self.parse_paren_type();
        }
        if self.at("[") {
            return self.parse_collection_type();
        }
        if self.nth_is_word(0) {
            self.start(SyntaxKind::IdentifierType);
            self.bump();
            if self.at("<") {
                self.parse_generic_argument_clause()?;
            }
            self.finish_node();
            return Ok(());
        }
        Err(self.error_here("type"))
    }

    fn parse_generic_argument_clause(&mut self) -> PResult<()> {
        self.start(SyntaxKind::GenericArgumentClause);
        self.bump(); // <
        while !self.at(">") {
            if self.at_eof() {
                return Err(self.error_here("'>'"));
            }
            self.start(SyntaxKind::GenericArgument);
            self.parse_type()?;
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

    /// `[T]` or `[K: V]`.
    fn parse_collection_type(&mut self) -> PResult<()> {
        let node = self.start(SyntaxKind::ArrayType);
        self.bump();
        self.parse_type()?;
        if self.at(":") {
            self.builder.retag(node, SyntaxKind::DictionaryType);
            self.bump();
            self.parse_type()?;
        }
        self.expect("]")?;
        self.finish_node();
        Ok(())
    }

    /// `( elements )`, which becomes a function type when effects or an
    /// arrow follow the closing paren.
    fn parse_paren_type(&mut self) -> PResult<()> {
        let node = self.start(SyntaxKind::TupleType);
        self.bump();
        self.start(SyntaxKind::TupleTypeElementList);
        while !self.at(")") {
            if self.at_eof() {
                return Err(self.error_here("')'"));
            }
            self.parse_tuple_element(SyntaxKind::TupleTypeElement)?;
        }
        self.finish_node();
        self.bump();
        if self.at_function_arrow() {
            self.builder.retag(node, SyntaxKind::FunctionType);
            if self.at_effect() {
                self.parse_effect_specifiers()?;
            }
            self.bump(); // ->
            self.parse_type()?;
        }
        self.finish_node();
        Ok(())
    }

    /// `[name [second]:] Type [...] [= default] [,]`, shared by tuple type
    /// elements and enum case parameters.
    pub(super) fn parse_tuple_element(&mut self, kind: SyntaxKind) -> PResult<()> {
        self.start(kind);
        if self.nth_is_word(0) && self.nth_text(1) == ":" {
            self.bump();
            self.bump();
        } else if self.nth_is_word(0) && self.nth_is_word(1) && self.nth_text(2) == ":" {
            self.bump();
            self.bump();
            self.bump();
        }
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

    pub(super) fn at_effect(&self) -> bool {
        matches!(
            self.current_text(),
            "async" | "reasync" | "throws" | "rethrows"
        ) && self.nth_is_word(0)
    }

    /// Effects followed by `->`.
    fn at_function_arrow(&self) -> bool {
        let mut i = self.pos;
        loop {
            match self.text_at(i) {
                "async" | "reasync" => i += 1,
                "throws" | "rethrows" => {
                    i += 1;
                    if self.text_at(i) == "(" && self.adjacent_at(i) {
                        match self.skip_group_at(i) {
                            Some(end) => i = end,
                            None => return false,
                        }
                    }
                }
                _ => break,
            }
        }
        self.kind_at(i) == Some(TokenKind::Arrow)
    }

    /// `async`, `throws`, and typed `throws(E)` in any order.
    pub(super) fn parse_effect_specifiers(&mut self) -> PResult<()> {
        self.start(SyntaxKind::EffectSpecifiers);
        while self.at_effect() {
            let throwing = self.at("throws") || self.at("rethrows");
            self.bump();
            if throwing && self.at("(") && self.adjacent_at(self.pos) {
                self.bump_group()?;
            }
        }
        self.finish_node();
        Ok(())
    }
}
