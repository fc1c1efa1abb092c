// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive descent parser for the declaration-level grammar.
//!
//! Declarations and type expressions get full structure. Everything the
//! extraction layer never looks into (statements, expressions, accessor
//! bodies, attribute arguments, `where` clauses) is kept as a flat run of
//! tokens under an opaque node, so the parser only needs to know where
//! such runs end.

mod decl;
mod errors;
mod types;

pub use errors::ParseError;

use crate::kind::{SyntaxKind, TokenKind};
use crate::tokenizer::{tokenize, Token};
use crate::tree::{NodeId, SyntaxTree, TreeBuilder};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Parse a whole source file. The root node is a `SourceFile`.
pub fn parse_source(source: &str) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new(source)?;
    let root = parser.builder.start_node(SyntaxKind::SourceFile);
    while !parser.at_eof() {
        parser.parse_item()?;
    }
    parser.builder.finish_node();
    Ok(parser.finish(root))
}

/// Parse a single type expression. The root node is a `TypeRoot` whose
/// only child is the type.
pub fn parse_type(source: &str) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new(source)?;
    let root = parser.builder.start_node(SyntaxKind::TypeRoot);
    parser.parse_type()?;
    if parser.at_kind(TokenKind::Ellipsis) {
        parser.bump();
    }
    if !parser.at_eof() {
        return Err(parser.error_here("end of type"));
    }
    parser.builder.finish_node();
    Ok(parser.finish(root))
}

/// Deepest nesting of types and item blocks accepted before giving up.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Tokens that continue the previous line's expression when they start a
/// new line.
const CONTINUATION_TOKENS: &[&str] = &[".", "?", "+", "*", "/", "%", "&", "|", "^", "=", "<", ">"];

pub(crate) struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    builder: TreeBuilder,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> PResult<Self> {
        Ok(Parser {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            depth: 0,
            builder: TreeBuilder::default(),
        })
    }

    fn finish(self, root: NodeId) -> SyntaxTree {
        self.builder.build(self.source.to_string(), self.tokens, root)
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn token_at(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    fn kind_at(&self, idx: usize) -> Option<TokenKind> {
        self.token_at(idx).map(|tok| tok.kind)
    }

    fn text_at(&self, idx: usize) -> &'s str {
        match self.token_at(idx) {
            Some(tok) => &self.source[tok.span.start..tok.span.end],
            None => "",
        }
    }

    fn is_word_at(&self, idx: usize) -> bool {
        matches!(
            self.kind_at(idx),
            Some(TokenKind::Identifier | TokenKind::Keyword)
        )
    }

    /// The token at `idx` starts exactly where the previous one ends.
    fn adjacent_at(&self, idx: usize) -> bool {
        match (idx.checked_sub(1).and_then(|p| self.token_at(p)), self.token_at(idx)) {
            (Some(prev), Some(tok)) => prev.span.end == tok.span.start,
            _ => false,
        }
    }

    fn nth_text(&self, n: usize) -> &'s str {
        self.text_at(self.pos + n)
    }

    fn nth_is_word(&self, n: usize) -> bool {
        self.is_word_at(self.pos + n)
    }

    fn current_text(&self) -> &'s str {
        self.text_at(self.pos)
    }

    /// Current token has exactly this text. String literals never match.
    fn at(&self, text: &str) -> bool {
        match self.kind_at(self.pos) {
            Some(TokenKind::StringLiteral) | None => false,
            Some(_) => self.current_text() == text,
        }
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.kind_at(self.pos) == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_newline(&self) -> bool {
        self.token_at(self.pos).is_some_and(|tok| tok.newline_before)
    }

    fn bump(&mut self) {
        if !self.at_eof() {
            self.builder.push_token(self.pos);
            self.pos += 1;
        }
    }

    fn expect(&mut self, text: &str) -> PResult<()> {
        if self.at(text) {
            self.bump();
            Ok(())
        } else {
            Err(self.error_here(&format!("'{}'", text)))
        }
    }

    fn expect_word(&mut self, what: &str) -> PResult<()> {
        if self.nth_is_word(0) {
            self.bump();
            Ok(())
        } else {
            Err(self.error_here(what))
        }
    }

    fn error_here(&self, expected: &str) -> ParseError {
        match self.token_at(self.pos) {
            Some(tok) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_text().to_string(),
                offset: tok.span.start,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                offset: self.source.len(),
            },
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> PResult<()>) -> PResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            let offset = self
                .token_at(self.pos)
                .map_or(self.source.len(), |tok| tok.span.start);
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                offset,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn start(&mut self, kind: SyntaxKind) -> NodeId {
        self.builder.start_node(kind)
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Wrap the node just finished in a new open node of `kind`.
    fn wrap(&mut self, kind: SyntaxKind) -> PResult<NodeId> {
        self.builder
            .wrap_last(kind)
            .ok_or_else(|| self.error_here("type"))
    }

    /// Index just past the bracket group opened at `idx`, or `None` if the
    /// group is never closed.
    fn skip_group_at(&self, idx: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = idx;
        while let Some(kind) = self.kind_at(i) {
            if kind == TokenKind::Punct {
                match self.text_at(i) {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
        None
    }

    /// Consume a balanced bracket group starting at the current opener.
    fn bump_group(&mut self) -> PResult<()> {
        let Some(end) = self.skip_group_at(self.pos) else {
            let expected = match self.current_text() {
                "(" => "')'",
                "[" => "']'",
                _ => "'}'",
            };
            self.pos = self.tokens.len();
            return Err(self.error_here(expected));
        };
        while self.pos < end {
            self.bump();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// One entry of a file, member block, code block or `#if` clause.
    fn parse_item(&mut self) -> PResult<()> {
        self.nested(Self::parse_item_inner)
    }

    fn parse_item_inner(&mut self) -> PResult<()> {
        if self.at(";") {
            self.bump();
            return Ok(());
        }
        if self.at("#if") {
            return self.parse_if_config();
        }
        if let Some(keyword_pos) = self.declaration_keyword_pos() {
            return self.parse_declaration(keyword_pos);
        }
        self.parse_statement()
    }

    /// `{ items }` as a `MemberBlock` or `CodeBlock`.
    fn parse_item_block(&mut self, kind: SyntaxKind) -> PResult<()> {
        self.start(kind);
        self.expect("{")?;
        while !self.at("}") {
            if self.at_eof() {
                return Err(self.error_here("'}'"));
            }
            self.parse_item()?;
        }
        self.bump();
        self.finish_node();
        Ok(())
    }

    fn at_if_config_boundary(&self) -> bool {
        self.at("#elseif") || self.at("#else") || self.at("#endif")
    }

    fn parse_if_config(&mut self) -> PResult<()> {
        self.start(SyntaxKind::IfConfigDecl);
        loop {
            self.start(SyntaxKind::IfConfigClause);
            let directive = self.current_text();
            self.bump();
            if directive != "#else" {
                self.parse_if_config_condition()?;
            }
            while !self.at_if_config_boundary() {
                if self.at_eof() || self.at("}") {
                    return Err(self.error_here("'#endif'"));
                }
                self.parse_item()?;
            }
            self.finish_node();
            if self.at("#endif") {
                self.bump();
                break;
            }
        }
        self.finish_node();
        Ok(())
    }

    /// The condition runs to the end of the directive's line.
    fn parse_if_config_condition(&mut self) -> PResult<()> {
        if self.at_eof() || self.at_newline() {
            return Err(self.error_here("condition"));
        }
        self.start(SyntaxKind::IfConfigCondition);
        self.bump();
        while !self.at_eof() && !self.at_newline() {
            self.bump();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_statement(&mut self) -> PResult<()> {
        if self.at("}") || self.at_if_config_boundary() {
            return Err(self.error_here("declaration or statement"));
        }
        self.start(SyntaxKind::Statement);
        self.eat_run(false);
        self.finish_node();
        Ok(())
    }

    /// An expression in a default value, initializer or raw value.
    fn parse_expr(&mut self) -> PResult<()> {
        self.start(SyntaxKind::Expr);
        if self.eat_run(true) == 0 {
            return Err(self.error_here("expression"));
        }
        self.finish_node();
        Ok(())
    }

    /// `{ willSet` or `{ didSet` after an initializer opens the observers
    /// of a stored property rather than a trailing closure.
    fn at_observer_block(&self) -> bool {
        matches!(self.nth_text(1), "willSet" | "didSet")
    }

    /// Consume an opaque run of tokens. The run ends before a closing
    /// bracket, `;`, an `#if` clause boundary, or a line break at bracket
    /// depth zero; with `stop_at_comma` it also ends before a top level
    /// comma. Returns the number of tokens consumed.
    fn eat_run(&mut self, stop_at_comma: bool) -> usize {
        let mut depth = 0usize;
        let mut consumed = 0usize;
        while !self.at_eof() {
            let text = self.current_text();
            let is_punct = self.at_kind(TokenKind::Punct);
            if depth == 0 {
                if consumed > 0
                    && self.at_newline()
                    && !(is_punct && CONTINUATION_TOKENS.contains(&text))
                {
                    break;
                }
                if self.at_if_config_boundary() {
                    break;
                }
                if is_punct {
                    match text {
                        "}" | ";" => break,
                        ")" | "]" if consumed > 0 => break,
                        "," if stop_at_comma => break,
                        "{" if consumed > 0 && self.at_observer_block() => break,
                        _ => {}
                    }
                }
            }
            if is_punct {
                match text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.bump();
            consumed += 1;
        }
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
        tree.root().child_nodes().map(|n| n.kind()).collect()
    }

    #[test]
    fn statements_end_at_newlines() {
        let tree = parse_source("print(1)\nlet x = foo\n    .bar()\n").unwrap();
        assert_eq!(
            kinds(&tree),
            vec![SyntaxKind::Statement, SyntaxKind::VariableDecl]
        );
        let var = tree.root().child(SyntaxKind::VariableDecl).unwrap();
        assert_eq!(var.text(), "let x = foo\n    .bar()");
    }

    #[test]
    fn observers_after_initializer() {
        let tree = parse_source("var x = 0 {\n  didSet { }\n}\nlet y = list.map { $0 }").unwrap();
        let bindings: Vec<_> = tree
            .root()
            .child_nodes()
            .filter_map(|decl| decl.child(SyntaxKind::PatternBinding))
            .collect();
        assert!(bindings[0].child(SyntaxKind::AccessorBlock).is_some());
        assert!(bindings[1].child(SyntaxKind::AccessorBlock).is_none());
        assert_eq!(
            bindings[1].child(SyntaxKind::InitializerClause).unwrap().text(),
            "= list.map { $0 }"
        );
    }

    #[test]
    fn semicolons_split_items() {
        let tree = parse_source("let a = 1; let b = 2").unwrap();
        assert_eq!(
            kinds(&tree),
            vec![SyntaxKind::VariableDecl, SyntaxKind::VariableDecl]
        );
    }

    #[test]
    fn stray_close_brace_is_an_error() {
        let err = parse_source("let a = 1\n}").unwrap_err();
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn unclosed_member_block() {
        let err = parse_source("struct S {\n  var x: Int\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn if_config_clauses() {
        let tree = parse_source("#if DEBUG && os(iOS)\nlet a = 1\n#elseif TEST\n#else\nlet b = 2\n#endif").unwrap();
        let if_config = tree.root().child(SyntaxKind::IfConfigDecl).unwrap();
        let clauses: Vec<_> = if_config.child_nodes().collect();
        assert_eq!(clauses.len(), 3);
        let condition = clauses[0].child(SyntaxKind::IfConfigCondition).unwrap();
        assert_eq!(condition.text(), "DEBUG && os(iOS)");
        assert!(clauses[2].child(SyntaxKind::IfConfigCondition).is_none());
        assert!(clauses[2].child(SyntaxKind::VariableDecl).is_some());
    }

    #[test]
    fn unterminated_if_config() {
        assert!(parse_source("#if DEBUG\nlet a = 1\n").is_err());
    }

    #[test]
    fn type_root_rejects_trailing_tokens() {
        let err = parse_type("Int String").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "end of type".to_string(),
                found: "String".to_string(),
                offset: 4,
            }
        );
    }

    #[test]
    fn standalone_variadic_type() {
        let tree = parse_type("(Int, Int)...").unwrap();
        assert!(tree.root().has_token("..."));
        assert_eq!(tree.root().child_type().unwrap().kind(), SyntaxKind::TupleType);
    }

    #[test]
    fn deep_type_nesting_is_an_error() {
        let deep = format!("{}Int{}", "(".repeat(5000), ")".repeat(5000));
        let err = parse_type(&deep).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                ..
            }
        ));

        let shallow = format!("{}Int{}", "(".repeat(100), ")".repeat(100));
        assert!(parse_type(&shallow).is_ok());
    }

    #[test]
    fn deep_block_nesting_is_an_error() {
        let deep = format!("{}{}", "struct S {".repeat(400), "}".repeat(400));
        let err = parse_source(&deep).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn tokenizer_errors_propagate() {
        let err = parse_source("let s = \"open").unwrap_err();
        assert!(matches!(err, ParseError::Tokenizer(_)));
        assert_eq!(err.offset(), 8);
    }
}
