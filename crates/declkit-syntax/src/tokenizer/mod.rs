// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for the declaration-level grammar.
//!
//! Comments and whitespace are trivia: they never become tokens, but every
//! token records whether a newline preceded it so the parser can find the
//! end of statements and directive conditions.
//!
//! Operator characters are emitted one per token (`>>` in a nested generic
//! argument list is two tokens). The only multi-character punctuation
//! tokens are `->`, `...` and `..<`.


use declkit_core::text::Span;
use thiserror::Error;

use crate::kind::{is_keyword, TokenKind};

/// A token with its byte span into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line break occurred between the previous token and this one.
    pub newline_before: bool,
}

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokError {
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("unterminated block comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
}

impl TokError {
    /// Byte offset where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            TokError::UnterminatedString { offset }
            | TokError::UnterminatedComment { offset }
            | TokError::UnexpectedCharacter { offset, .. } => *offset,
        }
    }
}

/// Split `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokError> {
    let mut state = TokState::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = state.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct TokState<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> TokState<'s> {
    fn new(source: &'s str) -> Self {
        TokState { source, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char_at(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skip whitespace and comments. Returns true if a newline was crossed.
    fn skip_trivia(&mut self) -> Result<bool, TokError> {
        let mut newline = false;
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(idx) => self.pos += idx,
                    None => self.pos = self.source.len(),
                }
            } else if rest.starts_with("/*") {
                newline |= self.skip_block_comment()?;
            } else {
                match self.peek_char() {
                    Some(ch) if ch.is_whitespace() => {
                        if ch == '\n' || ch == '\r' {
                            newline = true;
                        }
                        self.bump_char();
                    }
                    _ => return Ok(newline),
                }
            }
        }
    }

    /// Block comments nest.
    fn skip_block_comment(&mut self) -> Result<bool, TokError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut newline = false;
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(TokError::UnterminatedComment { offset: start });
            }
            if rest.starts_with("/*") {
                depth += 1;
                self.pos += 2;
            } else if rest.starts_with("*/") {
                depth -= 1;
                self.pos += 2;
                if depth == 0 {
                    return Ok(newline);
                }
            } else if let Some(ch) = self.bump_char() {
                newline |= ch == '\n';
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, TokError> {
        let newline_before = self.skip_trivia()?;
        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };

        let kind = if is_identifier_start(ch) {
            self.eat_identifier_chars();
            if is_keyword(&self.source[start..self.pos]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            }
        } else if ch == '`' {
            self.lex_backticked(start)?;
            TokenKind::Identifier
        } else if ch == '$' {
            self.bump_char();
            self.eat_identifier_chars();
            TokenKind::Identifier
        } else if ch.is_ascii_digit() {
            self.lex_number()
        } else if ch == '"' {
            self.lex_string(start)?;
            TokenKind::StringLiteral
        } else if ch == '#' {
            self.lex_pound(start)?
        } else if ch == '@' {
            self.bump_char();
            TokenKind::At
        } else if ch == '\\' {
            self.bump_char();
            TokenKind::Backslash
        } else if self.rest().starts_with("->") {
            self.pos += 2;
            TokenKind::Arrow
        } else if self.rest().starts_with("...") {
            self.pos += 3;
            TokenKind::Ellipsis
        } else if self.rest().starts_with("..<") {
            self.pos += 3;
            TokenKind::Punct
        } else if ch.is_ascii_punctuation() {
            self.bump_char();
            TokenKind::Punct
        } else {
            return Err(TokError::UnexpectedCharacter { ch, offset: start });
        };

        Ok(Some(Token {
            kind,
            span: Span::new(start, self.pos),
            newline_before,
        }))
    }

    fn eat_identifier_chars(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_identifier_continue(ch) {
                self.bump_char();
            } else {
                break;
            }
        }
    }

    fn lex_backticked(&mut self, start: usize) -> Result<(), TokError> {
        self.bump_char();
        loop {
            match self.bump_char() {
                Some('`') => return Ok(()),
                Some('\n') | None => {
                    return Err(TokError::UnexpectedCharacter {
                        ch: '`',
                        offset: start,
                    })
                }
                Some(_) => {}
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let mut is_float = false;
        let radix_prefixed = self.rest().starts_with("0x")
            || self.rest().starts_with("0o")
            || self.rest().starts_with("0b");
        if radix_prefixed {
            self.pos += 2;
        }
        let mut prev = '\0';
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.bump_char();
            } else if ch == '.'
                && self
                    .peek_char_at(1)
                    .is_some_and(|next| next.is_ascii_digit())
            {
                is_float = true;
                self.bump_char();
            } else if (ch == '+' || ch == '-')
                && matches!(prev, 'e' | 'E' | 'p' | 'P')
                && (!radix_prefixed || matches!(prev, 'p' | 'P'))
            {
                self.bump_char();
            } else {
                break;
            }
            if !radix_prefixed && matches!(ch, 'e' | 'E') {
                is_float = true;
            }
            prev = ch;
        }
        if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        }
    }

    fn lex_pound(&mut self, start: usize) -> Result<TokenKind, TokError> {
        let hashes = self.rest().chars().take_while(|&c| c == '#').count();
        if self.rest()[hashes..].starts_with('"') {
            self.lex_raw_string(start, hashes)?;
            return Ok(TokenKind::StringLiteral);
        }
        self.bump_char();
        if self.peek_char().is_some_and(is_identifier_start) {
            self.eat_identifier_chars();
            Ok(TokenKind::PoundDirective)
        } else {
            Ok(TokenKind::Punct)
        }
    }

    /// Raw strings (`#"..."#`) end at the quote followed by the same number
    /// of hashes; backslashes inside are literal.
    fn lex_raw_string(&mut self, start: usize, hashes: usize) -> Result<(), TokError> {
        self.pos += hashes;
        let pounds = "#".repeat(hashes);
        let terminator = if self.rest().starts_with("\"\"\"") {
            self.pos += 3;
            format!("\"\"\"{}", pounds)
        } else {
            self.pos += 1;
            format!("\"{}", pounds)
        };
        match self.rest().find(&terminator) {
            Some(idx) => {
                self.pos += idx + terminator.len();
                Ok(())
            }
            None => Err(TokError::UnterminatedString { offset: start }),
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<(), TokError> {
        let multiline = self.rest().starts_with("\"\"\"");
        self.pos += if multiline { 3 } else { 1 };
        loop {
            if multiline && self.rest().starts_with("\"\"\"") {
                self.pos += 3;
                return Ok(());
            }
            match self.bump_char() {
                None => return Err(TokError::UnterminatedString { offset: start }),
                Some('"') if !multiline => return Ok(()),
                Some('\n') if !multiline => {
                    return Err(TokError::UnterminatedString { offset: start })
                }
                Some('\\') => match self.bump_char() {
                    Some('(') => self.skip_interpolation(start)?,
                    Some(_) => {}
                    None => return Err(TokError::UnterminatedString { offset: start }),
                },
                Some(_) => {}
            }
        }
    }

    /// Skip the body of `\( ... )`, which may itself contain strings.
    fn skip_interpolation(&mut self, string_start: usize) -> Result<(), TokError> {
        let mut depth = 1usize;
        loop {
            let inner_start = self.pos;
            match self.peek_char() {
                None => return Err(TokError::UnterminatedString { offset: string_start }),
                Some('"') => self.lex_string(inner_start)?,
                Some('(') => {
                    depth += 1;
                    self.bump_char();
                }
                Some(')') => {
                    depth -= 1;
                    self.bump_char();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {
                    self.bump_char();
                }
            }
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic() || (!ch.is_ascii() && !ch.is_whitespace())
}

fn is_identifier_continue(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}
