//! Character-level tokenizer for Tale source text.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use tale_data::Position;

use crate::token::{Token, TokenKind, TokenStream};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        use TokenKind::*;
        [
            Var, Item, Desc, Location, Takeable, Id, Room, Command, Effect, Execute, Script, Message, If, Has, Items,
            Then, For, In, Do, EndIf, EndFor, EndScript,
        ]
        .into_iter()
        .map(|kind| (kind.name(), kind))
        .collect()
    };
}

/// Errors raised while scanning raw text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("{position}: invalid character '{ch}'")]
    InvalidCharacter { ch: char, position: Position },
    #[error("{position}: unterminated string literal")]
    UnterminatedString { position: Position },
    #[error("{position}: unknown keyword '{word}'")]
    UnknownKeyword { word: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::InvalidCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::UnknownKeyword { position, .. } => *position,
        }
    }
}

/// Look up an upper-case word in the keyword table.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

/// Scan source text into a token stream.
///
/// Each newline yields one EOL token; the stream always ends with an EOL
/// followed by EOF.
///
/// # Errors
/// Returns the first lexical error encountered.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;
    let mut column = 1usize;

    while let Some(&c) = chars.peek() {
        let start_col = column;
        match c {
            '\n' => {
                chars.next();
                tokens.push(Token::new(TokenKind::Eol, "\n", line, start_col));
                line += 1;
                column = 1;
            },
            ' ' | '\t' | '\r' => {
                chars.next();
                column += 1;
            },
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                    column += 1;
                }
            },
            '"' | '\'' => {
                chars.next();
                column += 1;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == c => {
                            column += 1;
                            break;
                        },
                        Some('\n') | None => {
                            return Err(LexError::UnterminatedString {
                                position: Position::new(line, start_col),
                            });
                        },
                        Some(ch) => {
                            text.push(ch);
                            column += 1;
                        },
                    }
                }
                tokens.push(Token::new(TokenKind::String, text, line, start_col));
            },
            '0'..='9' => {
                let text = take_while(&mut chars, &mut column, |ch| ch.is_ascii_digit());
                tokens.push(Token::new(TokenKind::Number, text, line, start_col));
            },
            'A'..='Z' => {
                let word = take_while(&mut chars, &mut column, |ch| ch.is_ascii_uppercase());
                let kind = keyword(&word).ok_or_else(|| LexError::UnknownKeyword {
                    word: word.clone(),
                    position: Position::new(line, start_col),
                })?;
                tokens.push(Token::new(kind, word, line, start_col));
            },
            'a'..='z' | '_' => {
                let word = take_while(&mut chars, &mut column, |ch| ch.is_ascii_alphanumeric() || ch == '_');
                let kind = if word == "true" || word == "false" {
                    TokenKind::Bool
                } else {
                    TokenKind::Ident
                };
                tokens.push(Token::new(kind, word, line, start_col));
            },
            '=' => {
                chars.next();
                column += 1;
                if chars.peek() == Some(&'=') {
                    chars.next();
                    column += 1;
                    tokens.push(Token::new(TokenKind::Eq, "==", line, start_col));
                } else {
                    tokens.push(Token::new(TokenKind::Assign, "=", line, start_col));
                }
            },
            '.' | '[' | ']' => {
                chars.next();
                column += 1;
                let kind = match c {
                    '.' => TokenKind::Dot,
                    '[' => TokenKind::LBracket,
                    _ => TokenKind::RBracket,
                };
                tokens.push(Token::new(kind, c.to_string(), line, start_col));
            },
            other => {
                return Err(LexError::InvalidCharacter {
                    ch: other,
                    position: Position::new(line, start_col),
                });
            },
        }
    }

    tokens.push(Token::new(TokenKind::Eol, "\n", line, column));
    tokens.push(Token::new(TokenKind::Eof, "", line, column));
    debug!("tokenized {} lines into {} tokens", line, tokens.len());
    Ok(TokenStream::from_tokens(tokens))
}

fn take_while(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    column: &mut usize,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut out = String::new();
    while let Some(&ch) = chars.peek() {
        if !pred(ch) {
            break;
        }
        out.push(ch);
        chars.next();
        *column += 1;
    }
    out
}
