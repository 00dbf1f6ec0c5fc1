//! Token model shared by the tokenizer and both compiler passes.

use std::fmt;

use tale_data::Position;

/// Every kind of token the compiler passes understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // keywords
    Var,
    Item,
    Desc,
    Location,
    Takeable,
    Id,
    Room,
    Command,
    Effect,
    Execute,
    Script,
    Message,
    If,
    Has,
    Items,
    Then,
    For,
    In,
    Do,
    EndIf,
    EndFor,
    EndScript,
    // literals
    String,
    Number,
    Bool,
    Ident,
    // punctuation
    Assign,
    Eq,
    Dot,
    LBracket,
    RBracket,
    Eol,
    Eof,
}

impl TokenKind {
    /// Upper-case name used by the token dump.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Var => "VAR",
            TokenKind::Item => "ITEM",
            TokenKind::Desc => "DESC",
            TokenKind::Location => "LOCATION",
            TokenKind::Takeable => "TAKEABLE",
            TokenKind::Id => "ID",
            TokenKind::Room => "ROOM",
            TokenKind::Command => "COMMAND",
            TokenKind::Effect => "EFFECT",
            TokenKind::Execute => "EXECUTE",
            TokenKind::Script => "SCRIPT",
            TokenKind::Message => "MESSAGE",
            TokenKind::If => "IF",
            TokenKind::Has => "HAS",
            TokenKind::Items => "ITEMS",
            TokenKind::Then => "THEN",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Do => "DO",
            TokenKind::EndIf => "ENDIF",
            TokenKind::EndFor => "ENDFOR",
            TokenKind::EndScript => "ENDSCRIPT",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Bool => "BOOL",
            TokenKind::Ident => "IDENT",
            TokenKind::Assign => "ASSIGNMENT",
            TokenKind::Eq => "EQ",
            TokenKind::Dot => "DOT",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Eol => "EOL",
            TokenKind::Eof => "EOF",
        }
    }

    /// Property keywords that may follow an entity header.
    pub fn is_property(self) -> bool {
        matches!(self, TokenKind::Desc | TokenKind::Location | TokenKind::Takeable)
    }

    /// Keywords that close a block.
    pub fn is_block_end(self) -> bool {
        matches!(self, TokenKind::EndScript | TokenKind::EndIf | TokenKind::EndFor)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Number | TokenKind::Bool)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexical token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text; for STRING tokens the content between the quotes.
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Human-readable rendering for diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eol => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::String => format!("string \"{}\"", self.text),
            TokenKind::Ident | TokenKind::Number | TokenKind::Bool => {
                format!("{} '{}'", self.kind.name().to_lowercase(), self.text)
            },
            _ => format!("'{}'", self.text),
        }
    }
}

/// Ordered token sequence that is always terminated by an EOF token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap a token vector, appending an EOF if the vector does not end with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column + t.text.len()));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// A fresh cursor positioned at the first token.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            tokens: &self.tokens,
            pos: 0,
        }
    }
}

/// Forward-only read position over a token stream.
///
/// Never moves past the trailing EOF, so `current` is always valid.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Consume the current token and return it.
    pub fn advance(&mut self) -> &'a Token {
        let t = self.current();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.at(kind) { Some(self.advance()) } else { None }
    }

    /// Kind of the first token at or after the cursor that is not an end-of-line.
    pub fn kind_after_blank_lines(&self) -> TokenKind {
        self.tokens[self.pos.min(self.tokens.len() - 1)..]
            .iter()
            .map(|t| t.kind)
            .find(|k| *k != TokenKind::Eol)
            .unwrap_or(TokenKind::Eof)
    }
}
