use tale_data::{Position, Value, ValueType};

use super::{DefinitionParser, ParseError};
use crate::symbols::Symbol;
use crate::token::{Token, TokenKind};

impl<'a> DefinitionParser<'a> {
    /// Error describing the current token as unexpected.
    pub(super) fn unexpected(&self, expected: &'static str) -> ParseError {
        let found = self.cursor.current();
        ParseError::UnexpectedToken {
            expected,
            found: found.describe(),
            position: found.position(),
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'a Token, ParseError> {
        match self.cursor.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    pub(super) fn expect_eol(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Eol, "end of line").map(|_| ())
    }

    /// Skip blank lines if the next meaningful token satisfies `accept`.
    /// Leaves the cursor untouched otherwise.
    pub(super) fn continue_body(&mut self, accept: impl Fn(TokenKind) -> bool) -> bool {
        if !accept(self.cursor.kind_after_blank_lines()) {
            return false;
        }
        while self.cursor.eat(TokenKind::Eol).is_some() {}
        true
    }

    /// `STRING ID "=" IDENT EOL` after ITEM or ROOM. Returns the display name
    /// and id tokens; the id must already be in the symbol table.
    pub(super) fn parse_entity_header(&mut self) -> Result<(&'a Token, &'a Token), ParseError> {
        let name = self.expect(TokenKind::String, "a quoted display name")?;
        self.expect(TokenKind::Id, "ID")?;
        self.expect(TokenKind::Assign, "'='")?;
        let id = self.expect(TokenKind::Ident, "an identifier")?;
        self.resolve(&id.text, id.position())?;
        self.expect_eol()?;
        Ok((name, id))
    }

    /// `Value := NUMBER | STRING | BOOL | IDENT`
    pub(super) fn parse_value(&mut self) -> Result<(Value, Position), ParseError> {
        let token = self.cursor.current();
        let value = match token.kind {
            TokenKind::Number => Value::Number(parse_number(token)?),
            TokenKind::String => Value::Text(token.text.clone()),
            TokenKind::Bool => Value::Boolean(token.text == "true"),
            TokenKind::Ident => Value::IdRef(token.text.clone()),
            _ => return Err(self.unexpected("a value")),
        };
        self.cursor.advance();
        Ok((value, token.position()))
    }

    /// Look a declared name up in the symbol table.
    pub(super) fn resolve(&self, name: &str, position: Position) -> Result<&'a Symbol, ParseError> {
        self.symbols.get(name).ok_or_else(|| ParseError::UndefinedIdentifier {
            name: name.to_string(),
            position,
        })
    }

    /// Identifier references inside a value must name a declared symbol.
    pub(super) fn resolve_value(&self, value: &Value, position: Position) -> Result<(), ParseError> {
        if let Value::IdRef(name) = value {
            self.resolve(name, position)?;
        }
        Ok(())
    }

    /// Names that may head a script expression: loop variables, symbols and
    /// the configured collection roots.
    pub(super) fn resolve_expression_root(&self, name: &str, position: Position) -> Result<(), ParseError> {
        let in_scope = self.loop_vars.iter().any(|v| v == name);
        if in_scope || self.symbols.contains(name) || self.config.is_expression_root(name) {
            Ok(())
        } else {
            Err(ParseError::UndefinedIdentifier {
                name: name.to_string(),
                position,
            })
        }
    }
}

fn parse_number(token: &Token) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidNumberFormat {
        text: token.text.clone(),
        position: token.position(),
    };
    // f64::from_str also accepts "inf", "1e3" and friends; the language only has digit runs
    if token.text.is_empty() || !token.text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match token.text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(invalid()),
    }
}

/// A property was given a value of the wrong type.
pub(super) fn type_mismatch(
    context: &'static str,
    expected: ValueType,
    found: &Value,
    position: Position,
) -> ParseError {
    ParseError::TypeMismatch {
        context,
        expected,
        found: found.value_type(),
        position,
    }
}
