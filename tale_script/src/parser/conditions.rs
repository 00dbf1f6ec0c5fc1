use tale_data::{ComparisonOp, Condition, Expression, Position};

use super::{DefinitionParser, ParseError};
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `Condition := Expr (HAS ITEMS | "==" Expr)`
    ///
    /// `anchor` is the IF keyword position, used when an operand is a literal.
    pub(super) fn parse_condition(&mut self, anchor: Position) -> Result<Condition, ParseError> {
        let left = self.parse_reference("IF condition", anchor)?;
        match self.cursor.kind() {
            TokenKind::Has => {
                self.cursor.advance();
                self.expect(TokenKind::Items, "ITEMS")?;
                if !left.is_member_access() {
                    return Err(ParseError::InvalidExpressionKind {
                        context: "HAS ITEMS target",
                        found: left.kind_name().to_string(),
                        position: left.position(),
                    });
                }
                Ok(Condition::CollectionCheck { target: left })
            },
            TokenKind::Eq => {
                self.cursor.advance();
                let right = self.parse_reference("IF condition", anchor)?;
                Ok(Condition::Comparison {
                    left,
                    op: ComparisonOp::Equals,
                    right,
                })
            },
            _ => Err(self.unexpected("HAS ITEMS or '=='")),
        }
    }

    /// An expression where a literal would be meaningless.
    pub(super) fn parse_reference(
        &mut self,
        context: &'static str,
        anchor: Position,
    ) -> Result<Expression, ParseError> {
        let token = self.cursor.current();
        if token.kind.is_literal() {
            return Err(ParseError::InvalidExpressionKind {
                context,
                found: format!("{} literal", literal_name(token.kind)),
                position: anchor,
            });
        }
        self.parse_expression()
    }

    /// `Expr := IDENT ( "." IDENT | "[" Expr "]" )*`
    ///
    /// Each access node is positioned at its `.` or `[` token.
    pub(super) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let head = self.expect(TokenKind::Ident, "an identifier")?;
        self.resolve_expression_root(&head.text, head.position())?;

        let mut expr = Expression::VariableAccess {
            name: head.text.clone(),
            position: head.position(),
        };
        loop {
            match self.cursor.kind() {
                TokenKind::Dot => {
                    let position = self.cursor.advance().position();
                    let property = self.expect(TokenKind::Ident, "a property name")?;
                    expr = Expression::PropertyAccess {
                        object: Box::new(expr),
                        property: property.text.clone(),
                        position,
                    };
                },
                TokenKind::LBracket => {
                    let position = self.cursor.advance().position();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expression::IndexedAccess {
                        object: Box::new(expr),
                        index: Box::new(index),
                        position,
                    };
                },
                _ => return Ok(expr),
            }
        }
    }
}

fn literal_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Number => "number",
        TokenKind::Bool => "boolean",
        _ => "string",
    }
}
