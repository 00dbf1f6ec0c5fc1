use log::debug;
use tale_data::{Block, MessageContent, ScriptAction};

use super::{DefinitionParser, ParseError};
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `SCRIPT IDENT EOL Block ENDSCRIPT EOL`
    pub(super) fn parse_script(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let name = self.expect(TokenKind::Ident, "a script name")?;
        self.resolve(&name.text, name.position())?;
        self.expect_eol()?;
        self.builder.register_script(&name.text, name.position());

        let body = self.parse_block()?;
        self.expect(TokenKind::EndScript, "ENDSCRIPT")?;
        self.expect_eol()?;
        debug!("script '{}' compiled with {} top-level action(s)", name.text, body.len());
        self.builder.set_script_body(&name.text, body);
        Ok(())
    }

    /// Actions up to (not including) the next block terminator.
    /// The caller checks that the terminator is the one it opened.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut block = Block::new();
        loop {
            match self.cursor.kind() {
                TokenKind::Message => block.push(self.parse_message()?),
                TokenKind::If => block.push(self.parse_if()?),
                TokenKind::For => block.push(self.parse_for()?),
                TokenKind::Eol => {
                    self.cursor.advance();
                },
                kind if kind.is_block_end() || kind == TokenKind::Eof => return Ok(block),
                _ => return Err(self.unexpected("MESSAGE, IF, FOR or the end of the block")),
            }
        }
    }

    /// `MESSAGE (Expr | STRING) EOL`
    fn parse_message(&mut self) -> Result<ScriptAction, ParseError> {
        let position = self.cursor.advance().position();
        let content = match self.cursor.kind() {
            TokenKind::String => MessageContent::Template(self.cursor.advance().text.clone()),
            TokenKind::Ident => MessageContent::Value(self.parse_expression()?),
            _ => return Err(self.unexpected("a quoted message or an expression")),
        };
        self.expect_eol()?;
        Ok(ScriptAction::Message { content, position })
    }

    /// `IF Condition THEN EOL Block ENDIF EOL`
    fn parse_if(&mut self) -> Result<ScriptAction, ParseError> {
        let position = self.cursor.advance().position();
        let condition = self.parse_condition(position)?;
        self.expect(TokenKind::Then, "THEN")?;
        self.expect_eol()?;
        let then_branch = self.parse_block()?;
        self.expect(TokenKind::EndIf, "ENDIF")?;
        self.expect_eol()?;
        Ok(ScriptAction::If {
            condition,
            then_branch,
            position,
        })
    }

    /// `FOR IDENT IN Expr DO EOL Block ENDFOR EOL`
    fn parse_for(&mut self) -> Result<ScriptAction, ParseError> {
        let position = self.cursor.advance().position();
        let loop_var = self.expect(TokenKind::Ident, "a loop variable name")?;
        self.expect(TokenKind::In, "IN")?;
        let collection = self.parse_reference("FOR collection", position)?;
        self.expect(TokenKind::Do, "DO")?;
        self.expect_eol()?;

        self.loop_vars.push(loop_var.text.clone());
        debug!("entering FOR '{}' at depth {}", loop_var.text, self.loop_vars.len());
        let body = self.parse_block();
        self.loop_vars.pop();
        let body = body?;

        self.expect(TokenKind::EndFor, "ENDFOR")?;
        self.expect_eol()?;
        Ok(ScriptAction::For {
            loop_var: loop_var.text.clone(),
            collection,
            body,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use tale_data::{Condition, Expression, Position};

    use super::super::tests::parse_src;
    use super::*;

    fn script_body(body: &str) -> Result<Block, ParseError> {
        let src = format!(
            "VAR playerLocation = cave\nROOM \"Cave\" ID=cave\nITEM \"Rock\" ID=rock\nSCRIPT look\n{body}ENDSCRIPT\n"
        );
        parse_src(&src).map(|mut def| def.scripts.remove("look").map(|s| s.body).unwrap_or_default())
    }

    #[test]
    fn empty_script() {
        assert!(script_body("").expect("parse ok").is_empty());
    }

    #[test]
    fn message_forms() {
        let body = script_body("  MESSAGE \"You look around.\"\n  MESSAGE cave.description\n").expect("parse ok");
        assert_eq!(
            body[0],
            ScriptAction::Message {
                content: MessageContent::Template("You look around.".into()),
                position: Position::new(5, 3),
            }
        );
        let ScriptAction::Message {
            content: MessageContent::Value(expr),
            ..
        } = &body[1]
        else {
            panic!("expected value message, got {:?}", body[1]);
        };
        assert_eq!(expr.to_string(), "cave.description");
    }

    #[test]
    fn message_rejects_numbers() {
        let err = script_body("  MESSAGE 5\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "a quoted message or an expression", .. }));
    }

    #[test]
    fn nested_blocks() {
        let body = script_body(concat!(
            "  IF cave.items HAS ITEMS THEN\n",
            "    FOR item IN cave.items DO\n",
            "      MESSAGE item.displayName\n",
            "    ENDFOR\n",
            "  ENDIF\n",
        ))
        .expect("parse ok");
        assert_eq!(body.len(), 1);
        let ScriptAction::If {
            condition, then_branch, ..
        } = &body[0]
        else {
            panic!("expected IF");
        };
        assert!(matches!(condition, Condition::CollectionCheck { .. }));
        let ScriptAction::For {
            loop_var,
            collection,
            body: inner,
            position,
        } = &then_branch[0]
        else {
            panic!("expected FOR");
        };
        assert_eq!(loop_var, "item");
        assert_eq!(*position, Position::new(6, 5));
        assert!(matches!(collection, Expression::PropertyAccess { .. }));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn loop_variable_is_scoped_to_its_body() {
        let err = script_body("  FOR thing IN rooms DO\n  ENDFOR\n  MESSAGE thing.name\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UndefinedIdentifier {
                name: "thing".into(),
                position: Position::new(7, 11),
            }
        );
    }

    #[test]
    fn for_rejects_literal_collection() {
        let err = script_body("  FOR x IN \"rocks\" DO\n  ENDFOR\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidExpressionKind {
                context: "FOR collection",
                found: "string literal".into(),
                position: Position::new(5, 3),
            }
        );
    }

    #[test]
    fn mismatched_terminators() {
        let err = script_body("  IF cave.items HAS ITEMS THEN\n  ENDFOR\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "ENDIF", .. }));

        let err = script_body("  FOR r IN rooms DO\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "ENDFOR", .. }));
    }

    #[test]
    fn stray_statement_in_block() {
        let err = script_body("  DESC \"no\"\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "MESSAGE, IF, FOR or the end of the block",
                found: "'DESC'".into(),
                position: Position::new(5, 3),
            }
        );
    }
}
