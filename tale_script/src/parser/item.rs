use log::{debug, warn};
use tale_data::{InteractionFlag, Value, ValueType};

use super::helpers::type_mismatch;
use super::{DefinitionParser, ParseError};
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `ITEM STRING ID "=" IDENT EOL ItemProp*`
    pub(super) fn parse_item(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let (name, id) = self.parse_entity_header()?;
        let item_id = id.text.as_str();
        self.builder.register_item(item_id, &name.text, id.position());

        let mut has_location = false;
        while self.continue_body(TokenKind::is_property) {
            let property = self.cursor.advance();
            match property.kind {
                TokenKind::Desc => {
                    let text = self.parse_description()?;
                    self.builder.set_item_description(item_id, &text);
                },
                TokenKind::Location => {
                    self.expect(TokenKind::Assign, "'='")?;
                    let (value, pos) = self.parse_value()?;
                    let Value::IdRef(target) = &value else {
                        return Err(type_mismatch("LOCATION", ValueType::Id, &value, pos));
                    };
                    // any declared name is accepted here; the validator checks the kind
                    self.resolve(target, pos)?;
                    self.builder.set_item_location(item_id, target);
                    has_location = true;
                },
                TokenKind::Takeable => {
                    self.expect(TokenKind::Assign, "'='")?;
                    let (value, pos) = self.parse_value()?;
                    let Value::Boolean(takeable) = &value else {
                        return Err(type_mismatch("TAKEABLE", ValueType::Bool, &value, pos));
                    };
                    if *takeable {
                        self.builder.add_interaction_flag(item_id, InteractionFlag::Takeable);
                    }
                },
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "DESC, LOCATION or TAKEABLE",
                        found: property.describe(),
                        position: property.position(),
                    });
                },
            }
            self.expect_eol()?;
        }

        if !has_location {
            warn!("item '{item_id}' at {} has no LOCATION", id.position());
        }
        debug!("item '{item_id}' compiled");
        Ok(())
    }

    /// Value of a DESC line; the `=` is optional.
    pub(super) fn parse_description(&mut self) -> Result<String, ParseError> {
        self.cursor.eat(TokenKind::Assign);
        let (value, pos) = self.parse_value()?;
        match value {
            Value::Text(text) => Ok(text),
            other => Err(type_mismatch("DESC", ValueType::String, &other, pos)),
        }
    }
}
