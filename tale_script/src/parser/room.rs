use log::debug;

use super::{DefinitionParser, ParseError};
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `ROOM STRING ID "=" IDENT EOL (DESC Value EOL)*`
    pub(super) fn parse_room(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let (name, id) = self.parse_entity_header()?;
        let room_id = id.text.as_str();
        self.builder.register_room(room_id, &name.text, id.position());

        while self.continue_body(TokenKind::is_property) {
            let property = self.cursor.advance();
            if property.kind != TokenKind::Desc {
                return Err(ParseError::UnsupportedProperty {
                    entity: "ROOM",
                    property: property.kind.name(),
                    position: property.position(),
                });
            }
            let text = self.parse_description()?;
            self.builder.set_room_description(room_id, &text);
            self.expect_eol()?;
        }

        debug!("room '{room_id}' compiled");
        Ok(())
    }
}
