use log::debug;
use tale_data::VariableDef;

use super::{DefinitionParser, ParseError};
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `VAR IDENT "=" Value EOL`
    pub(super) fn parse_variable(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let name = self.expect(TokenKind::Ident, "a variable name")?;
        self.resolve(&name.text, name.position())?;
        self.expect(TokenKind::Assign, "'='")?;
        let (value, value_pos) = self.parse_value()?;
        self.resolve_value(&value, value_pos)?;

        debug!("variable '{}' = {:?}", name.text, value);
        let var = VariableDef {
            declared_type: value.value_type(),
            value,
            position: name.position(),
        };
        self.builder.set_variable(&name.text, var, value_pos, self.symbols)?;
        self.expect_eol()
    }
}
