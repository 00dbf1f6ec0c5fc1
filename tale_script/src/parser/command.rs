use log::{debug, warn};
use tale_data::{CommandDef, CommandEffect};

use super::{DefinitionParser, ParseError};
use crate::symbols::SymbolKind;
use crate::token::TokenKind;

impl DefinitionParser<'_> {
    /// `COMMAND STRING EOL (EFFECT EXECUTE IDENT EOL)*`
    ///
    /// Each effect clause becomes its own command entry.
    pub(super) fn parse_command(&mut self) -> Result<(), ParseError> {
        let position = self.cursor.advance().position();
        let verb = self.expect(TokenKind::String, "a quoted command verb")?;
        self.expect_eol()?;

        let mut effects = 0usize;
        while self.continue_body(|kind| kind == TokenKind::Effect) {
            self.cursor.advance();
            self.expect(TokenKind::Execute, "EXECUTE")?;
            let script = self.expect(TokenKind::Ident, "a script name")?;
            let symbol = self.resolve(&script.text, script.position())?;
            if symbol.kind != SymbolKind::Script {
                return Err(ParseError::ReferenceTypeMismatch {
                    context: "EFFECT EXECUTE",
                    name: script.text.clone(),
                    expected: SymbolKind::Script,
                    found: symbol.kind,
                    declared_at: symbol.position,
                    position: script.position(),
                });
            }
            self.expect_eol()?;

            self.builder.append_command(CommandDef {
                verb: verb.text.clone(),
                effect: CommandEffect::CallScript {
                    script_id: script.text.clone(),
                },
                position,
            });
            effects += 1;
        }

        if effects == 0 {
            warn!("command '{}' at {position} has no EFFECT clauses", verb.text);
        } else {
            debug!("command '{}' compiled with {effects} effect(s)", verb.text);
        }
        Ok(())
    }
}
