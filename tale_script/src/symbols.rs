//! First pass: collect every declared name before any reference is resolved.
//!
//! Variables, items, rooms and scripts share one flat namespace. The table is
//! built once per compilation and only read afterwards, which lets the second
//! pass resolve references to entities declared later in the file.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};
use tale_data::Position;

use crate::token::{Cursor, Token, TokenKind, TokenStream};

/// Declaration kind recorded for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Item,
    Room,
    Script,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Item => "item",
            SymbolKind::Room => "room",
            SymbolKind::Script => "script",
        };
        f.write_str(name)
    }
}

/// A declared name and where it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub position: Position,
}

/// Errors raised while collecting declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("{position}: expected a variable name after VAR, found {found}")]
    MissingVariableName { found: String, position: Position },
    #[error("{position}: expected ITEM \"<name>\" ID=<identifier>, found {found}")]
    MissingItemId { found: String, position: Position },
    #[error("{position}: expected ROOM \"<name>\" ID=<identifier>, found {found}")]
    MissingRoomId { found: String, position: Position },
    #[error("{position}: expected a script name after SCRIPT, found {found}")]
    MissingScriptName { found: String, position: Position },
    #[error("{duplicate}: variable '{name}' is already defined (first defined at {original})")]
    DuplicateVariable {
        name: String,
        original: Position,
        duplicate: Position,
    },
    #[error("{duplicate}: item '{name}' is already defined (first defined at {original})")]
    DuplicateItem {
        name: String,
        original: Position,
        duplicate: Position,
    },
    #[error("{duplicate}: room '{name}' is already defined (first defined at {original})")]
    DuplicateRoom {
        name: String,
        original: Position,
        duplicate: Position,
    },
    #[error("{duplicate}: script '{name}' is already defined (first defined at {original})")]
    DuplicateScript {
        name: String,
        original: Position,
        duplicate: Position,
    },
    #[error("{position}: SCRIPT block is missing its ENDSCRIPT")]
    UnterminatedScript { position: Position },
}

impl SymbolError {
    /// Where the problem was found; for duplicates, the second declaration.
    pub fn position(&self) -> Position {
        match self {
            SymbolError::MissingVariableName { position, .. }
            | SymbolError::MissingItemId { position, .. }
            | SymbolError::MissingRoomId { position, .. }
            | SymbolError::MissingScriptName { position, .. }
            | SymbolError::UnterminatedScript { position } => *position,
            SymbolError::DuplicateVariable { duplicate, .. }
            | SymbolError::DuplicateItem { duplicate, .. }
            | SymbolError::DuplicateRoom { duplicate, .. }
            | SymbolError::DuplicateScript { duplicate, .. } => *duplicate,
        }
    }

    fn missing_name(kind: SymbolKind, found: &Token) -> Self {
        let (found, position) = (found.describe(), found.position());
        match kind {
            SymbolKind::Variable => SymbolError::MissingVariableName { found, position },
            SymbolKind::Item => SymbolError::MissingItemId { found, position },
            SymbolKind::Room => SymbolError::MissingRoomId { found, position },
            SymbolKind::Script => SymbolError::MissingScriptName { found, position },
        }
    }

    fn duplicate(kind: SymbolKind, name: &str, original: Position, duplicate: Position) -> Self {
        let name = name.to_string();
        match kind {
            SymbolKind::Variable => SymbolError::DuplicateVariable {
                name,
                original,
                duplicate,
            },
            SymbolKind::Item => SymbolError::DuplicateItem {
                name,
                original,
                duplicate,
            },
            SymbolKind::Room => SymbolError::DuplicateRoom {
                name,
                original,
                duplicate,
            },
            SymbolKind::Script => SymbolError::DuplicateScript {
                name,
                original,
                duplicate,
            },
        }
    }
}

/// Name to symbol mapping for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Scan the whole stream once and register every declaration.
    ///
    /// # Errors
    /// Fails on a missing name after a declaring keyword, a duplicate name, or a
    /// SCRIPT without a matching ENDSCRIPT.
    pub fn build(tokens: &TokenStream) -> Result<Self, SymbolError> {
        let mut table = SymbolTable::default();
        let mut cursor = tokens.cursor();

        while !cursor.at_end() {
            match cursor.kind() {
                TokenKind::Var => {
                    cursor.advance();
                    let name = expect_name(&mut cursor, SymbolKind::Variable)?;
                    table.register(name, SymbolKind::Variable)?;
                    skip_line(&mut cursor);
                },
                TokenKind::Item => {
                    cursor.advance();
                    let name = expect_entity_id(&mut cursor, SymbolKind::Item)?;
                    table.register(name, SymbolKind::Item)?;
                    skip_line(&mut cursor);
                },
                TokenKind::Room => {
                    cursor.advance();
                    let name = expect_entity_id(&mut cursor, SymbolKind::Room)?;
                    table.register(name, SymbolKind::Room)?;
                    skip_line(&mut cursor);
                },
                TokenKind::Script => {
                    let script_pos = cursor.advance().position();
                    let name = expect_name(&mut cursor, SymbolKind::Script)?;
                    table.register(name, SymbolKind::Script)?;
                    skip_script_body(&mut cursor, script_pos)?;
                },
                _ => {
                    cursor.advance();
                },
            }
        }

        info!("symbol pass registered {} names", table.len());
        Ok(table)
    }

    fn register(&mut self, token: &Token, kind: SymbolKind) -> Result<(), SymbolError> {
        if let Some(existing) = self.symbols.get(&token.text) {
            return Err(SymbolError::duplicate(
                kind,
                &token.text,
                existing.position,
                token.position(),
            ));
        }
        debug!("registered {kind} '{}' at {}", token.text, token.position());
        self.symbols.insert(
            token.text.clone(),
            Symbol {
                kind,
                position: token.position(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).map(|s| s.kind)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn expect_name<'a>(cursor: &mut Cursor<'a>, kind: SymbolKind) -> Result<&'a Token, SymbolError> {
    cursor
        .eat(TokenKind::Ident)
        .ok_or_else(|| SymbolError::missing_name(kind, cursor.current()))
}

// "<display name>" ID = <ident>
fn expect_entity_id<'a>(cursor: &mut Cursor<'a>, kind: SymbolKind) -> Result<&'a Token, SymbolError> {
    for expected in [TokenKind::String, TokenKind::Id, TokenKind::Assign] {
        if cursor.eat(expected).is_none() {
            return Err(SymbolError::missing_name(kind, cursor.current()));
        }
    }
    expect_name(cursor, kind)
}

/// Consume tokens up to and including the next end-of-line.
fn skip_line(cursor: &mut Cursor<'_>) {
    while !cursor.at_end() {
        if cursor.advance().kind == TokenKind::Eol {
            break;
        }
    }
}

// Flat scan; a script body cannot contain another SCRIPT/ENDSCRIPT pair.
fn skip_script_body(cursor: &mut Cursor<'_>, script_pos: Position) -> Result<(), SymbolError> {
    while !cursor.at_end() {
        if cursor.advance().kind == TokenKind::EndScript {
            return Ok(());
        }
    }
    Err(SymbolError::UnterminatedScript { position: script_pos })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn build(src: &str) -> Result<SymbolTable, SymbolError> {
        SymbolTable::build(&tokenize(src).expect("tokenize ok"))
    }

    #[test]
    fn registers_all_declaration_kinds() {
        let src = r#"VAR playerLocation = cave
ITEM "Rock" ID=rock
  DESC "A plain rock."
  LOCATION=cave
ROOM "Cave" ID=cave
SCRIPT look
  MESSAGE "You look around."
  IF cave.items HAS ITEMS THEN
  ENDIF
ENDSCRIPT
COMMAND "look"
  EFFECT EXECUTE look
"#;
        let table = build(src).expect("symbols ok");
        assert_eq!(table.len(), 4);
        assert_eq!(table.kind_of("playerLocation"), Some(SymbolKind::Variable));
        assert_eq!(table.kind_of("rock"), Some(SymbolKind::Item));
        assert_eq!(table.kind_of("cave"), Some(SymbolKind::Room));
        assert_eq!(table.kind_of("look"), Some(SymbolKind::Script));
        assert_eq!(table.get("cave").map(|s| s.position), Some(Position::new(5, 16)));
    }

    #[test]
    fn duplicate_variable_reports_both_positions() {
        let err = build("VAR x = 1\nVAR x = 1\n").unwrap_err();
        assert_eq!(
            err,
            SymbolError::DuplicateVariable {
                name: "x".into(),
                original: Position::new(1, 5),
                duplicate: Position::new(2, 5),
            }
        );
    }

    #[test]
    fn namespace_is_shared_across_kinds() {
        let err = build("ROOM \"Hall\" ID=hall\nSCRIPT hall\nENDSCRIPT\n").unwrap_err();
        let SymbolError::DuplicateScript { ref name, original, .. } = err else {
            panic!("expected duplicate script, got {err:?}");
        };
        assert_eq!(name, "hall");
        assert_eq!(original, Position::new(1, 16));
    }

    #[test]
    fn missing_names() {
        assert!(matches!(build("VAR = 1"), Err(SymbolError::MissingVariableName { .. })));
        assert!(matches!(build("ITEM ID=rock"), Err(SymbolError::MissingItemId { .. })));
        assert!(matches!(build("ROOM \"Cave\" ID=\"cave\""), Err(SymbolError::MissingRoomId { .. })));
        assert!(matches!(build("SCRIPT\nENDSCRIPT"), Err(SymbolError::MissingScriptName { .. })));
    }

    #[test]
    fn unterminated_script_points_at_script_keyword() {
        let err = build("\n  SCRIPT intro\n  MESSAGE \"hi\"\n").unwrap_err();
        assert_eq!(
            err,
            SymbolError::UnterminatedScript {
                position: Position::new(2, 3)
            }
        );
    }

    #[test]
    fn stray_tokens_are_ignored() {
        let table = build("\n\nDESC \"orphan\"\nCOMMAND \"jump\"\n").expect("symbols ok");
        assert!(table.is_empty());
    }
}
