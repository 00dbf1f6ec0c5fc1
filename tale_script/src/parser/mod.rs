//! Second pass: recursive descent over the token stream.
//!
//! The parser walks the same tokens the symbol pass saw, resolving every
//! reference against the finished symbol table and feeding a
//! [`DefinitionBuilder`]. The first problem aborts the compilation.

use log::info;
use tale_data::{Definition, Position, ValueType};

use crate::builder::DefinitionBuilder;
use crate::config::CompilerConfig;
use crate::symbols::{SymbolKind, SymbolTable};
use crate::token::{Cursor, TokenKind, TokenStream};

mod command;
mod conditions;
mod helpers;
mod item;
mod room;
mod script;
mod variable;

/// Errors raised while parsing declarations and script bodies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{position}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: Position,
    },
    #[error("{position}: invalid number '{text}'")]
    InvalidNumberFormat { text: String, position: Position },
    #[error("{position}: undefined identifier '{name}'")]
    UndefinedIdentifier { name: String, position: Position },
    #[error("{position}: {context} expects a {expected} value, found a {found}")]
    TypeMismatch {
        context: &'static str,
        expected: ValueType,
        found: ValueType,
        position: Position,
    },
    #[error("{position}: {context} must reference a {expected}, but '{name}' is a {found} (declared at {declared_at})")]
    ReferenceTypeMismatch {
        context: &'static str,
        name: String,
        expected: SymbolKind,
        found: SymbolKind,
        declared_at: Position,
        position: Position,
    },
    #[error("{position}: {context} cannot be a {found}")]
    InvalidExpressionKind {
        context: &'static str,
        found: String,
        position: Position,
    },
    #[error("{position}: {entity} does not support the {property} property")]
    UnsupportedProperty {
        entity: &'static str,
        property: &'static str,
        position: Position,
    },
    #[error("start location variable '{name}' is never assigned")]
    MissingStartLocation { name: String },
}

impl ParseError {
    /// Source position of the error, when it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidNumberFormat { position, .. }
            | ParseError::UndefinedIdentifier { position, .. }
            | ParseError::TypeMismatch { position, .. }
            | ParseError::ReferenceTypeMismatch { position, .. }
            | ParseError::InvalidExpressionKind { position, .. }
            | ParseError::UnsupportedProperty { position, .. } => Some(*position),
            ParseError::MissingStartLocation { .. } => None,
        }
    }
}

/// Recursive-descent parser for one compilation.
///
/// Construct one per token stream; `parse` consumes it.
pub struct DefinitionParser<'a> {
    cursor: Cursor<'a>,
    symbols: &'a SymbolTable,
    config: &'a CompilerConfig,
    builder: DefinitionBuilder,
    // FOR loop variables visible at the current nesting depth
    loop_vars: Vec<String>,
}

impl<'a> DefinitionParser<'a> {
    pub fn new(tokens: &'a TokenStream, symbols: &'a SymbolTable, config: &'a CompilerConfig) -> Self {
        Self {
            cursor: tokens.cursor(),
            symbols,
            config,
            builder: DefinitionBuilder::new(config.start_location_var.clone()),
            loop_vars: Vec::new(),
        }
    }

    /// Parse every top-level declaration and return the finished definition.
    ///
    /// # Errors
    /// Returns the first grammar or semantic violation found.
    pub fn parse(mut self) -> Result<Definition, ParseError> {
        loop {
            match self.cursor.kind() {
                TokenKind::Var => self.parse_variable()?,
                TokenKind::Item => self.parse_item()?,
                TokenKind::Room => self.parse_room()?,
                TokenKind::Command => self.parse_command()?,
                TokenKind::Script => self.parse_script()?,
                TokenKind::Eol => {
                    self.cursor.advance();
                },
                TokenKind::Eof => break,
                _ => return Err(self.unexpected("VAR, ITEM, ROOM, COMMAND or SCRIPT")),
            }
        }

        let def = self.builder.build();
        if def.player_start_location.is_empty() {
            return Err(ParseError::MissingStartLocation {
                name: self.builder.start_location_var().to_string(),
            });
        }
        info!(
            "compiled {} variables, {} items, {} rooms, {} commands, {} scripts (start: '{}')",
            def.variables.len(),
            def.items.len(),
            def.rooms.len(),
            def.commands.len(),
            def.scripts.len(),
            def.player_start_location
        );
        Ok(def)
    }
}
