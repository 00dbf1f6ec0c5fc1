//! tale_script: compiler for the Tale adventure language.
//!
//! Compilation runs in two passes over one token stream:
//! - [`SymbolTable::build`] records every declared variable, item, room and script
//! - [`DefinitionParser`] walks the tokens again, resolving each reference
//!   against that table and feeding a [`DefinitionBuilder`]
//!
//! The result is a [`tale_data::Definition`]. [`emit`] serializes it and
//! [`render`] restates it as source.

pub mod builder;
pub mod config;
pub mod emit;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod symbols;
pub mod token;

pub use builder::DefinitionBuilder;
pub use config::{CompilerConfig, ConfigError};
pub use emit::{EmitError, OutputFormat, compile_definition_to_toml, emit_definition};
pub use lexer::{LexError, tokenize};
pub use parser::{DefinitionParser, ParseError};
pub use render::render_source;
pub use symbols::{Symbol, SymbolError, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind, TokenStream};

use tale_data::{Definition, Position};

/// Any failure between source text and a finished definition.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CompileError {
    pub fn position(&self) -> Option<Position> {
        match self {
            CompileError::Lex(e) => Some(e.position()),
            CompileError::Symbol(e) => Some(e.position()),
            CompileError::Parse(e) => e.position(),
            CompileError::Config(_) => None,
        }
    }
}

/// Compile source text into a definition.
///
/// # Errors
/// Returns the first lexical, declaration or parse error encountered.
pub fn compile_source(source: &str, config: &CompilerConfig) -> Result<Definition, CompileError> {
    let tokens = tokenize(source)?;
    compile_tokens(&tokens, config)
}

/// Compile an already tokenized program. Each call starts from fresh state,
/// so compiling the same stream twice yields equal definitions.
///
/// # Errors
/// Returns the first declaration or parse error encountered.
pub fn compile_tokens(tokens: &TokenStream, config: &CompilerConfig) -> Result<Definition, CompileError> {
    let symbols = SymbolTable::build(tokens)?;
    let def = DefinitionParser::new(tokens, &symbols, config).parse()?;
    Ok(def)
}
