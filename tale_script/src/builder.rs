//! Incremental assembly of the compiled definition.
//!
//! Entities are registered first and then filled in property by property.
//! Mutating an entity that was never registered is a bug in the caller, not
//! a problem with the source program, so those paths panic.

use tale_data::{
    Block, CommandDef, Definition, InteractionFlag, ItemDef, Position, RoomDef, ScriptDef, ValueType, VariableDef,
};

use crate::parser::ParseError;
use crate::symbols::{SymbolKind, SymbolTable};

#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    def: Definition,
    start_location_var: String,
}

impl DefinitionBuilder {
    pub fn new(start_location_var: impl Into<String>) -> Self {
        Self {
            def: Definition::default(),
            start_location_var: start_location_var.into(),
        }
    }

    pub fn start_location_var(&self) -> &str {
        &self.start_location_var
    }

    pub fn register_item(&mut self, id: &str, display_name: &str, position: Position) {
        self.def.items.insert(
            id.to_string(),
            ItemDef {
                id: id.to_string(),
                display_name: display_name.to_string(),
                description: String::new(),
                initial_location: None,
                interaction_flags: Default::default(),
                position,
            },
        );
    }

    pub fn register_room(&mut self, id: &str, display_name: &str, position: Position) {
        self.def.rooms.insert(
            id.to_string(),
            RoomDef {
                id: id.to_string(),
                display_name: display_name.to_string(),
                description: String::new(),
                position,
            },
        );
    }

    pub fn register_script(&mut self, id: &str, position: Position) {
        self.def.scripts.insert(
            id.to_string(),
            ScriptDef {
                id: id.to_string(),
                body: Vec::new(),
                position,
            },
        );
    }

    /// # Panics
    /// If the item was not registered.
    pub fn set_item_description(&mut self, id: &str, text: &str) {
        self.item_mut(id).description = text.to_string();
    }

    /// # Panics
    /// If the item was not registered.
    pub fn set_item_location(&mut self, id: &str, location: &str) {
        self.item_mut(id).initial_location = Some(location.to_string());
    }

    /// # Panics
    /// If the item was not registered.
    pub fn add_interaction_flag(&mut self, id: &str, flag: InteractionFlag) {
        self.item_mut(id).interaction_flags.insert(flag);
    }

    /// # Panics
    /// If the room was not registered.
    pub fn set_room_description(&mut self, id: &str, text: &str) {
        let room = self
            .def
            .rooms
            .get_mut(id)
            .unwrap_or_else(|| panic!("room '{id}' must be registered before it is modified"));
        room.description = text.to_string();
    }

    /// # Panics
    /// If the script was not registered.
    pub fn set_script_body(&mut self, id: &str, body: Block) {
        let script = self
            .def
            .scripts
            .get_mut(id)
            .unwrap_or_else(|| panic!("script '{id}' must be registered before its body is set"));
        script.body = body;
    }

    pub fn append_command(&mut self, command: CommandDef) {
        self.def.commands.push(command);
    }

    /// Store a variable. The start-location variable must hold a reference to
    /// a room; on success that room becomes the player's start location.
    ///
    /// # Errors
    /// `TypeMismatch` when the start variable holds a non-reference value,
    /// `UndefinedIdentifier` / `ReferenceTypeMismatch` when it does not name a room.
    pub fn set_variable(
        &mut self,
        name: &str,
        var: VariableDef,
        value_pos: Position,
        symbols: &SymbolTable,
    ) -> Result<(), ParseError> {
        if name == self.start_location_var {
            let room_id = var.value.as_id().ok_or(ParseError::TypeMismatch {
                context: "start location variable",
                expected: ValueType::Id,
                found: var.value.value_type(),
                position: value_pos,
            })?;
            let symbol = symbols.get(room_id).ok_or_else(|| ParseError::UndefinedIdentifier {
                name: room_id.to_string(),
                position: value_pos,
            })?;
            if symbol.kind != SymbolKind::Room {
                return Err(ParseError::ReferenceTypeMismatch {
                    context: "start location variable",
                    name: room_id.to_string(),
                    expected: SymbolKind::Room,
                    found: symbol.kind,
                    declared_at: symbol.position,
                    position: value_pos,
                });
            }
            self.def.player_start_location = room_id.to_string();
        }
        self.def.variables.insert(name.to_string(), var);
        Ok(())
    }

    /// Snapshot of everything accumulated so far. May be called repeatedly.
    pub fn build(&self) -> Definition {
        self.def.clone()
    }

    fn item_mut(&mut self, id: &str) -> &mut ItemDef {
        self.def
            .items
            .get_mut(id)
            .unwrap_or_else(|| panic!("item '{id}' must be registered before it is modified"))
    }
}
