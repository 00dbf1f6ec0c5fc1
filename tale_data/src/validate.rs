use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a Definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MismatchedKey { kind: &'static str, key: String, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MismatchedKey { kind, key, id } => {
                write!(f, "{kind} stored under '{key}' has id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a Definition.
///
/// The compiler guarantees these for its own output; this is for definitions
/// read back from disk or assembled by other tools. All problems are collected.
///
/// ```
/// use tale_data::{Definition, Position, RoomDef, Value, ValueType, VariableDef, validate_definition};
///
/// let mut def = Definition::default();
/// def.rooms.insert("cave".into(), RoomDef {
///     id: "cave".into(),
///     display_name: "Cave".into(),
///     description: "dark".into(),
///     position: Position::new(2, 1),
/// });
/// def.variables.insert("playerLocation".into(), VariableDef {
///     declared_type: ValueType::Id,
///     value: Value::IdRef("cave".into()),
///     position: Position::new(1, 1),
/// });
/// def.player_start_location = "cave".into();
/// assert!(validate_definition(&def).is_empty());
/// ```
pub fn validate_definition(def: &Definition) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_keys("item", def.items.iter().map(|(k, v)| (k.as_str(), v.id.as_str())), &mut errors);
    check_keys("room", def.rooms.iter().map(|(k, v)| (k.as_str(), v.id.as_str())), &mut errors);
    check_keys("script", def.scripts.iter().map(|(k, v)| (k.as_str(), v.id.as_str())), &mut errors);

    let rooms: HashSet<&str> = def.rooms.keys().map(String::as_str).collect();
    let items: HashSet<&str> = def.items.keys().map(String::as_str).collect();
    let scripts: HashSet<&str> = def.scripts.keys().map(String::as_str).collect();
    let all: HashSet<&str> = rooms
        .iter()
        .chain(items.iter())
        .chain(scripts.iter())
        .copied()
        .chain(def.variables.keys().map(String::as_str))
        .collect();

    if def.player_start_location.trim().is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "player start location missing".to_string(),
        });
    } else {
        check_ref(
            "room",
            &def.player_start_location,
            &rooms,
            "player start location".to_string(),
            &mut errors,
        );
        let held_by_variable = def
            .variables
            .values()
            .any(|var| var.value.as_id() == Some(def.player_start_location.as_str()));
        if !held_by_variable {
            errors.push(ValidationError::InvalidValue {
                context: format!(
                    "no variable holds the start location '{}'",
                    def.player_start_location
                ),
            });
        }
    }

    for (name, var) in &def.variables {
        if var.declared_type != var.value.value_type() {
            errors.push(ValidationError::InvalidValue {
                context: format!(
                    "variable '{name}' declared {} but holds {}",
                    var.declared_type,
                    var.value.value_type()
                ),
            });
        }
        if let Some(id) = var.value.as_id() {
            check_ref("symbol", id, &all, format!("variable '{name}'"), &mut errors);
        }
    }

    for item in def.items.values() {
        if let Some(loc) = &item.initial_location
            && !rooms.contains(loc.as_str())
            && !items.contains(loc.as_str())
        {
            errors.push(ValidationError::MissingReference {
                kind: "room or item",
                id: loc.clone(),
                context: format!("item '{}' location", item.id),
            });
        }
    }

    for command in &def.commands {
        match &command.effect {
            CommandEffect::CallScript { script_id } => {
                check_ref(
                    "script",
                    script_id,
                    &scripts,
                    format!("command '{}'", command.verb),
                    &mut errors,
                );
            },
        }
    }

    errors
}

fn check_keys<'a>(
    kind: &'static str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    errors: &mut Vec<ValidationError>,
) {
    for (key, id) in entries {
        if key != id {
            errors.push(ValidationError::MismatchedKey {
                kind,
                key: key.to_string(),
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<&str>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> RoomDef {
        RoomDef {
            id: id.to_string(),
            display_name: format!("Room {id}"),
            description: "Test room".into(),
            position: Position::new(1, 1),
        }
    }

    fn item_in(id: &str, location: &str) -> ItemDef {
        ItemDef {
            id: id.to_string(),
            display_name: format!("Item {id}"),
            description: "Test item".into(),
            initial_location: Some(location.to_string()),
            interaction_flags: Default::default(),
            position: Position::new(1, 1),
        }
    }

    fn base_definition() -> Definition {
        let mut def = Definition::default();
        def.rooms.insert("start".into(), room("start"));
        def.variables.insert(
            "playerLocation".into(),
            VariableDef {
                declared_type: ValueType::Id,
                value: Value::IdRef("start".into()),
                position: Position::new(1, 1),
            },
        );
        def.player_start_location = "start".into();
        def
    }

    #[test]
    fn base_definition_is_clean() {
        assert!(validate_definition(&base_definition()).is_empty());
    }

    #[test]
    fn missing_start_location_is_reported() {
        let mut def = base_definition();
        def.player_start_location.clear();
        let errors = validate_definition(&def);
        assert!(errors.iter().any(|err| matches!(
            err,
            ValidationError::InvalidValue { context } if context.contains("start location")
        )));
    }

    #[test]
    fn item_location_may_be_room_or_item() {
        let mut def = base_definition();
        def.items.insert("chest".into(), item_in("chest", "start"));
        def.items.insert("coin".into(), item_in("coin", "chest"));
        assert!(validate_definition(&def).is_empty());

        def.items.insert("ghost".into(), item_in("ghost", "nowhere"));
        let errors = validate_definition(&def);
        assert!(errors.iter().any(|err| matches!(
            err,
            ValidationError::MissingReference { id, .. } if id == "nowhere"
        )));
    }

    #[test]
    fn command_must_call_existing_script() {
        let mut def = base_definition();
        def.commands.push(CommandDef {
            verb: "look".into(),
            effect: CommandEffect::CallScript {
                script_id: "describe".into(),
            },
            position: Position::new(3, 1),
        });
        let errors = validate_definition(&def);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "missing script 'describe' (command 'look')");
    }

    #[test]
    fn mismatched_keys_and_types_are_reported() {
        let mut def = base_definition();
        def.rooms.insert("alias".into(), room("other"));
        def.variables.insert(
            "score".into(),
            VariableDef {
                declared_type: ValueType::Number,
                value: Value::Text("ten".into()),
                position: Position::new(2, 1),
            },
        );
        let errors = validate_definition(&def);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::MismatchedKey { kind: "room", .. })));
        assert!(errors.iter().any(|err| matches!(
            err,
            ValidationError::InvalidValue { context } if context.contains("score")
        )));
    }
}
