//! Serialized forms of a compiled definition.
//!
//! RON and JSON are straight serde dumps. The TOML form is built by hand with
//! `toml_edit` so each entry can carry a comment pointing back at its source line.

use clap::ValueEnum;
use tale_data::{
    Block, CommandEffect, Condition, Definition, InteractionFlag, MessageContent, Position, ScriptAction, Value,
};
use toml_edit::{Array, ArrayOfTables, Document, InlineTable, Item, Table, value};

/// Output formats understood by [`emit_definition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Ron,
    Json,
    Toml,
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("RON serialization failed: {0}")]
    Ron(#[from] ron::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a definition in the requested format.
///
/// # Errors
/// Returns an error if serde serialization fails.
pub fn emit_definition(def: &Definition, format: OutputFormat) -> Result<String, EmitError> {
    match format {
        OutputFormat::Ron => Ok(ron::ser::to_string_pretty(def, ron::ser::PrettyConfig::default())?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(def)?),
        OutputFormat::Toml => Ok(compile_definition_to_toml(def)),
    }
}

/// Render a definition as a TOML document with one array of tables per
/// entity kind.
pub fn compile_definition_to_toml(def: &Definition) -> String {
    let mut doc = Document::new();
    doc["player_start_location"] = value(def.player_start_location.clone());

    let mut variables = ArrayOfTables::new();
    for (name, var) in &def.variables {
        let mut t = Table::new();
        t["name"] = value(name.clone());
        t["type"] = value(var.declared_type.to_string());
        t["value"] = Item::Value(value_to_toml(&var.value));
        mark_source(&mut t, "variable", name, var.position);
        variables.push(t);
    }

    let mut items = ArrayOfTables::new();
    for item in def.items.values() {
        let mut t = Table::new();
        t["id"] = value(item.id.clone());
        t["name"] = value(item.display_name.clone());
        t["description"] = value(item.description.clone());
        if let Some(location) = &item.initial_location {
            t["location"] = value(location.clone());
        }
        if !item.interaction_flags.is_empty() {
            let mut flags = Array::default();
            for flag in &item.interaction_flags {
                flags.push(flag_name(*flag));
            }
            t["flags"] = Item::Value(flags.into());
        }
        mark_source(&mut t, "item", &item.id, item.position);
        items.push(t);
    }

    let mut rooms = ArrayOfTables::new();
    for room in def.rooms.values() {
        let mut t = Table::new();
        t["id"] = value(room.id.clone());
        t["name"] = value(room.display_name.clone());
        t["description"] = value(room.description.clone());
        mark_source(&mut t, "room", &room.id, room.position);
        rooms.push(t);
    }

    let mut commands = ArrayOfTables::new();
    for command in &def.commands {
        let mut t = Table::new();
        t["verb"] = value(command.verb.clone());
        let mut effect = InlineTable::new();
        match &command.effect {
            CommandEffect::CallScript { script_id } => {
                effect.insert("type", toml_edit::Value::from("callScript"));
                effect.insert("script_id", toml_edit::Value::from(script_id.clone()));
            },
        }
        t["effect"] = value(effect);
        mark_source(&mut t, "command", &command.verb, command.position);
        commands.push(t);
    }

    let mut scripts = ArrayOfTables::new();
    for script in def.scripts.values() {
        let mut t = Table::new();
        t["id"] = value(script.id.clone());
        t["body"] = Item::Value(block_to_array(&script.body).into());
        mark_source(&mut t, "script", &script.id, script.position);
        scripts.push(t);
    }

    for (key, aot) in [
        ("variables", variables),
        ("items", items),
        ("rooms", rooms),
        ("commands", commands),
        ("scripts", scripts),
    ] {
        if !aot.is_empty() {
            doc[key] = Item::ArrayOfTables(aot);
        }
    }
    doc.to_string()
}

fn mark_source(t: &mut Table, kind: &str, id: &str, position: Position) {
    t.decor_mut()
        .set_prefix(format!("# {kind} {id} (source line {})\n", position.line));
}

fn flag_name(flag: InteractionFlag) -> &'static str {
    match flag {
        InteractionFlag::Takeable => "takeable",
    }
}

fn value_to_toml(v: &Value) -> toml_edit::Value {
    match v {
        Value::Number(n) => toml_edit::Value::from(*n),
        Value::Text(s) | Value::IdRef(s) => toml_edit::Value::from(s.clone()),
        Value::Boolean(b) => toml_edit::Value::from(*b),
    }
}

fn block_to_array(block: &Block) -> Array {
    let mut arr = Array::default();
    for action in block {
        arr.push(action_to_value(action));
    }
    arr
}

fn action_to_value(action: &ScriptAction) -> toml_edit::Value {
    let mut t = InlineTable::new();
    match action {
        ScriptAction::Message { content, .. } => {
            t.insert("type", toml_edit::Value::from("message"));
            match content {
                MessageContent::Template(text) => {
                    t.insert("text", toml_edit::Value::from(text.clone()));
                },
                MessageContent::Value(expr) => {
                    t.insert("value", toml_edit::Value::from(expr.to_string()));
                },
            }
        },
        ScriptAction::If {
            condition, then_branch, ..
        } => {
            t.insert("type", toml_edit::Value::from("if"));
            let mut cond = InlineTable::new();
            match condition {
                Condition::CollectionCheck { target } => {
                    cond.insert("type", toml_edit::Value::from("hasItems"));
                    cond.insert("target", toml_edit::Value::from(target.to_string()));
                },
                Condition::Comparison { left, right, .. } => {
                    cond.insert("type", toml_edit::Value::from("equals"));
                    cond.insert("left", toml_edit::Value::from(left.to_string()));
                    cond.insert("right", toml_edit::Value::from(right.to_string()));
                },
            }
            t.insert("condition", toml_edit::Value::from(cond));
            t.insert("then", toml_edit::Value::from(block_to_array(then_branch)));
        },
        ScriptAction::For {
            loop_var,
            collection,
            body,
            ..
        } => {
            t.insert("type", toml_edit::Value::from("for"));
            t.insert("var", toml_edit::Value::from(loop_var.clone()));
            t.insert("in", toml_edit::Value::from(collection.to_string()));
            t.insert("body", toml_edit::Value::from(block_to_array(body)));
        },
    }
    toml_edit::Value::from(t)
}
