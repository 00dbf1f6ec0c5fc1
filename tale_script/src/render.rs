//! Restate a compiled definition as Tale source.
//!
//! Output order is fixed (variables, rooms, items, commands, scripts) and
//! blocks are indented two spaces per level, so rendering is a cheap way to
//! normalize a source file. Compiling the output gives back the same
//! definition apart from source positions.

use tale_data::{Block, CommandEffect, Condition, Definition, MessageContent, ScriptAction, Value};

/// Quote a string literal. The language has no escapes, so text containing a
/// double quote is wrapped in single quotes instead.
fn q(s: &str) -> String {
    if s.contains('"') { format!("'{s}'") } else { format!("\"{s}\"") }
}

fn value_to_dsl(v: &Value) -> String {
    match v {
        Value::Number(n) => format!("{n}"),
        Value::Text(s) => q(s),
        Value::Boolean(b) => b.to_string(),
        Value::IdRef(id) => id.clone(),
    }
}

pub fn render_source(def: &Definition) -> String {
    let mut out = String::new();

    for (name, var) in &def.variables {
        out.push_str(&format!("VAR {name} = {}\n", value_to_dsl(&var.value)));
    }

    for room in def.rooms.values() {
        out.push_str(&format!("\nROOM {} ID={}\n", q(&room.display_name), room.id));
        if !room.description.is_empty() {
            out.push_str(&format!("  DESC {}\n", q(&room.description)));
        }
    }

    for item in def.items.values() {
        out.push_str(&format!("\nITEM {} ID={}\n", q(&item.display_name), item.id));
        if !item.description.is_empty() {
            out.push_str(&format!("  DESC {}\n", q(&item.description)));
        }
        if let Some(location) = &item.initial_location {
            out.push_str(&format!("  LOCATION={location}\n"));
        }
        if item.is_takeable() {
            out.push_str("  TAKEABLE=true\n");
        }
    }

    if !def.commands.is_empty() {
        out.push('\n');
    }
    for command in &def.commands {
        out.push_str(&format!("COMMAND {}\n", q(&command.verb)));
        match &command.effect {
            CommandEffect::CallScript { script_id } => {
                out.push_str(&format!("  EFFECT EXECUTE {script_id}\n"));
            },
        }
    }

    for script in def.scripts.values() {
        out.push_str(&format!("\nSCRIPT {}\n", script.id));
        render_block(&mut out, &script.body, 1);
        out.push_str("ENDSCRIPT\n");
    }

    out
}

fn render_block(out: &mut String, block: &Block, depth: usize) {
    let indent = "  ".repeat(depth);
    for action in block {
        match action {
            ScriptAction::Message { content, .. } => match content {
                MessageContent::Template(text) => out.push_str(&format!("{indent}MESSAGE {}\n", q(text))),
                MessageContent::Value(expr) => out.push_str(&format!("{indent}MESSAGE {expr}\n")),
            },
            ScriptAction::If {
                condition, then_branch, ..
            } => {
                let cond = match condition {
                    Condition::CollectionCheck { target } => format!("{target} HAS ITEMS"),
                    Condition::Comparison { left, right, .. } => format!("{left} == {right}"),
                };
                out.push_str(&format!("{indent}IF {cond} THEN\n"));
                render_block(out, then_branch, depth + 1);
                out.push_str(&format!("{indent}ENDIF\n"));
            },
            ScriptAction::For {
                loop_var,
                collection,
                body,
                ..
            } => {
                out.push_str(&format!("{indent}FOR {loop_var} IN {collection} DO\n"));
                render_block(out, body, depth + 1);
                out.push_str(&format!("{indent}ENDFOR\n"));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompilerConfig, compile_source};

    #[test]
    fn renders_canonical_layout() {
        let src = concat!(
            "ROOM \"Cave\" ID=cave\nVAR playerLocation=cave\nVAR gold = 12\n",
            "SCRIPT look\nIF playerLocation == cave THEN\nMESSAGE 'Say \"hi\"'\nENDIF\nENDSCRIPT\n",
        );
        let def = compile_source(src, &CompilerConfig::default()).expect("compile ok");
        let expected = "VAR gold = 12
VAR playerLocation = cave

ROOM \"Cave\" ID=cave

SCRIPT look
  IF playerLocation == cave THEN
    MESSAGE 'Say \"hi\"'
  ENDIF
ENDSCRIPT
";
        assert_eq!(render_source(&def), expected);
    }

    #[test]
    fn rendered_source_compiles_to_the_same_text() {
        let src = concat!(
            "VAR playerLocation = cave\nROOM \"Cave\" ID=cave\n  DESC \"Dark.\"\n",
            "ITEM \"Lamp\" ID=lamp\n  LOCATION=cave\n  TAKEABLE=true\n",
            "COMMAND \"look\"\n  EFFECT EXECUTE look\n",
            "SCRIPT look\n  FOR i IN rooms[playerLocation].items DO\n    MESSAGE i\n  ENDFOR\nENDSCRIPT\n",
        );
        let config = CompilerConfig::default();
        let first = render_source(&compile_source(src, &config).expect("compile ok"));
        let second = render_source(&compile_source(&first, &config).expect("recompile ok"));
        assert_eq!(first, second);
    }
}
