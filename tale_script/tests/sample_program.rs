use tale_data::{
    Block, CommandEffect, Condition, Definition, Expression, MessageContent, Position, ScriptAction, Value, ValueType,
    validate_definition,
};
use tale_script::{
    CompilerConfig, OutputFormat, compile_source, compile_tokens, emit_definition, render_source, tokenize,
};

const SAMPLE: &str = include_str!("fixtures/sample.tale");

fn compile(src: &str) -> Definition {
    compile_source(src, &CompilerConfig::default()).expect("compile ok")
}

fn without_positions(mut def: Definition) -> Definition {
    let origin = Position::default();
    for var in def.variables.values_mut() {
        var.position = origin;
    }
    for item in def.items.values_mut() {
        item.position = origin;
    }
    for room in def.rooms.values_mut() {
        room.position = origin;
    }
    for command in &mut def.commands {
        command.position = origin;
    }
    for script in def.scripts.values_mut() {
        script.position = origin;
        clear_block(&mut script.body);
    }
    def
}

fn clear_block(block: &mut Block) {
    for action in block {
        match action {
            ScriptAction::Message { content, position } => {
                *position = Position::default();
                if let MessageContent::Value(expr) = content {
                    clear_expr(expr);
                }
            },
            ScriptAction::If {
                condition,
                then_branch,
                position,
            } => {
                *position = Position::default();
                match condition {
                    Condition::CollectionCheck { target } => clear_expr(target),
                    Condition::Comparison { left, right, .. } => {
                        clear_expr(left);
                        clear_expr(right);
                    },
                }
                clear_block(then_branch);
            },
            ScriptAction::For {
                collection,
                body,
                position,
                ..
            } => {
                *position = Position::default();
                clear_expr(collection);
                clear_block(body);
            },
        }
    }
}

fn clear_expr(expr: &mut Expression) {
    match expr {
        Expression::VariableAccess { position, .. } => *position = Position::default(),
        Expression::IndexedAccess {
            object,
            index,
            position,
        } => {
            clear_expr(object);
            clear_expr(index);
            *position = Position::default();
        },
        Expression::PropertyAccess { object, position, .. } => {
            clear_expr(object);
            *position = Position::default();
        },
    }
}

#[test]
fn sample_compiles() {
    let def = compile(SAMPLE);
    assert_eq!(def.player_start_location, "cave");
    assert_eq!(def.variables.len(), 3);
    assert_eq!(def.variables["score"].value, Value::Number(0.0));
    assert_eq!(def.variables["lampLit"].declared_type, ValueType::Bool);
    assert_eq!(def.rooms.len(), 2);
    assert_eq!(def.rooms["tunnel"].description, "Water drips from the ceiling.");
    assert!(def.items["lamp"].is_takeable());
    assert!(!def.items["boulder"].is_takeable());
    assert_eq!(def.items["boulder"].initial_location.as_deref(), Some("tunnel"));
    assert_eq!(def.commands.len(), 2);
    assert_eq!(def.scripts["displayRoomInfo"].body.len(), 3);
    assert_eq!(def.scripts["displayRoomInfo"].position, Position::new(28, 8));
    assert!(validate_definition(&def).is_empty());
}

#[test]
fn declaration_order_does_not_matter() {
    let baseline = without_positions(compile(SAMPLE));
    for permuted in [
        include_str!("fixtures/sample_scripts_first.tale"),
        include_str!("fixtures/sample_items_before_rooms.tale"),
    ] {
        assert_eq!(without_positions(compile(permuted)), baseline);
    }
}

#[test]
fn rendered_source_recompiles_to_the_same_definition() {
    let def = compile(SAMPLE);
    let restated = render_source(&def);
    let again = compile(&restated);
    assert_eq!(without_positions(again), without_positions(def));
}

#[test]
fn compiling_one_stream_twice_is_idempotent() {
    let config = CompilerConfig::default();
    let tokens = tokenize(SAMPLE).expect("tokenize ok");
    let first = compile_tokens(&tokens, &config).expect("first compile");
    let second = compile_tokens(&tokens, &config).expect("second compile");
    assert_eq!(first, second);

    let broken = tokenize("VAR playerLocation = cave\nROOM \"Cave\" ID=cave\nITEM \"Rock\" ID=rock\n  DESC=5\n")
        .expect("tokenize ok");
    let e1 = compile_tokens(&broken, &config).unwrap_err().to_string();
    let e2 = compile_tokens(&broken, &config).unwrap_err().to_string();
    assert_eq!(e1, e2);
}

#[test]
fn serialized_definition_round_trips_and_validates() {
    let def = compile(SAMPLE);
    let text = emit_definition(&def, OutputFormat::Ron).expect("ron");
    let loaded: Definition = ron::from_str(&text).expect("ron parses");
    assert_eq!(loaded, def);
    assert!(validate_definition(&loaded).is_empty());
}

#[test]
fn commands_follow_source_order() {
    let def = compile(SAMPLE);
    let pairs: Vec<(&str, &str)> = def
        .commands
        .iter()
        .map(|c| match &c.effect {
            CommandEffect::CallScript { script_id } => (c.verb.as_str(), script_id.as_str()),
        })
        .collect();
    assert_eq!(pairs, [("look", "displayRoomInfo"), ("search", "searchRoom")]);
}
