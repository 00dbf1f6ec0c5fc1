use std::io::Write;

use tale_data::{CommandEffect, RoomDef};
use tale_script::{CompilerConfig, OutputFormat, compile_source, emit_definition};

#[test]
fn cave_scenario() {
    let src = "VAR playerLocation = cave\nROOM \"Cave\" ID=cave\n  DESC \"dark\"\n";
    let def = compile_source(src, &CompilerConfig::default()).expect("compile ok");
    let RoomDef {
        id,
        display_name,
        description,
        ..
    } = &def.rooms["cave"];
    assert_eq!(
        (id.as_str(), display_name.as_str(), description.as_str()),
        ("cave", "Cave", "dark")
    );
    assert_eq!(def.player_start_location, "cave");
}

#[test]
fn command_executes_script_declared_anywhere() {
    let command = "COMMAND \"look\"\n  EFFECT EXECUTE displayRoomInfo\n";
    let script = "SCRIPT displayRoomInfo\n  MESSAGE rooms[playerLocation].description\nENDSCRIPT\n";
    let start = "VAR playerLocation = cave\nROOM \"Cave\" ID=cave\n";

    for src in [
        format!("{start}{command}{script}"),
        format!("{script}{command}{start}"),
        format!("{command}{start}{script}"),
    ] {
        let def = compile_source(&src, &CompilerConfig::default()).expect("compile ok");
        assert_eq!(def.commands.len(), 1);
        assert_eq!(def.commands[0].verb, "look");
        assert_eq!(
            def.commands[0].effect,
            CommandEffect::CallScript {
                script_id: "displayRoomInfo".into()
            }
        );
        assert!(def.scripts.contains_key("displayRoomInfo"));
    }
}

#[test]
fn config_file_changes_start_variable_and_roots() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "start_location_var = \"here\"").expect("write");
    writeln!(file, "expression_roots = [\"world\"]").expect("write");
    let config = CompilerConfig::load(file.path()).expect("config loads");

    let src = "VAR here = hall\nROOM \"Hall\" ID=hall\n\
               SCRIPT peek\n  IF world.rooms HAS ITEMS THEN\n  ENDIF\nENDSCRIPT\n";
    let def = compile_source(src, &config).expect("compile ok");
    assert_eq!(def.player_start_location, "hall");

    // default roots are gone once the list is replaced
    let err = compile_source(&src.replace("world.rooms", "rooms.hall"), &config).expect_err("rooms not a root");
    assert!(err.to_string().contains("undefined identifier 'rooms'"));
}

#[test]
fn json_output_uses_definition_field_names() {
    let src = "VAR playerLocation = cave\nROOM \"Cave\" ID=cave\n  DESC \"dark\"\n";
    let def = compile_source(src, &CompilerConfig::default()).expect("compile ok");
    let json = emit_definition(&def, OutputFormat::Json).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json parses");
    assert_eq!(value["player_start_location"], "cave");
    assert_eq!(value["rooms"]["cave"]["display_name"], "Cave");
    assert_eq!(value["rooms"]["cave"]["description"], "dark");
}
