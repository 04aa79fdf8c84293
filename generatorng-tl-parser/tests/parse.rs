use generatorng_tl_parser::errors::{ParamParseError, ParseError, SchemaError};
use generatorng_tl_parser::tl::{Category, ParameterType};
use generatorng_tl_parser::{parse_json_schema, parse_tl_file, parse_tl_schema};

#[test]
fn parses_simple_type() {
    let src = "boolFalse#bc799737 = Bool;";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "boolFalse");
    assert_eq!(defs[0].id, 0xbc799737);
    assert_eq!(defs[0].ty.name, "Bool");
    assert_eq!(defs[0].source.as_deref(), Some("boolFalse#bc799737 = Bool;"));
}

#[test]
fn parses_function_category() {
    let src = "
---functions---
help.getConfig#c4f9186b = Config;
";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].category, Category::Functions);
    assert_eq!(defs[0].name, "getConfig");
    assert_eq!(defs[0].namespace, vec!["help"]);
}

#[test]
fn types_marker_switches_back() {
    let src = "
---functions---
ping#7abe77ec ping_id:long = Pong;
---types---
pong#347773c5 msg_id:long ping_id:long = Pong;
";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs[0].category, Category::Functions);
    assert_eq!(defs[1].category, Category::Types);
}

#[test]
fn parses_flagged_parameter() {
    let src = "user#3ff6ecb0 flags:# id:long username:flags.0?string = User;";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs[0].params.len(), 3);
    assert_eq!(defs[0].params[0].ty, ParameterType::Flags);
    let flag = defs[0].params[2].flag().unwrap();
    assert_eq!(flag.name, "flags");
    assert_eq!(flag.index, 0);
}

#[test]
fn skips_blank_lines_and_comments() {
    let src = "
// this is a comment
boolTrue#997275b5 = Bool;
// another comment

boolFalse#bc799737 = Bool; // trailing comment
";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs.len(), 2);
}

#[test]
fn crc32_derived_id() {
    let defs = parse_tl_schema("boolFalse = Bool;").unwrap();
    assert_eq!(defs[0].id, 0xbc799737);
}

#[test]
fn crc32_derived_id_with_generic_param() {
    let defs = parse_tl_schema("msgs_ack msg_ids:Vector<long> = MsgsAck;").unwrap();
    assert_eq!(defs[0].id, 0x62d6b459);
}

#[test]
fn id_annotation_is_ignored() {
    let defs = parse_tl_schema("inputPeerEmpty#7f3b18ea@layer = InputPeer;").unwrap();
    assert_eq!(defs[0].id, 0x7f3b18ea);
}

#[test]
fn template_line_declares_no_params() {
    let defs = parse_tl_schema("vector#1cb5c415 {t:Type} # [ t ] = Vector t;").unwrap();
    assert!(defs[0].template);
    assert!(defs[0].params.is_empty());
    assert_eq!(defs[0].ty.name, "Vector");
    assert_eq!(defs[0].id, 0x1cb5c415);
}

#[test]
fn multi_line_definition() {
    let src = "user#12345\n  id:long\n  name:string = User;";
    let defs = parse_tl_schema(src).unwrap();
    assert_eq!(defs[0].params.len(), 2);
}

#[test]
fn malformed_line_reports_line_number() {
    let src = "
boolTrue#997275b5 = Bool;
broken#zz = Bool;
boolFalse#bc799737 = Bool;
";
    let mut iter = parse_tl_file(src);
    assert!(iter.next().unwrap().is_ok());
    let err = iter.next().unwrap().unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.content, "broken#zz = Bool;");
    assert!(matches!(err.error, ParseError::InvalidId(_)));
    // Parsing never resumes after a failure.
    assert!(iter.next().is_none());
}

#[test]
fn undeclared_flag_field_is_rejected() {
    let err = parse_tl_schema("x#1 name:flags.0?string = X;").unwrap_err();
    let SchemaError::Syntax(line) = err else { panic!("expected a syntax error") };
    assert_eq!(
        line.error,
        ParseError::InvalidParam(ParamParseError::MissingFlagField { name: "flags".into() })
    );
}

#[test]
fn missing_result_type() {
    let err = parse_tl_schema("x#1 a:int;").unwrap_err();
    let SchemaError::Syntax(line) = err else { panic!("expected a syntax error") };
    assert_eq!(line.error, ParseError::MissingType);
}

#[test]
fn unterminated_definition() {
    let err = parse_tl_schema("user#1 id:long = User").unwrap_err();
    let SchemaError::Syntax(line) = err else { panic!("expected a syntax error") };
    assert_eq!(line.error, ParseError::Unterminated);
    assert_eq!(line.line, 1);
}

// ── JSON front end ────────────────────────────────────────────────────────────

const JSON: &str = r#"{
  "constructors": [
    { "id": "bc799737", "predicate": "boolFalse", "params": [], "type": "Bool" },
    { "id": "0x1cb5c415", "predicate": "vector", "params": [], "type": "Vector t" },
    { "id": "fffffb2e", "predicate": "auth.sentCode",
      "params": [ { "name": "phone_code_hash", "type": "string" } ], "type": "auth.SentCode" }
  ],
  "methods": [
    { "id": "abcdef01", "method": "auth.sendCode",
      "params": [ { "name": "phone_number", "type": "string" },
                  { "name": "ids", "type": "Vector<long>" } ],
      "type": "auth.SentCode" }
  ]
}"#;

#[test]
fn json_schema() {
    let defs = parse_json_schema(JSON.as_bytes()).unwrap();
    assert_eq!(defs.len(), 4);
    assert_eq!(defs[0].id, 0xbc799737);
    assert_eq!(defs[1].ty.name, "Vector");
    assert_eq!(defs[2].id, (-1234i32) as u32);
    assert_eq!(defs[2].namespace, vec!["auth"]);
    assert_eq!(defs[3].category, Category::Functions);
    assert_eq!(defs[3].full_name(), "auth.sendCode");
    assert_eq!(defs[3].params.len(), 2);
    assert!(defs[3].params.iter().all(|p| p.flag().is_none()));
}

#[test]
fn json_rejects_conditional_params() {
    let src = r##"{ "constructors": [ { "id": "1", "predicate": "x",
        "params": [ { "name": "flags", "type": "#" }, { "name": "a", "type": "flags.0?int" } ],
        "type": "X" } ] }"##;
    let err = parse_json_schema(src.as_bytes()).unwrap_err();
    let SchemaError::InvalidEntry { name, error } = err else { panic!("expected an entry error") };
    assert_eq!(name, "x");
    assert_eq!(error, ParseError::InvalidParam(ParamParseError::UnexpectedFlag));
}

#[test]
fn json_decimal_ids() {
    let src = r#"{
      "constructors": [
        { "id": "-1132882121", "predicate": "boolFalse", "params": [], "type": "Bool" },
        { "id": "481674261", "predicate": "vector", "params": [], "type": "Vector t" }
      ],
      "methods": [
        { "id": "1461180992", "method": "auth.logOut", "params": [], "type": "Bool" }
      ]
    }"#;
    let defs = parse_json_schema(src.as_bytes()).unwrap();
    assert_eq!(defs[0].id, 0xbc799737);
    assert_eq!(defs[1].id, 0x1cb5c415);
    assert_eq!(defs[2].id, 0x5717da40);
}

#[test]
fn json_mixed_id_spellings_rejected() {
    let src = r#"{ "constructors": [
        { "id": "bc799737", "predicate": "boolFalse", "params": [], "type": "Bool" },
        { "id": "481674261", "predicate": "vector", "params": [], "type": "Vector t" } ] }"#;
    let err = parse_json_schema(src.as_bytes()).unwrap_err();
    assert!(matches!(err, SchemaError::MixedIds { .. }));
}

#[test]
fn json_syntax_error_aborts() {
    let err = parse_json_schema(b"{ \"constructors\": [ ").unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}

#[test]
fn json_template_method() {
    let src = r#"{ "methods": [ { "id": "da9b0d0d", "method": "invokeWithLayer",
        "params": [ { "name": "layer", "type": "int" }, { "name": "query", "type": "!X" } ],
        "type": "X" } ] }"#;
    let defs = parse_json_schema(src.as_bytes()).unwrap();
    assert!(defs[0].template);
    assert!(defs[0].params.is_empty());
}
