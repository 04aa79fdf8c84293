use generatorng_tl_gen::model::Constructor;
use generatorng_tl_gen::{Config, SchemaModel, build_model};
use generatorng_tl_parser::parse_tl_schema;
use generatorng_tl_wire::serialize::{MAX_BYTES_LEN, write_bytes};
use generatorng_tl_wire::{Cursor, Deserializable, Error, Object, Serializable, Value, WireCodec};

// ── Primitive round-trips ─────────────────────────────────────────────────────

#[test]
fn roundtrip_u32() {
    for v in [0u32, u32::MAX, 42, 0xabcdef01] {
        let bytes = v.to_bytes();
        assert_eq!(u32::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_u64() {
    for v in [0u64, u64::MAX, 1_234_567_890] {
        let bytes = v.to_bytes();
        assert_eq!(u64::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_bool_true() {
    let bytes = true.to_bytes();
    assert_eq!(bytes, 0x997275b5u32.to_le_bytes());
    assert!(bool::from_bytes(&bytes).unwrap());
}

#[test]
fn roundtrip_bool_false() {
    let bytes = false.to_bytes();
    assert_eq!(bytes, 0xbc799737u32.to_le_bytes());
    assert!(!bool::from_bytes(&bytes).unwrap());
}

// ── String / bytes ────────────────────────────────────────────────────────────

fn tl_bytes(data: impl AsRef<[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    write_bytes(data.as_ref(), &mut buf).unwrap();
    buf
}

#[test]
fn roundtrip_empty_string() {
    let bytes = tl_bytes("");
    assert_eq!(bytes, [0, 0, 0, 0]);
    assert_eq!(String::from_bytes(&bytes).unwrap(), "");
}

#[test]
fn roundtrip_short_string() {
    let s = "hello world".to_owned();
    let bytes = tl_bytes(&s);
    assert_eq!(bytes.len() % 4, 0, "must be 4-byte aligned");
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_long_string() {
    // >253 bytes triggers the 4-byte length header path
    let s = "x".repeat(300);
    let bytes = tl_bytes(&s);
    assert_eq!(&bytes[..4], &[0xfe, 0x2c, 0x01, 0x00]);
    assert_eq!(bytes.len(), 304);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn invalid_utf8_is_reported() {
    let bytes = tl_bytes([0xff_u8, 0xfe]);
    assert_eq!(String::from_bytes(&bytes), Err(Error::InvalidUtf8));
}

#[test]
fn longest_payload_uses_full_header() {
    let data = vec![7u8; MAX_BYTES_LEN];
    let bytes = tl_bytes(&data);
    assert_eq!(&bytes[..4], &[0xfe, 0xff, 0xff, 0xff]);
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), data);
}

#[test]
fn oversized_payload_is_rejected() {
    let data = vec![0u8; MAX_BYTES_LEN + 1];
    let mut buf = Vec::new();
    assert_eq!(write_bytes(&data, &mut buf), Err(Error::PayloadTooLarge { len: MAX_BYTES_LEN + 1 }));
    assert!(buf.is_empty());
}

#[test]
fn eof_is_detected() {
    let mut cursor = Cursor::from_slice(&[0x01, 0x02]);
    assert_eq!(u32::deserialize(&mut cursor), Err(Error::UnexpectedEof));
}

// ── Schema-driven ─────────────────────────────────────────────────────────────

const SCHEMA: &str = "
boolFalse#bc799737 = Bool;
boolTrue#997275b5 = Bool;
vector#1cb5c415 {t:Type} # [ t ] = Vector t;

photoEmpty#2331b22d id:long = Photo;
photo#22b56751 id:long sizes:Vector<int> = Photo;

channel#a14dca52 flags:# creator:flags.0?true username:flags.6?string photo:flags.1?Photo id:int title:string = Chat;

auth.sentCode#efed51d9 phone_registered:Bool phone_code_hash:string = auth.SentCode;

messageMediaGeo#10 flags:# silent:flags.2?true ttl:flags.0?int photo:flags.1?Photo = MessageMedia;
messageMediaDice#11 flags:long value:int = MessageMedia;

---functions---

authSendCode#abcdef01 phone_number:string sms_type:int api_id:int api_hash:string lang_code:string = auth.SentCode;
";

fn model() -> SchemaModel {
    build_model(&parse_tl_schema(SCHEMA).unwrap(), &Config::default())
}

fn channel(mask: u32) -> Object {
    let photo = Object::new(0x22b56751)
        .with("id", Value::Long(7))
        .with("sizes", Value::Vector(vec![Value::Int(1), Value::Int(2)]));

    let mut object = Object::new(0xa14dca52);
    object.fields = vec![
        ("creator".into(), (mask & 1 != 0).then_some(Value::Bool(true))),
        ("username".into(), (mask & 2 != 0).then(|| Value::from("durov"))),
        ("photo".into(), (mask & 4 != 0).then(|| photo.into())),
        ("id".into(), Some(Value::Int(1))),
        ("title".into(), Some(Value::from("Telegram"))),
    ];
    object
}

#[test]
fn roundtrip_every_flag_subset() {
    let model = model();
    let codec = WireCodec::new(&model);
    for mask in 0..8 {
        let value = Value::Object(channel(mask));
        let bytes = codec.encode("TLChat", &value).unwrap();
        assert_eq!(codec.decode("TLChat", &bytes).unwrap(), value, "mask {mask:03b}");
    }
}

/// A sample value of target type `ty`. Objects use the type's first
/// constructor with every conditional field set.
fn sample(model: &SchemaModel, ty: &str) -> Value {
    if let Some(inner) = ty.strip_prefix("TLVector<").and_then(|t| t.strip_suffix('>')) {
        return Value::Vector(vec![sample(model, inner)]);
    }
    if let Some(inner) = ty.strip_prefix("TLPtr<").and_then(|t| t.strip_suffix('>')) {
        return sample(model, inner);
    }
    match ty {
        "bool" => Value::Bool(true),
        "quint32" => Value::Int(7),
        "quint64" => Value::Long(9),
        "double" => Value::Double(1.5),
        "QString" => Value::from("text"),
        "QByteArray" => Value::Bytes(vec![1, 2, 3]),
        "TLNumber128" => Value::Int128([1; 16]),
        "TLNumber256" => Value::Int256([2; 32]),
        _ => {
            let constructor = &model.type_by_name(ty).unwrap().constructors[0];
            Value::Object(object_with(model, constructor, u64::MAX))
        }
    }
}

/// `constructor` with its `i`-th conditional field present iff bit `i` of
/// `mask` is set.
fn object_with(model: &SchemaModel, constructor: &Constructor, mask: u64) -> Object {
    let mut object = Object::new(constructor.id);
    let mut gated = 0u32;
    for param in constructor.params.iter().filter(|p| !p.is_flags()) {
        let value = if param.flag.is_some() {
            let set = mask >> gated & 1 == 1;
            gated += 1;
            set.then(|| if param.is_flag_only() { Value::Bool(true) } else { sample(model, &param.ty) })
        } else {
            Some(sample(model, &param.ty))
        };
        object.fields.push((param.name.clone(), value));
    }
    object
}

#[test]
fn roundtrip_every_constructor_and_flag_subset() {
    let model = model();
    let codec = WireCodec::new(&model);
    let mut checked = 0;
    let structs = model
        .types()
        .iter()
        .filter(|t| t.name.starts_with("TL") && !t.name.starts_with("TLVector"));
    for ty in structs {
        for constructor in &ty.constructors {
            let gated = constructor.params.iter().filter(|p| p.flag.is_some()).count();
            for mask in 0..1u64 << gated {
                let value = Value::Object(object_with(&model, constructor, mask));
                let bytes = codec.encode(&ty.name, &value).unwrap();
                assert_eq!(
                    codec.decode(&ty.name, &bytes).unwrap(),
                    value,
                    "{} mask {mask:b}",
                    constructor.name
                );
                checked += 1;
            }
        }
    }
    // photoEmpty, photo, channel (8), auth.sentCode, messageMediaGeo (8), messageMediaDice
    assert!(checked >= 20, "{checked}");
}

#[test]
fn renamed_flags_field_still_gates() {
    let model = model();
    let geo = &model.type_by_name("TLMessageMedia").unwrap().constructors[0];
    let flags = &geo.params[0];
    assert!(flags.is_flags());
    assert_ne!(flags.name, "flags");
    assert!(geo.params.iter().filter_map(|p| p.flag.as_ref()).all(|f| f.member == flags.name));

    let codec = WireCodec::new(&model);
    let value = Value::Object(object_with(&model, geo, 0b011));
    let bytes = codec.encode("TLMessageMedia", &value).unwrap();
    // silent is bit 2, ttl bit 0, photo (bit 1) absent.
    assert_eq!(&bytes[4..8], &0b101u32.to_le_bytes());
    assert_eq!(codec.decode("TLMessageMedia", &bytes).unwrap(), value);
}

#[test]
fn flags_word_matches_bits() {
    let model = model();
    let codec = WireCodec::new(&model);
    let bytes = codec.encode("TLChat", &channel(0b101).into()).unwrap();
    // creator is bit 0, photo is bit 1, username (bit 6) is absent.
    assert_eq!(&bytes[4..8], &0b11u32.to_le_bytes());
}

#[test]
fn fields_follow_schema_order() {
    let model = model();
    let codec = WireCodec::new(&model);
    let mut shuffled = channel(0);
    shuffled.fields.reverse();
    assert_eq!(
        codec.encode("TLChat", &shuffled.into()).unwrap(),
        codec.encode("TLChat", &channel(0).into()).unwrap(),
    );
}

#[test]
fn auth_send_code_request_bytes() {
    let model = model();
    let codec = WireCodec::new(&model);
    let args = vec![
        ("phoneNumber".to_owned(), Some(Value::from("+1"))),
        ("smsType".to_owned(), Some(Value::Int(5))),
        ("apiId".to_owned(), Some(Value::Int(1))),
        ("apiHash".to_owned(), Some(Value::from("ab"))),
        ("langCode".to_owned(), Some(Value::from("en"))),
    ];
    let bytes = codec.encode_request("authSendCode", &args).unwrap();
    assert_eq!(
        bytes,
        [
            0x01, 0xef, 0xcd, 0xab, // tag
            2, b'+', b'1', 0,
            5, 0, 0, 0,
            1, 0, 0, 0,
            2, b'a', b'b', 0,
            2, b'e', b'n', 0,
        ]
    );

    let (name, decoded) = codec.decode_request(&bytes).unwrap();
    assert_eq!(name, "authSendCode");
    assert_eq!(decoded.fields, args);
}

#[test]
fn result_decodes_as_declared_type() {
    let model = model();
    let codec = WireCodec::new(&model);
    let sent = Object::new(0xefed51d9)
        .with("phoneRegistered", Value::Bool(true))
        .with("phoneCodeHash", Value::from("hash"));
    let bytes = codec.encode("TLAuthSentCode", &sent.clone().into()).unwrap();
    assert_eq!(codec.decode_result("authSendCode", &bytes).unwrap(), Value::Object(sent));
}

#[test]
fn unknown_method_and_type() {
    let model = model();
    let codec = WireCodec::new(&model);
    assert!(matches!(codec.encode_request("nope", &[]), Err(Error::UnknownMethod { .. })));
    assert_eq!(
        codec.encode("TLNope", &Object::new(1).into()),
        Err(Error::UnknownType { name: "TLNope".into() })
    );
    assert_eq!(
        codec.encode("quint32", &Value::from("text")),
        Err(Error::TypeMismatch { expected: "quint32".into() })
    );
}
