//! Dynamic TL values as the codec sees them.

/// One decoded (or to-be-encoded) TL value.
///
/// Every variant matches one family of target types: `bool`, `quint32`,
/// `quint64`, `double`, `QString`, `QByteArray`, `TLNumber128`,
/// `TLNumber256`, `TLVector<T>` and the generated structs.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(u32),
    Long(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Int128([u8; 16]),
    Int256([u8; 32]),
    Vector(Vec<Value>),
    Object(Object),
}

/// A constructor (or method request) keyed by predicate id.
///
/// `fields` follows the schema's parameter order minus the `flags:#` words,
/// which the codec computes from presence. A gated field is `None` when its
/// bit is clear; a flag-only field is `Some(Value::Bool(true))` when set.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub id: u32,
    pub fields: Vec<(String, Option<Value>)>,
}

impl Object {
    pub fn new(id: u32) -> Self {
        Self { id, fields: Vec::new() }
    }

    /// Builder-style: appends a present field.
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.fields.push((name.to_owned(), Some(value)));
        self
    }

    /// Builder-style: appends an absent, flag-gated field.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.push((name.to_owned(), None));
        self
    }

    /// The value of a present field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self { Self::Object(o) }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self { Self::Int(v) }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self { Self::Long(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Self::String(v.to_owned()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Self::String(v) }
}
