//! [`WireCodec`]: encodes and decodes [`Value`]s by walking a baked
//! [`SchemaModel`].
//!
//! Every object is boxed (constructor id first), vectors carry the
//! `0x1cb5c415` header, and `TLPtr<T>` is transparent on the wire. This is
//! the same layout the generated `CTelegramStream` operators produce.

use std::collections::HashMap;

use generatorng_tl_gen::SchemaModel;
use generatorng_tl_gen::model::{Constructor, Method, Param};
use generatorng_tl_gen::namegen::{pointer_inner, vector_inner};

use crate::deserialize::{self, Buffer, Cursor, Deserializable};
use crate::errors::{Error, Result};
use crate::serialize::{self, Serializable};
use crate::value::{Object, Value};

/// Schema-driven codec borrowing a model.
pub struct WireCodec<'m> {
    model: &'m SchemaModel,
}

impl<'m> WireCodec<'m> {
    pub fn new(model: &'m SchemaModel) -> Self {
        Self { model }
    }

    /// Serializes `value` as target type `ty` (e.g. `TLVector<TLUser>`).
    pub fn encode(&self, ty: &str, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(ty, value, &mut buf)?;
        Ok(buf)
    }

    /// Reads one value of target type `ty`. Trailing bytes are left alone.
    pub fn decode(&self, ty: &str, bytes: &[u8]) -> Result<Value> {
        let mut cursor = Cursor::from_slice(bytes);
        self.decode_from(ty, &mut cursor)
    }

    /// Reads one boxed object of whatever type its constructor id names.
    pub fn decode_any(&self, bytes: &[u8]) -> Result<Object> {
        let mut cursor = Cursor::from_slice(bytes);
        let id = u32::deserialize(&mut cursor)?;
        let (_, constructor) = self
            .model
            .constructor_by_id(id)
            .ok_or(Error::UnexpectedConstructor { id })?;
        self.decode_fields(id, &constructor.params, &mut cursor)
    }

    /// Serializes a call to `method` (formatted name, e.g. `authSendCode`):
    /// the method id followed by its arguments in schema order.
    pub fn encode_request(&self, method: &str, args: &[(String, Option<Value>)]) -> Result<Vec<u8>> {
        let method = self.method(method)?;
        let mut buf = Vec::new();
        method.id.serialize(&mut buf);
        self.encode_fields(&method.params, args, &mut buf)?;
        log::trace!("[wire] {} request: {} bytes", method.name, buf.len());
        Ok(buf)
    }

    /// Reads a request written by [`Self::encode_request`], returning the
    /// method's formatted name and its arguments.
    pub fn decode_request(&self, bytes: &[u8]) -> Result<(String, Object)> {
        let mut cursor = Cursor::from_slice(bytes);
        let id = u32::deserialize(&mut cursor)?;
        let method = self
            .model
            .methods()
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::UnknownMethod { name: format!("{id:#010x}") })?;
        let args = self.decode_fields(id, &method.params, &mut cursor)?;
        Ok((method.name.clone(), args))
    }

    /// Reads the result of `method` as its declared result type.
    pub fn decode_result(&self, method: &str, bytes: &[u8]) -> Result<Value> {
        let method = self.method(method)?;
        self.decode(&method.result, bytes)
    }

    fn method(&self, name: &str) -> Result<&'m Method> {
        self.model
            .method(name)
            .ok_or_else(|| Error::UnknownMethod { name: name.to_owned() })
    }

    fn constructor(&self, ty: &str, id: u32) -> Result<&'m Constructor> {
        let found = self
            .model
            .type_by_name(ty)
            .ok_or_else(|| Error::UnknownType { name: ty.to_owned() })?;
        found
            .constructors
            .iter()
            .find(|c| c.id == id)
            .ok_or(Error::UnexpectedConstructor { id })
    }

    // ─── encode ──────────────────────────────────────────────────────────────

    fn encode_into(&self, ty: &str, value: &Value, buf: &mut Vec<u8>) -> Result<()> {
        let mismatch = || Error::TypeMismatch { expected: ty.to_owned() };

        if let Some(inner) = pointer_inner(ty) {
            return self.encode_into(inner, value, buf);
        }
        if let Some(inner) = vector_inner(ty) {
            let Value::Vector(items) = value else { return Err(mismatch()) };
            serialize::vector_header(items.len(), buf);
            for item in items {
                self.encode_into(inner, item, buf)?;
            }
            return Ok(());
        }

        match (ty, value) {
            ("bool", Value::Bool(v)) => v.serialize(buf),
            ("quint32", Value::Int(v)) => v.serialize(buf),
            ("quint64", Value::Long(v)) => v.serialize(buf),
            ("double", Value::Double(v)) => v.serialize(buf),
            ("QString", Value::String(v)) => serialize::write_bytes(v.as_bytes(), buf)?,
            ("QByteArray", Value::Bytes(v)) => serialize::write_bytes(v, buf)?,
            ("TLNumber128", Value::Int128(v)) => v.serialize(buf),
            ("TLNumber256", Value::Int256(v)) => v.serialize(buf),
            (_, Value::Object(object)) => {
                let constructor = self.constructor(ty, object.id)?;
                object.id.serialize(buf);
                self.encode_fields(&constructor.params, &object.fields, buf)?;
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn encode_fields(
        &self,
        params: &[Param],
        fields: &[(String, Option<Value>)],
        buf: &mut Vec<u8>,
    ) -> Result<()> {
        let lookup = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, v)| v.as_ref())
        };
        let present = |param: &Param| match lookup(&param.name) {
            Some(Value::Bool(set)) if param.is_flag_only() => *set,
            Some(_) => true,
            None => false,
        };

        for param in params {
            if param.is_flags() {
                let word = params
                    .iter()
                    .filter_map(|p| p.flag.as_ref().map(|f| (p, f)))
                    .filter(|(p, f)| f.member == param.name && present(*p))
                    .fold(0u32, |word, (_, f)| word | 1 << f.bit);
                word.serialize(buf);
                continue;
            }
            if param.flag.is_some() && (!present(param) || param.is_flag_only()) {
                continue;
            }
            let value = lookup(&param.name)
                .ok_or_else(|| Error::MissingField { name: param.name.clone() })?;
            self.encode_into(&param.ty, value, buf)?;
        }
        Ok(())
    }

    // ─── decode ──────────────────────────────────────────────────────────────

    fn decode_from(&self, ty: &str, buf: Buffer) -> Result<Value> {
        if let Some(inner) = pointer_inner(ty) {
            return self.decode_from(inner, buf);
        }
        if let Some(inner) = vector_inner(ty) {
            let len = deserialize::vector_header(buf)?;
            let mut items = Vec::with_capacity(len.min(buf.remaining()));
            for _ in 0..len {
                items.push(self.decode_from(inner, buf)?);
            }
            return Ok(Value::Vector(items));
        }

        Ok(match ty {
            "bool" => Value::Bool(bool::deserialize(buf)?),
            "quint32" => Value::Int(u32::deserialize(buf)?),
            "quint64" => Value::Long(u64::deserialize(buf)?),
            "double" => Value::Double(f64::deserialize(buf)?),
            "QString" => Value::String(String::deserialize(buf)?),
            "QByteArray" => Value::Bytes(Vec::<u8>::deserialize(buf)?),
            "TLNumber128" => Value::Int128(<[u8; 16]>::deserialize(buf)?),
            "TLNumber256" => Value::Int256(<[u8; 32]>::deserialize(buf)?),
            _ => {
                let id = u32::deserialize(buf)?;
                let constructor = self.constructor(ty, id)?;
                Value::Object(self.decode_fields(id, &constructor.params, buf)?)
            }
        })
    }

    fn decode_fields(&self, id: u32, params: &[Param], buf: Buffer) -> Result<Object> {
        let mut words: HashMap<&str, u32> = HashMap::new();
        let mut object = Object::new(id);

        for param in params {
            if param.is_flags() {
                words.insert(&param.name, u32::deserialize(buf)?);
                continue;
            }
            let value = match &param.flag {
                Some(flag) => {
                    let word = words.get(flag.member.as_str()).copied().unwrap_or(0);
                    if word & (1 << flag.bit) == 0 {
                        None
                    } else if param.is_flag_only() {
                        Some(Value::Bool(true))
                    } else {
                        Some(self.decode_from(&param.ty, buf)?)
                    }
                }
                None => Some(self.decode_from(&param.ty, buf)?),
            };
            object.fields.push((param.name.clone(), value));
        }
        Ok(object)
    }
}
