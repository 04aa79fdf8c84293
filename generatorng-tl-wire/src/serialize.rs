//! The [`Serializable`] trait for the fixed-size wire primitives behind
//! `bool`, `quint32`, `quint64`, `double`, `TLNumber128` and `TLNumber256`,
//! plus [`write_bytes`] for `QString` / `QByteArray`, whose length can
//! overflow the header.
//!
//! Encoding follows [MTProto Binary Serialization], which is also what the
//! generated `CTelegramStream` operators write.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::errors::{Error, Result};
use crate::{BOOL_FALSE, BOOL_TRUE, VECTOR_ID};

/// Longest string whose length fits the one-byte header.
pub(crate) const SHORT_STRING_MAX: usize = 253;
/// First header byte of a string with a three-byte length.
pub(crate) const LONG_STRING_TAG: u8 = 0xfe;

/// Zero bytes needed after `written` bytes to reach 4-byte alignment.
pub(crate) fn padding(written: usize) -> usize {
    (4 - written % 4) % 4
}

/// Serialize `self` into TL binary format.
pub trait Serializable {
    /// Appends the serialized form of `self` to `buf`.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// Convenience: allocate a fresh `Vec<u8>` and serialize into it.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize(&mut v);
        v
    }
}

/// `true` → `boolTrue#997275b5`, `false` → `boolFalse#bc799737`.
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id = if *self { BOOL_TRUE } else { BOOL_FALSE };
        id.serialize(buf);
    }
}

macro_rules! little_endian {
    ($($ty:ty),*) => {$(
        impl Serializable for $ty {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                buf.extend(self.to_le_bytes());
            }
        }
    )*};
}

little_endian!(u32, u64, f64);

/// `int128` / `int256`: raw bytes, no header.
impl<const N: usize> Serializable for [u8; N] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(*self);
    }
}

/// Longest `bytes` / `string` payload: its length must fit three bytes.
pub const MAX_BYTES_LEN: usize = 0xff_ffff;

/// Writes a `bytes` / `string` payload: a length header, the data, then zero
/// padding to a multiple of four.
///
/// * `len ≤ 253`: `[len][data][pad]`
/// * otherwise: `[0xfe][len as 3 LE bytes][data][pad]`
///
/// Payloads over [`MAX_BYTES_LEN`] are rejected before anything is written.
pub fn write_bytes(data: &[u8], buf: &mut impl Extend<u8>) -> Result<()> {
    let len = data.len();
    let header = if len <= SHORT_STRING_MAX {
        buf.extend([len as u8]);
        1
    } else if len <= MAX_BYTES_LEN {
        buf.extend([LONG_STRING_TAG, len as u8, (len >> 8) as u8, (len >> 16) as u8]);
        4
    } else {
        return Err(Error::PayloadTooLarge { len });
    };
    buf.extend(data.iter().copied());
    buf.extend(std::iter::repeat_n(0u8, padding(header + len)));
    Ok(())
}

/// Boxed `Vector<T>` header: constructor id `0x1cb5c415` and the count.
pub(crate) fn vector_header(len: usize, buf: &mut impl Extend<u8>) {
    VECTOR_ID.serialize(buf);
    (len as u32).serialize(buf);
}
