//! The [`Deserializable`] trait, the [`Cursor`] it reads from, and the
//! primitive impls mirroring [`crate::serialize`].

use crate::errors::{Error, Result};
use crate::serialize::{LONG_STRING_TAG, padding};
use crate::{BOOL_FALSE, BOOL_TRUE, VECTOR_ID};

/// A zero-copy cursor over an in-memory byte slice.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consumes the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::UnexpectedEof)?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Consumes the next `N` bytes as an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

/// Alias used by the codec: `crate::deserialize::Buffer<'_, '_>`.
pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;

/// Deserialize a value from TL binary format.
pub trait Deserializable: Sized {
    /// Read `Self` from `buf`, advancing its position.
    fn deserialize(buf: Buffer) -> Result<Self>;

    /// Convenience: deserialize from a byte slice.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::deserialize(&mut Cursor::from_slice(bytes))
    }
}

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Result<Self> {
        match u32::deserialize(buf)? {
            BOOL_TRUE => Ok(true),
            BOOL_FALSE => Ok(false),
            id => Err(Error::UnexpectedConstructor { id }),
        }
    }
}

macro_rules! little_endian {
    ($($ty:ty),*) => {$(
        impl Deserializable for $ty {
            fn deserialize(buf: Buffer) -> Result<Self> {
                Ok(<$ty>::from_le_bytes(buf.read_array()?))
            }
        }
    )*};
}

little_endian!(u32, u64, f64);

impl<const N: usize> Deserializable for [u8; N] {
    fn deserialize(buf: Buffer) -> Result<Self> {
        buf.read_array()
    }
}

impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let [first] = buf.read_array::<1>()?;
        let (len, header) = if first == LONG_STRING_TAG {
            let [a, b, c] = buf.read_array::<3>()?;
            (usize::from(a) | usize::from(b) << 8 | usize::from(c) << 16, 4)
        } else {
            (usize::from(first), 1)
        };
        let data = buf.take(len)?.to_vec();
        buf.take(padding(header + len))?;
        Ok(data)
    }
}

impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Result<Self> {
        String::from_utf8(Vec::<u8>::deserialize(buf)?).map_err(|_| Error::InvalidUtf8)
    }
}

/// Reads a boxed `Vector<T>` header and returns the element count.
pub(crate) fn vector_header(buf: Buffer) -> Result<usize> {
    match u32::deserialize(buf)? {
        VECTOR_ID => Ok(u32::deserialize(buf)? as usize),
        id => Err(Error::UnexpectedConstructor { id }),
    }
}
