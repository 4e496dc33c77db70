//! Wire primitives: fixed-width integers, length-prefixed byte strings,
//! variable-width channel identifiers, and length-prefixed arrays of those.
//!
//! Every primitive here is purely functional: decoding consumes bytes from a
//! [`Cursor`] and returns an owned value, encoding writes into anything
//! implementing [`Write`]. Primitives never retain or share state across
//! calls.

use std::io::{Cursor, Write};

use crate::errors::ChatError;

/// A 40-bit channel identifier: one byte of high-order bits followed by a
/// big-endian `u32` of low-order bits.
///
/// See [RFC] `§3` for the wire shape; the logical value is
/// `(byte << 32) | u32`.
///
/// [RFC]: crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    /// The largest value representable on the wire (`2^40 - 1`).
    pub const MAX: u64 = (1u64 << 40) - 1;

    /// Construct a `ChannelId`, failing if `value` does not fit in 40 bits.
    pub fn new(value: u64) -> Result<Self, ChatError> {
        if value > Self::MAX {
            return Err(ChatError::OutOfRange(format!(
                "channel id {value} exceeds 40 bits"
            )));
        }
        Ok(Self(value))
    }

    /// Return the logical channel id value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns a subslice of `len` bytes from `c` without copying, advancing the
/// cursor past it, or [`ChatError::MalformedFrame`] if `len` bytes are not
/// available.
fn take<'a>(c: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8], ChatError> {
    let data = *c.get_ref();
    let start = c.position() as usize;
    let end = start.checked_add(len).ok_or_else(|| {
        ChatError::MalformedFrame(format!("length {len} overflows buffer position"))
    })?;

    if end > data.len() {
        return Err(ChatError::MalformedFrame(format!(
            "need {len} bytes, only {} remain",
            data.len().saturating_sub(start)
        )));
    }

    c.set_position(end as u64);
    Ok(&data[start..end])
}

/// Returns the number of bytes not yet consumed from `c`.
pub(crate) fn remaining(c: &Cursor<&[u8]>) -> usize {
    c.get_ref().len().saturating_sub(c.position() as usize)
}

/// Decode a big-endian `U32`.
pub(crate) fn read_u32(c: &mut Cursor<&[u8]>) -> Result<u32, ChatError> {
    let b = take(c, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Encode a `U32`, big-endian.
pub(crate) fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<(), ChatError> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Decode a length-prefixed opaque byte string (`Str`).
pub(crate) fn read_str(c: &mut Cursor<&[u8]>) -> Result<Vec<u8>, ChatError> {
    let len = take(c, 2)?;
    let len = u16::from_be_bytes([len[0], len[1]]) as usize;
    Ok(take(c, len)?.to_vec())
}

/// Encode a `Str`. Fails with [`ChatError::OutOfRange`] if `v` exceeds 65535
/// bytes.
pub(crate) fn write_str<W: Write>(w: &mut W, v: &[u8]) -> Result<(), ChatError> {
    if v.len() > u16::MAX as usize {
        return Err(ChatError::OutOfRange(format!(
            "string of {} bytes exceeds the 16-bit length prefix",
            v.len()
        )));
    }
    w.write_all(&(v.len() as u16).to_be_bytes())?;
    w.write_all(v)?;
    Ok(())
}

/// Decode a 40-bit [`ChannelId`].
pub(crate) fn read_channel_id(c: &mut Cursor<&[u8]>) -> Result<ChannelId, ChatError> {
    let high = take(c, 1)?[0];
    let low = read_u32(c)?;
    Ok(ChannelId(((high as u64) << 32) | low as u64))
}

/// Encode a [`ChannelId`].
pub(crate) fn write_channel_id<W: Write>(w: &mut W, v: ChannelId) -> Result<(), ChatError> {
    let high = (v.0 >> 32) as u8;
    w.write_all(&[high])?;
    write_u32(w, (v.0 & 0xFFFF_FFFF) as u32)
}

/// Decode a length-prefixed array of `U32`s.
pub(crate) fn read_array_u32(c: &mut Cursor<&[u8]>) -> Result<Vec<u32>, ChatError> {
    let count = {
        let b = take(c, 2)?;
        u16::from_be_bytes([b[0], b[1]])
    };
    (0..count).map(|_| read_u32(c)).collect()
}

/// Encode an array of `U32`s. Fails with [`ChatError::OutOfRange`] if there
/// are more than 65535 elements.
pub(crate) fn write_array_u32<W: Write>(w: &mut W, items: &[u32]) -> Result<(), ChatError> {
    write_array_len(w, items.len())?;
    for &v in items {
        write_u32(w, v)?;
    }
    Ok(())
}

/// Decode a length-prefixed array of `Str`s.
pub(crate) fn read_array_str(c: &mut Cursor<&[u8]>) -> Result<Vec<Vec<u8>>, ChatError> {
    let count = {
        let b = take(c, 2)?;
        u16::from_be_bytes([b[0], b[1]])
    };
    (0..count).map(|_| read_str(c)).collect()
}

/// Encode an array of `Str`s.
pub(crate) fn write_array_str<W: Write, T: AsRef<[u8]>>(w: &mut W, items: &[T]) -> Result<(), ChatError> {
    write_array_len(w, items.len())?;
    for item in items {
        write_str(w, item.as_ref())?;
    }
    Ok(())
}

fn write_array_len<W: Write>(w: &mut W, len: usize) -> Result<(), ChatError> {
    if len > u16::MAX as usize {
        return Err(ChatError::OutOfRange(format!(
            "array of {len} elements exceeds the 16-bit count prefix"
        )));
    }
    w.write_all(&(len as u16).to_be_bytes())?;
    Ok(())
}

/// Render an opaque wire string as UTF-8, replacing invalid sequences.
pub fn to_utf8_lossy(s: &[u8]) -> String {
    String::from_utf8_lossy(s).into_owned()
}

/// Render an opaque wire string as Latin-1 (each byte is one code point).
pub fn to_latin1(s: &[u8]) -> String {
    s.iter().map(|&b| b as char).collect()
}
