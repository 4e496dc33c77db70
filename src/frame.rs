//! Packet framing: `type: u16 BE, body_length: u16 BE, body`.
//!
//! This module only concerns itself with the header; reading and writing the
//! bytes themselves is the transport's job (see [`crate::transport`]).

use crate::errors::ChatError;

/// The decoded header of a frame: its numeric type and the length of the
/// body that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// The numeric packet type.
    pub frame_type: u16,
    /// The length, in bytes, of the frame body that follows the header.
    pub body_len: u16,
}

impl FrameHeader {
    /// The on-wire size of a frame header.
    pub const LEN: usize = 4;

    /// Decode a header from exactly [`FrameHeader::LEN`] bytes.
    pub fn decode(bytes: [u8; Self::LEN]) -> Self {
        Self {
            frame_type: u16::from_be_bytes([bytes[0], bytes[1]]),
            body_len: u16::from_be_bytes([bytes[2], bytes[3]]),
        }
    }

    /// Encode this header to its wire representation.
    pub fn encode(self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0..2].copy_from_slice(&self.frame_type.to_be_bytes());
        buf[2..4].copy_from_slice(&self.body_len.to_be_bytes());
        buf
    }
}

/// Assemble a complete outbound frame: `u16(type) || u16(len(body)) || body`.
///
/// Fails with [`ChatError::FrameTooLarge`] if `body` does not fit in a 16-bit
/// length field; that is a programmer error, never something the protocol
/// itself produces.
pub fn encode_frame(frame_type: u16, body: &[u8]) -> Result<Vec<u8>, ChatError> {
    if body.len() > u16::MAX as usize {
        return Err(ChatError::FrameTooLarge(body.len()));
    }

    let header = FrameHeader {
        frame_type,
        body_len: body.len() as u16,
    };

    let mut buf = Vec::with_capacity(FrameHeader::LEN + body.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(body);
    Ok(buf)
}
