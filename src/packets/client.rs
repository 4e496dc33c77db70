//! Client → server frame constructors.
//!
//! Each function here assembles a `(type, body_bytes)` pair ready to be
//! handed to [`crate::frame::encode_frame`]. Unlike the server catalog,
//! these have no decode side in this crate.

use crate::errors::ChatError;
use crate::wire::{self, ChannelId};

/// `LOGIN_RESPONSE`: authenticate with the login key derived in the
/// handshake. The leading `U32(0)` is a fixed protocol field.
pub const LOGIN_RESPONSE: u16 = 2;
/// `LOGIN_SELECT_CHARACTER`: choose a character to log in as.
pub const LOGIN_SELECT_CHARACTER: u16 = 3;
/// `NAME_LOOKUP`: resolve a character name to an id.
pub const NAME_LOOKUP: u16 = 21;
/// `MSG_PRIVATE`: send a private (tell) message.
pub const MSG_PRIVATE: u16 = 30;
/// `BUDDY_ADD`: subscribe to a character's presence.
pub const BUDDY_ADD: u16 = 40;
/// `BUDDY_REMOVE`: unsubscribe from a character's presence.
pub const BUDDY_REMOVE: u16 = 41;
/// `ONLINE_STATUS`: set the local client's online status.
pub const ONLINE_STATUS: u16 = 42;
/// `PRIVCH_INVITE`: invite a character to the local private channel.
pub const PRIVCH_INVITE: u16 = 50;
/// `PRIVCH_KICK`: remove a character from the local private channel.
pub const PRIVCH_KICK: u16 = 51;
/// `PRIVCH_MSG`: send a message to a private channel.
pub const PRIVCH_MSG: u16 = 57;
/// `CHANNEL_MSG`: send a message to a server-moderated channel.
pub const CHANNEL_MSG: u16 = 65;
/// `PING`: keepalive.
pub const PING: u16 = 100;
/// `CHAT_COMMAND`: a slash-command issued to the server.
pub const CHAT_COMMAND: u16 = 120;

/// Build a `LOGIN_RESPONSE` frame.
pub fn login_response(username: &[u8], login_key: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, 0)?;
    wire::write_str(&mut body, username)?;
    wire::write_str(&mut body, login_key)?;
    Ok((LOGIN_RESPONSE, body))
}

/// Build a `LOGIN_SELECT_CHARACTER` frame.
pub fn login_select_character(character_id: u32) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    Ok((LOGIN_SELECT_CHARACTER, body))
}

/// Build a `NAME_LOOKUP` frame.
pub fn name_lookup(name: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_str(&mut body, name)?;
    Ok((NAME_LOOKUP, body))
}

/// Build a `MSG_PRIVATE` frame.
pub fn msg_private(character_id: u32, text: &[u8], extra: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    wire::write_str(&mut body, text)?;
    wire::write_str(&mut body, extra)?;
    Ok((MSG_PRIVATE, body))
}

/// Build a `BUDDY_ADD` frame.
pub fn buddy_add(character_id: u32, flags: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    wire::write_str(&mut body, flags)?;
    Ok((BUDDY_ADD, body))
}

/// Build a `BUDDY_REMOVE` frame.
pub fn buddy_remove(character_id: u32) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    Ok((BUDDY_REMOVE, body))
}

/// Build an `ONLINE_STATUS` frame.
pub fn online_status(status: u32) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, status)?;
    Ok((ONLINE_STATUS, body))
}

/// Build a `PRIVCH_INVITE` frame.
pub fn privch_invite(character_id: u32) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    Ok((PRIVCH_INVITE, body))
}

/// Build a `PRIVCH_KICK` frame.
pub fn privch_kick(character_id: u32) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, character_id)?;
    Ok((PRIVCH_KICK, body))
}

/// Build a `PRIVCH_MSG` frame.
pub fn privch_msg(channel_owner_id: u32, text: &[u8], extra: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_u32(&mut body, channel_owner_id)?;
    wire::write_str(&mut body, text)?;
    wire::write_str(&mut body, extra)?;
    Ok((PRIVCH_MSG, body))
}

/// Build a `CHANNEL_MSG` frame.
pub fn channel_msg(channel_id: ChannelId, text: &[u8], extra: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_channel_id(&mut body, channel_id)?;
    wire::write_str(&mut body, text)?;
    wire::write_str(&mut body, extra)?;
    Ok((CHANNEL_MSG, body))
}

/// Build a `PING` frame.
pub fn ping(payload: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_str(&mut body, payload)?;
    Ok((PING, body))
}

/// Build a `CHAT_COMMAND` frame.
pub fn chat_command(command: &[u8], args: &[u8]) -> Result<(u16, Vec<u8>), ChatError> {
    let mut body = Vec::new();
    wire::write_str(&mut body, command)?;
    wire::write_str(&mut body, args)?;
    Ok((CHAT_COMMAND, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::server::ServerPacket;

    #[test]
    fn test_msg_private_frame_round_trip() {
        // Testable-properties scenario 1: character_id = 0x00010203,
        // text = "hi", extra = "".
        let (frame_type, body) = msg_private(0x0001_0203, b"hi", b"").unwrap();
        assert_eq!(frame_type, MSG_PRIVATE);
        assert_eq!(body, hex_literal::hex!("00010203000268690000"));

        let framed = crate::frame::encode_frame(frame_type, &body).unwrap();
        assert_eq!(framed, hex_literal::hex!("001e000a00010203000268690000"));

        // Feed the body back through the (structurally identical)
        // server-side decoder for MSG_PRIVATE and recover the fields.
        let decoded = ServerPacket::decode(crate::packets::server::MSG_PRIVATE, &body).unwrap();
        assert_eq!(
            decoded,
            ServerPacket::MsgPrivate {
                character_id: 0x0001_0203,
                text: b"hi".to_vec(),
                extra: Vec::new(),
            }
        );
    }

    #[test]
    fn test_login_response_shape() {
        let (frame_type, body) = login_response(b"u", b"5-abc").unwrap();
        assert_eq!(frame_type, LOGIN_RESPONSE);
        // U32(0) || Str("u") || Str("5-abc")
        assert_eq!(body[0..4], [0, 0, 0, 0]);
    }
}
