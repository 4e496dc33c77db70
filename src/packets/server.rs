//! Server → client frame variants and the registry that decodes them by
//! numeric type.

use std::io::Cursor;

use crate::characters::Character;
use crate::errors::ChatError;
use crate::wire::{self, ChannelId};

macro_rules! server_packet_types {
    ($($name:ident = $type:expr),+ $(,)?) => {
        $(
            #[doc = concat!("Numeric frame type for [`ServerPacket::", stringify!($name), "`].")]
            pub const $name: u16 = $type;
        )+
    };
}

server_packet_types! {
    LOGIN_SEED = 0,
    LOGIN_OK = 5,
    LOGIN_ERROR = 6,
    CHARACTER_LIST = 7,
    CLIENT_UNKNOWN = 10,
    CLIENT_NAME = 20,
    LOOKUP_RESULT = 21,
    MSG_PRIVATE = 30,
    MSG_VICINITY = 34,
    MSG_BROADCAST = 35,
    MSG_SYSTEM_SIMPLE = 36,
    MSG_SYSTEM = 37,
    BUDDY_STATUS = 40,
    BUDDY_REMOVED = 41,
    PRIVCH_INVITE = 50,
    PRIVCH_KICK = 51,
    PRIVCH_JOIN = 52,
    PRIVCH_PART = 53,
    PRIVCH_KICKALL = 54,
    PRIVCH_CLIJOIN = 55,
    PRIVCH_CLIPART = 56,
    PRIVCH_MSG = 57,
    CHANNEL_JOIN = 60,
    CHANNEL_LEAVE = 61,
    CHANNEL_MSG = 65,
    PONG = 100,
}

/// A decoded server → client frame.
///
/// Frame types the catalog does not recognise are not dropped: they are
/// surfaced as [`ServerPacket::Unknown`] so a caller can log or ignore them.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ServerPacket {
    /// `LOGIN_SEED`: the server's handshake seed.
    LoginSeed { seed: Vec<u8> },
    /// `LOGIN_OK`: login or character selection succeeded.
    LoginOk,
    /// `LOGIN_ERROR`: login or character selection failed.
    LoginError { message: Vec<u8> },
    /// `CHARACTER_LIST`: the account's characters.
    CharacterList { characters: Vec<Character> },
    /// `CLIENT_UNKNOWN`: the named character id is not known to the server.
    ClientUnknown { character_id: u32 },
    /// `CLIENT_NAME`: resolves a character id to a name.
    ClientName { character_id: u32, name: Vec<u8> },
    /// `LOOKUP_RESULT`: resolves a name lookup to a character id.
    LookupResult { character_id: u32, name: Vec<u8> },
    /// `MSG_PRIVATE`: an incoming private (tell) message.
    MsgPrivate {
        character_id: u32,
        text: Vec<u8>,
        extra: Vec<u8>,
    },
    /// `MSG_VICINITY`: area-scoped chat.
    MsgVicinity {
        character_id: u32,
        text: Vec<u8>,
        extra: Vec<u8>,
    },
    /// `MSG_BROADCAST`: a server-wide broadcast.
    MsgBroadcast {
        sender: Vec<u8>,
        text: Vec<u8>,
        extra: Vec<u8>,
    },
    /// `MSG_SYSTEM_SIMPLE`: a plain-text system notice.
    MsgSystemSimple { message: Vec<u8> },
    /// `MSG_SYSTEM`: a parameterised system notice, identified by
    /// `(category, instance)` and resolved via [`crate::text_table`].
    MsgSystem {
        category: u32,
        instance: u32,
        flags: u32,
        text: Vec<u8>,
    },
    /// `BUDDY_STATUS`: presence update for a subscribed character.
    BuddyStatus {
        character_id: u32,
        online: bool,
        name: Vec<u8>,
    },
    /// `BUDDY_REMOVED`: a buddy subscription was dropped.
    BuddyRemoved { character_id: u32 },
    /// `PRIVCH_INVITE`: invited to a private channel.
    PrivChInvite { channel_owner_id: u32 },
    /// `PRIVCH_KICK`: kicked from a private channel.
    PrivChKick { channel_owner_id: u32 },
    /// `PRIVCH_JOIN`: joined a private channel.
    PrivChJoin { channel_owner_id: u32 },
    /// `PRIVCH_PART`: left a private channel.
    PrivChPart { channel_owner_id: u32 },
    /// `PRIVCH_KICKALL`: the private channel was disbanded.
    PrivChKickAll,
    /// `PRIVCH_CLIJOIN`: another client joined a private channel.
    PrivChClientJoin {
        channel_owner_id: u32,
        character_id: u32,
    },
    /// `PRIVCH_CLIPART`: another client left a private channel.
    PrivChClientPart {
        channel_owner_id: u32,
        character_id: u32,
    },
    /// `PRIVCH_MSG`: a message sent to a private channel.
    PrivChMsg {
        channel_owner_id: u32,
        character_id: u32,
        text: Vec<u8>,
        extra: Vec<u8>,
    },
    /// `CHANNEL_JOIN`: joined a server-moderated channel.
    ChannelJoin {
        channel_id: ChannelId,
        name: Vec<u8>,
        flags: u32,
        topic: Vec<u8>,
    },
    /// `CHANNEL_LEAVE`: left a server-moderated channel.
    ChannelLeave { channel_id: ChannelId },
    /// `CHANNEL_MSG`: a message sent to a server-moderated channel.
    ChannelMsg {
        channel_id: ChannelId,
        character_id: u32,
        text: Vec<u8>,
        extra: Vec<u8>,
    },
    /// `PONG`: keepalive reply.
    Pong { payload: Vec<u8> },
    /// A well-formed frame whose type is not in this catalog.
    Unknown { frame_type: u16, body: Vec<u8> },
}

impl ServerPacket {
    /// The numeric frame type of this packet.
    pub fn frame_type(&self) -> u16 {
        match self {
            Self::LoginSeed { .. } => LOGIN_SEED,
            Self::LoginOk => LOGIN_OK,
            Self::LoginError { .. } => LOGIN_ERROR,
            Self::CharacterList { .. } => CHARACTER_LIST,
            Self::ClientUnknown { .. } => CLIENT_UNKNOWN,
            Self::ClientName { .. } => CLIENT_NAME,
            Self::LookupResult { .. } => LOOKUP_RESULT,
            Self::MsgPrivate { .. } => MSG_PRIVATE,
            Self::MsgVicinity { .. } => MSG_VICINITY,
            Self::MsgBroadcast { .. } => MSG_BROADCAST,
            Self::MsgSystemSimple { .. } => MSG_SYSTEM_SIMPLE,
            Self::MsgSystem { .. } => MSG_SYSTEM,
            Self::BuddyStatus { .. } => BUDDY_STATUS,
            Self::BuddyRemoved { .. } => BUDDY_REMOVED,
            Self::PrivChInvite { .. } => PRIVCH_INVITE,
            Self::PrivChKick { .. } => PRIVCH_KICK,
            Self::PrivChJoin { .. } => PRIVCH_JOIN,
            Self::PrivChPart { .. } => PRIVCH_PART,
            Self::PrivChKickAll => PRIVCH_KICKALL,
            Self::PrivChClientJoin { .. } => PRIVCH_CLIJOIN,
            Self::PrivChClientPart { .. } => PRIVCH_CLIPART,
            Self::PrivChMsg { .. } => PRIVCH_MSG,
            Self::ChannelJoin { .. } => CHANNEL_JOIN,
            Self::ChannelLeave { .. } => CHANNEL_LEAVE,
            Self::ChannelMsg { .. } => CHANNEL_MSG,
            Self::Pong { .. } => PONG,
            Self::Unknown { frame_type, .. } => *frame_type,
        }
    }

    /// Decode a server packet from `frame_type` and its raw `body`.
    ///
    /// Per the frame invariant, zero bytes must remain in `body` once its
    /// fields are decoded; a non-empty remainder is [`ChatError::MalformedFrame`].
    pub fn decode(frame_type: u16, body: &[u8]) -> Result<Self, ChatError> {
        let mut c = Cursor::new(body);

        let packet = match frame_type {
            LOGIN_SEED => Self::LoginSeed {
                seed: wire::read_str(&mut c)?,
            },
            LOGIN_OK => Self::LoginOk,
            LOGIN_ERROR => Self::LoginError {
                message: wire::read_str(&mut c)?,
            },
            CHARACTER_LIST => {
                let ids = wire::read_array_u32(&mut c)?;
                let names = wire::read_array_str(&mut c)?;
                let levels = wire::read_array_u32(&mut c)?;
                let online = wire::read_array_u32(&mut c)?;

                if ids.len() != names.len() || ids.len() != levels.len() || ids.len() != online.len()
                {
                    return Err(ChatError::MalformedFrame(
                        "CHARACTER_LIST arrays have mismatched lengths".into(),
                    ));
                }

                let characters = ids
                    .into_iter()
                    .zip(names)
                    .zip(levels)
                    .zip(online)
                    .map(|(((id, name), level), online)| Character {
                        id,
                        name,
                        level,
                        online: online != 0,
                    })
                    .collect();

                Self::CharacterList { characters }
            }
            CLIENT_UNKNOWN => Self::ClientUnknown {
                character_id: wire::read_u32(&mut c)?,
            },
            CLIENT_NAME => Self::ClientName {
                character_id: wire::read_u32(&mut c)?,
                name: wire::read_str(&mut c)?,
            },
            LOOKUP_RESULT => Self::LookupResult {
                character_id: wire::read_u32(&mut c)?,
                name: wire::read_str(&mut c)?,
            },
            MSG_PRIVATE => Self::MsgPrivate {
                character_id: wire::read_u32(&mut c)?,
                text: wire::read_str(&mut c)?,
                extra: wire::read_str(&mut c)?,
            },
            MSG_VICINITY => Self::MsgVicinity {
                character_id: wire::read_u32(&mut c)?,
                text: wire::read_str(&mut c)?,
                extra: wire::read_str(&mut c)?,
            },
            MSG_BROADCAST => Self::MsgBroadcast {
                sender: wire::read_str(&mut c)?,
                text: wire::read_str(&mut c)?,
                extra: wire::read_str(&mut c)?,
            },
            MSG_SYSTEM_SIMPLE => Self::MsgSystemSimple {
                message: wire::read_str(&mut c)?,
            },
            MSG_SYSTEM => Self::MsgSystem {
                category: wire::read_u32(&mut c)?,
                instance: wire::read_u32(&mut c)?,
                flags: wire::read_u32(&mut c)?,
                text: wire::read_str(&mut c)?,
            },
            BUDDY_STATUS => Self::BuddyStatus {
                character_id: wire::read_u32(&mut c)?,
                online: wire::read_u32(&mut c)? != 0,
                name: wire::read_str(&mut c)?,
            },
            BUDDY_REMOVED => Self::BuddyRemoved {
                character_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_INVITE => Self::PrivChInvite {
                channel_owner_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_KICK => Self::PrivChKick {
                channel_owner_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_JOIN => Self::PrivChJoin {
                channel_owner_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_PART => Self::PrivChPart {
                channel_owner_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_KICKALL => Self::PrivChKickAll,
            PRIVCH_CLIJOIN => Self::PrivChClientJoin {
                channel_owner_id: wire::read_u32(&mut c)?,
                character_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_CLIPART => Self::PrivChClientPart {
                channel_owner_id: wire::read_u32(&mut c)?,
                character_id: wire::read_u32(&mut c)?,
            },
            PRIVCH_MSG => Self::PrivChMsg {
                channel_owner_id: wire::read_u32(&mut c)?,
                character_id: wire::read_u32(&mut c)?,
                text: wire::read_str(&mut c)?,
                extra: wire::read_str(&mut c)?,
            },
            CHANNEL_JOIN => Self::ChannelJoin {
                channel_id: wire::read_channel_id(&mut c)?,
                name: wire::read_str(&mut c)?,
                flags: wire::read_u32(&mut c)?,
                topic: wire::read_str(&mut c)?,
            },
            CHANNEL_LEAVE => Self::ChannelLeave {
                channel_id: wire::read_channel_id(&mut c)?,
            },
            CHANNEL_MSG => Self::ChannelMsg {
                channel_id: wire::read_channel_id(&mut c)?,
                character_id: wire::read_u32(&mut c)?,
                text: wire::read_str(&mut c)?,
                extra: wire::read_str(&mut c)?,
            },
            PONG => Self::Pong {
                payload: wire::read_str(&mut c)?,
            },
            other => Self::Unknown {
                frame_type: other,
                body: body.to_vec(),
            },
        };

        if !matches!(packet, Self::Unknown { .. }) && wire::remaining(&c) != 0 {
            return Err(ChatError::MalformedFrame(format!(
                "{} bytes left undecoded in frame type {frame_type}",
                wire::remaining(&c)
            )));
        }

        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_list_decode() {
        let mut body = Vec::new();
        wire::write_array_u32(&mut body, &[42]).unwrap();
        wire::write_array_str(&mut body, &[b"Foo".to_vec()]).unwrap();
        wire::write_array_u32(&mut body, &[1]).unwrap();
        wire::write_array_u32(&mut body, &[1]).unwrap();

        let packet = ServerPacket::decode(CHARACTER_LIST, &body).unwrap();
        match packet {
            ServerPacket::CharacterList { characters } => {
                assert_eq!(characters.len(), 1);
                assert_eq!(characters[0].id, 42);
                assert_eq!(characters[0].name, b"Foo");
                assert_eq!(characters[0].level, 1);
                assert!(characters[0].online);
            }
            other => panic!("unexpected packet {other:?}"),
        }
    }

    #[test]
    fn test_character_list_mismatched_arrays_rejected() {
        let mut body = Vec::new();
        wire::write_array_u32(&mut body, &[1, 2]).unwrap();
        wire::write_array_str(&mut body, &[b"only one".to_vec()]).unwrap();
        wire::write_array_u32(&mut body, &[1, 1]).unwrap();
        wire::write_array_u32(&mut body, &[1, 1]).unwrap();

        assert!(matches!(
            ServerPacket::decode(CHARACTER_LIST, &body),
            Err(ChatError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_unknown_frame_surfaced_not_dropped() {
        let packet = ServerPacket::decode(999, b"xx").unwrap();
        assert_eq!(
            packet,
            ServerPacket::Unknown {
                frame_type: 999,
                body: b"xx".to_vec(),
            }
        );
    }

    #[test]
    fn test_trailing_bytes_are_malformed() {
        let mut body = Vec::new();
        wire::write_str(&mut body, b"seed").unwrap();
        body.push(0xFF);

        assert!(matches!(
            ServerPacket::decode(LOGIN_SEED, &body),
            Err(ChatError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_login_ok_empty_body() {
        assert_eq!(ServerPacket::decode(LOGIN_OK, &[]).unwrap(), ServerPacket::LoginOk);
    }

    #[test]
    fn test_channel_msg_decode() {
        let mut body = Vec::new();
        wire::write_channel_id(&mut body, ChannelId::new(0x12_3456_7890).unwrap()).unwrap();
        wire::write_u32(&mut body, 7).unwrap();
        wire::write_str(&mut body, b"hi").unwrap();
        wire::write_str(&mut body, b"").unwrap();

        let packet = ServerPacket::decode(CHANNEL_MSG, &body).unwrap();
        assert_eq!(
            packet,
            ServerPacket::ChannelMsg {
                channel_id: ChannelId::new(0x12_3456_7890).unwrap(),
                character_id: 7,
                text: b"hi".to_vec(),
                extra: Vec::new(),
            }
        );
    }
}
