//! The session state machine driving one connection end-to-end (component
//! C6): handshake, character selection, and the steady-state event pump.
//!
//! Grounded on `original_source/lib/aochat/__init__.py::Chat`, whose
//! constructor performs the handshake inline and whose `start()` method is
//! the event pump reproduced here as [`ChatSession::run`].

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::characters::Character;
use crate::dimension::Dimension;
use crate::errors::ChatError;
use crate::login_key;
use crate::packets::client;
use crate::packets::server::{self, ServerPacket};
use crate::transport::Transport;
use crate::wire::{self, ChannelId};

/// The session's position in the handshake/steady-state lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No socket is open yet.
    Disconnected,
    /// Connected; waiting for the server's `LOGIN_SEED`.
    AwaitingSeed,
    /// Login key sent; waiting for `CHARACTER_LIST` or `LOGIN_ERROR`.
    AwaitingCharacterList,
    /// Authenticated; a character has not yet been selected.
    CharactersKnown,
    /// `LOGIN_SELECT_CHARACTER` sent; waiting for `LOGIN_OK` or `LOGIN_ERROR`.
    AwaitingLoginOk,
    /// A character is selected and the session can send chat frames.
    LoggedIn,
    /// The session has been explicitly logged out.
    Closed,
}

/// A connected Anarchy Online chat session.
///
/// One session owns one socket for its entire lifetime; it is not `Clone`
/// and not meant to be shared across threads without external
/// synchronization (see the concurrency model in the crate's top-level
/// documentation).
pub struct ChatSession {
    transport: Transport,
    state: SessionState,
    characters: Vec<Character>,
    character: Option<Character>,
}

impl ChatSession {
    /// Run the full handshake against `dimension`: connect, read the login
    /// seed, derive and send the login key, and collect the account's
    /// character list.
    ///
    /// On return the session is in [`SessionState::CharactersKnown`]; call
    /// [`ChatSession::login`] to select a character.
    pub fn connect(
        username: &str,
        password: &str,
        dimension: Dimension,
        timeout: Option<Duration>,
    ) -> Result<Self, ChatError> {
        info!(host = dimension.host, port = dimension.port, "connecting");
        let mut transport = Transport::connect((dimension.host, dimension.port))?;
        transport.set_timeout(timeout)?;

        let mut session = Self {
            transport,
            state: SessionState::AwaitingSeed,
            characters: Vec::new(),
            character: None,
        };

        let seed = session.await_login_seed()?;
        session.state = SessionState::AwaitingCharacterList;

        let login_key = login_key::generate_login_key(&seed, username.as_bytes(), password.as_bytes());
        session.authenticate(username, &login_key)?;
        session.state = SessionState::CharactersKnown;

        info!(count = session.characters.len(), "authenticated");
        Ok(session)
    }

    fn await_login_seed(&mut self) -> Result<Vec<u8>, ChatError> {
        let (frame_type, body) = self.transport.read_frame()?;
        if frame_type != server::LOGIN_SEED {
            return Err(ChatError::MalformedFrame(format!(
                "expected LOGIN_SEED, got frame type {frame_type}"
            )));
        }
        match ServerPacket::decode(frame_type, &body)? {
            ServerPacket::LoginSeed { seed } => {
                login_key::validate_seed(&seed)?;
                debug!("received login seed");
                Ok(seed)
            }
            other => Err(ChatError::UnknownPacket(other.frame_type())),
        }
    }

    fn authenticate(&mut self, username: &str, login_key: &str) -> Result<(), ChatError> {
        let (frame_type, body) = client::login_response(username.as_bytes(), login_key.as_bytes())?;
        self.transport.write_frame(frame_type, &body)?;

        let (resp_type, resp_body) = self.transport.read_frame()?;
        match resp_type {
            server::CHARACTER_LIST => match ServerPacket::decode(resp_type, &resp_body)? {
                ServerPacket::CharacterList { characters } => {
                    self.characters = characters;
                    Ok(())
                }
                _ => unreachable!("CHARACTER_LIST always decodes to CharacterList"),
            },
            server::LOGIN_ERROR => Err(self.auth_error(resp_type, &resp_body)?),
            other => Err(ChatError::UnknownPacket(other)),
        }
    }

    fn auth_error(&self, resp_type: u16, resp_body: &[u8]) -> Result<ChatError, ChatError> {
        match ServerPacket::decode(resp_type, resp_body)? {
            ServerPacket::LoginError { message } => Ok(ChatError::AuthError(wire::to_utf8_lossy(&message))),
            _ => unreachable!("LOGIN_ERROR always decodes to LoginError"),
        }
    }

    /// The account's characters, as advertised by `CHARACTER_LIST`.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// The character currently logged in, if any.
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// The session's current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Select a character to log in as.
    ///
    /// `character_id` must be one of [`ChatSession::characters`]; otherwise
    /// this returns [`ChatError::NoSuchCharacter`] without touching the
    /// socket.
    pub fn login(&mut self, character_id: u32) -> Result<(), ChatError> {
        if self.state != SessionState::CharactersKnown {
            return Err(ChatError::IllegalState(format!(
                "login requires state CharactersKnown, found {:?}",
                self.state
            )));
        }

        let character = self
            .characters
            .iter()
            .find(|c| c.id == character_id)
            .cloned()
            .ok_or(ChatError::NoSuchCharacter(character_id))?;

        self.state = SessionState::AwaitingLoginOk;

        let (frame_type, body) = client::login_select_character(character_id)?;
        self.transport.write_frame(frame_type, &body)?;

        let (resp_type, resp_body) = self.transport.read_frame()?;
        match resp_type {
            server::LOGIN_OK => {}
            server::LOGIN_ERROR => return Err(self.auth_error(resp_type, &resp_body)?),
            other => return Err(ChatError::UnknownPacket(other)),
        }

        info!(character_id, "logged in");
        self.character = Some(character);
        self.state = SessionState::LoggedIn;
        Ok(())
    }

    /// End the session. The server defines no explicit logout frame;
    /// closing the socket is sufficient, so this simply drops the
    /// transport and marks the session [`SessionState::Closed`].
    pub fn logout(&mut self) {
        debug!("logout");
        self.character = None;
        self.state = SessionState::Closed;
    }

    fn require_logged_in(&self, operation: &str) -> Result<(), ChatError> {
        if self.state != SessionState::LoggedIn {
            return Err(ChatError::IllegalState(format!(
                "{operation} requires an active login, session is in state {:?}",
                self.state
            )));
        }
        Ok(())
    }

    /// Send a frame without waiting for a reply.
    pub fn send_packet(&mut self, frame: (u16, Vec<u8>)) -> Result<(), ChatError> {
        let (frame_type, body) = frame;
        debug!(frame_type, "send_packet");
        self.transport.write_frame(frame_type, &body)
    }

    /// Send a frame and read the next one back, succeeding only if it is
    /// `expect`. A reply of type `on_error` is decoded as `LoginError` and
    /// surfaced as [`ChatError::AuthError`]; any other type is
    /// [`ChatError::UnknownPacket`].
    pub fn send_packet_expect(
        &mut self,
        frame: (u16, Vec<u8>),
        expect: u16,
        on_error: u16,
    ) -> Result<ServerPacket, ChatError> {
        self.send_packet(frame)?;
        let (resp_type, resp_body) = self.transport.read_frame()?;

        if resp_type == expect {
            ServerPacket::decode(resp_type, &resp_body)
        } else if resp_type == on_error {
            Err(self.auth_error(resp_type, &resp_body)?)
        } else {
            Err(ChatError::UnknownPacket(resp_type))
        }
    }

    /// Send a private (tell) message to a character.
    pub fn send_private_message(&mut self, character_id: u32, text: &[u8]) -> Result<(), ChatError> {
        self.require_logged_in("send_private_message")?;
        self.send_packet(client::msg_private(character_id, text, b"")?)
    }

    /// Send a message to a private channel owned by `channel_owner_id`.
    pub fn send_private_channel_message(
        &mut self,
        channel_owner_id: u32,
        text: &[u8],
    ) -> Result<(), ChatError> {
        self.require_logged_in("send_private_channel_message")?;
        self.send_packet(client::privch_msg(channel_owner_id, text, b"")?)
    }

    /// Send a message to a server-moderated channel.
    pub fn send_channel_message(&mut self, channel_id: ChannelId, text: &[u8]) -> Result<(), ChatError> {
        self.require_logged_in("send_channel_message")?;
        self.send_packet(client::channel_msg(channel_id, text, b"")?)
    }

    /// Invite a character to the local character's private channel.
    pub fn private_channel_invite(&mut self, character_id: u32) -> Result<(), ChatError> {
        self.require_logged_in("private_channel_invite")?;
        self.send_packet(client::privch_invite(character_id)?)
    }

    /// Kick a character from the local character's private channel.
    pub fn private_channel_kick(&mut self, character_id: u32) -> Result<(), ChatError> {
        self.require_logged_in("private_channel_kick")?;
        self.send_packet(client::privch_kick(character_id)?)
    }

    /// Send a keepalive ping.
    pub fn ping(&mut self) -> Result<(), ChatError> {
        self.send_packet(client::ping(b"")?)
    }

    /// Read and decode the next frame, blocking up to `timeout`.
    ///
    /// An explicit alternative to [`ChatSession::run`] for callers that want
    /// to drive the read loop themselves; each call may use its own timeout.
    pub fn next_packet(&mut self, timeout: Duration) -> Result<ServerPacket, ChatError> {
        self.transport.set_timeout(Some(timeout))?;
        let (frame_type, body) = self.transport.read_frame()?;
        ServerPacket::decode(frame_type, &body)
    }

    /// Run the steady-state event pump: read frames and hand them to
    /// `callback`, pinging whenever `ping_interval` elapses with no
    /// incoming frame. Returns when the connection ends (hang-up or
    /// error).
    ///
    /// This mirrors `Chat.start()`'s `select.poll()` loop, substituting a
    /// per-read socket timeout for the poll wait: both block for up to
    /// `ping_interval`, deliver one decoded frame per wakeup, and ping on
    /// timeout.
    pub fn run<F>(&mut self, ping_interval: Duration, mut callback: F) -> Result<(), ChatError>
    where
        F: FnMut(&mut ChatSession, ServerPacket),
    {
        self.transport.set_timeout(Some(ping_interval))?;

        loop {
            match self.transport.read_frame() {
                Ok((frame_type, body)) => match ServerPacket::decode(frame_type, &body) {
                    Ok(packet) => callback(self, packet),
                    Err(err) => {
                        warn!(frame_type, %err, "failed to decode frame, skipping");
                        continue;
                    }
                },
                Err(ChatError::Timeout) => {
                    debug!("ping_interval elapsed, sending ping");
                    self.ping()?;
                }
                Err(ChatError::ConnectionBroken) => {
                    info!("connection closed, stopping pump");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn write_frame(stream: &mut TcpStream, frame_type: u16, body: &[u8]) {
        let framed = frame::encode_frame(frame_type, body).unwrap();
        stream.write_all(&framed).unwrap();
    }

    fn read_frame(stream: &mut TcpStream) -> (u16, Vec<u8>) {
        let mut header = [0u8; 4];
        stream.read_exact(&mut header).unwrap();
        let h = crate::frame::FrameHeader::decode(header);
        let mut body = vec![0u8; h.body_len as usize];
        stream.read_exact(&mut body).unwrap();
        (h.frame_type, body)
    }

    #[test]
    fn test_handshake_happy_path() {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            write_frame(&mut stream, server::LOGIN_SEED, b"AAAA");

            let (frame_type, _body) = read_frame(&mut stream);
            assert_eq!(frame_type, client::LOGIN_RESPONSE);

            let mut body = Vec::new();
            wire::write_array_u32(&mut body, &[1]).unwrap();
            wire::write_array_str(&mut body, &[b"Testoon".to_vec()]).unwrap();
            wire::write_array_u32(&mut body, &[50]).unwrap();
            wire::write_array_u32(&mut body, &[1]).unwrap();
            write_frame(&mut stream, server::CHARACTER_LIST, &body);

            let (frame_type, _body) = read_frame(&mut stream);
            assert_eq!(frame_type, client::LOGIN_SELECT_CHARACTER);
            write_frame(&mut stream, server::LOGIN_OK, b"");
        });

        let dimension = Dimension {
            id: 0,
            name: "test",
            host: "127.0.0.1",
            port: addr.port(),
        };

        let mut session = ChatSession::connect("user", "pass", dimension, Some(Duration::from_secs(2))).unwrap();
        assert_eq!(session.state(), SessionState::CharactersKnown);
        assert_eq!(session.characters().len(), 1);
        assert_eq!(session.characters()[0].name, b"Testoon");

        session.login(1).unwrap();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(session.character().unwrap().id, 1);

        server.join().unwrap();
    }

    #[test]
    fn test_handshake_auth_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            write_frame(&mut stream, server::LOGIN_SEED, b"AAAA");
            let _ = read_frame(&mut stream);
            write_frame(&mut stream, server::LOGIN_ERROR, b"bad password");
        });

        let dimension = Dimension {
            id: 0,
            name: "test",
            host: "127.0.0.1",
            port: addr.port(),
        };

        let err =
            ChatSession::connect("user", "wrong", dimension, Some(Duration::from_secs(2))).unwrap_err();
        match err {
            ChatError::AuthError(message) => assert_eq!(message, "bad password"),
            other => panic!("unexpected error {other:?}"),
        }

        server.join().unwrap();
    }

    #[test]
    fn test_send_requires_login() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            write_frame(&mut stream, server::LOGIN_SEED, b"AAAA");
            let _ = read_frame(&mut stream);

            let mut body = Vec::new();
            wire::write_array_u32(&mut body, &[]).unwrap();
            wire::write_array_str(&mut body, &[]).unwrap();
            wire::write_array_u32(&mut body, &[]).unwrap();
            wire::write_array_u32(&mut body, &[]).unwrap();
            write_frame(&mut stream, server::CHARACTER_LIST, &body);
        });

        let dimension = Dimension {
            id: 0,
            name: "test",
            host: "127.0.0.1",
            port: addr.port(),
        };

        let mut session = ChatSession::connect("user", "pass", dimension, Some(Duration::from_secs(2))).unwrap();
        let err = session.send_private_message(1, b"hi").unwrap_err();
        assert!(matches!(err, ChatError::IllegalState(_)));

        server.join().unwrap();
    }
}
