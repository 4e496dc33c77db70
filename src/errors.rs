use thiserror::Error;

/// Error types returned by this crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChatError {
    /// A socket read or write did not complete within the configured
    /// timeout.
    #[error("connection timed out")]
    Timeout,

    /// The peer closed the connection mid-read or mid-write.
    #[error("connection broken")]
    ConnectionBroken,

    /// A frame body was truncated, a primitive under-read its declared
    /// length, or a length prefix exceeded the remaining bytes in the body.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A value could not be encoded because it exceeds the width the wire
    /// format allows (a `U32`, a `ChannelId`, or a `Str` length).
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// An encoded frame body would exceed the 16-bit length field of the
    /// frame header. This is a programmer error, not a protocol violation.
    #[error("frame body of {0} bytes exceeds the 16-bit length field")]
    FrameTooLarge(usize),

    /// A well-formed frame arrived with a type the caller did not expect,
    /// during an operation that required a specific response type.
    #[error("unexpected packet type {0}")]
    UnknownPacket(u16),

    /// The server rejected the login attempt or character selection,
    /// carrying the message it sent back.
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// `login()` was called with a character id absent from the character
    /// list the server advertised after authentication.
    #[error("no such character: {0}")]
    NoSuchCharacter(u32),

    /// An operation was invoked while the session was in the wrong state
    /// for it (e.g. sending a chat frame before logging in).
    #[error("illegal operation in current session state: {0}")]
    IllegalState(String),

    /// An I/O error occurred that was not one of the more specific cases
    /// above (e.g. the initial `connect()` failing).
    #[error("i/o error ({0:?}): {1}")]
    IOError(std::io::ErrorKind, String),
}

impl From<std::io::Error> for ChatError {
    fn from(v: std::io::Error) -> Self {
        match v.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Self::Timeout,
            std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::ConnectionReset => {
                Self::ConnectionBroken
            }
            kind => Self::IOError(kind, v.to_string()),
        }
    }
}
