//! Blocking TCP transport: frame-level read/write over a [`TcpStream`],
//! with one timeout governing both I/O and the ping cadence the session
//! layer drives (component C5).

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::errors::ChatError;
use crate::frame::{self, FrameHeader};

/// A connected transport, wrapping a blocking [`TcpStream`].
///
/// All reads and writes use the same timeout, set with
/// [`Transport::set_timeout`]. A timeout during a read surfaces as
/// [`ChatError::Timeout`]; a half-open or reset socket surfaces as
/// [`ChatError::ConnectionBroken`].
#[derive(Debug)]
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    /// Open a TCP connection to `addr`.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ChatError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Wrap an already-connected stream (primarily for tests).
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Set the read/write timeout used by every subsequent operation.
    /// `None` blocks indefinitely.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), ChatError> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    /// Read exactly one frame: a 4-byte header followed by its body.
    pub fn read_frame(&mut self) -> Result<(u16, Vec<u8>), ChatError> {
        let mut header_buf = [0u8; FrameHeader::LEN];
        self.read_exact_mapped(&mut header_buf)?;
        let header = FrameHeader::decode(header_buf);

        let mut body = vec![0u8; header.body_len as usize];
        self.read_exact_mapped(&mut body)?;

        Ok((header.frame_type, body))
    }

    /// Encode and write one frame.
    pub fn write_frame(&mut self, frame_type: u16, body: &[u8]) -> Result<(), ChatError> {
        let framed = frame::encode_frame(frame_type, body)?;
        self.stream.write_all(&framed)?;
        Ok(())
    }

    /// `read_exact`, but mapping a zero-length read against an
    /// already-closed peer to [`ChatError::ConnectionBroken`] rather than
    /// the unadorned `UnexpectedEof` io error would already give.
    fn read_exact_mapped(&mut self, buf: &mut [u8]) -> Result<(), ChatError> {
        if buf.is_empty() {
            return Ok(());
        }
        self.stream.read_exact(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_round_trip_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut t = Transport::from_stream(stream);
            let (frame_type, body) = t.read_frame().unwrap();
            t.write_frame(frame_type, &body).unwrap();
        });

        let mut client = Transport::connect(addr).unwrap();
        client.write_frame(7, b"hello").unwrap();
        let (frame_type, body) = client.read_frame().unwrap();

        assert_eq!(frame_type, 7);
        assert_eq!(body, b"hello");
        server.join().unwrap();
    }

    #[test]
    fn test_read_timeout_surfaces_as_chat_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // Hold the connection open without ever writing.
            thread::sleep(Duration::from_millis(200));
            drop(stream);
        });

        let mut client = Transport::connect(addr).unwrap();
        client
            .set_timeout(Some(Duration::from_millis(20)))
            .unwrap();

        let err = client.read_frame().unwrap_err();
        assert!(matches!(err, ChatError::Timeout));
        server.join().unwrap();
    }

    #[test]
    fn test_closed_peer_surfaces_as_connection_broken() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let mut client = Transport::connect(addr).unwrap();
        let err = client.read_frame().unwrap_err();
        assert!(matches!(err, ChatError::ConnectionBroken));
        server.join().unwrap();
    }
}
