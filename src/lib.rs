#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::explicit_iter_loop,
    clippy::future_not_send,
    clippy::todo,
    clippy::unimplemented,
    clippy::use_self,
    clippy::doc_markdown,
    clippy::print_stdout,
    missing_debug_implementations,
    unused_crate_dependencies,
    unreachable_pub,
    missing_docs
)]

//! Client library for Anarchy Online's chat/messaging protocol: the
//! Diffie-Hellman/TEA login handshake, the binary frame codec, the typed
//! packet catalog, and a blocking session state machine built on top of
//! them.

mod characters;
pub use characters::Character;

mod errors;
pub use errors::ChatError;

mod wire;
pub use wire::{to_latin1, to_utf8_lossy, ChannelId};

mod frame;
pub use frame::{encode_frame, FrameHeader};

pub mod packets;
pub use packets::ServerPacket;

mod login_key;
pub use login_key::generate_login_key;

mod transport;
pub use transport::Transport;

mod session;
pub use session::{ChatSession, SessionState};

mod dimension;
pub use dimension::Dimension;

pub mod aoml;

mod text_table;
pub use text_table::TextTable;

// Unused crate lint workaround for dev dependency: only exercised by the
// benches/ target, not by the library's own test suite.
#[cfg(test)]
use criterion as _;
