//! The typed frame catalog: server → client variants decoded into
//! [`server::ServerPacket`], and client → server frame constructors in
//! [`client`].

pub mod client;
pub mod server;

pub use server::ServerPacket;
