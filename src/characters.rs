//! The character list advertised by the server after authentication.

/// A character bound to the authenticated account.
///
/// Produced by the server's `CHARACTER_LIST` frame; purely informational,
/// the session only retains the one the caller selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// The character's unique id.
    pub id: u32,
    /// The character's display name, as opaque bytes (see [`crate::wire`]
    /// for rendering helpers).
    pub name: Vec<u8>,
    /// The character's level.
    pub level: u32,
    /// Whether the character is currently online.
    pub online: bool,
}
