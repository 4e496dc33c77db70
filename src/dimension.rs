//! The static dimension (game world/shard) registry (component C8).

/// An Anarchy Online dimension: a distinct game world with its own chat
/// server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    /// The dimension's numeric id.
    pub id: u32,
    /// The dimension's display name.
    pub name: &'static str,
    /// The chat server's hostname.
    pub host: &'static str,
    /// The chat server's TCP port.
    pub port: u16,
}

const DIMENSIONS: &[Dimension] = &[
    Dimension {
        id: 0,
        name: "Test-Live (Test Server)",
        host: "chat.dt.funcom.com",
        port: 7109,
    },
    Dimension {
        id: 1,
        name: "Atlantean (Rubi-Ka 1)",
        host: "chat.d1.funcom.com",
        port: 7101,
    },
    Dimension {
        id: 2,
        name: "Rimor (Rubi-Ka 2)",
        host: "chat.d2.funcom.com",
        port: 7102,
    },
];

impl Dimension {
    /// Look up a dimension by its numeric id.
    pub fn by_id(id: u32) -> Option<Dimension> {
        DIMENSIONS.iter().copied().find(|d| d.id == id)
    }

    /// All known dimensions, for enumeration purposes (e.g. a `--list`
    /// flag on a client binary).
    pub fn all() -> &'static [Dimension] {
        DIMENSIONS
    }
}
