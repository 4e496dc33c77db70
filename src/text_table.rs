//! Extended-message text table (component C10).
//!
//! `MSG_SYSTEM` frames reference their text by a `(category, instance)`
//! pair rather than carrying it inline; the actual template strings ship
//! as a separate tab-separated data file. [`TextTable`] loads that file
//! and resolves references against it.

use std::collections::HashMap;
use std::io::BufRead;

use crate::errors::ChatError;

/// A loaded `category -> instance -> template` text table.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    entries: HashMap<(u32, u32), String>,
}

impl TextTable {
    /// An empty table, useful as a starting point before [`TextTable::load`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a text table from its tab-separated source: one entry per
    /// line, `category\tinstance\tmessage`.
    pub fn load<R: BufRead>(reader: R) -> Result<Self, ChatError> {
        let mut entries = HashMap::new();

        for line in reader.lines() {
            let line = line.map_err(ChatError::from)?;
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(3, '\t');
            let category = parts
                .next()
                .ok_or_else(|| ChatError::MalformedFrame("text table row missing category".into()))?;
            let instance = parts
                .next()
                .ok_or_else(|| ChatError::MalformedFrame("text table row missing instance".into()))?;
            let message = parts
                .next()
                .ok_or_else(|| ChatError::MalformedFrame("text table row missing message".into()))?;

            let category: u32 = category
                .parse()
                .map_err(|_| ChatError::MalformedFrame(format!("bad text table category {category:?}")))?;
            let instance: u32 = instance
                .parse()
                .map_err(|_| ChatError::MalformedFrame(format!("bad text table instance {instance:?}")))?;

            entries.insert((category, instance), message.to_string());
        }

        Ok(Self { entries })
    }

    /// Resolve a `(category, instance)` reference to its template string.
    pub fn get(&self, category: u32, instance: u32) -> Result<&str, ChatError> {
        self.entries
            .get(&(category, instance))
            .map(String::as_str)
            .ok_or_else(|| {
                ChatError::MalformedFrame(format!(
                    "unknown text category={category} instance={instance}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_and_get() {
        let data = "1\t2\tHello, %s!\n3\t4\tGoodbye.\n";
        let table = TextTable::load(Cursor::new(data)).unwrap();
        assert_eq!(table.get(1, 2).unwrap(), "Hello, %s!");
        assert_eq!(table.get(3, 4).unwrap(), "Goodbye.");
    }

    #[test]
    fn test_get_unknown_errors() {
        let table = TextTable::new();
        let err = table.get(1, 1).unwrap_err();
        assert!(matches!(err, ChatError::MalformedFrame(_)));
    }

    #[test]
    fn test_skips_blank_lines() {
        let data = "1\t2\tfoo\n\n3\t4\tbar\n";
        let table = TextTable::load(Cursor::new(data)).unwrap();
        assert_eq!(table.get(1, 2).unwrap(), "foo");
        assert_eq!(table.get(3, 4).unwrap(), "bar");
    }
}
