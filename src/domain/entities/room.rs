//! Matrix room identifier.

use std::fmt;

/// A room id such as `!abc123:example.org`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Sigil every room id starts with.
    pub const SIGIL: char = '!';

    /// Creates a room id, requiring the leading `!`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.len() > 1 && value.starts_with(Self::SIGIL) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
