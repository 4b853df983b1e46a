//! Secret record model

use std::fmt;

/// A single secret as fetched from the remote service.
///
/// `path` is the logical folder the secret lives in (e.g. "/prod/db"), kept
/// separate from `key`. Records are never mutated after a fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    pub key: String,
    pub value: String,
    pub path: String,
}

impl Secret {
    pub fn new(key: impl Into<String>, value: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            path: path.into(),
        }
    }

    /// Full path of the secret's tree node: folder path, a slash, then the key
    pub fn node_path(&self) -> String {
        format!("{}/{}", self.path, self.key)
    }
}

// Values stay out of logs and panic messages.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("value", &"<redacted>")
            .finish()
    }
}
