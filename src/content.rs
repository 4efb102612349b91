//! Content-addressed identifiers for relayed messages

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// SHA-1 of a message's UTF-8 bytes. Used as the file name in the remote
/// repository, so the same message always lands on the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub [u8; 20]);

impl ContentId {
    /// Hash raw message content
    pub fn of(message: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(message.as_bytes());
        let result = hasher.finalize();

        let mut hash_bytes = [0u8; 20];
        hash_bytes.copy_from_slice(&result);

        ContentId(hash_bytes)
    }

    /// Lowercase hex form, as used in URLs and logs
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ContentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| format!("Invalid hex: {}", e))?;
        if bytes.len() != 20 {
            return Err(format!("Expected 20 bytes, got {}", bytes.len()));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(ContentId(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let id = ContentId::of("hello");
        assert_eq!(id.to_string(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn test_deterministic() {
        for message in ["a", "hello world", "ünïcødé ✓", "line\nbreak"] {
            let first = ContentId::of(message);
            let second = ContentId::of(message);
            assert_eq!(first, second);
            assert_eq!(first.to_hex(), second.to_hex());
        }
    }

    #[test]
    fn test_hex_shape() {
        let hex_str = ContentId::of("some quest answer").to_hex();
        assert_eq!(hex_str.len(), 40); // 20 bytes * 2 chars per byte
        assert!(hex_str
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_distinct_messages_distinct_ids() {
        assert_ne!(ContentId::of("hello"), ContentId::of("hello "));
    }

    #[test]
    fn test_display_parse() {
        let id = ContentId::of("hello");
        let parsed = ContentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ContentId::from_str("not hex").is_err());
        assert!(ContentId::from_str("abcd").is_err());
    }
}
