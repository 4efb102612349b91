//! Inbound request body and the outbound "create or update file" payload

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COMMITTER_NAME: &str = "lacon-bot";
pub const COMMITTER_EMAIL: &str = "10778553+lacon-bot@users.noreply.github.com";

/// Body accepted from callers. A missing `message` decodes as empty and is
/// rejected during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundRequest {
    #[serde(default)]
    pub message: String,
}

impl InboundRequest {
    /// Decode a request body. Only a JSON object is accepted; the derived
    /// struct decoding would also take a positional array like `["hi"]`.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }
}

/// Author identity attached to every remote write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            name: COMMITTER_NAME.to_string(),
            email: COMMITTER_EMAIL.to_string(),
        }
    }
}

/// JSON body of the contents PUT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundPayload {
    /// Commit message
    pub message: String,
    pub committer: Committer,
    /// Standard base64 (padded) of the file content
    pub content: String,
}

impl OutboundPayload {
    pub fn new(message: &str, at: DateTime<Utc>) -> Self {
        Self {
            message: format!("new response at {}", at.timestamp()),
            committer: Committer::default(),
            content: base64::engine::general_purpose::STANDARD.encode(message.as_bytes()),
        }
    }

    /// Decode `content` back into the original bytes
    pub fn decoded_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.content)
    }
}
