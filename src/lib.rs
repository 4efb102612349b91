//! quest-relay
//!
//! Receives `{"message": "..."}` over HTTP and stores the message as a file in
//! a GitHub repository, named by the SHA-1 of its content.

pub mod config;
pub mod content;
pub mod error;
pub mod github;
pub mod logging;
pub mod payload;
pub mod relay;
pub mod server;

pub use config::RelayConfig;
pub use content::ContentId;
pub use error::{RelayError, RelayResult};
pub use github::{ContentStore, GithubContents, RemoteResponse};
pub use payload::{Committer, InboundRequest, OutboundPayload};
pub use relay::{Receipt, Relay};
