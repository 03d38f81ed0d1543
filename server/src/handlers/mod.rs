//! Request handlers and their wire forms.
//!
//! Wire forms are the camelCase JSON shapes of the public API; handlers map
//! them through the engine's builders and patches, run the store
//! transactions, and hand typed responses back to the route layer.

pub mod announce;
pub mod conference;
pub mod profile;
pub mod registration;
pub mod session;
pub mod speaker;

use serde::{Deserialize, Serialize};

/// A single string payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct StringMessage {
    pub data: String,
}

/// A single boolean payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct BooleanMessage {
    pub data: bool,
}
