//! Storage collaborator contracts and reference stores
//!
//! The core never talks to a backend directly; it consumes the async
//! traits defined here. An empty history is a normal `Ok(vec![])` — only
//! transport-level failures are errors, so callers can tell "no data yet"
//! apart from "storage unreachable".

pub mod directory;
pub mod jsonl;
pub mod memory;
pub mod rows;
pub mod store;

pub use directory::*;
pub use jsonl::*;
pub use memory::*;
pub use rows::*;
pub use store::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or misbehaving. Distinct from "no data".
    #[error("storage transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored record: {0}")]
    Serde(#[from] serde_json::Error),

    /// Rejected before anything was written.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("user not authorized: {0}")]
    UserNotAuthorized(String),

    #[error("user not active: {0}")]
    UserInactive(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
