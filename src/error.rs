//! Error types for the social graph index.

use crate::records::Reference;
use crate::types::TokenId;
use thiserror::Error;

/// Malformed list operation or record bytes.
///
/// Always fatal to the replay pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Truncated input: {0} bytes")]
    Truncated(usize),

    #[error("Unsupported operation version: {0}")]
    UnsupportedOpVersion(u8),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("Unsupported record version: {0}")]
    UnsupportedRecordVersion(u8),

    #[error("Invalid length for opcode {opcode}: expected {expected}, got {actual}")]
    InvalidLength {
        opcode: u8,
        expected: &'static str,
        actual: usize,
    },

    #[error("Invalid length for record type {record_type}: {actual} data bytes")]
    InvalidRecordLength { record_type: u8, actual: usize },

    #[error("Tag text is empty")]
    EmptyTag,

    #[error("Tag text is not valid UTF-8")]
    InvalidTagUtf8,
}

/// Main error type for graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Protocol decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Record not found in list {token_id}: {record}")]
    ReferenceNotFound { token_id: TokenId, record: String },

    #[error("Stale record reference: {0:?}")]
    StaleReference(Reference),

    #[error("Record already present in list {token_id}: {record}")]
    DuplicateRecord { token_id: TokenId, record: String },

    #[error("Unknown list: {0}")]
    UnknownList(TokenId),

    #[error("Operation references slot {slot} but only {lists} lists were supplied")]
    UnknownSlot { slot: usize, lists: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid token id: {0}")]
    InvalidTokenId(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Replay aborted at operation {position}: {source}")]
    ReplayAborted {
        position: usize,
        #[source]
        source: Box<GraphError>,
    },
}

impl GraphError {
    /// The underlying error, with any replay position wrapping removed.
    pub fn root_cause(&self) -> &GraphError {
        match self {
            GraphError::ReplayAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::InvalidConfig(e.to_string())
    }
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
