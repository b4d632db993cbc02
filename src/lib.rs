//! # Social Graph
//!
//! An in-memory social graph materialized by replaying an append-only log
//! of list operations.
//!
//! ## Core Concepts
//!
//! - **Lists**: Ordered collections of relationship records, keyed by token id
//! - **Tags**: Free-text labels per record; `block` and `mute` change its meaning
//! - **Primary lists**: The one list per account that speaks for it
//! - **Replay**: Ordered, fail-fast application of the operation log
//!
//! ## Example
//!
//! ```ignore
//! use social_graph::{GraphConfig, GraphIndex, OperationEntry, OwnershipEntry};
//!
//! let index = GraphIndex::new(GraphConfig::default());
//! index.rebuild(&ownership, &operations)?;
//!
//! let followers = index.get_followers(&"0x00000000000000000000000000000000000000a1".parse()?);
//! let top = index.get_leaderboard_followers(10);
//! ```

pub mod error;
pub mod graph;
pub mod ops;
pub mod primary;
pub mod records;
pub mod replay;
pub mod types;

// Re-exports
pub use error::{DecodeError, GraphError, Result};
pub use graph::{DuplicatePolicy, GraphConfig, GraphIndex, GraphState, TieBreak};
pub use ops::{ListOp, Opcode, RecordKey};
pub use primary::PrimaryListIndex;
pub use records::{ListRecords, RecordStore, Reference, TagIndex};
pub use replay::{LogReplayer, OperationEntry, OwnershipEntry, ReplaySummary};
pub use types::*;
