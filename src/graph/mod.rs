//! The graph index: lists, tags, and primary list designations, with the
//! follow/block/mute queries built on top of them.

mod index;
mod queries;
mod state;

pub use index::{DuplicatePolicy, GraphConfig, GraphIndex, TieBreak};
pub use state::GraphState;
