//! Per-list record storage.
//!
//! Each list keeps its records in an insertion-ordered arena, a tag set per
//! record keyed by the record's storage reference, and a byte-key lookup
//! from record to reference.

mod list;
mod store;
mod tags;

pub use list::ListRecords;
pub use store::{RecordStore, Reference};
pub use tags::TagIndex;

pub(crate) use tags::sorted as sorted_tags;
