//! Per-list tag sets keyed by record reference.

use crate::error::{GraphError, Result};
use crate::records::Reference;
use std::collections::{HashMap, HashSet};

/// Tag sets for the records of one list.
///
/// A reference must be tracked (its record appended) before it can be
/// tagged; operations on untracked references fail.
#[derive(Default)]
pub struct TagIndex {
    tags: HashMap<Reference, HashSet<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly appended record with no tags.
    pub fn track(&mut self, reference: Reference) {
        self.tags.entry(reference).or_default();
    }

    /// Stop tracking a removed record, dropping its tags.
    pub fn untrack(&mut self, reference: Reference) -> Result<HashSet<String>> {
        self.tags
            .remove(&reference)
            .ok_or(GraphError::StaleReference(reference))
    }

    /// Add a tag. Adding a present tag is a no-op.
    pub fn add_tag(&mut self, reference: Reference, tag: &str) -> Result<()> {
        let set = self.set_mut(reference)?;
        if !set.contains(tag) {
            set.insert(tag.to_string());
        }
        Ok(())
    }

    /// Remove a tag. Removing an absent tag is a no-op.
    pub fn remove_tag(&mut self, reference: Reference, tag: &str) -> Result<()> {
        self.set_mut(reference)?.remove(tag);
        Ok(())
    }

    /// Borrow the live tag set.
    pub fn get(&self, reference: Reference) -> Result<&HashSet<String>> {
        self.tags
            .get(&reference)
            .ok_or(GraphError::StaleReference(reference))
    }

    /// Tags of a record as a new sorted vector.
    pub fn tags_of(&self, reference: Reference) -> Result<Vec<String>> {
        Ok(sorted(self.get(reference)?))
    }

    fn set_mut(&mut self, reference: Reference) -> Result<&mut HashSet<String>> {
        self.tags
            .get_mut(&reference)
            .ok_or(GraphError::StaleReference(reference))
    }
}

/// Sorted copy of a tag set.
pub fn sorted(tags: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = tags.iter().cloned().collect();
    out.sort();
    out
}
