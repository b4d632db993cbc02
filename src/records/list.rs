//! A single list: ordered records, their tags, and a key lookup.

use crate::error::{GraphError, Result};
use crate::graph::DuplicatePolicy;
use crate::ops::RecordKey;
use crate::records::{sorted_tags, RecordStore, Reference, TagIndex};
use crate::types::{ListRecord, TaggedListRecord, TokenId};
use std::collections::{HashMap, HashSet};

/// Materialized state of one list.
pub struct ListRecords {
    token_id: TokenId,
    store: RecordStore,
    tags: TagIndex,
    keys: HashMap<RecordKey, Reference>,
}

impl ListRecords {
    pub fn new(token_id: TokenId) -> Self {
        Self {
            token_id,
            store: RecordStore::new(),
            tags: TagIndex::new(),
            keys: HashMap::new(),
        }
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Append a record. Returns false when an identical record was
    /// already present and the policy ignores duplicates.
    pub fn add(&mut self, record: ListRecord, policy: DuplicatePolicy) -> Result<bool> {
        let key = RecordKey::of(&record);
        if self.keys.contains_key(&key) {
            return match policy {
                DuplicatePolicy::Reject => Err(GraphError::DuplicateRecord {
                    token_id: self.token_id.clone(),
                    record: key.to_hex(),
                }),
                DuplicatePolicy::Ignore => Ok(false),
            };
        }
        let reference = self.store.append(record);
        self.tags.track(reference);
        self.keys.insert(key, reference);
        Ok(true)
    }

    /// Remove a record and drop its tags.
    pub fn remove(&mut self, record: &ListRecord) -> Result<()> {
        let key = RecordKey::of(record);
        let reference = self
            .keys
            .remove(&key)
            .ok_or_else(|| self.not_found(&key))?;
        self.store.remove(reference)?;
        self.tags.untrack(reference)?;
        Ok(())
    }

    pub fn tag(&mut self, record: &ListRecord, tag: &str) -> Result<()> {
        let reference = self.lookup(record)?;
        self.tags.add_tag(reference, tag)
    }

    pub fn untag(&mut self, record: &ListRecord, tag: &str) -> Result<()> {
        let reference = self.lookup(record)?;
        self.tags.remove_tag(reference, tag)
    }

    /// Resolve a record to its storage reference.
    pub fn lookup(&self, record: &ListRecord) -> Result<Reference> {
        let key = RecordKey::of(record);
        self.keys
            .get(&key)
            .copied()
            .ok_or_else(|| self.not_found(&key))
    }

    /// Live tag set of a record, if present.
    pub fn tag_set(&self, record: &ListRecord) -> Option<&HashSet<String>> {
        let reference = self.keys.get(&RecordKey::of(record))?;
        self.tags.get(*reference).ok()
    }

    pub fn tags_of(&self, record: &ListRecord) -> Result<Vec<String>> {
        let reference = self.lookup(record)?;
        self.tags.tags_of(reference)
    }

    /// Records with their live tag sets, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ListRecord, &HashSet<String>)> + '_ {
        self.store
            .iter()
            .filter_map(move |(reference, record)| {
                self.tags.get(reference).ok().map(|tags| (record, tags))
            })
    }

    pub fn records(&self) -> Vec<ListRecord> {
        self.store.iter().map(|(_, record)| record.clone()).collect()
    }

    pub fn records_with_tags(&self) -> Vec<TaggedListRecord> {
        self.iter()
            .map(|(record, tags)| TaggedListRecord {
                record: record.clone(),
                tags: sorted_tags(tags),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn not_found(&self, key: &RecordKey) -> GraphError {
        GraphError::ReferenceNotFound {
            token_id: self.token_id.clone(),
            record: key.to_hex(),
        }
    }
}
