//! Owned, unsynchronized materialized view and its mutation paths.

use crate::error::{GraphError, Result};
use crate::graph::GraphConfig;
use crate::ops::{ListOp, RecordKey};
use crate::primary::PrimaryListIndex;
use crate::records::ListRecords;
use crate::types::{Address, ListRecord, TokenId};
use std::collections::HashMap;
use tracing::debug;

/// All lists, their records and tags, and the primary list designations.
///
/// Mutation takes `&mut self`; share it through [`crate::GraphIndex`].
pub struct GraphState {
    pub(crate) config: GraphConfig,
    pub(crate) lists: HashMap<TokenId, ListRecords>,
    /// Token ids in list creation order.
    pub(crate) list_order: Vec<TokenId>,
    pub(crate) primary: PrimaryListIndex,
}

impl Default for GraphState {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl GraphState {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            lists: HashMap::new(),
            list_order: Vec::new(),
            primary: PrimaryListIndex::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Create an empty list if none exists yet.
    pub fn ensure_list(&mut self, token_id: &TokenId) {
        self.list_mut(token_id);
    }

    /// Append a record to a list, creating the list on first use.
    ///
    /// Returns false when a duplicate was ignored.
    pub fn add_record(&mut self, token_id: &TokenId, record: ListRecord) -> Result<bool> {
        let policy = self.config.duplicate_records;
        self.list_mut(token_id).add(record, policy)
    }

    pub fn remove_record(&mut self, token_id: &TokenId, record: &ListRecord) -> Result<()> {
        self.existing_list_mut(token_id, record)?.remove(record)
    }

    pub fn tag_record(&mut self, token_id: &TokenId, record: &ListRecord, tag: &str) -> Result<()> {
        self.existing_list_mut(token_id, record)?.tag(record, tag)
    }

    pub fn untag_record(
        &mut self,
        token_id: &TokenId,
        record: &ListRecord,
        tag: &str,
    ) -> Result<()> {
        self.existing_list_mut(token_id, record)?.untag(record, tag)
    }

    pub fn set_primary_list(&mut self, account: Address, token_id: TokenId) {
        let previous = self.primary.set_primary_list(account, token_id.clone());
        debug!(
            account = %account,
            token_id = %token_id,
            previous = ?previous,
            "graph.set_primary_list"
        );
    }

    /// Apply one decoded operation to a list.
    pub fn apply_op(&mut self, token_id: &TokenId, op: &ListOp) -> Result<()> {
        debug!(
            token_id = %token_id,
            opcode = ?op.opcode(),
            record = %RecordKey::of(op.record()),
            "graph.apply_op"
        );
        match op {
            ListOp::Add(record) => {
                if !self.add_record(token_id, record.clone())? {
                    debug!(token_id = %token_id, "graph.apply_op.duplicate_ignored");
                }
                Ok(())
            }
            ListOp::Remove(record) => self.remove_record(token_id, record),
            ListOp::Tag(record, tag) => self.tag_record(token_id, record, tag),
            ListOp::Untag(record, tag) => self.untag_record(token_id, record, tag),
        }
    }

    /// Number of lists with a store.
    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    /// Number of live records in a list.
    pub fn record_count(&self, token_id: &TokenId) -> usize {
        self.lists.get(token_id).map_or(0, ListRecords::len)
    }

    pub(crate) fn list(&self, token_id: &TokenId) -> Option<&ListRecords> {
        self.lists.get(token_id)
    }

    /// Lists in creation order.
    pub(crate) fn lists_in_order(&self) -> impl Iterator<Item = &ListRecords> + '_ {
        self.list_order.iter().filter_map(move |id| self.lists.get(id))
    }

    fn list_mut(&mut self, token_id: &TokenId) -> &mut ListRecords {
        if !self.lists.contains_key(token_id) {
            self.list_order.push(token_id.clone());
        }
        self.lists
            .entry(token_id.clone())
            .or_insert_with(|| ListRecords::new(token_id.clone()))
    }

    fn existing_list_mut(
        &mut self,
        token_id: &TokenId,
        record: &ListRecord,
    ) -> Result<&mut ListRecords> {
        self.lists
            .get_mut(token_id)
            .ok_or_else(|| GraphError::ReferenceNotFound {
                token_id: token_id.clone(),
                record: RecordKey::of(record).to_hex(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DuplicatePolicy;

    fn record(byte: u8) -> ListRecord {
        ListRecord::address(Address([byte; 20]))
    }

    #[test]
    fn test_add_creates_list_lazily() {
        let mut state = GraphState::default();
        let id = TokenId::from(5);
        assert_eq!(state.list_count(), 0);

        state.add_record(&id, record(1)).unwrap();
        assert_eq!(state.list_count(), 1);
        assert_eq!(state.record_count(&id), 1);
    }

    #[test]
    fn test_mutations_on_unknown_list_fail() {
        let mut state = GraphState::default();
        let id = TokenId::from(5);
        assert!(matches!(
            state.remove_record(&id, &record(1)),
            Err(GraphError::ReferenceNotFound { .. })
        ));
        assert!(matches!(
            state.untag_record(&id, &record(1), "block"),
            Err(GraphError::ReferenceNotFound { .. })
        ));
        assert_eq!(state.list_count(), 0);
    }

    #[test]
    fn test_apply_op_dispatch() {
        let mut state = GraphState::default();
        let id = TokenId::from(1);

        state.apply_op(&id, &ListOp::Add(record(1))).unwrap();
        state
            .apply_op(&id, &ListOp::Tag(record(1), "top8".to_string()))
            .unwrap();
        assert_eq!(state.list(&id).unwrap().tags_of(&record(1)).unwrap(), vec!["top8"]);

        state
            .apply_op(&id, &ListOp::Untag(record(1), "top8".to_string()))
            .unwrap();
        assert!(state.list(&id).unwrap().tags_of(&record(1)).unwrap().is_empty());

        state.apply_op(&id, &ListOp::Remove(record(1))).unwrap();
        assert_eq!(state.record_count(&id), 0);
    }

    #[test]
    fn test_duplicate_add_follows_config() {
        let id = TokenId::from(1);

        let mut strict = GraphState::default();
        strict.apply_op(&id, &ListOp::Add(record(1))).unwrap();
        assert!(matches!(
            strict.apply_op(&id, &ListOp::Add(record(1))),
            Err(GraphError::DuplicateRecord { .. })
        ));

        let mut lenient = GraphState::new(GraphConfig {
            duplicate_records: DuplicatePolicy::Ignore,
            ..GraphConfig::default()
        });
        lenient.apply_op(&id, &ListOp::Add(record(1))).unwrap();
        lenient.apply_op(&id, &ListOp::Add(record(1))).unwrap();
        assert_eq!(lenient.record_count(&id), 1);
    }

    #[test]
    fn test_list_creation_order() {
        let mut state = GraphState::default();
        for id in [7u64, 3, 9] {
            state.ensure_list(&TokenId::from(id));
        }
        state.ensure_list(&TokenId::from(3));
        let order: Vec<_> = state.lists_in_order().map(|l| l.token_id().clone()).collect();
        assert_eq!(
            order,
            vec![TokenId::from(7), TokenId::from(3), TokenId::from(9)]
        );
    }
}
