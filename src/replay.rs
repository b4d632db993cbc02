//! Sequential replay of the list operation log.
//!
//! Ownership entries are registered first, each as its owner's primary
//! list. Operations are then decoded and applied strictly in order; the
//! first failure aborts the pass and leaves earlier operations applied.

use crate::error::{GraphError, Result};
use crate::graph::{GraphConfig, GraphState};
use crate::ops::{ListOp, Opcode};
use crate::types::{Address, TokenId};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A list and the account that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipEntry {
    pub token_id: TokenId,
    pub owner: Address,
}

impl OwnershipEntry {
    pub fn new(token_id: impl Into<TokenId>, owner: Address) -> Self {
        Self {
            token_id: token_id.into(),
            owner,
        }
    }
}

/// Raw operation bytes bound to a list through a slot in the ownership sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationEntry {
    pub slot: usize,
    pub bytes: Vec<u8>,
}

impl OperationEntry {
    pub fn new(slot: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot,
            bytes: bytes.into(),
        }
    }
}

/// Counts from a completed replay pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub lists_registered: u64,
    pub operations_applied: u64,
    pub adds: u64,
    pub removes: u64,
    pub tags: u64,
    pub untags: u64,
}

impl ReplaySummary {
    fn record(&mut self, opcode: Opcode) {
        self.operations_applied += 1;
        match opcode {
            Opcode::Add => self.adds += 1,
            Opcode::Remove => self.removes += 1,
            Opcode::Tag => self.tags += 1,
            Opcode::Untag => self.untags += 1,
        }
    }
}

/// One replay pass over an ownership table and an operation stream.
pub struct LogReplayer<'a> {
    ownership: &'a [OwnershipEntry],
    operations: &'a [OperationEntry],
}

impl<'a> LogReplayer<'a> {
    pub fn new(ownership: &'a [OwnershipEntry], operations: &'a [OperationEntry]) -> Self {
        Self {
            ownership,
            operations,
        }
    }

    /// Apply the whole log to `state`.
    ///
    /// Errors are wrapped in [`GraphError::ReplayAborted`] carrying the
    /// position of the failing operation.
    pub fn replay_into(&self, state: &mut GraphState) -> Result<ReplaySummary> {
        info!(
            lists = self.ownership.len(),
            operations = self.operations.len(),
            "replay.start"
        );
        let mut summary = ReplaySummary::default();

        for entry in self.ownership {
            state.ensure_list(&entry.token_id);
            state.set_primary_list(entry.owner, entry.token_id.clone());
            summary.lists_registered += 1;
        }

        for (position, entry) in self.operations.iter().enumerate() {
            let opcode = self.apply_one(state, entry).map_err(|e| {
                warn!(position, slot = entry.slot, error = %e, "replay.aborted");
                GraphError::ReplayAborted {
                    position,
                    source: Box::new(e),
                }
            })?;
            summary.record(opcode);
        }

        info!(
            applied = summary.operations_applied,
            adds = summary.adds,
            removes = summary.removes,
            tags = summary.tags,
            untags = summary.untags,
            "replay.complete"
        );
        Ok(summary)
    }

    /// Replay into a scratch state, reporting the first failure.
    pub fn validate(&self, config: GraphConfig) -> Result<ReplaySummary> {
        let mut scratch = GraphState::new(config);
        self.replay_into(&mut scratch)
    }

    fn apply_one(&self, state: &mut GraphState, entry: &OperationEntry) -> Result<Opcode> {
        let token_id = self
            .ownership
            .get(entry.slot)
            .map(|owner| &owner.token_id)
            .ok_or(GraphError::UnknownSlot {
                slot: entry.slot,
                lists: self.ownership.len(),
            })?;
        let op = ListOp::decode(&entry.bytes)?;
        state.apply_op(token_id, &op)?;
        debug!(slot = entry.slot, opcode = ?op.opcode(), "replay.applied");
        Ok(op.opcode())
    }
}
