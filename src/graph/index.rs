//! Shared graph index: configuration plus a single-writer lock around the state.

use crate::error::Result;
use crate::graph::GraphState;
use crate::ops::ListOp;
use crate::replay::{LogReplayer, OperationEntry, OwnershipEntry, ReplaySummary};
use crate::types::{
    AccountStats, Address, LeaderboardEntry, ListRecord, RelatedAccount, TagCounts,
    TaggedListRecord, TokenId,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use tracing::info;

/// What to do when a byte-identical record is added to a list twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateRecord`.
    #[default]
    Reject,
    /// Keep the existing entry, its position and its tags.
    Ignore,
}

/// Secondary order for leaderboard entries with equal counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Primary list registration order (first-seen order for follower boards).
    #[default]
    Registration,
    /// Address bytes ascending.
    AddressAscending,
}

/// Graph index configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub duplicate_records: DuplicatePolicy,
    pub leaderboard_tie_break: TieBreak,
}

impl GraphConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The graph index shared between one writer and many readers.
///
/// Every replay or apply call holds the write lock for its whole duration;
/// queries take the read lock. Use [`GraphIndex::read`] to run several
/// queries against one consistent view.
#[derive(Default)]
pub struct GraphIndex {
    state: RwLock<GraphState>,
}

impl GraphIndex {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            state: RwLock::new(GraphState::new(config)),
        }
    }

    pub fn config(&self) -> GraphConfig {
        self.state.read().config().clone()
    }

    /// Replay onto the current state.
    ///
    /// On failure the state keeps every operation applied before the
    /// failing one. Use [`GraphIndex::rebuild`] for all-or-nothing.
    pub fn replay(
        &self,
        ownership: &[OwnershipEntry],
        operations: &[OperationEntry],
    ) -> Result<ReplaySummary> {
        let mut state = self.state.write();
        LogReplayer::new(ownership, operations).replay_into(&mut state)
    }

    /// Replay into a fresh state and swap it in only on success.
    ///
    /// Other writers wait for the whole rebuild; readers keep seeing the
    /// old state until the swap.
    pub fn rebuild(
        &self,
        ownership: &[OwnershipEntry],
        operations: &[OperationEntry],
    ) -> Result<ReplaySummary> {
        let current = self.state.upgradable_read();
        let mut fresh = GraphState::new(current.config().clone());
        let summary = LogReplayer::new(ownership, operations).replay_into(&mut fresh)?;
        *RwLockUpgradableReadGuard::upgrade(current) = fresh;
        info!(
            lists = summary.lists_registered,
            applied = summary.operations_applied,
            "graph.rebuild.swapped"
        );
        Ok(summary)
    }

    /// Decode and apply a single operation to a list.
    pub fn apply(&self, token_id: &TokenId, bytes: &[u8]) -> Result<()> {
        let op = ListOp::decode(bytes)?;
        self.state.write().apply_op(token_id, &op)
    }

    pub fn set_primary_list(&self, account: Address, token_id: TokenId) {
        self.state.write().set_primary_list(account, token_id);
    }

    /// Number of lists with a store.
    pub fn list_count(&self) -> usize {
        self.state.read().list_count()
    }

    /// Number of live records in a list.
    pub fn record_count(&self, token_id: &TokenId) -> usize {
        self.state.read().record_count(token_id)
    }

    /// Hold the read lock for a batch of queries.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphState> {
        self.state.read()
    }

    // --- Queries ---

    pub fn get_list_records(&self, token_id: &TokenId) -> Vec<ListRecord> {
        self.state.read().get_list_records(token_id)
    }

    pub fn get_list_records_with_tags(&self, token_id: &TokenId) -> Vec<TaggedListRecord> {
        self.state.read().get_list_records_with_tags(token_id)
    }

    pub fn get_list_record_tags(
        &self,
        token_id: &TokenId,
        record: &ListRecord,
    ) -> Result<Vec<String>> {
        self.state.read().get_list_record_tags(token_id, record)
    }

    pub fn get_primary_list(&self, account: &Address) -> Option<TokenId> {
        self.state.read().get_primary_list(account)
    }

    pub fn get_followers(&self, account: &Address) -> Vec<RelatedAccount> {
        self.state.read().get_followers(account)
    }

    pub fn get_following(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.state.read().get_following(account)
    }

    pub fn get_blocks(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.state.read().get_blocks(account)
    }

    pub fn get_blocked_by(&self, account: &Address) -> Vec<RelatedAccount> {
        self.state.read().get_blocked_by(account)
    }

    pub fn get_mutes(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.state.read().get_mutes(account)
    }

    pub fn get_muted_by(&self, account: &Address) -> Vec<RelatedAccount> {
        self.state.read().get_muted_by(account)
    }

    pub fn get_stats(&self, account: &Address) -> AccountStats {
        self.state.read().get_stats(account)
    }

    pub fn get_following_tag_counts(&self, account: &Address) -> TagCounts {
        self.state.read().get_following_tag_counts(account)
    }

    pub fn get_follower_tag_counts(&self, account: &Address) -> TagCounts {
        self.state.read().get_follower_tag_counts(account)
    }

    pub fn get_leaderboard_followers(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.state.read().get_leaderboard_followers(limit)
    }

    pub fn get_leaderboard_following(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.state.read().get_leaderboard_following(limit)
    }

    pub fn get_leaderboard_blocks(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.state.read().get_leaderboard_blocks(limit)
    }

    pub fn get_leaderboard_mutes(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.state.read().get_leaderboard_mutes(limit)
    }
}
