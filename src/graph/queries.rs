//! Read queries over the materialized graph.
//!
//! Per-account queries resolve the account's primary list. Follower-style
//! queries walk the primary list index in registration order and look the
//! queried address up in each owner's list. Leaderboards scan everything.

use crate::error::{GraphError, Result};
use crate::graph::{GraphState, TieBreak};
use crate::records::{sorted_tags, ListRecords};
use crate::types::{
    AccountStats, Address, LeaderboardEntry, ListRecord, RelatedAccount, Relationship, TagCounts,
    TaggedListRecord, TokenId,
};
use std::collections::{BTreeMap, HashMap, HashSet};

impl GraphState {
    /// Records of a list in insertion order. Unknown lists are empty.
    pub fn get_list_records(&self, token_id: &TokenId) -> Vec<ListRecord> {
        self.list(token_id)
            .map(ListRecords::records)
            .unwrap_or_default()
    }

    /// Records of a list with their sorted tags, in insertion order.
    pub fn get_list_records_with_tags(&self, token_id: &TokenId) -> Vec<TaggedListRecord> {
        self.list(token_id)
            .map(ListRecords::records_with_tags)
            .unwrap_or_default()
    }

    /// Sorted tags of one record.
    pub fn get_list_record_tags(
        &self,
        token_id: &TokenId,
        record: &ListRecord,
    ) -> Result<Vec<String>> {
        self.list(token_id)
            .ok_or_else(|| GraphError::UnknownList(token_id.clone()))?
            .tags_of(record)
    }

    pub fn get_primary_list(&self, account: &Address) -> Option<TokenId> {
        self.primary.get_primary_list(account).cloned()
    }

    pub fn get_following(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.relationships_of(account, Relationship::Follow)
    }

    pub fn get_followers(&self, account: &Address) -> Vec<RelatedAccount> {
        self.related_to(account, Relationship::Follow)
    }

    pub fn get_blocks(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.relationships_of(account, Relationship::Block)
    }

    pub fn get_blocked_by(&self, account: &Address) -> Vec<RelatedAccount> {
        self.related_to(account, Relationship::Block)
    }

    pub fn get_mutes(&self, account: &Address) -> Vec<TaggedListRecord> {
        self.relationships_of(account, Relationship::Mute)
    }

    pub fn get_muted_by(&self, account: &Address) -> Vec<RelatedAccount> {
        self.related_to(account, Relationship::Mute)
    }

    pub fn get_stats(&self, account: &Address) -> AccountStats {
        AccountStats {
            followers_count: self
                .relations_pointing_at(account, Relationship::Follow)
                .count() as u64,
            following_count: self.count_in_primary_list(account, Relationship::Follow),
        }
    }

    /// Tag usage across the account's follows.
    pub fn get_following_tag_counts(&self, account: &Address) -> TagCounts {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for (_, tags) in self.classified_in_primary_list(account, Relationship::Follow) {
            for tag in tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        tag_counts(counts)
    }

    /// Tag usage across the follow relationships pointing at the account.
    pub fn get_follower_tag_counts(&self, account: &Address) -> TagCounts {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for (_, tags) in self.relations_pointing_at(account, Relationship::Follow) {
            for tag in tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        tag_counts(counts)
    }

    pub fn get_leaderboard_following(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.owner_leaderboard(Relationship::Follow, limit)
    }

    pub fn get_leaderboard_blocks(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.owner_leaderboard(Relationship::Block, limit)
    }

    pub fn get_leaderboard_mutes(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.owner_leaderboard(Relationship::Mute, limit)
    }

    /// Most-followed addresses, counting distinct following lists.
    ///
    /// Every list is scanned, whether or not it is anyone's primary list.
    pub fn get_leaderboard_followers(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut followers: HashMap<Address, HashSet<usize>> = HashMap::new();
        let mut first_seen: Vec<Address> = Vec::new();

        for (position, list) in self.lists_in_order().enumerate() {
            for (record, tags) in list.iter() {
                if Relationship::classify(record, tags) != Some(Relationship::Follow) {
                    continue;
                }
                let Some(target) = record.as_address() else {
                    continue;
                };
                let lists = followers.entry(target).or_insert_with(|| {
                    first_seen.push(target);
                    HashSet::new()
                });
                lists.insert(position);
            }
        }

        let entries = first_seen
            .into_iter()
            .map(|address| LeaderboardEntry {
                address,
                count: followers.get(&address).map_or(0, |lists| lists.len() as u64),
            })
            .collect();
        self.rank(entries, limit)
    }

    /// Ranked count per primary-list owner.
    fn owner_leaderboard(&self, kind: Relationship, limit: usize) -> Vec<LeaderboardEntry> {
        let entries = self
            .primary
            .iter()
            .map(|(account, token_id)| LeaderboardEntry {
                address: *account,
                count: self.count_in_list(token_id, kind),
            })
            .collect();
        self.rank(entries, limit)
    }

    /// Sort descending by count, then by the configured tie-break.
    fn rank(&self, mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
        match self.config.leaderboard_tie_break {
            TieBreak::Registration => entries.sort_by(|a, b| b.count.cmp(&a.count)),
            TieBreak::AddressAscending => {
                entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.address.cmp(&b.address)))
            }
        }
        entries.truncate(limit);
        entries
    }

    fn relationships_of(&self, account: &Address, kind: Relationship) -> Vec<TaggedListRecord> {
        self.classified_in_primary_list(account, kind)
            .map(|(record, tags)| TaggedListRecord {
                record: record.clone(),
                tags: sorted_tags(tags),
            })
            .collect()
    }

    fn related_to(&self, account: &Address, kind: Relationship) -> Vec<RelatedAccount> {
        self.relations_pointing_at(account, kind)
            .map(|(owner, tags)| RelatedAccount {
                address: owner,
                tags: sorted_tags(tags),
            })
            .collect()
    }

    /// `(owner, tags)` for every primary list holding a `kind` record for `account`.
    fn relations_pointing_at<'a>(
        &'a self,
        account: &Address,
        kind: Relationship,
    ) -> impl Iterator<Item = (Address, &'a HashSet<String>)> + 'a {
        let target = ListRecord::address(*account);
        self.primary.iter().filter_map(move |(owner, token_id)| {
            let tags = self.list(token_id)?.tag_set(&target)?;
            (Relationship::classify(&target, tags) == Some(kind)).then_some((*owner, tags))
        })
    }

    fn classified_in_primary_list<'a>(
        &'a self,
        account: &Address,
        kind: Relationship,
    ) -> impl Iterator<Item = (&'a ListRecord, &'a HashSet<String>)> + 'a {
        self.primary
            .get_primary_list(account)
            .and_then(|token_id| self.list(token_id))
            .into_iter()
            .flat_map(move |list| {
                list.iter().filter(move |(record, tags)| {
                    Relationship::classify(record, tags) == Some(kind)
                })
            })
    }

    fn count_in_primary_list(&self, account: &Address, kind: Relationship) -> u64 {
        self.classified_in_primary_list(account, kind).count() as u64
    }

    fn count_in_list(&self, token_id: &TokenId, kind: Relationship) -> u64 {
        self.list(token_id).map_or(0, |list| {
            list.iter()
                .filter(|(record, tags)| Relationship::classify(record, tags) == Some(kind))
                .count() as u64
        })
    }
}

fn tag_counts(counts: HashMap<&str, u64>) -> TagCounts {
    let tag_counts: BTreeMap<String, u64> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    TagCounts {
        tags: tag_counts.keys().cloned().collect(),
        tag_counts,
    }
}
