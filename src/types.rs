//! Core types for the social graph index.

use crate::error::GraphError;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// The only supported relationship record version.
pub const RECORD_VERSION: u8 = 1;

/// Record type of an address record.
pub const ADDRESS_RECORD_TYPE: u8 = 1;

/// Length of a raw account address.
pub const ADDRESS_LEN: usize = 20;

/// Tag that turns an address record into a block.
pub const BLOCK_TAG: &str = "block";

/// Tag that turns an address record into a mute.
pub const MUTE_TAG: &str = "mute";

/// A 20-byte account address.
///
/// Parsing accepts either hex case; display is always lowercase, so two
/// spellings of the same account compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Build from a raw byte slice, which must be exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().ok()?;
        Some(Address(arr))
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(GraphError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(digits).map_err(|_| GraphError::InvalidAddress(s.to_string()))?;
        Address::from_slice(&bytes).ok_or_else(|| GraphError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Identifier of a list (an unsigned 256-bit range NFT token id).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub BigUint);

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        TokenId(BigUint::from(value))
    }
}

impl FromStr for TokenId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BigUint>()
            .map(TokenId)
            .map_err(|_| GraphError::InvalidTokenId(s.to_string()))
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

fn serialize_hex<S, T>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(data.as_ref())))
}

/// A single relationship record in a list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ListRecord {
    pub version: u8,
    pub record_type: u8,
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

impl ListRecord {
    /// A version 1 address record pointing at `address`.
    pub fn address(address: Address) -> Self {
        Self {
            version: RECORD_VERSION,
            record_type: ADDRESS_RECORD_TYPE,
            data: address.0.to_vec(),
        }
    }

    /// The target account, if this is a well-formed address record.
    pub fn as_address(&self) -> Option<Address> {
        if self.version != RECORD_VERSION || self.record_type != ADDRESS_RECORD_TYPE {
            return None;
        }
        Address::from_slice(&self.data)
    }
}

/// A relationship record together with its tags, sorted lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedListRecord {
    #[serde(flatten)]
    pub record: ListRecord,
    pub tags: Vec<String>,
}

/// Derived kind of an address record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Follow,
    Block,
    Mute,
}

impl Relationship {
    /// Classify a record by its shape and tags.
    ///
    /// Non-address records are never classified. A record tagged both
    /// `block` and `mute` is a block.
    pub fn classify(record: &ListRecord, tags: &HashSet<String>) -> Option<Relationship> {
        record.as_address()?;
        if tags.contains(BLOCK_TAG) {
            Some(Relationship::Block)
        } else if tags.contains(MUTE_TAG) {
            Some(Relationship::Mute)
        } else {
            Some(Relationship::Follow)
        }
    }
}

/// An account that points at a queried account, with the tags on that relationship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelatedAccount {
    pub address: Address,
    pub tags: Vec<String>,
}

/// One row of a leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub address: Address,
    pub count: u64,
}

/// Tag usage over a set of relationships.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    /// Distinct tags, sorted.
    pub tags: Vec<String>,
    pub tag_counts: BTreeMap<String, u64>,
}

/// Follower and following totals for one account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub followers_count: u64,
    pub following_count: u64,
}
