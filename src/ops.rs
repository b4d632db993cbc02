//! Binary codec for list operations and relationship records.
//!
//! Operation layout:
//!
//! ```text
//! byte 0      op version (1)
//! byte 1      opcode (1 add, 2 remove, 3 tag, 4 untag)
//! byte 2      record version (1)
//! byte 3      record type
//! bytes 4..24 record data (20-byte address)
//! bytes 24..  tag text, UTF-8, tag/untag only
//! ```

use crate::error::DecodeError;
use crate::types::{ListRecord, ADDRESS_LEN, ADDRESS_RECORD_TYPE, RECORD_VERSION};
use std::fmt;

/// Current operation format version.
pub const OP_VERSION: u8 = 1;

/// Fixed size of the header plus record (everything but the tag).
pub const OP_RECORD_END: usize = 4 + ADDRESS_LEN;

/// Operation codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Add = 1,
    Remove = 2,
    Tag = 3,
    Untag = 4,
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Opcode::Add),
            2 => Ok(Opcode::Remove),
            3 => Ok(Opcode::Tag),
            4 => Ok(Opcode::Untag),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }
}

/// A decoded list operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListOp {
    Add(ListRecord),
    Remove(ListRecord),
    Tag(ListRecord, String),
    Untag(ListRecord, String),
}

impl ListOp {
    pub fn opcode(&self) -> Opcode {
        match self {
            ListOp::Add(_) => Opcode::Add,
            ListOp::Remove(_) => Opcode::Remove,
            ListOp::Tag(..) => Opcode::Tag,
            ListOp::Untag(..) => Opcode::Untag,
        }
    }

    pub fn record(&self) -> &ListRecord {
        match self {
            ListOp::Add(record)
            | ListOp::Remove(record)
            | ListOp::Tag(record, _)
            | ListOp::Untag(record, _) => record,
        }
    }

    /// Decode an operation from its wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < 2 {
            return Err(DecodeError::Truncated(bytes.len()));
        }
        if bytes[0] != OP_VERSION {
            return Err(DecodeError::UnsupportedOpVersion(bytes[0]));
        }
        let opcode = Opcode::try_from(bytes[1])?;

        match opcode {
            Opcode::Add | Opcode::Remove if bytes.len() != OP_RECORD_END => {
                return Err(DecodeError::InvalidLength {
                    opcode: opcode as u8,
                    expected: "exactly 24 bytes",
                    actual: bytes.len(),
                });
            }
            Opcode::Tag | Opcode::Untag if bytes.len() < OP_RECORD_END => {
                return Err(DecodeError::InvalidLength {
                    opcode: opcode as u8,
                    expected: "more than 24 bytes",
                    actual: bytes.len(),
                });
            }
            _ => {}
        }

        if bytes[2] != RECORD_VERSION {
            return Err(DecodeError::UnsupportedRecordVersion(bytes[2]));
        }
        let record = ListRecord {
            version: bytes[2],
            record_type: bytes[3],
            data: bytes[4..OP_RECORD_END].to_vec(),
        };

        Ok(match opcode {
            Opcode::Add => ListOp::Add(record),
            Opcode::Remove => ListOp::Remove(record),
            Opcode::Tag => ListOp::Tag(record, decode_tag(&bytes[OP_RECORD_END..])?),
            Opcode::Untag => ListOp::Untag(record, decode_tag(&bytes[OP_RECORD_END..])?),
        })
    }

    /// Encode to wire bytes.
    ///
    /// Only records with 20 bytes of data produce bytes that decode again.
    pub fn encode(&self) -> Vec<u8> {
        let record = self.record();
        let mut out = Vec::with_capacity(OP_RECORD_END + 16);
        out.push(OP_VERSION);
        out.push(self.opcode() as u8);
        out.push(record.version);
        out.push(record.record_type);
        out.extend_from_slice(&record.data);
        match self {
            ListOp::Tag(_, tag) | ListOp::Untag(_, tag) => out.extend_from_slice(tag.as_bytes()),
            ListOp::Add(_) | ListOp::Remove(_) => {}
        }
        out
    }
}

fn decode_tag(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyTag);
    }
    let tag = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidTagUtf8)?;
    Ok(tag.to_string())
}

impl ListRecord {
    /// Encode as `version || record_type || data`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.data.len());
        out.push(self.version);
        out.push(self.record_type);
        out.extend_from_slice(&self.data);
        out
    }

    /// Decode a standalone record.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < 2 {
            return Err(DecodeError::Truncated(bytes.len()));
        }
        if bytes[0] != RECORD_VERSION {
            return Err(DecodeError::UnsupportedRecordVersion(bytes[0]));
        }
        let data = &bytes[2..];
        if bytes[1] == ADDRESS_RECORD_TYPE && data.len() != ADDRESS_LEN {
            return Err(DecodeError::InvalidRecordLength {
                record_type: bytes[1],
                actual: data.len(),
            });
        }
        Ok(ListRecord {
            version: bytes[0],
            record_type: bytes[1],
            data: data.to_vec(),
        })
    }
}

/// Canonical lookup key of a record within a list.
///
/// Version and type are fixed width, so the concatenation is injective.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(Vec<u8>);

impl RecordKey {
    pub fn of(record: &ListRecord) -> Self {
        RecordKey(record.encode())
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({})", self.to_hex())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
