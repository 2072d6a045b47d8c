//! Representative generated record types.
//!
//! These two types are the shape every record built on the protocol takes: a
//! response envelope carrying an opaque payload plus a nested metadata
//! record. A schema compiler would emit them; here `#[derive(Record)]`
//! does.

use crate::Record;

/// Per-node metadata: transaction ids, timestamps and counters.
///
/// Eleven numeric fields in fixed declared order; its binary form is always
/// 68 bytes. Signature: `LNodeStat(lllliiiliil)`.
#[derive(Debug, Clone, Default, Record)]
pub struct NodeStat {
    /// Transaction id of the create operation.
    pub create_txn: i64,
    /// Transaction id of the last modification.
    pub modify_txn: i64,
    /// Creation timestamp, milliseconds since the epoch.
    pub create_time: i64,
    /// Last-modification timestamp, milliseconds since the epoch.
    pub modify_time: i64,
    /// Data version, bumped on every write.
    pub version: i32,
    /// Child-list version.
    pub child_version: i32,
    /// ACL version.
    pub acl_version: i32,
    /// Session id of the owning client, zero for persistent nodes.
    pub owner_session: i64,
    /// Length of the node payload in bytes.
    pub data_length: i32,
    /// Number of direct children.
    pub num_children: i32,
    /// Transaction id of the last child-list change.
    pub child_txn: i64,
}

/// Response envelope for a node fetch: the opaque payload plus its
/// [`NodeStat`].
///
/// Signature: `LFetchResponse(BLNodeStat(lllliiiliil))`.
///
/// `data` is nullable in the value domain, but the wire encodes `None` and
/// `Some(vec![])` identically (length 0, no null marker), and decoding
/// always yields `Some`. Callers owning the nullable-vs-empty distinction
/// must track it out of band.
#[derive(Debug, Clone, Default, Record)]
pub struct FetchResponse {
    /// Opaque node payload.
    pub data: Option<Vec<u8>>,
    /// Metadata of the fetched node.
    pub stat: NodeStat,
}

impl FetchResponse {
    /// Convenience constructor with all fields.
    pub fn new(data: Option<Vec<u8>>, stat: NodeStat) -> Self {
        Self { data, stat }
    }
}
