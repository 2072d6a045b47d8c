//! The `Record` trait: the capability set every wire record implements.
//!
//! A record is an ordered, named sequence of typed fields. All five derived
//! operations — serialize, deserialize, compare, equals, hash — must visit
//! the fields in the same declared order, or cross-implementation interop
//! breaks. The `#[derive(Record)]` macro guarantees this; hand-written
//! implementations must uphold it themselves.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use crate::archive::{InputArchive, OutputArchive};
use crate::error::Result;

/// A serializable record with deterministic ordering and hashing.
///
/// Implemented by `#[derive(Record)]` for plain structs; the derive plays
/// the role of a schema compiler emitting one implementation per record
/// type, while the archive protocol stays shared and untouched by schema
/// changes.
pub trait Record: fmt::Debug + Any {
    /// Writes this record's fields, in declared order, into the archive.
    ///
    /// Brackets the fields with `start_record`/`end_record` under `tag`.
    fn serialize(&self, archive: &mut dyn OutputArchive, tag: &str) -> Result<()>;

    /// Populates this record's fields, in declared order, from the archive.
    ///
    /// The read sequence must exactly mirror [`serialize`](Self::serialize);
    /// on failure the record is left partially populated and must be
    /// discarded.
    fn deserialize(&mut self, archive: &mut dyn InputArchive, tag: &str) -> Result<()>;

    /// Total order over records of the same concrete type.
    ///
    /// Fields compare in declared order; the first nonzero result
    /// short-circuits. Nested records delegate recursively. Comparing
    /// against a record of a different type fails with
    /// [`TypeMismatch`](crate::RecwireError::TypeMismatch).
    fn compare_record(&self, peer: &dyn Record) -> Result<Ordering>;

    /// Field-by-field equality with the same order and short-circuiting as
    /// [`compare_record`](Self::compare_record).
    ///
    /// A peer of a different concrete type is simply not equal; this never
    /// fails.
    fn record_equals(&self, peer: &dyn Record) -> bool;

    /// Deterministic 32-bit hash: seeded at 17, each field folded in
    /// declared order via `result = 37*result + field_hash`.
    ///
    /// Consistent with [`record_equals`](Self::record_equals): equal records
    /// hash identically.
    fn record_hash(&self) -> i32;

    /// Upcast used by `compare_record`/`record_equals` to recover the
    /// concrete peer type.
    fn as_any(&self) -> &dyn Any;

    /// Static structural fingerprint of this record type.
    ///
    /// Format: `L<Name>(<codes>)` with one code per field — `z` bool, `i`
    /// int, `l` long, `f` float, `d` double, `s` string, `B` buffer,
    /// `[e]` vector, `{kv}` map, and a recursive `L...(...)` for nested
    /// records. Consumed by schema-compatibility tooling, never by the
    /// runtime codec.
    fn signature() -> String
    where
        Self: Sized;
}
