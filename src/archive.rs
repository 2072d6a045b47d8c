//! The Archive Protocol: abstract reader/writer traits for record fields.
//!
//! A generated (or hand-written) [`Record`](crate::record::Record) walks its
//! fields in declaration order and issues exactly one archive call per field,
//! bracketing nested records and collections with start/end calls. A concrete
//! archive turns that call sequence into bytes
//! ([`BinaryOutputArchive`](crate::binary::BinaryOutputArchive)) or text
//! ([`CsvOutputArchive`](crate::csv::CsvOutputArchive)).
//!
//! ## Tags are advisory
//!
//! Every operation carries a `tag`: the field or record name. Tags exist for
//! human-readable output only. The binary archives never consume them —
//! binary decode order is purely positional and must exactly match the
//! encode call sequence of the same record type. Reader and writer builds
//! must agree on field order, or decoding silently misinterprets bytes.

use crate::error::Result;
use crate::record::Record;

/// Writer half of the archive protocol.
///
/// Object safe: generated code drives it as `&mut dyn OutputArchive`, so one
/// serialize method serves every concrete wire format.
pub trait OutputArchive {
    /// Opens a record scope. Must be paired with [`end_record`](Self::end_record);
    /// scopes may nest arbitrarily.
    fn start_record(&mut self, tag: &str) -> Result<()>;

    /// Closes the record scope opened by the matching `start_record`.
    fn end_record(&mut self, tag: &str) -> Result<()>;

    /// Writes a boolean field.
    fn write_bool(&mut self, b: bool, tag: &str) -> Result<()>;

    /// Writes a 32-bit integer field.
    fn write_int(&mut self, i: i32, tag: &str) -> Result<()>;

    /// Writes a 64-bit integer field.
    fn write_long(&mut self, l: i64, tag: &str) -> Result<()>;

    /// Writes a 32-bit float field.
    fn write_float(&mut self, f: f32, tag: &str) -> Result<()>;

    /// Writes a 64-bit float field.
    fn write_double(&mut self, d: f64, tag: &str) -> Result<()>;

    /// Writes a UTF-8 string field.
    fn write_string(&mut self, s: &str, tag: &str) -> Result<()>;

    /// Writes an opaque byte buffer field.
    ///
    /// `None` encodes exactly like `Some(&[])`: the wire has no null marker,
    /// so "no data" and "empty data" are indistinguishable to any reader.
    /// Callers owning the distinction must track it out of band.
    fn write_buffer(&mut self, buf: Option<&[u8]>, tag: &str) -> Result<()>;

    /// Writes a nested record field by recursively invoking its serialize.
    fn write_record(&mut self, r: &dyn Record, tag: &str) -> Result<()>;

    /// Opens a repeated-field scope of `len` elements.
    fn start_vector(&mut self, len: usize, tag: &str) -> Result<()>;

    /// Closes the vector scope.
    fn end_vector(&mut self, tag: &str) -> Result<()>;

    /// Opens a keyed-field scope of `len` key/value pairs.
    fn start_map(&mut self, len: usize, tag: &str) -> Result<()>;

    /// Closes the map scope.
    fn end_map(&mut self, tag: &str) -> Result<()>;
}

/// Reader half of the archive protocol.
///
/// Mirror image of [`OutputArchive`]: each call decodes one value and
/// advances the cursor. There is no lookahead and no tag validation — the
/// decoder trusts the caller to issue the exact call sequence the encoder
/// recorded.
pub trait InputArchive {
    /// Opens a record scope for reading.
    fn start_record(&mut self, tag: &str) -> Result<()>;

    /// Closes the record scope.
    fn end_record(&mut self, tag: &str) -> Result<()>;

    /// Reads a boolean field.
    fn read_bool(&mut self, tag: &str) -> Result<bool>;

    /// Reads a 32-bit integer field.
    fn read_int(&mut self, tag: &str) -> Result<i32>;

    /// Reads a 64-bit integer field.
    fn read_long(&mut self, tag: &str) -> Result<i64>;

    /// Reads a 32-bit float field.
    fn read_float(&mut self, tag: &str) -> Result<f32>;

    /// Reads a 64-bit float field.
    fn read_double(&mut self, tag: &str) -> Result<f64>;

    /// Reads a UTF-8 string field.
    fn read_string(&mut self, tag: &str) -> Result<String>;

    /// Reads an opaque byte buffer field.
    ///
    /// A zero length yields an empty vector; whether the writer held a null
    /// or an empty buffer is unknowable (see
    /// [`write_buffer`](OutputArchive::write_buffer)).
    fn read_buffer(&mut self, tag: &str) -> Result<Vec<u8>>;

    /// Reads a nested record field in place by recursively invoking its
    /// deserialize.
    fn read_record(&mut self, r: &mut dyn Record, tag: &str) -> Result<()>;

    /// Opens a repeated-field scope, returning the element count.
    fn start_vector(&mut self, tag: &str) -> Result<usize>;

    /// Closes the vector scope.
    fn end_vector(&mut self, tag: &str) -> Result<()>;

    /// Opens a keyed-field scope, returning the pair count.
    fn start_map(&mut self, tag: &str) -> Result<usize>;

    /// Closes the map scope.
    fn end_map(&mut self, tag: &str) -> Result<()>;
}
