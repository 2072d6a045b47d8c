//! # Recwire
//!
//! A compact positional binary wire format and a companion human-readable
//! text format for typed records, both driven by a single per-record
//! sequence of field operations.
//!
//! ## Overview
//!
//! Recwire is built around the **archive abstraction**: a record walks its
//! fields in declaration order and issues one typed call per field against
//! an abstract [`OutputArchive`] or [`InputArchive`]. Concrete archives turn
//! that call sequence into bytes or text. The record types themselves stay
//! wire-format agnostic, and new formats plug in without touching any
//! record.
//!
//! ### Key Properties
//!
//! *   **Positional Binary Format:** fixed-width big-endian scalars,
//!     length-prefixed buffers and strings, zero-overhead nesting. No type
//!     tags: a record's encoded size is exactly the sum of its fields.
//! *   **Write-Only Text Format:** the [`CsvOutputArchive`] renders the same
//!     field sequence as comma-delimited `tag=value` tokens for debugging
//!     and logging. It is not meant to be parsed back.
//! *   **Deterministic Derived Operations:** every record carries a total
//!     order, content equality and a fixed 37-multiply-accumulate hash, all
//!     visiting fields in the same declared order as the codec.
//! *   **Derived Implementations:** `#[derive(Record)]` generates the whole
//!     capability set from a plain struct definition.
//!
//! ## Usage
//!
//! ```rust
//! use recwire::{Recwire, Record};
//! use recwire::records::{FetchResponse, NodeStat};
//!
//! let resp = FetchResponse::new(Some(vec![1, 2, 3]), NodeStat::default());
//!
//! // Binary round-trip.
//! let bytes = Recwire::to_vec(&resp)?;
//! let back: FetchResponse = Recwire::from_slice(&bytes)?;
//! assert!(resp.record_equals(&back));
//!
//! // Debug rendering (never fails; returns "ERROR" on internal errors).
//! println!("{resp}");
//! # Ok::<(), recwire::RecwireError>(())
//! ```
//!
//! ## Wire Format Caveats
//!
//! The binary format is deliberately not self-describing. Decode order must
//! exactly match the encode call sequence of the same record type; the
//! archive performs no tag validation and will parse garbage without
//! noticing. Reader and writer builds must agree on field order.
//!
//! A null buffer encodes as length `0`, identically to an empty buffer.
//! The distinction does not survive the wire; decoding always yields an
//! empty (non-null) buffer.
//!
//! Buffers and strings are capped at [`codec::MAX_BUFFER_LEN`] (1 MiB) on
//! both encode and decode, so every stream the writer produces is one the
//! reader accepts. Oversized values fail with a format error before any
//! bytes are written.
//!
//! ### Safety and Error Handling
//!
//! * **No Panics:** no `unwrap()` or `panic!()` in the library (enforced by
//!   clippy lints).
//! * **Comprehensive Errors:** all failures surface as a [`RecwireError`].
//! * **Swallowed Rendering Failures:** debug rendering is invoked from
//!   logging paths and therefore never fails; it falls back to a fixed
//!   sentinel string.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// Lets code generated by `#[derive(Record)]` name this crate as `recwire`
// even inside the crate itself.
extern crate self as recwire;

// --- PUBLIC API MODULES ---
pub mod api;
pub mod archive;
pub mod binary;
pub mod codec;
pub mod csv;
pub mod error;
pub mod record;
pub mod records;

// --- RE-EXPORTS ---

pub use api::{Recwire, RENDER_ERROR_SENTINEL};
pub use archive::{InputArchive, OutputArchive};
pub use binary::{BinaryInputArchive, BinaryOutputArchive};
pub use csv::CsvOutputArchive;
pub use error::{RecwireError, Result};
pub use record::Record;

// Re-export the derive macro so it is accessible as `recwire::Record` next
// to the trait, serde-style.
pub use recwire_derive::Record;
