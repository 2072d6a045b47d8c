//! Centralized error handling for Recwire.
//!
//! This module provides the single error type used across the crate. The
//! library strictly avoids panics; every failure condition is propagated
//! through the [`Result`] type.
//!
//! ## Design Philosophy
//!
//! 1. **No Panics:** All error conditions are represented as `Result` values.
//!    The library enforces this through `#![deny(clippy::panic)]` and
//!    `#![deny(clippy::unwrap_used)]`.
//!
//! 2. **Error Chaining:** I/O errors preserve the underlying cause through
//!    the `source()` method, enabling full error traces.
//!
//! 3. **Cloneable Errors:** [`RecwireError`] is `Clone`, allowing errors to
//!    be stored for later analysis. I/O errors are wrapped in `Arc` to make
//!    cloning cheap.
//!
//! ## Error Categories
//!
//! - **I/O Errors** ([`RecwireError::Io`]): the underlying byte sink or
//!   source failed, including truncated input during decode.
//! - **Type Mismatches** ([`RecwireError::TypeMismatch`]): a record was
//!   compared against a record of a different type.
//! - **Format Errors** ([`RecwireError::Format`]): the input bytes violate
//!   the wire format (negative length prefix, invalid UTF-8, unreasonable
//!   buffer length).

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for Recwire operations.
///
/// Equivalent to `std::result::Result<T, RecwireError>` and used throughout
/// the library.
pub type Result<T> = std::result::Result<T, RecwireError>;

/// The master error enum covering all failure domains in Recwire.
///
/// Decoding has no recovery semantics: if a decode call fails mid-record,
/// the archive and the partially populated record are in an undefined state
/// and must be discarded by the caller.
#[derive(Debug, Clone)]
pub enum RecwireError {
    /// Low-level I/O failure on the byte sink or source.
    ///
    /// Truncated input during decode surfaces here as `UnexpectedEof`. The
    /// underlying `io::Error` is wrapped in an `Arc` to keep the error
    /// `Clone`.
    Io(Arc<io::Error>),

    /// Two records of different concrete types were compared.
    ///
    /// Only `compare_record` produces this; `record_equals` answers `false`
    /// for foreign types instead of failing.
    TypeMismatch(String),

    /// The input bytes violate the wire format.
    ///
    /// Covers negative or unreasonably large length prefixes and strings
    /// that are not valid UTF-8. The binary format is not self-describing,
    /// so a reader built against the wrong field sequence typically fails
    /// here, if it fails at all.
    Format(String),
}

impl fmt::Display for RecwireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O Error: {e}"),
            Self::TypeMismatch(s) => write!(f, "Type Mismatch: {s}"),
            Self::Format(s) => write!(f, "Format Error: {s}"),
        }
    }
}

impl std::error::Error for RecwireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RecwireError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
