//! High-level entry points for encoding and decoding whole records.

use std::io::{Read, Write};

use tracing::warn;

use crate::binary::{BinaryInputArchive, BinaryOutputArchive};
use crate::csv::CsvOutputArchive;
use crate::error::Result;
use crate::record::Record;

/// Fixed sentinel returned by [`Recwire::debug_string`] when rendering
/// fails.
pub const RENDER_ERROR_SENTINEL: &str = "ERROR";

/// The main entry point for encoding and decoding records.
#[derive(Debug)]
pub struct Recwire;

impl Recwire {
    /// Encodes a record into a fresh byte vector using the binary archive.
    pub fn to_vec(record: &dyn Record) -> Result<Vec<u8>> {
        let mut archive = BinaryOutputArchive::new(Vec::new());
        record.serialize(&mut archive, "")?;
        Ok(archive.into_inner())
    }

    /// Encodes a record into an existing byte sink using the binary archive.
    pub fn write_to<W: Write>(out: W, record: &dyn Record) -> Result<()> {
        let mut archive = BinaryOutputArchive::new(out);
        record.serialize(&mut archive, "")
    }

    /// Decodes a record of type `T` from a byte slice.
    ///
    /// Trailing bytes beyond the record are ignored; the binary format
    /// carries no trailer to validate against.
    pub fn from_slice<T: Record + Default>(bytes: &[u8]) -> Result<T> {
        Self::read_from(bytes)
    }

    /// Decodes a record of type `T` from a byte source.
    pub fn read_from<R: Read, T: Record + Default>(input: R) -> Result<T> {
        let mut archive = BinaryInputArchive::new(input);
        let mut record = T::default();
        record.deserialize(&mut archive, "")?;
        Ok(record)
    }

    /// Renders a record through the text archive for debugging.
    ///
    /// This is the backing of every generated `Display` impl and is commonly
    /// invoked from logging paths, so it never fails: on any internal
    /// encoding error it logs a warning and returns
    /// [`RENDER_ERROR_SENTINEL`].
    pub fn debug_string(record: &dyn Record) -> String {
        let mut archive = CsvOutputArchive::new(Vec::new());
        let rendered = record
            .serialize(&mut archive, "")
            .map(|()| archive.into_inner())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        match rendered {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "debug rendering of record failed");
                RENDER_ERROR_SENTINEL.to_string()
            }
        }
    }
}
