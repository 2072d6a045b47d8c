//! The binary archives: length-prefixed, tag-free wire encoding.
//!
//! The binary format is positional. Scalars are fixed-width big-endian,
//! strings and buffers carry a 4-byte signed length prefix, vectors and maps
//! a 4-byte signed count. Nested records add zero framing: their fields are
//! emitted inline, so a record's binary size is exactly the sum of its
//! fields' sizes.
//!
//! There are no type tags and no self-description beyond length prefixes.
//! This is an intentional compactness tradeoff: a decoder for type X must be
//! built against the exact field sequence of X's schema version. Feeding it
//! anything else is a programming error the archive cannot detect — it will
//! happily parse garbage.

use std::io::{Read, Write};

use crate::archive::{InputArchive, OutputArchive};
use crate::codec;
use crate::error::{RecwireError, Result};
use crate::record::Record;

/// Writer half of the binary archive, over any `io::Write` sink.
///
/// One archive instance serves exactly one top-level serialize call; it owns
/// no state beyond the sink itself.
#[derive(Debug)]
pub struct BinaryOutputArchive<W: Write> {
    out: W,
}

impl<W: Write> BinaryOutputArchive<W> {
    /// Wraps a byte sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the archive, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputArchive for BinaryOutputArchive<W> {
    // Record boundaries exist only in the caller's call structure, not in
    // the bytes.
    fn start_record(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn end_record(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn write_bool(&mut self, b: bool, _tag: &str) -> Result<()> {
        codec::write_bool(&mut self.out, b)
    }

    fn write_int(&mut self, i: i32, _tag: &str) -> Result<()> {
        codec::write_i32(&mut self.out, i)
    }

    fn write_long(&mut self, l: i64, _tag: &str) -> Result<()> {
        codec::write_i64(&mut self.out, l)
    }

    fn write_float(&mut self, f: f32, _tag: &str) -> Result<()> {
        codec::write_f32(&mut self.out, f)
    }

    fn write_double(&mut self, d: f64, _tag: &str) -> Result<()> {
        codec::write_f64(&mut self.out, d)
    }

    fn write_string(&mut self, s: &str, _tag: &str) -> Result<()> {
        codec::write_len_prefixed(&mut self.out, Some(s.as_bytes()))
    }

    fn write_buffer(&mut self, buf: Option<&[u8]>, _tag: &str) -> Result<()> {
        codec::write_len_prefixed(&mut self.out, buf)
    }

    fn write_record(&mut self, r: &dyn Record, tag: &str) -> Result<()> {
        r.serialize(self, tag)
    }

    fn start_vector(&mut self, len: usize, _tag: &str) -> Result<()> {
        codec::write_count(&mut self.out, len, "vector")
    }

    fn end_vector(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn start_map(&mut self, len: usize, _tag: &str) -> Result<()> {
        codec::write_count(&mut self.out, len, "map")
    }

    fn end_map(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }
}

/// Reader half of the binary archive, over any `io::Read` source.
///
/// Decoding mirrors encoding exactly. Truncated input surfaces as an I/O
/// error from the underlying reader; corrupted length prefixes surface as
/// format errors.
#[derive(Debug)]
pub struct BinaryInputArchive<R: Read> {
    input: R,
}

impl<R: Read> BinaryInputArchive<R> {
    /// Wraps a byte source.
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Consumes the archive, returning the source.
    pub fn into_inner(self) -> R {
        self.input
    }

    fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = codec::read_i32(&mut self.input)?;
        if count < 0 {
            return Err(RecwireError::Format(format!(
                "negative {what} count: {count}"
            )));
        }
        Ok(count as usize)
    }
}

impl<R: Read> InputArchive for BinaryInputArchive<R> {
    fn start_record(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn end_record(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn read_bool(&mut self, _tag: &str) -> Result<bool> {
        codec::read_bool(&mut self.input)
    }

    fn read_int(&mut self, _tag: &str) -> Result<i32> {
        codec::read_i32(&mut self.input)
    }

    fn read_long(&mut self, _tag: &str) -> Result<i64> {
        codec::read_i64(&mut self.input)
    }

    fn read_float(&mut self, _tag: &str) -> Result<f32> {
        codec::read_f32(&mut self.input)
    }

    fn read_double(&mut self, _tag: &str) -> Result<f64> {
        codec::read_f64(&mut self.input)
    }

    fn read_string(&mut self, _tag: &str) -> Result<String> {
        let bytes = codec::read_len_prefixed(&mut self.input)?;
        String::from_utf8(bytes)
            .map_err(|e| RecwireError::Format(format!("string field is not valid UTF-8: {e}")))
    }

    fn read_buffer(&mut self, _tag: &str) -> Result<Vec<u8>> {
        codec::read_len_prefixed(&mut self.input)
    }

    fn read_record(&mut self, r: &mut dyn Record, tag: &str) -> Result<()> {
        r.deserialize(self, tag)
    }

    fn start_vector(&mut self, _tag: &str) -> Result<usize> {
        self.read_count("vector")
    }

    fn end_vector(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }

    fn start_map(&mut self, _tag: &str) -> Result<usize> {
        self.read_count("map")
    }

    fn end_map(&mut self, _tag: &str) -> Result<()> {
        Ok(())
    }
}
