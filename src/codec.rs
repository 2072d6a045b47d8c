//! The Field Codec: per-primitive encode/decode and value primitives.
//!
//! Three families of helpers live here, one per concern:
//!
//! 1. **Binary wire functions** (`write_*` / `read_*`): fixed-width
//!    big-endian scalars and length-prefixed variable data, delegated to by
//!    the binary archives. Decoding mirrors encoding exactly; there is no
//!    self-description.
//! 2. **CSV rendering functions** (`csv_*`): the textual form of each
//!    primitive, delegated to by the text archive.
//! 3. **Comparison / equality / hash primitives** reused by every record's
//!    derived operations, so that ordering and hashing are deterministic
//!    across record types and implementations.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::error::{RecwireError, Result};

/// Sanity cap on buffer and string lengths, enforced on both encode and
/// decode.
///
/// On decode, a prefix above this is treated as corruption rather than a
/// request to allocate gigabytes; on encode, a longer value is rejected
/// before a single byte is written, so the crate never emits a stream its
/// own reader refuses. Matches the 1 MiB limit the original runtime
/// enforces.
pub const MAX_BUFFER_LEN: usize = 1 << 20;

/// Seed of the record hash accumulator.
pub const HASH_SEED: i32 = 17;

/// Multiplier of the record hash accumulator: `result = 37*result + field`.
///
/// This multiply-accumulate scheme is part of the protocol: reproduce it
/// exactly if hash values are persisted or compared across implementations.
pub const HASH_MULTIPLIER: i32 = 37;

// --- BINARY WIRE FUNCTIONS ---

/// Writes a boolean as a single byte (1 = true, 0 = false).
pub fn write_bool<W: Write>(out: &mut W, b: bool) -> Result<()> {
    out.write_all(&[u8::from(b)])?;
    Ok(())
}

/// Writes a 32-bit integer, big-endian.
pub fn write_i32<W: Write>(out: &mut W, v: i32) -> Result<()> {
    out.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Writes a 64-bit integer, big-endian.
pub fn write_i64<W: Write>(out: &mut W, v: i64) -> Result<()> {
    out.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Writes a 32-bit float as its big-endian IEEE-754 bits.
pub fn write_f32<W: Write>(out: &mut W, v: f32) -> Result<()> {
    out.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Writes a 64-bit float as its big-endian IEEE-754 bits.
pub fn write_f64<W: Write>(out: &mut W, v: f64) -> Result<()> {
    out.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Writes a length-prefixed byte run: 4-byte signed big-endian length, then
/// the raw bytes. A null buffer writes length 0 and nothing else.
///
/// Lengths above [`MAX_BUFFER_LEN`] are rejected up front; the prefix is
/// signed 32-bit on the wire, so an unchecked cast would silently wrap and
/// corrupt the stream.
pub fn write_len_prefixed<W: Write>(out: &mut W, bytes: Option<&[u8]>) -> Result<()> {
    let bytes = bytes.unwrap_or(&[]);
    if bytes.len() > MAX_BUFFER_LEN {
        return Err(RecwireError::Format(format!(
            "length {} exceeds maximum {MAX_BUFFER_LEN}",
            bytes.len()
        )));
    }
    write_i32(out, bytes.len() as i32)?;
    out.write_all(bytes)?;
    Ok(())
}

/// Writes a vector or map count as a 4-byte signed big-endian prefix,
/// failing if the count does not fit.
pub fn write_count<W: Write>(out: &mut W, count: usize, what: &str) -> Result<()> {
    let count = i32::try_from(count).map_err(|_| {
        RecwireError::Format(format!("{what} count {count} does not fit in a 32-bit prefix"))
    })?;
    write_i32(out, count)
}

/// Reads a boolean byte. Any non-zero value is `true`.
pub fn read_bool<R: Read>(input: &mut R) -> Result<bool> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}

/// Reads a big-endian 32-bit integer.
pub fn read_i32<R: Read>(input: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Reads a big-endian 64-bit integer.
pub fn read_i64<R: Read>(input: &mut R) -> Result<i64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

/// Reads a big-endian 32-bit float.
pub fn read_f32<R: Read>(input: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

/// Reads a big-endian 64-bit float.
pub fn read_f64<R: Read>(input: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

/// Reads a length-prefixed byte run written by [`write_len_prefixed`].
///
/// Negative lengths and lengths above [`MAX_BUFFER_LEN`] are format errors.
pub fn read_len_prefixed<R: Read>(input: &mut R) -> Result<Vec<u8>> {
    let len = read_i32(input)?;
    if len < 0 {
        return Err(RecwireError::Format(format!("negative length prefix: {len}")));
    }
    let len = len as usize;
    if len > MAX_BUFFER_LEN {
        return Err(RecwireError::Format(format!(
            "length prefix {len} exceeds maximum {MAX_BUFFER_LEN}"
        )));
    }
    let mut bytes = vec![0u8; len];
    input.read_exact(&mut bytes)?;
    Ok(bytes)
}

// --- CSV RENDERING FUNCTIONS ---

/// Renders a boolean for the text archive.
pub fn csv_bool(b: bool) -> &'static str {
    if b {
        "T"
    } else {
        "F"
    }
}

/// Renders a string for the text archive: a leading `'` marks the token as a
/// string, and the separator/brace/escape characters are percent-encoded so
/// the token never breaks field framing.
pub fn csv_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 1);
    out.push('\'');
    for c in s.chars() {
        match c {
            ',' => out.push_str("%2C"),
            '{' => out.push_str("%7B"),
            '}' => out.push_str("%7D"),
            '%' => out.push_str("%25"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a byte buffer for the text archive: `#` followed by lowercase
/// hex. A null buffer renders as a bare `#`.
pub fn csv_buffer(bytes: Option<&[u8]>) -> String {
    let bytes = bytes.unwrap_or(&[]);
    let mut out = String::with_capacity(1 + bytes.len() * 2);
    out.push('#');
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

// --- COMPARISON / EQUALITY PRIMITIVES ---

/// Unsigned-byte lexicographic comparison: the first differing byte decides;
/// a strict prefix orders before the longer run.
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Buffer-field comparison. The wire cannot distinguish a null buffer from
/// an empty one, so neither does the value domain: `None` compares as `[]`.
pub fn buffer_cmp(a: Option<&[u8]>, b: Option<&[u8]>) -> Ordering {
    compare_bytes(a.unwrap_or(&[]), b.unwrap_or(&[]))
}

/// Buffer-field equality, with the same null-as-empty rule as [`buffer_cmp`].
pub fn buffer_eq(a: Option<&[u8]>, b: Option<&[u8]>) -> bool {
    a.unwrap_or(&[]) == b.unwrap_or(&[])
}

// --- HASH PRIMITIVES ---
//
// All arithmetic wraps at 32 bits. The combiner (seed 17, multiplier 37) is
// fixed by the protocol; the per-field hashes below are the canonical ones
// for this implementation.

/// Folds one field hash into the running record hash.
pub fn hash_combine(result: i32, field_hash: i32) -> i32 {
    result.wrapping_mul(HASH_MULTIPLIER).wrapping_add(field_hash)
}

/// Hash of a 32-bit integer field: the value itself.
pub fn hash_int(v: i32) -> i32 {
    v
}

/// Hash of a 64-bit integer field: XOR-fold of the high and low halves.
pub fn hash_long(v: i64) -> i32 {
    let u = v as u64;
    (u ^ (u >> 32)) as u32 as i32
}

/// Hash of a boolean field.
pub fn hash_bool(b: bool) -> i32 {
    if b {
        1231
    } else {
        1237
    }
}

/// Hash of a 32-bit float field: its IEEE-754 bits.
pub fn hash_float(f: f32) -> i32 {
    f.to_bits() as i32
}

/// Hash of a 64-bit float field: XOR-fold of its IEEE-754 bits.
pub fn hash_double(d: f64) -> i32 {
    hash_long(d.to_bits() as i64)
}

/// Hash of a string field: 31-based fold over its UTF-16 code units.
pub fn hash_string(s: &str) -> i32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h
}

/// Hash of a buffer field: 31-based fold over the signed bytes, seeded at 1.
/// `None` hashes like the empty buffer.
pub fn hash_buffer(bytes: Option<&[u8]>) -> i32 {
    let mut h: i32 = 1;
    for b in bytes.unwrap_or(&[]) {
        h = h.wrapping_mul(31).wrapping_add(i32::from(*b as i8));
    }
    h
}
