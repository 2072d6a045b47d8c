//! The text archive: write-only, comma-delimited debug rendering.
//!
//! Fields render as `tag=value` tokens in declared order, records as
//! `tag=s{...}`, vectors as `v{...}` and maps as `m{...}`. Elements inside a
//! vector or map scope are anonymous, so their tokens carry no tag. The
//! output is for humans and logging tools: there is no matching input
//! archive, and no round-trip guarantee for binary-ambiguous cases (strings
//! escape their separators, buffers and nesting are not framed for
//! parsing). This is an accepted limitation, not a bug.

use std::io::Write;

use crate::archive::OutputArchive;
use crate::codec;
use crate::error::Result;
use crate::record::Record;

/// Kind of the innermost open scope; decides whether tags are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Record,
    Vector,
    Map,
}

/// Write-only text archive over any `io::Write` sink.
#[derive(Debug)]
pub struct CsvOutputArchive<W: Write> {
    out: W,
    first: bool,
    scopes: Vec<Scope>,
}

impl<W: Write> CsvOutputArchive<W> {
    /// Wraps a text sink.
    pub fn new(out: W) -> Self {
        Self {
            out,
            first: true,
            scopes: Vec::new(),
        }
    }

    /// Consumes the archive, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    // Comma before every token except the first of the current scope.
    fn separate(&mut self) -> Result<()> {
        if self.first {
            self.first = false;
        } else {
            self.out.write_all(b",")?;
        }
        Ok(())
    }

    // Tags label record fields; vector and map elements are anonymous.
    fn write_tag(&mut self, tag: &str) -> Result<()> {
        let in_collection = matches!(self.scopes.last(), Some(Scope::Vector | Scope::Map));
        if !tag.is_empty() && !in_collection {
            self.out.write_all(tag.as_bytes())?;
            self.out.write_all(b"=")?;
        }
        Ok(())
    }

    fn field(&mut self, value: &str, tag: &str) -> Result<()> {
        self.separate()?;
        self.write_tag(tag)?;
        self.out.write_all(value.as_bytes())?;
        Ok(())
    }

    fn open_scope(&mut self, marker: &str, tag: &str, scope: Scope) -> Result<()> {
        self.separate()?;
        self.write_tag(tag)?;
        self.out.write_all(marker.as_bytes())?;
        self.scopes.push(scope);
        self.first = true;
        Ok(())
    }

    fn close_scope(&mut self) -> Result<()> {
        self.out.write_all(b"}")?;
        self.scopes.pop();
        self.first = false;
        Ok(())
    }
}

impl<W: Write> OutputArchive for CsvOutputArchive<W> {
    fn start_record(&mut self, tag: &str) -> Result<()> {
        // The top-level record (empty tag) has no brackets; its fields form
        // one comma-delimited line.
        if tag.is_empty() && self.scopes.is_empty() {
            return Ok(());
        }
        self.open_scope("s{", tag, Scope::Record)
    }

    fn end_record(&mut self, tag: &str) -> Result<()> {
        if tag.is_empty() && self.scopes.is_empty() {
            self.out.write_all(b"\n")?;
            self.first = true;
            return Ok(());
        }
        self.close_scope()
    }

    fn write_bool(&mut self, b: bool, tag: &str) -> Result<()> {
        self.field(codec::csv_bool(b), tag)
    }

    fn write_int(&mut self, i: i32, tag: &str) -> Result<()> {
        self.field(&i.to_string(), tag)
    }

    fn write_long(&mut self, l: i64, tag: &str) -> Result<()> {
        self.field(&l.to_string(), tag)
    }

    fn write_float(&mut self, f: f32, tag: &str) -> Result<()> {
        self.field(&f.to_string(), tag)
    }

    fn write_double(&mut self, d: f64, tag: &str) -> Result<()> {
        self.field(&d.to_string(), tag)
    }

    fn write_string(&mut self, s: &str, tag: &str) -> Result<()> {
        self.field(&codec::csv_string(s), tag)
    }

    fn write_buffer(&mut self, buf: Option<&[u8]>, tag: &str) -> Result<()> {
        self.field(&codec::csv_buffer(buf), tag)
    }

    fn write_record(&mut self, r: &dyn Record, tag: &str) -> Result<()> {
        r.serialize(self, tag)
    }

    fn start_vector(&mut self, _len: usize, tag: &str) -> Result<()> {
        self.open_scope("v{", tag, Scope::Vector)
    }

    fn end_vector(&mut self, _tag: &str) -> Result<()> {
        self.close_scope()
    }

    fn start_map(&mut self, _len: usize, tag: &str) -> Result<()> {
        self.open_scope("m{", tag, Scope::Map)
    }

    fn end_map(&mut self, _tag: &str) -> Result<()> {
        self.close_scope()
    }
}
