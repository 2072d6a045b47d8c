#![allow(missing_docs)]

use std::any::Any;
use std::cmp::Ordering;

use recwire::records::{FetchResponse, NodeStat};
use recwire::{
    InputArchive, OutputArchive, Record, Recwire, RecwireError, RENDER_ERROR_SENTINEL,
};

// --- TESTS ---

/// The text archive renders ordered `tag=value` tokens, with nested records
/// bracketed as `tag=s{...}` and a trailing newline for the top level.
#[test]
fn test_debug_rendering_format() {
    let resp = FetchResponse::new(Some(vec![0x01, 0x02, 0x03]), NodeStat::default());

    let text = Recwire::debug_string(&resp);
    assert_eq!(
        text,
        "data=#010203,stat=s{create_txn=0,modify_txn=0,create_time=0,modify_time=0,\
         version=0,child_version=0,acl_version=0,owner_session=0,data_length=0,\
         num_children=0,child_txn=0}\n"
    );

    // Display is the same rendering without the trailing newline.
    assert_eq!(format!("{resp}"), text.trim_end_matches('\n'));
}

#[test]
fn test_null_buffer_renders_as_bare_hash() {
    let resp = FetchResponse::new(None, NodeStat::default());
    let text = Recwire::debug_string(&resp);
    assert!(text.starts_with("data=#,"), "{text}");
}

/// Separators, braces and percent signs in strings are escaped so a token
/// never breaks field framing; the leading `'` marks the token as a string.
#[test]
fn test_string_escaping() {
    #[derive(Debug, Clone, Default, Record)]
    struct Named {
        name: String,
    }

    let rec = Named {
        name: "a,b{c}%\r\n".to_string(),
    };
    assert_eq!(
        Recwire::debug_string(&rec),
        "name='a%2Cb%7Bc%7D%25%0D%0A\n"
    );
}

#[test]
fn test_vector_and_map_rendering() {
    #[derive(Debug, Clone, Default, Record)]
    struct Inventory {
        names: Vec<String>,
        counts: std::collections::BTreeMap<String, i64>,
    }

    let mut rec = Inventory {
        names: vec!["ab".to_string(), "cd".to_string()],
        counts: std::collections::BTreeMap::new(),
    };
    rec.counts.insert("x".to_string(), 2);

    assert_eq!(
        Recwire::debug_string(&rec),
        "names=v{'ab,'cd},counts=m{'x,2}\n"
    );
}

/// A record that fails mid-render. `debug_string` must swallow the failure
/// and return the fixed sentinel: it is called from logging paths and may
/// never propagate.
#[derive(Debug, Default)]
struct Broken;

impl Record for Broken {
    fn serialize(&self, archive: &mut dyn OutputArchive, tag: &str) -> recwire::Result<()> {
        archive.start_record(tag)?;
        archive.write_int(1, "before")?;
        Err(RecwireError::Format("simulated malformed state".to_string()))
    }

    fn deserialize(&mut self, _archive: &mut dyn InputArchive, _tag: &str) -> recwire::Result<()> {
        Ok(())
    }

    fn compare_record(&self, _peer: &dyn Record) -> recwire::Result<Ordering> {
        Ok(Ordering::Equal)
    }

    fn record_equals(&self, peer: &dyn Record) -> bool {
        peer.as_any().downcast_ref::<Self>().is_some()
    }

    fn record_hash(&self) -> i32 {
        recwire::codec::HASH_SEED
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn signature() -> String {
        "LBroken()".to_string()
    }
}

#[test]
fn test_debug_rendering_never_fails() {
    let rec = Broken;
    assert_eq!(Recwire::debug_string(&rec), RENDER_ERROR_SENTINEL);
}
