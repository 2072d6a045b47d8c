#![allow(missing_docs)]

use std::collections::BTreeMap;

use recwire::records::NodeStat;
use recwire::{Record, Recwire};

// One field of every wire type the derive classifies, in one schema.
#[derive(Debug, Clone, Default, Record)]
struct Everything {
    flag: bool,
    count: i32,
    total: i64,
    ratio: f32,
    precise: f64,
    name: String,
    blob: Vec<u8>,
    opt_blob: Option<Vec<u8>>,
    tags: Vec<String>,
    stats: Vec<NodeStat>,
    attrs: BTreeMap<String, i64>,
}

fn sample() -> Everything {
    let mut attrs = BTreeMap::new();
    attrs.insert("size".to_string(), 9000);
    attrs.insert("ttl".to_string(), -3);
    Everything {
        flag: true,
        count: -7,
        total: 1 << 40,
        ratio: 0.5,
        precise: -2.25,
        name: "node/alpha".to_string(),
        blob: vec![0xde, 0xad],
        opt_blob: None,
        tags: vec!["hot".to_string(), "pinned".to_string()],
        stats: vec![
            NodeStat {
                version: 1,
                ..NodeStat::default()
            },
            NodeStat {
                version: 2,
                ..NodeStat::default()
            },
        ],
        attrs,
    }
}

// --- TESTS ---

#[test]
fn test_derived_signature_covers_all_wire_types() {
    assert_eq!(
        Everything::signature(),
        "LEverything(zilfdsBB[s][LNodeStat(lllliiiliil)]{sl})"
    );
}

#[test]
fn test_derived_roundtrip() -> recwire::Result<()> {
    let value = sample();
    let bytes = Recwire::to_vec(&value)?;
    let back: Everything = Recwire::from_slice(&bytes)?;

    assert!(value.record_equals(&back));
    assert_eq!(back.tags, vec!["hot", "pinned"]);
    assert_eq!(back.stats.len(), 2);
    assert_eq!(back.stats[1].version, 2);
    assert_eq!(back.attrs.get("size"), Some(&9000));
    // The nullable buffer comes back present-but-empty.
    assert_eq!(back.opt_blob, Some(Vec::new()));
    Ok(())
}

/// Collections encode as a 4-byte count followed by their elements inline,
/// with zero per-scope framing beyond the count.
#[test]
fn test_vector_wire_layout() -> recwire::Result<()> {
    #[derive(Debug, Clone, Default, Record)]
    struct Tags {
        tags: Vec<String>,
    }

    let rec = Tags {
        tags: vec!["ab".to_string(), "c".to_string()],
    };
    let bytes = Recwire::to_vec(&rec)?;

    // count 2, then "ab" and "c" length-prefixed.
    assert_eq!(
        bytes,
        [
            0, 0, 0, 2, // vector count
            0, 0, 0, 2, b'a', b'b', // "ab"
            0, 0, 0, 1, b'c', // "c"
        ]
    );
    Ok(())
}

/// Vector fields compare lexicographically elementwise, shorter first on a
/// shared prefix; map fields by key then value in key order.
#[test]
fn test_derived_collection_ordering() -> recwire::Result<()> {
    use std::cmp::Ordering;

    #[derive(Debug, Clone, Default, Record)]
    struct Tags {
        tags: Vec<String>,
    }

    let ab = Tags {
        tags: vec!["a".to_string(), "b".to_string()],
    };
    let ac = Tags {
        tags: vec!["a".to_string(), "c".to_string()],
    };
    let a = Tags {
        tags: vec!["a".to_string()],
    };

    assert_eq!(ab.compare_record(&ac)?, Ordering::Less);
    assert_eq!(a.compare_record(&ab)?, Ordering::Less);
    assert_eq!(ab.compare_record(&ab)?, Ordering::Equal);
    Ok(())
}

#[test]
fn test_derived_hash_consistency() {
    let a = sample();
    let mut b = sample();
    assert_eq!(a.record_hash(), b.record_hash());

    b.attrs.insert("extra".to_string(), 1);
    assert!(!a.record_equals(&b));
    assert_ne!(a.record_hash(), b.record_hash());
}

/// Field order is the wire order: two schemas with the same field types in a
/// different declared order produce different signatures.
#[test]
fn test_field_order_is_schema_order() {
    #[derive(Debug, Clone, Default, Record)]
    struct IntThenLong {
        a: i32,
        b: i64,
    }

    #[derive(Debug, Clone, Default, Record)]
    struct LongThenInt {
        b: i64,
        a: i32,
    }

    assert_eq!(IntThenLong::signature(), "LIntThenLong(il)");
    assert_eq!(LongThenInt::signature(), "LLongThenInt(li)");
}
