#![allow(missing_docs)]

use recwire::records::{FetchResponse, NodeStat};
use recwire::{Record, Recwire, RecwireError};

fn sample_stat() -> NodeStat {
    NodeStat {
        create_txn: 0x1122334455667788,
        modify_txn: 0x0102030405060708,
        create_time: 1_693_000_000_000,
        modify_time: 1_693_000_123_456,
        version: 7,
        child_version: 3,
        acl_version: 1,
        owner_session: -1,
        data_length: 3,
        num_children: 42,
        child_txn: 99,
    }
}

// --- TESTS ---

/// A minimal response: payload [1,2,3] plus an all-zero stat. The encoding
/// is the 4-byte length prefix, the 3 payload bytes, and the 68 fixed-width
/// bytes of the nested record (4+3+68 = 75). Nesting adds zero overhead.
#[test]
fn test_minimal_response_layout() -> recwire::Result<()> {
    let resp = FetchResponse::new(Some(vec![0x01, 0x02, 0x03]), NodeStat::default());

    let bytes = Recwire::to_vec(&resp)?;
    assert_eq!(bytes.len(), 4 + 3 + 68);

    // Big-endian length prefix, then the raw payload.
    assert_eq!(&bytes[0..7], &[0, 0, 0, 3, 1, 2, 3]);
    // All-zero stat fields emit inline with no framing.
    assert!(bytes[7..].iter().all(|b| *b == 0));

    let back: FetchResponse = Recwire::from_slice(&bytes)?;
    assert!(resp.record_equals(&back));
    assert_eq!(back.data.as_deref(), Some(&[1u8, 2, 3][..]));
    Ok(())
}

#[test]
fn test_full_value_roundtrip() -> recwire::Result<()> {
    let resp = FetchResponse::new(Some(b"opaque payload".to_vec()), sample_stat());

    let bytes = Recwire::to_vec(&resp)?;
    let back: FetchResponse = Recwire::from_slice(&bytes)?;

    assert!(resp.record_equals(&back));
    assert_eq!(back.stat.create_txn, 0x1122334455667788);
    assert_eq!(back.stat.owner_session, -1);
    assert_eq!(back.stat.num_children, 42);
    Ok(())
}

/// Null and empty buffers are wire-identical: length 0, no null marker.
/// Documented limitation, not a bug to fix.
#[test]
fn test_null_and_empty_buffer_encode_identically() -> recwire::Result<()> {
    let null_resp = FetchResponse::new(None, sample_stat());
    let empty_resp = FetchResponse::new(Some(Vec::new()), sample_stat());

    let null_bytes = Recwire::to_vec(&null_resp)?;
    let empty_bytes = Recwire::to_vec(&empty_resp)?;
    assert_eq!(null_bytes, empty_bytes);

    // Decoding always yields a present (empty) buffer, and the value domain
    // treats null as empty, so the round trip still closes under equals.
    let back: FetchResponse = Recwire::from_slice(&null_bytes)?;
    assert_eq!(back.data, Some(Vec::new()));
    assert!(null_resp.record_equals(&back));
    assert!(empty_resp.record_equals(&back));
    Ok(())
}

#[test]
fn test_truncated_input_is_io_error() -> recwire::Result<()> {
    let resp = FetchResponse::new(Some(vec![9; 16]), sample_stat());
    let bytes = Recwire::to_vec(&resp)?;

    for cut in [0, 3, 10, bytes.len() - 1] {
        let err = Recwire::from_slice::<FetchResponse>(&bytes[..cut])
            .expect_err("truncated input must fail");
        assert!(matches!(err, RecwireError::Io(_)), "cut={cut}: {err}");
    }
    Ok(())
}

#[test]
fn test_negative_length_prefix_is_format_error() {
    // -1 as a buffer length.
    let bytes = [0xff, 0xff, 0xff, 0xff];
    let err = Recwire::from_slice::<FetchResponse>(&bytes).expect_err("must fail");
    assert!(matches!(err, RecwireError::Format(_)), "{err}");
}

#[test]
fn test_unreasonable_length_prefix_is_format_error() {
    // 512 MiB buffer claim followed by nothing.
    let bytes = [0x20, 0x00, 0x00, 0x00];
    let err = Recwire::from_slice::<FetchResponse>(&bytes).expect_err("must fail");
    assert!(matches!(err, RecwireError::Format(_)), "{err}");
}

/// The 1 MiB length cap is enforced on encode too: a writer must never
/// produce a stream its own reader rejects.
#[test]
fn test_oversized_buffer_rejected_on_encode() -> recwire::Result<()> {
    // A payload at the cap encodes and decodes cleanly.
    let at_cap = FetchResponse::new(Some(vec![0xab; 1 << 20]), NodeStat::default());
    let bytes = Recwire::to_vec(&at_cap)?;
    let back: FetchResponse = Recwire::from_slice(&bytes)?;
    assert!(at_cap.record_equals(&back));

    // One byte over fails with a format error before any bytes go out.
    let over_cap = FetchResponse::new(Some(vec![0xab; (1 << 20) + 1]), NodeStat::default());
    let err = Recwire::to_vec(&over_cap).expect_err("oversized payload must fail to encode");
    assert!(matches!(err, RecwireError::Format(_)), "{err}");

    // Well over the cap (2 MiB) fails the same way, rather than encoding a
    // stream that `from_slice` would then refuse.
    let large = FetchResponse::new(Some(vec![0xab; 2 << 20]), NodeStat::default());
    let err = Recwire::to_vec(&large).expect_err("oversized payload must fail to encode");
    assert!(matches!(err, RecwireError::Format(_)), "{err}");
    Ok(())
}

/// Encoding through `write_to` into a caller-supplied sink matches `to_vec`.
#[test]
fn test_write_to_matches_to_vec() -> recwire::Result<()> {
    let resp = FetchResponse::new(Some(vec![1, 2, 3]), sample_stat());

    let mut sink = Vec::new();
    Recwire::write_to(&mut sink, &resp)?;
    assert_eq!(sink, Recwire::to_vec(&resp)?);

    let back: FetchResponse = Recwire::read_from(sink.as_slice())?;
    assert!(resp.record_equals(&back));
    Ok(())
}

#[test]
fn test_signature_strings() {
    assert_eq!(NodeStat::signature(), "LNodeStat(lllliiiliil)");
    assert_eq!(
        FetchResponse::signature(),
        "LFetchResponse(BLNodeStat(lllliiiliil))"
    );
}
