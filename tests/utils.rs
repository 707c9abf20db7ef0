use bytes::{Bytes, BytesMut};
use proptest::prelude::*;

use form_data_encoder::{chunk, create_boundary, escape_name, normalize_value, MAX_CHUNK_SIZE};

#[test]
fn boundary() {
    let boundary = create_boundary();

    assert_eq!(boundary.len(), 16);
    assert!(boundary
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
}

#[test]
fn escape() {
    assert_eq!(escape_name("name"), "name");
    assert_eq!(escape_name("\r"), "%0D");
    assert_eq!(escape_name("\n"), "%0A");
    assert_eq!(escape_name("\""), "%22");
    assert_eq!(escape_name("a\r\n\"b\"\r\n"), "a%0D%0A%22b%22%0D%0A");
    assert_eq!(escape_name("ünïcödé \"x\""), "ünïcödé %22x%22");
}

const EXPECTED: &str = "\r\nFirst line.\r\nSecond line.\r\nThird line.\r\n";

#[test]
fn normalize_cr() {
    assert_eq!(
        normalize_value("\rFirst line.\rSecond line.\rThird line.\r"),
        EXPECTED
    );
}

#[test]
fn normalize_lf() {
    assert_eq!(
        normalize_value("\nFirst line.\nSecond line.\nThird line.\n"),
        EXPECTED
    );
}

#[test]
fn normalize_mixed() {
    assert_eq!(
        normalize_value("\rFirst line.\nSecond line.\rThird line.\n"),
        EXPECTED
    );
    // adjacent breaks are looked up in the original value
    assert_eq!(normalize_value("\n\r"), "\r\n\r\n");
    assert_eq!(normalize_value("\r\r\n"), "\r\n\r\n");
    assert_eq!(normalize_value("\r\n\n"), "\r\n\r\n");
}

#[test]
fn normalize_keeps_crlf() {
    assert_eq!(normalize_value(EXPECTED), EXPECTED);
}

#[test]
fn chunk_small() {
    let value = Bytes::from(vec![1u8; MAX_CHUNK_SIZE]);
    let chunks = chunk(value.clone()).collect::<Vec<_>>();

    assert_eq!(chunks.len(), 1);
    // same buffer, not a copy
    assert_eq!(chunks[0].as_ptr(), value.as_ptr());

    let chunks = chunk(Bytes::new()).collect::<Vec<_>>();
    assert_eq!(chunks, [Bytes::new()]);
}

#[test]
fn chunk_evenly() {
    let chunks = chunk(Bytes::from(vec![0u8; MAX_CHUNK_SIZE * 2])).collect::<Vec<_>>();

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.len() == MAX_CHUNK_SIZE));
}

#[test]
fn chunk_last_is_smaller() {
    let expected = 256;
    let chunks = chunk(Bytes::from(vec![0u8; MAX_CHUNK_SIZE * 2 + expected]));

    assert_eq!(chunks.len(), 3);

    let chunks = chunks.collect::<Vec<_>>();
    assert_eq!(chunks[2].len(), expected);
    assert!(chunks[..2].iter().all(|c| c.len() == MAX_CHUNK_SIZE));
}

proptest! {
    #[test]
    fn escape_is_idempotent(s in any::<String>()) {
        let once = escape_name(&s).into_owned();
        prop_assert_eq!(escape_name(&once), once.as_str());
        prop_assert!(!once.contains(['\r', '\n', '"']));
    }

    #[test]
    fn normalize_is_idempotent(s in "[a-z\r\n]{0,64}") {
        let once = normalize_value(&s).into_owned();
        prop_assert_eq!(normalize_value(&once), once.as_str());

        let bytes = once.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            match b {
                b'\r' => prop_assert_eq!(bytes.get(i + 1), Some(&b'\n')),
                b'\n' => prop_assert!(i > 0 && bytes[i - 1] == b'\r'),
                _ => {}
            }
        }
    }

    #[test]
    fn chunk_round_trips(
        len in prop_oneof![
            Just(0usize),
            Just(MAX_CHUNK_SIZE),
            Just(MAX_CHUNK_SIZE + 1),
            Just(MAX_CHUNK_SIZE * 2),
            0..MAX_CHUNK_SIZE * 3,
        ]
    ) {
        let value = Bytes::from((0..len).map(|i| i as u8).collect::<Vec<_>>());
        let mut joined = BytesMut::new();

        for c in chunk(value.clone()) {
            prop_assert!(c.len() <= MAX_CHUNK_SIZE);
            joined.extend_from_slice(&c);
        }

        prop_assert_eq!(joined.freeze(), value);
    }
}
