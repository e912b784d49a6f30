mod support;

use assert_matches::assert_matches;
use hexsession::{EditError, EngineConfig, Session};
use pretty_assertions::assert_eq;

use support::write_store;

const MARKER: &[u8] = b"\xDE\xAD\xBE\xEF";

fn store_with(len: usize, placements: &[(usize, &[u8])]) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    for (offset, pattern) in placements {
        bytes[*offset..*offset + pattern.len()].copy_from_slice(pattern);
    }
    bytes
}

#[test]
fn finds_every_occurrence_in_order() {
    let (_dir, path) = write_store(&store_with(64, &[(10, &b"PAT"[..]), (25, &b"PAT"[..])]));
    let session = Session::open_with_config(
        &path,
        EngineConfig::default().with_search_buffer_size(35),
    )
    .expect("open");

    assert_eq!(session.search(b"PAT", 0).expect("search"), vec![10, 25]);
}

#[test]
fn finds_matches_spanning_read_windows() {
    let (_dir, path) = write_store(&store_with(10_000, &[(4094, MARKER), (9000, MARKER)]));
    let session = Session::open(&path).expect("open");

    assert_eq!(
        session.search(MARKER, 0).expect("search"),
        vec![4094, 9000]
    );
}

#[test]
fn windowed_mode_reproduces_boundary_gap() {
    let (_dir, path) = write_store(&store_with(10_000, &[(4094, MARKER), (9000, MARKER)]));
    let session = Session::open_with_config(
        &path,
        EngineConfig::default().with_search_carry_over(false),
    )
    .expect("open");

    assert_eq!(session.search(MARKER, 0).expect("search"), vec![9000]);
}

#[test]
fn find_next_returns_first_match_or_none() {
    let (_dir, path) = write_store(&store_with(128, &[(40, &b"xy"[..]), (90, &b"xy"[..])]));
    let session = Session::open(&path).expect("open");

    assert_eq!(session.find_next(b"xy", 0).expect("find"), Some(40));
    assert_eq!(session.find_next(b"xy", 41).expect("find"), Some(90));
    assert_eq!(session.find_next(b"xy", 91).expect("find"), None);
}

#[test]
fn search_sees_committed_writes() {
    let (_dir, path) = write_store(&[0u8; 32]);
    let mut session = Session::open(&path).expect("open");
    session.paste_bytes(12, &b"abc"[..]).expect("paste");

    assert_eq!(session.search(b"abc", 0).expect("search"), vec![12]);
    session.undo().expect("undo");
    assert!(session.search(b"abc", 0).expect("search").is_empty());
}

#[test]
fn negative_start_is_invalid() {
    let (_dir, path) = write_store(&[0u8; 8]);
    let session = Session::open(&path).expect("open");
    assert_matches!(
        session.search(b"a", -5),
        Err(EditError::InvalidOffset { offset: -5 })
    );
    assert_matches!(session.find_next(b"a", -1), Err(EditError::InvalidOffset { .. }));
}
