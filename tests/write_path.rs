mod support;

use assert_matches::assert_matches;
use hexsession::{EditError, EngineConfig, Session};
use pretty_assertions::assert_eq;

use support::{on_disk, open_zeroed, open_zeroed_with, write_store};

#[test]
fn open_records_size_and_starts_clean() {
    let (_dir, path) = write_store(&[1, 2, 3, 4, 5]);
    let session = Session::open(&path).expect("open");

    assert_eq!(session.size(), 5);
    assert_eq!(session.path(), path.as_path());
    assert!(!session.is_modified());
    assert_eq!(session.undo_depth(), 0);
    assert_eq!(session.redo_depth(), 0);
}

#[test]
fn open_missing_store_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = Session::open(dir.path().join("nope.bin")).expect_err("missing store");
    assert_matches!(error, EditError::Io { .. });
}

#[test]
fn written_range_reads_back_exactly() {
    let (_dir, path, mut session) = open_zeroed(64);

    session.write_bytes(10, b"hello").expect("write");

    assert_eq!(session.read_range(10, 5).expect("read"), b"hello".to_vec());
    assert_eq!(&on_disk(&path)[10..15], b"hello");
    assert!(session.is_modified());
}

#[test]
fn write_at_exact_end_is_allowed() {
    let (_dir, path, mut session) = open_zeroed(8);
    session.write_bytes(6, &[1, 2]).expect("write touching end");
    assert_eq!(on_disk(&path), vec![0, 0, 0, 0, 0, 0, 1, 2]);
}

#[test]
fn write_past_end_is_out_of_range_and_store_does_not_grow() {
    let (_dir, path, mut session) = open_zeroed(8);

    let error = session.write_bytes(7, &[1, 2]).expect_err("past end");

    assert_matches!(
        error,
        EditError::OutOfRange {
            offset: 7,
            len: 2,
            size: 8
        }
    );
    assert_eq!(on_disk(&path).len(), 8);
    assert!(!session.is_modified());
}

#[test]
fn negative_offset_is_invalid() {
    let (_dir, _path, mut session) = open_zeroed(8);
    assert_matches!(
        session.write_bytes(-1, &[1]),
        Err(EditError::InvalidOffset { offset: -1 })
    );
    assert_matches!(
        session.write_bytes_with_backup(-3, &[1]),
        Err(EditError::InvalidOffset { offset: -3 })
    );
    assert_matches!(
        session.paste_bytes(-3, &[1]),
        Err(EditError::InvalidOffset { .. })
    );
}

#[test]
fn empty_write_is_noop_even_past_end() {
    let (_dir, path, mut session) = open_zeroed(4);
    session.write_bytes(100, &[]).expect("empty write");
    assert_eq!(on_disk(&path), vec![0; 4]);
    assert!(!session.is_modified());
}

#[test]
fn write_refreshes_cached_page() {
    let (_dir, _path, mut session) = open_zeroed_with(32, EngineConfig::default().with_page_size(8));
    session.load_page(1).expect("load page 1");

    session.write_bytes(6, &[1, 2, 3, 4]).expect("write across page start");
    assert_eq!(session.page_buffer(), &[3, 4, 0, 0, 0, 0, 0, 0]);

    session.write_bytes(0, &[9]).expect("write outside page");
    assert_eq!(session.page_buffer(), &[3, 4, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn write_byte_refreshes_page_and_marks_modified() {
    let (_dir, path, mut session) = open_zeroed_with(16, EngineConfig::default().with_page_size(8));
    session.load_page(0).expect("load page");

    session.write_byte(3, 0x7F).expect("write byte");

    assert_eq!(session.page_buffer()[3], 0x7F);
    assert_eq!(on_disk(&path)[3], 0x7F);
    assert!(session.is_modified());
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn write_byte_is_not_checked_against_recorded_size() {
    let (_dir, path, mut session) = open_zeroed(2);

    session.write_byte(3, 0xAB).expect("unchecked write");

    assert_eq!(on_disk(&path), vec![0, 0, 0, 0xAB]);
    assert_eq!(session.size(), 2);
    assert!(session.is_modified());
}

#[test]
fn buffered_write_matches_single_write() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

    let (_dir_a, path_a, mut chunked) =
        open_zeroed_with(12_000, EngineConfig::default().with_write_chunk_size(4096));
    chunked.write_bytes_buffered(1000, &data).expect("buffered write");

    let (_dir_b, path_b, mut single) = open_zeroed(12_000);
    single.write_bytes(1000, &data).expect("single write");

    assert_eq!(on_disk(&path_a), on_disk(&path_b));
}

#[test]
fn buffered_write_past_end_keeps_earlier_chunks() {
    let (_dir, path, mut session) = open_zeroed_with(10, EngineConfig::default().with_write_chunk_size(4));

    let error = session
        .write_bytes_buffered(0, &[1; 12])
        .expect_err("third chunk is out of range");

    assert_matches!(error, EditError::OutOfRange { offset: 8, len: 4, .. });
    assert_eq!(on_disk(&path), vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
}

#[test]
fn backup_write_logs_operation_with_previous_bytes() {
    let (_dir, path) = write_store(&[1, 2, 3, 4]);
    let mut session = Session::open(&path).expect("open");

    session.write_bytes_with_backup(1, &[9, 9]).expect("write");

    let operation = &session.history().undo_stack()[0];
    assert_eq!(operation.offset(), 1);
    assert_eq!(operation.old_data(), &[2, 3]);
    assert_eq!(operation.new_data(), &[9, 9]);
}

#[test]
fn backup_write_out_of_range_leaves_store_and_log_untouched() {
    let (_dir, path, mut session) = open_zeroed(4);
    assert_matches!(
        session.write_bytes_with_backup(3, &[1, 1]),
        Err(EditError::OutOfRange { .. })
    );
    assert_eq!(on_disk(&path), vec![0; 4]);
    assert!(!session.can_undo());
}

#[test]
fn save_clears_dirty_flag_without_touching_store() {
    let (_dir, path, mut session) = open_zeroed(4);
    session.paste_bytes(0, &[5]).expect("paste");
    session.save();
    assert!(!session.is_modified());
    assert_eq!(on_disk(&path), vec![5, 0, 0, 0]);
    assert!(session.can_undo());
}
