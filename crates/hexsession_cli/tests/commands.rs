use std::io::Cursor;
use std::path::PathBuf;

use assert_matches::assert_matches;
use clap::Parser;
use hexsession::{EditError, EngineConfig};
use hexsession_cli::{error_kind, execute, Cli, Command};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn store(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blob.bin");
    std::fs::write(&path, bytes).expect("seed store");
    (dir, path)
}

fn run(args: &[&str], stdin: &str) -> anyhow::Result<hexsession_cli::Outcome> {
    let cli = Cli::try_parse_from(args).expect("arguments parse");
    execute(
        &cli.command,
        EngineConfig::default().with_page_size(16),
        &mut Cursor::new(stdin.as_bytes().to_vec()),
    )
}

#[test]
fn parses_global_json_flag_and_negative_offsets() {
    let cli = Cli::try_parse_from(["hexsession", "write", "f.bin", "-1", "00", "--json"])
        .expect("arguments parse");
    assert!(cli.json);
    assert_matches!(cli.command, Command::Write { ref offset, .. } if offset == "-1");
}

#[test]
fn info_reports_size_and_pages() {
    let (_dir, path) = store(&[0u8; 40]);
    let outcome = run(&["hexsession", "info", path.to_str().expect("utf8")], "").expect("info");
    assert_eq!(outcome.data["size"], 40);
    assert_eq!(outcome.data["pages"], 3);
}

#[test]
fn write_then_search_and_copy() {
    let (_dir, path) = store(&[0u8; 64]);
    let path_arg = path.to_str().expect("utf8");

    run(&["hexsession", "write", path_arg, "0x20", "CAFEBABE"], "").expect("write");
    assert_eq!(&std::fs::read(&path).expect("read")[0x20..0x24], &[0xCA, 0xFE, 0xBA, 0xBE]);

    let found = run(&["hexsession", "search", path_arg, "FEBA"], "").expect("search");
    assert_eq!(found.data, json!({ "matches": [33] }));

    let copied = run(&["hexsession", "copy", path_arg, "32", "34"], "").expect("copy");
    assert_eq!(copied.lines, vec!["CA FE".to_string()]);
}

#[test]
fn page_dump_uses_absolute_offsets() {
    let bytes: Vec<u8> = (0u8..32).collect();
    let (_dir, path) = store(&bytes);
    let outcome = run(&["hexsession", "page", path.to_str().expect("utf8"), "1"], "").expect("page");
    assert_eq!(outcome.lines.len(), 1);
    assert!(outcome.lines[0].starts_with("00000010  10 11 12"));
}

#[test]
fn out_of_range_write_keeps_engine_error_kind() {
    let (_dir, path) = store(&[0u8; 4]);
    let error = run(&["hexsession", "write", path.to_str().expect("utf8"), "3", "0102"], "")
        .expect_err("out of range");
    assert_eq!(error_kind(&error), "out_of_range");
    assert_matches!(error.downcast_ref::<EditError>(), Some(EditError::OutOfRange { .. }));
}

#[test]
fn script_runs_in_one_session() {
    let (_dir, path) = store(&[0u8; 100]);
    let outcome = run(
        &["hexsession", "script", path.to_str().expect("utf8")],
        "paste 50 FFFF\nundo\nredo\nundo\n",
    )
    .expect("script");

    assert_eq!(&std::fs::read(&path).expect("read")[50..52], &[0, 0]);
    assert_eq!(outcome.data["redo_depth"], 1);
}
