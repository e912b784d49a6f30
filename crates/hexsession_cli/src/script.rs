//! Line-oriented edit scripts run against one session, so undo and redo have
//! a history to work with.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! paste 0x32 FFFF
//! undo
//! redo
//! find FFFF 0
//! ```

use std::io::BufRead;

use anyhow::Context;
use hexsession::{Session, Storage};
use serde_json::{json, Value};

use crate::hexdump::format_page;
use crate::output::Outcome;
use crate::parse::{parse_hex_bytes, parse_offset, to_hex, InputError};

pub fn run_script<S: Storage>(
    session: &mut Session<S>,
    input: impl BufRead,
) -> anyhow::Result<Outcome> {
    let mut lines = Vec::new();
    let mut steps = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("reading script line {line_number}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let step = run_line(session, line_number, trimmed)
            .with_context(|| format!("line {line_number}: {trimmed}"))?;
        lines.extend(step.lines);
        steps.push(step.data);
    }

    lines.push(format!(
        "undo={} redo={} modified={}",
        session.undo_depth(),
        session.redo_depth(),
        session.is_modified()
    ));
    Ok(Outcome::new(
        lines,
        json!({
            "steps": steps,
            "undo_depth": session.undo_depth(),
            "redo_depth": session.redo_depth(),
            "modified": session.is_modified(),
        }),
    ))
}

fn run_line<S: Storage>(
    session: &mut Session<S>,
    line: usize,
    text: &str,
) -> anyhow::Result<Outcome> {
    let mut words = text.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let arg = |index: usize, expected: &'static str| {
        args.get(index)
            .copied()
            .ok_or_else(|| InputError::MissingArgument {
                line,
                command: command.to_string(),
                expected,
            })
    };

    let outcome = match command {
        "paste" | "write" | "buffered" => {
            let expected = "<offset> <hex>";
            let offset = parse_offset(arg(0, expected)?)?;
            arg(1, expected)?;
            let bytes = parse_hex_bytes(&args[1..].join(""))?;
            match command {
                "paste" => session.paste_bytes(offset, &bytes)?,
                "write" => session.write_bytes_with_backup(offset, &bytes)?,
                _ => session.write_bytes_buffered(offset, &bytes)?,
            }
            Outcome::line(
                format!("{command} {} byte(s) at {offset}", bytes.len()),
                json!({ "command": command, "offset": offset, "len": bytes.len() }),
            )
        }
        "byte" => {
            let offset = parse_offset(arg(0, "<offset> <hex-byte>")?)?;
            let bytes = parse_hex_bytes(arg(1, "<offset> <hex-byte>")?)?;
            let [value] = bytes[..] else {
                return Err(InputError::HexBytes(args[1].to_string()).into());
            };
            session.write_byte(offset, value)?;
            Outcome::line(
                format!("byte {value:02X} at {offset}"),
                json!({ "command": command, "offset": offset, "value": value }),
            )
        }
        "replace" => {
            let expected = "<offset> <old-hex> <new-hex>";
            let offset = parse_offset(arg(0, expected)?)?;
            let old = parse_hex_bytes(arg(1, expected)?)?;
            let new = parse_hex_bytes(arg(2, expected)?)?;
            session.replace(offset, &old, &new)?;
            Outcome::line(
                format!("replace {} byte(s) at {offset}", new.len()),
                json!({ "command": command, "offset": offset, "len": new.len() }),
            )
        }
        "undo" => {
            session.undo()?;
            Outcome::line("undo", json!({ "command": command }))
        }
        "redo" => {
            session.redo()?;
            Outcome::line("redo", json!({ "command": command }))
        }
        "select" => {
            let start = parse_offset(arg(0, "<start> <end>")?)?;
            let end = parse_offset(arg(1, "<start> <end>")?)?;
            session.set_selection(start, end)?;
            Outcome::line(
                format!("selected [{start}, {end})"),
                json!({ "command": command, "start": start, "end": end }),
            )
        }
        "copy" => {
            let bytes = session.copy_selection()?;
            Outcome::line(
                format!("copy {}", to_hex(&bytes)),
                json!({ "command": command, "bytes": to_hex(&bytes) }),
            )
        }
        "find" | "search" => {
            let pattern = parse_hex_bytes(arg(0, "<hex> [from]")?)?;
            let from = args.get(1).map(|value| parse_offset(value)).transpose()?.unwrap_or(0);
            let matches: Vec<u64> = if command == "find" {
                session.find_next(&pattern, from)?.into_iter().collect()
            } else {
                session.search(&pattern, from)?
            };
            Outcome::line(
                format!("{command} {matches:?}"),
                json!({ "command": command, "matches": matches }),
            )
        }
        "page" => {
            let page = arg(0, "<page>")?
                .parse::<usize>()
                .map_err(|_| InputError::Offset(args[0].to_string()))?;
            let data = session.load_page(page)?.to_vec();
            let base = (page as u64) * session.page_size() as u64;
            Outcome::new(
                format_page(base, &data),
                json!({ "command": command, "page": page, "bytes": to_hex(&data) }),
            )
        }
        "save" => {
            session.save();
            Outcome::line("saved", json!({ "command": command }))
        }
        _ => {
            return Err(InputError::UnknownCommand {
                line,
                command: command.to_string(),
            }
            .into())
        }
    };

    Ok(outcome)
}
