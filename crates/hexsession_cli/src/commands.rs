use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hexsession::{EngineConfig, Session};
use scratch_store::ScratchDir;
use serde_json::json;

use crate::hexdump::format_page;
use crate::output::Outcome;
use crate::parse::{parse_hex_bytes, parse_offset, to_hex};
use crate::script::run_script;

#[derive(Debug, Parser)]
#[command(name = "hexsession", version, about = "Byte-level editing of binary files")]
pub struct Cli {
    /// Print results as a JSON envelope.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show store size and page count.
    Info { path: PathBuf },
    /// Hex dump one page.
    Page { path: PathBuf, page: usize },
    /// List every offset where the hex pattern occurs.
    Search {
        path: PathBuf,
        pattern: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        from: String,
        /// Stop at the first match.
        #[arg(long)]
        first: bool,
    },
    /// Overwrite bytes in place, restoring the old bytes if the write fails.
    Write {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        offset: String,
        bytes: String,
    },
    /// Print the bytes in `[start, end)`.
    Copy {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        start: String,
        #[arg(allow_hyphen_values = true)]
        end: String,
    },
    /// Copy a file into the scratch directory and print the working copy path.
    Import {
        source: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Run edit commands from stdin against one session.
    Script { path: PathBuf },
}

pub fn execute(
    command: &Command,
    config: EngineConfig,
    stdin: &mut dyn BufRead,
) -> anyhow::Result<Outcome> {
    match command {
        Command::Info { path } => {
            let session = Session::open_with_config(path, config)?;
            Ok(Outcome::line(
                format!(
                    "{}: {} bytes, {} page(s) of {}",
                    session.path().display(),
                    session.size(),
                    session.page_count(),
                    session.page_size()
                ),
                json!({
                    "path": session.path(),
                    "size": session.size(),
                    "page_size": session.page_size(),
                    "pages": session.page_count(),
                }),
            ))
        }
        Command::Page { path, page } => {
            let mut session = Session::open_with_config(path, config)?;
            let data = session.load_page(*page)?.to_vec();
            let base = (*page as u64) * session.page_size() as u64;
            Ok(Outcome::new(
                format_page(base, &data),
                json!({ "page": page, "offset": base, "bytes": to_hex(&data) }),
            ))
        }
        Command::Search {
            path,
            pattern,
            from,
            first,
        } => {
            let session = Session::open_with_config(path, config)?;
            let pattern = parse_hex_bytes(pattern)?;
            let from = parse_offset(from)?;
            let matches: Vec<u64> = if *first {
                session.find_next(&pattern, from)?.into_iter().collect()
            } else {
                session.search(&pattern, from)?
            };
            let lines = if matches.is_empty() {
                vec!["no matches".to_string()]
            } else {
                matches.iter().map(|offset| format!("0x{offset:08X}")).collect()
            };
            Ok(Outcome::new(lines, json!({ "matches": matches })))
        }
        Command::Write {
            path,
            offset,
            bytes,
        } => {
            let mut session = Session::open_with_config(path, config)?;
            let offset = parse_offset(offset)?;
            let bytes = parse_hex_bytes(bytes)?;
            session.write_bytes_with_backup(offset, &bytes)?;
            Ok(Outcome::line(
                format!("wrote {} byte(s) at {offset}", bytes.len()),
                json!({ "offset": offset, "len": bytes.len() }),
            ))
        }
        Command::Copy { path, start, end } => {
            let mut session = Session::open_with_config(path, config)?;
            session.set_selection(parse_offset(start)?, parse_offset(end)?)?;
            let bytes = session.copy_selection()?;
            Ok(Outcome::line(to_hex(&bytes), json!({ "bytes": to_hex(&bytes) })))
        }
        Command::Import { source, name } => {
            let data = std::fs::read(source)
                .with_context(|| format!("reading {}", source.display()))?;
            let name = name.clone().unwrap_or_else(|| {
                source
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let session = Session::import(Arc::new(ScratchDir::from_env()), &name, &data, config)?;
            Ok(Outcome::line(
                session.path().display().to_string(),
                json!({ "path": session.path(), "size": session.size() }),
            ))
        }
        Command::Script { path } => {
            let mut session = Session::open_with_config(path, config)?;
            run_script(&mut session, stdin)
        }
    }
}
