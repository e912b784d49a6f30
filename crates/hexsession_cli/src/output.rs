//! Result shaping: plain text for terminals, a JSON envelope for hosts.

use std::io::{self, Write};

use hexsession::EditError;
use serde::Serialize;
use serde_json::Value;

use crate::parse::InputError;

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub data: Value,
}

impl Outcome {
    pub fn new(lines: Vec<String>, data: Value) -> Self {
        Self { lines, data }
    }

    pub fn line(line: impl Into<String>, data: Value) -> Self {
        Self::new(vec![line.into()], data)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Envelope {
    pub error: bool,
    pub kind: Option<&'static str>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success(outcome: &Outcome) -> Self {
        Self {
            error: false,
            kind: None,
            message: None,
            data: Some(outcome.data.clone()),
        }
    }

    pub fn failure(error: &anyhow::Error) -> Self {
        Self {
            error: true,
            kind: Some(error_kind(error)),
            message: Some(format!("{error:#}")),
            data: None,
        }
    }
}

/// Names the first engine or input error in the chain.
pub fn error_kind(error: &anyhow::Error) -> &'static str {
    for cause in error.chain() {
        if let Some(edit) = cause.downcast_ref::<EditError>() {
            return edit.kind().as_str();
        }
        if cause.downcast_ref::<InputError>().is_some() {
            return "invalid_input";
        }
    }
    "error"
}

pub fn render(
    stdout: &mut impl Write,
    stderr: &mut impl Write,
    json: bool,
    result: &anyhow::Result<Outcome>,
) -> io::Result<()> {
    if json {
        let envelope = match result {
            Ok(outcome) => Envelope::success(outcome),
            Err(error) => Envelope::failure(error),
        };
        let encoded = serde_json::to_string(&envelope).map_err(io::Error::other)?;
        return writeln!(stdout, "{encoded}");
    }

    match result {
        Ok(outcome) => {
            for line in &outcome.lines {
                writeln!(stdout, "{line}")?;
            }
            Ok(())
        }
        Err(error) => writeln!(stderr, "error: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_kind, render, Envelope, Outcome};
    use anyhow::Context;
    use hexsession::EditError;
    use serde_json::json;

    #[test]
    fn kind_is_found_through_context() {
        let error = Err::<(), _>(EditError::OutOfRange {
            offset: 9,
            len: 2,
            size: 10,
        })
        .context("line 3")
        .expect_err("error");
        assert_eq!(error_kind(&error), "out_of_range");
        assert_eq!(error_kind(&anyhow::anyhow!("plain")), "error");
    }

    #[test]
    fn json_failure_envelope() {
        let error = anyhow::Error::new(EditError::InvalidOffset { offset: -1 });
        let mut out = Vec::new();
        let mut err = Vec::new();
        render(&mut out, &mut err, true, &Err(error)).expect("render");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(
            value,
            json!({ "error": true, "kind": "invalid_offset", "message": "invalid offset: -1" })
        );
        assert!(err.is_empty());
    }

    #[test]
    fn text_success_prints_lines() {
        let outcome = Outcome::new(vec!["a".into(), "b".into()], json!(null));
        let mut out = Vec::new();
        let mut err = Vec::new();
        render(&mut out, &mut err, false, &Ok(outcome.clone())).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "a\nb\n");
        assert_eq!(Envelope::success(&outcome).data, Some(json!(null)));
    }
}
