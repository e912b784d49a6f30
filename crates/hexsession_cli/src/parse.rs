use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid offset '{0}': expected decimal or 0x-prefixed hex")]
    Offset(String),

    #[error("invalid hex byte string '{0}'")]
    HexBytes(String),

    #[error("hex byte string '{0}' has an odd number of digits")]
    OddHexDigits(String),

    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        line: usize,
        command: String,
        expected: &'static str,
    },
}

/// Parses `1024`, `0x400` or `-3`. Negative values are passed through so the
/// engine can reject them.
pub fn parse_offset(input: &str) -> Result<i64, InputError> {
    let s = input.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        digits.parse::<i64>()
    }
    .map_err(|_| InputError::Offset(input.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses `DEADBEEF`, `de ad be ef` or `de:ad:be:ef`.
pub fn parse_hex_bytes(input: &str) -> Result<Vec<u8>, InputError> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InputError::HexBytes(input.to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(InputError::OddHexDigits(input.to_string()));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| InputError::HexBytes(input.to_string()))
        })
        .collect()
}

#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
