//! Decoding of JSON payloads embedded in inline `<script>` blocks.
//!
//! Pages assign every dataset to a script variable as an escaped string
//! literal handed to `JSON.parse`:
//!
//! ```text
//! var shotsData = JSON.parse('[{\x22id\x22:\x22312\x22,\x22X\x22:\x220.84\x22}]');
//! ```
//!
//! [`extract`] finds the first such assignment for a key, undoes the
//! JavaScript string escaping and decodes the result into a [`Dataset`].

use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ExtractionError;
use crate::types::{Dataset, Row};

const JSON_PARSE_CALL: &str = "JSON.parse(";

/// Extracts the dataset assigned to `key` in `page`.
///
/// A top-level JSON array yields one row per element; a top-level object is
/// returned as a single row. An empty array is a valid, empty dataset.
///
/// # Errors
///
/// - [`ExtractionError::VariableNotFound`] if `key` is never assigned.
/// - [`ExtractionError::MalformedLiteral`] if the assigned value is not a
///   well-formed quoted string literal.
/// - [`ExtractionError::InvalidJson`] if the literal's contents are not JSON,
///   or not an object/array of objects.
pub fn extract(page: &str, key: &str) -> Result<Dataset, ExtractionError> {
    let (literal_start, quote) = find_literal(page, key)?;
    let json_text = unescape_literal(page, literal_start, quote, key)?;
    decode_rows(&json_text, key)
}

/// A bare identifier followed by `=`. The leftmost match always starts at
/// the first character of the identifier.
static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][A-Za-z0-9_$]*)\s*=").expect("valid regex"));

/// Returns the offset and quote character of the string literal assigned to
/// `key` by the first assignment whose value is a quoted literal.
///
/// `key` must stand alone as an identifier: `oldshotsData = ...` is not an
/// assignment to `shotsData`, and `shotsData == x` is not an assignment at all.
/// Assignments of other values, such as `shotsData = [];`, are skipped.
fn find_literal(page: &str, key: &str) -> Result<(usize, char), ExtractionError> {
    let mut first_unquoted = None;

    for caps in ASSIGNMENT_RE.captures_iter(page) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if name.as_str() != key || page[whole.end()..].starts_with('=') {
            continue;
        }

        let mut pos = skip_whitespace(page, whole.end());
        if page[pos..].starts_with(JSON_PARSE_CALL) {
            pos = skip_whitespace(page, pos + JSON_PARSE_CALL.len());
        }
        match page[pos..].chars().next() {
            Some(quote @ ('\'' | '"')) => return Ok((pos, quote)),
            _ => {
                first_unquoted.get_or_insert(pos);
            }
        }
    }

    Err(match first_unquoted {
        Some(offset) => ExtractionError::MalformedLiteral {
            key: key.to_owned(),
            offset,
            reason: "expected a quoted string literal".to_owned(),
        },
        None => ExtractionError::VariableNotFound {
            key: key.to_owned(),
        },
    })
}

/// Reads the literal opened by `quote` at `start` and returns its unescaped
/// contents.
fn unescape_literal(
    page: &str,
    start: usize,
    quote: char,
    key: &str,
) -> Result<String, ExtractionError> {
    let malformed = |offset: usize, reason: &str| ExtractionError::MalformedLiteral {
        key: key.to_owned(),
        offset,
        reason: reason.to_owned(),
    };

    let body_start = start + quote.len_utf8();
    let mut out = String::new();
    let mut chars = page[body_start..].char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let offset = body_start + i;
        match c {
            '\\' => decode_escape(&mut chars, &mut out).map_err(|reason| malformed(offset, reason))?,
            '\n' | '\r' => return Err(malformed(offset, "line break inside string literal")),
            c if c == quote => return Ok(out),
            c => out.push(c),
        }
    }

    Err(malformed(start, "unterminated string literal"))
}

fn skip_whitespace(s: &str, from: usize) -> usize {
    s[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(s.len(), |(i, _)| from + i)
}

/// Decodes one escape sequence; the leading backslash is already consumed.
fn decode_escape(
    chars: &mut Peekable<CharIndices<'_>>,
    out: &mut String,
) -> Result<(), &'static str> {
    let Some((_, c)) = chars.next() else {
        return Err("dangling backslash");
    };

    match c {
        'x' => {
            let code = read_hex(chars, 2).ok_or("\\x escape needs two hex digits")?;
            out.push(char::from_u32(code).ok_or("invalid \\x escape")?);
        }
        'u' => {
            let unit = read_hex(chars, 4).ok_or("\\u escape needs four hex digits")?;
            out.push(decode_utf16_unit(chars, unit)?);
        }
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'v' => out.push('\u{b}'),
        '0' => out.push('\0'),
        // Line continuation.
        '\n' => {}
        '\r' => {
            chars.next_if(|&(_, c)| c == '\n');
        }
        // `\'`, `\"`, `\\`, `\/` and any other non-special character.
        other => out.push(other),
    }
    Ok(())
}

/// Turns a `\u` code unit into a char, consuming the low half of a surrogate
/// pair when `unit` is a high surrogate.
fn decode_utf16_unit(chars: &mut Peekable<CharIndices<'_>>, unit: u32) -> Result<char, &'static str> {
    const UNPAIRED: &str = "unpaired UTF-16 surrogate in \\u escape";

    if !(0xD800..0xDC00).contains(&unit) {
        return char::from_u32(unit).ok_or(UNPAIRED);
    }

    if chars.next_if(|&(_, c)| c == '\\').is_none() || chars.next_if(|&(_, c)| c == 'u').is_none() {
        return Err(UNPAIRED);
    }
    let low = read_hex(chars, 4).ok_or("\\u escape needs four hex digits")?;
    if !(0xDC00..0xE000).contains(&low) {
        return Err(UNPAIRED);
    }
    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)).ok_or(UNPAIRED)
}

fn read_hex(chars: &mut Peekable<CharIndices<'_>>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    Some(value)
}

fn decode_rows(json_text: &str, key: &str) -> Result<Dataset, ExtractionError> {
    let invalid = |source: serde_json::Error| ExtractionError::InvalidJson {
        key: key.to_owned(),
        source,
    };

    match serde_json::from_str::<Value>(json_text).map_err(invalid)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(row) => Ok(row),
                other => Err(invalid(shape_error(&format!(
                    "element {i} is {}, expected an object",
                    kind(&other)
                )))),
            })
            .collect::<Result<Vec<Row>, _>>()
            .map(Dataset::new),
        Value::Object(row) => Ok(Dataset::new(vec![row])),
        other => Err(invalid(shape_error(&format!(
            "top-level value is {}, expected an array or object",
            kind(&other)
        )))),
    }
}

fn shape_error(msg: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(msg)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
