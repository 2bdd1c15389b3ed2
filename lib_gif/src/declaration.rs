//! Locating and regenerating the embedded byte-array declaration in a
//! generated source file. Only the array body between the braces is
//! ever rewritten; all surrounding text is preserved byte-for-byte.

use crate::constants::ARRAY_MARKER;
use log::{debug, error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeclarationError {
    #[error("Array marker {0:?} not found in source text")]
    MarkerNotFound(&'static str),
    #[error("Opening brace not found after the array marker")]
    OpenBraceNotFound,
    #[error("Braces after the array marker never balance")]
    UnbalancedBrace,
}

/// Byte offsets of the array body: `open` is the `{`, `close` the
/// matching `}`. Both index into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySpan {
    pub open: usize,
    pub close: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingOpenBrace,
    InsideArray { depth: usize },
    Done { close: usize },
}

/// Finds the declaration span by textual marker, never by position.
/// Brace depth is tracked conservatively even though nested braces do
/// not occur in this format.
pub fn find_array_span(source: &str) -> Result<ArraySpan, DeclarationError> {
    let marker_at = source.find(ARRAY_MARKER).ok_or_else(|| {
        error!("Marker {:?} not found", ARRAY_MARKER);
        DeclarationError::MarkerNotFound(ARRAY_MARKER)
    })?;

    let mut state = ScanState::SeekingOpenBrace;
    let mut open = 0;

    for (offset, ch) in source[marker_at..].char_indices() {
        let at = marker_at + offset;
        state = match (state, ch) {
            (ScanState::SeekingOpenBrace, '{') => {
                open = at;
                ScanState::InsideArray { depth: 1 }
            }
            (ScanState::SeekingOpenBrace, _) => ScanState::SeekingOpenBrace,
            (ScanState::InsideArray { depth }, '{') => {
                ScanState::InsideArray { depth: depth + 1 }
            }
            (ScanState::InsideArray { depth: 1 }, '}') => ScanState::Done { close: at },
            (ScanState::InsideArray { depth }, '}') => {
                ScanState::InsideArray { depth: depth - 1 }
            }
            (state, _) => state,
        };
        if let ScanState::Done { close } = state {
            debug!("Array span located: {}..{}", open, close);
            return Ok(ArraySpan { open, close });
        }
    }

    match state {
        ScanState::SeekingOpenBrace => {
            error!("No opening brace after the marker");
            Err(DeclarationError::OpenBraceNotFound)
        }
        _ => {
            error!("Braces never balanced after the marker");
            Err(DeclarationError::UnbalancedBrace)
        }
    }
}

/// Parses the `0xNN` literals between the braces.
pub fn extract_bytes(source: &str, span: &ArraySpan) -> Vec<u8> {
    let body = source[span.open + 1..span.close].as_bytes();
    let mut bytes = Vec::new();
    let mut i = 0;
    while i + 3 < body.len() {
        if body[i] == b'0'
            && body[i + 1] == b'x'
            && body[i + 2].is_ascii_hexdigit()
            && body[i + 3].is_ascii_hexdigit()
        {
            bytes.push(hex_value(body[i + 2]) << 4 | hex_value(body[i + 3]));
            i += 4;
        } else {
            i += 1;
        }
    }
    debug!("Extracted {} bytes from the array body", bytes.len());
    bytes
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Renders a byte payload as indented `0xNN` literals: lowercase,
/// two digits, comma-separated, `per_line` bytes to a line, no comma
/// after the final literal.
pub fn render_array(bytes: &[u8], per_line: usize) -> String {
    let lines: Vec<String> = bytes
        .chunks(per_line)
        .map(|chunk| {
            let literals: Vec<String> = chunk.iter().map(|b| format!("0x{:02x}", b)).collect();
            format!("    {}", literals.join(", "))
        })
        .collect();
    lines.join(",\n")
}

/// Replaces the array body with a freshly rendered payload. Everything
/// outside the braces is untouched.
pub fn replace_array(source: &str, span: &ArraySpan, bytes: &[u8], per_line: usize) -> String {
    let mut out = String::with_capacity(source.len());
    out.push_str(&source[..=span.open]);
    out.push('\n');
    out.push_str(&render_array(bytes, per_line));
    out.push_str(&source[span.close..]);
    out
}

/// Rewrites the decimal value of a descriptor field such as
/// `.data_size = 1234`. Sources without the field are returned
/// unchanged.
pub fn update_field(source: &str, key: &str, value: usize) -> String {
    let Some(key_at) = source.find(key) else {
        return source.to_string();
    };
    let after_key = key_at + key.len();
    let Some(eq_offset) = source[after_key..].find('=') else {
        return source.to_string();
    };
    let mut digits_start = after_key + eq_offset + 1;
    let bytes = source.as_bytes();
    while digits_start < bytes.len() && bytes[digits_start] == b' ' {
        digits_start += 1;
    }
    let mut digits_end = digits_start;
    while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
        digits_end += 1;
    }
    if digits_end == digits_start {
        return source.to_string();
    }
    debug!("Field {:?} updated to {}", key, value);
    format!(
        "{}{}{}",
        &source[..digits_start],
        value,
        &source[digits_end..]
    )
}
