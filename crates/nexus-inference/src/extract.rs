//! Answer extraction from a raw chat completion response.
//!
//! The response body is not parsed as JSON. The upstream shape is trusted, so
//! the answer is taken from the first `"content":` field by a small
//! character-scanning state machine:
//!
//! ```text
//!   marker found ──► SeekingQuote ── '"' ──► InValue ── '"' ──► done
//!                                             │   ▲
//!                                        '\\' │   │ any char (decoded)
//!                                             ▼   │
//!                                           InEscape
//! ```
//!
//! Extraction never fails. A body without the marker, or without a quote
//! after it, comes back unchanged; a value that never closes yields whatever
//! was read up to the end of the input. `\uXXXX` escapes are not decoded:
//! the `u` and the hex digits are kept as literal text.

/// Key marker identifying the answer field.
pub const ANSWER_MARKER: &str = "\"content\":";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// After the marker, looking for the opening quote of the value.
    SeekingQuote,
    /// Inside the string value.
    InValue,
    /// Previous character was an unconsumed backslash.
    InEscape,
}

/// Pull the answer text out of a raw response body.
pub fn extract_answer(raw: &str) -> String {
    let Some(marker_at) = raw.find(ANSWER_MARKER) else {
        return raw.to_string();
    };

    let mut state = ScanState::SeekingQuote;
    let mut answer = String::new();

    for c in raw[marker_at + ANSWER_MARKER.len()..].chars() {
        state = match state {
            ScanState::SeekingQuote if c == '"' => ScanState::InValue,
            ScanState::SeekingQuote => ScanState::SeekingQuote,
            ScanState::InEscape => {
                answer.push(decode_escape(c));
                ScanState::InValue
            }
            ScanState::InValue if c == '\\' => ScanState::InEscape,
            ScanState::InValue if c == '"' => break,
            ScanState::InValue => {
                answer.push(c);
                ScanState::InValue
            }
        };
    }

    if state == ScanState::SeekingQuote {
        return raw.to_string();
    }

    answer.trim().to_string()
}

/// Character produced by a backslash escape.
fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        // '"', '\\' and anything unrecognised stand for themselves
        other => other,
    }
}
