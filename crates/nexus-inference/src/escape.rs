//! Minimal string escaping for the fixed-shape completion request.
//!
//! Only the four characters that can break out of a JSON string in this
//! request template are escaped: backslash, double quote, line feed and
//! carriage return. Every other character, including tabs and other control
//! characters, is copied through unchanged. This is not a general JSON
//! serializer and must not grow into one.

/// Escape `text` for embedding between double quotes in the request body.
pub fn escape_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_quotes_and_newlines() {
        assert_eq!(escape_json("He said \"hi\"\nBye"), "He said \\\"hi\\\"\\nBye");
    }

    #[test]
    fn test_escapes_backslash_before_other_rules() {
        // a literal backslash-n in the input must not turn into a newline escape
        assert_eq!(escape_json("C:\\new"), "C:\\\\new");
    }

    #[test]
    fn test_escapes_carriage_return() {
        assert_eq!(escape_json("a\r\nb"), "a\\r\\nb");
    }

    #[test]
    fn test_leaves_everything_else_alone() {
        assert_eq!(escape_json("tab\there"), "tab\there");
        assert_eq!(escape_json("ação / <tag> & 'x'"), "ação / <tag> & 'x'");
        assert_eq!(escape_json("\u{0001}"), "\u{0001}");
    }

    #[test]
    fn test_empty() {
        assert_eq!(escape_json(""), "");
    }
}
