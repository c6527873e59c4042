//! Raw transport bytes to printable text.
//!
//! Bytes are decoded as UTF-8 (invalid sequences become U+FFFD), rendered to
//! an escaped form and resolved back. The round trip leaves backslashes that
//! users type in chat exactly as sent; only escapes produced by [`escape`]
//! turn into control characters.

use std::borrow::Cow;
use std::fmt::Write;

/// Decode one accumulated read into text.
pub fn decode(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    unescape(&escape(&text)).into_owned()
}

/// Render control characters and backslashes as escapes.
///
/// `unescape(&escape(s)) == s` for every `s`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u8);
            }
            c => out.push(c),
        }
    }
    out
}

/// Resolve `\r`, `\n`, `\t`, `\0`, `\\`, `\'`, `\"` and `\xHH`.
///
/// Unknown or truncated escapes are left as written. Text without a
/// backslash is returned borrowed and unchanged.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match resolve_escape(tail) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// The character named by the escape at the start of `tail` (the text after
/// the backslash) and how many bytes of `tail` it used.
fn resolve_escape(tail: &str) -> Option<(char, usize)> {
    let c = match tail.as_bytes().first()? {
        b'r' => '\r',
        b'n' => '\n',
        b't' => '\t',
        b'0' => '\0',
        b'\\' => '\\',
        b'\'' => '\'',
        b'"' => '"',
        b'x' => {
            let hex = tail.get(1..3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            let byte = u8::from_str_radix(hex, 16).ok()?;
            return Some((char::from(byte), 3));
        }
        _ => return None,
    };
    Some((c, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        let line = ":alice!user@host PRIVMSG #chan :hello\r\n";
        assert_eq!(decode(line.as_bytes()), line);
        assert!(matches!(unescape("no escapes here"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_resolves_line_terminators() {
        assert_eq!(unescape(r"PING :abc\r\n"), "PING :abc\r\n");
        assert_eq!(unescape(r"a\tb"), "a\tb");
    }

    #[test]
    fn test_decode_keeps_typed_backslashes() {
        let line = ":u!h PRIVMSG #c :path C:\\temp\\new and \\r end\r\n";
        assert_eq!(decode(line.as_bytes()), line);
        assert!(!decode(br"C:\temp").contains('\t'));
    }

    #[test]
    fn test_escape_round_trips() {
        for text in [
            "plain",
            "PING :abc\r\n",
            r"C:\temp\new \x41 \\ end\",
            "\x01ACTION waves\x01\0\x7f",
            "caf\u{e9} \u{1f980}",
        ] {
            assert_eq!(unescape(&escape(text)), text);
        }
        assert_eq!(escape("a\\b\r\x01"), r"a\\b\r\x01");
    }

    #[test]
    fn test_resolves_hex_and_quotes() {
        assert_eq!(unescape(r"\x01ACTION waves\x01"), "\x01ACTION waves\x01");
        assert_eq!(unescape(r#"it\'s \"quoted\""#), "it's \"quoted\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_unknown_and_truncated_escapes_pass_through() {
        assert_eq!(unescape(r"\q"), r"\q");
        assert_eq!(unescape(r"end\"), r"end\");
        assert_eq!(unescape(r"\x4"), r"\x4");
        assert_eq!(unescape(r"\xzz"), r"\xzz");
    }

    #[test]
    fn test_decode_is_idempotent_on_clean_text() {
        let once = decode(b":u!h PRIVMSG #test :hi\r\n");
        assert_eq!(decode(once.as_bytes()), once);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode(b"hi \xff there"), "hi \u{fffd} there");
    }
}
