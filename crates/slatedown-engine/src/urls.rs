//! URL normalization for serialized link and image targets.
//!
//! Markdown link grammar breaks on spaces, quotes and parentheses inside a
//! target, so targets are decoded and then re-encoded before they are
//! written out. `encode` is idempotent: feeding its output back in produces
//! the same string.

/// Re-encodes a link target so the emitted markdown stays parseable.
pub fn encode(href: &str) -> String {
    decode_safe(href)
        .trim()
        .replace('%', "%25")
        .replace(' ', "%20")
        .replace('\'', "%27")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// Percent-decodes a target for display. Never fails: malformed escapes are
/// carried through literally.
pub fn decode(href: &str) -> String {
    decode_safe(href)
}

/// Percent-decodes valid `%XX` escapes and leaves a bare `%` (one that does
/// not begin a valid escape) untouched. Users paste "invalid" urls; those must
/// survive rather than error.
fn decode_safe(uri: &str) -> String {
    let bytes = uri.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            out.push(hi * 16 + lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_and_markdown_delimiters() {
        assert_eq!(
            encode("https://example.com/a b('c')"),
            "https://example.com/a%20b%28%27c%27%29"
        );
    }

    #[test]
    fn already_encoded_input_is_stable() {
        let href = "https://example.com/kibana#/discover?_g=%28a:%27b%27,c:%2710%20seconds%27%29";
        assert_eq!(encode(&encode(href)), encode(href));
    }

    #[test]
    fn bare_percent_becomes_escaped() {
        assert_eq!(
            encode("https://example.com/Requests-%"),
            "https://example.com/Requests-%25"
        );
    }

    #[test]
    fn encode_is_idempotent_on_bare_percent() {
        let once = encode("https://example.com/Requests-%");
        assert_eq!(encode(&once), once);
    }

    #[test]
    fn decodes_utf8_sequences() {
        assert_eq!(decode("%D0%B0%D0%B1"), "аб");
    }

    #[test]
    fn decode_keeps_malformed_escape() {
        assert_eq!(decode("100%zz"), "100%zz");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(encode("  https://example.com  "), "https://example.com");
    }
}
