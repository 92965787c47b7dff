use std::collections::HashMap;

/// One structural region of the source text, as produced by the block lexer.
///
/// Tokens form a flat sequence; nesting is implicit in paired start/end
/// markers. The lexer always pushes both halves of a pair, so every `*Start`
/// has exactly one matching end marker at the same depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of two or more blank lines; round-trips as an empty text node.
    Space,
    /// Indented or fenced code. `lang` is the fence info string, if any.
    Code { text: String, lang: Option<String> },
    /// ATX or setext heading, depth 1..=6.
    Heading { depth: u8, text: String },
    Hr,
    BlockquoteStart,
    BlockquoteEnd,
    ListStart { ordered: bool },
    ListEnd,
    /// `loose` items parse their contents as full blocks; tight items merge
    /// consecutive text into one run. `checked` is set for checkbox bullets.
    ListItemStart { loose: bool, checked: Option<bool> },
    ListItemEnd,
    /// A GFM table: header cells, per-column alignment, body rows. Cell text
    /// is inline-lexed later by the parser.
    Table {
        header: Vec<String>,
        align: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
    Paragraph { text: String },
    Text { text: String },
}

/// Column alignment parsed from a table separator cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// Target of a link-reference definition (`[label]: href "title"`).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDef {
    pub href: String,
    pub title: Option<String>,
}

/// Lowercased link label to definition. Later definitions for the same label
/// overwrite earlier ones. Scoped to a single top-level parse.
pub type LinkTable = HashMap<String, LinkDef>;

/// Normalizes a reference-link label for lookup: internal whitespace runs
/// collapse to a single space, then the label is lowercased.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_ws = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            in_ws = true;
        } else {
            if in_ws && !out.is_empty() {
                out.push(' ');
            }
            in_ws = false;
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_whitespace_collapses() {
        assert_eq!(normalize_label("Foo   Bar"), "foo bar");
        assert_eq!(normalize_label("foo\n bar"), "foo bar");
    }

    #[test]
    fn label_is_lowercased() {
        assert_eq!(normalize_label("FOO"), "foo");
    }

    #[test]
    fn surrounding_whitespace_is_dropped() {
        assert_eq!(normalize_label("  foo  "), "foo");
    }
}
