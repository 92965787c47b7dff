use std::sync::LazyLock;

use regex::Regex;

use crate::Options;
use crate::error::ParseError;

use super::grammar::BlockGrammar;
use super::token::{Alignment, LinkDef, LinkTable, Token, normalize_label};

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^ +$").unwrap());
static INDENTED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?: {4}[^\n]+\n*)+").unwrap());
static HEADING_STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *(#{1,6}) +([^\n]+?) *#* *(?:\n|$)").unwrap());
static HEADING_LAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *(#{1,6}) *([^\n]+?) *#* *(?:\n|$)").unwrap());
static LHEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\n]+)\n *(=|-){2,} *(?:\n|$)").unwrap());
static HR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *[-*_]){3,} *(?:\n|$)").unwrap());
static LIST_HR_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*_] *){3,}(?:\n+|$)").unwrap());
static DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^ *\[([^\]]+)\]: *<?([^\s>]+)>?(?: +["(]([^\n]+)[")])? *(?:\n|$)"#).unwrap()
});
static NPTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ *(\S.*\|.*)\n *([-:]+ *\|[-| :]*)\n((?:.*\|.*(?:\n|$))*)").unwrap()
});
static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ *\|(.+)\n *\|( *[-:]+[-| :]*)\n((?: *\|.*(?:\n|$))*)").unwrap()
});
static QUOTE_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^ *> ?").unwrap());

/// Block-level lexer. Consumes normalized source text and produces a flat
/// token sequence plus the link-reference table collected from `def` lines.
///
/// Rules are attempted in a fixed priority order against the prefix of the
/// remaining input; the first match consumes its text and emits tokens.
/// Blockquote and list-item bodies are lexed by recursion.
pub struct BlockLexer {
    grammar: BlockGrammar,
    tokens: Vec<Token>,
    links: LinkTable,
}

impl BlockLexer {
    pub fn tokenize(source: &str, options: &Options) -> Result<(Vec<Token>, LinkTable), ParseError> {
        let mut lexer = BlockLexer {
            grammar: BlockGrammar::for_options(options),
            tokens: Vec::new(),
            links: LinkTable::new(),
        };
        let prepared = preprocess(source);
        lexer.lex(&prepared, true, false)?;
        Ok((lexer.tokens, lexer.links))
    }

    /// `top` is true at document level (enables paragraphs, defs, tables);
    /// `bq` is true inside a blockquote (suppresses defs at any depth).
    fn lex(&mut self, source: &str, top: bool, bq: bool) -> Result<(), ParseError> {
        let mut src = BLANK_LINE.replace_all(source, "").into_owned();
        let mut pos = 0;

        while pos < src.len() {
            let rest = &src[pos..];

            // blank lines; a run of two or more survives as a `space` token
            if rest.as_bytes()[0] == b'\n' {
                let run = rest.bytes().take_while(|&b| b == b'\n').count();
                pos += run;
                if run > 1 {
                    self.tokens.push(Token::Space);
                }
                continue;
            }

            // indented code
            if let Some(m) = INDENTED_CODE.find(rest) {
                pos += m.len();
                let mut text = String::new();
                for line in m.as_str().split_inclusive('\n') {
                    text.push_str(line.strip_prefix("    ").unwrap_or(line));
                }
                if !self.grammar.pedantic {
                    while text.ends_with('\n') {
                        text.pop();
                    }
                }
                self.tokens.push(Token::Code { text, lang: None });
                continue;
            }

            // fenced code
            if self.grammar.fences
                && let Some(fence) = match_fences(rest)
            {
                pos += fence.len;
                self.tokens.push(Token::Code {
                    text: fence.text,
                    lang: fence.lang,
                });
                continue;
            }

            // heading
            let heading = if self.grammar.strict_heading {
                &HEADING_STRICT
            } else {
                &HEADING_LAX
            };
            if let Some(cap) = heading.captures(rest) {
                pos += cap[0].len();
                self.tokens.push(Token::Heading {
                    depth: cap[1].len() as u8,
                    text: cap[2].to_string(),
                });
                continue;
            }

            // table without a leading pipe
            if self.grammar.tables
                && top
                && let Some(cap) = NPTABLE.captures(rest)
            {
                pos += cap[0].len();
                let token = build_table(&cap[1], &cap[2], &cap[3]);
                self.tokens.push(token);
                continue;
            }

            // setext heading
            if let Some(cap) = LHEADING.captures(rest) {
                pos += cap[0].len();
                self.tokens.push(Token::Heading {
                    depth: if &cap[2] == "=" { 1 } else { 2 },
                    text: cap[1].to_string(),
                });
                continue;
            }

            // horizontal rule
            if let Some(m) = HR.find(rest) {
                pos += m.len();
                self.tokens.push(Token::Hr);
                continue;
            }

            // blockquote
            if let Some(len) = match_blockquote(rest) {
                let inner = QUOTE_PREFIX.replace_all(&rest[..len], "").into_owned();
                pos += len;
                self.tokens.push(Token::BlockquoteStart);
                // `top` is preserved so defs and paragraphs still apply inside
                self.lex(&inner, top, true)?;
                self.tokens.push(Token::BlockquoteEnd);
                continue;
            }

            // list
            if let Some(list) = match_list(rest) {
                let tail_start = pos + list.len;
                let pushback = self.lex_list(&list, bq)?;
                match pushback {
                    Some(mut rebuilt) => {
                        rebuilt.push_str(&src[tail_start..]);
                        src = rebuilt;
                        pos = 0;
                    }
                    None => pos = tail_start,
                }
                continue;
            }

            // link-reference definition, top level only and never in a quote
            if !bq
                && top
                && let Some(cap) = DEF.captures(rest)
            {
                pos += cap[0].len();
                self.links.insert(
                    normalize_label(&cap[1]),
                    LinkDef {
                        href: cap[2].to_string(),
                        title: cap.get(3).map(|m| m.as_str().to_string()),
                    },
                );
                continue;
            }

            // pipe table
            if self.grammar.tables
                && top
                && let Some(cap) = TABLE.captures(rest)
            {
                pos += cap[0].len();
                let token = build_table(&cap[1], &cap[2], &cap[3]);
                self.tokens.push(token);
                continue;
            }

            // paragraph
            if top {
                let len = self.paragraph_len(rest);
                let mut text = &rest[..len];
                text = text.strip_suffix('\n').unwrap_or(text);
                self.tokens.push(Token::Paragraph {
                    text: text.to_string(),
                });
                pos += len;
                continue;
            }

            // plain text line, reached only inside quotes and list items
            let eol = rest.find('\n').unwrap_or(rest.len());
            if eol > 0 {
                self.tokens.push(Token::Text {
                    text: rest[..eol].to_string(),
                });
                pos += eol;
                continue;
            }

            return Err(ParseError::GrammarExhausted {
                byte: rest.as_bytes()[0],
            });
        }

        Ok(())
    }

    /// Emits the token run for one matched list. Returns the re-queued raw
    /// source when a smart-list bullet change splits the list early.
    fn lex_list(&mut self, list: &MatchedList, bq: bool) -> Result<Option<String>, ParseError> {
        self.tokens.push(Token::ListStart {
            ordered: list.ordered,
        });

        let count = list.items.len();
        let mut next = false;
        let mut pushback = None;

        for (i, raw) in list.items.iter().enumerate() {
            let (bullet, body) = match strip_bullet(raw) {
                Some(parts) => parts,
                None => (list.bullet.as_str(), raw.as_str()),
            };
            let checked = bullet
                .starts_with('[')
                .then(|| bullet.contains('x') || bullet.contains('X'));

            // outdent continuation lines by the bullet prefix width
            let prefix_width = raw.len() - body.len();
            let mut item = body.to_string();
            if item.contains("\n ") {
                let width = if self.grammar.pedantic { 4 } else { prefix_width };
                item = outdent(&item, width);
            }

            // a bullet-family change ends the list here and re-queues the rest
            if self.grammar.smart_lists
                && i != count - 1
                && let Some((b, _)) = leading_bullet(&list.items[i + 1])
                && list.bullet != b
                && !(list.bullet.len() > 1 && b.len() > 1)
            {
                pushback = Some(list.items[i + 1..].join("\n"));
            }

            let mut loose = next || has_inner_blank(&item);
            if i != count - 1 {
                next = item.ends_with('\n');
                if !loose {
                    loose = next;
                }
            }

            self.tokens.push(Token::ListItemStart { loose, checked });
            self.lex(&item, false, bq)?;
            self.tokens.push(Token::ListItemEnd);

            if pushback.is_some() {
                break;
            }
        }

        self.tokens.push(Token::ListEnd);
        Ok(pushback)
    }

    /// Length of the paragraph at the head of `rest`: consecutive non-blank
    /// lines that do not open another block construct.
    fn paragraph_len(&self, rest: &str) -> usize {
        let mut end = 0;
        for line in rest.split_inclusive('\n') {
            if end > 0 {
                let content = line.strip_suffix('\n').unwrap_or(line);
                if content.is_empty() || self.interrupts_paragraph(&rest[end..]) {
                    break;
                }
            }
            end += line.len();
        }
        end
    }

    fn interrupts_paragraph(&self, tail: &str) -> bool {
        let heading = if self.grammar.strict_heading {
            &HEADING_STRICT
        } else {
            &HEADING_LAX
        };
        if HR.is_match(tail)
            || heading.is_match(tail)
            || LHEADING.is_match(tail)
            || is_quote_start(tail)
            || DEF.is_match(tail)
        {
            return true;
        }
        // the extended grammar also lets fences and bullets cut a paragraph
        self.grammar.fences && (match_fences(tail).is_some() || leading_bullet(tail).is_some())
    }
}

/// Normalizes line endings, tabs and exotic whitespace before lexing.
fn preprocess(source: &str) -> String {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "    ")
        .replace('\u{a0}', " ")
        .replace('\u{2424}', "\n")
}

struct MatchedFence {
    len: usize,
    lang: Option<String>,
    text: String,
}

/// Matches a fenced code block: three or more backticks or tildes, an
/// optional single-word info string, and a closing fence of the same
/// character at least as long as the opener.
fn match_fences(rest: &str) -> Option<MatchedFence> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while bytes.get(i) == Some(&b' ') {
        i += 1;
    }
    let fence_char = *bytes.get(i)?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let run_start = i;
    while bytes.get(i) == Some(&fence_char) {
        i += 1;
    }
    let run_len = i - run_start;
    if run_len < 3 {
        return None;
    }

    let line_end = i + rest[i..].find('\n')?;
    let info = rest[i..line_end].trim_matches([' ', '.']);
    if info.contains(fence_char as char) {
        return None;
    }
    let mut words = info.split_whitespace();
    let lang = words.next().map(str::to_string);
    if words.next().is_some() {
        return None;
    }

    let body_start = line_end + 1;
    let mut line_start = body_start;
    loop {
        let line_end = rest[line_start..]
            .find('\n')
            .map_or(rest.len(), |n| line_start + n);
        let line = rest[line_start..line_end].trim();
        if line.len() >= run_len && line.bytes().all(|b| b == fence_char) {
            let mut text = rest[body_start..line_start].to_string();
            text.truncate(text.trim_end().len());
            // consume the newline ending the closing fence, nothing further
            let len = if line_end < rest.len() {
                line_end + 1
            } else {
                line_end
            };
            return Some(MatchedFence { len, lang, text });
        }
        if line_end >= rest.len() {
            return None;
        }
        line_start = line_end + 1;
    }
}

fn is_quote_start(tail: &str) -> bool {
    let line = tail.split('\n').next().unwrap_or(tail);
    let trimmed = line.trim_start_matches(' ');
    trimmed.starts_with('>') && trimmed.len() > 1
}

/// Matches a blockquote: a `>`-prefixed line plus lazy continuations. A
/// blank line always terminates the quote, so adjacent quotes separated by
/// one stay separate blocks.
fn match_blockquote(rest: &str) -> Option<usize> {
    let mut end = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let quoted = content.trim_start_matches(' ').starts_with('>');
        if end == 0 {
            if !is_quote_start(rest) {
                return None;
            }
        } else if !quoted && (content.trim().is_empty() || DEF.is_match(&rest[end..])) {
            break;
        }
        end += line.len();
    }
    Some(end)
}

struct MatchedList {
    len: usize,
    ordered: bool,
    bullet: String,
    items: Vec<String>,
}

/// Matches a whole list run and splits it into raw items. The run ends at a
/// horizontal rule or definition boundary, at a blank-line gap not followed
/// by another same-indent bullet, or at end of input.
fn match_list(rest: &str) -> Option<MatchedList> {
    let (bullet, indent) = leading_bullet(rest)?;
    let indent_str = &rest[..indent];
    let ordered = bullet.as_bytes()[0].is_ascii_digit();
    let bullet = bullet.to_string();

    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut end = rest.len();
    while i < rest.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < rest.len() && bytes[j] == b'\n' {
            j += 1;
        }
        let tail = &rest[j..];
        if tail.is_empty() {
            break;
        }
        let hr_tail = tail.strip_prefix(indent_str).unwrap_or(tail);
        if LIST_HR_BOUNDARY.is_match(hr_tail) || DEF.is_match(tail) {
            end = j;
            break;
        }
        if j - i >= 2
            && !tail.starts_with(' ')
            && tail
                .strip_prefix(indent_str)
                .and_then(bullet_prefix)
                .is_none()
        {
            end = j;
            break;
        }
        i = j;
    }

    // split into items at lines carrying the exact list indent plus a bullet
    let mut items = Vec::new();
    let mut current = String::new();
    for line in rest[..end].split_inclusive('\n') {
        let starts_item = line
            .strip_prefix(indent_str)
            .and_then(bullet_prefix)
            .is_some();
        if starts_item && !current.is_empty() {
            if current.ends_with('\n') {
                current.pop();
            }
            items.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        items.push(current);
    }

    Some(MatchedList {
        len: end,
        ordered,
        bullet,
        items,
    })
}

/// Bullet marker at the very start of `s`, followed by a space: `*`/`+`/`-`,
/// a digit run plus `.`, or a `[ ]`/`[x]` checkbox.
fn bullet_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let len = match bytes.first()? {
        b'*' | b'+' | b'-' => 1,
        b'[' if bytes.len() >= 3 && matches!(bytes[1], b' ' | b'x' | b'X') && bytes[2] == b']' => 3,
        b'0'..=b'9' => {
            let digits = s.bytes().take_while(u8::is_ascii_digit).count();
            if bytes.get(digits) == Some(&b'.') {
                digits + 1
            } else {
                return None;
            }
        }
        _ => return None,
    };
    if bytes.get(len) == Some(&b' ') {
        Some(&s[..len])
    } else {
        None
    }
}

/// Like [`bullet_prefix`] but skips leading spaces, returning the bullet and
/// the indent width.
fn leading_bullet(s: &str) -> Option<(&str, usize)> {
    let indent = s.len() - s.trim_start_matches(' ').len();
    bullet_prefix(&s[indent..]).map(|b| (b, indent))
}

/// Removes the indent, bullet and following spaces from an item's first
/// line, returning the bullet and the remaining text.
fn strip_bullet(item: &str) -> Option<(&str, &str)> {
    let (bullet, indent) = leading_bullet(item)?;
    let after = &item[indent + bullet.len()..];
    let spaces = after.len() - after.trim_start_matches(' ').len();
    Some((bullet, &after[spaces..]))
}

fn outdent(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let strip = line
            .bytes()
            .take_while(|&b| b == b' ')
            .count()
            .min(width)
            .min(line.len());
        out.push_str(&line[strip..]);
    }
    out
}

/// True when the item holds a blank line with further content after it.
fn has_inner_blank(item: &str) -> bool {
    match item.find("\n\n") {
        Some(idx) => !item[idx + 2..].trim().is_empty(),
        None => false,
    }
}

fn build_table(header: &str, align: &str, rows: &str) -> Token {
    Token::Table {
        header: split_cells(header),
        align: split_cells(align).iter().map(|c| parse_align(c)).collect(),
        rows: rows
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(split_cells)
            .collect(),
    }
}

fn split_cells(row: &str) -> Vec<String> {
    let mut row = row.trim();
    row = row.strip_prefix('|').unwrap_or(row);
    row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(|c| c.trim().to_string()).collect()
}

fn parse_align(cell: &str) -> Alignment {
    let left = cell.starts_with(':');
    let right = cell.ends_with(':');
    let core = cell.trim_start_matches(':').trim_end_matches(':');
    if core.is_empty() || !core.bytes().all(|b| b == b'-') {
        return Alignment::None;
    }
    match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(src: &str) -> Vec<Token> {
        let (tokens, _) = BlockLexer::tokenize(src, &Options::default()).unwrap();
        tokens
    }

    #[test]
    fn lexes_a_paragraph() {
        assert_eq!(
            tokens("just a sentence"),
            vec![Token::Paragraph {
                text: "just a sentence".into()
            }]
        );
    }

    #[test]
    fn blank_line_runs_become_space_tokens() {
        assert_eq!(
            tokens("one\n\n\ntwo\n"),
            vec![
                Token::Paragraph { text: "one".into() },
                Token::Space,
                Token::Paragraph { text: "two".into() },
            ]
        );
    }

    #[test]
    fn single_blank_line_separates_without_space_token() {
        assert_eq!(
            tokens("one\n\ntwo"),
            vec![
                Token::Paragraph { text: "one".into() },
                Token::Paragraph { text: "two".into() },
            ]
        );
    }

    #[test]
    fn heading_requires_space_in_default_mode() {
        assert_eq!(
            tokens("# Heading"),
            vec![Token::Heading {
                depth: 1,
                text: "Heading".into()
            }]
        );
        assert_eq!(
            tokens("#Heading"),
            vec![Token::Paragraph {
                text: "#Heading".into()
            }]
        );
    }

    #[test]
    fn heading_does_not_swallow_following_blanks() {
        assert_eq!(
            tokens("# Heading\n\n\na paragraph\n"),
            vec![
                Token::Heading {
                    depth: 1,
                    text: "Heading".into()
                },
                Token::Space,
                Token::Paragraph {
                    text: "a paragraph".into()
                },
            ]
        );
    }

    #[test]
    fn setext_heading_depths() {
        assert_eq!(
            tokens("Title\n===\n"),
            vec![Token::Heading {
                depth: 1,
                text: "Title".into()
            }]
        );
        assert_eq!(
            tokens("Title\n---\n"),
            vec![Token::Heading {
                depth: 2,
                text: "Title".into()
            }]
        );
    }

    #[test]
    fn tight_list_items() {
        assert_eq!(
            tokens("- one\n- two\n"),
            vec![
                Token::ListStart { ordered: false },
                Token::ListItemStart {
                    loose: false,
                    checked: None
                },
                Token::Text { text: "one".into() },
                Token::ListItemEnd,
                Token::ListItemStart {
                    loose: false,
                    checked: None
                },
                Token::Text { text: "two".into() },
                Token::ListItemEnd,
                Token::ListEnd,
            ]
        );
    }

    #[test]
    fn blank_line_between_items_makes_them_loose() {
        let toks = tokens("- one\n\n- two\n");
        assert!(matches!(toks[1], Token::ListItemStart { loose: true, .. }));
    }

    #[test]
    fn checkbox_bullets_carry_checked_state() {
        let toks = tokens("[ ] todo\n[x] done\n");
        assert_eq!(
            toks[1],
            Token::ListItemStart {
                loose: false,
                checked: Some(false)
            }
        );
        assert!(matches!(
            toks[4],
            Token::ListItemStart {
                checked: Some(true),
                ..
            }
        ));
    }

    #[test]
    fn nested_todo_items_recurse() {
        let toks = tokens("[ ] todo\n   [ ] nested\n");
        // outer item holds its text plus a nested single-item list
        assert_eq!(
            toks,
            vec![
                Token::ListStart { ordered: false },
                Token::ListItemStart {
                    loose: false,
                    checked: Some(false)
                },
                Token::Text {
                    text: "todo".into()
                },
                Token::ListStart { ordered: false },
                Token::ListItemStart {
                    loose: false,
                    checked: Some(false)
                },
                Token::Text {
                    text: "nested".into()
                },
                Token::ListItemEnd,
                Token::ListEnd,
                Token::ListItemEnd,
                Token::ListEnd,
            ]
        );
    }

    #[test]
    fn ordered_list_is_flagged() {
        let toks = tokens("1. one\n2. two\n");
        assert_eq!(toks[0], Token::ListStart { ordered: true });
    }

    #[test]
    fn smart_lists_split_on_bullet_family_change() {
        let options = Options {
            smart_lists: true,
            ..Options::default()
        };
        let (toks, _) = BlockLexer::tokenize("- one\n1. two\n", &options).unwrap();
        let starts = toks
            .iter()
            .filter(|t| matches!(t, Token::ListStart { .. }))
            .count();
        assert_eq!(starts, 2);
        assert_eq!(toks[0], Token::ListStart { ordered: false });
        assert!(toks.contains(&Token::ListStart { ordered: true }));
    }

    #[test]
    fn adjacent_quotes_stay_separate() {
        assert_eq!(
            tokens("> one\n\n> two\n"),
            vec![
                Token::BlockquoteStart,
                Token::Paragraph { text: "one".into() },
                Token::BlockquoteEnd,
                Token::BlockquoteStart,
                Token::Paragraph { text: "two".into() },
                Token::BlockquoteEnd,
            ]
        );
    }

    #[test]
    fn quote_takes_lazy_continuation_lines() {
        assert_eq!(
            tokens("> one\ntwo\n"),
            vec![
                Token::BlockquoteStart,
                Token::Paragraph {
                    text: "one\ntwo".into()
                },
                Token::BlockquoteEnd,
            ]
        );
    }

    #[test]
    fn backtick_and_tilde_fences() {
        for fence in ["```", "~~~"] {
            let src = format!("{fence}\nlet x = 1;\n{fence}\n");
            assert_eq!(
                tokens(&src),
                vec![Token::Code {
                    text: "let x = 1;".into(),
                    lang: None
                }]
            );
        }
    }

    #[test]
    fn fence_info_string_becomes_lang() {
        assert_eq!(
            tokens("```rust\nfn main() {}\n```\n"),
            vec![Token::Code {
                text: "fn main() {}".into(),
                lang: Some("rust".into())
            }]
        );
    }

    #[test]
    fn fence_is_not_greedy_about_newlines() {
        assert_eq!(
            tokens("```\ncode\n```\n\n\nafter\n"),
            vec![
                Token::Code {
                    text: "code".into(),
                    lang: None
                },
                Token::Space,
                Token::Paragraph {
                    text: "after".into()
                },
            ]
        );
    }

    #[test]
    fn indented_code_is_outdented() {
        assert_eq!(
            tokens("    let x = 1;\n    let y = 2;\n"),
            vec![Token::Code {
                text: "let x = 1;\nlet y = 2;".into(),
                lang: None
            }]
        );
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(tokens("---\n"), vec![Token::Hr]);
    }

    #[test]
    fn defs_populate_the_link_table() {
        let (toks, links) =
            BlockLexer::tokenize("[Foo]: http://example.com \"Title\"\n", &Options::default())
                .unwrap();
        assert!(toks.is_empty());
        let def = &links["foo"];
        assert_eq!(def.href, "http://example.com");
        assert_eq!(def.title.as_deref(), Some("Title"));
    }

    #[test]
    fn later_def_wins() {
        let (_, links) = BlockLexer::tokenize(
            "[a]: http://one.example\n[a]: http://two.example\n",
            &Options::default(),
        )
        .unwrap();
        assert_eq!(links["a"].href, "http://two.example");
    }

    #[test]
    fn defs_inside_quotes_are_ignored() {
        let (_, links) =
            BlockLexer::tokenize("> [a]: http://example.com\n", &Options::default()).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn pipe_table_with_alignment() {
        let src = "| a | b | c |\n|:--|:-:|--:|\n| 1 | 2 | 3 |\n";
        let toks = tokens(src);
        assert_eq!(
            toks,
            vec![Token::Table {
                header: vec!["a".into(), "b".into(), "c".into()],
                align: vec![Alignment::Left, Alignment::Center, Alignment::Right],
                rows: vec![vec!["1".into(), "2".into(), "3".into()]],
            }]
        );
    }

    #[test]
    fn table_is_not_greedy_about_newlines() {
        let src = "| a | b |\n|---|---|\n| 1 | 2 |\n\nafter\n";
        let toks = tokens(src);
        assert!(matches!(toks[0], Token::Table { .. }));
        assert_eq!(
            toks[1],
            Token::Paragraph {
                text: "after".into()
            }
        );
    }

    #[test]
    fn paragraph_stops_at_block_openers() {
        assert_eq!(
            tokens("text\n# Heading\n"),
            vec![
                Token::Paragraph {
                    text: "text".into()
                },
                Token::Heading {
                    depth: 1,
                    text: "Heading".into()
                },
            ]
        );
    }

    #[test]
    fn crlf_and_tabs_are_normalized() {
        assert_eq!(
            tokens("one\r\n\r\ntwo"),
            vec![
                Token::Paragraph { text: "one".into() },
                Token::Paragraph { text: "two".into() },
            ]
        );
        assert!(matches!(tokens("\tcode")[0], Token::Code { .. }));
    }

    #[test]
    fn empty_and_whitespace_input_produce_no_tokens() {
        assert!(tokens("").is_empty());
        assert!(tokens("   ").is_empty());
    }
}
