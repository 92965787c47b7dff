use std::sync::LazyLock;

use regex::Regex;

use crate::Options;
use crate::parsing::renderer::{Fragment, Renderer};

use super::grammar::InlineGrammar;
use super::token::{LinkTable, normalize_label};

static ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\([\\`*{}\[\]()#+\-.!_>])").unwrap());
static ESCAPE_GFM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\([\\`*{}\[\]()#+\-.!_>~|])").unwrap());
static LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^\s*<?(.*?)>?(?:\s+['"](.*?)['"])?\s*\)"#).unwrap());
static REFLINK_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\[([^\]]*)\]").unwrap());
static DEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^~~(\S(?:.*?\S)?)~~").unwrap());
static INS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\+\+(\S(?:.*?\S)?)\+\+").unwrap());

/// Inline lexer and compiler. Walks one block token's text, matching the
/// inline grammar in priority order and delegating fragment construction to
/// the renderer.
///
/// Reference links resolve against the link table collected by the block
/// lexer; a missing label degrades to literal text rather than failing the
/// parse.
pub struct InlineLexer<'a, R: Renderer + ?Sized> {
    links: &'a LinkTable,
    renderer: &'a R,
    grammar: InlineGrammar,
}

impl<'a, R: Renderer + ?Sized> InlineLexer<'a, R> {
    pub fn new(links: &'a LinkTable, renderer: &'a R, options: &Options) -> Self {
        InlineLexer {
            links,
            renderer,
            grammar: InlineGrammar::for_options(options),
        }
    }

    pub fn parse(&self, src: &str) -> Vec<Fragment> {
        self.lex(src, false)
    }

    /// `in_link` is set while lexing a link's children; any link matched in
    /// that state degrades to literal text, preventing nested links.
    fn lex(&self, mut src: &str, in_link: bool) -> Vec<Fragment> {
        let mut out = Vec::new();

        while !src.is_empty() {
            // backslash escape
            let escape = if self.grammar.del { &ESCAPE_GFM } else { &ESCAPE };
            if let Some(cap) = escape.captures(src) {
                out.push(self.renderer.text(&cap[1]));
                src = &src[cap[0].len()..];
                continue;
            }

            // link, image, reference link, shortcut link
            if let Some(bracket) = match_bracket(src) {
                match self.resolve_link(src, &bracket, in_link) {
                    LinkOutcome::Fragment(fragment, len) => {
                        out.push(fragment);
                        src = &src[len..];
                    }
                    // emit the opening character and resume one char later
                    LinkOutcome::Literal => {
                        let width = src.chars().next().map_or(1, char::len_utf8);
                        out.push(self.renderer.text(&src[..width]));
                        src = &src[width..];
                    }
                }
                continue;
            }

            // strong
            if let Some((len, inner)) = match_strong(src, self.grammar.pedantic) {
                let children = self.lex(inner, in_link);
                out.extend(self.renderer.strong(children));
                src = &src[len..];
                continue;
            }

            // emphasis
            if let Some((len, inner)) = match_em(src, self.grammar.pedantic) {
                let children = self.lex(inner, in_link);
                out.extend(self.renderer.em(children));
                src = &src[len..];
                continue;
            }

            // code span
            if let Some((len, text)) = match_codespan(src) {
                out.push(self.renderer.codespan(&text));
                src = &src[len..];
                continue;
            }

            // hard line break
            if let Some(len) = self.match_br(src) {
                out.push(self.renderer.br());
                src = &src[len..];
                continue;
            }

            // strikethrough
            if self.grammar.del
                && let Some(cap) = DEL.captures(src)
            {
                let children = self.lex(&cap[1], in_link);
                out.extend(self.renderer.del(children));
                src = &src[cap[0].len()..];
                continue;
            }

            // inserted
            if self.grammar.ins
                && let Some(cap) = INS.captures(src)
            {
                let children = self.lex(&cap[1], in_link);
                out.extend(self.renderer.ins(children));
                src = &src[cap[0].len()..];
                continue;
            }

            // plain text up to the next special character
            let len = self.text_len(src);
            out.push(self.renderer.text(&src[..len]));
            src = &src[len..];
        }

        out
    }

    fn resolve_link(&self, src: &str, bracket: &Bracket, in_link: bool) -> LinkOutcome {
        let tail = &src[bracket.end..];

        // inline form with a parenthesized target
        if let Some(rest) = tail.strip_prefix('(')
            && let Some(cap) = LINK_TARGET.captures(rest)
        {
            if in_link {
                return LinkOutcome::Literal;
            }
            let len = bracket.end + 1 + cap[0].len();
            let title = cap.get(2).map(|m| m.as_str());
            let fragment = self.output_link(bracket, cap.get(1).map_or("", |m| m.as_str()), title);
            return LinkOutcome::Fragment(fragment, len);
        }

        // reference form with an explicit label, else shortcut form
        let (label, len) = match REFLINK_LABEL.captures(tail) {
            Some(cap) => {
                let explicit = cap.get(1).map_or("", |m| m.as_str());
                let label = if explicit.is_empty() {
                    bracket.inner
                } else {
                    explicit
                };
                (label, bracket.end + cap[0].len())
            }
            None => (bracket.inner, bracket.end),
        };

        match self.links.get(&normalize_label(label)) {
            Some(def) if !in_link => {
                let fragment = self.output_link(bracket, &def.href, def.title.as_deref());
                LinkOutcome::Fragment(fragment, len)
            }
            _ => LinkOutcome::Literal,
        }
    }

    fn output_link(&self, bracket: &Bracket, href: &str, title: Option<&str>) -> Fragment {
        if bracket.image {
            self.renderer.image(href, title, bracket.inner)
        } else {
            let children = self.lex(bracket.inner, true);
            self.renderer.link(href, title, children)
        }
    }

    fn match_br(&self, src: &str) -> Option<usize> {
        let spaces = src.bytes().take_while(|&b| b == b' ').count();
        let required = if self.grammar.breaks { 0 } else { 2 };
        if spaces < required || src.as_bytes().get(spaces) != Some(&b'\n') {
            return None;
        }
        // a break right before trailing whitespace is not a break at all
        if src[spaces + 1..].trim().is_empty() {
            return None;
        }
        Some(spaces + 1)
    }

    /// Length of the plain-text run at the head of `src`: everything up to
    /// the next special character or hard-break position, at least one char.
    fn text_len(&self, src: &str) -> usize {
        let mut iter = src.char_indices();
        iter.next();
        for (i, ch) in iter {
            if self.is_special(ch) || self.br_starts_at(&src[i..]) {
                return i;
            }
        }
        src.len()
    }

    fn is_special(&self, ch: char) -> bool {
        matches!(ch, '\\' | '<' | '!' | '[' | '_' | '*' | '`')
            || (self.grammar.del && matches!(ch, '~' | '+'))
    }

    fn br_starts_at(&self, rest: &str) -> bool {
        let spaces = rest.bytes().take_while(|&b| b == b' ').count();
        let required = if self.grammar.breaks { 0 } else { 2 };
        spaces >= required && rest.as_bytes().get(spaces) == Some(&b'\n')
    }
}

enum LinkOutcome {
    Fragment(Fragment, usize),
    Literal,
}

struct Bracket<'s> {
    /// Byte offset just past the closing `]`.
    end: usize,
    image: bool,
    inner: &'s str,
}

/// Matches `[...]` or `![...]` with balanced nested brackets.
fn match_bracket(src: &str) -> Option<Bracket<'_>> {
    let image = src.starts_with('!');
    let open = usize::from(image);
    if src.as_bytes().get(open) != Some(&b'[') {
        return None;
    }
    let mut depth = 1usize;
    for (i, ch) in src[open + 1..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + 1 + i;
                    return Some(Bracket {
                        end: close + 1,
                        image,
                        inner: &src[open + 1..close],
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Matches `**inner**` or `__inner__`. The closing delimiter must not be
/// followed by a third delimiter character; pedantic mode additionally
/// requires non-whitespace directly inside both delimiters.
fn match_strong(src: &str, pedantic: bool) -> Option<(usize, &str)> {
    let bytes = src.as_bytes();
    let d = *bytes.first()?;
    if (d != b'*' && d != b'_') || bytes.get(1) != Some(&d) {
        return None;
    }
    if pedantic && src[2..].starts_with(char::is_whitespace) {
        return None;
    }
    let mut p = 3;
    while p + 1 < src.len() {
        if bytes[p] == d
            && bytes[p + 1] == d
            && bytes.get(p + 2) != Some(&d)
            && (!pedantic || !src[2..p].ends_with(char::is_whitespace))
        {
            return Some((p + 2, &src[2..p]));
        }
        p += 1;
    }
    None
}

/// Matches `*inner*` or `_inner_`. Doubled delimiters inside are consumed as
/// pairs, so strong spans can nest within emphasis. The underscore form only
/// closes at a word boundary; the star form must not be followed by another
/// star.
fn match_em(src: &str, pedantic: bool) -> Option<(usize, &str)> {
    let bytes = src.as_bytes();
    let d = *bytes.first()?;
    if d != b'*' && d != b'_' {
        return None;
    }

    if pedantic {
        if !src[1..].starts_with(|c: char| !c.is_whitespace()) {
            return None;
        }
        let mut p = 2;
        while p < src.len() {
            if bytes[p] == d
                && bytes.get(p + 1) != Some(&d)
                && !src[1..p].ends_with(char::is_whitespace)
            {
                return Some((p + 1, &src[1..p]));
            }
            p += 1;
        }
        return None;
    }

    let mut p = 1;
    loop {
        // consume one unit: a doubled delimiter or a single character
        if bytes.get(p) == Some(&d) && bytes.get(p + 1) == Some(&d) {
            p += 2;
        } else {
            match src[p..].chars().next() {
                Some(ch) => p += ch.len_utf8(),
                None => return None,
            }
        }
        if p >= src.len() {
            return None;
        }
        if bytes[p] == d && closes_em(src, p, d) {
            return Some((p + 1, &src[1..p]));
        }
    }
}

fn closes_em(src: &str, p: usize, d: u8) -> bool {
    let next = src.as_bytes().get(p + 1);
    if d == b'*' {
        next != Some(&b'*')
    } else {
        // underscore closes only at a word boundary
        !matches!(next, Some(b) if b.is_ascii_alphanumeric() || *b == b'_')
    }
}

/// Matches a backtick code span: the closing run must have exactly the
/// opening's length. Surrounding whitespace inside the span is dropped.
fn match_codespan(src: &str) -> Option<(usize, String)> {
    let n = src.bytes().take_while(|&b| b == b'`').count();
    if n == 0 {
        return None;
    }
    let bytes = src.as_bytes();
    let mut p = n;
    while p < src.len() {
        if bytes[p] == b'`' {
            let run = src[p..].bytes().take_while(|&b| b == b'`').count();
            if run == n {
                let inner = &src[n..p];
                let trimmed = inner.trim();
                let text = if trimmed.is_empty() { " " } else { trimmed };
                return Some((p + run, text.to_string()));
            }
            p += run;
        } else {
            p += 1;
        }
    }
    None
}
