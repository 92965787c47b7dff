use crate::Options;

/// Feature switches for the block lexer, derived from [`Options`].
///
/// Each flag enables a family of block rules; the lexer consults these before
/// attempting the corresponding match, so a disabled rule costs nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrammar {
    /// Backtick and tilde fenced code blocks.
    pub fences: bool,
    /// Pipe tables and their separator rows.
    pub tables: bool,
    /// ATX headings require a space after the hash run.
    pub strict_heading: bool,
    /// Original-flavor quirks: no trailing-newline trim on indented code,
    /// fixed four-space list outdenting.
    pub pedantic: bool,
    /// A bullet-style change ends the current list and starts a new one.
    pub smart_lists: bool,
}

impl BlockGrammar {
    pub fn for_options(options: &Options) -> Self {
        Self {
            fences: options.gfm,
            tables: options.gfm,
            strict_heading: options.gfm,
            pedantic: options.pedantic,
            smart_lists: options.smart_lists,
        }
    }
}

/// Feature switches for the inline lexer, derived from [`Options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineGrammar {
    /// `~~strikethrough~~` spans.
    pub del: bool,
    /// `++inserted++` spans.
    pub ins: bool,
    /// A single trailing newline becomes a hard break.
    pub breaks: bool,
    /// Looser emphasis matching that requires non-space-adjacent delimiters.
    pub pedantic: bool,
}

impl InlineGrammar {
    pub fn for_options(options: &Options) -> Self {
        Self {
            del: options.gfm,
            ins: options.gfm,
            breaks: options.gfm && options.breaks,
            pedantic: options.pedantic && !options.gfm,
        }
    }
}
