/// Grammar and behavior switches for a parse.
///
/// Passed by reference into every call; nothing is stamped onto shared state.
#[derive(Debug, Clone)]
pub struct Options {
    /// Extended grammar: fenced code, tables, strikethrough/inserted marks,
    /// strict ATX heading spacing.
    pub gfm: bool,
    /// Soft line breaks become hard breaks.
    pub breaks: bool,
    /// Classic markdown.pl list de-indentation and emphasis boundaries.
    pub pedantic: bool,
    /// Stop a list early when the next item's bullet family changes.
    pub smart_lists: bool,
    /// On a fatal lex/parse error, return a one-paragraph document describing
    /// the error instead of propagating it.
    pub silent: bool,
    /// Prefix applied to fenced-code language names stored on code blocks.
    pub lang_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            gfm: true,
            breaks: false,
            pedantic: false,
            smart_lists: false,
            silent: false,
            lang_prefix: "lang-".to_string(),
        }
    }
}
