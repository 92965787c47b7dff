/// Fatal conditions raised while turning markdown into a token stream.
///
/// Recoverable situations (an unresolved reference link, an unclosed fence)
/// never surface here; they degrade to literal text inside the parse instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No block grammar rule matched the remaining input. This is a defect in
    /// rule coverage, never user error: skipping the byte would corrupt
    /// position tracking, so the lexer stops instead.
    #[error("no grammar rule matched at byte 0x{byte:02x}")]
    GrammarExhausted { byte: u8 },
}
