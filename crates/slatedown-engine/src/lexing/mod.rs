//! # Two-phase lexing
//!
//! Markdown has no context-free grammar, so lexing happens in two phases:
//!
//! 1. **Block phase** (`block`): the raw text is consumed rule by rule in a
//!    fixed priority order, producing a flat token stream with paired
//!    start/end markers for nesting (blockquotes, lists, list items) plus a
//!    side table of link-reference definitions.
//! 2. **Inline phase** (`inline`): one block token's text is matched against
//!    the inline grammar, delegating fragment construction to a renderer.
//!
//! Both phases dispatch first-match-wins over an ordered rule set; later
//! rules assume earlier ones already consumed more specific constructs.
//! Variant selection (normal / GFM / pedantic / breaks) lives in `grammar`
//! as pure data the matchers consult.

pub mod block;
pub mod grammar;
pub mod inline;
pub mod token;

pub use block::BlockLexer;
pub use grammar::{BlockGrammar, InlineGrammar};
pub use inline::InlineLexer;
pub use token::{Alignment, LinkDef, LinkTable, Token, normalize_label};
