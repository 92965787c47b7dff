//! Markdown grammar engine for rich-text editors.
//!
//! The crate converts between Markdown text and a JSON-friendly document
//! tree of blocks, inlines, and marked text ranges. Parsing runs in two
//! passes: [`lexing::BlockLexer`] produces a flat token stream plus a link
//! reference table, and [`parsing::Parser`] folds that stream into nodes
//! through a [`parsing::Renderer`]. [`Markdown`] walks a tree the other way,
//! back to Markdown text, through an overridable rule list.
//!
//! ```
//! use slatedown_engine::{Markdown, Options, parse};
//!
//! let options = Options::default();
//! let document = parse("# Title\n\nSome *emphasis*.", &options).unwrap();
//! let markdown = Markdown::new().serialize(&document);
//! assert!(markdown.starts_with("# Title"));
//! ```

pub mod error;
pub mod lexing;
pub mod models;
pub mod options;
pub mod parsing;
pub mod serializing;
pub mod urls;

pub use error::ParseError;
pub use models::{
    BlockType, Data, Document, InlineType, Mark, MarkType, Node, Range,
};
pub use options::Options;
pub use serializing::{Markdown, Parent, Rule, RuleInput};

use lexing::BlockLexer;
use parsing::{Parser, TreeRenderer};

/// Parses Markdown into a document tree.
///
/// With `options.silent` set, a parse failure yields a one-paragraph
/// document carrying the error message instead of an `Err`.
pub fn parse(source: &str, options: &Options) -> Result<Document, ParseError> {
    match try_parse(source, options) {
        Ok(document) => Ok(document),
        Err(err) if options.silent => Ok(error_document(&err)),
        Err(err) => Err(err),
    }
}

fn try_parse(source: &str, options: &Options) -> Result<Document, ParseError> {
    let (tokens, links) = BlockLexer::tokenize(source, options)?;
    let renderer = TreeRenderer;
    let nodes = Parser::parse(tokens, &links, &renderer, options);
    Ok(Document { nodes })
}

fn error_document(err: &ParseError) -> Document {
    // The historical message spelling is part of the output contract.
    Document {
        nodes: vec![Node::block(
            BlockType::Paragraph,
            vec![Node::text(vec![
                Range::plain("An error occured:"),
                Range::plain(err.to_string()),
            ])],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_builds_a_document() {
        let document = parse("# Title", &Options::default()).unwrap();
        assert_eq!(
            document.nodes,
            vec![Node::block(
                BlockType::Heading1,
                vec![Node::plain_text("Title")]
            )]
        );
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let document = parse("", &Options::default()).unwrap();
        assert_eq!(document.nodes, Vec::new());
    }

    #[test]
    fn error_document_carries_the_message_in_one_paragraph() {
        let document = error_document(&ParseError::GrammarExhausted { byte: 0x00 });
        assert_eq!(
            document.nodes,
            vec![Node::block(
                BlockType::Paragraph,
                vec![Node::text(vec![
                    Range::plain("An error occured:"),
                    Range::plain("no grammar rule matched at byte 0x00"),
                ])]
            )]
        );
    }

    #[test]
    fn blank_line_of_spaces_is_an_empty_document() {
        let document = parse("   \n", &Options::default()).unwrap();
        assert_eq!(document.nodes, Vec::new());
    }
}
