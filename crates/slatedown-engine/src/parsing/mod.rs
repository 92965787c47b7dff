//! Token-stream parsing.
//!
//! The parser consumes the block lexer's flat token sequence strictly left to
//! right, matching paired start/end markers by recursion, and calls into a
//! [`Renderer`] to materialize nodes. All disambiguation already happened in
//! the lexer; the parser never backtracks.

pub mod renderer;

pub use renderer::{Fragment, Leaf, Renderer, TreeRenderer, group_text_in_ranges};

use crate::Options;
use crate::lexing::{Alignment, InlineLexer, LinkTable, Token};
use crate::models::{Node, Range};

pub struct Parser<'a, R: Renderer + ?Sized> {
    /// Remaining tokens, stored reversed so the next one pops off the end.
    tokens: Vec<Token>,
    inline: InlineLexer<'a, R>,
    renderer: &'a R,
    options: &'a Options,
}

impl<'a, R: Renderer + ?Sized> Parser<'a, R> {
    /// Builds the root node sequence from a token stream and its link table.
    pub fn parse(
        mut tokens: Vec<Token>,
        links: &'a LinkTable,
        renderer: &'a R,
        options: &'a Options,
    ) -> Vec<Node> {
        tokens.reverse();
        let mut parser = Parser {
            tokens,
            inline: InlineLexer::new(links, renderer, options),
            renderer,
            options,
        };
        let mut fragments = Vec::new();
        while let Some(token) = parser.next_token() {
            fragments.extend(parser.tok(token));
        }
        group_text_in_ranges(fragments)
    }

    fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// Merges consecutive `text` tokens into one run before inline-lexing,
    /// so a tight item's wrapped lines stay a single coalesced text node.
    fn parse_text(&mut self, first: String) -> Vec<Fragment> {
        let mut body = first;
        while matches!(self.tokens.last(), Some(Token::Text { .. })) {
            if let Some(Token::Text { text }) = self.tokens.pop() {
                body.push('\n');
                body.push_str(&text);
            }
        }
        self.inline.parse(&body)
    }

    fn tok(&mut self, token: Token) -> Vec<Fragment> {
        match token {
            // a blank-line run survives as an empty text node
            Token::Space => vec![Fragment::Node(Node::text(vec![Range::plain("")]))],

            Token::Hr => vec![Fragment::Node(self.renderer.hr())],

            Token::Heading { depth, text } => {
                let children = self.inline.parse(&text);
                vec![Fragment::Node(self.renderer.heading(children, depth))]
            }

            Token::Code { text, lang } => vec![Fragment::Node(self.renderer.code(
                &text,
                lang.as_deref(),
                self.options,
            ))],

            Token::Table {
                header,
                align,
                rows,
            } => vec![Fragment::Node(self.table(&header, &align, &rows))],

            Token::BlockquoteStart => {
                let mut body = Vec::new();
                while let Some(token) = self.next_token() {
                    match token {
                        Token::BlockquoteEnd => break,
                        // quote children stay inline fragments, not blocks
                        Token::Paragraph { text } | Token::Text { text } => {
                            body.extend(self.inline.parse(&text));
                        }
                        other => body.extend(self.tok(other)),
                    }
                }
                vec![Fragment::Node(self.renderer.blockquote(body))]
            }

            Token::ListStart { ordered } => {
                let mut body = Vec::new();
                while let Some(token) = self.next_token() {
                    if matches!(token, Token::ListEnd) {
                        break;
                    }
                    body.extend(self.tok(token));
                }
                vec![Fragment::Node(self.renderer.list(body, ordered))]
            }

            Token::ListItemStart { loose, checked } => {
                let mut body = Vec::new();
                while let Some(token) = self.next_token() {
                    match token {
                        Token::ListItemEnd => break,
                        // tight items coalesce their text runs directly;
                        // loose items get full blocks per token
                        Token::Text { text } if !loose => body.extend(self.parse_text(text)),
                        other => body.extend(self.tok(other)),
                    }
                }
                vec![Fragment::Node(self.renderer.listitem(body, checked))]
            }

            Token::Paragraph { text } => {
                let children = self.inline.parse(&text);
                vec![Fragment::Node(self.renderer.paragraph(children))]
            }

            Token::Text { text } => {
                let children = self.parse_text(text);
                vec![Fragment::Node(self.renderer.paragraph(children))]
            }

            // end markers are always consumed by their start's loop
            Token::BlockquoteEnd | Token::ListEnd | Token::ListItemEnd => vec![],
        }
    }

    fn table(&self, header: &[String], align: &[Alignment], rows: &[Vec<String>]) -> Node {
        let mut body = Vec::new();

        let head_cells = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let column = align.get(i).copied().unwrap_or(Alignment::None);
                let children = self.inline.parse(cell);
                Fragment::Node(self.renderer.table_cell(children, true, column))
            })
            .collect();
        body.push(Fragment::Node(self.renderer.table_row(head_cells)));

        for row in rows {
            let cells = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let column = align.get(i).copied().unwrap_or(Alignment::None);
                    let children = self.inline.parse(cell);
                    Fragment::Node(self.renderer.table_cell(children, false, column))
                })
                .collect();
            body.push(Fragment::Node(self.renderer.table_row(cells)));
        }

        self.renderer.table(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::BlockLexer;
    use crate::models::{BlockType, MarkType};
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Vec<Node> {
        let options = Options::default();
        let (tokens, links) = BlockLexer::tokenize(src, &options).unwrap();
        Parser::parse(tokens, &links, &TreeRenderer, &options)
    }

    fn block_type(node: &Node) -> BlockType {
        match node {
            Node::Block { block_type, .. } => *block_type,
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn heading_depths_produce_heading_nodes() {
        for depth in 1..=6u8 {
            let src = format!("{} Heading", "#".repeat(depth as usize));
            let nodes = parse(&src);
            assert_eq!(nodes.len(), 1);
            assert_eq!(block_type(&nodes[0]), BlockType::heading(depth));
            assert_eq!(nodes[0].children()[0], Node::plain_text("Heading"));
        }
    }

    #[test]
    fn tight_list_items_hold_one_text_node() {
        let nodes = parse("- one\n- two\n");
        assert_eq!(block_type(&nodes[0]), BlockType::BulletedList);
        let items = nodes[0].children();
        assert_eq!(items.len(), 2);
        assert_eq!(block_type(&items[0]), BlockType::ListItem);
        assert_eq!(items[0].children(), &[Node::plain_text("one")]);
    }

    #[test]
    fn loose_list_items_hold_paragraphs() {
        let nodes = parse("- one\n\n- two\n");
        let items = nodes[0].children();
        assert_eq!(block_type(&items[0].children()[0]), BlockType::Paragraph);
    }

    #[test]
    fn wrapped_tight_item_text_coalesces() {
        let nodes = parse("- one\n  continued\n");
        let items = nodes[0].children();
        assert_eq!(
            items[0].children(),
            &[Node::plain_text("one\ncontinued")]
        );
    }

    #[test]
    fn todo_items_build_a_todo_list() {
        let nodes = parse("[ ] open\n[x] done\n");
        assert_eq!(block_type(&nodes[0]), BlockType::TodoList);
        let items = nodes[0].children();
        assert_eq!(items[0].data_bool("checked"), Some(false));
        assert_eq!(items[1].data_bool("checked"), Some(true));
    }

    #[test]
    fn quote_children_are_inline_not_blocks() {
        let nodes = parse("> quoted words\n");
        assert_eq!(block_type(&nodes[0]), BlockType::BlockQuote);
        assert_eq!(nodes[0].children(), &[Node::plain_text("quoted words")]);
    }

    #[test]
    fn blank_runs_become_empty_text_nodes() {
        let nodes = parse("one\n\n\ntwo\n");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1], Node::text(vec![Range::plain("")]));
    }

    #[test]
    fn table_builds_head_and_body_rows() {
        let nodes = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        assert_eq!(block_type(&nodes[0]), BlockType::Table);
        let rows = nodes[0].children();
        assert_eq!(rows.len(), 2);
        let head = rows[0].children();
        assert_eq!(block_type(&head[0]), BlockType::TableHead);
        assert_eq!(head[0].data_str("align"), Some("left"));
        assert_eq!(head[1].data_str("align"), Some("right"));
        assert_eq!(block_type(&rows[1].children()[0]), BlockType::TableCell);
    }

    #[test]
    fn marks_inside_a_paragraph_stay_one_text_node() {
        let nodes = parse("plain **bold** tail");
        let children = nodes[0].children();
        assert_eq!(children.len(), 1);
        match &children[0] {
            Node::Text { ranges } => {
                assert_eq!(ranges.len(), 3);
                assert_eq!(ranges[1].text, "bold");
                assert_eq!(ranges[1].marks[0].mark_type, MarkType::Bold);
            }
            other => panic!("expected text node, got {other:?}"),
        }
    }
}
