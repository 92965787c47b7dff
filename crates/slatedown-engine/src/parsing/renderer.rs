use serde_json::Value;

use crate::Options;
use crate::lexing::Alignment;
use crate::models::{BlockType, Data, InlineType, Mark, MarkType, Node, Range};

/// A single run of inline text plus the marks collected around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// Intermediate output of the inline lexer: either a loose leaf that still
/// needs grouping into a text node, or a finished node.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Leaf(Leaf),
    Node(Node),
}

impl Fragment {
    pub fn leaf(text: impl Into<String>) -> Self {
        Fragment::Leaf(Leaf {
            text: text.into(),
            marks: Vec::new(),
        })
    }
}

/// Merges runs of adjacent leaves into single text nodes so inline
/// formatting round-trips as contiguous ranges, never as fragmented
/// sibling text nodes.
pub fn group_text_in_ranges(fragments: Vec<Fragment>) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Leaf(leaf) => {
                let range = Range {
                    text: leaf.text,
                    marks: leaf.marks,
                };
                match nodes.last_mut() {
                    Some(Node::Text { ranges }) => ranges.push(range),
                    _ => nodes.push(Node::text(vec![range])),
                }
            }
            Fragment::Node(node) => nodes.push(node),
        }
    }
    nodes
}

fn push_mark(children: Vec<Fragment>, mark_type: MarkType) -> Vec<Fragment> {
    children
        .into_iter()
        .map(|fragment| match fragment {
            Fragment::Leaf(mut leaf) => {
                leaf.marks.push(Mark::new(mark_type));
                Fragment::Leaf(leaf)
            }
            node => node,
        })
        .collect()
}

/// Strategy object the parser and inline lexer call to materialize concrete
/// tree nodes. Swappable to target a different host tree schema; the
/// engine-native implementation is [`TreeRenderer`].
pub trait Renderer {
    fn code(&self, text: &str, lang: Option<&str>, options: &Options) -> Node;
    fn blockquote(&self, children: Vec<Fragment>) -> Node;
    fn heading(&self, children: Vec<Fragment>, depth: u8) -> Node;
    fn hr(&self) -> Node;
    fn list(&self, children: Vec<Fragment>, ordered: bool) -> Node;
    fn listitem(&self, children: Vec<Fragment>, checked: Option<bool>) -> Node;
    fn paragraph(&self, children: Vec<Fragment>) -> Node;
    fn table(&self, children: Vec<Fragment>) -> Node;
    fn table_row(&self, children: Vec<Fragment>) -> Node;
    fn table_cell(&self, children: Vec<Fragment>, head: bool, align: Alignment) -> Node;

    fn strong(&self, children: Vec<Fragment>) -> Vec<Fragment>;
    fn em(&self, children: Vec<Fragment>) -> Vec<Fragment>;
    fn del(&self, children: Vec<Fragment>) -> Vec<Fragment>;
    fn ins(&self, children: Vec<Fragment>) -> Vec<Fragment>;
    fn codespan(&self, text: &str) -> Fragment;
    fn br(&self) -> Fragment;
    fn link(&self, href: &str, title: Option<&str>, children: Vec<Fragment>) -> Fragment;
    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> Fragment;
    fn text(&self, text: &str) -> Fragment;
}

/// Builds the engine's own node model.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    /// A code block gets one `code-line` child per source line; the language
    /// tag is prefixed with `options.lang_prefix` and stored in `data`.
    fn code(&self, text: &str, lang: Option<&str>, options: &Options) -> Node {
        let mut data = Data::new();
        if let Some(lang) = lang {
            data.insert(
                "language".into(),
                Value::String(format!("{}{lang}", options.lang_prefix)),
            );
        }
        let lines = text
            .split('\n')
            .map(|line| Node::block(BlockType::CodeLine, vec![Node::plain_text(line)]))
            .collect();
        Node::block_with_data(BlockType::Code, lines, data)
    }

    fn blockquote(&self, children: Vec<Fragment>) -> Node {
        Node::block(BlockType::BlockQuote, group_text_in_ranges(children))
    }

    fn heading(&self, children: Vec<Fragment>, depth: u8) -> Node {
        Node::block(BlockType::heading(depth), group_text_in_ranges(children))
    }

    fn hr(&self) -> Node {
        Node::block(BlockType::HorizontalRule, vec![Node::plain_text("")])
    }

    /// Upgrades to a todo list when any item carries a `checked` flag.
    fn list(&self, children: Vec<Fragment>, ordered: bool) -> Node {
        let nodes = group_text_in_ranges(children);
        let todo = nodes.iter().any(|node| node.data_bool("checked").is_some());
        let block_type = if todo {
            BlockType::TodoList
        } else if ordered {
            BlockType::OrderedList
        } else {
            BlockType::BulletedList
        };
        Node::block(block_type, nodes)
    }

    fn listitem(&self, children: Vec<Fragment>, checked: Option<bool>) -> Node {
        let mut data = Data::new();
        if let Some(checked) = checked {
            data.insert("checked".into(), Value::Bool(checked));
        }
        Node::block_with_data(BlockType::ListItem, group_text_in_ranges(children), data)
    }

    fn paragraph(&self, children: Vec<Fragment>) -> Node {
        Node::block(BlockType::Paragraph, group_text_in_ranges(children))
    }

    fn table(&self, children: Vec<Fragment>) -> Node {
        Node::block(BlockType::Table, group_text_in_ranges(children))
    }

    fn table_row(&self, children: Vec<Fragment>) -> Node {
        Node::block(BlockType::TableRow, group_text_in_ranges(children))
    }

    fn table_cell(&self, children: Vec<Fragment>, head: bool, align: Alignment) -> Node {
        let block_type = if head {
            BlockType::TableHead
        } else {
            BlockType::TableCell
        };
        let mut data = Data::new();
        if head {
            let align = match align {
                Alignment::Left => Some("left"),
                Alignment::Center => Some("center"),
                Alignment::Right => Some("right"),
                Alignment::None => None,
            };
            if let Some(align) = align {
                data.insert("align".into(), Value::String(align.into()));
            }
        }
        Node::block_with_data(block_type, group_text_in_ranges(children), data)
    }

    fn strong(&self, children: Vec<Fragment>) -> Vec<Fragment> {
        push_mark(children, MarkType::Bold)
    }

    fn em(&self, children: Vec<Fragment>) -> Vec<Fragment> {
        push_mark(children, MarkType::Italic)
    }

    fn del(&self, children: Vec<Fragment>) -> Vec<Fragment> {
        push_mark(children, MarkType::Deleted)
    }

    fn ins(&self, children: Vec<Fragment>) -> Vec<Fragment> {
        push_mark(children, MarkType::Inserted)
    }

    fn codespan(&self, text: &str) -> Fragment {
        Fragment::Leaf(Leaf {
            text: text.into(),
            marks: vec![Mark::new(MarkType::Code)],
        })
    }

    fn br(&self) -> Fragment {
        Fragment::leaf("\n")
    }

    fn link(&self, href: &str, title: Option<&str>, children: Vec<Fragment>) -> Fragment {
        let mut data = Data::new();
        data.insert("href".into(), Value::String(href.into()));
        if let Some(title) = title {
            data.insert("title".into(), Value::String(title.into()));
        }
        Fragment::Node(Node::Inline {
            inline_type: InlineType::Link,
            nodes: group_text_in_ranges(children),
            data,
        })
    }

    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> Fragment {
        let mut data = Data::new();
        data.insert("src".into(), Value::String(src.into()));
        if let Some(title) = title {
            data.insert("title".into(), Value::String(title.into()));
        }
        if !alt.is_empty() {
            data.insert("alt".into(), Value::String(alt.into()));
        }
        Fragment::Node(Node::block_with_data(
            BlockType::Image,
            vec![Node::plain_text("")],
            data,
        ))
    }

    fn text(&self, text: &str) -> Fragment {
        Fragment::leaf(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adjacent_leaves_group_into_one_text_node() {
        let fragments = vec![
            Fragment::leaf("a"),
            Fragment::leaf("b"),
            Fragment::Node(Node::block(BlockType::Paragraph, vec![])),
            Fragment::leaf("c"),
        ];
        let nodes = group_text_in_ranges(fragments);
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[0],
            Node::text(vec![Range::plain("a"), Range::plain("b")])
        );
        assert_eq!(nodes[2], Node::text(vec![Range::plain("c")]));
    }

    #[test]
    fn marks_stack_on_leaves_only() {
        let renderer = TreeRenderer;
        let fragments = renderer.strong(renderer.em(vec![
            Fragment::leaf("x"),
            Fragment::Node(Node::block(BlockType::Image, vec![])),
        ]));
        match &fragments[0] {
            Fragment::Leaf(leaf) => {
                let types: Vec<_> = leaf.marks.iter().map(|m| m.mark_type).collect();
                assert_eq!(types, vec![MarkType::Italic, MarkType::Bold]);
            }
            other => panic!("expected leaf, got {other:?}"),
        }
        assert!(matches!(fragments[1], Fragment::Node(_)));
    }

    #[test]
    fn code_block_splits_into_code_lines() {
        let node = TreeRenderer.code("a\nb", Some("rust"), &Options::default());
        assert_eq!(node.data_str("language"), Some("lang-rust"));
        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.children()[0],
            Node::block(BlockType::CodeLine, vec![Node::plain_text("a")])
        );
    }

    #[test]
    fn list_with_checked_item_becomes_todo_list() {
        let renderer = TreeRenderer;
        let item = renderer.listitem(vec![Fragment::leaf("task")], Some(true));
        let list = renderer.list(vec![Fragment::Node(item)], false);
        assert!(matches!(
            list,
            Node::Block {
                block_type: BlockType::TodoList,
                ..
            }
        ));
    }

    #[test]
    fn head_cell_records_alignment() {
        let cell = TreeRenderer.table_cell(vec![Fragment::leaf("h")], true, Alignment::Center);
        assert_eq!(cell.data_str("align"), Some("center"));
    }
}
