use crate::models::{BlockType, InlineType, Mark, MarkType, Node};
use crate::urls;

use super::Parent;

/// Pending table-header separator line, assembled while the head cells of a
/// table serialize and flushed after the first row. Call-local so parallel
/// serialization of independent trees stays safe.
#[derive(Default)]
pub(crate) struct TableState {
    pub(crate) header: String,
}

/// The built-in node formatting contracts. Returns `None` for nodes the
/// engine does not know, which serialize to nothing.
pub(crate) fn serialize_block(
    node: &Node,
    children: &str,
    parent: &Parent<'_>,
    state: &mut TableState,
) -> Option<String> {
    match node {
        Node::Block { block_type, .. } => match block_type {
            BlockType::Table => {
                state.header.clear();
                Some(children.to_string())
            }
            BlockType::TableHead => {
                state.header.push_str(match node.data_str("align") {
                    Some("left") => "|:--- ",
                    Some("center") => "|:---:",
                    Some("right") => "| ---:",
                    _ => "| --- ",
                });
                Some(format!("| {children} "))
            }
            BlockType::TableRow => {
                let mut out = format!("{children}|\n");
                if !state.header.is_empty() {
                    out.push_str(&state.header);
                    out.push_str("|\n");
                    state.header.clear();
                }
                Some(out)
            }
            BlockType::TableCell => Some(format!("| {children} ")),
            BlockType::Paragraph => {
                if parent_is(parent, BlockType::ListItem) {
                    Some(children.to_string())
                } else {
                    Some(format!("\n{children}\n"))
                }
            }
            BlockType::Code => Some(format!("```\n{children}\n```\n")),
            BlockType::CodeLine => Some(format!("{children}\n")),
            BlockType::BlockQuote => Some(format!("> {children}\n")),
            BlockType::TodoList | BlockType::BulletedList | BlockType::OrderedList => {
                if matches!(parent, Parent::Document) {
                    Some(children.to_string())
                } else {
                    Some(format!("\n{}", indent(children)))
                }
            }
            BlockType::ListItem => {
                let bullet = if parent_is(parent, BlockType::OrderedList) {
                    "1. "
                } else if parent_is(parent, BlockType::TodoList) {
                    if node.data_bool("checked").unwrap_or(false) {
                        "[x] "
                    } else {
                        "[ ] "
                    }
                } else {
                    "* "
                };
                Some(format!("{bullet}{children}\n"))
            }
            BlockType::Heading1 => Some(format!("# {children}")),
            BlockType::Heading2 => Some(format!("## {children}")),
            BlockType::Heading3 => Some(format!("### {children}")),
            BlockType::Heading4 => Some(format!("#### {children}")),
            BlockType::Heading5 => Some(format!("##### {children}")),
            BlockType::Heading6 => Some(format!("###### {children}")),
            BlockType::HorizontalRule => Some("---\n".to_string()),
            BlockType::Image => {
                let alt = node.data_str("alt").unwrap_or("");
                let src = urls::encode(node.data_str("src").unwrap_or(""));
                Some(format!("![{alt}]({src})\n"))
            }
        },
        Node::Inline {
            inline_type: InlineType::Link,
            ..
        } => {
            let href = urls::encode(node.data_str("href").unwrap_or(""));
            Some(format!("[{}]({href})", children.trim()))
        }
        Node::Text { .. } => None,
    }
}

pub(crate) fn serialize_mark(mark: &Mark, children: &str) -> String {
    match mark.mark_type {
        MarkType::Bold => format!("**{children}**"),
        MarkType::Italic => format!("*{children}*"),
        MarkType::Code => format!("`{children}`"),
        MarkType::Inserted => format!("++{children}++"),
        MarkType::Deleted => format!("~~{children}~~"),
    }
}

fn parent_is(parent: &Parent<'_>, block_type: BlockType) -> bool {
    matches!(parent, Parent::Node(Node::Block { block_type: t, .. }) if *t == block_type)
}

/// Indents nested list content by three spaces per line.
fn indent(children: &str) -> String {
    children
        .split_inclusive('\n')
        .map(|line| format!("   {line}"))
        .collect()
}
