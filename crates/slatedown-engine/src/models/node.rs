use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arbitrary per-node attributes (`align`, `checked`, `src`, `alt`, ...).
///
/// Kept as a JSON object so host editors can round-trip attributes the engine
/// itself does not interpret.
pub type Data = serde_json::Map<String, Value>;

/// A node in the document tree shared between the parser and the serializer.
///
/// The JSON representation matches the host editor's document format:
/// `{"kind": "block", "type": "paragraph", "nodes": [...], "data": {...}}`.
/// Text content lives in `text` nodes as a list of [`Range`]s, each carrying
/// its own [`Mark`]s. Adjacent text siblings are always coalesced into one
/// `text` node with multiple ranges; the renderer maintains that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    #[serde(rename = "block")]
    Block {
        #[serde(rename = "type")]
        block_type: BlockType,
        #[serde(default)]
        nodes: Vec<Node>,
        #[serde(default, skip_serializing_if = "Data::is_empty")]
        data: Data,
    },
    #[serde(rename = "inline")]
    Inline {
        #[serde(rename = "type")]
        inline_type: InlineType,
        #[serde(default)]
        nodes: Vec<Node>,
        #[serde(default, skip_serializing_if = "Data::is_empty")]
        data: Data,
    },
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        ranges: Vec<Range>,
    },
}

impl Node {
    pub fn block(block_type: BlockType, nodes: Vec<Node>) -> Self {
        Node::Block {
            block_type,
            nodes,
            data: Data::new(),
        }
    }

    pub fn block_with_data(block_type: BlockType, nodes: Vec<Node>, data: Data) -> Self {
        Node::Block {
            block_type,
            nodes,
            data,
        }
    }

    pub fn text(ranges: Vec<Range>) -> Self {
        Node::Text { ranges }
    }

    /// A text node holding a single unmarked range.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Node::Text {
            ranges: vec![Range::plain(text)],
        }
    }

    /// Child nodes, empty for text nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block { nodes, .. } | Node::Inline { nodes, .. } => nodes,
            Node::Text { .. } => &[],
        }
    }

    /// Looks up a string-valued `data` attribute.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data()?.get(key)?.as_str()
    }

    /// Looks up a bool-valued `data` attribute.
    pub fn data_bool(&self, key: &str) -> Option<bool> {
        self.data()?.get(key)?.as_bool()
    }

    pub fn data(&self) -> Option<&Data> {
        match self {
            Node::Block { data, .. } | Node::Inline { data, .. } => Some(data),
            Node::Text { .. } => None,
        }
    }
}

/// The fixed set of block types the grammar produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    BlockQuote,
    BulletedList,
    OrderedList,
    TodoList,
    ListItem,
    Code,
    CodeLine,
    HorizontalRule,
    Image,
    Table,
    TableHead,
    TableRow,
    TableCell,
}

impl BlockType {
    /// Heading type for a depth clamped to 1..=6.
    pub fn heading(depth: u8) -> Self {
        match depth {
            0 | 1 => BlockType::Heading1,
            2 => BlockType::Heading2,
            3 => BlockType::Heading3,
            4 => BlockType::Heading4,
            5 => BlockType::Heading5,
            _ => BlockType::Heading6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineType {
    Link,
}

/// A run of text with the marks that apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Range {
    pub fn plain(text: impl Into<String>) -> Self {
        Range {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// An inline formatting annotation attached to a [`Range`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    #[serde(default, skip_serializing_if = "Data::is_empty")]
    pub data: Data,
}

impl Mark {
    pub fn new(mark_type: MarkType) -> Self {
        Mark {
            mark_type,
            data: Data::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkType {
    Bold,
    Italic,
    Code,
    Inserted,
    Deleted,
}

/// The document envelope handed to (and accepted from) the host editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_serializes_with_kind_and_type() {
        let node = Node::block(BlockType::Paragraph, vec![Node::plain_text("hi")]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], json!("block"));
        assert_eq!(value["type"], json!("paragraph"));
        assert_eq!(value["nodes"][0]["kind"], json!("text"));
        assert_eq!(value["nodes"][0]["ranges"][0]["text"], json!("hi"));
    }

    #[test]
    fn kebab_case_type_names() {
        assert_eq!(
            serde_json::to_value(BlockType::BlockQuote).unwrap(),
            json!("block-quote")
        );
        assert_eq!(
            serde_json::to_value(BlockType::HorizontalRule).unwrap(),
            json!("horizontal-rule")
        );
        assert_eq!(
            serde_json::to_value(MarkType::Inserted).unwrap(),
            json!("inserted")
        );
    }

    #[test]
    fn empty_data_is_omitted() {
        let node = Node::block(BlockType::Paragraph, vec![]);
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = Document {
            nodes: vec![Node::block(
                BlockType::Heading1,
                vec![Node::plain_text("Title")],
            )],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn heading_depth_maps_to_type() {
        assert_eq!(BlockType::heading(1), BlockType::Heading1);
        assert_eq!(BlockType::heading(6), BlockType::Heading6);
    }
}
