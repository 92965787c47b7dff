pub mod node;

pub use node::{BlockType, Data, Document, InlineType, Mark, MarkType, Node, Range};
