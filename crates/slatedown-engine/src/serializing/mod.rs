//! Rich-text tree to Markdown serialization.
//!
//! [`Markdown`] walks a [`Document`] children-first, formatting every node
//! through an ordered rule list. Custom rules registered by the caller run
//! before the built-in formats, so any node or mark type can be overridden
//! without touching the engine.

mod rules;

use crate::error::ParseError;
use crate::models::{Document, Mark, Node};
use crate::options::Options;

use rules::TableState;

/// The value a serialization rule is asked to format.
pub enum RuleInput<'a> {
    /// The raw text of a leaf range, before marks wrap it.
    String(&'a str),
    /// A block, inline, or text node with its children already rendered.
    Node(&'a Node),
    /// A mark wrapping already-rendered children.
    Mark(&'a Mark),
}

/// The parent of the node currently being serialized.
pub enum Parent<'a> {
    Document,
    Node(&'a Node),
}

/// A serialization rule. Returns `Some` with the rendered output to claim
/// the input, or `None` to pass it to the next rule.
pub type Rule = Box<dyn Fn(&RuleInput<'_>, &str, &Parent<'_>) -> Option<String>>;

/// Markdown serializer with an overridable rule list.
pub struct Markdown {
    rules: Vec<Rule>,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Builds a serializer whose `rules` are consulted before the built-in
    /// formats, in order.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parses a Markdown string into a document tree.
    pub fn deserialize(&self, source: &str, options: &Options) -> Result<Document, ParseError> {
        crate::parse(source, options)
    }

    /// Serializes a document tree back to a Markdown string.
    pub fn serialize(&self, document: &Document) -> String {
        let mut state = TableState::default();
        let rendered: Vec<String> = document
            .nodes
            .iter()
            .map(|node| self.serialize_node(node, &Parent::Document, &mut state))
            .collect();
        rendered.join("\n").trim_start().to_string()
    }

    fn serialize_node(&self, node: &Node, parent: &Parent<'_>, state: &mut TableState) -> String {
        if let Node::Text { ranges } = node {
            return ranges
                .iter()
                .map(|range| self.serialize_range(&range.text, &range.marks, parent))
                .collect();
        }

        let children: String = node
            .children()
            .iter()
            .map(|child| self.serialize_node(child, &Parent::Node(node), state))
            .collect();

        let input = RuleInput::Node(node);
        for rule in &self.rules {
            if let Some(out) = rule(&input, &children, parent) {
                return out;
            }
        }
        rules::serialize_block(node, &children, parent, state).unwrap_or_default()
    }

    fn serialize_range(&self, text: &str, marks: &[Mark], parent: &Parent<'_>) -> String {
        let mut out = self.apply_rules(&RuleInput::String(text), text, parent);
        for mark in marks {
            let input = RuleInput::Mark(mark);
            out = match self.first_rule(&input, &out, parent) {
                Some(wrapped) => wrapped,
                None => rules::serialize_mark(mark, &out),
            };
        }
        out
    }

    fn apply_rules(&self, input: &RuleInput<'_>, fallback: &str, parent: &Parent<'_>) -> String {
        self.first_rule(input, fallback, parent)
            .unwrap_or_else(|| fallback.to_string())
    }

    fn first_rule(
        &self,
        input: &RuleInput<'_>,
        children: &str,
        parent: &Parent<'_>,
    ) -> Option<String> {
        self.rules.iter().find_map(|rule| rule(input, children, parent))
    }
}
