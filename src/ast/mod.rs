//! Document tree for sml documents.
//!
//! A document is a single root [`TagNode`]. Tag nodes own their children
//! exclusively; there are no back references and no sharing, so the tree is
//! strictly hierarchical. Trees are built by [`TreeBuilder`] or by hand and
//! walked in pre-order through the [`Processor`] contract.
//!
//! [`TreeBuilder`]: crate::builder::TreeBuilder

// ============================================================================
// IMPORTS
// ============================================================================

use crate::errors::Result;
use crate::syntax::tag::Tag;
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A tag with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    pub tag: Tag,
    pub children: Vec<Node>,
}

/// Any node of a document.
///
/// # Examples
///
/// ```rust
/// use sml::ast::Node;
/// let node = Node::text("Text A");
/// assert_eq!(node.as_text(), Some("Text A"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Node {
    Tag(TagNode),
    /// Decoded text, escapes already resolved.
    Text(String),
    /// Verbatim content of a `{! ... !}` block.
    Raw(String),
    /// Verbatim content of a `{# ... #}` block.
    Comment(String),
}

/// Receiver of the pre-order traversal events.
pub trait Processor {
    fn open_tag(&mut self, tag: &Tag) -> Result<()>;
    fn close_tag(&mut self, tag: &Tag) -> Result<()>;
    fn text(&mut self, text: &str) -> Result<()>;
    fn raw(&mut self, raw: &str) -> Result<()>;
    fn comment(&mut self, comment: &str) -> Result<()>;
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl TagNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Builder-style variant of [`TagNode::push`].
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    /// Walks this node and its subtree in document order.
    pub fn process_with(&self, processor: &mut dyn Processor) -> Result<()> {
        walk(Step::Open(self), processor)
    }

    /// Number of tag nodes on the longest path from this node down, this
    /// node included.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(
                node.children
                    .iter()
                    .filter_map(Node::as_tag_node)
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }
}

/// Children are detached onto a worklist, so dropping a deep tree never
/// recurses per level.
impl Drop for TagNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Tag(mut inner) = node {
                pending.append(&mut inner.children);
            }
        }
    }
}

impl Node {
    pub fn tag_node(tag: Tag) -> Self {
        Node::Tag(TagNode::new(tag))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn raw(raw: impl Into<String>) -> Self {
        Node::Raw(raw.into())
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Node::Comment(comment.into())
    }

    pub fn as_tag_node(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Node::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&str> {
        match self {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// Walks this node and, for tag nodes, its subtree in document order.
    pub fn process_with(&self, processor: &mut dyn Processor) -> Result<()> {
        walk(Step::Visit(self), processor)
    }
}

impl From<TagNode> for Node {
    fn from(node: TagNode) -> Self {
        Node::Tag(node)
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

enum Step<'a> {
    Visit(&'a Node),
    Open(&'a TagNode),
    Close(&'a Tag),
}

/// Pre-order traversal on an explicit stack, so tree depth never turns into
/// call depth.
fn walk(start: Step<'_>, processor: &mut dyn Processor) -> Result<()> {
    let mut stack = vec![start];
    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(Node::Tag(node)) => stack.push(Step::Open(node)),
            Step::Open(node) => {
                processor.open_tag(&node.tag)?;
                stack.push(Step::Close(&node.tag));
                stack.extend(node.children.iter().rev().map(Step::Visit));
            }
            Step::Visit(Node::Text(text)) => processor.text(text)?,
            Step::Visit(Node::Raw(raw)) => processor.raw(raw)?,
            Step::Visit(Node::Comment(comment)) => processor.comment(comment)?,
            Step::Close(tag) => processor.close_tag(tag)?,
        }
    }
    Ok(())
}
