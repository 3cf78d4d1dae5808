//! Builder assembling the document tree.

use super::{Builder, ALREADY_DONE, NOT_YET_DONE};
use crate::ast::{Node, TagNode};
use crate::errors::{Result, SmlError};
use crate::syntax::tag::Tag;

/// Assembles a [`TagNode`] tree from builder events.
///
/// Open tags live on a frame stack; a frame is attached to its parent only
/// when its closing event arrives. Closing the last frame completes the root.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<TagNode>,
    root: Option<TagNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.root.is_some()
    }

    /// Number of currently open tags.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The completed root; fails until the outermost tag is closed.
    pub fn root(&self) -> Result<&TagNode> {
        self.root
            .as_ref()
            .ok_or_else(|| SmlError::protocol(NOT_YET_DONE))
    }

    pub fn into_root(self) -> Result<TagNode> {
        self.root.ok_or_else(|| SmlError::protocol(NOT_YET_DONE))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_done() {
            return Err(SmlError::protocol(ALREADY_DONE));
        }
        Ok(())
    }

    fn append(&mut self, node: Node, what: &str) -> Result<()> {
        self.ensure_open()?;
        match self.stack.last_mut() {
            Some(frame) => {
                frame.children.push(node);
                Ok(())
            }
            None => Err(SmlError::protocol(format!("no opening tag for {what}"))),
        }
    }
}

impl Builder for TreeBuilder {
    fn begin_tag_node(&mut self, tag: Tag) -> Result<()> {
        self.ensure_open()?;
        log::trace!("begin tag node {tag} at depth {}", self.stack.len());
        self.stack.push(TagNode::new(tag));
        Ok(())
    }

    fn end_tag_node(&mut self) -> Result<()> {
        self.ensure_open()?;
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| SmlError::protocol("no opening tag"))?;
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(Node::Tag(frame)),
            None => self.root = Some(frame),
        }
        Ok(())
    }

    fn text_node(&mut self, text: String) -> Result<()> {
        self.append(Node::Text(text), "text")
    }

    fn raw_node(&mut self, raw: String) -> Result<()> {
        self.append(Node::Raw(raw), "raw text")
    }

    fn comment_node(&mut self, comment: String) -> Result<()> {
        self.append(Node::Comment(comment), "comment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: &str) -> Tag {
        Tag::new(raw).unwrap()
    }

    #[test]
    fn builds_nested_structure_by_hand() {
        let mut builder = TreeBuilder::new();
        builder.begin_tag_node(tag("root")).unwrap();
        builder.text_node("Text A".into()).unwrap();
        builder.comment_node("A first comment.".into()).unwrap();
        builder.begin_tag_node(tag("sub-a:1st:important")).unwrap();
        builder.raw_node("func()".into()).unwrap();
        builder.end_tag_node().unwrap();
        assert!(!builder.is_done());
        builder.end_tag_node().unwrap();

        let root = builder.root().unwrap();
        assert_eq!(root.tag, ["root"]);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].as_text(), Some("Text A"));
        assert_eq!(root.children[1].as_comment(), Some("A first comment."));
        let sub = root.children[2].as_tag_node().unwrap();
        assert_eq!(sub.tag, ["sub-a", "1st", "important"]);
        assert_eq!(sub.children, vec![Node::raw("func()")]);
    }

    #[test]
    fn root_is_stable_across_calls() {
        let mut builder = TreeBuilder::new();
        builder.begin_tag_node(tag("a")).unwrap();
        builder.end_tag_node().unwrap();
        let first = builder.root().unwrap() as *const TagNode;
        let second = builder.root().unwrap() as *const TagNode;
        assert_eq!(first, second);
    }

    #[test]
    fn root_before_completion_fails() {
        let mut builder = TreeBuilder::new();
        assert!(matches!(builder.root(), Err(SmlError::Protocol { .. })));
        builder.begin_tag_node(tag("a")).unwrap();
        let err = builder.root().unwrap_err();
        assert_eq!(err.to_string(), "protocol error: building is not yet done");
    }

    #[test]
    fn content_without_open_tag_is_rejected() {
        let mut builder = TreeBuilder::new();
        assert!(matches!(builder.text_node("x".into()), Err(SmlError::Protocol { .. })));
        assert!(matches!(builder.raw_node("x".into()), Err(SmlError::Protocol { .. })));
        assert!(matches!(builder.comment_node("x".into()), Err(SmlError::Protocol { .. })));
        assert!(matches!(builder.end_tag_node(), Err(SmlError::Protocol { .. })));
    }

    #[test]
    fn events_after_completion_are_rejected() {
        let mut builder = TreeBuilder::new();
        builder.begin_tag_node(tag("a")).unwrap();
        builder.end_tag_node().unwrap();
        for result in [
            builder.begin_tag_node(tag("b")),
            builder.end_tag_node(),
            builder.text_node("x".into()),
            builder.raw_node("x".into()),
            builder.comment_node("x".into()),
        ] {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "protocol error: building is already done");
        }
    }
}
