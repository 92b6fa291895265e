//! Outline tree rebuilt from a flat, level-tagged headline sequence.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Children
//! lists own the structure; the parent index is only followed when the level
//! drops and the builder has to climb back to an ancestor.

use serde::{Deserialize, Serialize};

use super::headlines::Headline;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub level: usize,
    pub text: Option<String>,
    pub anchor: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl OutlineNode {
    fn new(level: usize, parent: Option<NodeId>) -> Self {
        Self {
            level,
            text: None,
            anchor: None,
            children: Vec::new(),
            parent,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Filler node inserted to bridge a skipped level
    pub fn is_synthetic(&self) -> bool {
        self.text.is_none() && self.anchor.is_none()
    }
}

/// Nested snapshot of an outline, for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: usize,
    pub text: Option<String>,
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
}

impl Outline {
    pub const ROOT: NodeId = 0;

    /// Build the tree in a single forward pass.
    ///
    /// The root sits one level above the shallowest headline. A level jump of
    /// `k` creates `k` nested nodes and only the deepest one receives the
    /// headline; the others stay empty. An empty sequence gives a root with
    /// no children.
    pub fn build(headlines: &[Headline]) -> Self {
        let root_level = headlines
            .iter()
            .map(|h| h.level)
            .min()
            .map_or(0, |min| min.saturating_sub(1));
        let mut outline = Outline {
            nodes: vec![OutlineNode::new(root_level, None)],
        };

        let mut current_root = Self::ROOT;
        let mut prev_item = Self::ROOT;

        for headline in headlines {
            let prev_level = outline.nodes[prev_item].level;

            if headline.level > prev_level {
                for _ in prev_level..headline.level {
                    current_root = prev_item;
                    let level = outline.nodes[current_root].level + 1;
                    prev_item = outline.append(current_root, level);
                }
                outline.fill(prev_item, headline);
            } else if headline.level == prev_level {
                prev_item = outline.append(current_root, headline.level);
                outline.fill(prev_item, headline);
            } else {
                for _ in headline.level..prev_level {
                    match outline.nodes[current_root].parent {
                        Some(parent) => current_root = parent,
                        None => break,
                    }
                }
                prev_item = outline.append(current_root, headline.level);
                outline.fill(prev_item, headline);
            }
        }

        outline
    }

    fn append(&mut self, parent: NodeId, level: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(OutlineNode::new(level, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    fn fill(&mut self, id: NodeId, headline: &Headline) {
        let node = &mut self.nodes[id];
        node.text = headline.text.clone();
        node.anchor = headline.anchor.clone();
    }

    pub fn root(&self) -> &OutlineNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &OutlineNode)> + '_ {
        self.nodes[id]
            .children
            .iter()
            .map(move |&child| (child, &self.nodes[child]))
    }

    /// True when the outline has nothing to show
    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    /// Number of nodes below the root, synthetic ones included
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Pre-order walk over every node below the root
    pub fn iter(&self) -> PreOrder<'_> {
        let mut stack = self.root().children.clone();
        stack.reverse();
        PreOrder { outline: self, stack }
    }

    /// Distance from the root, 1 for the root's children
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.nodes[id].parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.nodes[parent].parent;
        }
        depth
    }

    pub fn to_entries(&self) -> Vec<OutlineEntry> {
        self.entries_below(Self::ROOT)
    }

    fn entries_below(&self, id: NodeId) -> Vec<OutlineEntry> {
        self.children(id)
            .map(|(child, node)| OutlineEntry {
                level: node.level,
                text: node.text.clone(),
                anchor: node.anchor.clone(),
                children: self.entries_below(child),
            })
            .collect()
    }

    /// Render as an indented markdown list of links
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        for id in self.iter() {
            let node = self.node(id);
            let indent = "  ".repeat(self.depth(id) - 1);
            match (&node.text, &node.anchor) {
                (Some(text), Some(anchor)) => md.push_str(&format!("{}* [{}](#{})\n", indent, text, anchor)),
                (Some(text), None) => md.push_str(&format!("{}* {}\n", indent, text)),
                (None, Some(anchor)) => md.push_str(&format!("{}* [](#{})\n", indent, anchor)),
                (None, None) => md.push_str(&format!("{}*\n", indent)),
            }
        }
        md
    }
}

/// Pre-order iterator over outline node ids
pub struct PreOrder<'a> {
    outline: &'a Outline,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.outline.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}
