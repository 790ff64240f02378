//! Tree realization.
//!
//! [`TreeBuilder`] turns raw [`Node`]s into a [`NavTree`]: an arena of
//! [`RealizedNode`]s with parent/child links stored as [`NodeKey`] indices.
//! The arena doubles as the identity registry (id → key), so reordering
//! operations relocate existing nodes instead of rebuilding them and every
//! per-node state (collapse flag, highlight, title class) survives.

use super::error::StructuralError;
use super::node::{Node, Tier, TitleClass};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// Index of a realized node inside its [`NavTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The child container owned by a node with children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub(crate) collapsed: bool,
    pub(crate) tab_key: Option<String>,
}

impl Submenu {
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Tab correlation key; only submenus of top-level nodes carry one.
    pub fn tab_key(&self) -> Option<&str> {
        self.tab_key.as_deref()
    }
}

/// A node after realization, with its display state.
#[derive(Debug, Clone)]
pub struct RealizedNode {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) href: String,
    pub(crate) tier: Tier,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) submenu: Option<Submenu>,
    pub(crate) hidden: bool,
    pub(crate) highlights: Vec<Range<usize>>,
    pub(crate) title: Option<TitleClass>,
}

impl RealizedNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Children in their current display order.
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn submenu(&self) -> Option<&Submenu> {
        self.submenu.as_ref()
    }

    /// `Some(collapsed)` for nodes owning a submenu, `None` for leaves.
    pub fn is_collapsed(&self) -> Option<bool> {
        self.submenu.as_ref().map(|s| s.collapsed)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_top_level(&self) -> bool {
        self.tier.is_top_level()
    }

    /// Tab correlation key for top-level nodes (equal to the id).
    pub fn tab_key(&self) -> Option<&str> {
        self.is_top_level().then_some(self.id.as_str())
    }

    /// Byte ranges of `label` wrapped in the search emphasis marker.
    pub fn highlights(&self) -> &[Range<usize>] {
        &self.highlights
    }

    pub fn title_class(&self) -> Option<TitleClass> {
        self.title
    }
}

// ============================================================================
// NavTree
// ============================================================================

/// The realized navigation hierarchy.
#[derive(Debug, Clone)]
pub struct NavTree {
    nodes: Vec<RealizedNode>,
    roots: Vec<NodeKey>,
    registry: HashMap<String, NodeKey>,
    original: Arc<[Node]>,
    rejected: Vec<StructuralError>,
}

impl NavTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in display order.
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Access a node by key.
    ///
    /// Keys are only handed out by this tree, so indexing cannot fail for
    /// keys obtained from it.
    pub fn node(&self, key: NodeKey) -> &RealizedNode {
        &self.nodes[key.0]
    }

    pub(crate) fn node_mut(&mut self, key: NodeKey) -> &mut RealizedNode {
        &mut self.nodes[key.0]
    }

    /// Identity registry lookup.
    pub fn lookup(&self, id: &str) -> Option<NodeKey> {
        self.registry.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&RealizedNode> {
        self.lookup(id).map(|key| self.node(key))
    }

    /// All keys in arena order. A parent always precedes its descendants,
    /// whatever the current display order is.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = NodeKey> + ExactSizeIterator {
        (0..self.nodes.len()).map(NodeKey)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Deep copy of the accepted input, in load order. Never mutated.
    pub fn original_order(&self) -> &[Node] {
        &self.original
    }

    /// Subtrees dropped during realization.
    pub fn rejected(&self) -> &[StructuralError] {
        &self.rejected
    }

    /// Labels of a node's children in display order; empty on a lookup miss.
    pub fn child_labels(&self, id: &str) -> Vec<&str> {
        self.lookup(id)
            .map(|key| {
                self.node(key)
                    .children
                    .iter()
                    .map(|&c| self.node(c).label.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Keys of nodes owning a submenu, in arena order.
    pub fn submenu_owners(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.keys().filter(|&k| self.node(k).submenu.is_some())
    }

    /// All keys in current display order (depth-first, pre-order).
    pub fn preorder(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.node(key).children.iter().rev().copied());
        }
        out
    }

    /// Whether a node is actually on screen: it is not hidden, and no
    /// ancestor is hidden or has its submenu collapsed.
    pub fn is_displayed(&self, key: NodeKey) -> bool {
        if self.node(key).hidden {
            return false;
        }
        let mut current = self.node(key).parent;
        while let Some(parent) = current {
            let node = self.node(parent);
            if node.hidden || node.is_collapsed() == Some(true) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Displayed nodes in display order.
    pub fn displayed(&self) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let node = self.node(key);
            if node.hidden {
                continue;
            }
            out.push(key);
            if node.is_collapsed() == Some(false) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// The whole tree as indented text in current display order, one node
    /// per line, ignoring collapse and hidden state.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for key in self.preorder() {
            let node = self.node(key);
            let depth = usize::from(node.tier.depth().saturating_sub(1));
            let marker = if node.submenu.is_some() { "+" } else { "-" };
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{marker} {} [{}] -> {}\n", node.label, node.id, node.href));
        }
        out
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<NodeKey>) {
        self.roots = roots;
    }

    pub(crate) fn set_children(&mut self, parent: NodeKey, children: Vec<NodeKey>) {
        self.nodes[parent.0].children = children;
    }
}

// ============================================================================
// TreeBuilder
// ============================================================================

/// Builds a [`NavTree`] from raw nodes.
///
/// The input is already an ordered sequence by type; documents whose root is
/// not an array are rejected earlier by the document parser, so a build never
/// renders partially because of shape. A node whose id is already registered
/// is dropped together with its subtree and recorded in
/// [`NavTree::rejected`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<RealizedNode>,
    registry: HashMap<String, NodeKey>,
    rejected: Vec<StructuralError>,
}

impl TreeBuilder {
    pub fn build(items: &[Node]) -> NavTree {
        let mut builder = Self::default();
        let (roots, accepted) = builder.build_level(items, Tier::TOP, None);

        tracing::debug!(
            nodes = builder.nodes.len(),
            tabs = roots.len(),
            rejected = builder.rejected.len(),
            "Realized navigation tree"
        );

        NavTree {
            nodes: builder.nodes,
            roots,
            registry: builder.registry,
            original: accepted.into(),
            rejected: builder.rejected,
        }
    }

    fn build_level(
        &mut self,
        items: &[Node],
        tier: Tier,
        parent: Option<NodeKey>,
    ) -> (Vec<NodeKey>, Vec<Node>) {
        let mut keys = Vec::with_capacity(items.len());
        let mut accepted = Vec::with_capacity(items.len());

        for item in items {
            if self.registry.contains_key(&item.id) {
                tracing::warn!(id = %item.id, "Duplicate node id, dropping subtree");
                self.rejected.push(StructuralError::DuplicateId {
                    id: item.id.clone(),
                });
                continue;
            }

            let key = self.realize(item, tier, parent);
            let (children, accepted_children) = if item.has_children() {
                self.build_level(&item.children, tier.next(), Some(key))
            } else {
                (Vec::new(), Vec::new())
            };

            let node = &mut self.nodes[key.0];
            if children.is_empty() {
                // Every child was rejected: no toggle, no container
                node.submenu = None;
            }
            node.children = children;

            keys.push(key);
            accepted.push(Node {
                id: item.id.clone(),
                label: item.label.clone(),
                url: item.url.clone(),
                children: accepted_children,
            });
        }

        (keys, accepted)
    }

    fn realize(&mut self, item: &Node, tier: Tier, parent: Option<NodeKey>) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        let top_level = tier.is_top_level();

        let submenu = item.has_children().then(|| Submenu {
            collapsed: true,
            tab_key: top_level.then(|| item.id.clone()),
        });

        self.nodes.push(RealizedNode {
            id: item.id.clone(),
            label: item.label.clone(),
            href: item.href(),
            tier,
            parent,
            children: Vec::new(),
            submenu,
            hidden: false,
            highlights: Vec::new(),
            title: top_level.then_some(TitleClass::Active),
        });
        self.registry.insert(item.id.clone(), key);
        key
    }
}
