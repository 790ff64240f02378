//! Navigation node data model: raw nodes, tiers and their visual classes.

use serde::Deserialize;

/// Suffix appended to a label-derived href when a node carries no url.
pub const PAGE_SUFFIX: &str = ".html";

/// One entry of the navigation document.
///
/// `children` order is significant: it is both the default render order and
/// the order `sort_default` restores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: None,
            children: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The link target: the explicit url, or one derived from the label.
    pub fn href(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => derive_href(&self.label),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// Derive a page href from a label: whitespace runs become one underscore,
/// then [`PAGE_SUFFIX`] is appended.
///
/// ```
/// use treenav::nav::derive_href;
///
/// assert_eq!(derive_href("Getting  Started"), "Getting_Started.html");
/// ```
pub fn derive_href(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + PAGE_SUFFIX.len());
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out.push_str(PAGE_SUFFIX);
    out
}

// ============================================================================
// Tier
// ============================================================================

/// Depth of a node in the tree. Tier 1 nodes are top-level and tab-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tier(u16);

impl Tier {
    pub const TOP: Tier = Tier(1);

    /// Deepest tier with its own visual convention.
    pub const MAX_STYLED: u16 = 5;

    pub fn new(depth: u16) -> Self {
        Self(depth.max(1))
    }

    pub fn depth(self) -> u16 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn is_top_level(self) -> bool {
        self.0 == 1
    }

    pub fn class(self) -> TierClass {
        match self.0.min(Self::MAX_STYLED) {
            1 => TierClass::Parent,
            n => TierClass::Child((n - 1) as u8),
        }
    }
}

/// Visual classification of a tier.
///
/// `Child(n)` is the n-th nesting level below the top; tiers deeper than
/// [`Tier::MAX_STYLED`] reuse the deepest child class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierClass {
    Parent,
    Child(u8),
}

impl TierClass {
    pub fn item_class(self) -> &'static str {
        match self {
            Self::Parent => "nav-item-parent",
            Self::Child(1) => "nav-item-child-lvl-1",
            Self::Child(2) => "nav-item-child-lvl-2",
            Self::Child(3) => "nav-item-child-lvl-3",
            Self::Child(_) => "nav-item-child-lvl-4",
        }
    }

    /// Theme role used to style labels of this class.
    pub fn theme_role(self) -> &'static str {
        match self {
            Self::Parent => "tier_1",
            Self::Child(1) => "tier_2",
            Self::Child(2) => "tier_3",
            Self::Child(3) => "tier_4",
            Self::Child(_) => "tier_5",
        }
    }
}

/// Title classification carried by top-level elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClass {
    /// The element is shown as the active tab's title.
    Active,
    /// The element is shown as a search result group.
    Filtering,
}
