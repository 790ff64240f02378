//! Tab registry: binds each top-level node to a tab and keeps exactly one
//! top-level subtree visible.

use super::builder::{NavTree, NodeKey};
use super::node::TitleClass;
use std::collections::HashMap;

/// One tab button and the top-level node it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    id: String,
    label: String,
    top_level: NodeKey,
}

impl TabEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn top_level(&self) -> NodeKey {
        self.top_level
    }
}

/// Mapping from tab id to its button and top-level element.
///
/// At most one tab is selected and at most one top-level subtree is marked
/// currently visible at any time.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<TabEntry>,
    index: HashMap<String, usize>,
    selected: Option<usize>,
    visible: Option<usize>,
}

impl TabRegistry {
    /// One tab per top-level node, in load order.
    pub fn from_tree(tree: &NavTree) -> Self {
        let mut registry = Self::default();
        for &key in tree.roots() {
            let node = tree.node(key);
            if registry.index.contains_key(node.id()) {
                continue;
            }
            registry
                .index
                .insert(node.id().to_string(), registry.tabs.len());
            registry.tabs.push(TabEntry {
                id: node.id().to_string(),
                label: node.label().to_string(),
                top_level: key,
            });
        }
        registry
    }

    pub fn tabs(&self) -> &[TabEntry] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.map(|i| self.tabs[i].id.as_str())
    }

    pub fn visible_id(&self) -> Option<&str> {
        self.visible.map(|i| self.tabs[i].id.as_str())
    }

    pub fn is_selected(&self, tab_id: &str) -> bool {
        self.selected_id() == Some(tab_id)
    }

    /// The tab to restore after sort or search-clear: the last selected tab,
    /// else the first one.
    pub fn restore_target(&self) -> Option<&str> {
        self.selected_id()
            .or_else(|| self.tabs.first().map(|t| t.id.as_str()))
    }

    /// The tab `offset` positions away from the selected one, wrapping around.
    pub fn neighbor(&self, offset: isize) -> Option<&str> {
        if self.tabs.is_empty() {
            return None;
        }
        let len = self.tabs.len() as isize;
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        Some(self.tabs[next].id.as_str())
    }

    /// Select a tab and show only its top-level subtree.
    ///
    /// Unknown ids are a silent no-op returning `false`. Selecting the
    /// already-selected tab again leaves the state unchanged.
    pub fn select_tab(&mut self, tree: &mut NavTree, tab_id: &str) -> bool {
        let Some(&target) = self.index.get(tab_id) else {
            tracing::debug!(tab = %tab_id, "Select on unknown tab ignored");
            return false;
        };

        // Selection marker moves; only one button carries it
        self.selected = Some(target);

        // Any other top-level subtree (including ones a search pass revealed)
        // goes away
        for (i, tab) in self.tabs.iter().enumerate() {
            if i != target {
                tree.node_mut(tab.top_level).hidden = true;
            }
        }

        let node = tree.node_mut(self.tabs[target].top_level);
        node.hidden = false;
        node.title = Some(TitleClass::Active);
        if let Some(submenu) = node.submenu.as_mut() {
            submenu.collapsed = false;
        }
        self.visible = Some(target);

        tracing::debug!(tab = %tab_id, "Selected tab");
        true
    }
}
