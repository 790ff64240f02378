//! Per-submenu expansion records and the two global expansion modes.

use super::builder::{NavTree, NodeKey};
use super::node::Tier;
use std::collections::HashMap;

/// Records collapsed/expanded status per submenu, keyed by the owning node id.
///
/// Records are independent of how a submenu is currently displayed: they are
/// written when a toggle is exercised and when a search session snapshots the
/// tree, and read back while filtering. The store also owns the global
/// expansion mode (`is_expanded`) that sort, tab and search-clear operations
/// re-apply.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStateStore {
    records: HashMap<String, bool>,
    is_expanded: bool,
}

impl ExpansionStateStore {
    pub fn new(start_expanded: bool) -> Self {
        Self {
            records: HashMap::new(),
            is_expanded: start_expanded,
        }
    }

    /// Tier default for a submenu owned by a node at `owner`: submenus listing
    /// tier-2 nodes stay open, deeper ones start collapsed.
    pub fn default_collapsed(owner: Tier) -> bool {
        owner.depth() >= 2
    }

    pub fn record_visibility(&mut self, submenu_id: &str, collapsed: bool) {
        self.records.insert(submenu_id.to_string(), collapsed);
    }

    /// The recorded collapsed flag, or `None` when nothing was recorded.
    pub fn visibility_of(&self, submenu_id: &str) -> Option<bool> {
        self.records.get(submenu_id).copied()
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn expand_all(&mut self, tree: &mut NavTree) {
        for key in tree.submenu_owners().collect::<Vec<_>>() {
            set_collapsed(tree, key, false);
        }
        self.is_expanded = true;
        tracing::debug!("Expanded all submenus");
    }

    /// Collapse everything below the first level of children.
    pub fn collapse_all(&mut self, tree: &mut NavTree) {
        for key in tree.submenu_owners().collect::<Vec<_>>() {
            let collapsed = Self::default_collapsed(tree.node(key).tier());
            set_collapsed(tree, key, collapsed);
        }
        self.is_expanded = false;
        tracing::debug!("Collapsed submenus below tier 2");
    }

    /// Re-apply whichever global mode is active.
    pub fn apply_mode(&mut self, tree: &mut NavTree) {
        if self.is_expanded {
            self.expand_all(tree);
        } else {
            self.collapse_all(tree);
        }
    }

    /// Flip a submenu and record the resulting state.
    ///
    /// Returns the new collapsed flag, or `None` when `submenu_id` is unknown
    /// or owns no submenu.
    pub fn toggle(&mut self, tree: &mut NavTree, submenu_id: &str) -> Option<bool> {
        let Some(key) = tree.lookup(submenu_id) else {
            tracing::debug!(id = %submenu_id, "Toggle on unknown node ignored");
            return None;
        };
        let submenu = tree.node_mut(key).submenu.as_mut()?;
        submenu.collapsed = !submenu.collapsed;
        let collapsed = submenu.collapsed;
        self.record_visibility(submenu_id, collapsed);
        Some(collapsed)
    }

    /// Put every submenu that has a record back into its recorded state.
    pub fn restore(&self, tree: &mut NavTree) {
        for key in tree.submenu_owners().collect::<Vec<_>>() {
            if let Some(collapsed) = self.visibility_of(tree.node(key).id()) {
                set_collapsed(tree, key, collapsed);
            }
        }
    }

    /// Record the live collapsed flag of every submenu.
    pub fn snapshot(&mut self, tree: &NavTree) {
        for key in tree.submenu_owners() {
            let node = tree.node(key);
            if let Some(collapsed) = node.is_collapsed() {
                self.records.insert(node.id().to_string(), collapsed);
            }
        }
    }
}

fn set_collapsed(tree: &mut NavTree, key: NodeKey, collapsed: bool) {
    if let Some(submenu) = tree.node_mut(key).submenu.as_mut() {
        submenu.collapsed = collapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::builder::TreeBuilder;
    use crate::nav::node::Node;

    fn deep_tree() -> NavTree {
        TreeBuilder::build(&[
            Node::new("A", "Alpha").with_children(vec![Node::new("A1", "One").with_children(
                vec![Node::new("A1a", "Deep").with_children(vec![Node::new("A1a1", "Deeper")])],
            )]),
            Node::new("B", "Beta").with_children(vec![Node::new("B1", "Ball")]),
        ])
    }

    fn collapsed(tree: &NavTree, id: &str) -> Option<bool> {
        tree.by_id(id).and_then(|n| n.is_collapsed())
    }

    #[test]
    fn test_expand_all() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();
        store.expand_all(&mut tree);

        assert!(store.is_expanded());
        for id in ["A", "A1", "A1a", "B"] {
            assert_eq!(collapsed(&tree, id), Some(false), "{id} should be open");
        }
    }

    #[test]
    fn test_expand_then_collapse_keeps_only_tier_two_open() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();
        store.expand_all(&mut tree);
        store.collapse_all(&mut tree);

        assert!(!store.is_expanded());
        assert_eq!(collapsed(&tree, "A"), Some(false));
        assert_eq!(collapsed(&tree, "B"), Some(false));
        assert_eq!(collapsed(&tree, "A1"), Some(true));
        assert_eq!(collapsed(&tree, "A1a"), Some(true));
    }

    #[test]
    fn test_apply_mode_follows_flag() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::new(true);
        store.apply_mode(&mut tree);
        assert_eq!(collapsed(&tree, "A1a"), Some(false));

        store.collapse_all(&mut tree);
        store.apply_mode(&mut tree);
        assert_eq!(collapsed(&tree, "A1a"), Some(true));
    }

    #[test]
    fn test_toggle_records_state() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();

        assert_eq!(store.visibility_of("A1"), None);
        assert_eq!(store.toggle(&mut tree, "A1"), Some(false));
        assert_eq!(store.visibility_of("A1"), Some(false));
        assert_eq!(collapsed(&tree, "A1"), Some(false));

        assert_eq!(store.toggle(&mut tree, "A1"), Some(true));
        assert_eq!(store.visibility_of("A1"), Some(true));
    }

    #[test]
    fn test_toggle_misses_are_silent() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();
        assert_eq!(store.toggle(&mut tree, "nope"), None);
        assert_eq!(store.toggle(&mut tree, "B1"), None); // leaf
        assert_eq!(store.visibility_of("B1"), None);
    }

    #[test]
    fn test_snapshot_records_every_submenu() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();
        store.collapse_all(&mut tree);
        store.snapshot(&tree);

        assert_eq!(store.visibility_of("A"), Some(false));
        assert_eq!(store.visibility_of("A1"), Some(true));
        assert_eq!(store.visibility_of("A1a"), Some(true));
        assert_eq!(store.visibility_of("B1"), None);
    }

    #[test]
    fn test_restore_overrides_mode_for_recorded_submenus() {
        let mut tree = deep_tree();
        let mut store = ExpansionStateStore::default();
        store.collapse_all(&mut tree);
        store.toggle(&mut tree, "A1");
        store.collapse_all(&mut tree);
        assert_eq!(collapsed(&tree, "A1"), Some(true));

        store.restore(&mut tree);
        assert_eq!(collapsed(&tree, "A1"), Some(false));
        // No record, mode default stays
        assert_eq!(collapsed(&tree, "A1a"), Some(true));
    }

    #[test]
    fn test_default_collapsed_by_owner_tier() {
        assert!(!ExpansionStateStore::default_collapsed(Tier::new(1)));
        assert!(ExpansionStateStore::default_collapsed(Tier::new(2)));
        assert!(ExpansionStateStore::default_collapsed(Tier::new(7)));
    }
}
