//! Sibling reordering.
//!
//! Both sorts only rewrite child index lists. Realized nodes are relocated
//! by key, so collapse flags, highlights and expansion records stay attached
//! to the node they belong to.

use feruca::Collator;

use super::builder::{NavTree, NodeKey};
use super::expansion::ExpansionStateStore;
use super::node::Node;
use super::search::SearchFilter;
use super::tabs::TabRegistry;

pub struct Sorter;

impl Sorter {
    /// Order the children of every parent by label, case-insensitively,
    /// using the Unicode Collation Algorithm so accented letters sort next to
    /// their base letter.
    ///
    /// Ties keep their current relative order. Top-level nodes stay in tab
    /// order.
    pub fn sort_alpha(tree: &mut NavTree, expansion: &mut ExpansionStateStore) {
        let mut collator = Collator::default();
        for parent in tree.submenu_owners().collect::<Vec<_>>() {
            let mut keyed: Vec<(String, NodeKey)> = tree
                .node(parent)
                .children()
                .iter()
                .map(|&c| (tree.node(c).label().to_lowercase(), c))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| collator.collate(a.as_str(), b.as_str()));
            tree.set_children(parent, keyed.into_iter().map(|(_, c)| c).collect());
        }
        expansion.apply_mode(tree);
        tracing::debug!("Sorted siblings alphabetically");
    }

    /// Restore load order from the original order snapshot.
    ///
    /// Afterwards the last selected tab (or the first) is selected, an active
    /// search is cleared and the global expansion mode is re-applied.
    pub fn sort_default(
        tree: &mut NavTree,
        expansion: &mut ExpansionStateStore,
        tabs: &mut TabRegistry,
        search: &mut SearchFilter,
    ) {
        let original = tree.original_order().to_vec();
        let roots = relocate(tree, &original, None);
        tree.set_roots(roots);

        if let Some(target) = tabs.restore_target().map(str::to_owned) {
            tabs.select_tab(tree, &target);
        }
        if search.is_active() {
            search.clear(tree, expansion, tabs);
        }
        expansion.apply_mode(tree);
        tracing::debug!("Restored original order");
    }
}

/// Re-attach the realized node of every snapshot entry under `parent`, in
/// snapshot order, recursing into children. Returns the keys for this level.
fn relocate(tree: &mut NavTree, level: &[Node], parent: Option<NodeKey>) -> Vec<NodeKey> {
    let mut keys = Vec::with_capacity(level.len());
    for entry in level {
        let Some(key) = tree.lookup(&entry.id) else {
            tracing::debug!(id = %entry.id, "Snapshot entry has no realized node, skipping");
            continue;
        };
        if tree.node(key).parent() != parent {
            tracing::debug!(id = %entry.id, "Snapshot entry realized under another parent, skipping");
            continue;
        }
        if !entry.children.is_empty() {
            let children = relocate(tree, &entry.children, Some(key));
            tree.set_children(key, children);
        }
        keys.push(key);
    }
    keys
}
