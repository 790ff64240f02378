//! Query filtering with match highlighting.
//!
//! A pass computes, for every node, whether its own label matches and
//! whether anything below it does. Visibility is settled bottom-up over the
//! arena (children always sit after their parent), so a deep match keeps its
//! whole ancestor chain on screen.

use super::builder::NavTree;
use super::expansion::ExpansionStateStore;
use super::node::TitleClass;
use super::tabs::TabRegistry;
use crate::util::find_case_insensitive;

#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    active: bool,
    query: String,
}

impl SearchFilter {
    /// Whether a search session is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The query of the last filtering pass; empty when inactive.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Filter the tree by `query`; returns the number of nodes whose own
    /// label matched.
    ///
    /// A blank query clears the search instead.
    pub fn apply(
        &mut self,
        tree: &mut NavTree,
        expansion: &mut ExpansionStateStore,
        tabs: &mut TabRegistry,
        query: &str,
    ) -> usize {
        let query = query.trim();
        if query.is_empty() {
            self.clear(tree, expansion, tabs);
            return 0;
        }

        if !self.active {
            // First pass of a session: remember what the user had open
            expansion.snapshot(tree);
            self.active = true;
        }
        self.query = query.to_string();

        let len = tree.len();
        let mut own = vec![false; len];
        let mut below = vec![false; len];
        let mut matches = 0;

        for key in tree.keys().rev() {
            let node = tree.node_mut(key);
            node.highlights = find_case_insensitive(&node.label, query);
            own[key.index()] = !node.highlights.is_empty();
            if own[key.index()] {
                matches += 1;
            }
            if own[key.index()] || below[key.index()] {
                if let Some(parent) = node.parent {
                    below[parent.index()] = true;
                }
            }
        }

        for key in tree.keys() {
            let i = key.index();
            let visible = own[i] || below[i];
            let recorded = expansion.visibility_of(tree.node(key).id());
            let node = tree.node_mut(key);

            node.hidden = !visible;
            if node.is_top_level() {
                node.title = Some(TitleClass::Filtering);
            }
            if let Some(submenu) = node.submenu.as_mut() {
                submenu.collapsed = if !visible {
                    true
                } else if below[i] {
                    false
                } else {
                    recorded.unwrap_or(false)
                };
            }
        }

        tracing::debug!(query = %query, matches, "Applied search filter");
        matches
    }

    /// End the search session and return to the tab view.
    ///
    /// Highlights are stripped, every node is unhidden and the global
    /// expansion mode is re-applied. Submenus recorded when the session
    /// started (or toggled since) then get their recorded state back, and the
    /// last selected tab (or the first one) is selected again.
    pub fn clear(
        &mut self,
        tree: &mut NavTree,
        expansion: &mut ExpansionStateStore,
        tabs: &mut TabRegistry,
    ) {
        for key in tree.keys() {
            let node = tree.node_mut(key);
            node.hidden = false;
            node.highlights.clear();
            if node.is_top_level() {
                node.title = Some(TitleClass::Active);
            }
        }
        self.active = false;
        self.query.clear();

        expansion.apply_mode(tree);
        expansion.restore(tree);
        if let Some(target) = tabs.restore_target().map(str::to_owned) {
            tabs.select_tab(tree, &target);
        }
        tracing::debug!("Cleared search");
    }
}
