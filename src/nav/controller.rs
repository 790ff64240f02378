//! Command dispatch over the navigation session.
//!
//! The controller owns every piece of session state. Commands run to
//! completion against that state and hand back [`Effect`]s for the caller to
//! perform afterwards; nothing is called back while a traversal is in
//! progress.

use super::builder::{NavTree, TreeBuilder};
use super::expansion::ExpansionStateStore;
use super::node::Node;
use super::search::SearchFilter;
use super::sort::Sorter;
use super::tabs::TabRegistry;

/// A user action, already resolved to what it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectTab(String),
    NextTab,
    PrevTab,
    Toggle(String),
    Search(String),
    ClearSearch,
    SortAlpha,
    SortDefault,
    ExpandAll,
    CollapseAll,
    Activate(String),
}

/// Work requested by a command, performed outside the dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show `label` as the content title and load the page behind `href`.
    LoadContent {
        id: String,
        label: String,
        href: String,
    },
    /// Short message for the status bar.
    Status(String),
}

/// State of one loaded document.
#[derive(Debug, Clone)]
pub struct NavSession {
    pub tree: NavTree,
    pub expansion: ExpansionStateStore,
    pub tabs: TabRegistry,
    pub search: SearchFilter,
}

impl NavSession {
    fn load_effect(&self, id: &str) -> Option<Effect> {
        let node = self.tree.by_id(id)?;
        Some(Effect::LoadContent {
            id: node.id().to_string(),
            label: node.label().to_string(),
            href: node.href().to_string(),
        })
    }

    fn select_tab(&mut self, tab_id: &str) -> Vec<Effect> {
        if self.search.is_active() {
            self.search
                .clear(&mut self.tree, &mut self.expansion, &mut self.tabs);
        }
        if !self.tabs.select_tab(&mut self.tree, tab_id) {
            return Vec::new();
        }
        self.load_effect(tab_id).into_iter().collect()
    }

    fn step_tab(&mut self, offset: isize) -> Vec<Effect> {
        match self.tabs.neighbor(offset).map(str::to_owned) {
            Some(id) => self.select_tab(&id),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    session: Option<NavSession>,
    start_expanded: bool,
}

impl Controller {
    /// A controller with no document; `start_expanded` picks the initial
    /// global expansion mode of every session it initializes.
    pub fn new(start_expanded: bool) -> Self {
        Self {
            session: None,
            start_expanded,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&NavSession> {
        self.session.as_ref()
    }

    pub fn tree(&self) -> Option<&NavTree> {
        self.session.as_ref().map(|s| &s.tree)
    }

    /// Build a session from `nodes`, replacing any previous one.
    ///
    /// The configured expansion mode is applied and the first tab selected;
    /// the returned effects load that tab's page.
    pub fn initialize(&mut self, nodes: &[Node]) -> Vec<Effect> {
        let mut tree = TreeBuilder::build(nodes);
        let tabs = TabRegistry::from_tree(&tree);
        let mut expansion = ExpansionStateStore::new(self.start_expanded);
        expansion.apply_mode(&mut tree);

        let mut session = NavSession {
            tree,
            expansion,
            tabs,
            search: SearchFilter::default(),
        };

        let mut effects = Vec::new();
        if let Some(first) = session.tabs.restore_target().map(str::to_owned) {
            effects = session.select_tab(&first);
        }
        if !session.tree.rejected().is_empty() {
            tracing::warn!(
                rejected = session.tree.rejected().len(),
                "Some entries were left out of the tree"
            );
        }

        tracing::info!(
            nodes = session.tree.len(),
            tabs = session.tabs.len(),
            "Navigation initialized"
        );
        self.session = Some(session);
        effects
    }

    /// Drop the session; every command is a no-op until the next
    /// [`initialize`](Self::initialize).
    pub fn reset(&mut self) {
        self.session = None;
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        let Some(s) = self.session.as_mut() else {
            tracing::debug!(?command, "Navigation not initialized, ignoring command");
            return Vec::new();
        };

        match command {
            Command::SelectTab(id) => s.select_tab(&id),
            Command::NextTab => s.step_tab(1),
            Command::PrevTab => s.step_tab(-1),
            Command::Toggle(id) => {
                s.expansion.toggle(&mut s.tree, &id);
                Vec::new()
            }
            Command::Search(query) => {
                let was_active = s.search.is_active();
                let matches = s
                    .search
                    .apply(&mut s.tree, &mut s.expansion, &mut s.tabs, &query);
                if s.search.is_active() {
                    vec![Effect::Status(match matches {
                        1 => "1 match".to_string(),
                        n => format!("{n} matches"),
                    })]
                } else if was_active {
                    vec![Effect::Status("Search cleared".into())]
                } else {
                    Vec::new()
                }
            }
            Command::ClearSearch => {
                s.search
                    .clear(&mut s.tree, &mut s.expansion, &mut s.tabs);
                vec![Effect::Status("Search cleared".into())]
            }
            Command::SortAlpha => {
                Sorter::sort_alpha(&mut s.tree, &mut s.expansion);
                if s.search.is_active() {
                    // Mode re-application above reset the filtered view
                    let query = s.search.query().to_string();
                    s.search
                        .apply(&mut s.tree, &mut s.expansion, &mut s.tabs, &query);
                }
                vec![Effect::Status("Sorted A-Z".into())]
            }
            Command::SortDefault => {
                Sorter::sort_default(&mut s.tree, &mut s.expansion, &mut s.tabs, &mut s.search);
                vec![Effect::Status("Original order restored".into())]
            }
            Command::ExpandAll => {
                s.expansion.expand_all(&mut s.tree);
                vec![Effect::Status("Expanded all".into())]
            }
            Command::CollapseAll => {
                s.expansion.collapse_all(&mut s.tree);
                vec![Effect::Status("Collapsed all".into())]
            }
            Command::Activate(id) => match s.load_effect(&id) {
                Some(effect) => vec![effect],
                None => {
                    tracing::debug!(id = %id, "Activate on unknown node ignored");
                    Vec::new()
                }
            },
        }
    }
}
