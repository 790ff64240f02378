use crate::config::Config;
use crate::content::{ContentError, PageCache, PageContent};
use crate::document::{DocumentError, FetchError, ParsedDocument};
use crate::keybindings::KeybindingRegistry;
use crate::nav::{Command, Controller, Effect, NavTree, NodeKey};
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::Result;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Redirect policy for document and page requests: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }
        tracing::debug!(to = %url, hop = attempt.previous().len() + 1, "Following redirect");
        attempt.follow()
    })
}

/// Where the navigation document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(Url),
    File(PathBuf),
}

impl DocumentSource {
    /// Base for resolving relative page links; local files have none.
    pub fn base_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            Self::File(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Progress of the navigation document load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The load failed; navigation stays unrendered until a reload
    Failed(String),
}

/// State of the page shown in the content panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Loaded(PageContent),
    /// Not fetched: page loading disabled or link not resolvable
    Unfetched(String),
    Failed(String),
}

/// The content panel: title shown immediately, page filled in later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPanel {
    pub id: String,
    pub title: String,
    pub href: String,
    pub url: Option<Url>,
    pub page: PageState,
}

/// Events from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// The navigation document finished loading.
    DocumentLoaded {
        generation: u64,
        result: Result<ParsedDocument, LoadError>,
    },
    /// A page finished loading for the content panel.
    ContentLoaded {
        id: String,
        generation: u64,
        url: Url,
        result: Result<PageContent, ContentError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Why the navigation document could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Options popup entries and the command each one runs.
pub const MENU_ITEMS: &[(&str, MenuCommand)] = &[
    ("Sort A-Z", MenuCommand::SortAlpha),
    ("Original order", MenuCommand::SortDefault),
    ("Expand all", MenuCommand::ExpandAll),
    ("Collapse all", MenuCommand::CollapseAll),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    SortAlpha,
    SortDefault,
    ExpandAll,
    CollapseAll,
}

impl MenuCommand {
    pub fn command(self) -> Command {
        match self {
            Self::SortAlpha => Command::SortAlpha,
            Self::SortDefault => Command::SortDefault,
            Self::ExpandAll => Command::ExpandAll,
            Self::CollapseAll => Command::CollapseAll,
        }
    }
}

/// Central application state
pub struct App {
    pub http_client: reqwest::Client,
    pub source: DocumentSource,
    pub controller: Controller,
    pub load_state: LoadState,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Tree view
    /// Id of the node under the cursor; survives sorting and filtering
    pub cursor: Option<String>,
    /// First displayed row of the tree panel
    pub tree_offset: usize,
    /// Rows available in the tree panel at the last render
    pub tree_viewport_height: usize,

    // Search input
    pub search_mode: bool,
    pub search_input: String,

    // Content
    pub content: Option<ContentPanel>,
    pub page_cache: PageCache,
    pub load_pages: bool,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,

    // Overlays
    pub show_help: bool,
    pub help_scroll_offset: usize,
    /// Selected entry of the open options menu
    pub menu: Option<usize>,

    /// Generation counters: results from older spawns are dropped
    pub document_generation: u64,
    pub content_load_generation: u64,
    pub document_handle: Option<tokio::task::JoinHandle<()>>,
    pub content_load_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config, source: DocumentSource) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .build()?;

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        Ok(Self {
            http_client,
            source,
            controller: Controller::new(config.start_expanded),
            load_state: LoadState::Loading,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            cursor: None,
            tree_offset: 0,
            tree_viewport_height: 0,
            search_mode: false,
            search_input: String::new(),
            content: None,
            page_cache: PageCache::new(config.page_cache_size),
            load_pages: config.load_pages,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            menu: None,
            document_generation: 0,
            content_load_generation: 0,
            document_handle: None,
            content_load_handle: None,
        })
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant; returns its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn tree(&self) -> Option<&NavTree> {
        self.controller.tree()
    }

    /// Rows of the tree panel, in display order.
    pub fn rows(&self) -> Vec<NodeKey> {
        self.tree().map(NavTree::displayed).unwrap_or_default()
    }

    /// Row index of the cursor among `rows`.
    pub fn cursor_index(&self, rows: &[NodeKey]) -> Option<usize> {
        let tree = self.tree()?;
        let id = self.cursor.as_deref()?;
        rows.iter().position(|&k| tree.node(k).id() == id)
    }

    /// Keep the cursor on a displayed row.
    ///
    /// When its node went out of view, the cursor moves to the nearest
    /// displayed ancestor, else to the first row.
    pub fn clamp_cursor(&mut self) {
        let rows = self.rows();
        if self.cursor_index(&rows).is_some() {
            return;
        }
        let Some(tree) = self.controller.tree() else {
            self.cursor = None;
            return;
        };

        let mut fallback = None;
        if let Some(mut key) = self.cursor.as_deref().and_then(|id| tree.lookup(id)) {
            while let Some(parent) = tree.node(key).parent() {
                if rows.contains(&parent) {
                    fallback = Some(parent);
                    break;
                }
                key = parent;
            }
        }
        let next = fallback
            .or_else(|| rows.first().copied())
            .map(|k| tree.node(k).id().to_string());
        self.cursor = next;
    }

    pub fn nav_down(&mut self) {
        self.move_cursor(1);
    }

    pub fn nav_up(&mut self) {
        self.move_cursor(-1);
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let next = match self.cursor_index(&rows) {
            Some(i) => i.saturating_add_signed(delta).min(rows.len() - 1),
            None => 0,
        };
        let id = self
            .controller
            .tree()
            .map(|tree| tree.node(rows[next]).id().to_string());
        if id.is_some() {
            self.cursor = id;
        }
    }

    /// Run a controller command and keep the cursor valid.
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        let effects = self.controller.dispatch(command);
        self.clamp_cursor();
        self.needs_redraw = true;
        effects
    }

    /// Replace the session with a freshly loaded document.
    pub fn install_document(&mut self, doc: &ParsedDocument) -> Vec<Effect> {
        let mut effects = self.controller.initialize(&doc.nodes);
        self.load_state = LoadState::Ready;
        self.search_mode = false;
        self.search_input.clear();
        self.cursor = None;
        self.tree_offset = 0;
        self.clamp_cursor();
        let skipped = doc.rejected.len()
            + self.controller.tree().map_or(0, |tree| tree.rejected().len());
        if skipped > 0 {
            effects.push(Effect::Status(format!("Skipped {skipped} invalid entries")));
        }
        effects
    }

    /// Forget the current document before a reload.
    pub fn reset_document(&mut self) {
        self.controller.reset();
        self.load_state = LoadState::Loading;
        self.cursor = None;
        self.content = None;
        self.page_cache.clear();
        self.search_mode = false;
        self.search_input.clear();
        self.menu = None;
    }

    /// Link of the node under the cursor, resolved when possible.
    pub fn cursor_link(&self) -> Option<String> {
        let node = self.tree()?.by_id(self.cursor.as_deref()?)?;
        Some(
            crate::content::resolve_href(self.source.base_url(), node.href())
                .map(String::from)
                .unwrap_or_else(|_| node.href().to_string()),
        )
    }

    /// Set status message (expires after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once expired; returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.content_load_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.document_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{Node, StructuralError};
    use tokio::time;

    fn test_app() -> App {
        let source = DocumentSource::File(PathBuf::from("nav.json"));
        App::new(&Config::default(), source).unwrap()
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        let doc = ParsedDocument {
            nodes: vec![
                Node::new("A", "Alpha").with_children(vec![
                    Node::new("A2", "Zebra"),
                    Node::new("A1", "Apple").with_children(vec![Node::new("A1a", "Core")]),
                ]),
                Node::new("B", "Beta").with_children(vec![Node::new("B1", "Ball")]),
            ],
            rejected: Vec::new(),
        };
        app.install_document(&doc);
        app
    }

    fn row_ids(app: &App) -> Vec<String> {
        let tree = app.tree().unwrap();
        app.rows()
            .into_iter()
            .map(|k| tree.node(k).id().to_string())
            .collect()
    }

    #[test]
    fn test_install_places_cursor_on_first_row() {
        let app = loaded_app();
        assert_eq!(app.load_state, LoadState::Ready);
        assert_eq!(app.cursor.as_deref(), Some("A"));
        assert_eq!(row_ids(&app), vec!["A", "A2", "A1"]);
    }

    #[test]
    fn test_install_reports_all_skipped_entries_once() {
        let mut app = test_app();
        let doc = ParsedDocument {
            nodes: vec![
                Node::new("A", "Alpha"),
                Node::new("B", "Beta").with_children(vec![Node::new("A", "Again")]),
            ],
            rejected: vec![StructuralError::MissingField {
                path: vec![2],
                field: "id",
            }],
        };
        let effects = app.install_document(&doc);
        let statuses: Vec<&Effect> = effects
            .iter()
            .filter(|e| matches!(e, Effect::Status(_)))
            .collect();
        assert_eq!(
            statuses,
            vec![&Effect::Status("Skipped 2 invalid entries".into())]
        );
    }

    #[test]
    fn test_nav_stays_in_bounds() {
        let mut app = loaded_app();
        app.nav_up();
        assert_eq!(app.cursor.as_deref(), Some("A"));
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.cursor.as_deref(), Some("A1"));
    }

    #[test]
    fn test_cursor_follows_node_across_sort() {
        let mut app = loaded_app();
        app.nav_down(); // A2 "Zebra"
        app.dispatch(Command::SortAlpha);
        assert_eq!(app.cursor.as_deref(), Some("A2"));
        assert_eq!(row_ids(&app), vec!["A", "A1", "A2"]);
    }

    #[test]
    fn test_cursor_falls_back_to_ancestor() {
        let mut app = loaded_app();
        app.dispatch(Command::Toggle("A1".into()));
        app.cursor = Some("A1a".into());
        app.dispatch(Command::Toggle("A1".into()));
        assert_eq!(app.cursor.as_deref(), Some("A1"));
    }

    #[test]
    fn test_cursor_moves_when_search_hides_it() {
        let mut app = loaded_app();
        app.dispatch(Command::Search("ball".into()));
        assert_eq!(row_ids(&app), vec!["B", "B1"]);
        assert_eq!(app.cursor.as_deref(), Some("B"));
    }

    #[test]
    fn test_reset_document() {
        let mut app = loaded_app();
        app.reset_document();
        assert_eq!(app.load_state, LoadState::Loading);
        assert!(app.rows().is_empty());
        assert!(app.dispatch(Command::ExpandAll).is_empty());
    }

    #[test]
    fn test_cursor_link_unresolved_for_local_file() {
        let app = loaded_app();
        assert_eq!(app.cursor_link().as_deref(), Some("Alpha.html"));
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = test_app();
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Sorted A-Z");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
