//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the active mode
//! (help overlay, options menu, search input or the tree) and turned into
//! controller commands.

use crate::app::{App, AppEvent, LoadState, MENU_ITEMS};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::nav::Command;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{apply_effects, spawn_document_load};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay captures all keys while visible
    if app.show_help {
        return handle_help_input(app, code);
    }
    if app.menu.is_some() {
        return handle_menu_input(app, code, modifiers, event_tx);
    }
    if app.search_mode {
        return handle_search_input(app, code, modifiers, event_tx);
    }
    handle_tree_input(app, code, modifiers, event_tx)
}

/// Handle input while the help overlay is visible.
///
/// j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Run a controller command and perform its effects.
fn run_command(app: &mut App, command: Command, event_tx: &mpsc::Sender<AppEvent>) {
    let effects = app.dispatch(command);
    apply_effects(app, effects, event_tx);
}

fn handle_tree_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Action::Continue;
    };

    // Keys that work without a loaded document
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::ShowHelp => {
            app.show_help = true;
            return Action::Continue;
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {name}"));
            return Action::Continue;
        }
        KbAction::Reload => {
            app.reset_document();
            spawn_document_load(app, event_tx);
            app.set_status("Reloading...");
            return Action::Continue;
        }
        _ => {}
    }

    if app.load_state != LoadState::Ready {
        return Action::Continue;
    }

    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Toggle => {
            if let Some(id) = app.cursor.clone() {
                run_command(app, Command::Toggle(id), event_tx);
            }
        }
        KbAction::Activate => {
            if let Some(id) = app.cursor.clone() {
                run_command(app, Command::Activate(id), event_tx);
            }
        }
        KbAction::NextTab => run_command(app, Command::NextTab, event_tx),
        KbAction::PrevTab => run_command(app, Command::PrevTab, event_tx),
        KbAction::EnterSearch => {
            app.search_mode = true;
            tracing::debug!("Entered search mode");
        }
        KbAction::ClearSearch => {
            app.search_input.clear();
            run_command(app, Command::ClearSearch, event_tx);
        }
        KbAction::SortAlpha => run_command(app, Command::SortAlpha, event_tx),
        KbAction::SortDefault => {
            // Restoring the original order also ends the search
            app.search_input.clear();
            run_command(app, Command::SortDefault, event_tx);
        }
        KbAction::ExpandAll => run_command(app, Command::ExpandAll, event_tx),
        KbAction::CollapseAll => run_command(app, Command::CollapseAll, event_tx),
        KbAction::OptionsMenu => app.menu = Some(0),
        KbAction::OpenInBrowser => open_cursor_link(app),
        _ => {}
    }
    Action::Continue
}

/// Open the page behind the cursor node in the system browser.
fn open_cursor_link(app: &mut App) {
    let Some(link) = app.cursor_link() else {
        return;
    };
    if !(link.starts_with("http://") || link.starts_with("https://")) {
        app.set_status(format!("Cannot open '{link}': no absolute URL"));
        return;
    }
    match open::that(&link) {
        Ok(()) => tracing::debug!(url = %link, "Opened in browser"),
        Err(e) => app.set_status(format!("Failed to open browser: {e}")),
    }
}

/// Typing re-applies the filter on every keystroke; Esc clears it and
/// Enter leaves search mode with the filter kept.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::ExitSearch) => {
            app.search_mode = false;
            if !app.search_input.is_empty() {
                app.search_input.clear();
                run_command(app, Command::ClearSearch, event_tx);
            }
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.search_mode = false;
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            if app.search_input.pop().is_some() {
                let query = app.search_input.clone();
                run_command(app, Command::Search(query), event_tx);
            }
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if app.search_input.len() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({MAX_SEARCH_QUERY_LENGTH} chars)"
                ));
                return Action::Continue;
            }
            app.search_input.push(c);
            let query = app.search_input.clone();
            run_command(app, Command::Search(query), event_tx);
        }
        _ => {}
    }
    Action::Continue
}

/// Options menu: move with j/k, Enter runs the entry, Esc or m closes.
fn handle_menu_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let selected = app.menu.unwrap_or(0);
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Menu)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => app.menu = None,
        Some(KbAction::NavDown) => app.menu = Some((selected + 1).min(MENU_ITEMS.len() - 1)),
        Some(KbAction::NavUp) => app.menu = Some(selected.saturating_sub(1)),
        Some(KbAction::Activate) => {
            app.menu = None;
            if let Some(&(label, entry)) = MENU_ITEMS.get(selected) {
                tracing::debug!(entry = label, "Options menu entry chosen");
                if app.search_mode || entry.command() == Command::SortDefault {
                    app.search_input.clear();
                }
                run_command(app, entry.command(), event_tx);
            }
        }
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DocumentSource;
    use crate::config::Config;
    use crate::document::ParsedDocument;
    use crate::nav::Node;
    use std::path::PathBuf;

    fn loaded_app() -> App {
        let mut app = App::new(
            &Config::default(),
            DocumentSource::File(PathBuf::from("nav.json")),
        )
        .unwrap();
        app.install_document(&ParsedDocument {
            nodes: vec![
                Node::new("A", "Alpha").with_children(vec![
                    Node::new("A2", "Zebra"),
                    Node::new("A1", "Apple"),
                ]),
                Node::new("B", "Beta").with_children(vec![Node::new("B1", "Ball")]),
            ],
            rejected: Vec::new(),
        });
        app
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn type_str(app: &mut App, tx: &mpsc::Sender<AppEvent>, s: &str) {
        for c in s.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    fn selected_tab(app: &App) -> Option<String> {
        app.controller
            .session()
            .and_then(|s| s.tabs.selected_id())
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_tab_keys_switch_tabs() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(selected_tab(&app).as_deref(), Some("B"));
        assert_eq!(app.content.as_ref().unwrap().title, "Beta");
        press(&mut app, &tx, KeyCode::Char('['));
        assert_eq!(selected_tab(&app).as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_typing_filters_each_keystroke() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('/'));
        assert!(app.search_mode);

        type_str(&mut app, &tx, "ba");
        assert_eq!(app.search_input, "ba");
        let search = &app.controller.session().unwrap().search;
        assert!(search.is_active());
        assert_eq!(search.query(), "ba");

        // 'q' is typed into the query, not treated as quit
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')),
            Action::Continue
        ));
        assert_eq!(app.search_input, "baq");
    }

    #[tokio::test]
    async fn test_enter_keeps_filter_and_esc_clears() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('/'));
        type_str(&mut app, &tx, "ball");
        press(&mut app, &tx, KeyCode::Enter);
        assert!(!app.search_mode);
        assert!(app.controller.session().unwrap().search.is_active());

        press(&mut app, &tx, KeyCode::Char('/'));
        press(&mut app, &tx, KeyCode::Esc);
        assert!(!app.search_mode);
        assert!(app.search_input.is_empty());
        assert!(!app.controller.session().unwrap().search.is_active());
    }

    #[tokio::test]
    async fn test_backspace_to_empty_clears_search() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('/'));
        type_str(&mut app, &tx, "b");
        press(&mut app, &tx, KeyCode::Backspace);
        assert!(!app.controller.session().unwrap().search.is_active());
        assert_eq!(selected_tab(&app).as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_space_toggles_cursor_node() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        let tree = app.tree().unwrap();
        assert_eq!(tree.by_id("A").unwrap().is_collapsed(), Some(false));

        press(&mut app, &tx, KeyCode::Char(' '));
        assert_eq!(app.tree().unwrap().by_id("A").unwrap().is_collapsed(), Some(true));
    }

    #[tokio::test]
    async fn test_options_menu_runs_sort() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('m'));
        assert_eq!(app.menu, Some(0));
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.menu, None);
        assert_eq!(app.tree().unwrap().child_labels("A"), vec!["Apple", "Zebra"]);

        press(&mut app, &tx, KeyCode::Char('m'));
        press(&mut app, &tx, KeyCode::Down);
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.tree().unwrap().child_labels("A"), vec!["Zebra", "Apple"]);
    }

    #[tokio::test]
    async fn test_menu_escape_closes() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('m'));
        press(&mut app, &tx, KeyCode::Esc);
        assert_eq!(app.menu, None);
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let mut app = loaded_app();
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')),
            Action::Continue
        ));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_tree_keys_ignored_while_loading() {
        let mut app = loaded_app();
        app.load_state = LoadState::Loading;
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, &tx, KeyCode::Char('a'));
        assert_eq!(app.tree().unwrap().child_labels("A"), vec!["Zebra", "Apple"]);
    }
}
