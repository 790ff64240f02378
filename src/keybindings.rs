//! Keybinding registry: maps keys to actions per context, with config
//! overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Toggle,
    Activate,
    NextTab,
    PrevTab,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    ClearSearch,
    SortAlpha,
    SortDefault,
    ExpandAll,
    CollapseAll,
    OpenInBrowser,
    Reload,
    CycleTheme,
    ShowHelp,
    OptionsMenu,
    Back,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::Toggle => "Expand / collapse submenu",
            Self::Activate => "Load page / choose",
            Self::NextTab => "Next tab",
            Self::PrevTab => "Previous tab",
            Self::EnterSearch => "Search",
            Self::ExitSearch => "Clear search and leave input",
            Self::CommitSearch => "Keep filter and leave input",
            Self::ClearSearch => "Clear search",
            Self::SortAlpha => "Sort A-Z",
            Self::SortDefault => "Restore original order",
            Self::ExpandAll => "Expand all",
            Self::CollapseAll => "Collapse all",
            Self::OpenInBrowser => "Open page in browser",
            Self::Reload => "Reload document",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::OptionsMenu => "Options menu",
            Self::Back => "Close popup",
        }
    }

    /// Config name of the action (the key used under `[keybindings]`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "nav_down",
            Self::NavUp => "nav_up",
            Self::Toggle => "toggle",
            Self::Activate => "activate",
            Self::NextTab => "next_tab",
            Self::PrevTab => "prev_tab",
            Self::EnterSearch => "search",
            Self::ExitSearch => "exit_search",
            Self::CommitSearch => "commit_search",
            Self::ClearSearch => "clear_search",
            Self::SortAlpha => "sort_alpha",
            Self::SortDefault => "sort_default",
            Self::ExpandAll => "expand_all",
            Self::CollapseAll => "collapse_all",
            Self::OpenInBrowser => "open",
            Self::Reload => "reload",
            Self::CycleTheme => "theme",
            Self::ShowHelp => "help",
            Self::OptionsMenu => "menu",
            Self::Back => "back",
        }
    }

    const ALL: [Action; 21] = [
        Self::Quit,
        Self::NavDown,
        Self::NavUp,
        Self::Toggle,
        Self::Activate,
        Self::NextTab,
        Self::PrevTab,
        Self::EnterSearch,
        Self::ExitSearch,
        Self::CommitSearch,
        Self::ClearSearch,
        Self::SortAlpha,
        Self::SortDefault,
        Self::ExpandAll,
        Self::CollapseAll,
        Self::OpenInBrowser,
        Self::Reload,
        Self::CycleTheme,
        Self::ShowHelp,
        Self::OptionsMenu,
        Self::Back,
    ];
}

/// Dispatch context; determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    /// Typing into the search input
    Search,
    /// Options menu popup
    Menu,
}

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drop SHIFT where the key code already carries it ('T', BackTab).
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::ctrl('c'), Action::Quit),
    (Context::Global, KeySpec::char('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::char('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::char(' '), Action::Toggle),
    (Context::Global, KeySpec::plain(KeyCode::Enter), Action::Activate),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::NextTab),
    (Context::Global, KeySpec::char(']'), Action::NextTab),
    (Context::Global, KeySpec::plain(KeyCode::BackTab), Action::PrevTab),
    (Context::Global, KeySpec::char('['), Action::PrevTab),
    (Context::Global, KeySpec::char('/'), Action::EnterSearch),
    (Context::Global, KeySpec::char('x'), Action::ClearSearch),
    (Context::Global, KeySpec::char('a'), Action::SortAlpha),
    (Context::Global, KeySpec::char('d'), Action::SortDefault),
    (Context::Global, KeySpec::char('e'), Action::ExpandAll),
    (Context::Global, KeySpec::char('c'), Action::CollapseAll),
    (Context::Global, KeySpec::char('o'), Action::OpenInBrowser),
    (Context::Global, KeySpec::char('r'), Action::Reload),
    (Context::Global, KeySpec::char('T'), Action::CycleTheme),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    (Context::Global, KeySpec::char('m'), Action::OptionsMenu),
    (Context::Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch),
    (Context::Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch),
    (Context::Menu, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Menu, KeySpec::char('m'), Action::Back),
];

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "Down", "Space"
/// - Ctrl combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::char(c))
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        format!("Ctrl+{name}")
    } else {
        name
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.trim().to_lowercase();
    Action::ALL.into_iter().find(|a| a.name() == name)
}

/// Registry of keybindings, supporting defaults and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to [`Context::Global`].
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Each overridden action loses its default keys and is re-bound to the
    /// new key in the same contexts. Returns warnings for unknown action
    /// names and unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{action_name}', ignoring"));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{key_str}' for action '{action_name}', ignoring"
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first, then Global.
    ///
    /// The search input consumes printable keys itself, so it does not fall
    /// back to Global for plain characters.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }
        if context == Context::Global
            || (context == Context::Search && key.modifiers == KeyModifiers::NONE)
        {
            return None;
        }
        self.lookup.get(&(Context::Global, key)).copied()
    }

    /// All bindings for the help screen as
    /// (context, key display string, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
