//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

pub const KEYMAP_FILE_NAME: &str = "keybinds.conf";

/// Semantic actions on the member list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Enter search mode.
    StartSearch,
    /// Drop the active search term and return to sections.
    ClearSearch,
    /// Press the highlighted row (toggle selection).
    Press,
    /// Long-press the highlighted row (open the profile popup).
    LongPress,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Ignore this key.
    Ignore,
}

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys and vim-style j/k, Enter/space to press, `p` to long-press.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Esc), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Enter), KeyAction::Press);
        bindings.insert((M::NONE, Char(' ')), KeyAction::Press);
        bindings.insert((M::NONE, Char('p')), KeyAction::LongPress);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Load from `path` if present, else from a standard config location, else defaults.
    pub fn load(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::config::config_file_read_path(KEYMAP_FILE_NAME) {
            return Self::from_file(&existing.to_string_lossy()).unwrap_or_default();
        }
        Self::default()
    }

    /// Defaults overridden by `<Action> = <KeySpec>` lines from `path`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line, "ignoring keybinding"),
            }
        }
        map
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// First key bound to `action`, formatted for the status bar.
    pub fn key_for(&self, action: KeyAction) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.into_iter().next()
    }

    /// Format a key like "Ctrl+q", "Enter", "j".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Space" => Char(' '),
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "StartSearch" => Some(KeyAction::StartSearch),
        "ClearSearch" => Some(KeyAction::ClearSearch),
        "Press" => Some(KeyAction::Press),
        "LongPress" => Some(KeyAction::LongPress),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_resolve_vim_and_arrows() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Up)), Some(KeyAction::MoveUp));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('z'))), None);
    }

    #[test]
    fn file_lines_override_defaults() {
        let km = Keymap::parse("# mine\nLongPress = Ctrl+o\nPress = x\nBogus = y\n");
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('o'))), Some(KeyAction::LongPress));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('x'))), Some(KeyAction::Press));
        // defaults survive
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('p'))), Some(KeyAction::LongPress));
    }

    #[test]
    fn key_for_formats_first_binding() {
        let km = Keymap::default();
        assert_eq!(km.key_for(KeyAction::StartSearch).as_deref(), Some("/"));
        assert_eq!(km.key_for(KeyAction::LongPress).as_deref(), Some("p"));
    }
}
