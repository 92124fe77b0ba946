//! Keyboard shortcuts
//!
//! Shortcuts are written like "Alt+T" or "Ctrl+Shift+Plus". Three actions are
//! configurable; pressing Tab always asks the page to scroll the newly focused
//! element into view.

use crate::settings::Shortcuts;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parsed shortcut: required modifiers plus a lower-cased key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shortcut {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub key: String,
}

impl Shortcut {
    /// Parse a shortcut string. Never fails; garbage yields a shortcut nothing matches.
    pub fn parse(shortcut: &str) -> Self {
        let parts: Vec<String> = shortcut
            .split('+')
            .map(|p| p.trim().to_lowercase())
            .collect();

        let has = |name: &str| parts.iter().any(|p| p == name);

        Self {
            alt: has("alt"),
            ctrl: has("ctrl") || has("control"),
            shift: has("shift"),
            key: parts.last().cloned().unwrap_or_default(),
        }
    }

    /// Exact modifier match; the key compares case-insensitively. A configured
    /// "plus" also accepts "=" or "+" (unshifted Alt+Plus reports "=") and
    /// "minus" accepts "-".
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.alt != event.alt || self.ctrl != event.ctrl || self.shift != event.shift {
            return false;
        }

        let pressed = event.key.to_lowercase();
        pressed == self.key
            || (self.key == "plus" && (pressed == "=" || pressed == "+"))
            || (self.key == "minus" && pressed == "-")
    }
}

/// A key press as reported by the page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Configurable shortcut actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    ToggleSpeech,
    IncreaseFont,
    DecreaseFont,
}

/// What the page should do in response to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Tab was pressed; scroll the focused element into view once focus settles
    ScrollFocusedIntoView,
    Action(ShortcutAction),
}

/// The three configured shortcuts, checked in a fixed order
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutMap {
    bindings: IndexMap<ShortcutAction, Shortcut>,
}

impl ShortcutMap {
    pub fn from_settings(shortcuts: &Shortcuts) -> Self {
        let defaults = Shortcuts::default();
        let pick = |configured: &str, fallback: &str| {
            if configured.trim().is_empty() {
                Shortcut::parse(fallback)
            } else {
                Shortcut::parse(configured)
            }
        };

        let mut bindings = IndexMap::new();
        bindings.insert(
            ShortcutAction::ToggleSpeech,
            pick(&shortcuts.toggle_tts, &defaults.toggle_tts),
        );
        bindings.insert(
            ShortcutAction::IncreaseFont,
            pick(&shortcuts.increase_font, &defaults.increase_font),
        );
        bindings.insert(
            ShortcutAction::DecreaseFont,
            pick(&shortcuts.decrease_font, &defaults.decrease_font),
        );

        Self { bindings }
    }

    pub fn get(&self, action: ShortcutAction) -> Option<&Shortcut> {
        self.bindings.get(&action)
    }

    /// Every action whose shortcut matches the event
    pub fn matching(&self, event: &KeyEvent) -> Vec<ShortcutAction> {
        self.bindings
            .iter()
            .filter(|(_, shortcut)| shortcut.matches(event))
            .map(|(action, _)| *action)
            .collect()
    }
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::from_settings(&Shortcuts::default())
    }
}

/// Result of routing one key press
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub commands: Vec<KeyCommand>,
    /// A shortcut matched, so the browser's default handling should be suppressed
    pub prevent_default: bool,
}

/// Turns key presses into [`KeyCommand`]s
#[derive(Debug, Clone, Default)]
pub struct KeyboardNavigator {
    shortcuts: ShortcutMap,
}

impl KeyboardNavigator {
    pub fn new(shortcuts: ShortcutMap) -> Self {
        Self { shortcuts }
    }

    pub fn set_shortcuts(&mut self, shortcuts: ShortcutMap) {
        self.shortcuts = shortcuts;
    }

    pub fn shortcuts(&self) -> &ShortcutMap {
        &self.shortcuts
    }

    pub fn handle(&self, event: &KeyEvent) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();

        if event.key == "Tab" {
            outcome.commands.push(KeyCommand::ScrollFocusedIntoView);
        }

        for action in self.shortcuts.matching(event) {
            outcome.commands.push(KeyCommand::Action(action));
            outcome.prevent_default = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let shortcut = Shortcut::parse("Ctrl+Shift+S");
        assert!(shortcut.ctrl && shortcut.shift && !shortcut.alt);
        assert_eq!(shortcut.key, "s");

        let control = Shortcut::parse(" control + alt + F2 ");
        assert!(control.ctrl && control.alt);
        assert_eq!(control.key, "f2");

        assert_eq!(Shortcut::parse("").key, "");
    }

    #[test]
    fn test_match_exact_modifiers() {
        let shortcut = Shortcut::parse("Alt+T");
        assert!(shortcut.matches(&KeyEvent::new("t").alt()));
        assert!(shortcut.matches(&KeyEvent::new("T").alt()));
        assert!(!shortcut.matches(&KeyEvent::new("t")));
        assert!(!shortcut.matches(&KeyEvent::new("t").alt().ctrl()));
    }

    #[test]
    fn test_plus_alias() {
        let shortcut = Shortcut::parse("Alt+Plus");
        assert!(shortcut.matches(&KeyEvent::new("=").alt()));
        assert!(shortcut.matches(&KeyEvent::new("+").alt()));
        assert!(shortcut.matches(&KeyEvent::new("Plus").alt()));
        assert!(!shortcut.matches(&KeyEvent::new("-").alt()));
    }

    #[test]
    fn test_minus_alias() {
        let shortcut = Shortcut::parse("Alt+Minus");
        assert!(shortcut.matches(&KeyEvent::new("minus").alt()));
        assert!(shortcut.matches(&KeyEvent::new("-").alt()));
        assert!(!shortcut.matches(&KeyEvent::new("-")));
        assert!(!shortcut.matches(&KeyEvent::new("=").alt()));

        let outcome = KeyboardNavigator::default().handle(&KeyEvent::new("-").alt());
        assert_eq!(outcome.commands, vec![KeyCommand::Action(ShortcutAction::DecreaseFont)]);
    }

    #[test]
    fn test_navigator_routes_shortcuts() {
        let navigator = KeyboardNavigator::default();

        let outcome = navigator.handle(&KeyEvent::new("t").alt());
        assert_eq!(outcome.commands, vec![KeyCommand::Action(ShortcutAction::ToggleSpeech)]);
        assert!(outcome.prevent_default);

        let outcome = navigator.handle(&KeyEvent::new("=").alt());
        assert_eq!(outcome.commands, vec![KeyCommand::Action(ShortcutAction::IncreaseFont)]);

        let outcome = navigator.handle(&KeyEvent::new("x"));
        assert!(outcome.commands.is_empty());
        assert!(!outcome.prevent_default);
    }

    #[test]
    fn test_tab_always_scrolls() {
        let navigator = KeyboardNavigator::default();
        let outcome = navigator.handle(&KeyEvent::new("Tab"));
        assert_eq!(outcome.commands, vec![KeyCommand::ScrollFocusedIntoView]);
        assert!(!outcome.prevent_default);

        let outcome = navigator.handle(&KeyEvent::new("Tab").shift());
        assert_eq!(outcome.commands, vec![KeyCommand::ScrollFocusedIntoView]);
    }

    #[test]
    fn test_custom_shortcuts_and_blank_fallback() {
        let shortcuts = Shortcuts {
            toggle_tts: "Ctrl+Shift+V".to_string(),
            increase_font: "".to_string(),
            decrease_font: "Alt+Minus".to_string(),
        };
        let map = ShortcutMap::from_settings(&shortcuts);

        assert_eq!(map.matching(&KeyEvent::new("v").ctrl().shift()), vec![ShortcutAction::ToggleSpeech]);
        assert!(map.matching(&KeyEvent::new("t").alt()).is_empty());
        assert_eq!(map.get(ShortcutAction::IncreaseFont), Some(&Shortcut::parse("Alt+Plus")));
    }

    #[test]
    fn test_conflicting_shortcuts_all_fire() {
        let shortcuts = Shortcuts {
            toggle_tts: "Alt+X".to_string(),
            increase_font: "Alt+X".to_string(),
            decrease_font: "Alt+Minus".to_string(),
        };
        let map = ShortcutMap::from_settings(&shortcuts);
        assert_eq!(
            map.matching(&KeyEvent::new("x").alt()),
            vec![ShortcutAction::ToggleSpeech, ShortcutAction::IncreaseFont]
        );
    }
}
