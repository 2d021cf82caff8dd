use crate::config::actions::SheetAction;
use crate::config::keybindings::KeybindingsConfig;
use crossterm::event::{KeyEvent, KeyModifiers};
use std::sync::Arc;

/// Maps key events to actions through the configured bindings.
#[derive(Debug, Default)]
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    pub fn matches_sheet(&self, event: &KeyEvent, action: SheetAction) -> bool {
        let kb = &self.keybindings.sheet;
        match action {
            SheetAction::Submit => kb.submit.matches(event),
            SheetAction::Dismiss => kb.dismiss.matches(event),
            SheetAction::Next => kb.next.matches(event),
            SheetAction::Previous => kb.previous.matches(event),
            SheetAction::Press => kb.press.matches(event),
        }
    }

    /// Like [`Self::matches_sheet`], but a held modifier never prevents a match.
    pub fn matches_sheet_loosely(&self, event: &KeyEvent, action: SheetAction) -> bool {
        self.matches_sheet(event, action)
            || self.matches_sheet(&KeyEvent::new(event.code, KeyModifiers::NONE), action)
    }

    pub fn display_sheet(&self, action: SheetAction) -> String {
        let kb = &self.keybindings.sheet;
        match action {
            SheetAction::Submit => kb.submit.display(),
            SheetAction::Dismiss => kb.dismiss.display(),
            SheetAction::Next => kb.next.display(),
            SheetAction::Previous => kb.previous.display(),
            SheetAction::Press => kb.press.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_default_sheet_bindings() {
        let resolver = KeyResolver::default();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);

        assert!(resolver.matches_sheet(&enter, SheetAction::Submit));
        assert!(resolver.matches_sheet(&enter, SheetAction::Press));
        assert!(!resolver.matches_sheet(&enter, SheetAction::Dismiss));
        assert!(resolver.matches_sheet(&esc, SheetAction::Dismiss));
        assert_eq!(resolver.display_sheet(SheetAction::Previous), "shift+Tab");
    }

    #[test]
    fn test_loose_match_ignores_modifiers() {
        let resolver = KeyResolver::default();
        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        let alt_esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::ALT);

        assert!(!resolver.matches_sheet(&shift_enter, SheetAction::Submit));
        assert!(resolver.matches_sheet_loosely(&shift_enter, SheetAction::Submit));
        assert!(resolver.matches_sheet_loosely(&alt_esc, SheetAction::Dismiss));
        assert!(!resolver.matches_sheet_loosely(&alt_esc, SheetAction::Submit));
    }
}
