use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetKeybindings {
    pub submit: KeyBinding,
    pub dismiss: KeyBinding,
    pub next: KeyBinding,
    pub previous: KeyBinding,
    pub press: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub sheet: SheetKeybindings,
}

impl Default for SheetKeybindings {
    fn default() -> Self {
        Self {
            submit: Key::new(KeyCode::Enter).into(),
            dismiss: Key::new(KeyCode::Esc).into(),
            next: Key::new(KeyCode::Tab).into(),
            previous: Key::with_shift(KeyCode::Tab).into(),
            press: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Char(' ')),
            ]),
        }
    }
}
