pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::SheetAction;
pub use key::key_name;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Prompt shown when no message is given on the command line.
    pub message: String,
    /// Length of the show/hide animation.
    pub transition_duration_ms: u64,
}

impl SheetConfig {
    pub const fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            message: "Enter a link".to_string(),
            transition_duration_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}
