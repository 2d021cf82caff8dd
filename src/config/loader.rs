use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "linksheet";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the configuration from `path`, or from the default location.
///
/// A missing default file yields the defaults; an explicitly requested
/// file that does not exist is an error.
pub fn load(path: Option<&Path>) -> color_eyre::Result<AppConfig> {
    if let Some(path) = path {
        return read(path);
    }

    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    read(&path)
}

fn read(path: &Path) -> color_eyre::Result<AppConfig> {
    let content = fs::read_to_string(path)?;
    let config = parse(&content)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetAction;
    use crate::config::resolver::KeyResolver;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.sheet.message, "Enter a link");
        assert_eq!(config.sheet.transition_duration(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_sections() {
        let config = parse(
            r#"
            [sheet]
            transition_duration_ms = 120

            [keybindings.sheet]
            dismiss = ["Esc", "q"]
            "#,
        )
        .unwrap();

        assert_eq!(config.sheet.transition_duration_ms, 120);
        assert_eq!(config.sheet.message, "Enter a link");

        let resolver = KeyResolver::new(Arc::new(config.keybindings));
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(resolver.matches_sheet(&q, SheetAction::Dismiss));
        assert!(resolver.matches_sheet(&enter, SheetAction::Submit));
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(parse("[keybindings.sheet]\nsubmit = \"hyper+x\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(load(Some(Path::new("/nonexistent/linksheet/config.toml"))).is_err());
    }
}
