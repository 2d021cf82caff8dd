use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "linksheet",
    version,
    about = "Prompt for a link in a terminal sheet and print it"
)]
pub struct Args {
    /// Prompt shown above the input (e.g., "Link for the selected text")
    pub message: Option<String>,

    /// Link to pre-fill; enables the remove action
    #[arg(short, long)]
    pub url: Option<String>,

    /// Show/hide animation length in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub duration: Option<u64>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Config file to read instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "linksheet",
            "Link for selection",
            "--url",
            "https://example.com",
            "-d",
            "150",
        ]);
        assert_eq!(args.message.as_deref(), Some("Link for selection"));
        assert_eq!(args.url.as_deref(), Some("https://example.com"));
        assert_eq!(args.duration, Some(150));
        assert!(args.theme.is_none());
        assert!(args.config.is_none());
    }
}
