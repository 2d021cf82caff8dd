//! A modal sheet that prompts for a link, validates it as it is typed, and
//! reports the user's decision through named events.
//!
//! - [`sheet`] - The component and its platform seam
//! - [`dom`] - In-memory document the sheet runs against
//! - [`app`] - Terminal host for a single sheet

pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod message;
pub mod sheet;
pub mod theme;
pub mod tui;
pub mod ui;

pub use theme::Theme;
