//! Application-level messages.
//!
//! Terminal events are translated into messages and queued on the app's
//! channel; the sheet's own events arrive on the same channel through
//! its subscribers, so everything is handled in one place and in order.

use crate::sheet::SheetEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    // === Lifecycle ===
    /// Periodic tick, drives the deferred hide
    Tick,
    /// Render the UI
    Render,
    /// Terminal resized
    Resize(u16, u16),
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Resume from suspension
    Resume,
    /// Quit without waiting for the sheet
    Quit,
    /// Clear and redraw the screen
    ClearScreen,

    // === Sheet ===
    /// An event published by the sheet
    Sheet(SheetEvent),
}
