/// Keyboard actions understood by the link sheet and its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAction {
    /// Confirm the link from inside the input field.
    Submit,
    /// Dismiss the sheet from anywhere while it is visible.
    Dismiss,
    /// Move focus to the next control.
    Next,
    /// Move focus to the previous control.
    Previous,
    /// Activate the focused button.
    Press,
}
