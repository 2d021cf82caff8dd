//! Terminal presentation of the sheet.
//!
//! - [`Handled`] - Result of delivering an input event
//! - [`TextField`] - Default editing behavior of the sheet's textarea
//! - [`SheetView`] - Renders an attached sheet and hit-tests its controls

mod sheet_view;
mod text_field;

pub use sheet_view::SheetView;
pub use text_field::TextField;

/// Result of handling an input event.
///
/// This enum represents the three possible outcomes of handling an input event:
/// - `Ignored` - No handler acted; the event's default behavior should run
/// - `Consumed` - The input was handled and its default behavior suppressed
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<E> {
    /// Input was not handled, the default behavior applies.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> Handled<E> {
    /// Returns true if the input was consumed (not ignored).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for Handled<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handled_helpers() {
        assert!(!Handled::<u8>::Ignored.is_consumed());
        assert!(Handled::<u8>::Consumed.is_consumed());
        assert_eq!(Handled::from(3u8), Handled::Event(3));
        assert!(Handled::from(3u8).is_consumed());
    }
}
