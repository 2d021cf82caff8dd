use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::Theme;
use crate::cli::Args;
use crate::config::{AppConfig, KeyResolver, SheetAction};
use crate::dom::Document;
use crate::message::AppMessage;
use crate::sheet::platform::{DomEvent, NodeId, Platform, Target};
use crate::sheet::{EventKind, Sheet, SheetEvent};
use crate::tui::{Event, Tui};
use crate::ui::SheetView;

const FRAME_EVERY: Duration = Duration::from_millis(16);
/// Bounds how late the deferred hide can fire.
const TICK_EVERY: Duration = Duration::from_millis(33);

/// How the user left the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(String),
    Removed,
    Cancelled,
}

/// Hosts a single link sheet in the terminal.
///
/// Terminal input is translated into dispatches on the sheet's bound
/// targets, and the sheet's events come back through the message channel.
/// The app quits once the sheet has emitted `hide`.
pub struct App {
    sheet: Sheet<Document>,
    view: SheetView,
    theme: Theme,
    resolver: Arc<KeyResolver>,
    outcome: Option<Outcome>,
    should_quit: bool,
    should_suspend: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        args: &Args,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Result<Self> {
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        let message = args
            .message
            .clone()
            .unwrap_or_else(|| config.sheet.message.clone());
        let duration = args
            .duration
            .map_or_else(|| config.sheet.transition_duration(), Duration::from_millis);

        let mut sheet = Sheet::new(
            Document::default(),
            Arc::clone(&resolver),
            message,
            args.url.as_deref(),
        )?
        .with_duration(duration);

        for kind in EventKind::ALL {
            let tx = message_tx.clone();
            sheet.on(kind, move |event| {
                let _ = tx.send(AppMessage::Sheet(event.clone()));
            });
        }

        Ok(Self {
            sheet,
            view: SheetView::new(),
            theme,
            resolver,
            outcome: None,
            should_quit: false,
            should_suspend: false,
            message_tx,
            message_rx,
        })
    }

    /// Show the sheet and run until it has been dismissed.
    pub async fn run(&mut self) -> Result<Option<Outcome>> {
        let mut tui = Tui::new(FRAME_EVERY, TICK_EVERY)?;
        tui.enter()?;
        self.sheet.show();

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.message_tx.send(AppMessage::Resume)?;
                self.message_tx.send(AppMessage::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        self.sheet.unbind();
        tui.exit()?;
        Ok(self.outcome.take())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.message_tx.send(AppMessage::Quit)?,
            Event::Tick => self.message_tx.send(AppMessage::Tick)?,
            Event::Render => self.message_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => {
                self.message_tx.send(AppMessage::Resize(width, height))?;
            }
            Event::Key(key) => self.handle_key_event(&key)?,
            Event::Mouse(mouse) => self.handle_mouse_event(&mouse),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Error(error) => warn!(%error, "Terminal event error"),
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('z') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.message_tx.send(AppMessage::Suspend)?;
            return Ok(());
        }
        if !self.sheet.is_visible() {
            return Ok(());
        }

        let input = self.sheet.nodes().input;
        let focused = self.sheet.platform().focused();
        if focused == Some(input) {
            let handled = self
                .sheet
                .dispatch(Target::Node(input), DomEvent::KeyDown, Some(key));
            if !handled.is_consumed() && !self.move_focus(key) {
                self.sheet.platform_mut().apply_default_key(input, key);
            }
        } else if let Some(button) =
            focused.filter(|_| self.resolver.matches_sheet(key, SheetAction::Press))
        {
            self.sheet
                .dispatch(Target::Node(button), DomEvent::Click, None);
        } else {
            self.move_focus(key);
        }

        // The release reaches whatever holds focus now, then the window
        if let Some(node) = self.sheet.platform().focused() {
            self.sheet
                .dispatch(Target::Node(node), DomEvent::KeyUp, Some(key));
        }
        self.sheet.dispatch(Target::Window, DomEvent::KeyUp, Some(key));
        Ok(())
    }

    /// Cycle focus on the next/previous bindings. Returns true if focus moved.
    fn move_focus(&mut self, key: &KeyEvent) -> bool {
        let forward = if self.resolver.matches_sheet(key, SheetAction::Previous) {
            false
        } else if self.resolver.matches_sheet(key, SheetAction::Next) {
            true
        } else {
            return false;
        };

        let order = self.focus_order();
        let len = order.len();
        let current = self
            .sheet
            .platform()
            .focused()
            .and_then(|node| order.iter().position(|n| *n == node));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.sheet.platform_mut().focus(order[next]);
        true
    }

    /// The input followed by the enabled buttons, in on-screen order.
    fn focus_order(&self) -> Vec<NodeId> {
        let nodes = self.sheet.nodes();
        let doc = self.sheet.platform();
        let buttons = nodes
            .cancel
            .into_iter()
            .chain([nodes.remove, nodes.confirm])
            .filter(|id| !doc.is_disabled(*id));
        std::iter::once(nodes.input).chain(buttons).collect()
    }

    fn handle_mouse_event(&mut self, mouse: &MouseEvent) {
        if !self.sheet.is_visible() || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(node) = self.view.hit_test(mouse.column, mouse.row) else {
            return;
        };

        self.sheet.platform_mut().focus(node);
        if node != self.sheet.nodes().input {
            self.sheet.dispatch(Target::Node(node), DomEvent::Click, None);
        }
    }

    fn handle_paste(&mut self, text: &str) {
        let input = self.sheet.nodes().input;
        if !self.sheet.is_visible() || self.sheet.platform().focused() != Some(input) {
            return;
        }
        self.sheet.platform_mut().insert_text(input, text);
        self.sheet
            .dispatch(Target::Node(input), DomEvent::KeyUp, None);
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            match message {
                AppMessage::Render => {
                    self.sheet.handle_tick();
                    self.render(tui)?;
                }
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(tui)?;
                }
                AppMessage::ClearScreen => tui.clear()?,
                message => self.update(message),
            }
        }
        Ok(())
    }

    fn update(&mut self, message: AppMessage) {
        if message != AppMessage::Tick {
            debug!(?message, "Handling message");
        }

        match message {
            AppMessage::Tick => {
                self.sheet.handle_tick();
            }
            AppMessage::Quit => {
                self.outcome.get_or_insert(Outcome::Cancelled);
                self.should_quit = true;
            }
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::Sheet(event) => self.handle_sheet_event(event),
            AppMessage::Render | AppMessage::Resize(..) | AppMessage::ClearScreen => {}
        }
    }

    fn handle_sheet_event(&mut self, event: SheetEvent) {
        match event {
            SheetEvent::Show => debug!(message = self.sheet.message(), "Sheet shown"),
            SheetEvent::Change(url) => self.outcome = Some(Outcome::Changed(url)),
            SheetEvent::Remove => self.outcome = Some(Outcome::Removed),
            SheetEvent::Cancel => self.outcome = Some(Outcome::Cancelled),
            SheetEvent::Hide => {
                info!(outcome = ?self.outcome, "Sheet closed");
                self.should_quit = true;
            }
        }
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.view
            .render(frame, area, &self.theme, &self.sheet, &self.resolver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::KeyEventKind;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app(extra: &[&str]) -> App {
        let args = Args::parse_from(["linksheet", "--duration", "0"].iter().chain(extra));
        let mut app = App::new(
            &AppConfig::default(),
            &args,
            Arc::new(KeyResolver::default()),
            Theme::default(),
        )
        .unwrap();
        app.sheet.show();
        app
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_key_event(&KeyEvent::new(code, modifiers)).unwrap();
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Deliver queued messages and one tick, as the run loop would.
    fn settle(app: &mut App) {
        app.update(AppMessage::Tick);
        while let Ok(message) = app.message_rx.try_recv() {
            app.update(message);
        }
    }

    #[test]
    fn test_typed_link_is_confirmed_with_enter() {
        let mut app = app(&[]);
        type_str(&mut app, "https://example.com");
        assert!(app.sheet.is_valid());

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        settle(&mut app);

        assert!(app.should_quit);
        assert_eq!(
            app.outcome,
            Some(Outcome::Changed("https://example.com".to_string()))
        );
        assert!(!app.sheet.platform().is_attached(app.sheet.nodes().modal));
    }

    #[test]
    fn test_shift_enter_confirms_without_newline() {
        let mut app = app(&[]);
        type_str(&mut app, "https://example.com");
        press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        settle(&mut app);

        assert_eq!(
            app.outcome,
            Some(Outcome::Changed("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_enter_on_invalid_link_does_nothing() {
        let mut app = app(&[]);
        type_str(&mut app, "example");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        settle(&mut app);

        assert!(!app.should_quit);
        assert_eq!(app.outcome, None);
        assert_eq!(app.sheet.value(), "example");
    }

    #[test]
    fn test_escape_cancels() {
        let mut app = app(&["--url", "https://example.com"]);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        settle(&mut app);

        assert!(app.should_quit);
        assert_eq!(app.outcome, Some(Outcome::Cancelled));
    }

    #[test]
    fn test_tab_skips_disabled_buttons() {
        let mut app = app(&[]);
        let nodes = app.sheet.nodes();
        assert_eq!(app.sheet.platform().focused(), Some(nodes.input));

        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.sheet.platform().focused(), nodes.cancel);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.sheet.platform().focused(), Some(nodes.input));
        press(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.sheet.platform().focused(), nodes.cancel);
    }

    #[test]
    fn test_space_presses_focused_remove() {
        let mut app = app(&["--url", "https://example.com"]);
        let nodes = app.sheet.nodes();
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.sheet.platform().focused(), Some(nodes.remove));

        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        settle(&mut app);

        assert_eq!(app.outcome, Some(Outcome::Removed));
        assert_eq!(app.sheet.value(), "");
    }

    #[test]
    fn test_paste_revalidates() {
        let mut app = app(&[]);
        app.handle_paste("https://example.com/a b");
        assert!(!app.sheet.is_valid());

        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        app.handle_paste("https://example.com");
        assert!(app.sheet.is_valid());
        assert!(!app.sheet.platform().is_disabled(app.sheet.nodes().confirm));
    }

    #[test]
    fn test_click_confirm() {
        let mut app = app(&["--url", "https://example.com"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let confirm = app.sheet.nodes().confirm;
        let (column, row) = (0..16)
            .flat_map(|row| (0..60).map(move |column| (column, row)))
            .find(|&(column, row)| app.view.hit_test(column, row) == Some(confirm))
            .unwrap();

        app.handle_mouse_event(&MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
        settle(&mut app);

        assert_eq!(
            app.outcome,
            Some(Outcome::Changed("https://example.com".to_string()))
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_suspend_and_quit_messages() {
        let mut app = app(&[]);
        press(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        settle(&mut app);
        assert!(app.should_suspend);
        assert_eq!(app.sheet.value(), "");

        app.update(AppMessage::Resume);
        assert!(!app.should_suspend);

        app.update(AppMessage::Quit);
        assert!(app.should_quit);
        assert_eq!(app.outcome, Some(Outcome::Cancelled));
    }

    #[test]
    fn test_keys_ignored_after_sheet_closes() {
        let mut app = app(&[]);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        settle(&mut app);

        let key = KeyEvent::new_with_kind(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Press);
        app.handle_key_event(&key).unwrap();
        assert_eq!(app.sheet.value(), "");
    }
}
