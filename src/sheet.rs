//! The link sheet: a modal prompt that asks for a URL.
//!
//! A [`Sheet`] owns its [`Platform`] and a fixed table of listener
//! registrations. Input reaches it through [`Sheet::dispatch`], which only
//! runs handlers that are currently bound. Results are published through
//! an [`Emitter`]:
//!
//! | Action  | Event            | Extra effect                      |
//! |---------|------------------|-----------------------------------|
//! | confirm | `change(value)`  |                                   |
//! | cancel  | `cancel`         |                                   |
//! | remove  | `remove`         | clears the input first            |
//!
//! Every action emits first and then starts [`Sheet::hide`]. Hiding takes
//! the configured transition duration; the root is detached and `hide` is
//! emitted by the first [`Sheet::handle_tick`] after the deadline.

pub mod emitter;
pub mod platform;
pub mod validate;

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEvent;
use tracing::{debug, info, trace};

pub use emitter::{Emitter, EventKind, SheetEvent, SubscriptionId};
use platform::{DomEvent, ListenerId, NodeId, Platform, Selector, Target};
pub use validate::{Validator, is_url};

use crate::config::{KeyResolver, SheetAction, key_name};
use crate::ui::Handled;

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Presentation class that drives the open/close transition.
pub const VISIBLE_CLASS: &str = "show";

// Role classes a template must carry; the input is found by its tag.
pub const PROMPT_CLASS: &str = "ui-prompt";
pub const CONFIRM_CLASS: &str = "action-ok";
pub const REMOVE_CLASS: &str = "action-remove-link";
/// Optional.
pub const CANCEL_CLASS: &str = "action-cancel";

/// Nodes located in the sheet's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetNodes {
    /// Root attached to the body while the sheet is on screen.
    pub modal: NodeId,
    /// Template root; carries the transition and the presentation class.
    pub content: NodeId,
    pub input: NodeId,
    pub prompt: NodeId,
    pub confirm: NodeId,
    pub remove: NodeId,
    pub cancel: Option<NodeId>,
}

/// Actions a dispatched input event can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Confirm,
    Cancel,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Confirm,
    Cancel,
    Remove,
    InputChange,
    KeyDown,
    Escape,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    id: ListenerId,
    target: Target,
    event: DomEvent,
    handler: Handler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Hidden,
    Shown,
    /// Animating out; the root is still attached until `deadline`.
    Hiding { deadline: Instant },
}

pub struct Sheet<P: Platform> {
    platform: P,
    nodes: SheetNodes,
    message: String,
    duration: Duration,
    validator: Validator,
    resolver: Arc<KeyResolver>,
    valid: bool,
    phase: Phase,
    local: Vec<Binding>,
    window: Option<Binding>,
    emitter: Emitter,
}

impl<P: Platform> Sheet<P> {
    /// Build the sheet's tree and bind its local handlers.
    ///
    /// Fails if the template lacks the input, prompt, confirm, or remove
    /// node. An empty `initial_url` is treated as absent.
    pub fn new(
        mut platform: P,
        resolver: Arc<KeyResolver>,
        message: impl Into<String>,
        initial_url: Option<&str>,
    ) -> Result<Self> {
        let message = message.into();
        let content = platform.render_template();
        let modal = platform.create_modal(content);

        let find = |selector: Selector| {
            platform
                .query(content, selector)
                .ok_or_else(|| eyre!("sheet template has no `{selector}` node"))
        };
        let nodes = SheetNodes {
            modal,
            content,
            input: find(Selector::Tag("textarea"))?,
            prompt: find(Selector::Class(PROMPT_CLASS))?,
            confirm: find(Selector::Class(CONFIRM_CLASS))?,
            remove: find(Selector::Class(REMOVE_CLASS))?,
            cancel: platform.query(content, Selector::Class(CANCEL_CLASS)),
        };

        platform.set_disabled(nodes.confirm, true);
        platform.set_disabled(nodes.remove, true);
        platform.set_text(nodes.prompt, &message);

        let mut sheet = Self {
            platform,
            nodes,
            message,
            duration: DEFAULT_TRANSITION,
            validator: is_url,
            resolver,
            valid: false,
            phase: Phase::Hidden,
            local: Vec::new(),
            window: None,
            emitter: Emitter::new(),
        };

        if let Some(url) = initial_url.filter(|url| !url.is_empty()) {
            sheet.set_value(url);
        }
        sheet.bind();

        debug!(message = %sheet.message, valid = sheet.valid, "Created link sheet");
        Ok(sheet)
    }

    /// Use a different link predicate and re-validate the current value.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self.on_input_change();
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    // === Accessors ===

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn value(&self) -> String {
        self.platform.value(self.nodes.input)
    }

    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    pub const fn is_visible(&self) -> bool {
        matches!(self.phase, Phase::Shown)
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Takes effect on the next `show()` or `hide()`.
    pub const fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// When the pending detachment fires, if a hide is in progress.
    pub const fn pending_detach(&self) -> Option<Instant> {
        match self.phase {
            Phase::Hiding { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub const fn nodes(&self) -> SheetNodes {
        self.nodes
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub const fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn is_bound(&self) -> bool {
        !self.local.is_empty()
    }

    pub const fn is_window_bound(&self) -> bool {
        self.window.is_some()
    }

    // === Events ===

    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&SheetEvent) + 'static,
    ) -> SubscriptionId {
        self.emitter.on(kind, callback)
    }

    pub fn once(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&SheetEvent) + 'static,
    ) -> SubscriptionId {
        self.emitter.once(kind, callback)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.emitter.off(id)
    }

    // === Wiring ===

    /// Register the local handler table. Does nothing if already bound.
    ///
    /// While visible this also restores the window listener, so a host
    /// that rebinds mid-display keeps escape working.
    pub fn bind(&mut self) {
        if self.local.is_empty() {
            let nodes = self.nodes;
            let mut table = vec![
                (Target::Node(nodes.confirm), DomEvent::Click, Handler::Confirm),
                (Target::Node(nodes.remove), DomEvent::Click, Handler::Remove),
                (Target::Node(nodes.input), DomEvent::KeyUp, Handler::InputChange),
                (Target::Node(nodes.input), DomEvent::KeyDown, Handler::KeyDown),
            ];
            if let Some(cancel) = nodes.cancel {
                table.insert(1, (Target::Node(cancel), DomEvent::Click, Handler::Cancel));
            }

            for (target, event, handler) in table {
                let id = self.platform.listen(target, event);
                self.local.push(Binding {
                    id,
                    target,
                    event,
                    handler,
                });
            }
        }

        if self.is_visible() {
            self.bind_window();
        }
    }

    /// Release every registration, including the window listener.
    pub fn unbind(&mut self) {
        for binding in self.local.drain(..) {
            self.platform.unlisten(binding.id);
        }
        self.unbind_window();
    }

    fn bind_window(&mut self) {
        if self.window.is_none() {
            let id = self.platform.listen(Target::Window, DomEvent::KeyUp);
            self.window = Some(Binding {
                id,
                target: Target::Window,
                event: DomEvent::KeyUp,
                handler: Handler::Escape,
            });
        }
    }

    fn unbind_window(&mut self) {
        if let Some(binding) = self.window.take() {
            self.platform.unlisten(binding.id);
        }
    }

    /// Deliver an input event to whichever handler is bound for it.
    ///
    /// `Consumed` means the event's default action must not run. Clicks on
    /// disabled nodes are never delivered.
    pub fn dispatch(
        &mut self,
        target: Target,
        event: DomEvent,
        key: Option<&KeyEvent>,
    ) -> Handled<Action> {
        let Some(handler) = self
            .local
            .iter()
            .chain(self.window.iter())
            .find(|b| b.target == target && b.event == event)
            .map(|b| b.handler)
        else {
            return Handled::Ignored;
        };

        if let (DomEvent::Click, Target::Node(node)) = (event, target) {
            if self.platform.is_disabled(node) {
                trace!(%event, ?handler, "Not delivered, target is disabled");
                return Handled::Ignored;
            }
        }

        match handler {
            Handler::Confirm => {
                self.confirm();
                Action::Confirm.into()
            }
            Handler::Cancel => {
                self.cancel();
                Action::Cancel.into()
            }
            Handler::Remove => {
                self.remove();
                Action::Remove.into()
            }
            Handler::InputChange => {
                self.on_input_change();
                Handled::Ignored
            }
            Handler::KeyDown => key.map_or(Handled::Ignored, |key| self.on_keydown(key)),
            Handler::Escape => key.map_or(Handled::Ignored, |key| self.on_escape(key)),
        }
    }

    // === Input & validation ===

    /// Replace the input's contents, re-validate, and enable remove.
    pub fn set_value(&mut self, value: &str) {
        self.platform.set_value(self.nodes.input, value);
        self.on_input_change();
        self.platform.set_disabled(self.nodes.remove, false);
    }

    fn on_input_change(&mut self) {
        self.valid = (self.validator)(&self.value());
        self.platform.set_disabled(self.nodes.confirm, !self.valid);
    }

    /// Submit keys are matched regardless of modifiers, so shift+enter can
    /// never fall through to the textarea as a newline.
    fn on_keydown(&mut self, key: &KeyEvent) -> Handled<Action> {
        if !self.resolver.matches_sheet_loosely(key, SheetAction::Submit) {
            return Handled::Ignored;
        }

        if self.platform.is_disabled(self.nodes.confirm) {
            debug!(key = %key_name(key.code), "Submit ignored, link is not valid");
            return Handled::Consumed;
        }

        self.platform.blur(self.nodes.input);
        self.confirm();
        Action::Confirm.into()
    }

    fn on_escape(&mut self, key: &KeyEvent) -> Handled<Action> {
        if self.resolver.matches_sheet_loosely(key, SheetAction::Dismiss) {
            self.cancel();
            Action::Cancel.into()
        } else {
            Handled::Ignored
        }
    }

    // === Actions ===

    fn confirm(&mut self) {
        let value = self.value();
        info!(url = %value, "Link confirmed");
        self.emitter.emit(&SheetEvent::Change(value));
        self.hide();
    }

    fn cancel(&mut self) {
        info!("Link sheet cancelled");
        self.emitter.emit(&SheetEvent::Cancel);
        self.hide();
    }

    fn remove(&mut self) {
        self.platform.set_value(self.nodes.input, "");
        self.on_input_change();
        info!("Link removed");
        self.emitter.emit(&SheetEvent::Remove);
        self.hide();
    }

    // === Show / hide ===

    /// Attach the sheet and animate it in.
    ///
    /// No-op while already visible. During a hide animation the pending
    /// detachment is cancelled and the sheet animates back in without
    /// emitting `hide`.
    pub fn show(&mut self) {
        match self.phase {
            Phase::Shown => {
                debug!("show() ignored, sheet is already visible");
                return;
            }
            Phase::Hiding { .. } => debug!("Cancelled pending detach, sheet shown again"),
            Phase::Hidden => self.platform.append_to_body(self.nodes.modal),
        }

        let content = self.nodes.content;
        self.platform.set_transition_duration(content, self.duration);
        self.platform.force_layout(content);
        self.platform.add_class(content, VISIBLE_CLASS);
        self.platform.focus(self.nodes.input);
        self.phase = Phase::Shown;
        self.bind_window();

        self.emitter.emit(&SheetEvent::Show);
    }

    /// Animate the sheet out and schedule its detachment.
    ///
    /// The window listener is released immediately; the root is detached
    /// and `hide` emitted once the transition duration has elapsed.
    pub fn hide(&mut self) {
        if self.phase != Phase::Shown {
            debug!("hide() ignored, sheet is not visible");
            return;
        }

        let content = self.nodes.content;
        self.platform.set_transition_duration(content, self.duration);
        self.platform.force_layout(content);
        self.platform.remove_class(content, VISIBLE_CLASS);
        self.unbind_window();

        let deadline = self.platform.now() + self.duration;
        self.phase = Phase::Hiding { deadline };
    }

    /// Fire the deferred detachment if its deadline has passed.
    ///
    /// Returns true when the sheet was detached by this call.
    pub fn handle_tick(&mut self) -> bool {
        let Phase::Hiding { deadline } = self.phase else {
            return false;
        };
        if self.platform.now() < deadline {
            return false;
        }

        self.platform.remove_from_body(self.nodes.modal);
        self.phase = Phase::Hidden;
        self.emitter.emit(&SheetEvent::Hide);
        true
    }
}
