//! Named events published by a sheet to its host.

use std::fmt;

use tracing::trace;

/// Events emitted by a [`Sheet`](super::Sheet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetEvent {
    /// The sheet was attached and animated in.
    Show,
    /// The hide animation finished and the sheet was detached.
    Hide,
    /// The user confirmed a valid link.
    Change(String),
    /// The user dismissed the sheet.
    Cancel,
    /// The user removed the link.
    Remove,
}

impl SheetEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Show => EventKind::Show,
            Self::Hide => EventKind::Hide,
            Self::Change(_) => EventKind::Change,
            Self::Cancel => EventKind::Cancel,
            Self::Remove => EventKind::Remove,
        }
    }
}

/// The name a subscriber registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Show,
    Hide,
    Change,
    Cancel,
    Remove,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::Show,
        Self::Hide,
        Self::Change,
        Self::Cancel,
        Self::Remove,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Change => "change",
            Self::Cancel => "cancel",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`Emitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&SheetEvent)>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    once: bool,
    callback: Callback,
}

/// Synchronous publish/subscribe registry.
///
/// Delivery happens inside [`Emitter::emit`], to every subscriber of the
/// event's kind, in registration order.
#[derive(Default)]
pub struct Emitter {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every event of `kind`.
    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&SheetEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribe(kind, false, Box::new(callback))
    }

    /// Register `callback` for the next event of `kind` only.
    pub fn once(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&SheetEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribe(kind, true, Box::new(callback))
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscribers.iter().filter(|s| s.kind == kind).count()
    }

    pub fn emit(&mut self, event: &SheetEvent) {
        let kind = event.kind();
        trace!(%kind, subscribers = self.listener_count(kind), "Emitting sheet event");
        let mut fired_once = Vec::new();

        for subscriber in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (subscriber.callback)(event);
            if subscriber.once {
                fired_once.push(subscriber.id);
            }
        }

        if !fired_once.is_empty() {
            self.subscribers.retain(|s| !fired_once.contains(&s.id));
        }
    }

    fn subscribe(&mut self, kind: EventKind, once: bool, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            once,
            callback,
        });
        id
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
