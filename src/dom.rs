//! Retained node tree behind the terminal sheet.
//!
//! [`Document`] is the terminal implementation of [`Platform`]: an arena of
//! [`Node`]s, the list of roots attached to the body, the focused node, and
//! the listener registry the host consults when routing input. It can also
//! keep a journal of every platform call, which the tests use to check
//! operation ordering.

mod clock;
mod node;
pub mod template;

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use tracing::trace;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use node::Node;

use crate::sheet::platform::{DomEvent, ListenerId, NodeId, Platform, Selector, Target};

pub const MODAL_CLASS: &str = "ui-sheet-modal";

/// A platform call, as recorded by the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Attach(NodeId),
    Detach(NodeId),
    Transition(NodeId, Duration),
    Layout(NodeId),
    AddClass(NodeId, String),
    RemoveClass(NodeId, String),
    Focus(NodeId),
    Blur(NodeId),
    Listen(Target, DomEvent),
    Unlisten(Target, DomEvent),
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    id: ListenerId,
    target: Target,
    event: DomEvent,
}

pub struct Document<C: Clock = SystemClock> {
    nodes: Vec<Node>,
    body: Vec<NodeId>,
    focused: Option<NodeId>,
    listeners: Vec<Listener>,
    next_listener: u64,
    template: fn(&mut Self) -> NodeId,
    clock: C,
    journal: Option<Vec<Op>>,
}

impl Default for Document<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Document<C> {
    pub fn new(clock: C) -> Self {
        Self {
            nodes: Vec::new(),
            body: Vec::new(),
            focused: None,
            listeners: Vec::new(),
            next_listener: 0,
            template: template::link_sheet::<C>,
            clock,
            journal: None,
        }
    }

    /// Replace the tree produced by [`Platform::render_template`].
    pub fn with_template(mut self, template: fn(&mut Self) -> NodeId) -> Self {
        self.template = template;
        self
    }

    /// Start recording platform calls.
    pub fn with_journal(mut self) -> Self {
        self.journal = Some(Vec::new());
        self
    }

    pub fn journal(&self) -> &[Op] {
        self.journal.as_deref().unwrap_or_default()
    }

    /// Drain the journal, keeping it enabled.
    pub fn take_journal(&mut self) -> Vec<Op> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn create(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        if let Some(old) = self.nodes[child.0].parent.replace(parent) {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[parent.0].children.push(child);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.body.contains(&id)
    }

    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_listening(&self, target: Target, event: DomEvent) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.event == event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run the default behavior of `key` on an editable node.
    ///
    /// Returns true if the key was understood.
    pub fn apply_default_key(&mut self, id: NodeId, key: &KeyEvent) -> bool {
        match self.node_mut(id) {
            Some(node) if node.is_editable() && !node.disabled => node.field.apply_key(key),
            _ => false,
        }
    }

    /// Insert pasted text at the node's cursor.
    pub fn insert_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.node_mut(id).filter(|n| n.is_editable()) {
            node.field.insert_str(text);
        }
    }

    fn record(&mut self, op: Op) {
        trace!(?op, "document");
        if let Some(journal) = self.journal.as_mut() {
            journal.push(op);
        }
    }

    fn touch_classes(&mut self, id: NodeId) {
        let now = self.clock.now();
        if let Some(node) = self.node_mut(id) {
            // An interrupted transition reverses from where it stood
            node.transition_from = match node.class_changed_at {
                Some(_) => 1.0 - node.transition_progress(now),
                None => 0.0,
            };
            node.class_changed_at = Some(now);
        }
    }
}

impl<C: Clock> Platform for Document<C> {
    fn render_template(&mut self) -> NodeId {
        let template = self.template;
        template(self)
    }

    fn create_modal(&mut self, content: NodeId) -> NodeId {
        let modal = self.create(Node::new("div").with_class(MODAL_CLASS));
        self.append_child(modal, content);
        modal
    }

    fn query(&self, root: NodeId, selector: Selector) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if node.matches(selector) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(node) = self.node_mut(node) {
            node.text = text.to_string();
        }
    }

    fn value(&self, node: NodeId) -> String {
        self.node(node)
            .map(|n| n.field.value().to_string())
            .unwrap_or_default()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(node) = self.node_mut(node) {
            node.field.set(value);
        }
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.disabled)
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(node) = self.node_mut(node) {
            node.disabled = disabled;
        }
    }

    fn set_transition_duration(&mut self, node: NodeId, duration: Duration) {
        if let Some(n) = self.node_mut(node) {
            n.transition = Some(duration);
        }
        self.record(Op::Transition(node, duration));
    }

    fn force_layout(&mut self, node: NodeId) -> u16 {
        self.record(Op::Layout(node));
        self.node(node)
            .map_or(0, |n| u16::try_from(n.text.chars().count()).unwrap_or(u16::MAX))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let added = self.node_mut(node).is_some_and(|n| {
            if n.has_class(class) {
                false
            } else {
                n.classes.push(class.to_string());
                true
            }
        });
        if added {
            self.touch_classes(node);
        }
        self.record(Op::AddClass(node, class.to_string()));
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let removed = self.node_mut(node).is_some_and(|n| {
            let before = n.classes.len();
            n.classes.retain(|c| c != class);
            n.classes.len() != before
        });
        if removed {
            self.touch_classes(node);
        }
        self.record(Op::RemoveClass(node, class.to_string()));
    }

    fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
        self.record(Op::Focus(node));
    }

    fn blur(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            self.focused = None;
        }
        self.record(Op::Blur(node));
    }

    fn append_to_body(&mut self, node: NodeId) {
        if !self.is_attached(node) {
            self.body.push(node);
        }
        self.record(Op::Attach(node));
    }

    fn remove_from_body(&mut self, node: NodeId) {
        self.body.retain(|n| *n != node);
        if let Some(focused) = self.focused {
            if self.is_descendant(focused, node) {
                self.focused = None;
            }
        }
        self.record(Op::Detach(node));
    }

    fn listen(&mut self, target: Target, event: DomEvent) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, target, event });
        self.record(Op::Listen(target, event));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        let Some(index) = self.listeners.iter().position(|l| l.id == id) else {
            return;
        };
        let listener = self.listeners.remove(index);
        self.record(Op::Unlisten(listener.target, listener.event));
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }
}

impl<C: Clock> Document<C> {
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn doc() -> Document<ManualClock> {
        Document::new(ManualClock::new()).with_journal()
    }

    #[test]
    fn test_query_finds_template_nodes() {
        let mut doc = doc();
        let root = doc.render_template();

        let input = doc.query(root, Selector::Tag("textarea")).unwrap();
        assert_eq!(doc.node(input).unwrap().tag, "textarea");

        for class in [
            crate::sheet::PROMPT_CLASS,
            crate::sheet::CONFIRM_CLASS,
            crate::sheet::CANCEL_CLASS,
            crate::sheet::REMOVE_CLASS,
        ] {
            let id = doc.query(root, Selector::Class(class)).unwrap();
            assert!(doc.node(id).unwrap().has_class(class));
        }
        assert_eq!(doc.query(root, Selector::Class("missing")), None);
    }

    #[test]
    fn test_query_is_depth_first_in_document_order() {
        let mut doc = doc();
        let root = doc.create(Node::new("div"));
        let first = doc.create(Node::new("div"));
        let nested = doc.create(Node::new("button").with_class("hit"));
        let second = doc.create(Node::new("button").with_class("hit"));
        doc.append_child(root, first);
        doc.append_child(first, nested);
        doc.append_child(root, second);

        assert_eq!(doc.query(root, Selector::Class("hit")), Some(nested));
    }

    #[test]
    fn test_body_attachment_is_idempotent() {
        let mut doc = doc();
        let content = doc.render_template();
        let modal = doc.create_modal(content);

        doc.append_to_body(modal);
        doc.append_to_body(modal);
        assert_eq!(doc.body(), &[modal]);

        doc.remove_from_body(modal);
        doc.remove_from_body(modal);
        assert!(doc.body().is_empty());
    }

    #[test]
    fn test_detach_drops_focus_inside_subtree() {
        let mut doc = doc();
        let content = doc.render_template();
        let modal = doc.create_modal(content);
        let input = doc.query(content, Selector::Tag("textarea")).unwrap();

        doc.append_to_body(modal);
        doc.focus(input);
        doc.remove_from_body(modal);

        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn test_listener_registry() {
        let mut doc = doc();
        let a = doc.listen(Target::Window, DomEvent::KeyUp);
        let _b = doc.listen(Target::Window, DomEvent::KeyDown);
        assert!(doc.is_listening(Target::Window, DomEvent::KeyUp));
        assert_eq!(doc.listener_count(), 2);

        doc.unlisten(a);
        doc.unlisten(a);
        assert!(!doc.is_listening(Target::Window, DomEvent::KeyUp));
        assert_eq!(doc.listener_count(), 1);
        assert_eq!(
            doc.journal()
                .iter()
                .filter(|op| matches!(op, Op::Unlisten(..)))
                .count(),
            1
        );
    }

    #[test]
    fn test_class_changes_are_timestamped() {
        let clock = ManualClock::new();
        let mut doc = Document::new(clock.clone());
        let node = doc.create(Node::new("div"));

        doc.add_class(node, "show");
        let shown_at = doc.node(node).unwrap().class_changed_at.unwrap();

        clock.advance(Duration::from_millis(50));
        doc.add_class(node, "show");
        assert_eq!(doc.node(node).unwrap().class_changed_at, Some(shown_at));

        doc.remove_class(node, "show");
        assert_eq!(
            doc.node(node).unwrap().class_changed_at,
            Some(shown_at + Duration::from_millis(50))
        );
    }

    #[test]
    fn test_default_key_only_edits_textareas() {
        let mut doc = doc();
        let root = doc.render_template();
        let input = doc.query(root, Selector::Tag("textarea")).unwrap();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(doc.apply_default_key(input, &key));
        assert!(!doc.apply_default_key(root, &key));
        doc.insert_text(input, "yz");
        assert_eq!(doc.value(input), "xyz");
    }
}
