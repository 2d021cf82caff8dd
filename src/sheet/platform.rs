//! Adapter between the sheet and whatever renders it.
//!
//! The sheet never touches a node tree directly. Every structural, style,
//! focus, and listener operation goes through [`Platform`], so the state
//! machine can run against the terminal [`Document`](crate::dom::Document)
//! or against a test double.

use std::fmt;
use std::time::{Duration, Instant};

/// Handle to a node owned by a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Handle returned by [`Platform::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Node(NodeId),
    Window,
}

/// Input events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    KeyDown,
    KeyUp,
}

impl DomEvent {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimal query language for locating template children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Matches nodes by tag name, e.g. `textarea`.
    Tag(&'static str),
    /// Matches nodes carrying a class, e.g. `action-ok`.
    Class(&'static str),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Class(class) => write!(f, ".{class}"),
        }
    }
}

/// Operations the sheet needs from its environment.
///
/// Implementations own the nodes; the sheet only holds [`NodeId`]s.
/// Operations on unknown nodes are ignored rather than reported, the same
/// way a detached element silently accepts style writes.
pub trait Platform {
    /// Build the sheet's content tree and return its root.
    fn render_template(&mut self) -> NodeId;

    /// Wrap `content` in a fresh modal root.
    fn create_modal(&mut self, content: NodeId) -> NodeId;

    /// First descendant of `root` (depth first, root included) matching `selector`.
    fn query(&self, root: NodeId, selector: Selector) -> Option<NodeId>;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn value(&self, node: NodeId) -> String;

    fn set_value(&mut self, node: NodeId, value: &str);

    fn is_disabled(&self, node: NodeId) -> bool;

    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    /// Write the node's inline transition duration.
    fn set_transition_duration(&mut self, node: NodeId, duration: Duration);

    /// Read a layout-dependent property, flushing pending style writes.
    ///
    /// The returned value is irrelevant; the read itself is what orders a
    /// following class change after the style change.
    fn force_layout(&mut self, node: NodeId) -> u16;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn focus(&mut self, node: NodeId);

    fn blur(&mut self, node: NodeId);

    fn append_to_body(&mut self, node: NodeId);

    fn remove_from_body(&mut self, node: NodeId);

    fn listen(&mut self, target: Target, event: DomEvent) -> ListenerId;

    /// Release a registration. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);

    fn now(&self) -> Instant;
}
