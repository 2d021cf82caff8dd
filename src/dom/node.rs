use std::time::{Duration, Instant};

use crate::sheet::platform::{NodeId, Selector};
use crate::ui::TextField;

/// A single element in the [`Document`](super::Document) arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: &'static str,
    pub classes: Vec<String>,
    /// Label or caption text.
    pub text: String,
    /// Editable contents; only meaningful for `textarea` nodes.
    pub field: TextField,
    pub disabled: bool,
    pub transition: Option<Duration>,
    /// When the class list last changed, for transition progress.
    pub class_changed_at: Option<Instant>,
    /// Progress the current transition started at, when it interrupted another.
    pub transition_from: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            text: String::new(),
            field: TextField::default(),
            disabled: false,
            transition: None,
            class_changed_at: None,
            transition_from: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn matches(&self, selector: Selector) -> bool {
        match selector {
            Selector::Tag(tag) => self.tag == tag,
            Selector::Class(class) => self.has_class(class),
        }
    }

    pub fn is_editable(&self) -> bool {
        self.tag == "textarea"
    }

    /// Fraction of the current class transition completed at `now`.
    ///
    /// Without a recorded change or a duration the transition is complete.
    pub fn transition_progress(&self, now: Instant) -> f64 {
        let duration = self.transition.unwrap_or(Duration::ZERO);
        match self.class_changed_at {
            Some(changed) if !duration.is_zero() => {
                let elapsed = now.saturating_duration_since(changed).as_secs_f64()
                    / duration.as_secs_f64();
                (self.transition_from + elapsed).min(1.0)
            }
            _ => 1.0,
        }
    }
}
