//! The sheet's node tree.
//!
//! ```text
//! div.ui-sheet
//! ├── label.ui-prompt
//! ├── textarea
//! └── div.ui-actions
//!     ├── button.action-cancel        "Cancel"
//!     ├── button.action-remove-link   "Remove"
//!     └── button.action-ok            "Save"
//! ```

use super::{Clock, Document, Node};
use crate::sheet::platform::NodeId;
use crate::sheet::{CANCEL_CLASS, CONFIRM_CLASS, PROMPT_CLASS, REMOVE_CLASS};

pub const SHEET_CLASS: &str = "ui-sheet";

/// Build the link sheet's content tree and return its root.
pub fn link_sheet<C: Clock>(doc: &mut Document<C>) -> NodeId {
    let root = doc.create(Node::new("div").with_class(SHEET_CLASS));
    let prompt = doc.create(Node::new("label").with_class(PROMPT_CLASS));
    let input = doc.create(Node::new("textarea"));
    let actions = doc.create(Node::new("div").with_class("ui-actions"));
    let cancel = doc.create(Node::new("button").with_class(CANCEL_CLASS).with_text("Cancel"));
    let remove = doc.create(Node::new("button").with_class(REMOVE_CLASS).with_text("Remove"));
    let confirm = doc.create(Node::new("button").with_class(CONFIRM_CLASS).with_text("Save"));

    doc.append_child(root, prompt);
    doc.append_child(root, input);
    doc.append_child(root, actions);
    doc.append_child(actions, cancel);
    doc.append_child(actions, remove);
    doc.append_child(actions, confirm);
    root
}
