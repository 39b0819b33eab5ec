//! Change notifications emitted by the tree store after a mutation commits

use crate::models::{Container, Node};

/// A committed change to the collection forest
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A node was appended to a container
    Added {
        node: Node,
        parent: Container,
    },
    /// A node's display name changed
    Renamed {
        id: String,
        name: String,
    },
    /// A node (and its subtree) was removed
    Deleted {
        node: Node,
        parent: Container,
    },
    /// A node moved within its container
    Reordered {
        id: String,
        container: Container,
        from: usize,
        to: usize,
    },
    /// A folder was expanded or collapsed
    Expanded {
        id: String,
        expanded: bool,
    },
    /// An imported forest was merged at the top level
    Imported {
        ids: Vec<String>,
    },
}

impl ChangeEvent {
    /// Short action label, matching the sidebar's change log
    pub fn action(&self) -> &str {
        match self {
            ChangeEvent::Added { .. } => "add",
            ChangeEvent::Renamed { .. } => "rename",
            ChangeEvent::Deleted { .. } => "delete",
            ChangeEvent::Reordered { .. } => "reorder",
            ChangeEvent::Expanded { .. } => "expand",
            ChangeEvent::Imported { .. } => "import",
        }
    }

    /// Id of the node the change refers to, if it refers to exactly one
    pub fn node_id(&self) -> Option<&str> {
        match self {
            ChangeEvent::Added { node, .. } | ChangeEvent::Deleted { node, .. } => Some(node.id()),
            ChangeEvent::Renamed { id, .. }
            | ChangeEvent::Reordered { id, .. }
            | ChangeEvent::Expanded { id, .. } => Some(id),
            ChangeEvent::Imported { .. } => None,
        }
    }
}
