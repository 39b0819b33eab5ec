//! Commands sent to the collection actor

use crate::models::{Container, HttpMethod, Node, NodeKind};

/// Mutations the collection actor applies, one at a time
#[derive(Debug, Clone)]
pub enum CollectionCommand {
    /// Append a node to a folder, or to the top level when `parent` is `None`
    AddChild {
        parent: Option<String>,
        node: Node,
    },
    /// Create a new top-level collection and start renaming it
    AddCollection {
        name: Option<String>,
    },
    /// Create a child through the sidebar draft flow
    AddItem {
        parent: String,
        kind: NodeKind,
        name: String,
        method: Option<HttpMethod>,
    },
    Rename {
        id: String,
        name: String,
    },
    Remove {
        id: String,
    },
    ToggleExpand {
        id: String,
    },
    /// Move a node within one container
    Move {
        container: Container,
        from: usize,
        to: usize,
    },
    /// Drop from one container into another; only same-container drops apply
    Drop {
        source: Container,
        target: Container,
        from: usize,
        to: usize,
    },
    /// Merge a fully parsed import at the top level
    Merge {
        forest: Vec<Node>,
    },
    /// Stop the actor and hand back the final state
    Shutdown,
}
