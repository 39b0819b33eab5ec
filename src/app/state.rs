//! Collection state - the live forest plus transient editing state, no I/O

use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::error::{CollectionError, CollectionResult};
use crate::messages::ChangeEvent;
use crate::models::{Container, Node, UiState};

/// Owns the forest of collection nodes.
///
/// Editing state (rename in progress, pending child draft) is kept in a
/// separate map keyed by node id so the persisted tree never carries it.
#[derive(Debug, Default)]
pub struct CollectionState {
    pub(crate) nodes: Vec<Node>,
    pub(crate) ui: HashMap<String, UiState>,
    listeners: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state around an already validated forest
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        CollectionState {
            nodes,
            ..Self::default()
        }
    }

    /// The top-level forest, in display order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Total number of nodes in the forest
    pub fn len(&self) -> usize {
        self.nodes.iter().map(Node::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================
    // Change notifications
    // ========================

    /// Register a listener for committed changes
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Broadcast a change; must only be called once the mutation is complete
    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        tracing::debug!(action = event.action(), node = ?event.node_id(), "Collection changed");
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ========================
    // Lookup & traversal
    // ========================

    /// Depth-first pre-order visit of every node
    pub fn traverse<F: FnMut(&Node)>(&self, mut callback: F) {
        fn walk<F: FnMut(&Node)>(nodes: &[Node], callback: &mut F) {
            for node in nodes {
                callback(node);
                walk(node.children(), callback);
            }
        }
        walk(&self.nodes, &mut callback);
    }

    /// Ids of every node, in traversal order
    pub fn ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.traverse(|node| ids.push(node.id().to_string()));
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        fn search<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
            for node in nodes {
                if node.id() == id {
                    return Some(node);
                }
                if let Some(found) = search(node.children(), id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.nodes, id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        find_in_mut(&mut self.nodes, id)
    }

    /// Locate the container owning `id`.
    ///
    /// Walks the whole forest, so the cost is linear in the number of nodes.
    pub fn find_parent(&self, id: &str) -> Option<Container> {
        fn search(nodes: &[Node], id: &str) -> Option<Container> {
            for node in nodes {
                if let Node::Folder(folder) = node {
                    if folder.children.iter().any(|child| child.id() == id) {
                        return Some(Container::Folder(folder.id.clone()));
                    }
                    if let Some(found) = search(&folder.children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }

        if self.nodes.iter().any(|node| node.id() == id) {
            return Some(Container::Root);
        }
        search(&self.nodes, id)
    }

    /// True when `id` is a folder sitting directly in the top-level forest
    pub fn is_top_level_folder(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.is_folder() && node.id() == id)
    }

    /// Children of a container
    pub fn container(&self, container: &Container) -> CollectionResult<&[Node]> {
        match container {
            Container::Root => Ok(&self.nodes),
            Container::Folder(id) => match self.find(id) {
                Some(Node::Folder(folder)) => Ok(&folder.children),
                Some(Node::Request(_)) => Err(CollectionError::NotAFolder(id.clone())),
                None => Err(CollectionError::NotFound(id.clone())),
            },
        }
    }

    pub(crate) fn container_mut(&mut self, container: &Container) -> CollectionResult<&mut Vec<Node>> {
        match container {
            Container::Root => Ok(&mut self.nodes),
            Container::Folder(id) => match self.find_mut(id) {
                Some(Node::Folder(folder)) => Ok(&mut folder.children),
                Some(Node::Request(_)) => Err(CollectionError::NotAFolder(id.clone())),
                None => Err(CollectionError::NotFound(id.clone())),
            },
        }
    }

    // ========================
    // Transient editing state
    // ========================

    /// Editing state of a node; idle when nothing is in progress
    pub fn ui_state(&self, id: &str) -> UiState {
        self.ui.get(id).cloned().unwrap_or_default()
    }

    /// Id of the node currently being renamed or receiving a draft
    pub fn editing_node(&self) -> Option<&str> {
        self.ui
            .iter()
            .find(|(_, state)| !state.is_idle())
            .map(|(id, _)| id.as_str())
    }

    /// Close every rename and add-child draft in the tree
    pub fn reset_editing_states(&mut self) {
        let mut ids = Vec::new();
        self.traverse(|node| ids.push(node.id().to_string()));
        for id in ids {
            self.ui.remove(&id);
        }
    }
}

fn find_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if let Some(found) = find_in_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}
