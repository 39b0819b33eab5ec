//! Command handlers - structural mutations of the collection forest

use std::collections::HashSet;

use crate::app::CollectionState;
use crate::constants::NEW_COLLECTION_NAME;
use crate::error::{CollectionError, CollectionResult};
use crate::ids::next_id;
use crate::messages::ChangeEvent;
use crate::models::{Container, Folder, HttpMethod, NewItemDraft, Node, NodeKind, RequestNode};

impl CollectionState {
    // ========================
    // Structure
    // ========================

    /// Append `node` to a folder's children, or to the top level when
    /// `parent` is `None`. Returns the id the node was stored under.
    pub fn add_child(&mut self, parent: Option<&str>, mut node: Node) -> CollectionResult<String> {
        let container = Container::from_parent(parent);
        self.container(&container)?;

        let mut taken: HashSet<String> = self.ids().into_iter().collect();
        claim_ids(&mut node, &mut taken);

        let id = node.id().to_string();
        self.container_mut(&container)?.push(node.clone());
        tracing::info!(id = %id, parent = ?parent, kind = node.kind().as_str(), "Added node");
        self.emit(ChangeEvent::Added {
            node,
            parent: container,
        });
        Ok(id)
    }

    /// Add a top-level folder and immediately start renaming it
    pub fn add_collection(&mut self, name: Option<&str>) -> CollectionResult<String> {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(NEW_COLLECTION_NAME);
        let id = self.add_child(None, Folder::new(name).expanded(true).into())?;
        self.start_renaming(&id)?;
        Ok(id)
    }

    /// Rename a node; a blank name becomes "Unnamed <kind>"
    pub fn rename(&mut self, id: &str, new_name: &str) -> CollectionResult<()> {
        let node = self
            .find_mut(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        let name = if new_name.trim().is_empty() {
            node.kind().unnamed()
        } else {
            new_name.to_string()
        };
        node.set_name(name.clone());

        self.clear_editing(id);
        tracing::info!(id = %id, name = %name, "Renamed node");
        self.emit(ChangeEvent::Renamed {
            id: id.to_string(),
            name,
        });
        Ok(())
    }

    /// Remove a node and its subtree from wherever it lives
    pub fn remove(&mut self, id: &str) -> CollectionResult<Node> {
        let parent = self
            .find_parent(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        let siblings = self.container_mut(&parent)?;
        let index = siblings
            .iter()
            .position(|node| node.id() == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        let node = siblings.remove(index);

        let mut removed = Vec::new();
        collect_ids(&node, &mut removed);
        for removed_id in &removed {
            self.ui.remove(removed_id);
        }

        tracing::info!(id = %id, nodes = removed.len(), "Removed node");
        self.emit(ChangeEvent::Deleted {
            node: node.clone(),
            parent,
        });
        Ok(node)
    }

    /// Flip a folder's expansion flag, returning the new value
    pub fn toggle_expand(&mut self, id: &str) -> CollectionResult<bool> {
        let expanded = match self.find_mut(id) {
            Some(Node::Folder(folder)) => {
                folder.expanded = !folder.expanded;
                folder.expanded
            }
            Some(Node::Request(_)) => return Err(CollectionError::NotAFolder(id.to_string())),
            None => return Err(CollectionError::NotFound(id.to_string())),
        };

        self.emit(ChangeEvent::Expanded {
            id: id.to_string(),
            expanded,
        });
        Ok(expanded)
    }

    /// Append an imported forest to the top level in one step.
    ///
    /// Ids that already exist in the live forest are replaced so ids stay
    /// unique; blank names get the "Unnamed <kind>" default.
    pub fn merge(&mut self, forest: Vec<Node>) -> Vec<String> {
        let mut taken: HashSet<String> = self.ids().into_iter().collect();
        let mut forest = forest;
        for node in forest.iter_mut() {
            claim_ids(node, &mut taken);
        }

        let ids: Vec<String> = forest.iter().map(|node| node.id().to_string()).collect();
        self.nodes.extend(forest);
        tracing::info!(collections = ids.len(), total = self.len(), "Merged imported forest");
        self.emit(ChangeEvent::Imported { ids: ids.clone() });
        ids
    }

    // ========================
    // Rename editing
    // ========================

    /// Put a node into rename mode, closing every other edit first
    pub fn start_renaming(&mut self, id: &str) -> CollectionResult<()> {
        if !self.contains(id) {
            return Err(CollectionError::NotFound(id.to_string()));
        }
        self.reset_editing_states();
        self.ui.entry(id.to_string()).or_default().editing = true;
        Ok(())
    }

    pub fn finish_renaming(&mut self, id: &str, new_name: &str) -> CollectionResult<()> {
        self.rename(id, new_name)
    }

    pub fn cancel_renaming(&mut self, id: &str) {
        self.clear_editing(id);
    }

    // ========================
    // New item drafts
    // ========================

    /// Open a draft child on a folder, closing every other edit first
    pub fn start_adding_item(&mut self, folder_id: &str, kind: NodeKind) -> CollectionResult<()> {
        match self.find_mut(folder_id) {
            Some(Node::Folder(folder)) => folder.expanded = true,
            Some(Node::Request(_)) => return Err(CollectionError::NotAFolder(folder_id.to_string())),
            None => return Err(CollectionError::NotFound(folder_id.to_string())),
        }

        self.reset_editing_states();
        self.ui.entry(folder_id.to_string()).or_default().new_item = Some(NewItemDraft::new(kind));
        Ok(())
    }

    /// Update the pending draft; returns false when the folder has none
    pub fn update_draft(&mut self, folder_id: &str, name: &str, method: Option<HttpMethod>) -> bool {
        let Some(draft) = self
            .ui
            .get_mut(folder_id)
            .and_then(|state| state.new_item.as_mut())
        else {
            return false;
        };

        draft.name = name.to_string();
        if draft.kind == NodeKind::Request {
            if let Some(method) = method {
                draft.method = Some(method);
            }
        }
        true
    }

    /// Turn the folder's draft into a real child.
    ///
    /// A missing or blank draft is discarded and nothing is created.
    pub fn commit_new_item(&mut self, folder_id: &str) -> CollectionResult<Option<String>> {
        let draft = self
            .ui
            .get_mut(folder_id)
            .and_then(|state| state.new_item.take());
        self.prune_idle(folder_id);

        let Some(draft) = draft else {
            return Ok(None);
        };
        let name = draft.name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let node: Node = match draft.kind {
            NodeKind::Request => {
                RequestNode::blank(name, draft.method.unwrap_or_default()).into()
            }
            NodeKind::Folder => Folder::new(name).into(),
        };
        self.add_child(Some(folder_id), node).map(Some)
    }

    pub fn cancel_adding_item(&mut self, folder_id: &str) {
        if let Some(state) = self.ui.get_mut(folder_id) {
            state.new_item = None;
        }
        self.prune_idle(folder_id);
    }

    /// Draft flow in one call: open, fill in and commit
    pub fn add_item(
        &mut self,
        folder_id: &str,
        kind: NodeKind,
        name: &str,
        method: Option<HttpMethod>,
    ) -> CollectionResult<Option<String>> {
        self.start_adding_item(folder_id, kind)?;
        self.update_draft(folder_id, name, method);
        self.commit_new_item(folder_id)
    }

    fn clear_editing(&mut self, id: &str) {
        if let Some(state) = self.ui.get_mut(id) {
            state.editing = false;
        }
        self.prune_idle(id);
    }

    fn prune_idle(&mut self, id: &str) {
        if self.ui.get(id).is_some_and(|state| state.is_idle()) {
            self.ui.remove(id);
        }
    }
}

/// Give `node` and its subtree ids not yet in `taken`, and names that are not blank
fn claim_ids(node: &mut Node, taken: &mut HashSet<String>) {
    if node.id().is_empty() || taken.contains(node.id()) {
        let mut fresh = next_id();
        while taken.contains(&fresh) {
            fresh = next_id();
        }
        tracing::debug!(old = %node.id(), new = %fresh, "Reassigned duplicate node id");
        node.set_id(fresh);
    }
    taken.insert(node.id().to_string());

    if node.name().trim().is_empty() {
        let name = node.kind().unnamed();
        node.set_name(name);
    }

    if let Node::Folder(folder) = node {
        for child in folder.children.iter_mut() {
            claim_ids(child, taken);
        }
    }
}

fn collect_ids(node: &Node, ids: &mut Vec<String>) {
    ids.push(node.id().to_string());
    for child in node.children() {
        collect_ids(child, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::sample_forest;

    fn state() -> CollectionState {
        CollectionState::with_nodes(sample_forest())
    }

    #[test]
    fn test_add_child_to_folder_and_root() {
        let mut state = state();
        let mut events = state.subscribe();

        let id = state
            .add_child(Some("users"), Node::request("Delete", HttpMethod::DELETE, "/users/1"))
            .unwrap();
        let users = state.container(&Container::Folder("users".into())).unwrap();
        assert_eq!(users.last().map(Node::id), Some(id.as_str()));

        let root_id = state.add_child(None, Node::folder("Second")).unwrap();
        assert_eq!(state.nodes().last().map(Node::id), Some(root_id.as_str()));

        match events.try_recv().unwrap() {
            ChangeEvent::Added { node, parent } => {
                assert_eq!(node.id(), id);
                assert_eq!(parent, Container::Folder("users".into()));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(
            events.try_recv().unwrap(),
            ChangeEvent::Added { parent: Container::Root, .. }
        ));
    }

    #[test]
    fn test_add_child_to_request_fails() {
        let mut state = state();
        let before = state.ids();
        let err = state.add_child(Some("ping"), Node::folder("Nested")).unwrap_err();
        assert_eq!(err, CollectionError::NotAFolder("ping".into()));
        let err = state.add_child(Some("ghost"), Node::folder("Nested")).unwrap_err();
        assert_eq!(err, CollectionError::NotFound("ghost".into()));
        assert_eq!(state.ids(), before);
    }

    #[test]
    fn test_add_child_keeps_ids_unique() {
        let mut state = state();
        let mut duplicate = RequestNode::new("Again", HttpMethod::GET, "/ping");
        duplicate.id = String::from("ping");
        let id = state.add_child(None, duplicate.into()).unwrap();
        assert_ne!(id, "ping");
        let ids = state.ids();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_rename_blank_uses_default() {
        let mut state = state();
        state.rename("users", "   ").unwrap();
        assert_eq!(state.find("users").unwrap().name(), "Unnamed folder");
        state.rename("ping", "").unwrap();
        assert_eq!(state.find("ping").unwrap().name(), "Unnamed request");
        state.rename("list", "All users").unwrap();
        assert_eq!(state.find("list").unwrap().name(), "All users");
        assert_eq!(
            state.rename("ghost", "x").unwrap_err(),
            CollectionError::NotFound("ghost".into())
        );
    }

    #[test]
    fn test_remove_nested_and_top_level() {
        let mut state = state();
        let mut events = state.subscribe();

        let removed = state.remove("users").unwrap();
        assert_eq!(removed.count(), 3);
        assert_eq!(state.ids(), vec!["api", "ping"]);

        state.remove("ping").unwrap();
        assert_eq!(state.ids(), vec!["api"]);

        match events.try_recv().unwrap() {
            ChangeEvent::Deleted { node, parent } => {
                assert_eq!(node.id(), "users");
                assert_eq!(parent, Container::Folder("api".into()));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(
            events.try_recv().unwrap(),
            ChangeEvent::Deleted { parent: Container::Root, .. }
        ));
    }

    #[test]
    fn test_remove_missing_is_reported_noop() {
        let mut state = state();
        let mut events = state.subscribe();
        assert_eq!(
            state.remove("ghost").unwrap_err(),
            CollectionError::NotFound("ghost".into())
        );
        assert_eq!(state.len(), 5);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_only_one_node_edits_at_a_time() {
        let mut state = state();
        state.start_renaming("list").unwrap();
        assert!(state.ui_state("list").editing);

        state.start_adding_item("users", NodeKind::Request).unwrap();
        assert!(!state.ui_state("list").editing);
        assert!(state.ui_state("users").new_item.is_some());

        state.start_renaming("ping").unwrap();
        assert!(state.ui_state("users").new_item.is_none());
        assert_eq!(state.editing_node(), Some("ping"));

        state.finish_renaming("ping", "Health").unwrap();
        assert_eq!(state.editing_node(), None);
    }

    #[test]
    fn test_draft_commit_creates_request() {
        let mut state = state();
        state.start_adding_item("api", NodeKind::Request).unwrap();
        assert_eq!(
            state.ui_state("api").new_item.and_then(|draft| draft.method),
            Some(HttpMethod::GET)
        );
        assert!(state.update_draft("api", "  Search  ", Some(HttpMethod::POST)));

        let id = state.commit_new_item("api").unwrap().unwrap();
        match state.find(&id).unwrap() {
            Node::Request(request) => {
                assert_eq!(request.name, "Search");
                assert_eq!(request.method, HttpMethod::POST);
                assert_eq!(request.url, "");
                assert_eq!(
                    request.headers.get("Content-Type").map(String::as_str),
                    Some("application/json")
                );
            }
            Node::Folder(_) => panic!("expected request"),
        }
        assert!(state.ui_state("api").is_idle());
    }

    #[test]
    fn test_blank_draft_is_discarded() {
        let mut state = state();
        let before = state.len();
        state.start_adding_item("users", NodeKind::Folder).unwrap();
        assert!(state.update_draft("users", "   ", None));
        assert_eq!(state.commit_new_item("users").unwrap(), None);
        assert_eq!(state.len(), before);
        assert!(state.ui_state("users").is_idle());
    }

    #[test]
    fn test_start_adding_expands_folder() {
        let mut state = state();
        state.start_adding_item("users", NodeKind::Folder).unwrap();
        match state.find("users").unwrap() {
            Node::Folder(folder) => assert!(folder.expanded),
            Node::Request(_) => panic!("expected folder"),
        }
        assert_eq!(
            state.start_adding_item("ping", NodeKind::Folder).unwrap_err(),
            CollectionError::NotAFolder("ping".into())
        );
    }

    #[test]
    fn test_add_collection_starts_renaming() {
        let mut state = state();
        let id = state.add_collection(None).unwrap();
        assert!(state.is_top_level_folder(&id));
        assert_eq!(state.find(&id).unwrap().name(), "New Collection");
        assert!(state.ui_state(&id).editing);
    }

    #[test]
    fn test_toggle_expand() {
        let mut state = state();
        assert!(!state.toggle_expand("api").unwrap());
        assert!(state.toggle_expand("api").unwrap());
        assert_eq!(
            state.toggle_expand("ping").unwrap_err(),
            CollectionError::NotAFolder("ping".into())
        );
    }

    #[test]
    fn test_merge_reassigns_colliding_ids() {
        let mut state = state();
        let mut events = state.subscribe();
        let ids = state.merge(sample_forest());

        assert_eq!(ids.len(), 2);
        assert_eq!(state.len(), 10);
        let all = state.ids();
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert!(matches!(events.try_recv().unwrap(), ChangeEvent::Imported { .. }));
    }
}
