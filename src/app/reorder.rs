//! Reordering nodes among their siblings

use crate::app::CollectionState;
use crate::error::CollectionResult;
use crate::messages::ChangeEvent;
use crate::models::Container;

/// Move one element of `items` from `from` to `to`, shifting the rest.
///
/// Both indices are clamped into the slice bounds. Returns the effective
/// `(from, to)` pair, or `None` for an empty list.
pub fn move_item_in_vec<T>(items: &mut Vec<T>, from: usize, to: usize) -> Option<(usize, usize)> {
    if items.is_empty() {
        return None;
    }
    let last = items.len() - 1;
    let from = from.min(last);
    let to = to.min(last);

    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Some((from, to))
}

impl CollectionState {
    /// Reposition a node within one container
    pub fn move_item(&mut self, container: &Container, from: usize, to: usize) -> CollectionResult<()> {
        let siblings = self.container_mut(container)?;
        let Some((from, to)) = move_item_in_vec(siblings, from, to) else {
            return Ok(());
        };
        let id = siblings[to].id().to_string();

        tracing::debug!(id = %id, from, to, "Reordered node");
        self.emit(ChangeEvent::Reordered {
            id,
            container: container.clone(),
            from,
            to,
        });
        Ok(())
    }

    /// Handle a drop gesture. Drops across two different containers are
    /// ignored; returns whether anything was applied.
    pub fn drop_item(
        &mut self,
        source: &Container,
        target: &Container,
        from: usize,
        to: usize,
    ) -> CollectionResult<bool> {
        if source != target {
            tracing::debug!(?source, ?target, "Ignoring drop across containers");
            return Ok(false);
        }
        self.move_item(target, from, to)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::sample_forest;
    use crate::models::{HttpMethod, Node};

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::name).collect()
    }

    #[test]
    fn test_move_item_in_vec() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(move_item_in_vec(&mut items, 0, 2), Some((0, 2)));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        assert_eq!(move_item_in_vec(&mut items, 3, 0), Some((3, 0)));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);

        // Out of range indices clamp to the last slot
        assert_eq!(move_item_in_vec(&mut items, 9, 1), Some((3, 1)));
        assert_eq!(items, vec!['d', 'a', 'b', 'c']);

        let mut empty: Vec<char> = Vec::new();
        assert_eq!(move_item_in_vec(&mut empty, 0, 1), None);
    }

    #[test]
    fn test_move_within_folder() {
        let mut state = CollectionState::with_nodes(sample_forest());
        let users = Container::Folder("users".into());
        state
            .add_child(Some("users"), Node::request("Delete", HttpMethod::DELETE, "/users/1"))
            .unwrap();
        let mut events = state.subscribe();

        let mut before: Vec<String> = state.ids();
        state.move_item(&users, 2, 0).unwrap();
        let mut after: Vec<String> = state.ids();

        assert_eq!(
            names(state.container(&users).unwrap()),
            vec!["Delete", "List", "Create"]
        );
        before.sort();
        after.sort();
        assert_eq!(before, after);

        match events.try_recv().unwrap() {
            ChangeEvent::Reordered { container, from, to, .. } => {
                assert_eq!(container, users);
                assert_eq!((from, to), (2, 0));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_move_at_top_level() {
        let mut state = CollectionState::with_nodes(sample_forest());
        state.move_item(&Container::Root, 1, 0).unwrap();
        assert_eq!(names(state.nodes()), vec!["Ping", "API"]);
    }

    #[test]
    fn test_drop_across_containers_is_noop() {
        let mut state = CollectionState::with_nodes(sample_forest());
        let mut events = state.subscribe();
        let before = state.nodes().to_vec();

        let applied = state
            .drop_item(&Container::Root, &Container::Folder("users".into()), 1, 0)
            .unwrap();

        assert!(!applied);
        assert_eq!(state.nodes(), before.as_slice());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_drop_within_same_container() {
        let mut state = CollectionState::with_nodes(sample_forest());
        let users = Container::Folder("users".into());
        assert!(state.drop_item(&users, &users, 0, 1).unwrap());
        assert_eq!(names(state.container(&users).unwrap()), vec!["Create", "List"]);
    }
}
