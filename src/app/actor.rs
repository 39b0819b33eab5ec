//! Collection actor - message loop applying commands to the tree store

use tokio::sync::mpsc;

use crate::app::state::CollectionState;
use crate::error::CollectionResult;
use crate::messages::CollectionCommand;

/// Single writer over the collection forest.
///
/// Commands are applied strictly one after another, so subscribers never
/// observe a half-applied mutation or a partially merged import.
pub struct CollectionActor {
    state: CollectionState,
    outcome_tx: mpsc::UnboundedSender<CollectionResult<()>>,
}

impl CollectionActor {
    pub fn new(
        state: CollectionState,
        outcome_tx: mpsc::UnboundedSender<CollectionResult<()>>,
    ) -> Self {
        CollectionActor { state, outcome_tx }
    }

    /// Run the actor message loop, returning the final state on shutdown
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<CollectionCommand>) -> CollectionState {
        while let Some(command) = cmd_rx.recv().await {
            if matches!(command, CollectionCommand::Shutdown) {
                break;
            }

            let outcome = self.handle_command(command);
            if let Err(e) = &outcome {
                tracing::warn!(error = %e, "Collection command rejected");
            }
            let _ = self.outcome_tx.send(outcome);
        }

        tracing::debug!(nodes = self.state.len(), "Collection actor stopped");
        self.state
    }

    /// Apply a single command to the state
    fn handle_command(&mut self, command: CollectionCommand) -> CollectionResult<()> {
        match command {
            CollectionCommand::AddChild { parent, node } => {
                self.state.add_child(parent.as_deref(), node)?;
            }
            CollectionCommand::AddCollection { name } => {
                self.state.add_collection(name.as_deref())?;
            }
            CollectionCommand::AddItem {
                parent,
                kind,
                name,
                method,
            } => {
                self.state.add_item(&parent, kind, &name, method)?;
            }
            CollectionCommand::Rename { id, name } => self.state.rename(&id, &name)?,
            CollectionCommand::Remove { id } => {
                self.state.remove(&id)?;
            }
            CollectionCommand::ToggleExpand { id } => {
                self.state.toggle_expand(&id)?;
            }
            CollectionCommand::Move {
                container,
                from,
                to,
            } => self.state.move_item(&container, from, to)?,
            CollectionCommand::Drop {
                source,
                target,
                from,
                to,
            } => {
                self.state.drop_item(&source, &target, from, to)?;
            }
            CollectionCommand::Merge { forest } => {
                self.state.merge(forest);
            }
            CollectionCommand::Shutdown => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::sample_forest;
    use crate::error::CollectionError;
    use crate::messages::ChangeEvent;
    use crate::models::{Container, NodeKind};

    #[tokio::test]
    async fn test_actor_applies_commands_in_order() {
        let mut state = CollectionState::with_nodes(sample_forest());
        let mut events = state.subscribe();

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(CollectionActor::new(state, outcome_tx).run(cmd_rx));

        cmd_tx
            .send(CollectionCommand::Rename {
                id: "ping".into(),
                name: "Health".into(),
            })
            .unwrap();
        cmd_tx
            .send(CollectionCommand::AddItem {
                parent: "ping".into(),
                kind: NodeKind::Folder,
                name: "Nested".into(),
                method: None,
            })
            .unwrap();
        cmd_tx
            .send(CollectionCommand::Move {
                container: Container::Root,
                from: 1,
                to: 0,
            })
            .unwrap();
        cmd_tx.send(CollectionCommand::Shutdown).unwrap();

        let state = handle.await.unwrap();
        assert_eq!(state.nodes()[0].name(), "Health");

        assert_eq!(outcome_rx.recv().await, Some(Ok(())));
        assert_eq!(
            outcome_rx.recv().await,
            Some(Err(CollectionError::NotAFolder("ping".into())))
        );
        assert_eq!(outcome_rx.recv().await, Some(Ok(())));

        assert_eq!(events.recv().await.map(|e| e.action().to_string()), Some("rename".into()));
        assert_eq!(events.recv().await.map(|e| e.action().to_string()), Some("reorder".into()));
        assert!(matches!(events.try_recv(), Err(_)));
    }

    #[tokio::test]
    async fn test_actor_merges_forest() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (outcome_tx, _outcome_rx) = mpsc::unbounded_channel();
        let mut state = CollectionState::new();
        let mut events = state.subscribe();
        let handle = tokio::spawn(CollectionActor::new(state, outcome_tx).run(cmd_rx));

        cmd_tx
            .send(CollectionCommand::Merge {
                forest: sample_forest(),
            })
            .unwrap();
        cmd_tx.send(CollectionCommand::Shutdown).unwrap();

        let state = handle.await.unwrap();
        assert_eq!(state.len(), 5);
        assert_eq!(
            events.recv().await,
            Some(ChangeEvent::Imported {
                ids: vec!["api".into(), "ping".into()]
            })
        );
    }
}
