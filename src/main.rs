//! Freeman Collections - command-line front end for the collection tree
//!
//! Loads the workspace, hands mutations to the collection actor, prints the
//! resulting change events and saves the workspace when anything changed.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use freeman_collections::constants::{APP_NAME, LOG_FILE_NAME};
use freeman_collections::ui::render_tree;
use freeman_collections::{
    export_all, export_one, parse_import, ChangeEvent, CollectionActor, CollectionCommand,
    CollectionState, Container, HttpMethod, Node, NodeKind, RequestNode, Storage, TextFiles,
};

#[derive(Parser)]
#[command(name = "freeman-collections", version, about = "Manage Freeman API request collections")]
struct Cli {
    /// Workspace directory (defaults to ~/.freeman/collections)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the collection tree
    Tree,
    /// Import a collection export or an OpenAPI JSON document
    Import { file: PathBuf },
    /// Export every collection, or a single top-level collection
    Export {
        #[arg(long)]
        collection: Option<String>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Create a new top-level collection
    AddCollection { name: Option<String> },
    /// Add a folder to a folder, or at the top level
    AddFolder {
        #[arg(long)]
        parent: Option<String>,
        name: String,
    },
    /// Add a request to a folder, or at the top level
    AddRequest {
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value = "GET", value_parser = parse_method)]
        method: HttpMethod,
        #[arg(long, default_value = "")]
        url: String,
        name: String,
    },
    /// Rename a node
    Rename { id: String, name: String },
    /// Delete a node and everything under it
    Remove { id: String },
    /// Move a node within its folder (or the top level)
    Move {
        #[arg(long)]
        parent: Option<String>,
        from: usize,
        to: usize,
    },
    /// Expand or collapse a folder
    Expand { id: String },
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    HttpMethod::parse(s).ok_or_else(|| format!("unsupported method '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = cli.workspace.clone().map(Storage::at).unwrap_or_default();
    storage.ensure_dir()?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(storage.dir(), LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(app = APP_NAME, workspace = %storage.dir().display(), "Starting");

    let mut state = CollectionState::new();
    state.merge(storage.load_collections()?);

    let command = match cli.command {
        Command::Tree => {
            print!("{}", render_tree(state.nodes()));
            return Ok(());
        }
        Command::Export { collection, out } => {
            let envelope = match collection {
                Some(id) => export_one(state.nodes(), &id)
                    .ok_or_else(|| anyhow!("'{}' is not a top-level collection", id))?,
                None => export_all(state.nodes()),
            };
            let path = Storage::at(out).write_envelope(&envelope)?;
            println!("Exported '{}' to {}", envelope.name, path.display());
            return Ok(());
        }
        Command::Import { file } => {
            // Parse fully before anything reaches the tree
            let text = storage.read_file_as_text(&file)?;
            let imported = parse_import(&text)?;
            println!(
                "Parsed {} import with {} node(s)",
                imported.format.as_str(),
                imported.nodes.iter().map(Node::count).sum::<usize>()
            );
            CollectionCommand::Merge {
                forest: imported.nodes,
            }
        }
        Command::AddCollection { name } => CollectionCommand::AddCollection { name },
        Command::AddFolder {
            parent: Some(parent),
            name,
        } => CollectionCommand::AddItem {
            parent,
            kind: NodeKind::Folder,
            name,
            method: None,
        },
        Command::AddFolder { parent: None, name } => CollectionCommand::AddChild {
            parent: None,
            node: Node::folder(name),
        },
        Command::AddRequest {
            parent,
            method,
            url,
            name,
        } => {
            let mut request = RequestNode::blank(name, method);
            request.url = url;
            CollectionCommand::AddChild {
                parent,
                node: request.into(),
            }
        }
        Command::Rename { id, name } => CollectionCommand::Rename { id, name },
        Command::Remove { id } => CollectionCommand::Remove { id },
        Command::Move { parent, from, to } => CollectionCommand::Move {
            container: Container::from_parent(parent.as_deref()),
            from,
            to,
        },
        Command::Expand { id } => CollectionCommand::ToggleExpand { id },
    };

    let mut events = state.subscribe();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<CollectionCommand>();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

    // Spawn collection actor
    let actor = tokio::spawn(CollectionActor::new(state, outcome_tx).run(cmd_rx));
    for command in [command, CollectionCommand::Shutdown] {
        cmd_tx
            .send(command)
            .map_err(|_| anyhow!("collection actor stopped unexpectedly"))?;
    }
    let state = actor.await?;

    while let Ok(outcome) = outcome_rx.try_recv() {
        outcome?;
    }

    let mut changed = false;
    while let Ok(event) = events.try_recv() {
        println!("{}", describe(&event));
        changed = true;
    }

    if changed {
        let path = storage.save_collections(state.nodes())?;
        tracing::info!(path = %path.display(), nodes = state.len(), "Saved workspace");
    }

    Ok(())
}

fn describe(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::Added { node, .. } => format!("added {} '{}' [{}]", node.kind().as_str(), node.name(), node.id()),
        ChangeEvent::Renamed { id, name } => format!("renamed [{}] to '{}'", id, name),
        ChangeEvent::Deleted { node, .. } => format!("deleted '{}' ({} node(s))", node.name(), node.count()),
        ChangeEvent::Reordered { id, from, to, .. } => format!("moved [{}] from {} to {}", id, from, to),
        ChangeEvent::Expanded { id, expanded } => {
            format!("{} [{}]", if *expanded { "expanded" } else { "collapsed" }, id)
        }
        ChangeEvent::Imported { ids } => format!("imported {} collection(s): {}", ids.len(), ids.join(", ")),
    }
}
