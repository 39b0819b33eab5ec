//! Plain-text rendering of the collection tree

use crate::models::Node;

/// Renders the forest as an indented outline, one node per line.
///
/// Folders show an expansion marker; requests show method and url. Every
/// line ends with the node id in brackets so it can be passed back to the CLI.
pub fn render_tree(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_level(nodes, 0, &mut out);
    out
}

fn render_level(nodes: &[Node], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Folder(folder) => {
                let marker = if folder.expanded { "▾" } else { "▸" };
                out.push_str(&format!("{}{} {}  [{}]\n", indent, marker, folder.name, folder.id));
                render_level(&folder.children, depth + 1, out);
            }
            Node::Request(request) => {
                let url = if request.url.is_empty() { "-" } else { request.url.as_str() };
                out.push_str(&format!(
                    "{}{:<6} {}  {}  [{}]\n",
                    indent,
                    request.method.as_str(),
                    request.name,
                    url,
                    request.id
                ));
            }
        }
    }
}
