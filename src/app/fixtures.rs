//! Shared test forest
//!
//! ```text
//! api (folder, expanded)
//! └── users (folder)
//!     ├── list   GET  /users
//!     └── create POST /users
//! ping               GET  /ping
//! ```

use crate::models::{Folder, HttpMethod, Node, RequestNode};

fn request(id: &str, name: &str, method: HttpMethod, url: &str) -> Node {
    let mut request = RequestNode::new(name, method, url);
    request.id = id.to_string();
    request.into()
}

fn folder(id: &str, name: &str, children: Vec<Node>) -> Folder {
    let mut folder = Folder::new(name).with_children(children);
    folder.id = id.to_string();
    folder
}

pub(crate) fn sample_forest() -> Vec<Node> {
    let users = folder(
        "users",
        "Users",
        vec![
            request("list", "List", HttpMethod::GET, "/users"),
            request("create", "Create", HttpMethod::POST, "/users"),
        ],
    );
    let api = folder("api", "API", vec![users.into()]).expanded(true);

    vec![api.into(), request("ping", "Ping", HttpMethod::GET, "/ping")]
}
