/// Common test utilities for the docsync binary
use assert_cmd::Command;
use std::path::Path;

/// `docsync` run from an isolated project directory, with no credentials
/// or config leaking in from the environment
pub fn docsync(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docsync").expect("docsync binary is built");
    cmd.current_dir(project)
        .env_remove("DOCSYNC_SERVER")
        .env_remove("DOCSYNC_USERNAME")
        .env_remove("DOCSYNC_PASSWORD")
        .env_remove("DOCSYNC_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Folder listing body as returned by the documents API
pub fn items(entries: &[(&str, &str, &str)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(kind, id, name)| serde_json::json!({ "type": kind, "id": id, "name": name }))
        .collect();
    serde_json::json!({ "items": items, "hasMore": false })
}
