//! Ensures every workspace crate inherits the workspace version.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn read_toml(path: &Path) -> toml::Value {
    std::fs::read_to_string(path).unwrap().parse().unwrap()
}

#[test]
fn all_crates_use_workspace_version() {
    let root = workspace_root();
    let members = read_toml(&root.join("Cargo.toml"))["workspace"]["members"]
        .as_array()
        .unwrap()
        .clone();
    assert!(!members.is_empty());

    for member in members {
        let member = member.as_str().unwrap();
        let doc = read_toml(&root.join(member).join("Cargo.toml"));
        let inherited = doc["package"]["version"]
            .as_table()
            .and_then(|t| t.get("workspace"))
            .and_then(|v| v.as_bool());
        assert_eq!(
            inherited,
            Some(true),
            "{member} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    let ws_version = doc["workspace"]["package"]["version"].as_str().unwrap();
    assert_eq!(ws_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(diffgate_core::VERSION, ws_version);
}

#[test]
fn internal_dependency_pins_workspace_version() {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    let pinned = doc["workspace"]["dependencies"]["diffgate-core"]["version"]
        .as_str()
        .unwrap();
    assert_eq!(pinned, env!("CARGO_PKG_VERSION"));
}
