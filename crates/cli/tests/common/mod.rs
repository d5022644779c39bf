// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const HANDLER_FILE: &str = "src/AdobeProcessOrderEvents.py";
pub const HANDLER_SOURCE: &str = "def handler(event, context):\n    print(event)\n";

/// Project file with one `dev` stack routing from `bus`
pub fn project_file(bus: &str) -> String {
    format!(
        "[project]\nname = \"aws-adobe-eventbridge-lambda\"\n\n\
         [stack.dev.config]\nadobeEventBusName = \"{}\"\n",
        bus
    )
}

/// Project on `acme-bus` with function source in place
pub fn setup_project() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write(temp.path(), "ebx.toml", &project_file("acme-bus"));
    write(temp.path(), HANDLER_FILE, HANDLER_SOURCE);
    temp
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// `ebx` run inside `root`, with logs kept off stderr
pub fn ebx(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ebx").expect("ebx binary");
    cmd.current_dir(root)
        .env_remove("EBX_PROJECT_ROOT")
        .env("RUST_LOG", "error");
    cmd
}

/// Parsed JSON stdout of a successful `ebx --format json` run
pub fn json(root: &Path, args: &[&str]) -> serde_json::Value {
    let output = ebx(root)
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("Failed to run ebx");
    assert!(
        output.status.success(),
        "ebx {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}
