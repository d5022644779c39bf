//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let temp = Project::empty();

    temp.ebx()
        .args(&["--help"])
        .passes()
        .stdout_has("preview")
        .stdout_has("up")
        .stdout_has("destroy")
        .stdout_has("output")
        .stdout_has("graph")
        .stdout_has("route")
        .stdout_has("completions");
}

#[test]
fn help_shows_global_options() {
    let temp = Project::empty();

    temp.ebx()
        .args(&["--help"])
        .passes()
        .stdout_has("--project")
        .stdout_has("--stack")
        .stdout_has("--format")
        .stdout_has("--log-file");
}

#[test]
fn completions_need_no_project() {
    let temp = Project::empty();

    temp.ebx()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("ebx");
}
