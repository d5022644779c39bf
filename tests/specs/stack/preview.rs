//! Preview specs

use crate::prelude::*;

#[test]
fn fresh_stack_reads_bus_and_creates_the_rest() {
    let temp = Project::pipeline();

    temp.ebx()
        .args(&["preview"])
        .passes()
        .stdout_has("1 to read, 10 to create");
}

#[test]
fn preview_after_up_is_all_same() {
    let temp = Project::pipeline();
    temp.ebx().args(&["up"]).passes();

    temp.ebx()
        .args(&["preview"])
        .passes()
        .stdout_has("11 unchanged")
        .stdout_lacks("create");
}

#[test]
fn role_precedes_function_in_plan() {
    let temp = Project::pipeline();

    let plan = temp.ebx().args(&["--format", "json", "preview"]).passes().stdout_json();
    let names: Vec<&str> = plan["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();

    let role = names.iter().position(|n| *n == "adobe-cdk-lambda-role").unwrap();
    let function = names
        .iter()
        .position(|n| *n == "AdobeProcessOrderEventsLambda")
        .unwrap();
    assert!(role < function);
}
