//! Graph specs

use crate::prelude::*;

#[test]
fn graph_describes_acme_bus_topology() {
    let temp = Project::pipeline();

    let graph = temp.ebx().args(&["graph"]).passes().stdout_json();
    let resources = graph["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 11);

    let find = |name: &str| {
        resources
            .iter()
            .find(|r| r["name"] == name)
            .unwrap_or_else(|| panic!("{} not declared", name))
    };

    assert_eq!(find("partner-event-bus")["spec"]["name"]["value"], "acme-bus");
    for log_group in ["Adobe-all-events", "Adobe-specific-events"] {
        assert_eq!(find(log_group)["spec"]["retention_in_days"], 1);
    }
    assert_eq!(
        find("AdobeProcessOrderEventsLambda")["dependencies"],
        serde_json::json!(["adobe-cdk-lambda-role", "lambdaBasicExecutionRole"])
    );
    assert_eq!(
        graph["outputs"]["AdobeProcessSpecificEventsLambdaOutput"],
        "AdobeProcessOrderEventsLambda.name"
    );
}

#[test]
fn graph_needs_no_function_source() {
    let temp = Project::empty();
    temp.file("ebx.toml", PROJECT_TOML);

    temp.ebx().args(&["graph"]).passes().stdout_has("\"waves\"");
}
