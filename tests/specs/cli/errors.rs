//! Error reporting specs

use crate::prelude::*;

#[test]
fn no_project_file_suggests_project_flag() {
    let temp = Project::empty();

    temp.ebx()
        .args(&["preview"])
        .fails()
        .stderr_has("no ebx.toml found")
        .stderr_has("--project");
}

#[test]
fn project_flag_points_at_project_elsewhere() {
    let project = Project::pipeline();
    let elsewhere = Project::empty();

    elsewhere
        .ebx()
        .args(&["--project", project.path().to_str().unwrap(), "preview"])
        .passes()
        .stdout_has("AdobeProcessOrderEventsLambda");
}

#[test]
fn project_root_env_is_honored() {
    let project = Project::pipeline();
    let elsewhere = Project::empty();

    elsewhere
        .ebx()
        .env("EBX_PROJECT_ROOT", project.path())
        .args(&["preview"])
        .passes()
        .stdout_has("10 to create");
}

#[test]
fn unknown_stack_lists_configured_stacks() {
    let temp = Project::pipeline();

    temp.ebx()
        .args(&["--stack", "prod", "preview"])
        .fails()
        .stderr_has("stack 'prod' is not configured")
        .stderr_has("configured stacks: dev");
}

#[test]
fn missing_bus_name_is_reported_with_fix() {
    let temp = Project::empty();
    temp.file(
        "ebx.toml",
        "[project]\nname = \"aws-adobe-eventbridge-lambda\"\n\n[stack.dev.config]\n",
    );

    temp.ebx()
        .args(&["preview"])
        .fails()
        .stderr_has("missing required configuration value 'adobeEventBusName'")
        .stderr_has("[stack.dev.config]");
}

#[test]
fn namespaced_bus_name_is_accepted() {
    let temp = Project::empty();
    temp.file(
        "ebx.toml",
        "[project]\nname = \"aws-adobe-eventbridge-lambda\"\n\n[stack.dev.config]\n\
         \"aws-adobe-eventbridge-lambda:adobeEventBusName\" = \"acme-bus\"\n",
    );

    temp.ebx().args(&["preview"]).passes().stdout_has("partner-event-bus");
    temp.ebx().args(&["graph"]).passes().stdout_has("\"acme-bus\"");
}

#[test]
fn bus_named_after_a_log_group_is_accepted() {
    let temp = Project::empty();
    temp.file(
        "ebx.toml",
        "[project]\nname = \"aws-adobe-eventbridge-lambda\"\n\n[stack.dev.config]\n\
         adobeEventBusName = \"Adobe-all-events\"\n",
    );

    temp.ebx()
        .args(&["preview"])
        .passes()
        .stdout_has("1 to read, 10 to create");
}

#[test]
fn log_file_receives_engine_logs() {
    let temp = Project::pipeline();
    let log = temp.path().join("logs/ebx.log");

    temp.ebx()
        .env("RUST_LOG", "info")
        .args(&["--log-file", log.to_str().unwrap(), "up"])
        .passes();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("apply finished"), "log was:\n{}", content);
}
