//! Route specs

use crate::prelude::*;

const SPECIFIC_EVENT: &str = r#"{
  "source": "aws.partner/developer.adobe.com.test",
  "detail-type": "Imaging API Events:photoshop-job-status",
  "detail": { "key": "value" }
}"#;

#[test]
fn specific_event_reaches_function_and_both_log_groups() {
    let temp = Project::pipeline();
    temp.file("event.json", SPECIFIC_EVENT);

    temp.ebx()
        .args(&["route", "event.json"])
        .passes()
        .stdout_has("AdobeAllEventsRule (bus acme-bus)")
        .stdout_has("-> Adobe-all-events")
        .stdout_has("AdobeSpecificEventsRule (bus acme-bus)")
        .stdout_has("-> AdobeProcessOrderEventsLambda (AdobeOrderEventsLambdaTarget)")
        .stdout_has("-> Adobe-specific-events");
}

#[test]
fn unrelated_event_matches_nothing() {
    let temp = Project::pipeline();
    temp.file("event.json", r#"{"source": "aws.s3"}"#);

    temp.ebx()
        .args(&["route", "event.json"])
        .passes()
        .stdout_eq("No rules match\n");
}

#[test]
fn invalid_event_file_is_reported() {
    let temp = Project::pipeline();
    temp.file("event.json", "not json");

    temp.ebx()
        .args(&["route", "event.json"])
        .fails()
        .stderr_has("is not valid JSON");
}
