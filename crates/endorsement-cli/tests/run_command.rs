//! Script replay through the command layer.

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use endorsement_cli::commands;
use endorsement_cli::script::Outcome;
use endorsement_registry::{EndorsementState, Identity};
use std::io::Write;
use tempfile::NamedTempFile;

fn addr(seed: u8) -> String {
    Identity::from_seed(seed).to_string()
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn run_replays_script_against_configured_registry() {
    let config = write_temp(&format!(
        "registry_id = \"{}\"\ncontroller = \"{}\"\ninitial_requests = [\"{}\"]\n",
        addr(0xee),
        addr(0xc0),
        addr(2)
    ));
    let script = write_temp(&format!(
        r#"
[[step]]
op = "endorse"
caller = "{b}"

[[step]]
op = "request"
caller = "{c}"
identity = "{a}"
comment = "audit note"

[[step]]
op = "request"
caller = "{a}"
identity = "{a}"

[[step]]
op = "status"
identity = "{a}"
"#,
        a = addr(1),
        b = addr(2),
        c = addr(0xc0),
    ));

    let report = commands::run::run(config.path(), script.path(), None, true).unwrap();

    assert_eq!(report.registry_id, Identity::from_seed(0xee));
    assert_eq!(report.controller, Identity::from_seed(0xc0));
    assert_eq!(report.rejected(), 1);
    assert!(matches!(
        &report.steps[1].outcome,
        Outcome::Notified { event } if event.comment() == Some("audit note")
    ));
    assert_eq!(
        report.snapshot,
        vec![
            (Identity::from_seed(1), EndorsementState::Requested),
            (Identity::from_seed(2), EndorsementState::Endorsed),
        ]
    );
}

#[test]
fn creator_becomes_controller_when_config_names_none() {
    let config = write_temp("");
    let script = write_temp(&format!(
        "[[step]]\nop = \"request\"\ncaller = \"{}\"\nidentity = \"{}\"\n",
        addr(7),
        addr(8)
    ));

    let report = commands::run::run(
        config.path(),
        script.path(),
        Some(Identity::from_seed(7)),
        false,
    )
    .unwrap();
    assert_eq!(report.rejected(), 0);
    assert_eq!(report.controller, Identity::from_seed(7));
}

#[test]
fn invalid_script_is_an_error() {
    let config = write_temp("");
    let script = write_temp("[[step]]\nop = \"revoke\"\n");

    let err = commands::run::run(config.path(), script.path(), None, false).unwrap_err();
    assert!(format!("{err:#}").contains("caller"));
}

#[test]
fn check_config_reports_bad_config() {
    let config = write_temp("controller = 42\n");
    assert!(commands::check_config::check_config(config.path(), None).is_err());

    let good = write_temp(&format!("initial_requests = [\"{}\"]\n", addr(3)));
    commands::check_config::check_config(good.path(), None).unwrap();
}

#[test]
fn bundled_demo_replays_cleanly() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");

    let report = commands::run::run(
        &root.join("registry.toml"),
        &root.join("lifecycle.toml"),
        None,
        false,
    )
    .unwrap();

    // Only the non-controller removal is rejected
    assert_eq!(report.rejected(), 1);
    assert_eq!(
        report.steps.last().map(|s| &s.outcome),
        Some(&Outcome::Status {
            identity: Identity::from_seed(2),
            state: EndorsementState::Removed,
        })
    );
}
