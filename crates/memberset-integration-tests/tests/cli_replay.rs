//! # CLI Replay
//!
//! Drives the replay handler with on-disk configuration and scripts.

use std::io::Write;

use memberset_cli::replay::{parse_script, replay, OutputFormat};
use memberset_core::{MembersetError, PipelineConfig};

const RENAME_SCRIPT: &str = r#"
{"op":"profile_tags","profile":"old","tags":["web"]}
{"op":"profile_tags","profile":"new","tags":["web"]}
{"op":"endpoint_ips","endpoint":{"kind":"workload","hostname":"h1","orchestrator":"k8s","workload":"pod","endpoint":"eth0"},"ips":["10.9.0.1"]}
{"op":"endpoint_profiles","endpoint":{"kind":"workload","hostname":"h1","orchestrator":"k8s","workload":"pod","endpoint":"eth0"},"profiles":["old"]}
{"op":"endpoint_profiles","endpoint":{"kind":"workload","hostname":"h1","orchestrator":"k8s","workload":"pod","endpoint":"eth0"},"profiles":["new"]}
{"op":"delete_profile_tags","profile":"new"}
"#;

#[test]
fn replay_with_prefix_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    writeln!(file, "ip_set_prefix: \"tag-\"").expect("write config");
    let config = PipelineConfig::load(file.path()).expect("load config");

    let updates = parse_script(RENAME_SCRIPT).expect("parse script");
    let mut out = Vec::new();
    let report = replay(updates, &config, OutputFormat::Text, false, &mut out).expect("replay");

    assert_eq!(report.updates, 6);
    assert_eq!(report.added, 1);
    assert_eq!(report.removed, 1);
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "+ tag-web 10.9.0.1\n- tag-web 10.9.0.1\n"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    writeln!(file, "ip_set_prefix: \"has space\"").expect("write config");
    let err = PipelineConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, MembersetError::Config(_)));
}

#[test]
fn malformed_endpoint_reports_line() {
    let script = "{\"op\":\"delete_endpoint\",\"endpoint\":{\"kind\":\"vm\"}}\n";
    match parse_script(script) {
        Err(MembersetError::Replay { line, message }) => {
            assert_eq!(line, 1);
            assert!(!message.is_empty());
        }
        other => panic!("expected replay error, got {other:?}"),
    }
}
