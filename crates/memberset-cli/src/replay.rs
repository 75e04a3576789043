//! # Replay Subcommand
//!
//! Applies a recorded update script to a fresh pipeline and prints the IP
//! set membership changes it produces.
//!
//! Scripts are JSON lines, one `Update` per line. Blank lines and lines
//! starting with `#` are skipped. Endpoints are `EndpointId` objects:
//!
//! ```text
//! # web profile
//! {"op":"profile_tags","profile":"web","tags":["web"]}
//! {"op":"endpoint_profiles","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"profiles":["web"]}
//! {"op":"endpoint_ips","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"ips":["10.0.0.1"]}
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;

use memberset_core::{EndpointId, MembersetError, PipelineConfig};
use memberset_pipeline::{EventRecorder, MembershipEvent, Pipeline, Update};

/// Arguments for the `memberset replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Update script to replay. Use `-` for standard input.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Output format for membership events.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the final membership of every IP set after the replay.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `+ <ip-set> <ip>` / `- <ip-set> <ip>` lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Totals from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub updates: usize,
    pub added: usize,
    pub removed: usize,
}

/// Execute the replay subcommand against stdout.
///
/// Returns exit code 0 on success.
pub fn run_replay(args: &ReplayArgs, config: &PipelineConfig) -> Result<u8> {
    let source = read_script(&args.script)?;
    let updates = parse_script(&source)
        .with_context(|| format!("failed to parse {}", args.script.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = replay(updates, config, args.format, args.summary, &mut out)?;

    tracing::info!(
        updates = report.updates,
        added = report.added,
        removed = report.removed,
        "replay complete"
    );
    Ok(0)
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read script from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse a JSON-lines update script.
pub fn parse_script(source: &str) -> Result<Vec<Update<EndpointId>>, MembersetError> {
    let mut updates = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let update = serde_json::from_str(trimmed).map_err(|e| MembersetError::Replay {
            line: index + 1,
            message: e.to_string(),
        })?;
        updates.push(update);
    }
    Ok(updates)
}

/// Apply `updates` in order, writing each membership event to `out`.
pub fn replay<W: Write>(
    updates: Vec<Update<EndpointId>>,
    config: &PipelineConfig,
    format: OutputFormat,
    summary: bool,
    out: &mut W,
) -> Result<ReplayReport> {
    let mut pipeline = Pipeline::from_config(config, EventRecorder::new());
    let mut report = ReplayReport::default();

    for update in updates {
        tracing::debug!(op = update.op_name(), "applying update");
        pipeline.apply(update);
        report.updates += 1;

        for event in pipeline.listener_mut().take() {
            match event {
                MembershipEvent::IpAdded { .. } => report.added += 1,
                MembershipEvent::IpRemoved { .. } => report.removed += 1,
            }
            write_event(out, &event, format)?;
        }
    }

    if summary {
        write_summary(out, &pipeline, format)?;
    }
    out.flush()?;
    Ok(report)
}

fn write_event<W: Write>(out: &mut W, event: &MembershipEvent, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{event}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(event)?)?,
    }
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    pipeline: &Pipeline<EndpointId, EventRecorder>,
    format: OutputFormat,
) -> Result<()> {
    let calculator = pipeline.calculator();
    for ip_set in calculator.ip_sets() {
        let mut members: Vec<_> = calculator.members(ip_set).copied().collect();
        members.sort_unstable();
        match format {
            OutputFormat::Text => {
                let rendered: Vec<String> = members.iter().map(ToString::to_string).collect();
                writeln!(out, "{ip_set}: {}", rendered.join(", "))?;
            }
            OutputFormat::Json => {
                let line = json!({ "ip_set": ip_set, "members": members });
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
# two endpoints share 10.0.0.5
{"op":"profile_tags","profile":"p1","tags":["blue"]}
{"op":"endpoint_ips","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"ips":["10.0.0.5"]}
{"op":"endpoint_ips","endpoint":{"kind":"host","hostname":"h2","endpoint":"eth0"},"ips":["10.0.0.5"]}
{"op":"endpoint_profiles","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"profiles":["p1"]}
{"op":"endpoint_profiles","endpoint":{"kind":"host","hostname":"h2","endpoint":"eth0"},"profiles":["p1"]}
{"op":"delete_endpoint","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"}}
"#;

    fn run(source: &str, format: OutputFormat, summary: bool) -> (ReplayReport, String) {
        let updates = parse_script(source).unwrap();
        let mut out = Vec::new();
        let report = replay(updates, &PipelineConfig::default(), format, summary, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let updates = parse_script(SCRIPT).unwrap();
        assert_eq!(updates.len(), 6);
        assert_eq!(updates[0].op_name(), "profile_tags");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_script("\n{\"op\":\"profile_tags\",\"profile\":\"p\"}\n{oops}\n").unwrap_err();
        match err {
            MembersetError::Replay { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shared_ip_added_once_and_kept() {
        let (report, output) = run(SCRIPT, OutputFormat::Text, true);
        assert_eq!(report.updates, 6);
        assert_eq!(report.added, 1);
        assert_eq!(report.removed, 0);
        assert_eq!(output, "+ blue 10.0.0.5\nblue: 10.0.0.5\n");
    }

    #[test]
    fn test_json_output() {
        let (_, output) = run(SCRIPT, OutputFormat::Json, false);
        assert_eq!(
            output,
            "{\"kind\":\"ip_added\",\"ip_set\":\"blue\",\"ip\":\"10.0.0.5\"}\n"
        );
    }

    #[test]
    fn test_json_summary() {
        let (_, output) = run(SCRIPT, OutputFormat::Json, true);
        let last = output.lines().last().unwrap();
        let value: serde_json::Value = serde_json::from_str(last).unwrap();
        assert_eq!(value["ip_set"], "blue");
        assert_eq!(value["members"][0], "10.0.0.5");
    }

    #[test]
    fn test_run_replay_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.jsonl");
        std::fs::write(&path, SCRIPT).unwrap();
        let args = ReplayArgs {
            script: path,
            format: OutputFormat::Text,
            summary: false,
        };
        assert_eq!(run_replay(&args, &PipelineConfig::default()).unwrap(), 0);
    }

    #[test]
    fn test_run_replay_missing_file() {
        let args = ReplayArgs {
            script: PathBuf::from("/nonexistent/memberset/script.jsonl"),
            format: OutputFormat::Text,
            summary: false,
        };
        assert!(run_replay(&args, &PipelineConfig::default()).is_err());
    }
}
