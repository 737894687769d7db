//! Replays a JSON-lines event log through an [`Inbox`] and prints the view.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use inbox::{Conversation, Event, Inbox, config::Config};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use crate::OutputFormat;

/// Options of the `replay` subcommand.
#[derive(Debug)]
pub struct ReplayOptions {
    pub events: PathBuf,
    pub block: Vec<String>,
    pub output: OutputFormat,
    pub metrics: bool,
}

/// Counts gathered while folding an event log.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines: usize,
    pub malformed: usize,
    pub outcomes: BTreeMap<&'static str, usize>,
}

impl ReplaySummary {
    fn render(&self) -> String {
        let outcomes = self
            .outcomes
            .iter()
            .map(|(outcome, count)| format!("{outcome}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "replayed {} lines ({} malformed) {outcomes}",
            self.lines, self.malformed
        )
    }
}

/// Runs the replay described by `options` against `config`.
///
/// # Errors
/// Returns an error if the event log cannot be read, the metrics recorder
/// cannot be installed, or stdout cannot be written.
pub fn run(config: &Config, options: &ReplayOptions) -> anyhow::Result<()> {
    let metrics = if options.metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")?,
        )
    } else {
        None
    };

    let mut inbox = Inbox::from_config(config);
    if !options.block.is_empty() {
        inbox.set_block_list(
            config
                .blocked_assignees
                .iter()
                .chain(&options.block)
                .cloned()
                .collect(),
        );
    }

    let summary = if options.events == Path::new("-") {
        fold_lines(&mut inbox, io::stdin().lock())?
    } else {
        let file = File::open(&options.events)
            .with_context(|| format!("failed to open {}", options.events.display()))?;
        fold_lines(&mut inbox, BufReader::new(file))?
    };
    info!(lines = summary.lines, malformed = summary.malformed, "replay finished");

    let mut stdout = io::stdout().lock();
    render(&mut stdout, &inbox.list_conversations(), options.output)?;
    stdout.flush()?;

    eprintln!("{}", summary.render());
    if let Some(handle) = metrics {
        eprint!("{}", handle.render());
    }
    Ok(())
}

/// Applies every event found in `reader`, one JSON object per line.
///
/// Blank lines are skipped and lines that do not parse are logged and skipped.
///
/// # Errors
/// Returns an error only when reading from `reader` fails.
pub fn fold_lines(inbox: &mut Inbox, reader: impl BufRead) -> io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;

        match serde_json::from_str::<Event>(&line) {
            Ok(event) => {
                let outcome = inbox.apply_event(&event);
                *summary.outcomes.entry(outcome.as_str()).or_default() += 1;
            }
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping malformed event");
                summary.malformed += 1;
            }
        }
    }
    Ok(summary)
}

/// Writes the conversation view in `format`.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn render(
    out: &mut impl Write,
    conversations: &[&Conversation],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, conversations)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "{:<16} {:>12} {:>6} {:<16} {:<24} BLURB",
                "ID", "UPDATED", "MSGS", "ASSIGNEE", "SUBJECT"
            )?;
            for conversation in conversations {
                writeln!(
                    out,
                    "{:<16} {:>12} {:>6} {:<16} {:<24} {}",
                    conversation.id,
                    conversation.last_updated_timestamp,
                    conversation.message_count,
                    conversation.assigned_user.as_deref().unwrap_or("-"),
                    conversation.subject,
                    conversation.blurb,
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LOG: &str = r#"
{"kind":"MessageReceived","data":{"timestamp":1,"conversationId":"c1","subject":"Refund","body":"hello"}}
{"kind":"MessageReceived","data":{"timestamp":1,"conversationId":"c1","subject":"Refund","body":"hello"}}
not json at all
{"kind":"Assigned","data":{"timestamp":2,"conversationId":"c2","user":"John_Doe"}}
{"kind":"bogus","data":{"timestamp":3,"conversationId":"c9"}}
{"kind":"TypingStarted","data":{"conversationId":"c1","user":"ann"}}

"#;

    #[test]
    fn test_fold_lines_counts_outcomes() {
        let mut inbox = Inbox::default();
        let summary = fold_lines(&mut inbox, Cursor::new(LOG)).unwrap();

        assert_eq!(summary.lines, 6);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.outcomes["applied"], 2);
        assert_eq!(summary.outcomes["duplicate"], 1);
        assert_eq!(summary.outcomes["unknown_kind"], 1);
        assert_eq!(summary.outcomes["missing_timestamp"], 1);
        assert!(!inbox.contains("c9"));
    }

    #[test]
    fn test_render_json_view() {
        let mut inbox: Inbox = Inbox::new(["John_Doe"].into_iter().collect());
        fold_lines(&mut inbox, Cursor::new(LOG)).unwrap();

        let mut out = Vec::new();
        render(&mut out, &inbox.list_conversations(), OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let listed = value.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], "c1");
        assert_eq!(listed[0]["messageCount"], 1);
        assert_eq!(listed[0]["blurb"], "hello");
    }

    #[test]
    fn test_render_text_view() {
        let mut inbox = Inbox::default();
        fold_lines(&mut inbox, Cursor::new(LOG)).unwrap();

        let mut out = Vec::new();
        render(&mut out, &inbox.list_conversations(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("c2"));
        assert!(lines[1].contains("John_Doe"));
        assert!(lines[2].starts_with("c1"));
        assert!(lines[2].ends_with("hello"));
    }

    #[test]
    fn test_summary_render() {
        let mut summary = ReplaySummary {
            lines: 3,
            malformed: 1,
            ..ReplaySummary::default()
        };
        summary.outcomes.insert("applied", 2);
        assert_eq!(summary.render(), "replayed 3 lines (1 malformed) applied=2");
    }
}
