//! Append-only JSONL log of planning and execution milestones.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// One planning/execution milestone.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GoapEvent {
    PlanSelected {
        goal: String,
        actions: Vec<String>,
        cost: f32,
    },
    ActionStarted {
        action: String,
    },
    ActionCompleted {
        action: String,
    },
    /// Preconditions stopped holding between planning and start.
    ActionAborted {
        action: String,
    },
    PlanCompleted {
        goal: String,
    },
    /// External preemption via `reset_action_and_goal`.
    Interrupted,
}

/// JSONL writer for [`GoapEvent`]s. Logging never interrupts the tick loop;
/// write failures are warned about and dropped.
pub struct PlanLog {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl PlanLog {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// A log that counts but discards events (tests, headless runs).
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    pub fn log(&mut self, event: &GoapEvent) {
        self.event_count += 1;
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        match serde_json::to_string(event) {
            Ok(json) => {
                if let Err(err) = writeln!(writer, "{}", json) {
                    tracing::warn!(%err, "failed to write plan event");
                }
            }
            Err(err) => tracing::warn!(%err, "failed to serialize plan event"),
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_log_counts_without_writing() {
        let mut log = PlanLog::null();
        log.log(&GoapEvent::Interrupted);
        log.log(&GoapEvent::ActionStarted {
            action: "Relax".into(),
        });
        assert_eq!(log.event_count(), 2);
    }

    #[test]
    fn events_are_written_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.jsonl");

        let mut log = PlanLog::new(&path).unwrap();
        log.log(&GoapEvent::PlanSelected {
            goal: "SeekAndDestroy".into(),
            actions: vec!["ChasePlayer".into(), "AttackPlayer".into()],
            cost: 2.0,
        });
        log.log(&GoapEvent::Interrupted);
        log.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event\":\"plan_selected\""));
        assert!(lines[0].contains("SeekAndDestroy"));
        assert!(lines[1].contains("\"event\":\"interrupted\""));
    }
}
