//! Provisioning history
//!
//! Appends one JSON line per event to `<state dir>/stockpot/history.log`,
//! so a project's imported units can be traced back to a catalog sync.

use crate::config::{schema::Config, ConfigManager};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Append-only JSON lines log of provisioning runs
pub struct HistoryLog {
    enabled: bool,
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.history_log,
            path: ConfigManager::history_log_path(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an event.
    ///
    /// Write failures are logged and dropped; they never fail the run.
    pub async fn record(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize history event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write history log {}: {}", self.path.display(), e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn history_in(dir: &TempDir, enabled: bool) -> HistoryLog {
        HistoryLog {
            enabled,
            path: dir.path().join("nested").join("history.log"),
        }
    }

    #[tokio::test]
    async fn records_json_lines() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir, true);

        history
            .record(
                "provision.completed",
                &serde_json::json!({"namespace": "modules", "units": ["auth", "forms"]}),
            )
            .await;
        history.record("catalog.synced", &serde_json::json!({})).await;

        let content = tokio::fs::read_to_string(history.path()).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "provision.completed");
        assert_eq!(first["data"]["units"][1], "forms");
        assert!(first["timestamp"].is_string());
    }

    #[tokio::test]
    async fn disabled_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir, false);

        history.record("provision.completed", &serde_json::json!({})).await;

        assert!(!history.path().exists());
    }
}
