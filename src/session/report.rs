use super::types::SessionOutcome;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// JSON summary of one scan-and-solve session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub frames_processed: u64,
    pub faces_scanned: u32,
    pub cube_string: Option<String>,
    pub solution: Vec<String>,
    pub moves_completed: u32,
    pub outcome: SessionOutcome,
}

impl SessionReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        info!("Session report written to {}", path.as_ref().display());
        Ok(())
    }
}
