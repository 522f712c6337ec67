use super::{CubeNotation, CubeSolver};
use crate::config::SolverConfig;
use crate::error::SolverError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs an external solving program with the cube string as its last argument
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    command: String,
    args: Vec<String>,
    notation: CubeNotation,
    timeout: Duration,
}

impl ProcessSolver {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            notation: CubeNotation::Colors,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(command: &str, config: &SolverConfig) -> Self {
        Self::new(command, config.args.clone())
            .with_notation(config.notation)
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_notation(mut self, notation: CubeNotation) -> Self {
        self.notation = notation;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CubeSolver for ProcessSolver {
    async fn solve(&self, cube: &str) -> Result<Vec<String>, SolverError> {
        let encoded = self.notation.encode(cube)?;
        info!("Invoking solver '{}' ({:?} notation)", self.command, self.notation);
        debug!("Solver input: {}", encoded);

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(&encoded)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SolverError::Launch {
                command: self.command.clone(),
                details: e.to_string(),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SolverError::Timeout {
                millis: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| SolverError::Launch {
                command: self.command.clone(),
                details: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Solver exited with {}: {}", output.status, stderr.trim());
            return Err(SolverError::Unsolvable {
                details: format!("{} {}", stderr.trim(), stdout.trim())
                    .trim()
                    .to_string(),
            });
        }

        Ok(parse_tokens(&stdout))
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Extract move tokens from solver output. Brackets, commas and double
/// quotes are separators; single quotes wrapping a whole token are dropped.
pub fn parse_tokens(output: &str) -> Vec<String> {
    output
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '[' | ']' | '"'))
        .filter_map(|raw| {
            let token = if raw.len() > 2 && raw.starts_with('\'') && raw.ends_with('\'') {
                &raw[1..raw.len() - 1]
            } else {
                raw
            };
            if token.is_empty() || token == "'" {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}
