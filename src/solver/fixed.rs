use super::CubeSolver;
use crate::error::SolverError;
use async_trait::async_trait;
use tracing::debug;

/// Replays a configured move list regardless of the cube string
#[derive(Debug, Clone, Default)]
pub struct FixedSolver {
    tokens: Vec<String>,
}

impl FixedSolver {
    pub fn new<S: Into<String>>(tokens: Vec<S>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a space separated sequence such as `"R U' F2"`
    pub fn from_sequence(sequence: &str) -> Self {
        Self::new(sequence.split_whitespace().collect())
    }
}

#[async_trait]
impl CubeSolver for FixedSolver {
    async fn solve(&self, cube: &str) -> Result<Vec<String>, SolverError> {
        debug!("Fixed solver answering for cube {}", cube);
        Ok(self.tokens.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
