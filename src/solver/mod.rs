pub mod fixed;
pub mod gateway;
pub mod process;

#[cfg(test)]
mod tests;

use crate::error::SolverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use fixed::FixedSolver;
pub use gateway::SolverGateway;
pub use process::ProcessSolver;

/// External solving collaborator: cube string in, move tokens out
#[async_trait]
pub trait CubeSolver: Send + Sync {
    /// Solve a validated cube string, returning tokens such as `R`, `U'` or `F2`
    async fn solve(&self, cube: &str) -> Result<Vec<String>, SolverError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Facelet string layout handed to an external solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeNotation {
    /// Color letters in U L F R B D face order, as scanned
    #[default]
    Colors,
    /// Face letters in U R F D L B face order
    Faces,
}

impl CubeNotation {
    /// Re-encode a color cube string (U L F R B D) for the target notation
    pub fn encode(&self, cube: &str) -> Result<String, SolverError> {
        match self {
            CubeNotation::Colors => Ok(cube.to_string()),
            CubeNotation::Faces => {
                if cube.len() != 54 || !cube.is_ascii() {
                    return Err(SolverError::InvalidCubeString {
                        reason: format!("expected 54 ASCII letters, got {}", cube.len()),
                    });
                }
                // Source face positions (U L F R B D) in U R F D L B order
                const ORDER: [usize; 6] = [0, 3, 2, 5, 1, 4];
                let mut encoded = String::with_capacity(54);
                for source in ORDER {
                    for letter in cube[source * 9..source * 9 + 9].chars() {
                        encoded.push(face_letter(letter)?);
                    }
                }
                Ok(encoded)
            }
        }
    }
}

fn face_letter(color: char) -> Result<char, SolverError> {
    match color {
        'y' => Ok('U'),
        'g' => Ok('R'),
        'r' => Ok('F'),
        'w' => Ok('D'),
        'b' => Ok('L'),
        'o' => Ok('B'),
        other => Err(SolverError::InvalidCubeString {
            reason: format!("unexpected facelet letter '{}'", other),
        }),
    }
}
