use super::{CubeSolver, FixedSolver, ProcessSolver};
use crate::config::SolverConfig;
use crate::cube::{FaceId, Move};
use crate::error::SolverError;
use crate::vision::ColorLabel;
use tracing::{error, info};

/// Boundary to the solving collaborator: validates the cube string, calls
/// the solver once and expands its answer into quarter turns
pub struct SolverGateway {
    solver: Box<dyn CubeSolver>,
}

impl SolverGateway {
    pub fn new(solver: Box<dyn CubeSolver>) -> Self {
        Self { solver }
    }

    /// Pick the collaborator from configuration: a fixed move list wins over
    /// an external command
    pub fn from_config(config: &SolverConfig) -> Result<Self, SolverError> {
        if let Some(moves) = &config.moves {
            info!("Using fixed solution of {} tokens", moves.len());
            return Ok(Self::new(Box::new(FixedSolver::new(moves.clone()))));
        }

        match &config.command {
            Some(command) => {
                info!("Using external solver '{}'", command);
                Ok(Self::new(Box::new(ProcessSolver::from_config(command, config))))
            }
            None => Err(SolverError::NotConfigured {
                details: "set solver.command or solver.moves".to_string(),
            }),
        }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Check length, alphabet, fixed centers and color counts
    pub fn validate(cube: &str) -> Result<(), SolverError> {
        let invalid = |reason: String| Err(SolverError::InvalidCubeString { reason });

        let letters: Vec<char> = cube.chars().collect();
        if letters.len() != 54 {
            return invalid(format!("expected 54 facelets, got {}", letters.len()));
        }

        let mut counts = [0usize; 6];
        for (i, letter) in letters.iter().enumerate() {
            let color = match ColorLabel::from_letter(*letter) {
                Some(color) if letter.is_ascii_lowercase() => color,
                _ => return invalid(format!("unexpected letter '{}' at {}", letter, i)),
            };
            if let Some(slot) = ColorLabel::ALL.iter().position(|c| *c == color) {
                counts[slot] += 1;
            }
        }

        for face in FaceId::STRING_ORDER {
            let index = face.string_index() * 9 + 4;
            let expected = face.center_color().letter();
            if letters[index] != expected {
                return invalid(format!(
                    "{} center at {} must be '{}', got '{}'",
                    face, index, expected, letters[index]
                ));
            }
        }

        for (color, count) in ColorLabel::ALL.iter().zip(counts) {
            if count != 9 {
                return invalid(format!("{} appears {} times, expected 9", color, count));
            }
        }

        Ok(())
    }

    /// Validate, solve and expand. Any failure is final for the session.
    pub async fn solve(&self, cube: &str) -> Result<Vec<Move>, SolverError> {
        Self::validate(cube)?;

        let tokens = self.solver.solve(cube).await.map_err(|e| {
            error!("Solver '{}' failed: {}", self.solver.name(), e);
            e
        })?;
        let moves = Move::expand_all(&tokens)?;

        info!(
            "Solution from '{}': {} ({} quarter turns)",
            self.solver.name(),
            tokens.join(" "),
            moves.len()
        );
        Ok(moves)
    }
}
