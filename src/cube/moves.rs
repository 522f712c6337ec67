use super::face::FaceId;
use crate::error::SolverError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A single quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub face: FaceId,
    pub inverted: bool,
}

impl Move {
    pub const fn new(face: FaceId, inverted: bool) -> Self {
        Self { face, inverted }
    }

    /// Parse one solver token into quarter turns.
    ///
    /// `X` and `X'` yield one move; `X2` (and the equivalent `X2'`) yield two
    /// plain turns of the same face.
    pub fn expand_token(token: &str) -> Result<Vec<Move>, SolverError> {
        let unknown = || SolverError::UnknownMove {
            token: token.to_string(),
        };

        let mut chars = token.trim().chars();
        let face = chars.next().and_then(FaceId::from_letter).ok_or_else(unknown)?;

        match chars.as_str() {
            "" => Ok(vec![Move::new(face, false)]),
            "'" => Ok(vec![Move::new(face, true)]),
            "2" | "2'" => Ok(vec![Move::new(face, false), Move::new(face, false)]),
            _ => Err(unknown()),
        }
    }

    /// Expand a whole token sequence, failing on the first unknown token
    pub fn expand_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Move>, SolverError> {
        let mut moves = Vec::with_capacity(tokens.len() * 2);
        for token in tokens {
            moves.extend(Move::expand_token(token.as_ref())?);
        }
        Ok(moves)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "{}'", self.face.letter())
        } else {
            write!(f, "{}", self.face.letter())
        }
    }
}

/// FIFO of quarter turns; the head is the move currently being coached
#[derive(Debug, Clone, Default)]
pub struct SolutionQueue {
    moves: VecDeque<Move>,
    completed: usize,
}

impl SolutionQueue {
    pub fn new(moves: Vec<Move>) -> Self {
        Self {
            moves: moves.into(),
            completed: 0,
        }
    }

    pub fn head(&self) -> Option<Move> {
        self.moves.front().copied()
    }

    /// Remove the head after a confirmed completion
    pub fn pop(&mut self) -> Option<Move> {
        let popped = self.moves.pop_front();
        if popped.is_some() {
            self.completed += 1;
        }
        popped
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }
}
