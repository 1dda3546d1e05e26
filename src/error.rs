//! Errors surfaced by model construction and synthesis.
//!
//! Refuted subfamilies and abstractions whose witness fails re-verification are
//! ordinary search outcomes and never show up here. What does show up is either
//! a malformed input (configuration error) or a broken contract between the
//! search and the model layer, both of which abort the run.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// The initial state does not exist.
    InvalidInitialState(usize),
    /// A state has no outgoing choice.
    Deadlock { state: usize },
    /// A choice refers to a state that does not exist.
    UnknownState { choice: usize, state: usize },
    /// The probabilities of a choice do not sum to one.
    InvalidDistribution { choice: usize, sum: f64 },
    /// A coloring refers to a hole or an option outside its domain.
    InvalidColoring { choice: usize, hole: usize, option: usize },
    /// The property names a label the model does not have.
    UnknownLabel(String),
    /// The probability threshold lies outside `[0, 1]`.
    InvalidThreshold(f64),
    /// The family does not fit the holes of the quotient.
    InvalidFamily(String),
    /// The game solver was built for a different target than the property names.
    TargetMismatch { solver: String, property: String },
    /// Some member enables no choice in `state`. `assignment` lists the
    /// `(hole, option)` pairs of the holes coloring that state.
    NoEnabledChoice { state: usize, assignment: Vec<(usize, usize)> },
    /// The game abstraction was asked to solve a game whose players are not opposed.
    DirectionMismatch { player1_maximizing: bool, player2_maximizing: bool },
    /// Applying a policy to a single member left nondeterminism in the model.
    NondeterministicPolicy { family: String, state: usize },
    /// A leaf failed its final double-check.
    UnsoundLeaf { family: String, reason: String },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::InvalidInitialState(state) => {
                write!(f, "initial state {} does not exist", state)
            }
            SynthesisError::Deadlock { state } => write!(f, "state {} has no choices", state),
            SynthesisError::UnknownState { choice, state } => {
                write!(f, "choice {} leads to unknown state {}", choice, state)
            }
            SynthesisError::InvalidDistribution { choice, sum } => {
                write!(f, "probabilities of choice {} sum to {}", choice, sum)
            }
            SynthesisError::InvalidColoring { choice, hole, option } => write!(
                f,
                "choice {} is colored by option {} of hole {}, which does not exist",
                choice, option, hole
            ),
            SynthesisError::UnknownLabel(label) => write!(f, "unknown label \"{}\"", label),
            SynthesisError::InvalidThreshold(t) => {
                write!(f, "threshold {} is not a probability", t)
            }
            SynthesisError::InvalidFamily(msg) => write!(f, "invalid family: {}", msg),
            SynthesisError::TargetMismatch { solver, property } => write!(
                f,
                "game solver targets \"{}\" but the property targets \"{}\"",
                solver, property
            ),
            SynthesisError::NoEnabledChoice { state, assignment } => write!(
                f,
                "state {} has no enabled choice for hole assignment {:?}",
                state, assignment
            ),
            SynthesisError::DirectionMismatch {
                player1_maximizing,
                player2_maximizing,
            } => write!(
                f,
                "game players must be opposed (player 1 maximizing: {}, player 2 maximizing: {})",
                player1_maximizing, player2_maximizing
            ),
            SynthesisError::NondeterministicPolicy { family, state } => write!(
                f,
                "applied policy to a singleton family {} and obtained nondeterminism in state {}",
                family, state
            ),
            SynthesisError::UnsoundLeaf { family, reason } => {
                write!(f, "leaf {} failed double-check: {}", family, reason)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}
