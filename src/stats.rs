//! Progress counters of a synthesis run.

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use num_bigint::BigUint;

use crate::family::Family;

/// Statistics collected while exploring a design space.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Number of family models that were model checked
    pub iterations_mdp: usize,
    /// Number of game abstractions solved
    pub iterations_game: usize,
    /// Total number of states of the checked family models
    pub mdp_states: usize,
    /// Number of families resolved without splitting
    pub families_explored: usize,
    /// Number of members covered by resolved families
    pub members_explored: BigUint,
    /// Size of the whole design space
    pub design_space_size: BigUint,
    start: Instant,
    elapsed: Option<Duration>,
}

impl Statistics {
    pub fn new(design_space: &Family) -> Self {
        Self {
            iterations_mdp: 0,
            iterations_game: 0,
            mdp_states: 0,
            families_explored: 0,
            members_explored: BigUint::ZERO,
            design_space_size: design_space.size().clone(),
            start: Instant::now(),
            elapsed: None,
        }
    }

    pub fn iteration_mdp(&mut self, states: usize) {
        self.iterations_mdp += 1;
        self.mdp_states += states;
    }

    pub fn iteration_game(&mut self) {
        self.iterations_game += 1;
    }

    /// Marks `family` as resolved.
    pub fn explore(&mut self, family: &Family) {
        self.families_explored += 1;
        self.members_explored += family.size();
        debug!(
            "explored {}/{} members ({}%)",
            self.members_explored,
            self.design_space_size,
            self.progress_percent()
        );
    }

    /// Percentage of the design space resolved so far, rounded down.
    pub fn progress_percent(&self) -> BigUint {
        if self.design_space_size == BigUint::ZERO {
            return BigUint::from(100u32);
        }
        &self.members_explored * 100u32 / &self.design_space_size
    }

    pub fn finish(&mut self) {
        self.elapsed = Some(self.start.elapsed());
    }

    /// Wall-clock time of the run, up to now if it is not finished.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.start.elapsed())
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "explored {}/{} members in {} families ({} MDP checks over {} states, {} games) in {:.2?}",
            self.members_explored,
            self.design_space_size,
            self.families_explored,
            self.iterations_mdp,
            self.mdp_states,
            self.iterations_game,
            self.elapsed()
        )
    }
}
