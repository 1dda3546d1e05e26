//! Game abstraction of a whole subfamily.
//!
//! The subfamily is turned into a two-player stochastic game on the quotient:
//! in every state player 1 (the policy) picks an action, then player 2 (the
//! family) picks one of the family's variants of that action. When the players
//! are opposed, the value of the game bounds what one policy can guarantee for
//! every member at once, and player 1's optimal strategy is a natural witness.
//!
//! The witness is not trusted: player 2 may combine variants of different
//! members, so callers re-verify it on the subfamily before using it.

use log::debug;

use crate::bitset::BitSet;
use crate::check::{self, OPTIMALITY_TOLERANCE};
use crate::error::SynthesisError;
use crate::family::Family;
use crate::policy::{Action, Policy};
use crate::property::Property;
use crate::quotient::{MdpFamilyQuotient, Quotient};

const MAX_ITERATIONS: usize = 1_000_000;

/// Result of solving the game abstraction of a subfamily.
#[derive(Debug, Clone)]
pub struct GameSolution {
    /// Game value at the initial state.
    pub value: f64,
    /// Player 1 strategy, defined on the states reachable under both strategies.
    pub policy: Policy,
    /// Quotient choices reachable under both strategies.
    pub reachable_choices: BitSet,
    /// Game value of every quotient state.
    pub state_values: Vec<f64>,
}

pub trait GameAbstractionSolver {
    /// Label of the target states the game is solved for.
    fn target_label(&self) -> &str;

    /// Solves the game restricted to `family`.
    ///
    /// The bound is only meaningful when the players are opposed; a call with
    /// `player1_maximizing == player2_maximizing` is rejected with
    /// [`SynthesisError::DirectionMismatch`].
    fn solve(
        &mut self,
        family: &Family,
        player1_maximizing: bool,
        player2_maximizing: bool,
    ) -> Result<GameSolution, SynthesisError>;
}

/// Value-iteration solver for the game abstraction of an [`MdpFamilyQuotient`].
#[derive(Debug)]
pub struct StochasticGameSolver<'a> {
    quotient: &'a MdpFamilyQuotient,
    target_label: String,
    targets: BitSet,
    precision: f64,
}

impl<'a> StochasticGameSolver<'a> {
    pub fn new(quotient: &'a MdpFamilyQuotient, property: &Property) -> Result<Self, SynthesisError> {
        let targets = check::targets(quotient.mdp(), property)?;
        Ok(Self {
            quotient,
            target_label: property.target_label().to_string(),
            targets,
            precision: quotient.precision(),
        })
    }

    /// For each state, the offered actions with the family's variants of each.
    fn offered(&self, selected: &BitSet) -> Vec<Vec<(Action, Vec<usize>)>> {
        let q = self.quotient;
        (0..q.num_states())
            .map(|state| {
                q.state_to_actions(state)
                    .iter()
                    .map(|&a| {
                        let variants: Vec<usize> = q
                            .state_action_choices(state, a)
                            .iter()
                            .copied()
                            .filter(|&c| selected.contains(c))
                            .collect();
                        (a, variants)
                    })
                    .filter(|(_, variants)| !variants.is_empty())
                    .collect()
            })
            .collect()
    }
}

fn optimum(values: impl Iterator<Item = f64>, maximize: bool) -> f64 {
    if maximize {
        values.fold(f64::NEG_INFINITY, f64::max)
    } else {
        values.fold(f64::INFINITY, f64::min)
    }
}

/// Index of the first optimal element.
fn arg_optimum(values: &[f64], maximize: bool) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if (maximize && v > values[best]) || (!maximize && v < values[best]) {
            best = i;
        }
    }
    best
}

impl GameAbstractionSolver for StochasticGameSolver<'_> {
    fn target_label(&self) -> &str {
        &self.target_label
    }

    fn solve(
        &mut self,
        family: &Family,
        player1_maximizing: bool,
        player2_maximizing: bool,
    ) -> Result<GameSolution, SynthesisError> {
        if player1_maximizing == player2_maximizing {
            return Err(SynthesisError::DirectionMismatch {
                player1_maximizing,
                player2_maximizing,
            });
        }

        let mdp = self.quotient.mdp();
        let n = mdp.num_states();
        let offered = self.offered(&self.quotient.selected_choices(family));
        let q = |c: usize, values: &[f64]| -> f64 {
            mdp.transitions(c).iter().map(|&(t, p)| p * values[t]).sum()
        };

        let mut values: Vec<f64> = (0..n)
            .map(|s| if self.targets.contains(s) { 1.0 } else { 0.0 })
            .collect();
        for _ in 0..MAX_ITERATIONS {
            let mut diff: f64 = 0.0;
            for state in 0..n {
                if self.targets.contains(state) || offered[state].is_empty() {
                    continue;
                }
                let best = optimum(
                    offered[state].iter().map(|(_, variants)| {
                        optimum(variants.iter().map(|&c| q(c, &values)), player2_maximizing)
                    }),
                    player1_maximizing,
                );
                diff = diff.max((best - values[state]).abs());
                values[state] = best;
            }
            if diff < self.precision {
                break;
            }
        }

        // Player 2 responds with its first locally optimal variant.
        let responses: Vec<Vec<usize>> = offered
            .iter()
            .map(|actions| {
                actions
                    .iter()
                    .map(|(_, variants)| {
                        let qs: Vec<f64> = variants.iter().map(|&c| q(c, &values)).collect();
                        variants[arg_optimum(&qs, player2_maximizing)]
                    })
                    .collect()
            })
            .collect();

        // Player 1 strategy, as an index into `offered[state]`.
        let mut strategy: Vec<usize> = (0..n)
            .map(|s| {
                let qs: Vec<f64> = responses[s].iter().map(|&c| q(c, &values)).collect();
                if qs.is_empty() {
                    0
                } else {
                    arg_optimum(&qs, player1_maximizing)
                }
            })
            .collect();

        if player1_maximizing {
            let mut settled = self.targets.clone();
            let mut pending: Vec<usize> = (0..n)
                .filter(|&s| {
                    !self.targets.contains(s)
                        && !offered[s].is_empty()
                        && values[s] > OPTIMALITY_TOLERANCE
                })
                .collect();
            let mut changed = true;
            while changed {
                changed = false;
                pending.retain(|&state| {
                    let progress = responses[state].iter().position(|&c| {
                        q(c, &values) >= values[state] - OPTIMALITY_TOLERANCE
                            && mdp
                                .transitions(c)
                                .iter()
                                .any(|&(t, p)| p > 0.0 && settled.contains(t))
                    });
                    match progress {
                        Some(index) => {
                            strategy[state] = index;
                            settled.insert(state);
                            changed = true;
                            false
                        }
                        None => true,
                    }
                });
            }
        }

        // Follow both strategies from the initial state.
        let mut policy = Policy::empty(n);
        let mut reachable_choices = BitSet::new(mdp.num_choices());
        let mut visited = BitSet::new(n);
        let mut stack = vec![mdp.initial_state()];
        visited.insert(mdp.initial_state());
        while let Some(state) = stack.pop() {
            if offered[state].is_empty() {
                continue;
            }
            let index = strategy[state];
            let choice = responses[state][index];
            policy.set(state, Some(offered[state][index].0));
            reachable_choices.insert(choice);
            for &(succ, p) in mdp.transitions(choice) {
                if p > 0.0 && visited.insert(succ) {
                    stack.push(succ);
                }
            }
        }

        let value = values[mdp.initial_state()];
        debug!("game abstraction of {} has value {}", family, value);
        Ok(GameSolution {
            value,
            policy,
            reachable_choices,
            state_values: values,
        })
    }
}
