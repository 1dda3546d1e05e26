//! Reachability model checking on explicit MDPs.
//!
//! All analyses work on unbounded reachability probabilities and use plain
//! value iteration from below, which converges to the least fixed point
//! (the exact probabilities) for both the maximizing and the minimizing case.
//!
//! Schedulers need more care than values: in a maximizing MDP a choice may be
//! locally optimal yet never make progress (e.g. a self-loop on a state whose
//! value is positive). [`extract_scheduler`] therefore builds maximizing
//! schedulers attractor-style, growing a set of states known to reach the
//! target and only accepting optimal choices that step into it.

use crate::bitset::BitSet;
use crate::error::SynthesisError;
use crate::mdp::Mdp;
use crate::property::{Direction, Property};

/// Default convergence threshold of value iteration.
pub const DEFAULT_PRECISION: f64 = 1e-10;

/// Two choices whose values differ by at most this much are equally good.
pub const OPTIMALITY_TOLERANCE: f64 = 1e-6;

const MAX_ITERATIONS: usize = 1_000_000;
const MAX_VISIT_ITERATIONS: usize = 100_000;

/// A memoryless deterministic scheduler: for each state, the offset of the
/// chosen choice within that state's choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler(Vec<usize>);

impl Scheduler {
    pub fn new(offsets: Vec<usize>) -> Self {
        Self(offsets)
    }

    pub fn choice(&self, state: usize) -> usize {
        self.0[state]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of checking a property on a model.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Whether the value at the initial state satisfies the threshold.
    pub sat: bool,
    /// Probability at the initial state.
    pub value: f64,
    pub state_values: Vec<f64>,
    pub scheduler: Scheduler,
}

/// Target states of `property` in `mdp`.
pub fn targets(mdp: &Mdp, property: &Property) -> Result<BitSet, SynthesisError> {
    mdp.label(property.target_label())
        .cloned()
        .ok_or_else(|| SynthesisError::UnknownLabel(property.target_label().to_string()))
}

/// Checks `property` on `mdp`, resolving nondeterminism according to `direction`.
pub fn model_check(
    mdp: &Mdp,
    property: &Property,
    direction: Direction,
    precision: f64,
) -> Result<CheckResult, SynthesisError> {
    let targets = targets(mdp, property)?;
    let maximize = property.maximizes_in(direction);
    let state_values = reachability_values(mdp, &targets, maximize, precision);
    let scheduler = extract_scheduler(mdp, &targets, &state_values, maximize);
    let value = state_values[mdp.initial_state()];
    Ok(CheckResult {
        sat: property.satisfies_threshold(value),
        value,
        state_values,
        scheduler,
    })
}

/// Optimal probabilities of eventually reaching `targets`, per state.
pub fn reachability_values(mdp: &Mdp, targets: &BitSet, maximize: bool, precision: f64) -> Vec<f64> {
    let n = mdp.num_states();
    let mut values: Vec<f64> = (0..n)
        .map(|s| if targets.contains(s) { 1.0 } else { 0.0 })
        .collect();

    for _ in 0..MAX_ITERATIONS {
        let mut diff: f64 = 0.0;
        for state in (0..n).filter(|&s| !targets.contains(s)) {
            let q = mdp.choices(state).map(|c| choice_value(mdp, c, &values));
            let best = if maximize {
                q.fold(f64::NEG_INFINITY, f64::max)
            } else {
                q.fold(f64::INFINITY, f64::min)
            };
            diff = diff.max((best - values[state]).abs());
            values[state] = best;
        }
        if diff < precision {
            break;
        }
    }
    values
}

fn choice_value(mdp: &Mdp, choice: usize, values: &[f64]) -> f64 {
    mdp.transitions(choice).iter().map(|&(t, p)| p * values[t]).sum()
}

/// Expected value of every choice of `mdp` with respect to `state_values`.
pub fn choice_values(mdp: &Mdp, state_values: &[f64]) -> Vec<f64> {
    (0..mdp.num_choices())
        .map(|c| choice_value(mdp, c, state_values))
        .collect()
}

/// Optimal scheduler for the given converged `values`.
pub fn extract_scheduler(mdp: &Mdp, targets: &BitSet, values: &[f64], maximize: bool) -> Scheduler {
    let n = mdp.num_states();
    let mut offsets = vec![0; n];

    for (state, offset) in offsets.iter_mut().enumerate() {
        let mut best = 0;
        let mut best_value = choice_value(mdp, mdp.choice_offset(state), values);
        for (i, c) in mdp.choices(state).enumerate().skip(1) {
            let v = choice_value(mdp, c, values);
            if (maximize && v > best_value) || (!maximize && v < best_value) {
                best = i;
                best_value = v;
            }
        }
        *offset = best;
    }

    if maximize {
        // Attractor: only accept optimal choices that step into settled states.
        let mut settled = targets.clone();
        let mut pending: Vec<usize> = (0..n)
            .filter(|&s| !targets.contains(s) && values[s] > OPTIMALITY_TOLERANCE)
            .collect();
        let mut changed = true;
        while changed {
            changed = false;
            pending.retain(|&state| {
                let progress = mdp.choices(state).enumerate().find(|&(_, c)| {
                    choice_value(mdp, c, values) >= values[state] - OPTIMALITY_TOLERANCE
                        && mdp
                            .transitions(c)
                            .iter()
                            .any(|&(t, p)| p > 0.0 && settled.contains(t))
                });
                match progress {
                    Some((offset, _)) => {
                        offsets[state] = offset;
                        settled.insert(state);
                        changed = true;
                        false
                    }
                    None => true,
                }
            });
        }
    }

    Scheduler(offsets)
}

/// Expected number of visits of every state in the Markov chain induced by
/// `choices`, starting in the initial state.
///
/// States with several selected choices move according to their uniform
/// mixture. Target states, states without a selected choice, and states that
/// cannot reach a target in the induced chain are absorbing.
pub fn expected_visits(mdp: &Mdp, targets: &BitSet, choices: &BitSet) -> Vec<f64> {
    let n = mdp.num_states();
    let selected: Vec<Vec<usize>> = (0..n)
        .map(|s| mdp.choices(s).filter(|&c| choices.contains(c)).collect())
        .collect();

    // Backward reachability of targets in the induced chain.
    let mut reaches = targets.clone();
    let mut changed = true;
    while changed {
        changed = false;
        for state in 0..n {
            if reaches.contains(state) {
                continue;
            }
            let hit = selected[state].iter().any(|&c| {
                mdp.transitions(c)
                    .iter()
                    .any(|&(t, p)| p > 0.0 && reaches.contains(t))
            });
            if hit {
                reaches.insert(state);
                changed = true;
            }
        }
    }

    let transient: Vec<bool> = (0..n)
        .map(|s| !targets.contains(s) && reaches.contains(s) && !selected[s].is_empty())
        .collect();

    let mut visits = vec![0.0; n];
    for _ in 0..MAX_VISIT_ITERATIONS {
        let mut next = vec![0.0; n];
        next[mdp.initial_state()] = 1.0;
        for state in (0..n).filter(|&s| transient[s]) {
            let weight = visits[state] / selected[state].len() as f64;
            for &c in &selected[state] {
                for &(t, p) in mdp.transitions(c) {
                    next[t] += weight * p;
                }
            }
        }
        let diff = next
            .iter()
            .zip(&visits)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        visits = next;
        if diff < 1e-9 {
            break;
        }
    }
    visits
}
