//! Explicit Markov decision processes.
//!
//! An [`Mdp`] stores its choices grouped by state, in the usual sparse layout:
//! choices of state `s` occupy the index range `row_groups[s]..row_groups[s+1]`,
//! and each choice is a sparse distribution over successor states.
//!
//! A [`SubMdp`] is the fragment of a larger MDP that is reachable from the
//! initial state when only a subset of choices is allowed, together with the
//! maps back to the states and choices of the original.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

use crate::bitset::BitSet;
use crate::error::SynthesisError;

#[derive(Debug, Clone)]
pub struct Mdp {
    initial_state: usize,
    row_groups: Vec<usize>,
    rows: Vec<Vec<(usize, f64)>>,
    labels: BTreeMap<String, BitSet>,
}

impl Mdp {
    pub fn num_states(&self) -> usize {
        self.row_groups.len() - 1
    }

    pub fn num_choices(&self) -> usize {
        self.rows.len()
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    /// Global indices of the choices of `state`.
    pub fn choices(&self, state: usize) -> Range<usize> {
        self.row_groups[state]..self.row_groups[state + 1]
    }

    /// Index of the first choice of `state`.
    pub fn choice_offset(&self, state: usize) -> usize {
        self.row_groups[state]
    }

    pub fn transitions(&self, choice: usize) -> &[(usize, f64)] {
        &self.rows[choice]
    }

    pub fn label(&self, name: &str) -> Option<&BitSet> {
        self.labels.get(name)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(|s| s.as_str())
    }

    /// An MDP is deterministic (a Markov chain) if every state has exactly one choice.
    pub fn is_deterministic(&self) -> bool {
        self.num_choices() == self.num_states()
    }

    /// First state with more than one choice, if any.
    pub fn nondeterministic_state(&self) -> Option<usize> {
        (0..self.num_states()).find(|&s| self.choices(s).len() > 1)
    }
}

/// Incremental construction of an [`Mdp`].
///
/// ```
/// use policy_tree::mdp::MdpBuilder;
///
/// let mut builder = MdpBuilder::new();
/// let s0 = builder.add_state();
/// let s1 = builder.add_state();
/// builder.add_choice(s0, vec![(s1, 0.5), (s0, 0.5)]);
/// builder.add_choice(s1, vec![(s1, 1.0)]);
/// builder.add_label("goal", s1);
/// let mdp = builder.build().unwrap();
/// assert_eq!(mdp.num_states(), 2);
/// assert!(mdp.is_deterministic());
/// ```
#[derive(Debug, Default)]
pub struct MdpBuilder {
    initial_state: usize,
    states: Vec<Vec<Vec<(usize, f64)>>>,
    labels: BTreeMap<String, BitSet>,
}

impl MdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> usize {
        self.states.push(Vec::new());
        self.states.len() - 1
    }

    pub fn set_initial_state(&mut self, state: usize) {
        self.initial_state = state;
    }

    /// Adds a choice to `state`. Returns the index of the choice within the state.
    pub fn add_choice(&mut self, state: usize, transitions: Vec<(usize, f64)>) -> usize {
        self.states[state].push(transitions);
        self.states[state].len() - 1
    }

    pub fn add_label(&mut self, label: &str, state: usize) {
        self.labels.entry(label.to_string()).or_default().insert(state);
    }

    pub fn build(self) -> Result<Mdp, SynthesisError> {
        let num_states = self.states.len();
        if self.initial_state >= num_states {
            return Err(SynthesisError::InvalidInitialState(self.initial_state));
        }

        let mut row_groups = Vec::with_capacity(num_states + 1);
        let mut rows = Vec::new();
        for (state, choices) in self.states.into_iter().enumerate() {
            if choices.is_empty() {
                return Err(SynthesisError::Deadlock { state });
            }
            row_groups.push(rows.len());
            for transitions in choices {
                let choice = rows.len();
                validate_distribution(choice, &transitions, num_states)?;
                rows.push(transitions);
            }
        }
        row_groups.push(rows.len());

        Ok(Mdp {
            initial_state: self.initial_state,
            row_groups,
            rows,
            labels: self.labels,
        })
    }
}

fn validate_distribution(
    choice: usize,
    transitions: &[(usize, f64)],
    num_states: usize,
) -> Result<(), SynthesisError> {
    if let Some(&(state, _)) = transitions.iter().find(|(t, _)| *t >= num_states) {
        return Err(SynthesisError::UnknownState { choice, state });
    }
    let sum: f64 = transitions.iter().map(|(_, p)| p).sum();
    if (sum - 1.0).abs() > 1e-6 || transitions.iter().any(|(_, p)| *p < 0.0) {
        return Err(SynthesisError::InvalidDistribution { choice, sum });
    }
    Ok(())
}

/// The reachable fragment of an MDP under a choice mask.
#[derive(Debug, Clone)]
pub struct SubMdp {
    pub model: Mdp,
    /// For each state of `model`, the corresponding state of the original.
    pub state_map: Vec<usize>,
    /// For each choice of `model`, the corresponding choice of the original.
    pub choice_map: Vec<usize>,
}

impl SubMdp {
    /// Restricts `mdp` to the `selected` choices and keeps only reachable states.
    ///
    /// States are numbered in breadth-first order, so the initial state is `0`.
    ///
    /// # Panics
    ///
    /// Panics if a reachable state has no selected choice.
    pub fn restrict(mdp: &Mdp, selected: &BitSet) -> SubMdp {
        let mut new_index = vec![usize::MAX; mdp.num_states()];
        let mut state_map = Vec::new();
        let mut queue = VecDeque::new();

        new_index[mdp.initial_state()] = 0;
        state_map.push(mdp.initial_state());
        queue.push_back(mdp.initial_state());

        while let Some(state) = queue.pop_front() {
            for choice in mdp.choices(state).filter(|&c| selected.contains(c)) {
                for &(succ, _) in mdp.transitions(choice) {
                    if new_index[succ] == usize::MAX {
                        new_index[succ] = state_map.len();
                        state_map.push(succ);
                        queue.push_back(succ);
                    }
                }
            }
        }

        let mut row_groups = Vec::with_capacity(state_map.len() + 1);
        let mut rows = Vec::new();
        let mut choice_map = Vec::new();
        for &state in &state_map {
            row_groups.push(rows.len());
            let before = rows.len();
            for choice in mdp.choices(state).filter(|&c| selected.contains(c)) {
                let transitions = mdp
                    .transitions(choice)
                    .iter()
                    .map(|&(succ, p)| (new_index[succ], p))
                    .collect();
                rows.push(transitions);
                choice_map.push(choice);
            }
            assert!(
                rows.len() > before,
                "Reachable state {} has no selected choice",
                state
            );
        }
        row_groups.push(rows.len());

        let labels = mdp
            .labels
            .iter()
            .map(|(name, states)| {
                let sub: BitSet = state_map
                    .iter()
                    .enumerate()
                    .filter(|(_, orig)| states.contains(**orig))
                    .map(|(s, _)| s)
                    .collect();
                (name.clone(), sub)
            })
            .collect();

        let model = Mdp {
            initial_state: 0,
            row_groups,
            rows,
            labels,
        };
        SubMdp {
            model,
            state_map,
            choice_map,
        }
    }

    pub fn num_states(&self) -> usize {
        self.model.num_states()
    }

    /// Original choice executed in sub-state `state` by local offset `offset`.
    pub fn quotient_choice(&self, state: usize, offset: usize) -> usize {
        self.choice_map[self.model.choice_offset(state) + offset]
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn chain() -> Mdp {
        // 0 --a--> 1, 0 --b--> 2, 1 -> 1, 2 -> 2, 3 unreachable
        let mut b = MdpBuilder::new();
        for _ in 0..4 {
            b.add_state();
        }
        b.add_choice(0, vec![(1, 1.0)]);
        b.add_choice(0, vec![(2, 1.0)]);
        b.add_choice(1, vec![(1, 1.0)]);
        b.add_choice(2, vec![(2, 1.0)]);
        b.add_choice(3, vec![(0, 1.0)]);
        b.add_label("goal", 2);
        b.build().unwrap()
    }

    #[test]
    fn test_layout() {
        let mdp = chain();
        assert_eq!(mdp.num_states(), 4);
        assert_eq!(mdp.num_choices(), 5);
        assert_eq!(mdp.choices(0), 0..2);
        assert_eq!(mdp.choices(3), 4..5);
        assert!(!mdp.is_deterministic());
        assert_eq!(mdp.nondeterministic_state(), Some(0));
        assert!(mdp.label("goal").unwrap().contains(2));
        assert!(mdp.label("missing").is_none());
    }

    #[test]
    fn test_restrict_keeps_reachable() {
        let mdp = chain();
        let selected: BitSet = [1, 2, 3, 4].into_iter().collect();
        let sub = SubMdp::restrict(&mdp, &selected);
        assert_eq!(sub.state_map, vec![0, 2]);
        assert_eq!(sub.choice_map, vec![1, 3]);
        assert!(sub.model.is_deterministic());
        assert!(sub.model.label("goal").unwrap().contains(1));
        assert_eq!(sub.quotient_choice(0, 0), 1);
    }

    #[test]
    fn test_build_errors() {
        let mut b = MdpBuilder::new();
        b.add_state();
        b.add_state();
        b.add_choice(0, vec![(1, 0.5)]);
        b.add_choice(1, vec![(1, 1.0)]);
        assert_eq!(
            b.build().unwrap_err(),
            SynthesisError::InvalidDistribution { choice: 0, sum: 0.5 }
        );

        let mut b = MdpBuilder::new();
        b.add_state();
        b.add_state();
        b.add_choice(0, vec![(1, 1.0)]);
        assert_eq!(b.build().unwrap_err(), SynthesisError::Deadlock { state: 1 });

        let mut b = MdpBuilder::new();
        b.add_state();
        b.add_choice(0, vec![(7, 1.0)]);
        assert_eq!(
            b.build().unwrap_err(),
            SynthesisError::UnknownState { choice: 0, state: 7 }
        );
    }
}
