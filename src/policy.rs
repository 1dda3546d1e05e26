//! State-to-action policies with don't-care entries.

use std::fmt;

/// Index of an action label in the quotient.
pub type Action = usize;

/// A memoryless deterministic policy over the states of the quotient.
///
/// States that no member of the covered family can reach are left
/// unspecified (`None`): the policy does not care what happens there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Policy(Vec<Option<Action>>);

impl Policy {
    /// A policy that does not care about any of `num_states` states.
    pub fn empty(num_states: usize) -> Self {
        Self(vec![None; num_states])
    }

    pub fn from_actions(actions: Vec<Option<Action>>) -> Self {
        Self(actions)
    }

    pub fn num_states(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, state: usize) -> Option<Action> {
        self.0[state]
    }

    pub fn set(&mut self, state: usize, action: Option<Action>) {
        self.0[state] = action;
    }

    pub fn actions(&self) -> &[Option<Action>] {
        &self.0
    }

    /// Number of states with a concrete action.
    pub fn num_defined(&self) -> usize {
        self.0.iter().filter(|a| a.is_some()).count()
    }

    /// Returns a copy where every don't-care entry is taken from `other`.
    pub fn filled_from(&self, other: &Policy) -> Policy {
        assert_eq!(self.num_states(), other.num_states());
        Policy(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| a.or(b))
                .collect(),
        )
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (state, action) in self.0.iter().enumerate() {
            if let Some(action) = action {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}->{}", state, action)?;
            }
        }
        write!(f, "}}")
    }
}

/// Fills the don't-care entries of each policy with the other's actions.
///
/// Returns `(p12, p21)`: `p12` behaves like `policy1` wherever it is defined
/// and like `policy2` elsewhere, `p21` the other way around.
pub fn merge_policies(policy1: &Policy, policy2: &Policy) -> (Policy, Policy) {
    (policy1.filled_from(policy2), policy2.filled_from(policy1))
}
