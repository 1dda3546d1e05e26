//! The quotient: one MDP encoding a whole family of MDPs.
//!
//! Every choice of the quotient executes an *action* and carries a *coloring*,
//! the set of `(hole, option)` pairs a member must select for the choice to be
//! enabled. Different choices of the same action in the same state are the
//! *variants* of that action; the holes decide which variant a member executes.
//!
//! The search engine only talks to the [`Quotient`] trait. [`MdpFamilyQuotient`]
//! is the explicit implementation built with [`QuotientBuilder`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::bitset::BitSet;
use crate::check::{self, CheckResult, Scheduler, DEFAULT_PRECISION};
use crate::error::SynthesisError;
use crate::family::{Family, Hole};
use crate::mdp::{Mdp, MdpBuilder, SubMdp};
use crate::policy::{Action, Policy};
use crate::property::{Direction, Property};

/// For each hole, the sorted options used by some set of choices.
pub type HoleSelection = Vec<Vec<usize>>;

/// Operations the policy-tree search needs from the model layer.
pub trait Quotient {
    /// A model restricted to (part of) a family.
    type Model;

    /// Number of states of the quotient, i.e. the length of every policy.
    fn num_states(&self) -> usize;

    fn holes(&self) -> &[Hole];

    /// Checks that `family` and `property` fit this quotient.
    fn validate(&self, family: &Family, property: &Property) -> Result<(), SynthesisError>;

    /// Builds the model of `family`: all choices some member enables.
    fn build(&self, family: &Family) -> Self::Model;

    fn model_states(&self, model: &Self::Model) -> usize;

    fn model_check(
        &self,
        model: &Self::Model,
        property: &Property,
        direction: Direction,
    ) -> Result<CheckResult, SynthesisError>;

    /// A quotient state where `model` still has several choices, if any.
    fn nondeterministic_state(&self, model: &Self::Model) -> Option<usize>;

    /// Restricts `family` to the choices selected by `policy`.
    ///
    /// Where the policy does not care, or its action is not offered, some
    /// action offered by the family is used instead. Returns the policy that
    /// was actually applied (defined exactly on the reachable states) along
    /// with the resulting model.
    fn apply_policy(&self, family: &Family, policy: &Policy) -> (Policy, Self::Model);

    fn extract_policy(&self, model: &Self::Model, scheduler: &Scheduler) -> Policy;

    /// Quotient choices selected by `scheduler` in `model`.
    fn scheduler_choices(&self, model: &Self::Model, scheduler: &Scheduler) -> BitSet;

    /// Per-state values of `model` mapped to quotient states (zero elsewhere).
    fn quotient_state_values(&self, model: &Self::Model, values: &[f64]) -> Vec<f64>;

    /// Keeps the choices in states reachable from the initial state via `choices`.
    fn keep_reachable_choices(&self, choices: &BitSet) -> BitSet;

    fn hole_selection(&self, choices: &BitSet) -> HoleSelection;

    /// Scores inconsistent holes by how much splitting them may change the value.
    fn inconsistency_scores(
        &self,
        family: &Family,
        inconsistent: &BTreeMap<usize, Vec<usize>>,
        choices: &BitSet,
        state_values: &[f64],
        property: &Property,
    ) -> Result<BTreeMap<usize, f64>, SynthesisError>;

    /// Checks the MDP where every action executes a uniform mixture of its
    /// variants. Returns the check result and the optimal policy.
    fn randomized_abstraction(
        &self,
        model: &Self::Model,
        property: &Property,
    ) -> Result<(CheckResult, Policy), SynthesisError>;
}

/// Explicit quotient of an MDP family.
#[derive(Debug, Clone)]
pub struct MdpFamilyQuotient {
    mdp: Mdp,
    holes: Vec<Hole>,
    action_labels: Vec<String>,
    choice_to_action: Vec<Action>,
    coloring: Vec<Vec<(usize, usize)>>,
    /// For each state and action, the choices executing that action.
    state_action_choices: Vec<Vec<Vec<usize>>>,
    /// For each state, the actions with at least one choice.
    state_to_actions: Vec<Vec<Action>>,
    precision: f64,
}

impl MdpFamilyQuotient {
    pub fn mdp(&self) -> &Mdp {
        &self.mdp
    }

    pub fn num_actions(&self) -> usize {
        self.action_labels.len()
    }

    pub fn action_label(&self, action: Action) -> &str {
        &self.action_labels[action]
    }

    pub fn action_labels(&self) -> &[String] {
        &self.action_labels
    }

    pub fn choice_to_action(&self, choice: usize) -> Action {
        self.choice_to_action[choice]
    }

    pub fn coloring(&self, choice: usize) -> &[(usize, usize)] {
        &self.coloring[choice]
    }

    pub fn state_action_choices(&self, state: usize, action: Action) -> &[usize] {
        &self.state_action_choices[state][action]
    }

    pub fn state_to_actions(&self, state: usize) -> &[Action] {
        &self.state_to_actions[state]
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f64) {
        self.precision = precision;
    }

    /// Choices enabled by at least one member of `family`.
    pub fn selected_choices(&self, family: &Family) -> BitSet {
        let mut selected = BitSet::new(self.mdp.num_choices());
        for (choice, colors) in self.coloring.iter().enumerate() {
            if colors.iter().all(|&(h, o)| family.hole_contains(h, o)) {
                selected.insert(choice);
            }
        }
        selected
    }

    /// The sub-model of a single concrete member.
    pub fn build_member(&self, assignment: &[usize]) -> SubMdp {
        self.build(&Family::singleton(assignment))
    }

    fn targets(&self, property: &Property) -> Result<BitSet, SynthesisError> {
        check::targets(&self.mdp, property)
    }
}

impl Quotient for MdpFamilyQuotient {
    type Model = SubMdp;

    fn num_states(&self) -> usize {
        self.mdp.num_states()
    }

    fn holes(&self) -> &[Hole] {
        &self.holes
    }

    fn validate(&self, family: &Family, property: &Property) -> Result<(), SynthesisError> {
        if family.num_holes() != self.holes.len() {
            return Err(SynthesisError::InvalidFamily(format!(
                "family has {} holes, quotient has {}",
                family.num_holes(),
                self.holes.len()
            )));
        }
        for (index, hole) in self.holes.iter().enumerate() {
            if let Some(&o) = family
                .hole_options(index)
                .iter()
                .find(|&&o| o >= hole.num_options())
            {
                return Err(SynthesisError::InvalidFamily(format!(
                    "option {} of hole {} is out of range",
                    o,
                    hole.name()
                )));
            }
        }
        self.targets(property).map(|_| ())
    }

    fn build(&self, family: &Family) -> SubMdp {
        SubMdp::restrict(&self.mdp, &self.selected_choices(family))
    }

    fn model_states(&self, model: &SubMdp) -> usize {
        model.num_states()
    }

    fn model_check(
        &self,
        model: &SubMdp,
        property: &Property,
        direction: Direction,
    ) -> Result<CheckResult, SynthesisError> {
        check::model_check(&model.model, property, direction, self.precision)
    }

    fn nondeterministic_state(&self, model: &SubMdp) -> Option<usize> {
        model
            .model
            .nondeterministic_state()
            .map(|s| model.state_map[s])
    }

    fn apply_policy(&self, family: &Family, policy: &Policy) -> (Policy, SubMdp) {
        let selected = self.selected_choices(family);
        let mut choices = BitSet::new(self.mdp.num_choices());
        for state in 0..self.mdp.num_states() {
            let offered = |a: &Action| {
                self.state_action_choices[state][*a]
                    .iter()
                    .any(|&c| selected.contains(c))
            };
            let action = policy
                .get(state)
                .filter(|a| offered(a))
                .or_else(|| self.state_to_actions[state].iter().copied().find(|a| offered(a)));
            if let Some(action) = action {
                choices.extend(
                    self.state_action_choices[state][action]
                        .iter()
                        .copied()
                        .filter(|&c| selected.contains(c)),
                );
            }
        }

        let model = SubMdp::restrict(&self.mdp, &choices);
        let mut fixed = Policy::empty(self.num_states());
        for (sub_state, &state) in model.state_map.iter().enumerate() {
            let choice = model.quotient_choice(sub_state, 0);
            fixed.set(state, Some(self.choice_to_action[choice]));
        }
        (fixed, model)
    }

    fn extract_policy(&self, model: &SubMdp, scheduler: &Scheduler) -> Policy {
        let mut policy = Policy::empty(self.num_states());
        for (sub_state, &state) in model.state_map.iter().enumerate() {
            let choice = model.quotient_choice(sub_state, scheduler.choice(sub_state));
            policy.set(state, Some(self.choice_to_action[choice]));
        }
        policy
    }

    fn scheduler_choices(&self, model: &SubMdp, scheduler: &Scheduler) -> BitSet {
        (0..model.num_states())
            .map(|s| model.quotient_choice(s, scheduler.choice(s)))
            .collect()
    }

    fn quotient_state_values(&self, model: &SubMdp, values: &[f64]) -> Vec<f64> {
        let mut result = vec![0.0; self.num_states()];
        for (sub_state, &state) in model.state_map.iter().enumerate() {
            result[state] = values[sub_state];
        }
        result
    }

    fn keep_reachable_choices(&self, choices: &BitSet) -> BitSet {
        let mut reachable = BitSet::new(self.mdp.num_states());
        let mut kept = BitSet::new(self.mdp.num_choices());
        let mut queue = VecDeque::new();
        reachable.insert(self.mdp.initial_state());
        queue.push_back(self.mdp.initial_state());
        while let Some(state) = queue.pop_front() {
            for choice in self.mdp.choices(state).filter(|&c| choices.contains(c)) {
                kept.insert(choice);
                for &(succ, _) in self.mdp.transitions(choice) {
                    if reachable.insert(succ) {
                        queue.push_back(succ);
                    }
                }
            }
        }
        kept
    }

    fn hole_selection(&self, choices: &BitSet) -> HoleSelection {
        let mut selection = vec![BTreeSet::new(); self.holes.len()];
        for choice in choices {
            for &(hole, option) in &self.coloring[choice] {
                selection[hole].insert(option);
            }
        }
        selection
            .into_iter()
            .map(|options| options.into_iter().collect())
            .collect()
    }

    fn inconsistency_scores(
        &self,
        family: &Family,
        inconsistent: &BTreeMap<usize, Vec<usize>>,
        choices: &BitSet,
        state_values: &[f64],
        property: &Property,
    ) -> Result<BTreeMap<usize, f64>, SynthesisError> {
        let targets = self.targets(property)?;
        let selected = self.selected_choices(family);
        let choice_values = check::choice_values(&self.mdp, state_values);
        let visits = check::expected_visits(&self.mdp, &targets, choices);

        let mut scores: BTreeMap<usize, f64> = inconsistent.keys().map(|&h| (h, 0.0)).collect();
        for state in (0..self.num_states()).filter(|&s| visits[s] > 0.0) {
            for action in &self.state_to_actions[state] {
                for (&hole, options) in inconsistent {
                    let values: Vec<f64> = self.state_action_choices[state][*action]
                        .iter()
                        .filter(|&&c| selected.contains(c))
                        .filter(|&&c| {
                            self.coloring[c]
                                .iter()
                                .any(|&(h, o)| h == hole && options.contains(&o))
                        })
                        .map(|&c| choice_values[c])
                        .collect();
                    if values.len() < 2 {
                        continue;
                    }
                    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                    if let Some(score) = scores.get_mut(&hole) {
                        *score += visits[state] * (max - min);
                    }
                }
            }
        }
        debug!("inconsistency scores: {:?}", scores);
        Ok(scores)
    }

    fn randomized_abstraction(
        &self,
        model: &SubMdp,
        property: &Property,
    ) -> Result<(CheckResult, Policy), SynthesisError> {
        let sub = &model.model;
        let mut builder = MdpBuilder::new();
        for _ in 0..sub.num_states() {
            builder.add_state();
        }
        for label in sub.labels() {
            if let Some(states) = sub.label(label) {
                for state in states {
                    builder.add_label(label, state);
                }
            }
        }

        let mut choice_actions = Vec::new();
        for state in 0..sub.num_states() {
            let mut variants: BTreeMap<Action, Vec<usize>> = BTreeMap::new();
            for choice in sub.choices(state) {
                let action = self.choice_to_action[model.choice_map[choice]];
                variants.entry(action).or_default().push(choice);
            }
            for (action, choices) in variants {
                let weight = 1.0 / choices.len() as f64;
                let mut mixture: BTreeMap<usize, f64> = BTreeMap::new();
                for choice in choices {
                    for &(succ, p) in sub.transitions(choice) {
                        *mixture.entry(succ).or_default() += weight * p;
                    }
                }
                builder.add_choice(state, mixture.into_iter().collect());
                choice_actions.push(action);
            }
        }
        let randomized = builder.build()?;

        let result = check::model_check(&randomized, property, Direction::Primary, self.precision)?;
        let mut policy = Policy::empty(self.num_states());
        for (sub_state, &state) in model.state_map.iter().enumerate() {
            let choice = randomized.choice_offset(sub_state) + result.scheduler.choice(sub_state);
            policy.set(state, Some(choice_actions[choice]));
        }
        Ok((result, policy))
    }
}

/// Incremental construction of an [`MdpFamilyQuotient`].
///
/// ```
/// use policy_tree::family::Hole;
/// use policy_tree::quotient::QuotientBuilder;
///
/// let mut builder = QuotientBuilder::new(vec![Hole::new("speed", 2)]);
/// let s0 = builder.add_state();
/// let goal = builder.add_state();
/// builder.add_choice(s0, "go", &[(0, 0)], vec![(goal, 1.0)]);
/// builder.add_choice(s0, "go", &[(0, 1)], vec![(s0, 1.0)]);
/// builder.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
/// builder.add_label("goal", goal);
/// let quotient = builder.build().unwrap();
/// assert_eq!(quotient.num_actions(), 2);
/// ```
#[derive(Debug)]
pub struct QuotientBuilder {
    mdp: MdpBuilder,
    holes: Vec<Hole>,
    /// Per state, the action label and coloring of each choice, in insertion order.
    choices: Vec<Vec<(String, Vec<(usize, usize)>)>>,
    precision: f64,
}

impl QuotientBuilder {
    pub fn new(holes: Vec<Hole>) -> Self {
        Self {
            mdp: MdpBuilder::new(),
            holes,
            choices: Vec::new(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn add_state(&mut self) -> usize {
        self.choices.push(Vec::new());
        self.mdp.add_state()
    }

    pub fn set_initial_state(&mut self, state: usize) {
        self.mdp.set_initial_state(state);
    }

    pub fn add_label(&mut self, label: &str, state: usize) {
        self.mdp.add_label(label, state);
    }

    pub fn set_precision(&mut self, precision: f64) {
        self.precision = precision;
    }

    /// Adds a choice executing `action`, enabled by members that select every
    /// `(hole, option)` pair of `coloring`.
    pub fn add_choice(
        &mut self,
        state: usize,
        action: &str,
        coloring: &[(usize, usize)],
        transitions: Vec<(usize, f64)>,
    ) {
        self.mdp.add_choice(state, transitions);
        self.choices[state].push((action.to_string(), coloring.to_vec()));
    }

    pub fn build(self) -> Result<MdpFamilyQuotient, SynthesisError> {
        let mdp = self.mdp.build()?;

        let action_labels: Vec<String> = self
            .choices
            .iter()
            .flatten()
            .map(|(label, _)| label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let label_to_action: BTreeMap<&str, Action> = action_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut choice_to_action = Vec::with_capacity(mdp.num_choices());
        let mut coloring = Vec::with_capacity(mdp.num_choices());
        for (label, colors) in self.choices.into_iter().flatten() {
            let choice = coloring.len();
            for &(hole, option) in &colors {
                if hole >= self.holes.len() || option >= self.holes[hole].num_options() {
                    return Err(SynthesisError::InvalidColoring {
                        choice,
                        hole,
                        option,
                    });
                }
            }
            choice_to_action.push(label_to_action[label.as_str()]);
            coloring.push(colors);
        }

        let num_actions = action_labels.len();
        let mut state_action_choices = Vec::with_capacity(mdp.num_states());
        let mut state_to_actions = Vec::with_capacity(mdp.num_states());
        for state in 0..mdp.num_states() {
            let mut action_choices = vec![Vec::new(); num_actions];
            for choice in mdp.choices(state) {
                action_choices[choice_to_action[choice]].push(choice);
            }
            state_to_actions.push(
                (0..num_actions)
                    .filter(|&a| !action_choices[a].is_empty())
                    .collect(),
            );
            state_action_choices.push(action_choices);
            check_enabled(&self.holes, &mdp, &coloring, state)?;
        }

        debug!(
            "built quotient with {} states, {} choices, {} actions, {} holes",
            mdp.num_states(),
            mdp.num_choices(),
            num_actions,
            self.holes.len()
        );

        Ok(MdpFamilyQuotient {
            mdp,
            holes: self.holes,
            action_labels,
            choice_to_action,
            coloring,
            state_action_choices,
            state_to_actions,
            precision: self.precision,
        })
    }
}

/// Checks that every member enables at least one choice of `state`.
///
/// Only the holes coloring some choice of `state` matter, so their assignments
/// are enumerated and every other hole is pinned to its first option.
fn check_enabled(
    holes: &[Hole],
    mdp: &Mdp,
    coloring: &[Vec<(usize, usize)>],
    state: usize,
) -> Result<(), SynthesisError> {
    let relevant: BTreeSet<usize> = mdp
        .choices(state)
        .flat_map(|c| coloring[c].iter().map(|&(hole, _)| hole))
        .collect();
    if relevant.is_empty() {
        return Ok(());
    }
    let local = Family::new(
        holes
            .iter()
            .enumerate()
            .map(|(h, hole)| {
                if relevant.contains(&h) {
                    (0..hole.num_options()).collect()
                } else {
                    vec![0]
                }
            })
            .collect(),
    );
    let enables = |member: &[usize], choice: usize| coloring[choice].iter().all(|&(h, o)| member[h] == o);
    match local
        .members()
        .find(|member| !mdp.choices(state).any(|c| enables(member, c)))
    {
        Some(member) => Err(SynthesisError::NoEnabledChoice {
            state,
            assignment: relevant.iter().map(|&h| (h, member[h])).collect(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::property::Comparison;

    /// Hole 0 picks the variant of `a` in s0; `b` is uncolored.
    fn quotient() -> MdpFamilyQuotient {
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        let sink = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 0.9), (sink, 0.1)]);
        b.add_choice(s0, "a", &[(0, 1)], vec![(goal, 0.3), (sink, 0.7)]);
        b.add_choice(s0, "b", &[], vec![(goal, 0.5), (sink, 0.5)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        b.add_choice(sink, "stay", &[], vec![(sink, 1.0)]);
        b.add_label("goal", goal);
        b.build().unwrap()
    }

    fn property() -> Property {
        Property::new("goal", Comparison::Ge, 0.8).unwrap()
    }

    #[test]
    fn test_actions_and_variants() {
        let q = quotient();
        assert_eq!(q.action_labels(), &["a", "b", "stay"]);
        assert_eq!(q.state_action_choices(0, 0), &[0, 1]);
        assert_eq!(q.state_to_actions(0), &[0, 1]);
        assert_eq!(q.state_to_actions(1), &[2]);
    }

    #[test]
    fn test_build_restricts_choices() {
        let q = quotient();
        let family = Family::from_holes(q.holes());
        assert_eq!(q.selected_choices(&family).len(), 5);

        let member = q.build_member(&[1]);
        assert_eq!(member.choice_map, vec![1, 2, 3, 4]);
        let result = q.model_check(&member, &property(), Direction::Primary).unwrap();
        assert!((result.value - 0.5).abs() < 1e-9);
        assert!(!result.sat);
    }

    #[test]
    fn test_apply_policy_fills_dont_care() {
        let q = quotient();
        let family = Family::from_holes(q.holes());
        let policy = Policy::from_actions(vec![Some(0), None, None]);
        let (fixed, model) = q.apply_policy(&family, &policy);
        assert_eq!(fixed, Policy::from_actions(vec![Some(0), Some(2), Some(2)]));
        // Both variants of `a` remain: the family still chooses.
        assert_eq!(q.nondeterministic_state(&model), Some(0));
        let result = q.model_check(&model, &property(), Direction::Alt).unwrap();
        assert!((result.value - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_apply_policy_to_member_is_deterministic() {
        let q = quotient();
        let policy = Policy::from_actions(vec![Some(0), None, None]);
        let (_, model) = q.apply_policy(&Family::singleton(&[0]), &policy);
        assert_eq!(q.nondeterministic_state(&model), None);
        let result = q.model_check(&model, &property(), Direction::Alt).unwrap();
        assert!(result.sat);
    }

    #[test]
    fn test_hole_selection_and_reachability() {
        let q = quotient();
        let choices: BitSet = [0, 1, 3].into_iter().collect();
        assert_eq!(q.hole_selection(&choices), vec![vec![0, 1]]);

        // Choice 4 sits in the sink, which is unreachable via {2, 3}.
        let kept = q.keep_reachable_choices(&[2, 3].into_iter().collect());
        assert_eq!(kept.iter().collect::<Vec<_>>(), vec![2, 3]);
        let kept = q.keep_reachable_choices(&[0, 4].into_iter().collect());
        assert_eq!(kept.iter().collect::<Vec<_>>(), vec![0, 4]);
    }

    #[test]
    fn test_extract_policy() {
        let q = quotient();
        let model = q.build(&Family::from_holes(q.holes()));
        let result = q.model_check(&model, &property(), Direction::Primary).unwrap();
        assert!((result.value - 0.9).abs() < 1e-9);
        let policy = q.extract_policy(&model, &result.scheduler);
        assert_eq!(policy.get(0), Some(0));
        let choices = q.scheduler_choices(&model, &result.scheduler);
        assert!(choices.contains(0));
    }

    #[test]
    fn test_randomized_abstraction() {
        let q = quotient();
        let model = q.build(&Family::from_holes(q.holes()));
        let (result, policy) = q.randomized_abstraction(&model, &property()).unwrap();
        // Mixture of `a` reaches the goal with 0.6, `b` with 0.5.
        assert!((result.value - 0.6).abs() < 1e-9);
        assert!(!result.sat);
        assert_eq!(policy.get(0), Some(0));
    }

    #[test]
    fn test_inconsistency_scores() {
        let q = quotient();
        let family = Family::from_holes(q.holes());
        let values = vec![0.9, 1.0, 0.0];
        let choices: BitSet = [0, 3, 4].into_iter().collect();
        let inconsistent: BTreeMap<usize, Vec<usize>> = [(0, vec![0, 1])].into_iter().collect();
        let scores = q
            .inconsistency_scores(&family, &inconsistent, &choices, &values, &property())
            .unwrap();
        assert!((scores[&0] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_coloring() {
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2)]);
        let s = b.add_state();
        b.add_choice(s, "a", &[(0, 5)], vec![(s, 1.0)]);
        assert_eq!(
            b.build().unwrap_err(),
            SynthesisError::InvalidColoring {
                choice: 0,
                hole: 0,
                option: 5
            }
        );
    }

    #[test]
    fn test_member_without_enabled_choice() {
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2), Hole::new("g", 3)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 1.0)]);
        b.add_choice(s0, "b", &[(0, 1), (1, 0)], vec![(goal, 1.0)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        b.add_label("goal", goal);
        // h=1, g=1 enables neither `a` nor `b`.
        assert_eq!(
            b.build().unwrap_err(),
            SynthesisError::NoEnabledChoice {
                state: 0,
                assignment: vec![(0, 1), (1, 1)]
            }
        );
    }

    #[test]
    fn test_uncolored_choice_covers_every_member() {
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 1.0)]);
        b.add_choice(s0, "b", &[], vec![(s0, 1.0)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_validate() {
        let q = quotient();
        let good = Family::from_holes(q.holes());
        assert!(q.validate(&good, &property()).is_ok());

        let bad = Family::new(vec![vec![0, 3]]);
        assert!(matches!(
            q.validate(&bad, &property()),
            Err(SynthesisError::InvalidFamily(_))
        ));

        let unknown = Property::new("elsewhere", Comparison::Ge, 0.5).unwrap();
        assert_eq!(
            q.validate(&good, &unknown),
            Err(SynthesisError::UnknownLabel("elsewhere".to_string()))
        );
    }
}
