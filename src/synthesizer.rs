//! The policy-tree synthesizer.
//!
//! [`SynthesizerPolicyTree::synthesize`] explores the design space depth-first.
//! Each open leaf is handed to [`verify_family`][SynthesizerPolicyTree::verify_family],
//! which tries, in order:
//!
//! 1. an exact check if the family is a single member;
//! 2. the configured abstraction ([`Strategy`]), whose policy is trusted only
//!    after it has been re-verified on the whole family;
//! 3. an exact best-case check of the family, which either refutes every
//!    member at once or yields the scheduler used to pick a splitter.
//!
//! Undecided leaves are split and their children pushed onto the stack. Once
//! every leaf is resolved, the leaves are double-checked and the tree is
//! compacted by [`PolicyTree::postprocess`].
//!
//! # Examples
//!
//! ```
//! use policy_tree::family::{Family, Hole};
//! use policy_tree::game::StochasticGameSolver;
//! use policy_tree::property::{Comparison, Property};
//! use policy_tree::quotient::{QuotientBuilder, Quotient};
//! use policy_tree::synthesizer::SynthesizerPolicyTree;
//!
//! // The door is either on the left or on the right.
//! let mut builder = QuotientBuilder::new(vec![Hole::new("door", 2)]);
//! let start = builder.add_state();
//! let exit = builder.add_state();
//! let wall = builder.add_state();
//! builder.add_choice(start, "left", &[(0, 0)], vec![(exit, 1.0)]);
//! builder.add_choice(start, "left", &[(0, 1)], vec![(wall, 1.0)]);
//! builder.add_choice(start, "right", &[(0, 0)], vec![(wall, 1.0)]);
//! builder.add_choice(start, "right", &[(0, 1)], vec![(exit, 1.0)]);
//! builder.add_choice(exit, "stay", &[], vec![(exit, 1.0)]);
//! builder.add_choice(wall, "stay", &[], vec![(wall, 1.0)]);
//! builder.add_label("exit", exit);
//! let quotient = builder.build().unwrap();
//!
//! let property = Property::new("exit", Comparison::Ge, 0.9).unwrap();
//! let solver = StochasticGameSolver::new(&quotient, &property).unwrap();
//! let mut synthesizer = SynthesizerPolicyTree::new(&quotient, solver);
//! let tree = synthesizer
//!     .synthesize(&Family::from_holes(quotient.holes()), &property)
//!     .unwrap();
//!
//! // No single policy works for both doors, but one per door does.
//! let summary = tree.summary();
//! assert_eq!(summary.solvable_leaves, 2);
//! assert_eq!(summary.members_satisfied, summary.members_total);
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::bitset::BitSet;
use crate::error::SynthesisError;
use crate::family::Family;
use crate::game::{GameAbstractionSolver, GameSolution};
use crate::policy::Policy;
use crate::property::{Direction, Property};
use crate::quotient::{HoleSelection, Quotient};
use crate::stats::Statistics;
use crate::tree::{PolicySource, PolicyTree, Verdict};

/// Abstraction tried on a family before falling back to the exact check.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum Strategy {
    /// Solve the two-player game between the policy and the family.
    #[default]
    GameAbstraction,
    /// Check the MDP where every action executes a uniform mixture of its variants.
    RandomizedAbstraction,
}

impl Strategy {
    pub fn policy_source(self) -> PolicySource {
        match self {
            Strategy::GameAbstraction => PolicySource::GameAbstraction,
            Strategy::RandomizedAbstraction => PolicySource::RandomizedAbstraction,
        }
    }
}

/// Knobs of the synthesizer.
#[derive(Debug, Copy, Clone)]
pub struct SynthesizerConfig {
    pub strategy: Strategy,
    /// Pick splitters from the game solution instead of the best-case scheduler.
    /// Only has an effect with [`Strategy::GameAbstraction`].
    pub optimistic_splitting: bool,
    /// Re-check every leaf once the search is complete.
    pub double_check: bool,
    /// Merge siblings once the search is complete.
    pub postprocess: bool,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::GameAbstraction,
            optimistic_splitting: true,
            double_check: true,
            postprocess: true,
        }
    }
}

/// What [`SynthesizerPolicyTree::verify_family`] found out about a family.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyOutcome {
    /// No member satisfies the property.
    Refuted,
    /// The policy satisfies the property for every member.
    Solved { policy: Policy, source: PolicySource },
    /// The family must be split on `splitter`; `hole_selection` holds the
    /// options the deciding scheduler used.
    Undecided {
        splitter: usize,
        hole_selection: HoleSelection,
    },
}

pub struct SynthesizerPolicyTree<'a, Q: Quotient, G: GameAbstractionSolver> {
    quotient: &'a Q,
    game_solver: G,
    config: SynthesizerConfig,
    stats: Option<Statistics>,
}

impl<'a, Q: Quotient, G: GameAbstractionSolver> SynthesizerPolicyTree<'a, Q, G> {
    pub fn new(quotient: &'a Q, game_solver: G) -> Self {
        Self::with_config(quotient, game_solver, SynthesizerConfig::default())
    }

    pub fn with_config(quotient: &'a Q, game_solver: G, config: SynthesizerConfig) -> Self {
        Self {
            quotient,
            game_solver,
            config,
            stats: None,
        }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Statistics of the last (or ongoing) call to [`synthesize`][Self::synthesize].
    pub fn statistics(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    fn iteration_mdp(&mut self, states: usize) {
        if let Some(stats) = &mut self.stats {
            stats.iteration_mdp(states);
        }
    }

    /// Builds a policy tree whose leaves cover `family`.
    pub fn synthesize(&mut self, family: &Family, property: &Property) -> Result<PolicyTree, SynthesisError> {
        self.quotient.validate(family, property)?;
        if self.game_solver.target_label() != property.target_label() {
            return Err(SynthesisError::TargetMismatch {
                solver: self.game_solver.target_label().to_string(),
                property: property.target_label().to_string(),
            });
        }
        info!(
            "synthesizing policy tree for {} family members, property {}",
            family.size(),
            property
        );
        self.stats = Some(Statistics::new(family));

        let mut tree = PolicyTree::new(family.clone());
        let mut open = vec![tree.root()];
        while let Some(id) = open.pop() {
            let family = tree.node(id).family().clone();
            match self.verify_family(&family, property)? {
                FamilyOutcome::Refuted => {
                    debug!("refuted {}", family);
                    tree.resolve(id, Verdict::Refuted, None);
                    self.explore(&family);
                }
                FamilyOutcome::Solved { policy, source } => {
                    debug!(
                        "solved {} by {} (policy fixes {} states)",
                        family,
                        source,
                        policy.num_defined()
                    );
                    tree.resolve(id, Verdict::Solved(policy), Some(source));
                    self.explore(&family);
                }
                FamilyOutcome::Undecided {
                    splitter,
                    hole_selection,
                } => {
                    let (suboptions, subfamilies) = self.split(&family, splitter, &hole_selection);
                    debug!("splitting {} on hole {} into {:?}", family, splitter, suboptions);
                    open.extend(tree.split(id, splitter, suboptions, subfamilies));
                }
            }
        }

        if self.config.double_check {
            tree.double_check(self.quotient, property)?;
        }
        info!("\n{}", tree.summary());

        if self.config.postprocess {
            let merges = tree.postprocess(self.quotient, property)?;
            debug!("merge stats: {:?}", merges);
            info!("\n{}", tree.summary());
        }

        if let Some(stats) = &mut self.stats {
            stats.finish();
            info!("{}", stats);
        }
        Ok(tree)
    }

    fn explore(&mut self, family: &Family) {
        if let Some(stats) = &mut self.stats {
            stats.explore(family);
        }
    }

    /// Resolves `family` if it can, or picks the hole to split it on.
    pub fn verify_family(&mut self, family: &Family, property: &Property) -> Result<FamilyOutcome, SynthesisError> {
        let model = self.quotient.build(family);

        if family.is_singleton() {
            return Ok(match self.solve_singleton(&model, property)? {
                Some(policy) => FamilyOutcome::Solved {
                    policy,
                    source: PolicySource::Singleton,
                },
                None => FamilyOutcome::Refuted,
            });
        }

        let (policy, game) = self.attempt(family, &model, property)?;
        if let Some(policy) = policy {
            return Ok(FamilyOutcome::Solved {
                policy,
                source: self.config.strategy.policy_source(),
            });
        }

        let result = self
            .quotient
            .model_check(&model, property, Direction::Primary)?;
        self.iteration_mdp(self.quotient.model_states(&model));
        if !result.sat {
            return Ok(FamilyOutcome::Refuted);
        }

        let (choices, state_values) = match game.filter(|_| self.config.optimistic_splitting) {
            Some(solution) => (solution.reachable_choices, solution.state_values),
            None => (
                self.quotient.scheduler_choices(&model, &result.scheduler),
                self.quotient.quotient_state_values(&model, &result.state_values),
            ),
        };
        let choices = self.quotient.keep_reachable_choices(&choices);
        let hole_selection = self.quotient.hole_selection(&choices);
        let splitter = self.choose_splitter(family, property, &hole_selection, &choices, &state_values)?;
        Ok(FamilyOutcome::Undecided {
            splitter,
            hole_selection,
        })
    }

    /// Runs the configured abstraction. Returns the verified policy, if any,
    /// and the game solution to reuse for splitting.
    fn attempt(
        &mut self,
        family: &Family,
        model: &Q::Model,
        property: &Property,
    ) -> Result<(Option<Policy>, Option<GameSolution>), SynthesisError> {
        match self.config.strategy {
            Strategy::GameAbstraction => {
                let (policy, solution) = self.solve_game_abstraction(family, property)?;
                Ok((policy, Some(solution)))
            }
            Strategy::RandomizedAbstraction => {
                Ok((self.solve_randomized_abstraction(family, model, property)?, None))
            }
        }
    }

    /// Checks that `policy` satisfies the property for every member of `family`.
    ///
    /// Returns the policy as actually applied (defined on the reachable states).
    pub fn verify_policy(
        &mut self,
        family: &Family,
        property: &Property,
        policy: &Policy,
    ) -> Result<Option<Policy>, SynthesisError> {
        let (fixed, model) = self.quotient.apply_policy(family, policy);
        if family.is_singleton() {
            if let Some(state) = self.quotient.nondeterministic_state(&model) {
                return Err(SynthesisError::NondeterministicPolicy {
                    family: family.to_string(),
                    state,
                });
            }
        }
        let result = self.quotient.model_check(&model, property, Direction::Alt)?;
        self.iteration_mdp(self.quotient.model_states(&model));
        Ok(result.sat.then_some(fixed))
    }

    fn solve_singleton(&mut self, model: &Q::Model, property: &Property) -> Result<Option<Policy>, SynthesisError> {
        let result = self
            .quotient
            .model_check(model, property, Direction::Primary)?;
        self.iteration_mdp(self.quotient.model_states(model));
        if !result.sat {
            return Ok(None);
        }
        Ok(Some(self.quotient.extract_policy(model, &result.scheduler)))
    }

    fn solve_game_abstraction(
        &mut self,
        family: &Family,
        property: &Property,
    ) -> Result<(Option<Policy>, GameSolution), SynthesisError> {
        let solution = self
            .game_solver
            .solve(family, property.maximizing(), property.minimizing())?;
        if let Some(stats) = &mut self.stats {
            stats.iteration_game();
        }
        debug!("game value of {} is {}", family, solution.value);
        if !property.satisfies_threshold(solution.value) {
            return Ok((None, solution));
        }
        let policy = self.verify_policy(family, property, &solution.policy)?;
        if policy.is_none() {
            warn!(
                "game abstraction holds but its policy fails for family of size {}",
                family.size()
            );
        }
        Ok((policy, solution))
    }

    fn solve_randomized_abstraction(
        &mut self,
        family: &Family,
        model: &Q::Model,
        property: &Property,
    ) -> Result<Option<Policy>, SynthesisError> {
        let (result, policy) = self.quotient.randomized_abstraction(model, property)?;
        self.iteration_mdp(self.quotient.model_states(model));
        debug!("randomized abstraction of {} has value {}", family, result.value);
        if !result.sat {
            return Ok(None);
        }
        let policy = self.verify_policy(family, property, &policy)?;
        if policy.is_none() {
            warn!(
                "randomized abstraction holds but its policy fails for family of size {}",
                family.size()
            );
        }
        Ok(policy)
    }

    /// Picks the hole to split `family` on.
    ///
    /// Holes on which the scheduler used several options are inconsistent.
    /// With one such hole it is chosen, with several the one with the highest
    /// inconsistency score (first on ties), and with none the first hole that
    /// still has several options.
    pub fn choose_splitter(
        &self,
        family: &Family,
        property: &Property,
        hole_selection: &HoleSelection,
        choices: &BitSet,
        state_values: &[f64],
    ) -> Result<usize, SynthesisError> {
        let inconsistent: BTreeMap<usize, Vec<usize>> = hole_selection
            .iter()
            .enumerate()
            .filter(|(_, options)| options.len() > 1)
            .map(|(hole, options)| (hole, options.clone()))
            .collect();

        let splitter = match inconsistent.len() {
            0 => (0..family.num_holes()).find(|&h| family.hole_size(h) > 1),
            1 => inconsistent.keys().next().copied(),
            _ => {
                let scores = self.quotient.inconsistency_scores(
                    family,
                    &inconsistent,
                    choices,
                    state_values,
                    property,
                )?;
                let mut best: Option<(usize, f64)> = None;
                for (&hole, &score) in &scores {
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((hole, score));
                    }
                }
                best.map(|(hole, _)| hole)
            }
        };
        let splitter = splitter.ok_or_else(|| {
            SynthesisError::InvalidFamily(format!("{} has no hole left to split", family))
        })?;
        assert!(family.hole_size(splitter) > 1, "Cannot split on hole {} of size 1", splitter);
        Ok(splitter)
    }

    /// Partitions the options of `splitter`.
    ///
    /// Each option the scheduler used gets its own group; the unused ones are
    /// kept together in one group that comes first, so that the depth-first
    /// search resolves the used options first. If at most one option was used,
    /// the options are split in two halves instead.
    pub fn split(
        &self,
        family: &Family,
        splitter: usize,
        hole_selection: &HoleSelection,
    ) -> (Vec<Vec<usize>>, Vec<Family>) {
        let options = family.hole_options(splitter);
        let used: Vec<usize> = hole_selection[splitter]
            .iter()
            .copied()
            .filter(|&o| family.hole_contains(splitter, o))
            .collect();

        let suboptions = if used.len() > 1 {
            let other: Vec<usize> = options.iter().copied().filter(|o| !used.contains(o)).collect();
            let mut suboptions = Vec::with_capacity(used.len() + 1);
            if !other.is_empty() {
                suboptions.push(other);
            }
            suboptions.extend(used.iter().map(|&o| vec![o]));
            suboptions
        } else {
            assert!(options.len() > 1);
            let half = options.len() / 2;
            vec![options[..half].to_vec(), options[half..].to_vec()]
        };

        let subfamilies = suboptions.iter().map(|s| family.restrict(splitter, s)).collect();
        (suboptions, subfamilies)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::family::Hole;
    use crate::game::StochasticGameSolver;
    use crate::property::Comparison;
    use crate::quotient::{MdpFamilyQuotient, QuotientBuilder};

    /// In s0, `a` is good for h=0 and bad for h=1, `b` the other way round;
    /// `c` is mediocre for everybody.
    fn quotient() -> MdpFamilyQuotient {
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        let sink = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 0.9), (sink, 0.1)]);
        b.add_choice(s0, "a", &[(0, 1)], vec![(goal, 0.1), (sink, 0.9)]);
        b.add_choice(s0, "b", &[(0, 0)], vec![(goal, 0.1), (sink, 0.9)]);
        b.add_choice(s0, "b", &[(0, 1)], vec![(goal, 0.9), (sink, 0.1)]);
        b.add_choice(s0, "c", &[], vec![(goal, 0.4), (sink, 0.6)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        b.add_choice(sink, "stay", &[], vec![(sink, 1.0)]);
        b.add_label("goal", goal);
        b.build().unwrap()
    }

    /// `a` depends a little on hole 0, `b` a lot on hole 1.
    fn two_holes() -> MdpFamilyQuotient {
        let mut b = QuotientBuilder::new(vec![Hole::new("mild", 2), Hole::new("strong", 2)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        let sink = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 0.6), (sink, 0.4)]);
        b.add_choice(s0, "a", &[(0, 1)], vec![(goal, 0.5), (sink, 0.5)]);
        b.add_choice(s0, "b", &[(1, 0)], vec![(goal, 0.9), (sink, 0.1)]);
        b.add_choice(s0, "b", &[(1, 1)], vec![(goal, 0.1), (sink, 0.9)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        b.add_choice(sink, "stay", &[], vec![(sink, 1.0)]);
        b.add_label("goal", goal);
        b.build().unwrap()
    }

    fn prop(threshold: f64) -> Property {
        Property::new("goal", Comparison::Ge, threshold).unwrap()
    }

    #[test]
    fn test_singleton_solved() {
        let q = quotient();
        let p = prop(0.8);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::singleton(&[1]);
        match synth.verify_family(&family, &p).unwrap() {
            FamilyOutcome::Solved { policy, source } => {
                assert_eq!(source, PolicySource::Singleton);
                assert_eq!(policy.get(0), Some(1));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_game_abstraction_solves_family() {
        let q = quotient();
        let p = prop(0.3);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(q.holes());
        match synth.verify_family(&family, &p).unwrap() {
            FamilyOutcome::Solved { policy, source } => {
                assert_eq!(source, PolicySource::GameAbstraction);
                assert_eq!(policy.get(0), Some(2));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_family_refuted() {
        let q = quotient();
        let p = prop(0.95);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(q.holes());
        assert_eq!(synth.verify_family(&family, &p).unwrap(), FamilyOutcome::Refuted);
    }

    #[test]
    fn test_family_undecided() {
        let q = quotient();
        let p = prop(0.8);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(q.holes());
        match synth.verify_family(&family, &p).unwrap() {
            FamilyOutcome::Undecided { splitter, .. } => assert_eq!(splitter, 0),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_choose_splitter() {
        let q = quotient();
        let p = prop(0.8);
        let synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(q.holes());
        let choices = BitSet::new(q.mdp().num_choices());
        let values = vec![0.0; 3];
        assert_eq!(synth.choose_splitter(&family, &p, &vec![vec![]], &choices, &values), Ok(0));
        assert_eq!(synth.choose_splitter(&family, &p, &vec![vec![0, 1]], &choices, &values), Ok(0));
    }

    #[test]
    fn test_choose_splitter_by_score() {
        let q = two_holes();
        let p = prop(0.8);
        let synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(q.holes());
        let choices = BitSet::full(q.mdp().num_choices());
        let selection = vec![vec![0, 1], vec![0, 1]];

        // Spread of `a` is 0.1, spread of `b` is 0.8.
        let values = vec![0.0, 1.0, 0.0];
        assert_eq!(synth.choose_splitter(&family, &p, &selection, &choices, &values), Ok(1));

        // Every choice is worth nothing: both scores tie and the first hole wins.
        let values = vec![0.0; 3];
        assert_eq!(synth.choose_splitter(&family, &p, &selection, &choices, &values), Ok(0));
    }

    #[test]
    fn test_split_groups_used_options() {
        let q = quotient();
        let p = prop(0.8);
        let synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(&[Hole::new("x", 4), Hole::new("y", 2)]);

        let (suboptions, subfamilies) = synth.split(&family, 0, &vec![vec![1, 3], vec![0]]);
        assert_eq!(suboptions, vec![vec![0, 2], vec![1], vec![3]]);
        assert_eq!(subfamilies[0].hole_options(0), &[0, 2]);
        assert_eq!(subfamilies[2].hole_options(1), &[0, 1]);

        let (suboptions, _) = synth.split(&family, 0, &vec![vec![2], vec![]]);
        assert_eq!(suboptions, vec![vec![0, 1], vec![2, 3]]);

        let (suboptions, _) = synth.split(&family, 0, &vec![vec![0, 1, 2, 3], vec![]]);
        assert_eq!(suboptions, vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_synthesize_splits_into_singletons() {
        let q = quotient();
        let p = prop(0.8);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let tree = synth.synthesize(&Family::from_holes(q.holes()), &p).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.splitter(), Some(0));
        assert_eq!(tree.leaves().len(), 2);
        for id in tree.leaves() {
            assert_eq!(tree.node(id).policy_source(), Some(PolicySource::Singleton));
        }
        let stats = synth.statistics().unwrap();
        assert_eq!(stats.families_explored, 2);
        assert_eq!(stats.iterations_game, 1);
        tree.double_check_members(&q, &p).unwrap();
    }

    #[test]
    fn test_randomized_strategy() {
        let q = quotient();
        let p = prop(0.3);
        let config = SynthesizerConfig {
            strategy: Strategy::RandomizedAbstraction,
            ..Default::default()
        };
        let solver = StochasticGameSolver::new(&q, &p).unwrap();
        let mut synth = SynthesizerPolicyTree::with_config(&q, solver, config);
        let tree = synth.synthesize(&Family::from_holes(q.holes()), &p).unwrap();
        // The mixture picks `a`, which fails for h=1, so the family is split.
        assert_eq!(synth.statistics().unwrap().iterations_game, 0);
        tree.double_check_members(&q, &p).unwrap();
        assert_eq!(tree.summary().members_satisfied, tree.summary().members_total);
    }

    #[test]
    fn test_randomized_strategy_solves_family() {
        // Both variants of `a` clear the threshold, so the mixture does too.
        let mut b = QuotientBuilder::new(vec![Hole::new("h", 2)]);
        let s0 = b.add_state();
        let goal = b.add_state();
        let sink = b.add_state();
        b.add_choice(s0, "a", &[(0, 0)], vec![(goal, 0.9), (sink, 0.1)]);
        b.add_choice(s0, "a", &[(0, 1)], vec![(goal, 0.8), (sink, 0.2)]);
        b.add_choice(s0, "b", &[], vec![(goal, 0.5), (sink, 0.5)]);
        b.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
        b.add_choice(sink, "stay", &[], vec![(sink, 1.0)]);
        b.add_label("goal", goal);
        let q = b.build().unwrap();
        let p = prop(0.7);

        let config = SynthesizerConfig {
            strategy: Strategy::RandomizedAbstraction,
            ..Default::default()
        };
        let solver = StochasticGameSolver::new(&q, &p).unwrap();
        let mut synth = SynthesizerPolicyTree::with_config(&q, solver, config);
        let tree = synth.synthesize(&Family::from_holes(q.holes()), &p).unwrap();

        assert_eq!(tree.num_nodes(), 1);
        let root = tree.node(tree.root());
        assert!(root.is_solved());
        assert_eq!(root.policy_source(), Some(PolicySource::RandomizedAbstraction));
        assert_eq!(root.policy().unwrap().get(0), Some(0));
        assert_eq!(synth.statistics().unwrap().iterations_game, 0);
        tree.double_check_members(&q, &p).unwrap();
    }

    #[test]
    fn test_invalid_family() {
        let q = quotient();
        let p = prop(0.8);
        let mut synth = SynthesizerPolicyTree::new(&q, StochasticGameSolver::new(&q, &p).unwrap());
        let family = Family::from_holes(&[Hole::new("h", 3)]);
        assert!(matches!(
            synth.synthesize(&family, &p),
            Err(SynthesisError::InvalidFamily(_))
        ));
    }
}
