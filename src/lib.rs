//! # policy-tree: meta-policies for families of MDPs
//!
//! **`policy-tree`** synthesizes policies for a whole *family* of Markov decision processes at once.
//! A family is described by a set of **holes** (finite-domain parameters); every assignment of the
//! holes yields one concrete MDP. The goal is to find, for every member, a policy that satisfies a
//! reachability property, or to prove that no such policy exists.
//!
//! ## What is a policy tree?
//!
//! Instead of solving each member separately, the design space is explored by abstraction refinement.
//! A subfamily is analysed as a whole: if one policy works for every member, the subfamily is solved;
//! if even the best case fails, every member is refuted. Otherwise the subfamily is split on one hole
//! and the parts are analysed recursively. The result is a decision tree over hole options whose
//! leaves carry a policy or a refutation: a compact **meta-policy** for the whole family.
//!
//! ## Key Features
//!
//! - **Quotient-Centric Architecture**: All model operations go through the [`Quotient`][crate::quotient::Quotient]
//!   trait, implemented by the explicit [`MdpFamilyQuotient`][crate::quotient::MdpFamilyQuotient].
//! - **Sound Abstractions**: Subfamilies are first attacked with a two-player [game abstraction][crate::game]
//!   (or a randomized one); the witness policies are always re-verified before being trusted.
//! - **Compact Results**: After the search, sibling leaves are merged and the tree is flattened.
//! - **Arbitrary Family Sizes**: Family sizes are [`BigUint`][num_bigint::BigUint]s.
//!
//! ## Basic Usage
//!
//! ```rust
//! use policy_tree::family::{Family, Hole};
//! use policy_tree::game::StochasticGameSolver;
//! use policy_tree::property::{Comparison, Property};
//! use policy_tree::quotient::{Quotient, QuotientBuilder};
//! use policy_tree::synthesizer::SynthesizerPolicyTree;
//!
//! // 1. Describe the family: one hole decides whether the bridge is safe
//! let mut builder = QuotientBuilder::new(vec![Hole::new("bridge", 2)]);
//! let start = builder.add_state();
//! let goal = builder.add_state();
//! let river = builder.add_state();
//! builder.add_choice(start, "cross", &[(0, 0)], vec![(goal, 1.0)]);
//! builder.add_choice(start, "cross", &[(0, 1)], vec![(river, 1.0)]);
//! builder.add_choice(start, "detour", &[], vec![(goal, 0.9), (river, 0.1)]);
//! builder.add_choice(goal, "stay", &[], vec![(goal, 1.0)]);
//! builder.add_choice(river, "stay", &[], vec![(river, 1.0)]);
//! builder.add_label("goal", goal);
//! let quotient = builder.build().unwrap();
//!
//! // 2. Reach the goal with probability at least 0.8
//! let property = Property::new("goal", Comparison::Ge, 0.8).unwrap();
//!
//! // 3. Synthesize
//! let solver = StochasticGameSolver::new(&quotient, &property).unwrap();
//! let mut synthesizer = SynthesizerPolicyTree::new(&quotient, solver);
//! let tree = synthesizer
//!     .synthesize(&Family::from_holes(quotient.holes()), &property)
//!     .unwrap();
//!
//! // The detour works for every member: no split needed
//! assert_eq!(tree.num_nodes(), 1);
//! assert!(tree.node(tree.root()).is_solved());
//! ```
//!
//! ## Core Components
//!
//! - **[`synthesizer`]**: The search driver. Contains [`SynthesizerPolicyTree`][crate::synthesizer::SynthesizerPolicyTree].
//! - **[`tree`]**: The policy tree, its postprocessing and its double-checks.
//! - **[`quotient`]** and **[`game`]**: The model layer the search talks to.
//! - **[`dot`]**: Utilities for visualizing policy trees using Graphviz.

pub mod bitset;
pub mod check;
pub mod dot;
pub mod error;
pub mod family;
pub mod game;
pub mod mdp;
pub mod policy;
pub mod property;
pub mod quotient;
pub mod stats;
pub mod synthesizer;
pub mod tree;
