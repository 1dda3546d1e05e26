//! The policy tree: the search tree and, once complete, the meta-policy.
//!
//! Nodes live in an arena owned by [`PolicyTree`] and refer to each other by
//! [`NodeId`]. Each node owns a [`Family`]; an internal node records the hole
//! it was split on (the *splitter*) and, per child, the group of options that
//! child covers. Leaves carry a [`Verdict`]: a policy that works for every
//! member of the leaf's family, a refutation, or nothing yet.
//!
//! At every point the families of the leaves partition the family of the root.
//!
//! # Postprocessing
//!
//! Search trees are usually much larger than necessary. [`PolicyTree::postprocess`]
//! runs three bottom-up passes over sibling groups:
//!
//! 1. refuted siblings are merged into one refuted node;
//! 2. solved siblings whose policies can be extended to cover each other are
//!    merged (every merge is re-verified on the model);
//! 3. solved siblings with equal policies are merged.
//!
//! A node left with a single child takes over that child's verdict, so the
//! tree also gets shallower.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use log::{debug, info};
use num_bigint::BigUint;

use crate::error::SynthesisError;
use crate::family::Family;
use crate::policy::{merge_policies, Policy};
use crate::property::{Direction, Property};
use crate::quotient::Quotient;

/// Handle of a node in a [`PolicyTree`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What is known about the members of a node's family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not resolved (yet).
    Undecided,
    /// No member satisfies the property.
    Refuted,
    /// The policy satisfies the property for every member.
    Solved(Policy),
}

/// How the policy of a solved node was obtained.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PolicySource {
    Singleton,
    GameAbstraction,
    RandomizedAbstraction,
    Merge,
}

impl fmt::Display for PolicySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicySource::Singleton => "singleton",
            PolicySource::GameAbstraction => "game abstraction",
            PolicySource::RandomizedAbstraction => "randomized abstraction",
            PolicySource::Merge => "merge",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct PolicyTreeNode {
    family: Family,
    verdict: Verdict,
    policy_source: Option<PolicySource>,
    parent: Option<NodeId>,
    splitter: Option<usize>,
    suboptions: Vec<Vec<usize>>,
    children: Vec<NodeId>,
}

impl PolicyTreeNode {
    fn new(family: Family, parent: Option<NodeId>) -> Self {
        Self {
            family,
            verdict: Verdict::Undecided,
            policy_source: None,
            parent,
            splitter: None,
            suboptions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn policy(&self) -> Option<&Policy> {
        match &self.verdict {
            Verdict::Solved(policy) => Some(policy),
            _ => None,
        }
    }

    pub fn policy_source(&self) -> Option<PolicySource> {
        self.policy_source
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn splitter(&self) -> Option<usize> {
        self.splitter
    }

    /// Option groups of the splitter hole, one per child.
    pub fn suboptions(&self) -> &[Vec<usize>] {
        &self.suboptions
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.verdict, Verdict::Solved(_))
    }

    pub fn is_refuted(&self) -> bool {
        matches!(self.verdict, Verdict::Refuted)
    }
}

/// Number of sibling merges performed by each postprocessing pass.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct MergeStats {
    pub unsat: usize,
    pub compatible: usize,
    pub solved: usize,
    /// Nodes that absorbed their only remaining child.
    pub collapsed: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.unsat + self.compatible + self.solved
    }
}

#[derive(Debug, Clone)]
pub struct PolicyTree {
    nodes: Vec<PolicyTreeNode>,
    root: NodeId,
}

impl PolicyTree {
    /// A tree with a single undecided node covering `family`.
    pub fn new(family: Family) -> Self {
        Self {
            nodes: vec![PolicyTreeNode::new(family, None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &PolicyTreeNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut PolicyTreeNode {
        &mut self.nodes[id.0]
    }

    /// Records the verdict of a leaf.
    pub fn resolve(&mut self, id: NodeId, verdict: Verdict, source: Option<PolicySource>) {
        let node = self.node_mut(id);
        assert!(node.is_leaf(), "Only leaves can be resolved");
        node.verdict = verdict;
        node.policy_source = source;
    }

    /// Splits a leaf on `splitter`: one child per option group, with the
    /// corresponding subfamily. Returns the new children.
    pub fn split(
        &mut self,
        id: NodeId,
        splitter: usize,
        suboptions: Vec<Vec<usize>>,
        subfamilies: Vec<Family>,
    ) -> Vec<NodeId> {
        assert!(self.node(id).is_leaf(), "Node {} is already split", id);
        assert_eq!(suboptions.len(), subfamilies.len());
        let children: Vec<NodeId> = subfamilies
            .into_iter()
            .map(|family| {
                self.nodes.push(PolicyTreeNode::new(family, Some(id)));
                NodeId(self.nodes.len() - 1)
            })
            .collect();
        let node = self.node_mut(id);
        node.splitter = Some(splitter);
        node.suboptions = suboptions;
        node.children = children.clone();
        children
    }

    /// All nodes reachable from the root, in breadth-first order.
    pub fn collect_all(&self) -> Vec<NodeId> {
        let mut queue = VecDeque::from([self.root]);
        let mut all = Vec::new();
        while let Some(id) = queue.pop_front() {
            all.push(id);
            queue.extend(self.node(id).children.iter().copied());
        }
        all
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.collect_all()
            .into_iter()
            .filter(|&id| self.node(id).is_leaf())
            .collect()
    }

    /// Topmost solved nodes.
    pub fn collect_solved(&self) -> Vec<NodeId> {
        let mut queue = VecDeque::from([self.root]);
        let mut solved = Vec::new();
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            if node.is_solved() {
                solved.push(id);
            } else {
                queue.extend(node.children.iter().copied());
            }
        }
        solved
    }

    pub fn num_nodes(&self) -> usize {
        self.collect_all().len()
    }

    /// Re-checks every leaf on its whole family: solved leaves universally
    /// under their policy, refuted leaves existentially.
    pub fn double_check<Q: Quotient>(
        &self,
        quotient: &Q,
        property: &Property,
    ) -> Result<(), SynthesisError> {
        let leaves = self.leaves();
        info!("double-checking {} families...", leaves.len());
        for id in leaves {
            let node = self.node(id);
            check_leaf(quotient, property, &node.family, &node.verdict)?;
        }
        info!("all solutions are OK");
        Ok(())
    }

    /// Re-checks every concrete member of every leaf on its own.
    ///
    /// Unlike [`double_check`][PolicyTree::double_check] this also holds after
    /// postprocessing, but it enumerates the whole design space.
    pub fn double_check_members<Q: Quotient>(
        &self,
        quotient: &Q,
        property: &Property,
    ) -> Result<(), SynthesisError> {
        for id in self.leaves() {
            let node = self.node(id);
            for member in node.family.members() {
                check_leaf(quotient, property, &Family::singleton(&member), &node.verdict)?;
            }
        }
        Ok(())
    }

    /// Runs the three merge passes bottom-up over the whole tree.
    pub fn postprocess<Q: Quotient>(
        &mut self,
        quotient: &Q,
        property: &Property,
    ) -> Result<MergeStats, SynthesisError> {
        let mut stats = MergeStats::default();
        info!("post-processing the policy tree...");

        info!("merging unsat siblings...");
        for id in self.collect_all().into_iter().rev() {
            stats.unsat += self.merge_children_unsat(id, &mut stats.collapsed);
        }
        info!("merged {} pairs", stats.unsat);

        info!("merging compatible siblings...");
        for id in self.collect_all().into_iter().rev() {
            stats.compatible +=
                self.merge_children_compatible(id, quotient, property, &mut stats.collapsed)?;
        }
        info!("merged {} pairs", stats.compatible);

        info!("merging solved siblings...");
        for id in self.collect_all().into_iter().rev() {
            stats.solved += self.merge_children_solved(id, &mut stats.collapsed);
        }
        info!("merged {} pairs", stats.solved);

        Ok(stats)
    }

    fn merge_children_unsat(&mut self, id: NodeId, collapsed: &mut usize) -> usize {
        let node = self.node(id);
        let indices: Vec<usize> = (0..node.children.len())
            .filter(|&i| self.node(node.children[i]).is_refuted())
            .collect();
        self.merge_children_indices(id, &indices, collapsed)
    }

    fn merge_children_solved(&mut self, id: NodeId, collapsed: &mut usize) -> usize {
        let mut merged = 0;
        let mut i = 0;
        while i < self.node(id).children.len() {
            let children = &self.node(id).children;
            let Some(policy) = self.node(children[i]).policy() else {
                i += 1;
                continue;
            };
            let indices: Vec<usize> = (i..children.len())
                .filter(|&j| self.node(children[j]).policy() == Some(policy))
                .collect();
            let n = indices.len();
            for &j in indices[1..].iter().rev() {
                self.join_children(id, i, j);
            }
            merged += n - 1;
            i += 1;
        }
        if self.collapse_single_child(id) {
            *collapsed += 1;
        }
        merged
    }

    fn merge_children_compatible<Q: Quotient>(
        &mut self,
        id: NodeId,
        quotient: &Q,
        property: &Property,
        collapsed: &mut usize,
    ) -> Result<usize, SynthesisError> {
        let mut merged = 0;
        let mut i = 0;
        while i < self.node(id).children.len() {
            if !self.node(self.node(id).children[i]).is_solved() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < self.node(id).children.len() {
                let child1 = self.node(self.node(id).children[i]);
                let child2 = self.node(self.node(id).children[j]);
                if !child2.is_solved() {
                    j += 1;
                    continue;
                }
                match test_nodes(quotient, property, child1, child2)? {
                    Some(policy) => {
                        let target = self.node(id).children[i];
                        self.resolve(target, Verdict::Solved(policy), Some(PolicySource::Merge));
                        self.join_children(id, i, j);
                        merged += 1;
                        // The group changed: earlier rejections may no longer hold.
                        j = i + 1;
                    }
                    None => j += 1,
                }
            }
            i += 1;
        }
        if self.collapse_single_child(id) {
            *collapsed += 1;
        }
        Ok(merged)
    }

    /// Merges the children at `indices` into the first of them.
    fn merge_children_indices(&mut self, id: NodeId, indices: &[usize], collapsed: &mut usize) -> usize {
        if indices.len() < 2 {
            return 0;
        }
        let target = indices[0];
        for &j in indices[1..].iter().rev() {
            self.join_children(id, target, j);
        }
        if self.collapse_single_child(id) {
            *collapsed += 1;
        }
        indices.len() - 1
    }

    /// Moves the options of child `j` into child `target` and drops child `j`.
    fn join_children(&mut self, id: NodeId, target: usize, j: usize) {
        assert!(target < j);
        let node = self.node_mut(id);
        let splitter = node.splitter.expect("internal node has a splitter");
        let removed = node.suboptions.remove(j);
        let dropped = node.children.remove(j);
        node.suboptions[target].extend(removed);
        node.suboptions[target].sort_unstable();
        let options = node.suboptions[target].clone();
        let target_id = node.children[target];

        let family = self.node(target_id).family.with_hole_options(splitter, &options);
        debug!("merged {} into {}: {}", dropped, target_id, family);
        self.node_mut(target_id).family = family;
        self.node_mut(dropped).parent = None;
    }

    /// If `id` has exactly one child, takes the child's place.
    fn collapse_single_child(&mut self, id: NodeId) -> bool {
        if self.node(id).children.len() != 1 {
            return false;
        }
        let child_id = self.node(id).children[0];
        let child = self.node(child_id).clone();
        for &grandchild in &child.children {
            self.node_mut(grandchild).parent = Some(id);
        }
        let node = self.node_mut(id);
        node.verdict = child.verdict;
        node.policy_source = child.policy_source;
        node.splitter = child.splitter;
        node.suboptions = child.suboptions;
        node.children = child.children;
        self.node_mut(child_id).parent = None;
        true
    }

    /// Number of solved leaves per policy source.
    pub fn policy_sources(&self) -> BTreeMap<PolicySource, usize> {
        let mut sources = BTreeMap::new();
        for id in self.leaves() {
            if let Some(source) = self.node(id).policy_source.filter(|_| self.node(id).is_solved()) {
                *sources.entry(source).or_insert(0) += 1;
            }
        }
        sources
    }

    /// For internal nodes: how many have `(solved, undecided, refuted)` children.
    pub fn children_diversity(&self) -> BTreeMap<(usize, usize, usize), usize> {
        let mut stats = BTreeMap::new();
        for id in self.collect_all() {
            let node = self.node(id);
            if node.is_leaf() {
                continue;
            }
            let children = node.children.iter().map(|&c| self.node(c));
            let key = children.fold((0, 0, 0), |(s, u, r), child| match child.verdict {
                Verdict::Solved(_) => (s + 1, u, r),
                Verdict::Undecided => (s, u + 1, r),
                Verdict::Refuted => (s, u, r + 1),
            });
            *stats.entry(key).or_insert(0) += 1;
        }
        stats
    }

    pub fn summary(&self) -> TreeSummary {
        let leaves = self.leaves();
        let mut summary = TreeSummary {
            members_total: self.node(self.root).family.size().clone(),
            members_satisfied: BigUint::ZERO,
            num_nodes: self.num_nodes(),
            num_leaves: leaves.len(),
            solvable_leaves: 0,
            singleton_leaves: 0,
            distinct_policies: 0,
            policy_sources: self.policy_sources(),
        };
        let mut policies = HashSet::new();
        for id in leaves {
            let node = self.node(id);
            if node.family.is_singleton() {
                summary.singleton_leaves += 1;
            }
            if let Some(policy) = node.policy() {
                summary.solvable_leaves += 1;
                summary.members_satisfied += node.family.size();
                policies.insert(policy);
            }
        }
        summary.distinct_policies = policies.len();
        summary
    }
}

fn check_leaf<Q: Quotient>(
    quotient: &Q,
    property: &Property,
    family: &Family,
    verdict: &Verdict,
) -> Result<(), SynthesisError> {
    let failure = |reason: &str| SynthesisError::UnsoundLeaf {
        family: family.to_string(),
        reason: reason.to_string(),
    };
    match verdict {
        Verdict::Undecided => Err(failure("leaf is undecided")),
        Verdict::Refuted => {
            let model = quotient.build(family);
            let result = quotient.model_check(&model, property, Direction::Primary)?;
            if result.sat {
                return Err(failure("refuted family satisfies the property"));
            }
            Ok(())
        }
        Verdict::Solved(policy) => {
            let (_, model) = quotient.apply_policy(family, policy);
            let result = quotient.model_check(&model, property, Direction::Alt)?;
            if !result.sat {
                return Err(failure("policy violates the property"));
            }
            Ok(())
        }
    }
}

/// Tries to cover the families of two solved nodes with one policy.
///
/// Each policy, with its don't-care entries filled from the other, is verified
/// on the other node's family. Stored policies are defined on every state their
/// family can reach, so the filled policy still works on its own family.
fn test_nodes<Q: Quotient>(
    quotient: &Q,
    property: &Property,
    node1: &PolicyTreeNode,
    node2: &PolicyTreeNode,
) -> Result<Option<Policy>, SynthesisError> {
    let (Some(policy1), Some(policy2)) = (node1.policy(), node2.policy()) else {
        return Ok(None);
    };
    let (policy12, policy21) = merge_policies(policy1, policy2);

    let (fixed, model) = quotient.apply_policy(&node2.family, &policy12);
    if quotient.model_check(&model, property, Direction::Alt)?.sat {
        return Ok(Some(policy12.filled_from(&fixed)));
    }

    let (fixed, model) = quotient.apply_policy(&node1.family, &policy21);
    if quotient.model_check(&model, property, Direction::Alt)?.sat {
        return Ok(Some(policy21.filled_from(&fixed)));
    }

    Ok(None)
}

/// Size statistics of a policy tree.
#[derive(Debug, Clone)]
pub struct TreeSummary {
    pub members_total: BigUint,
    pub members_satisfied: BigUint,
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub solvable_leaves: usize,
    pub singleton_leaves: usize,
    pub distinct_policies: usize,
    pub policy_sources: BTreeMap<PolicySource, usize>,
}

impl TreeSummary {
    pub fn unsolvable_leaves(&self) -> usize {
        self.num_leaves - self.solvable_leaves
    }

    pub fn members_unsatisfied(&self) -> BigUint {
        &self.members_total - &self.members_satisfied
    }
}

/// Mean of `total` over `count` leaves, rounded to one decimal place.
fn average(total: &BigUint, count: usize) -> String {
    if count == 0 {
        return "NA".to_string();
    }
    let count = BigUint::from(count);
    // Tenths, rounded half up.
    let tenths = (total * 20u32 + &count) / (&count * 2u32);
    let ten = BigUint::from(10u32);
    format!("{}.{}", &tenths / &ten, &tenths % &ten)
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percentage = if self.members_total == BigUint::ZERO {
            BigUint::ZERO
        } else {
            &self.members_satisfied * 100u32 / &self.members_total
        };
        writeln!(f, "--------------------")?;
        writeln!(f, "Policy tree summary:")?;
        writeln!(
            f,
            "found {} satisfying policies ({} distinct) for {}/{} family members ({}%)",
            self.solvable_leaves,
            self.distinct_policies,
            self.members_satisfied,
            self.members_total,
            percentage
        )?;
        writeln!(
            f,
            "policy tree has {} nodes, {} of them are leaves:",
            self.num_nodes, self.num_leaves
        )?;
        writeln!(
            f,
            "\t  solvable leaves: {} (avg.size: {})",
            self.solvable_leaves,
            average(&self.members_satisfied, self.solvable_leaves)
        )?;
        writeln!(
            f,
            "\tunsolvable leaves: {} (avg.size: {})",
            self.unsolvable_leaves(),
            average(&self.members_unsatisfied(), self.unsolvable_leaves())
        )?;
        writeln!(f, "\t singleton leaves: {}", self.singleton_leaves)?;
        writeln!(f)?;
        writeln!(f, "X  -  number of leaves solved with policy of type X")?;
        for (source, count) in &self.policy_sources {
            writeln!(f, "{}  -  {}", source, count)?;
        }
        write!(f, "--------------------")
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::family::Hole;

    fn family() -> Family {
        Family::from_holes(&[Hole::new("a", 3), Hole::new("b", 2)])
    }

    fn split_on_first(tree: &mut PolicyTree, id: NodeId) -> Vec<NodeId> {
        let family = tree.node(id).family().clone();
        let suboptions: Vec<Vec<usize>> = family.hole_options(0).iter().map(|&o| vec![o]).collect();
        let subfamilies = suboptions.iter().map(|s| family.restrict(0, s)).collect();
        tree.split(id, 0, suboptions, subfamilies)
    }

    fn leaf_sizes(tree: &PolicyTree) -> BigUint {
        tree.leaves()
            .into_iter()
            .map(|id| tree.node(id).family().size().clone())
            .sum()
    }

    #[test]
    fn test_split_links_nodes() {
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        let children = split_on_first(&mut tree, root);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.node(root).splitter(), Some(0));
        assert_eq!(tree.node(root).suboptions(), &[vec![0], vec![1], vec![2]]);
        for &c in &children {
            assert_eq!(tree.node(c).parent(), Some(root));
            assert!(tree.node(c).is_leaf());
        }
        assert_eq!(tree.leaves(), children);
        assert_eq!(leaf_sizes(&tree), *tree.node(root).family().size());
    }

    #[test]
    #[should_panic(expected = "already split")]
    fn test_split_twice_panics() {
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        split_on_first(&mut tree, root);
        split_on_first(&mut tree, root);
    }

    #[test]
    fn test_merge_unsat_collapses_to_refuted_root() {
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        for c in split_on_first(&mut tree, root) {
            tree.resolve(c, Verdict::Refuted, None);
        }
        let mut collapsed = 0;
        assert_eq!(tree.merge_children_unsat(root, &mut collapsed), 2);
        assert_eq!(collapsed, 1);
        assert!(tree.node(root).is_leaf());
        assert!(tree.node(root).is_refuted());
        assert_eq!(tree.num_nodes(), 1);
    }

    #[test]
    fn test_merge_solved_groups_equal_policies() {
        let p = Policy::from_actions(vec![Some(0)]);
        let q = Policy::from_actions(vec![Some(1)]);
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        let children = split_on_first(&mut tree, root);
        tree.resolve(children[0], Verdict::Solved(p.clone()), Some(PolicySource::Singleton));
        tree.resolve(children[1], Verdict::Solved(q.clone()), Some(PolicySource::Singleton));
        tree.resolve(children[2], Verdict::Solved(p.clone()), Some(PolicySource::Singleton));

        let mut collapsed = 0;
        assert_eq!(tree.merge_children_solved(root, &mut collapsed), 1);
        assert_eq!(collapsed, 0);
        let node = tree.node(root);
        assert_eq!(node.suboptions(), &[vec![0, 2], vec![1]]);
        let merged = tree.node(node.children()[0]);
        assert_eq!(merged.family().hole_options(0), &[0, 2]);
        assert_eq!(merged.policy(), Some(&p));
        assert_eq!(leaf_sizes(&tree), *tree.node(root).family().size());
    }

    #[test]
    fn test_collapse_adopts_internal_child() {
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        let children = split_on_first(&mut tree, root);
        tree.resolve(children[0], Verdict::Refuted, None);
        tree.resolve(children[1], Verdict::Refuted, None);
        let mut collapsed = 0;
        tree.merge_children_unsat(root, &mut collapsed);
        assert_eq!(tree.node(root).children().len(), 2);

        // Pretend the refuted group was merged away, leaving only the internal child.
        let grand = {
            let node = tree.node(children[2]).family().clone();
            let subs = vec![vec![0], vec![1]];
            let fams = subs.iter().map(|s| node.restrict(1, s)).collect();
            tree.split(children[2], 1, subs, fams)
        };
        tree.node_mut(root).children.remove(0);
        tree.node_mut(root).suboptions.remove(0);
        assert!(tree.collapse_single_child(root));
        assert_eq!(tree.node(root).splitter(), Some(1));
        assert_eq!(tree.node(root).children(), grand.as_slice());
        assert_eq!(tree.node(grand[0]).parent(), Some(root));
    }

    #[test]
    fn test_summary_and_sources() {
        let mut tree = PolicyTree::new(family());
        let root = tree.root();
        let children = split_on_first(&mut tree, root);
        let p = Policy::from_actions(vec![Some(0)]);
        tree.resolve(children[0], Verdict::Solved(p.clone()), Some(PolicySource::GameAbstraction));
        tree.resolve(children[1], Verdict::Solved(p), Some(PolicySource::Singleton));
        tree.resolve(children[2], Verdict::Refuted, None);

        let summary = tree.summary();
        assert_eq!(summary.members_total, BigUint::from(6u32));
        assert_eq!(summary.members_satisfied, BigUint::from(4u32));
        assert_eq!(summary.num_nodes, 4);
        assert_eq!(summary.solvable_leaves, 2);
        assert_eq!(summary.unsolvable_leaves(), 1);
        assert_eq!(summary.distinct_policies, 1);
        assert_eq!(summary.singleton_leaves, 0);
        assert_eq!(summary.policy_sources[&PolicySource::GameAbstraction], 1);
        let text = summary.to_string();
        assert!(text.contains("for 4/6 family members (66%)"));
        assert!(text.contains("solvable leaves: 2 (avg.size: 2.0)"));

        assert_eq!(tree.children_diversity()[&(2, 0, 1)], 1);
        assert_eq!(tree.collect_solved(), vec![children[0], children[1]]);
    }

    #[test]
    fn test_average_leaf_size() {
        let total = BigUint::from(5u32);
        assert_eq!(average(&total, 3), "1.7");
        assert_eq!(average(&BigUint::from(10u32), 3), "3.3");
        assert_eq!(average(&BigUint::from(6u32), 4), "1.5");
        assert_eq!(average(&total, 1), "5.0");
        assert_eq!(average(&BigUint::ZERO, 0), "NA");
    }
}
