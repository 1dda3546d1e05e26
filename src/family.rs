//! Holes and design spaces.
//!
//! A [`Hole`] is a named parameter with a finite domain of options `0..n`.
//! A [`Family`] (design space) restricts every hole to a non-empty subset of
//! its domain and thereby denotes the set of concrete members obtained by
//! picking one option per hole.
//!
//! Families are immutable snapshots: [`Family::restrict`] always produces a
//! new family, which keeps parent and child nodes of a policy tree independent.
//!
//! # Example
//!
//! ```
//! use policy_tree::family::{Family, Hole};
//!
//! let holes = vec![Hole::new("x", 3), Hole::new("y", 2)];
//! let family = Family::from_holes(&holes);
//! assert_eq!(family.size().to_string(), "6");
//!
//! let sub = family.restrict(0, &[1, 2]);
//! assert_eq!(sub.size().to_string(), "4");
//! assert_eq!(family.size().to_string(), "6"); // unchanged
//! ```

use std::fmt;

use num_bigint::BigUint;

/// A named finite-domain parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hole {
    name: String,
    option_labels: Vec<String>,
}

impl Hole {
    /// Creates a hole with options labelled `0..num_options`.
    pub fn new(name: impl Into<String>, num_options: usize) -> Self {
        assert!(num_options > 0, "Hole must have at least one option");
        Self {
            name: name.into(),
            option_labels: (0..num_options).map(|o| o.to_string()).collect(),
        }
    }

    /// Creates a hole with explicitly labelled options.
    pub fn with_labels(name: impl Into<String>, labels: Vec<String>) -> Self {
        assert!(!labels.is_empty(), "Hole must have at least one option");
        Self {
            name: name.into(),
            option_labels: labels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_options(&self) -> usize {
        self.option_labels.len()
    }

    pub fn option_label(&self, option: usize) -> &str {
        &self.option_labels[option]
    }
}

/// A design space: for each hole, the sorted set of options still allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Family {
    options: Vec<Vec<usize>>,
    size: BigUint,
}

impl Family {
    /// Creates a family from explicit per-hole option sets.
    ///
    /// # Panics
    ///
    /// Panics if some option set is empty.
    pub fn new(options: Vec<Vec<usize>>) -> Self {
        let options: Vec<Vec<usize>> = options
            .into_iter()
            .map(|mut opts| {
                opts.sort_unstable();
                opts.dedup();
                opts
            })
            .collect();
        assert!(
            options.iter().all(|opts| !opts.is_empty()),
            "Every hole must keep at least one option"
        );
        let size = Self::compute_size(&options);
        Self { options, size }
    }

    /// The full design space spanned by the given holes.
    pub fn from_holes(holes: &[Hole]) -> Self {
        Self::new(holes.iter().map(|h| (0..h.num_options()).collect()).collect())
    }

    fn compute_size(options: &[Vec<usize>]) -> BigUint {
        options
            .iter()
            .fold(BigUint::from(1u32), |acc, opts| acc * BigUint::from(opts.len()))
    }

    pub fn num_holes(&self) -> usize {
        self.options.len()
    }

    /// Options of the given hole that are still allowed.
    pub fn hole_options(&self, hole: usize) -> &[usize] {
        &self.options[hole]
    }

    /// Number of options still allowed for the given hole.
    pub fn hole_size(&self, hole: usize) -> usize {
        self.options[hole].len()
    }

    pub fn hole_contains(&self, hole: usize, option: usize) -> bool {
        self.options[hole].binary_search(&option).is_ok()
    }

    /// Number of concrete members.
    pub fn size(&self) -> &BigUint {
        &self.size
    }

    pub fn is_singleton(&self) -> bool {
        self.options.iter().all(|opts| opts.len() == 1)
    }

    /// Returns a new family where `hole` is restricted to `suboptions`.
    ///
    /// # Panics
    ///
    /// Panics if `suboptions` is empty or not a subset of the current options.
    pub fn restrict(&self, hole: usize, suboptions: &[usize]) -> Family {
        assert!(!suboptions.is_empty(), "Cannot restrict hole {} to no options", hole);
        assert!(
            suboptions.iter().all(|&o| self.hole_contains(hole, o)),
            "Options {:?} are not a subset of hole {} options {:?}",
            suboptions,
            hole,
            self.options[hole]
        );
        let mut options = self.options.clone();
        options[hole] = suboptions.to_vec();
        Family::new(options)
    }

    /// Returns a new family where `hole` is set to `options`, which may be
    /// larger than the current option set.
    ///
    /// This is the inverse of [`restrict`][Family::restrict] used when sibling
    /// subfamilies that differ only in `hole` are merged back together.
    pub fn with_hole_options(&self, hole: usize, options: &[usize]) -> Family {
        let mut all = self.options.clone();
        all[hole] = options.to_vec();
        Family::new(all)
    }

    /// Returns true if the concrete assignment is a member of this family.
    pub fn contains(&self, assignment: &[usize]) -> bool {
        assignment.len() == self.num_holes()
            && assignment
                .iter()
                .enumerate()
                .all(|(hole, &option)| self.hole_contains(hole, option))
    }

    /// Returns true if no concrete member belongs to both families.
    pub fn is_disjoint(&self, other: &Family) -> bool {
        self.options
            .iter()
            .zip(&other.options)
            .any(|(a, b)| a.iter().all(|o| b.binary_search(o).is_err()))
    }

    /// The singleton family of a concrete assignment.
    pub fn singleton(assignment: &[usize]) -> Family {
        Family::new(assignment.iter().map(|&o| vec![o]).collect())
    }

    /// Iterates over all concrete members as hole assignments.
    pub fn members(&self) -> Members<'_> {
        Members {
            family: self,
            next: Some(vec![0; self.num_holes()]),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (hole, opts) in self.options.iter().enumerate() {
            if hole > 0 {
                write!(f, ", ")?;
            }
            write!(f, "h{}={:?}", hole, opts)?;
        }
        write!(f, "]")
    }
}

/// Iterator over the concrete members of a family, in lexicographic order.
pub struct Members<'a> {
    family: &'a Family,
    /// Positions into the per-hole option lists.
    next: Option<Vec<usize>>,
}

impl Iterator for Members<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let positions = self.next.take()?;
        let member = positions
            .iter()
            .enumerate()
            .map(|(hole, &p)| self.family.options[hole][p])
            .collect();

        let mut succ = positions;
        for hole in (0..succ.len()).rev() {
            succ[hole] += 1;
            if succ[hole] < self.family.options[hole].len() {
                self.next = Some(succ);
                return Some(member);
            }
            succ[hole] = 0;
        }
        Some(member)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_size_and_singleton() {
        let family = Family::new(vec![vec![0, 1], vec![2], vec![0, 1, 2]]);
        assert_eq!(family.size(), &BigUint::from(6u32));
        assert!(!family.is_singleton());

        let single = Family::singleton(&[1, 2, 0]);
        assert_eq!(single.size(), &BigUint::from(1u32));
        assert!(single.is_singleton());
    }

    #[test]
    fn test_restrict_is_monotone() {
        let family = Family::from_holes(&[Hole::new("a", 4), Hole::new("b", 2)]);
        let sub = family.restrict(0, &[3, 1]);
        assert_eq!(sub.hole_options(0), &[1, 3]);
        assert_eq!(sub.hole_options(1), &[0, 1]);
        assert_eq!(family.hole_options(0), &[0, 1, 2, 3]);
        assert_eq!(sub.size(), &BigUint::from(4u32));
    }

    #[test]
    #[should_panic(expected = "Cannot restrict hole 0 to no options")]
    fn test_restrict_empty_panics() {
        let family = Family::from_holes(&[Hole::new("a", 2)]);
        family.restrict(0, &[]);
    }

    #[test]
    #[should_panic(expected = "are not a subset")]
    fn test_restrict_outside_panics() {
        let family = Family::from_holes(&[Hole::new("a", 2)]).restrict(0, &[0]);
        family.restrict(0, &[1]);
    }

    #[test]
    fn test_members() {
        let family = Family::new(vec![vec![0, 2], vec![1, 3]]);
        let members: Vec<_> = family.members().collect();
        assert_eq!(members, vec![vec![0, 1], vec![0, 3], vec![2, 1], vec![2, 3]]);
        assert!(members.iter().all(|m| family.contains(m)));
        assert!(!family.contains(&[1, 1]));
    }

    #[test]
    fn test_disjoint() {
        let family = Family::from_holes(&[Hole::new("a", 3), Hole::new("b", 2)]);
        let left = family.restrict(0, &[0]);
        let right = family.restrict(0, &[1, 2]);
        assert!(left.is_disjoint(&right));
        assert!(!family.is_disjoint(&left));
    }

    #[test]
    fn test_with_hole_options_merges_back() {
        let family = Family::from_holes(&[Hole::new("a", 3), Hole::new("b", 2)]);
        let left = family.restrict(0, &[0]);
        assert_eq!(left.with_hole_options(0, &[2, 1, 0]), family);
    }

    #[test]
    fn test_display() {
        let family = Family::new(vec![vec![1, 0], vec![2]]);
        assert_eq!(family.to_string(), "[h0=[0, 1], h1=[2]]");
    }
}
