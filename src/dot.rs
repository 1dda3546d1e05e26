//! Policy tree to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Internal nodes** are labelled with the name of their splitter hole
//! - **Edges** are labelled with the option group of the splitter covered by the child
//! - **Solved leaves** show the index of their policy among the distinct policies
//!   of the tree and how it was obtained
//! - **Refuted leaves** are rendered with a separate shape at the bottom (sink rank)
//!
//! # Examples
//!
//! ```
//! use policy_tree::family::{Family, Hole};
//! use policy_tree::tree::{PolicyTree, Verdict};
//!
//! let holes = vec![Hole::new("door", 2)];
//! let mut tree = PolicyTree::new(Family::from_holes(&holes));
//! tree.resolve(tree.root(), Verdict::Refuted, None);
//!
//! let dot = tree.to_dot(&holes).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.contains("refuted"));
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::family::Hole;
use crate::policy::Policy;
use crate::tree::{PolicyTree, Verdict};

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for internal nodes (default: "ellipse")
    pub internal_shape: &'static str,
    /// Shape for solved leaves (default: "box")
    pub solved_shape: &'static str,
    /// Shape for refuted leaves (default: "octagon")
    pub refuted_shape: &'static str,
    /// Shape for undecided leaves (default: "diamond")
    pub undecided_shape: &'static str,
    /// Style for edges (default: "solid")
    pub edge_style: &'static str,
    /// Whether to show the number of members covered by each node (default: true)
    pub show_family_size: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            internal_shape: "ellipse",
            solved_shape: "box",
            refuted_shape: "octagon",
            undecided_shape: "diamond",
            edge_style: "solid",
            show_family_size: true,
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl PolicyTree {
    /// Converts the tree to DOT format. `holes` provides the names of the holes
    /// and their options.
    pub fn to_dot(&self, holes: &[Hole]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(holes, &DotConfig::default())
    }

    /// Converts the tree to DOT format with custom configuration.
    ///
    /// ```
    /// use policy_tree::dot::DotConfig;
    /// use policy_tree::family::{Family, Hole};
    /// use policy_tree::tree::PolicyTree;
    ///
    /// let holes = vec![Hole::new("door", 2)];
    /// let tree = PolicyTree::new(Family::from_holes(&holes));
    /// let config = DotConfig {
    ///     show_family_size: false,
    ///     ..DotConfig::default()
    /// };
    /// let dot = tree.to_dot_with_config(&holes, &config).unwrap();
    /// assert!(dot.starts_with("digraph {"));
    /// ```
    pub fn to_dot_with_config(&self, holes: &[Hole], config: &DotConfig) -> Result<String, std::fmt::Error> {
        let all = self.collect_all();

        // Number the distinct policies in order of appearance.
        let mut policies: HashMap<&Policy, usize> = HashMap::new();
        for &id in &all {
            if let Some(policy) = self.node(id).policy() {
                let next = policies.len();
                policies.entry(policy).or_insert(next);
            }
        }

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.internal_shape)?;

        let mut refuted = Vec::new();
        for &id in &all {
            let node = self.node(id);
            let mut label = match (node.verdict(), node.splitter()) {
                (_, Some(splitter)) => escape(holes[splitter].name()),
                (Verdict::Solved(policy), None) => match node.policy_source() {
                    Some(source) => format!("policy {} ({})", policies[policy], source),
                    None => format!("policy {}", policies[policy]),
                },
                (Verdict::Refuted, None) => "refuted".to_string(),
                (Verdict::Undecided, None) => "undecided".to_string(),
            };
            if config.show_family_size {
                write!(label, "\\n{} members", node.family().size())?;
            }
            let shape = match node.verdict() {
                _ if !node.is_leaf() => config.internal_shape,
                Verdict::Solved(_) => config.solved_shape,
                Verdict::Refuted => config.refuted_shape,
                Verdict::Undecided => config.undecided_shape,
            };
            if node.is_leaf() && node.is_refuted() {
                refuted.push((id, label, shape));
            } else {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", id.index(), shape, label)?;
            }
        }

        // Refuted leaves at the bottom
        if !refuted.is_empty() {
            writeln!(dot, "{{ rank=sink")?;
            for (id, label, shape) in refuted {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", id.index(), shape, label)?;
            }
            writeln!(dot, "}}")?;
        }

        for &id in &all {
            let node = self.node(id);
            let Some(splitter) = node.splitter() else {
                continue;
            };
            for (child, options) in node.children().iter().zip(node.suboptions()) {
                let labels: Vec<String> = options
                    .iter()
                    .map(|&o| escape(holes[splitter].option_label(o)))
                    .collect();
                writeln!(
                    dot,
                    "{} -> {} [style={}, label=\"{}\"];",
                    id.index(),
                    child.index(),
                    config.edge_style,
                    labels.join(",")
                )?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::family::Family;
    use crate::tree::PolicySource;

    fn tree() -> (Vec<Hole>, PolicyTree) {
        let holes = vec![Hole::with_labels(
            "door",
            vec!["left".to_string(), "right".to_string(), "none".to_string()],
        )];
        let family = Family::from_holes(&holes);
        let mut tree = PolicyTree::new(family.clone());
        let root = tree.root();
        let suboptions = vec![vec![0, 1], vec![2]];
        let subfamilies = suboptions.iter().map(|s| family.restrict(0, s)).collect();
        let children = tree.split(root, 0, suboptions, subfamilies);
        let policy = Policy::from_actions(vec![Some(1), None]);
        tree.resolve(children[0], Verdict::Solved(policy), Some(PolicySource::GameAbstraction));
        tree.resolve(children[1], Verdict::Refuted, None);
        (holes, tree)
    }

    #[test]
    fn test_to_dot_basic() {
        let (holes, tree) = tree();
        let dot = tree.to_dot(&holes).unwrap();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("0 [shape=ellipse, label=\"door\\n3 members\"];"));
        assert!(dot.contains("policy 0 (game abstraction)"));
        assert!(dot.contains("0 -> 1 [style=solid, label=\"left,right\"];"));
        assert!(dot.contains("0 -> 2 [style=solid, label=\"none\"];"));
        assert!(dot.contains("{ rank=sink"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let (holes, tree) = tree();
        let config = DotConfig {
            show_family_size: false,
            refuted_shape: "doubleoctagon",
            ..DotConfig::default()
        };
        let dot = tree.to_dot_with_config(&holes, &config).unwrap();
        assert!(dot.contains("2 [shape=doubleoctagon, label=\"refuted\"];"));
        assert!(!dot.contains("members"));
    }

    /// Helper test to write DOT file for manual inspection (disabled by default)
    #[test]
    #[ignore]
    fn test_write_dot_file() {
        let (holes, tree) = tree();
        let dot = tree.to_dot(&holes).unwrap();
        std::fs::write("test_output.dot", &dot).unwrap();
        println!("DOT output:\n{}", dot);
    }
}
