//! Reachability-probability constraints.
//!
//! A [`Property`] reads `P ⋈ t [F target]`: the probability of eventually
//! reaching a state labelled `target` must compare to `t` via `⋈`.

use std::fmt;

use crate::error::SynthesisError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Comparison {
    Ge,
    Gt,
    Le,
    Lt,
}

impl Comparison {
    /// Lower bounds are best satisfied by maximizing.
    pub fn is_lower_bound(self) -> bool {
        matches!(self, Comparison::Ge | Comparison::Gt)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparison::Ge => ">=",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Lt => "<",
        };
        write!(f, "{}", s)
    }
}

/// Which way nondeterminism is resolved when checking a property.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Existential: resolve nondeterminism in favor of the property.
    Primary,
    /// Universal: resolve nondeterminism against the property.
    Alt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    target_label: String,
    comparison: Comparison,
    threshold: f64,
}

impl Property {
    pub fn new(
        target_label: impl Into<String>,
        comparison: Comparison,
        threshold: f64,
    ) -> Result<Self, SynthesisError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SynthesisError::InvalidThreshold(threshold));
        }
        Ok(Self {
            target_label: target_label.into(),
            comparison,
            threshold,
        })
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True if the primary direction maximizes the probability.
    pub fn maximizing(&self) -> bool {
        self.comparison.is_lower_bound()
    }

    pub fn minimizing(&self) -> bool {
        !self.maximizing()
    }

    /// Whether probabilities are maximized when checking in `direction`.
    pub fn maximizes_in(&self, direction: Direction) -> bool {
        match direction {
            Direction::Primary => self.maximizing(),
            Direction::Alt => self.minimizing(),
        }
    }

    pub fn satisfies_threshold(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::Ge => value >= self.threshold,
            Comparison::Gt => value > self.threshold,
            Comparison::Le => value <= self.threshold,
            Comparison::Lt => value < self.threshold,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}{} [F \"{}\"]",
            self.comparison, self.threshold, self.target_label
        )
    }
}
