//! Disjuncts, their member constraints, and disjunctions.

use super::VarId;

/// A constraint as seen by the initialization phase.
///
/// Only the polynomial degree of the body matters here; `None` marks a body
/// that is not a polynomial at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub degree: Option<u32>,
    pub active: bool,
}

impl Constraint {
    pub fn linear(name: impl Into<String>) -> Self {
        Self::with_degree(name, Some(1))
    }

    pub fn with_degree(name: impl Into<String>, degree: Option<u32>) -> Self {
        Self {
            name: name.into(),
            degree,
            active: true,
        }
    }

    /// Degree outside {0, 1}.
    pub fn is_nonlinear(&self) -> bool {
        !matches!(self.degree, Some(0 | 1))
    }
}

/// One branch of a disjunction, guarded by a binary indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunct {
    pub name: String,
    pub indicator: VarId,
    pub constraints: Vec<Constraint>,
    pub active: bool,
}

impl Disjunct {
    pub fn new(name: impl Into<String>, indicator: VarId) -> Self {
        Self {
            name: name.into(),
            indicator,
            constraints: Vec::new(),
            active: true,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// True when any active member constraint is nonlinear.
    pub fn is_nonlinear(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.active && c.is_nonlinear())
    }
}

/// A group of disjuncts, referenced by index into the model's disjunct list.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunction {
    pub name: String,
    pub disjuncts: Vec<usize>,
    /// Exactly one member must be selected; otherwise at least one.
    pub exactly_one: bool,
}
