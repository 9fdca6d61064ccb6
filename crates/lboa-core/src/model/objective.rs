//! Objectives.

use super::LinearExpr;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// A named objective. Exactly one objective is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub sense: ObjectiveSense,
    pub expr: LinearExpr,
    pub active: bool,
}

impl Objective {
    pub fn minimize(name: impl Into<String>, expr: LinearExpr) -> Self {
        Self {
            name: name.into(),
            sense: ObjectiveSense::Minimize,
            expr,
            active: true,
        }
    }

    pub fn maximize(name: impl Into<String>, expr: LinearExpr) -> Self {
        Self {
            name: name.into(),
            sense: ObjectiveSense::Maximize,
            expr,
            active: true,
        }
    }
}
