//! Cuts accumulated on the master relaxation.

use super::{LinearExpr, VarId, Variable};

/// Excludes one assignment of binary variables.
///
/// Encodes `Σ_{on} (1 - x) + Σ_{off} x ≥ 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoGoodCut {
    pub assignment: Vec<(VarId, bool)>,
}

impl NoGoodCut {
    pub fn new(assignment: Vec<(VarId, bool)>) -> Self {
        Self { assignment }
    }

    /// Left-hand side of the cut at the current values; unset values count
    /// as zero.
    pub fn lhs(&self, variables: &[Variable]) -> f64 {
        self.assignment
            .iter()
            .map(|&(var, on)| {
                let value = variables
                    .get(var.index())
                    .and_then(|v| v.value)
                    .unwrap_or(0.0);
                if on {
                    1.0 - value
                } else {
                    value
                }
            })
            .sum()
    }

    pub fn is_satisfied_by(&self, variables: &[Variable], tolerance: f64) -> bool {
        self.lhs(variables) >= 1.0 - tolerance
    }
}

/// Kind of cut.
#[derive(Debug, Clone, PartialEq)]
pub enum CutKind {
    /// Outer approximation linearization `expr <= upper`.
    Linearization {
        name: String,
        expr: LinearExpr,
        upper: f64,
    },
    NoGood(NoGoodCut),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    pub kind: CutKind,
    pub active: bool,
}

impl Cut {
    pub fn linearization(name: impl Into<String>, expr: LinearExpr, upper: f64) -> Self {
        Self {
            kind: CutKind::Linearization {
                name: name.into(),
                expr,
                upper,
            },
            active: true,
        }
    }

    pub fn no_good(cut: NoGoodCut) -> Self {
        Self {
            kind: CutKind::NoGood(cut),
            active: true,
        }
    }

    pub fn is_linearization(&self) -> bool {
        matches!(self.kind, CutKind::Linearization { .. })
    }

    pub fn as_no_good(&self) -> Option<&NoGoodCut> {
        match &self.kind {
            CutKind::NoGood(cut) => Some(cut),
            CutKind::Linearization { .. } => None,
        }
    }
}
