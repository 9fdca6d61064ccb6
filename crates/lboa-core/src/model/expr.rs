//! Linear expressions.

use super::{VarId, Variable};

/// `constant + Σ coefficient · variable`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub constant: f64,
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            constant: 0.0,
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Weighted sum `Σ w · v`.
    pub fn weighted(terms: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        Self {
            constant: 0.0,
            terms: terms.into_iter().collect(),
        }
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates at the current variable values.
    ///
    /// Returns `None` when a referenced variable is missing or has no value.
    pub fn evaluate(&self, variables: &[Variable]) -> Option<f64> {
        self.terms.iter().try_fold(self.constant, |acc, (var, coef)| {
            let value = variables.get(var.index())?.value?;
            Some(acc + coef * value)
        })
    }
}
