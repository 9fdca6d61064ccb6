//! Scripted subproblem backend.
//!
//! The outcome of each solve is decided by a closure over the indices of the
//! disjuncts that are active and selected in the fixed subproblem. A feasible
//! outcome is written into the first variable of the active objective.

use std::fmt::{self, Debug};

use lboa_config::GdpoptConfig;
use lboa_core::{LboaError, NlpSolver, Result, SubproblemBlock};

type Outcome = Box<dyn FnMut(&[usize]) -> Option<f64> + Send>;

pub struct ScriptedNlpSolver {
    outcome: Outcome,
    failure: Option<String>,
    calls: Vec<Vec<usize>>,
}

impl ScriptedNlpSolver {
    /// Uses `outcome` to decide each solve; `None` means infeasible.
    pub fn new(outcome: impl FnMut(&[usize]) -> Option<f64> + Send + 'static) -> Self {
        Self {
            outcome: Box::new(outcome),
            failure: None,
            calls: Vec::new(),
        }
    }

    /// Every solve returns a backend error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::infeasible()
        }
    }

    /// Every subproblem is infeasible.
    pub fn infeasible() -> Self {
        Self::new(|_| None)
    }

    /// Selected disjunct indices of every solve, in call order.
    pub fn calls(&self) -> &[Vec<usize>] {
        &self.calls
    }
}

impl Default for ScriptedNlpSolver {
    /// Always feasible; the objective is the sum of `index + 1` over the
    /// selected disjuncts.
    fn default() -> Self {
        Self::new(|selected| Some(selected.iter().map(|&i| (i + 1) as f64).sum()))
    }
}

impl Debug for ScriptedNlpSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedNlpSolver")
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl NlpSolver for ScriptedNlpSolver {
    fn solve_subproblem(
        &mut self,
        subproblem: &mut SubproblemBlock,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        let model = subproblem.model();
        let mut selected = Vec::new();
        for (index, disjunct) in model.disjuncts().iter().enumerate() {
            let on = model
                .var(disjunct.indicator)?
                .value
                .is_some_and(|v| (v - 1.0).abs() <= config.integer_tolerance);
            if disjunct.active && on {
                selected.push(index);
            }
        }
        let result = (self.outcome)(&selected);
        self.calls.push(selected);
        if let Some(message) = &self.failure {
            return Err(LboaError::Backend(message.clone()));
        }

        let Some(objective_value) = result else {
            return Ok(false);
        };
        let objective = model.active_objective()?;
        let &(var, coef) = objective.expr.terms.first().ok_or_else(|| {
            LboaError::Backend(format!("objective '{}' has no terms", objective.name))
        })?;
        let value = (objective_value - objective.expr.constant) / coef;
        subproblem.model_mut().var_mut(var)?.value = Some(value);
        Ok(true)
    }
}
