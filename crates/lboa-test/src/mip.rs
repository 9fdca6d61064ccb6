//! Exhaustive MIP backend.
//!
//! Enumerates every assignment of the binary variables in declaration order
//! and keeps the first one with the best objective value. Feasibility covers
//! fixed values, bounds, disjunctions, active no-good cuts and any
//! configured forbidden patterns. Linearization cuts are ignored and
//! continuous variables are evaluated at their lower bound (or zero).
//!
//! # Example
//!
//! ```
//! use lboa_test::mip::EnumeratingMipSolver;
//!
//! let solver = EnumeratingMipSolver::new().with_bound_tightening();
//! assert_eq!(solver.solve_count(), 0);
//! ```

use lboa_config::GdpoptConfig;
use lboa_core::{GdpModel, LboaError, MasterBlock, MipSolver, ObjectiveSense, Result, VarId};

const MAX_BINARIES: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct EnumeratingMipSolver {
    forbidden: Vec<Vec<(VarId, bool)>>,
    tighten_bounds: bool,
    tighten_binaries: bool,
    always_infeasible: bool,
    history: Vec<Option<Vec<(VarId, bool)>>>,
}

impl EnumeratingMipSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares every assignment matching `pattern` infeasible.
    pub fn with_forbidden(mut self, pattern: Vec<(VarId, bool)>) -> Self {
        self.forbidden.push(pattern);
        self
    }

    /// Collapses continuous bounds onto the solution, as presolve might.
    pub fn with_bound_tightening(mut self) -> Self {
        self.tighten_bounds = true;
        self
    }

    /// Collapses every bound onto the solution, binaries included.
    pub fn with_full_bound_tightening(mut self) -> Self {
        self.tighten_bounds = true;
        self.tighten_binaries = true;
        self
    }

    /// Reports every solve as infeasible.
    pub fn always_infeasible(mut self) -> Self {
        self.always_infeasible = true;
        self
    }

    pub fn solve_count(&self) -> usize {
        self.history.len()
    }

    /// Binary assignment of every solve, `None` for infeasible ones.
    pub fn history(&self) -> &[Option<Vec<(VarId, bool)>>] {
        &self.history
    }

    fn best_assignment(&self, model: &GdpModel) -> Result<Option<Vec<(VarId, bool)>>> {
        let binaries: Vec<VarId> = model
            .var_ids()
            .filter(|&id| model.variables()[id.index()].is_binary())
            .collect();
        if binaries.len() > MAX_BINARIES {
            return Err(LboaError::Backend(format!(
                "enumeration limited to {} binaries, model has {}",
                MAX_BINARIES,
                binaries.len()
            )));
        }
        let objective = model.active_objective()?;

        let mut best: Option<(f64, Vec<(VarId, bool)>)> = None;
        for mask in 0u32..(1u32 << binaries.len()) {
            let assignment: Vec<(VarId, bool)> = binaries
                .iter()
                .enumerate()
                .map(|(bit, &id)| (id, mask & (1 << bit) != 0))
                .collect();
            let value_of = |id: VarId| -> f64 {
                match assignment.iter().find(|(v, _)| *v == id) {
                    Some(&(_, on)) => f64::from(u8::from(on)),
                    None => continuous_value(model, id),
                }
            };
            if !self.is_feasible(model, &assignment, &value_of) {
                continue;
            }
            let score = objective
                .expr
                .terms
                .iter()
                .fold(objective.expr.constant, |acc, &(id, coef)| {
                    acc + coef * value_of(id)
                });
            let better = match &best {
                None => true,
                Some((incumbent, _)) => match objective.sense {
                    ObjectiveSense::Minimize => score < *incumbent,
                    ObjectiveSense::Maximize => score > *incumbent,
                },
            };
            if better {
                best = Some((score, assignment));
            }
        }
        Ok(best.map(|(_, assignment)| assignment))
    }

    fn is_feasible(
        &self,
        model: &GdpModel,
        assignment: &[(VarId, bool)],
        value_of: &dyn Fn(VarId) -> f64,
    ) -> bool {
        for &(id, on) in assignment {
            let var = &model.variables()[id.index()];
            let value = f64::from(u8::from(on));
            if var.fixed && var.value.map(f64::round) != Some(value) {
                return false;
            }
            if var.lb.is_some_and(|lb| value < lb - 1e-9) || var.ub.is_some_and(|ub| value > ub + 1e-9)
            {
                return false;
            }
        }

        for disjunction in model.disjunctions() {
            let selected: f64 = disjunction
                .disjuncts
                .iter()
                .filter_map(|&d| model.disjuncts().get(d))
                .filter(|d| d.active)
                .map(|d| value_of(d.indicator))
                .sum();
            let ok = if disjunction.exactly_one {
                (selected - 1.0).abs() < 1e-9
            } else {
                selected >= 1.0 - 1e-9
            };
            if !ok {
                return false;
            }
        }

        for cut in model.cuts().iter().filter(|c| c.active) {
            if let Some(no_good) = cut.as_no_good() {
                let lhs: f64 = no_good
                    .assignment
                    .iter()
                    .map(|&(id, on)| {
                        let value = value_of(id);
                        if on {
                            1.0 - value
                        } else {
                            value
                        }
                    })
                    .sum();
                if lhs < 1.0 - 1e-9 {
                    return false;
                }
            }
        }

        !self.forbidden.iter().any(|pattern| {
            pattern
                .iter()
                .all(|&(id, on)| (value_of(id) - f64::from(u8::from(on))).abs() < 1e-9)
        })
    }
}

fn continuous_value(model: &GdpModel, id: VarId) -> f64 {
    model
        .variables()
        .get(id.index())
        .map(|v| v.lb.or(v.ub).unwrap_or(0.0))
        .unwrap_or(0.0)
}

impl MipSolver for EnumeratingMipSolver {
    fn solve_relaxation(
        &mut self,
        master: &mut MasterBlock,
        _config: &GdpoptConfig,
    ) -> Result<bool> {
        let found = if self.always_infeasible {
            None
        } else {
            self.best_assignment(master.model())?
        };
        self.history.push(found.clone());
        let Some(assignment) = found else {
            return Ok(false);
        };

        let model = master.model_mut();
        for &(id, on) in &assignment {
            let value = f64::from(u8::from(on));
            let var = model.var_mut(id)?;
            var.value = Some(value);
            if self.tighten_binaries {
                var.lb = Some(value);
                var.ub = Some(value);
            }
        }
        let continuous: Vec<VarId> = model
            .var_ids()
            .filter(|&id| !model.variables()[id.index()].domain.is_discrete())
            .collect();
        for id in continuous {
            let value = continuous_value(model, id);
            let var = model.var_mut(id)?;
            var.value = Some(value);
            if self.tighten_bounds {
                var.lb = Some(value);
                var.ub = Some(value);
            }
        }
        Ok(true)
    }
}
