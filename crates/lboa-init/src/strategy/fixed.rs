//! Initialization from the indicator values already in the model.

use lboa_config::{GdpoptConfig, InitStrategyType};
use lboa_core::{Backend, GdpProblem, LboaError, Result};
use tracing::{error, info, warn};

use super::InitStrategy;
use crate::guard::{BoundsGuard, IndicatorFixGuard};
use crate::scope::SolveScope;
use crate::step::{add_no_good_cut, fix_master_solution_solve_subproblem_and_add_cuts, solve_master};

/// Fixes every free master indicator at the user's initial guess and solves
/// once.
///
/// The guess is read from the paired original indicator, falling back to the
/// master's own value. Indicators without an integral guess stay free.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixDisjuncts;

impl InitStrategy for FixDisjuncts {
    fn run<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        let GdpProblem {
            original,
            master,
            subproblem,
        } = problem;
        if original.disjuncts().len() != master.disjuncts().len() {
            return Err(LboaError::ModelMismatch(format!(
                "original has {} disjuncts, master has {}",
                original.disjuncts().len(),
                master.disjuncts().len()
            )));
        }

        let mut bounds = BoundsGuard::new(master, config.mip_presolve);
        let feasible = {
            let mut fixings = IndicatorFixGuard::new(&mut bounds);
            let indicators = fixings.indicators();
            for (disjunct, indicator) in original.disjuncts().iter().zip(indicators) {
                let master_var = fixings.model().var(indicator)?;
                if master_var.fixed {
                    continue;
                }
                let guess = original
                    .model()
                    .var(disjunct.indicator)?
                    .value
                    .or(master_var.value);
                let tolerance = config.integer_tolerance;
                match guess {
                    Some(v) if (v - 1.0).abs() <= tolerance => {
                        fixings.fix(indicator, true)?;
                    }
                    Some(v) if v.abs() <= tolerance => {
                        fixings.fix(indicator, false)?;
                    }
                    Some(v) => warn!(
                        disjunct = %disjunct.name,
                        value = v,
                        "Initial indicator value is not integral; leaving it free"
                    ),
                    None => warn!(
                        disjunct = %disjunct.name,
                        "No initial indicator value; leaving it free"
                    ),
                }
            }
            info!(
                event = "fixed_disjuncts",
                fixed = fixings.fixed_here().len(),
                disjuncts = fixings.disjuncts().len(),
            );
            let feasible = solve_master(&mut fixings, scope, config)?;
            if feasible {
                fixings.keep_solution();
            }
            feasible
        };

        if feasible {
            fix_master_solution_solve_subproblem_and_add_cuts(&mut bounds, subproblem, scope, config)?;
            add_no_good_cut(&mut bounds, scope, config)?;
        } else {
            error!("Relaxation infeasible for the initial indicator values; no initialization cuts added");
        }
        Ok(true)
    }

    fn strategy_name(&self) -> &'static str {
        InitStrategyType::FixDisjuncts.name()
    }
}
