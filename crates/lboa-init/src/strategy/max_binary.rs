//! Initialization by activating as many binaries as possible.

use lboa_config::{GdpoptConfig, InitStrategyType};
use lboa_core::{Backend, GdpProblem, Result};
use tracing::info;

use super::InitStrategy;
use crate::guard::{BoundsGuard, ObjectiveSwap};
use crate::scope::SolveScope;
use crate::step::{add_no_good_cut, fix_master_solution_solve_subproblem_and_add_cuts, solve_master};

/// Solves the master once with the objective replaced by the sum of all free
/// binaries.
///
/// An infeasible relaxation means the whole problem is infeasible: the scope
/// is told so and the strategy returns `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxBinary;

impl InitStrategy for MaxBinary {
    fn run<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        let mut bounds = BoundsGuard::new(&mut problem.master, config.mip_presolve);
        let mut swap = ObjectiveSwap::maximize_free_binaries(&mut bounds)?;
        info!(
            event = "max_binary_objective",
            binaries = swap.temporary().expr.terms.len(),
        );

        if !solve_master(&mut swap, scope, config)? {
            info!("Relaxation of the max-binary problem is infeasible; the problem is infeasible");
            scope.report_infeasible_problem();
            return Ok(false);
        }

        fix_master_solution_solve_subproblem_and_add_cuts(
            &mut swap,
            &mut problem.subproblem,
            scope,
            config,
        )?;
        add_no_good_cut(&mut swap, scope, config)?;
        Ok(true)
    }

    fn strategy_name(&self) -> &'static str {
        InitStrategyType::MaxBinary.name()
    }
}
