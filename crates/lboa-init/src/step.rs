//! Solve steps shared by every strategy.

use lboa_config::GdpoptConfig;
use lboa_core::{Backend, MasterBlock, Result, SubproblemBlock};
use tracing::debug;

use crate::guard::fix_master_solution_in_subproblem;
use crate::scope::SolveScope;

/// Solves the master relaxation once, counting the solve.
pub fn solve_master<B: Backend>(
    master: &mut MasterBlock,
    scope: &mut SolveScope<B>,
    config: &GdpoptConfig,
) -> Result<bool> {
    let mip_iteration = scope.counters_mut().record_mip_iteration();
    let feasible = scope.backend_mut().solve_relaxation(master, config)?;
    debug!(event = "relaxation_solved", mip_iteration, feasible);
    Ok(feasible)
}

/// Fixes the master's discrete solution into the subproblem, solves it and,
/// when feasible, reports the bound and adds linearization cuts.
///
/// Returns the subproblem's feasibility. The subproblem fixing is undone
/// before returning, whatever the outcome.
pub fn fix_master_solution_solve_subproblem_and_add_cuts<B: Backend>(
    master: &mut MasterBlock,
    subproblem: &mut SubproblemBlock,
    scope: &mut SolveScope<B>,
    config: &GdpoptConfig,
) -> Result<bool> {
    let mut fixed = fix_master_solution_in_subproblem(master, subproblem, config)?;
    let nlp_iteration = scope.counters_mut().record_nlp_iteration();
    let feasible = scope.backend_mut().solve_subproblem(&mut fixed, config)?;
    if !feasible {
        debug!(event = "subproblem_infeasible", nlp_iteration);
        return Ok(false);
    }

    let objective = fixed.objective_value()?;
    let improved = scope.update_primal_bound(objective);
    if improved {
        scope.update_incumbent(&fixed, objective);
    }
    debug!(
        event = "subproblem_solved",
        nlp_iteration,
        objective,
        improved,
        lower_bound = scope.lower_bound(),
        upper_bound = scope.upper_bound(),
    );

    let sense = scope.objective_sense();
    scope
        .backend_mut()
        .add_cuts_for_mode(&fixed, master, sense, config)?;
    Ok(true)
}

/// Excludes the master's current discrete assignment from later solves.
pub fn add_no_good_cut<B: Backend>(
    master: &mut MasterBlock,
    scope: &mut SolveScope<B>,
    config: &GdpoptConfig,
) -> Result<()> {
    scope.backend_mut().add_no_good_cut(master, config)?;
    debug!(
        event = "no_good_cut_added",
        total = master.model().no_good_cut_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lboa_core::ObjectiveSense;
    use lboa_test::models::disjunctive_problem;
    use lboa_test::{EnumeratingMipSolver, ScriptedNlpSolver, TestBackend};

    fn scope(nlp: ScriptedNlpSolver) -> SolveScope<TestBackend> {
        SolveScope::new(
            TestBackend::new(EnumeratingMipSolver::new(), nlp),
            ObjectiveSense::Minimize,
        )
    }

    #[test]
    fn test_solve_master_counts_iterations() {
        let mut problem = disjunctive_problem(&[&[true, false]]);
        let mut scope = scope(ScriptedNlpSolver::default());
        let config = GdpoptConfig::default();

        assert!(solve_master(&mut problem.master, &mut scope, &config).unwrap());
        assert!(solve_master(&mut problem.master, &mut scope, &config).unwrap());
        assert_eq!(scope.counters().mip_iteration, 2);
        assert_eq!(scope.counters().nlp_iteration, 0);
    }

    #[test]
    fn test_feasible_subproblem_updates_bounds_and_cuts() {
        let mut problem = disjunctive_problem(&[&[true, false]]);
        let mut scope = scope(ScriptedNlpSolver::new(|_| Some(7.5)));
        let config = GdpoptConfig::default();

        solve_master(&mut problem.master, &mut scope, &config).unwrap();
        let feasible = fix_master_solution_solve_subproblem_and_add_cuts(
            &mut problem.master,
            &mut problem.subproblem,
            &mut scope,
            &config,
        )
        .unwrap();

        assert!(feasible);
        assert_eq!(scope.upper_bound(), 7.5);
        assert_eq!(scope.incumbent().unwrap().objective_value, 7.5);
        assert_eq!(problem.master.model().linearization_count(), 1);
        assert_eq!(scope.counters().nlp_iteration, 1);
    }

    #[test]
    fn test_infeasible_subproblem_adds_nothing() {
        let mut problem = disjunctive_problem(&[&[true, false]]);
        let mut scope = scope(ScriptedNlpSolver::infeasible());
        let config = GdpoptConfig::default();

        solve_master(&mut problem.master, &mut scope, &config).unwrap();
        let feasible = fix_master_solution_solve_subproblem_and_add_cuts(
            &mut problem.master,
            &mut problem.subproblem,
            &mut scope,
            &config,
        )
        .unwrap();

        assert!(!feasible);
        assert_eq!(scope.upper_bound(), f64::INFINITY);
        assert!(scope.incumbent().is_none());
        assert!(problem.master.model().cuts().is_empty());

        add_no_good_cut(&mut problem.master, &mut scope, &config).unwrap();
        assert_eq!(problem.master.model().no_good_cut_count(), 1);
    }
}
