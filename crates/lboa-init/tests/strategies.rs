//! End-to-end tests of the initialization strategies against the
//! enumerating test backend.
//!
//! The default model has two exactly-one disjunctions:
//! `d0_0` (nonlinear) | `d0_1` (linear) and `d1_0` | `d1_1` (both nonlinear),
//! with indicators `y0_0, y0_1, y1_0, y1_1` at ids 0..4 and `cost` at id 4.
//! The scripted subproblem scores a selection by the sum of disjunct
//! index + 1.

use lboa_config::{Algorithm, GdpoptConfig, InitStrategyType};
use lboa_core::{
    Cut, GdpProblem, LboaError, LinearExpr, MipSolver, Objective, ObjectiveSense, VarId,
};
use lboa_init::{
    CoverState, CustomDisjuncts, FixDisjuncts, InitStrategy, MaxBinary, ObjectiveSwap,
    SetCovering, SolveScope, StrategyRegistry,
};
use lboa_test::models::{bounds_of, disjunctive_model, disjunctive_problem, fixed_flags};
use lboa_test::{EnumeratingMipSolver, ScriptedNlpSolver, TestBackend};

fn problem() -> GdpProblem {
    disjunctive_problem(&[&[true, false], &[true, true]])
}

fn scope_with(mip: EnumeratingMipSolver, nlp: ScriptedNlpSolver) -> SolveScope<TestBackend> {
    lboa_console::init();
    SolveScope::new(TestBackend::new(mip, nlp), ObjectiveSense::Minimize)
}

fn scope() -> SolveScope<TestBackend> {
    scope_with(EnumeratingMipSolver::new(), ScriptedNlpSolver::default())
}

fn assignment(on: [bool; 4]) -> Vec<(VarId, bool)> {
    on.into_iter()
        .enumerate()
        .map(|(i, value)| (VarId(i), value))
        .collect()
}

fn custom_config() -> GdpoptConfig {
    GdpoptConfig::default()
        .with_init_strategy(InitStrategyType::CustomDisjuncts)
        .with_custom_disjunct_set(["d0_0", "d1_0"])
}

fn every_strategy() -> Vec<(InitStrategyType, GdpoptConfig)> {
    vec![
        (InitStrategyType::CustomDisjuncts, custom_config()),
        (InitStrategyType::FixDisjuncts, GdpoptConfig::default()),
        (InitStrategyType::MaxBinary, GdpoptConfig::default()),
        (InitStrategyType::SetCovering, GdpoptConfig::default()),
    ]
}

// === Set covering ===

#[test]
fn test_set_covering_covers_every_nonlinear_disjunct() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default();

    let report = SetCovering.search(&mut problem, &mut scope, &config).unwrap();

    assert_eq!(report.state, CoverState::Solved);
    assert_eq!(report.iterations, 2);
    assert!(report.coverage.is_fully_covered());
    assert_eq!(
        scope.backend().mip.history(),
        &[
            Some(assignment([true, false, true, false])),
            Some(assignment([true, false, false, true])),
        ]
    );
    assert_eq!(scope.backend().nlp.calls(), &[vec![0, 2], vec![0, 3]]);
    assert_eq!(scope.upper_bound(), 4.0);
    assert_eq!(problem.master.model().no_good_cut_count(), 2);
    assert_eq!(problem.master.model().linearization_count(), 2);
    assert!(problem.master.model().cuts().iter().all(|c| c.active));
}

#[test]
fn test_set_covering_terminates_within_nonlinear_count() {
    let shapes: [&[&[bool]]; 3] = [
        &[&[true, true, true]],
        &[&[true, false], &[false, true]],
        &[&[true, true], &[true, true], &[true, false]],
    ];
    for shape in shapes {
        let mut problem = disjunctive_problem(shape);
        let nonlinear = shape.iter().flat_map(|d| d.iter()).filter(|&&n| n).count() as u32;
        let mut scope = scope();
        let config = GdpoptConfig::default().with_set_cover_iterlim(nonlinear);

        let report = SetCovering.search(&mut problem, &mut scope, &config).unwrap();
        assert_eq!(report.state, CoverState::Solved, "shape {:?}", shape);
        assert!(report.iterations <= nonlinear);
    }
}

#[test]
fn test_set_covering_without_nonlinear_disjuncts_is_solved() {
    let mut problem = disjunctive_problem(&[&[false, false]]);
    let mut scope = scope();

    assert!(SetCovering
        .run(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap());
    assert_eq!(scope.backend().mip.solve_count(), 0);
}

#[test]
fn test_set_covering_infeasible_first_solve() {
    let mut problem = problem();
    let objectives = problem.master.model().objectives().to_vec();
    let mut scope = scope_with(
        EnumeratingMipSolver::new().always_infeasible(),
        ScriptedNlpSolver::default(),
    );

    let report = SetCovering
        .search(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap();

    assert_eq!(report.state, CoverState::InfeasibleStop);
    assert_eq!(report.iterations, 1);
    assert_eq!(scope.backend().mip.solve_count(), 1);
    assert!(scope.is_problem_infeasible());
    assert_eq!(scope.lower_bound(), f64::INFINITY);
    assert!(scope.backend().nlp.calls().is_empty());
    assert_eq!(problem.master.model().objectives(), objectives.as_slice());
}

#[test]
fn test_set_covering_iteration_limit() {
    let config = GdpoptConfig::default().with_set_cover_iterlim(1);
    let mut searched = problem();
    let mut search_scope = scope();

    let report = SetCovering
        .search(&mut searched, &mut search_scope, &config)
        .unwrap();
    assert_eq!(report.state, CoverState::IterLimitStop);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.coverage.uncovered_count(), 1);
    assert!(!search_scope.is_problem_infeasible());

    let mut ran = problem();
    let mut run_scope = scope();
    assert!(!SetCovering.run(&mut ran, &mut run_scope, &config).unwrap());
}

#[test]
fn test_set_covering_infeasible_subproblems_credit_nothing() {
    let mut problem = problem();
    let mut scope = scope_with(EnumeratingMipSolver::new(), ScriptedNlpSolver::infeasible());
    let config = GdpoptConfig::default().with_set_cover_iterlim(3);

    let report = SetCovering.search(&mut problem, &mut scope, &config).unwrap();

    assert_eq!(report.state, CoverState::IterLimitStop);
    assert_eq!(report.coverage.uncovered_count(), 3);
    assert_eq!(problem.master.model().no_good_cut_count(), 3);
    assert!(scope.backend().cuts.calls().is_empty());
    assert!(scope.incumbent().is_none());
}

#[test]
fn test_set_covering_restores_suspended_linearizations() {
    let mut problem = problem();
    problem
        .master
        .model_mut()
        .add_cut(Cut::linearization("seed", LinearExpr::sum([VarId(4)]), 10.0));
    let mut scope = scope();

    SetCovering
        .search(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap();
    assert!(problem.master.model().cuts()[0].active);
}

#[test]
fn test_set_covering_restores_bounds_between_iterations() {
    let mut problem = problem();
    let before = bounds_of(problem.master.model());
    let mut scope = scope_with(
        EnumeratingMipSolver::new().with_full_bound_tightening(),
        ScriptedNlpSolver::default(),
    );

    let report = SetCovering
        .search(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap();

    assert_eq!(report.state, CoverState::Solved);
    assert_eq!(report.iterations, 2);
    assert!(!scope.is_problem_infeasible());
    assert_eq!(
        scope.backend().mip.history(),
        &[
            Some(assignment([true, false, true, false])),
            Some(assignment([true, false, false, true])),
        ]
    );
    assert_eq!(bounds_of(problem.master.model()), before);
}

#[test]
fn test_set_covering_ignores_deactivated_disjuncts() {
    let mut model = disjunctive_model(&[&[true, false], &[true, true]]);
    model.disjuncts_mut()[3].active = false;
    model.var_mut(VarId(3)).unwrap().fix(0.0);
    let mut problem = GdpProblem::from_working_model(model);
    let mut scope = scope();

    let report = SetCovering
        .search(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap();

    assert_eq!(report.state, CoverState::Solved);
    assert_eq!(report.iterations, 1);
    assert!(!report.coverage.needs_cover(3));
    assert_eq!(scope.backend().nlp.calls(), &[vec![0, 2]]);
    assert!(!scope.is_problem_infeasible());
}

// === Max binary ===

#[test]
fn test_max_binary_feasible() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default();

    assert!(MaxBinary.run(&mut problem, &mut scope, &config).unwrap());
    assert_eq!(
        scope.backend().mip.history(),
        &[Some(assignment([true, false, true, false]))]
    );
    assert_eq!(scope.upper_bound(), 4.0);
    assert_eq!(scope.backend().cuts.calls().len(), 1);
    assert_eq!(scope.backend().cuts.no_good_calls(), 1);
    assert_eq!(problem.master.active_objective().unwrap().name, "total_cost");
    assert_eq!(problem.master.model().objectives().len(), 1);
}

#[test]
fn test_max_binary_escalates_infeasibility() {
    let mut problem = problem();
    let mut scope = scope_with(
        EnumeratingMipSolver::new().always_infeasible(),
        ScriptedNlpSolver::default(),
    );

    assert!(!MaxBinary
        .run(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap());
    assert!(scope.is_problem_infeasible());
    assert!(scope.backend().nlp.calls().is_empty());
    assert_eq!(problem.master.model().cuts().len(), 0);
    assert_eq!(problem.master.active_objective().unwrap().name, "total_cost");
}

#[test]
fn test_no_good_cut_excludes_found_assignment() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default();
    MaxBinary.run(&mut problem, &mut scope, &config).unwrap();
    let first = scope.backend().mip.history()[0].clone();

    {
        let mut swap = ObjectiveSwap::maximize_free_binaries(&mut problem.master).unwrap();
        assert!(scope.backend_mut().solve_relaxation(&mut swap, &config).unwrap());
    }
    let second = scope.backend().mip.history()[1].clone();
    assert!(second.is_some());
    assert_ne!(second, first);
}

// === Fixed disjuncts ===

fn problem_with_guess(guess: [f64; 4]) -> GdpProblem {
    let mut model = disjunctive_model(&[&[true, false], &[true, true]]);
    for (i, value) in guess.into_iter().enumerate() {
        model.var_mut(VarId(i)).unwrap().value = Some(value);
    }
    GdpProblem::from_working_model(model)
}

#[test]
fn test_fixed_disjuncts_uses_initial_values() {
    let mut problem = problem_with_guess([0.0, 1.0, 0.0, 1.0]);
    let flags = fixed_flags(problem.master.model());
    let mut scope = scope();

    assert!(FixDisjuncts
        .run(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap());
    assert_eq!(
        scope.backend().mip.history(),
        &[Some(assignment([false, true, false, true]))]
    );
    assert_eq!(scope.backend().nlp.calls(), &[vec![1, 3]]);
    assert_eq!(scope.upper_bound(), 6.0);
    assert_eq!(fixed_flags(problem.master.model()), flags);
}

#[test]
fn test_fixed_disjuncts_keeps_prefixed_indicators() {
    let mut problem = problem_with_guess([0.0, 1.0, 0.0, 1.0]);
    problem.master.model_mut().var_mut(VarId(0)).unwrap().fix(1.0);
    let flags = fixed_flags(problem.master.model());
    let mut scope = scope();

    // y0_0 stays fixed on, the guess turns y0_1 on too: infeasible, skipped.
    assert!(FixDisjuncts
        .run(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap());
    assert_eq!(scope.backend().mip.history(), &[None]);
    assert!(scope.backend().nlp.calls().is_empty());
    assert_eq!(problem.master.model().no_good_cut_count(), 0);
    assert!(!scope.is_problem_infeasible());
    assert_eq!(fixed_flags(problem.master.model()), flags);
}

#[test]
fn test_fixed_disjuncts_leaves_fractional_guesses_free() {
    let mut problem = problem_with_guess([0.5, 0.5, 0.0, 1.0]);
    let mut scope = scope();

    FixDisjuncts
        .run(&mut problem, &mut scope, &GdpoptConfig::default())
        .unwrap();
    assert_eq!(
        scope.backend().mip.history(),
        &[Some(assignment([true, false, false, true]))]
    );
}

// === Custom disjuncts ===

#[test]
fn test_custom_disjuncts_solves_each_set() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default()
        .with_init_strategy(InitStrategyType::CustomDisjuncts)
        .with_custom_disjunct_set(["d0_1", "d1_1"])
        .with_custom_disjunct_set(["d0_0", "d1_0", "missing"]);

    assert!(StrategyRegistry::run_configured(&mut problem, &mut scope, &config).unwrap());
    assert_eq!(
        scope.backend().mip.history(),
        &[
            Some(assignment([false, true, false, true])),
            Some(assignment([true, false, true, false])),
        ]
    );
    assert_eq!(scope.backend().nlp.calls(), &[vec![1, 3], vec![0, 2]]);
    assert_eq!(scope.upper_bound(), 4.0);
    let incumbent = scope.incumbent().unwrap();
    assert_eq!(incumbent.objective_value, 4.0);
    assert_eq!(incumbent.values[4], Some(4.0));
    assert_eq!(problem.master.model().no_good_cut_count(), 2);
    assert!(fixed_flags(problem.master.model()).iter().all(|&f| !f));
}

#[test]
fn test_custom_disjuncts_skips_infeasible_sets() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default()
        .with_custom_disjunct_set(["d0_0"])
        .with_custom_disjunct_set(["d0_1", "d1_0"]);

    assert!(CustomDisjuncts.run(&mut problem, &mut scope, &config).unwrap());
    assert_eq!(scope.backend().mip.history()[0], None);
    assert_eq!(scope.backend().nlp.calls(), &[vec![1, 2]]);
    assert_eq!(problem.master.model().no_good_cut_count(), 1);
    assert!(!scope.is_problem_infeasible());
}

#[test]
fn test_custom_disjuncts_infeasible_set_leaves_values() {
    let mut problem = problem();
    let values: Vec<Option<f64>> = problem.master.model().variables().iter().map(|v| v.value).collect();
    let mut scope = scope();
    let config = GdpoptConfig::default().with_custom_disjunct_set(["d0_0"]);

    assert!(CustomDisjuncts.run(&mut problem, &mut scope, &config).unwrap());
    assert_eq!(scope.backend().mip.history(), &[None]);
    let after: Vec<Option<f64>> = problem.master.model().variables().iter().map(|v| v.value).collect();
    assert_eq!(after, values);
    assert_eq!(fixed_flags(problem.master.model()), vec![false; 5]);
}

#[test]
fn test_worse_subproblem_keeps_incumbent() {
    let mut problem = problem();
    let mut scope = scope();
    let config = GdpoptConfig::default()
        .with_custom_disjunct_set(["d0_0", "d1_0"])
        .with_custom_disjunct_set(["d0_1", "d1_1"]);

    CustomDisjuncts.run(&mut problem, &mut scope, &config).unwrap();
    assert_eq!(scope.upper_bound(), 4.0);
    assert_eq!(scope.incumbent().unwrap().objective_value, 4.0);
    assert_eq!(scope.counters().nlp_iteration, 2);
}

// === Invariants across strategies ===

#[test]
fn test_bounds_restored_with_presolve() {
    for (kind, config) in every_strategy() {
        let mut problem = problem();
        let before = bounds_of(problem.master.model());
        let mut scope = scope_with(
            EnumeratingMipSolver::new().with_bound_tightening(),
            ScriptedNlpSolver::default(),
        );

        StrategyRegistry::run(kind, &mut problem, &mut scope, &config).unwrap();
        assert_eq!(bounds_of(problem.master.model()), before, "{}", kind);
    }
}

#[test]
fn test_bounds_left_alone_without_presolve() {
    let mut problem = problem();
    let mut scope = scope_with(
        EnumeratingMipSolver::new().with_bound_tightening(),
        ScriptedNlpSolver::default(),
    );
    let config = GdpoptConfig::default().with_mip_presolve(false);

    MaxBinary.run(&mut problem, &mut scope, &config).unwrap();
    assert_eq!(
        problem.master.model().var(VarId(4)).unwrap().bounds(),
        (Some(0.0), Some(0.0))
    );
}

#[test]
fn test_objective_restored_by_every_strategy() {
    for (kind, config) in every_strategy() {
        for mip in [
            EnumeratingMipSolver::new(),
            EnumeratingMipSolver::new().always_infeasible(),
        ] {
            let mut problem = problem();
            let before = problem.master.model().objectives().to_vec();
            let mut scope = scope_with(mip, ScriptedNlpSolver::default());

            StrategyRegistry::run(kind, &mut problem, &mut scope, &config).unwrap();
            assert_eq!(problem.master.model().objectives(), before.as_slice(), "{}", kind);
        }
    }
}

#[test]
fn test_subproblem_restored_after_every_strategy() {
    for (kind, config) in every_strategy() {
        let mut problem = problem();
        let mut scope = scope();

        StrategyRegistry::run(kind, &mut problem, &mut scope, &config).unwrap();
        let model = problem.subproblem.model();
        assert!(fixed_flags(model).iter().all(|&f| !f), "{}", kind);
        assert!(model.disjuncts().iter().all(|d| d.active), "{}", kind);
    }
}

#[test]
fn test_subproblem_failure_restores_every_strategy() {
    for (kind, config) in every_strategy() {
        let mut problem = problem();
        problem
            .master
            .model_mut()
            .add_cut(Cut::linearization("seed", LinearExpr::sum([VarId(4)]), 10.0));
        let objectives = problem.master.model().objectives().to_vec();
        let bounds = bounds_of(problem.master.model());
        let master_fixed = fixed_flags(problem.master.model());
        let subproblem_fixed = fixed_flags(problem.subproblem.model());
        let mut scope = scope_with(
            EnumeratingMipSolver::new().with_full_bound_tightening(),
            ScriptedNlpSolver::failing("subproblem solver crashed"),
        );

        let result = StrategyRegistry::run(kind, &mut problem, &mut scope, &config);

        assert!(matches!(result, Err(LboaError::Backend(_))), "{}", kind);
        assert_eq!(scope.backend().nlp.calls().len(), 1, "{}", kind);
        let master = problem.master.model();
        assert_eq!(master.objectives(), objectives.as_slice(), "{}", kind);
        assert_eq!(bounds_of(master), bounds, "{}", kind);
        assert_eq!(fixed_flags(master), master_fixed, "{}", kind);
        assert!(master.cuts()[0].active, "{}", kind);
        let subproblem = problem.subproblem.model();
        assert_eq!(fixed_flags(subproblem), subproblem_fixed, "{}", kind);
        assert!(subproblem.disjuncts().iter().all(|d| d.active), "{}", kind);
    }
}

#[test]
fn test_relaxation_failure_restores_every_strategy() {
    let row: &[bool] = &[true; 4];
    let shape = [row; 6];
    for (kind, config) in every_strategy() {
        let mut problem = disjunctive_problem(&shape);
        let objectives = problem.master.model().objectives().to_vec();
        let bounds = bounds_of(problem.master.model());
        let master_fixed = fixed_flags(problem.master.model());
        let mut scope = scope();

        let result = StrategyRegistry::run(kind, &mut problem, &mut scope, &config);

        assert!(matches!(result, Err(LboaError::Backend(_))), "{}", kind);
        assert!(scope.backend().nlp.calls().is_empty(), "{}", kind);
        let master = problem.master.model();
        assert_eq!(master.objectives(), objectives.as_slice(), "{}", kind);
        assert_eq!(bounds_of(master), bounds, "{}", kind);
        assert_eq!(fixed_flags(master), master_fixed, "{}", kind);
        assert_eq!(master.no_good_cut_count(), 0, "{}", kind);
    }
}

#[test]
fn test_no_good_cuts_accumulate_and_match_solutions() {
    let mut problem = problem();
    let mut scope = scope();
    let mut count = 0;

    for (kind, config) in every_strategy() {
        StrategyRegistry::run(kind, &mut problem, &mut scope, &config).unwrap();
        let now = problem.master.model().no_good_cut_count();
        assert!(now >= count, "{}", kind);
        count = now;
    }

    let found: Vec<Vec<(VarId, bool)>> = scope
        .backend()
        .mip
        .history()
        .iter()
        .flatten()
        .cloned()
        .collect();
    let excluded: Vec<Vec<(VarId, bool)>> = problem
        .master
        .model()
        .cuts()
        .iter()
        .filter_map(|c| c.as_no_good())
        .map(|cut| cut.assignment.clone())
        .collect();
    assert_eq!(excluded, found);
}

#[test]
fn test_cut_generation_receives_algorithm_and_sense() {
    let mut model = disjunctive_model(&[&[true, false], &[true, true]]);
    model.remove_objective(0);
    model.add_objective(Objective::maximize("profit", LinearExpr::sum([VarId(4)])));
    let mut problem = GdpProblem::from_working_model(model);
    let sense = problem.master.active_objective().unwrap().sense;
    let mut scope = SolveScope::new(TestBackend::default(), sense);
    let config = GdpoptConfig::default().with_algorithm(Algorithm::Gloa);

    MaxBinary.run(&mut problem, &mut scope, &config).unwrap();
    let call = &scope.backend().cuts.calls()[0];
    assert_eq!(call.algorithm, Algorithm::Gloa);
    assert_eq!(call.sense, ObjectiveSense::Maximize);
    assert_eq!(call.objective_value, Some(4.0));
    assert_eq!(scope.lower_bound(), 4.0);
    assert_eq!(scope.upper_bound(), f64::INFINITY);
}
