//! Weighted set-covering initialization.
//!
//! Repeatedly solves the master with an objective that rewards activating
//! nonlinear disjuncts that have not yet been part of a feasible subproblem.
//! Each feasible subproblem contributes linearization cuts, and every
//! relaxation solution is excluded afterwards by a no-good cut, so the search
//! walks through distinct discrete configurations until every nonlinear
//! disjunct has been covered.

use lboa_config::{GdpoptConfig, InitStrategyType};
use lboa_core::{Backend, Disjunct, GdpProblem, LboaError, LinearExpr, Result};
use tracing::{debug, info, warn};

use super::InitStrategy;
use crate::guard::{BoundsGuard, ObjectiveSwap, SuspendedLinearizations};
use crate::scope::SolveScope;
use crate::step::{add_no_good_cut, fix_master_solution_solve_subproblem_and_add_cuts, solve_master};

/// Where the covering search stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverState {
    /// Still solving; some nonlinear disjunct is uncovered.
    Covering,
    /// Every nonlinear disjunct was active in a feasible subproblem.
    Solved,
    /// The covering relaxation became infeasible.
    InfeasibleStop,
    /// `set_cover_iterlim` solves happened without full coverage.
    IterLimitStop,
}

/// One flag per disjunct; `true` means the disjunct still needs a
/// linearization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageVector {
    needs_cover: Vec<bool>,
}

impl CoverageVector {
    /// Seeds coverage from the active nonlinear disjuncts. Linear disjuncts
    /// are exact in the master and deactivated ones can never be selected.
    pub fn from_disjuncts(disjuncts: &[Disjunct]) -> Self {
        Self {
            needs_cover: disjuncts
                .iter()
                .map(|d| d.active && d.is_nonlinear())
                .collect(),
        }
    }

    pub fn from_flags(needs_cover: Vec<bool>) -> Self {
        Self { needs_cover }
    }

    pub fn len(&self) -> usize {
        self.needs_cover.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs_cover.is_empty()
    }

    pub fn needs_cover(&self, index: usize) -> bool {
        self.needs_cover.get(index).copied().unwrap_or(false)
    }

    pub fn uncovered_count(&self) -> usize {
        self.needs_cover.iter().filter(|&&n| n).count()
    }

    /// Disjuncts not needing cover, linear ones included.
    pub fn covered_count(&self) -> usize {
        self.len() - self.uncovered_count()
    }

    pub fn is_fully_covered(&self) -> bool {
        !self.needs_cover.iter().any(|&n| n)
    }

    /// Objective weight per disjunct: `covered_count + 1` for a disjunct that
    /// still needs cover, `1` otherwise.
    pub fn weights(&self) -> Vec<f64> {
        let uncovered_weight = (self.covered_count() + 1) as f64;
        self.needs_cover
            .iter()
            .map(|&needs| if needs { uncovered_weight } else { 1.0 })
            .collect()
    }

    /// Marks as covered every uncovered disjunct whose indicator value is
    /// within `tolerance` of one. Returns how many entries changed.
    pub fn credit_active(&mut self, indicator_values: &[Option<f64>], tolerance: f64) -> usize {
        let mut credited = 0;
        for (needs, value) in self.needs_cover.iter_mut().zip(indicator_values) {
            let active = value.is_some_and(|v| (v - 1.0).abs() <= tolerance);
            if *needs && active {
                *needs = false;
                credited += 1;
            }
        }
        credited
    }
}

/// Outcome of one covering search.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCoverReport {
    pub state: CoverState,
    /// Relaxation solves issued by the search.
    pub iterations: u32,
    pub coverage: CoverageVector,
}

impl SetCoverReport {
    pub fn is_solved(&self) -> bool {
        self.state == CoverState::Solved
    }
}

/// Greedy weighted set-covering over the nonlinear disjuncts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetCovering;

impl SetCovering {
    /// Runs the covering search and reports how it ended.
    ///
    /// The covering objective is restored on every exit path. Bounds and
    /// suspended linearizations are restored after every iteration, so
    /// bounds tightened by one covering solve never constrain the next.
    /// No-good cuts persist.
    pub fn search<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<SetCoverReport> {
        let GdpProblem {
            master, subproblem, ..
        } = problem;
        let mut coverage = CoverageVector::from_disjuncts(subproblem.disjuncts());
        if coverage.len() != master.disjuncts().len() {
            return Err(LboaError::ModelMismatch(format!(
                "subproblem has {} disjuncts, master has {}",
                coverage.len(),
                master.disjuncts().len()
            )));
        }

        let mut swap = ObjectiveSwap::set_covering(master)?;
        let indicators = swap.indicators();
        let mut iterations = 0u32;
        info!(
            event = "set_cover_start",
            disjuncts = coverage.len(),
            uncovered = coverage.uncovered_count(),
            iteration_limit = config.set_cover_iterlim,
        );

        let state = loop {
            if coverage.is_fully_covered() {
                break CoverState::Solved;
            }
            if iterations >= config.set_cover_iterlim {
                warn!(
                    iterations,
                    uncovered = coverage.uncovered_count(),
                    "Iteration limit reached for set covering initialization without covering all disjuncts"
                );
                break CoverState::IterLimitStop;
            }

            swap.set_expr(LinearExpr::weighted(
                indicators.iter().copied().zip(coverage.weights()),
            ));
            iterations += 1;

            let mut bounds = BoundsGuard::new(&mut swap, config.mip_presolve);
            let feasible = {
                let mut suspended = SuspendedLinearizations::new(&mut bounds);
                debug!(
                    event = "linearizations_suspended",
                    count = suspended.suspended_count()
                );
                solve_master(&mut suspended, scope, config)?
            };
            if !feasible {
                info!("Set covering problem is infeasible; no feasible discrete configuration remains");
                if iterations == 1 {
                    warn!("Set covering problem was infeasible on its first solve; check the linear and logical constraints for contradictions");
                }
                scope.report_infeasible_problem();
                break CoverState::InfeasibleStop;
            }

            let indicator_values = indicators
                .iter()
                .map(|&id| bounds.model().var(id).map(|v| v.value))
                .collect::<Result<Vec<_>>>()?;
            let subproblem_feasible =
                fix_master_solution_solve_subproblem_and_add_cuts(&mut bounds, subproblem, scope, config)?;
            if subproblem_feasible {
                let credited = coverage.credit_active(&indicator_values, config.integer_tolerance);
                debug!(
                    event = "coverage_updated",
                    iteration = iterations,
                    credited,
                    uncovered = coverage.uncovered_count(),
                );
            }
            add_no_good_cut(&mut bounds, scope, config)?;
        };

        info!(
            event = "set_cover_end",
            state = ?state,
            iterations,
            uncovered = coverage.uncovered_count(),
        );
        Ok(SetCoverReport {
            state,
            iterations,
            coverage,
        })
    }
}

impl InitStrategy for SetCovering {
    fn run<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        Ok(self.search(problem, scope, config)?.is_solved())
    }

    fn strategy_name(&self) -> &'static str {
        InitStrategyType::SetCovering.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_with_nothing_covered() {
        let coverage = CoverageVector::from_flags(vec![true; 5]);
        assert_eq!(coverage.covered_count(), 0);
        assert_eq!(coverage.weights(), vec![1.0; 5]);
    }

    #[test]
    fn test_weights_favor_uncovered() {
        let coverage = CoverageVector::from_flags(vec![false, true, false, true, false]);
        assert_eq!(coverage.covered_count(), 3);
        assert_eq!(coverage.weights(), vec![1.0, 4.0, 1.0, 4.0, 1.0]);
    }

    #[test]
    fn test_credit_active_within_tolerance() {
        let mut coverage = CoverageVector::from_flags(vec![true, true, false, true]);
        let values = [Some(1.0 - 1e-7), Some(0.0), Some(1.0), None];
        assert_eq!(coverage.credit_active(&values, 1e-5), 1);
        assert!(!coverage.needs_cover(0));
        assert!(coverage.needs_cover(1));
        assert!(!coverage.needs_cover(2));
        assert!(coverage.needs_cover(3));
        assert_eq!(coverage.uncovered_count(), 2);
    }

    #[test]
    fn test_inactive_disjuncts_need_no_cover() {
        let mut model = lboa_test::models::disjunctive_model(&[&[true, true]]);
        model.disjuncts_mut()[1].active = false;
        let coverage = CoverageVector::from_disjuncts(model.disjuncts());
        assert_eq!(coverage, CoverageVector::from_flags(vec![true, false]));
    }

    #[test]
    fn test_seeded_from_nonlinearity() {
        let problem = lboa_test::models::disjunctive_problem(&[&[true, false], &[false, false]]);
        let coverage = CoverageVector::from_disjuncts(problem.subproblem.disjuncts());
        assert_eq!(coverage, CoverageVector::from_flags(vec![true, false, false, false]));
        assert!(!CoverageVector::from_flags(Vec::new()).needs_cover(0));
        assert!(CoverageVector::from_flags(Vec::new()).is_fully_covered());
    }
}
