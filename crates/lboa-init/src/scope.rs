//! Outer solver scope.
//!
//! Holds the backend together with the bookkeeping the initialization phase
//! reports into: running bounds, the incumbent and the iteration counters.

use lboa_core::{Backend, ObjectiveSense, SubproblemBlock};
use tracing::debug;

/// Iteration counters owned by the outer solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationCounters {
    /// Relaxation solves issued so far.
    pub mip_iteration: u64,
    /// Subproblem solves issued so far.
    pub nlp_iteration: u64,
}

impl IterationCounters {
    pub fn record_mip_iteration(&mut self) -> u64 {
        self.mip_iteration += 1;
        self.mip_iteration
    }

    pub fn record_nlp_iteration(&mut self) -> u64 {
        self.nlp_iteration += 1;
        self.nlp_iteration
    }
}

/// Best feasible subproblem solution found so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    pub objective_value: f64,
    /// Subproblem variable values, in declaration order.
    pub values: Vec<Option<f64>>,
}

/// Top-level scope for one outer approximation solve.
///
/// Generic over `B: Backend` for zero type erasure.
#[derive(Debug)]
pub struct SolveScope<B: Backend> {
    backend: B,
    sense: ObjectiveSense,
    lower_bound: f64,
    upper_bound: f64,
    incumbent: Option<Incumbent>,
    counters: IterationCounters,
}

impl<B: Backend> SolveScope<B> {
    pub fn new(backend: B, sense: ObjectiveSense) -> Self {
        Self {
            backend,
            sense,
            lower_bound: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
            incumbent: None,
            counters: IterationCounters::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Sense of the original problem's objective.
    pub fn objective_sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Bound given by feasible solutions.
    pub fn primal_bound(&self) -> f64 {
        match self.sense {
            ObjectiveSense::Minimize => self.upper_bound,
            ObjectiveSense::Maximize => self.lower_bound,
        }
    }

    /// Bound given by relaxations.
    pub fn dual_bound(&self) -> f64 {
        match self.sense {
            ObjectiveSense::Minimize => self.lower_bound,
            ObjectiveSense::Maximize => self.upper_bound,
        }
    }

    pub fn incumbent(&self) -> Option<&Incumbent> {
        self.incumbent.as_ref()
    }

    pub fn counters(&self) -> &IterationCounters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut IterationCounters {
        &mut self.counters
    }

    /// Offers a feasible objective value; returns `true` if it improves the
    /// primal bound.
    pub fn update_primal_bound(&mut self, value: f64) -> bool {
        let improved = match self.sense {
            ObjectiveSense::Minimize => value < self.upper_bound,
            ObjectiveSense::Maximize => value > self.lower_bound,
        };
        if improved {
            match self.sense {
                ObjectiveSense::Minimize => self.upper_bound = value,
                ObjectiveSense::Maximize => self.lower_bound = value,
            }
            debug!(
                event = "primal_bound_improved",
                value,
                lower_bound = self.lower_bound,
                upper_bound = self.upper_bound,
            );
        }
        improved
    }

    /// Records the subproblem's current solution as the incumbent.
    pub fn update_incumbent(&mut self, subproblem: &SubproblemBlock, objective_value: f64) {
        self.incumbent = Some(Incumbent {
            objective_value,
            values: subproblem
                .model()
                .variables()
                .iter()
                .map(|v| v.value)
                .collect(),
        });
    }

    /// Marks the whole problem infeasible by pushing the dual bound to the
    /// wrong side of infinity.
    pub fn report_infeasible_problem(&mut self) {
        match self.sense {
            ObjectiveSense::Minimize => self.lower_bound = f64::INFINITY,
            ObjectiveSense::Maximize => self.upper_bound = f64::NEG_INFINITY,
        }
    }

    pub fn is_problem_infeasible(&self) -> bool {
        match self.sense {
            ObjectiveSense::Minimize => self.lower_bound == f64::INFINITY,
            ObjectiveSense::Maximize => self.upper_bound == f64::NEG_INFINITY,
        }
    }
}
