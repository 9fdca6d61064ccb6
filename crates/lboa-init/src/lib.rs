//! LBOA initialization phase
//!
//! Seeds the master relaxation of a logic-based outer approximation solve
//! with linearizations before the main loop starts:
//! - Scoped guards that restore bounds, objectives and fixings on every exit
//! - The solve scope holding backends, bounds, incumbent and counters
//! - The shared fix/solve/cut step
//! - The four initialization strategies and the registry dispatching them

pub mod guard;
pub mod scope;
pub mod step;
pub mod strategy;

pub use guard::{
    fix_master_solution_in_subproblem, BoundsGuard, BoundsSnapshot, FixedSubproblem,
    IndicatorFixGuard, ObjectiveSwap, SuspendedLinearizations,
};
pub use scope::{Incumbent, IterationCounters, SolveScope};
pub use step::{add_no_good_cut, fix_master_solution_solve_subproblem_and_add_cuts, solve_master};
pub use strategy::{
    CoverState, CoverageVector, CustomDisjuncts, FixDisjuncts, InitStrategy, MaxBinary, NoInit,
    SetCoverReport, SetCovering, StrategyRegistry,
};
