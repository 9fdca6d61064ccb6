//! Initialization strategies for the master relaxation.
//!
//! Each strategy seeds the master with linearizations before the main outer
//! approximation loop:
//! - [`CustomDisjuncts`]: one attempt per user-supplied disjunct set
//! - [`FixDisjuncts`]: one attempt at the indicator values in the model
//! - [`MaxBinary`]: one attempt maximizing the number of active binaries
//! - [`SetCovering`]: repeated attempts until every nonlinear disjunct has
//!   been active in a feasible subproblem
//!
//! [`StrategyRegistry`] maps configuration names to strategies.

mod custom;
mod fixed;
mod max_binary;
mod set_covering;

use std::fmt::Debug;
use std::time::Instant;

use lboa_config::{ConfigError, GdpoptConfig, InitStrategyType};
use lboa_core::{Backend, GdpProblem, Result};
use tracing::info;

use crate::scope::SolveScope;

pub use custom::CustomDisjuncts;
pub use fixed::FixDisjuncts;
pub use max_binary::MaxBinary;
pub use set_covering::{CoverState, CoverageVector, SetCoverReport, SetCovering};

/// An initialization strategy.
///
/// A strategy borrows the three model copies for one call. Bounds, objectives
/// and indicator fixings it changes on the master are restored before it
/// returns; only cuts persist.
pub trait InitStrategy: Debug {
    /// Runs the strategy.
    ///
    /// Returns `Ok(false)` when the strategy detected that the problem is
    /// infeasible or could not finish its work. Errors are reserved for
    /// backend failures and inconsistent models.
    fn run<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool>;

    /// Returns the configuration name of this strategy.
    fn strategy_name(&self) -> &'static str;
}

/// Strategy that leaves the master untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInit;

impl InitStrategy for NoInit {
    fn run<B: Backend>(
        &self,
        _problem: &mut GdpProblem,
        _scope: &mut SolveScope<B>,
        _config: &GdpoptConfig,
    ) -> Result<bool> {
        Ok(true)
    }

    fn strategy_name(&self) -> &'static str {
        InitStrategyType::NoInit.name()
    }
}

/// Dispatches strategies by name or configuration.
pub struct StrategyRegistry;

impl StrategyRegistry {
    /// Names of every registered strategy.
    pub fn names() -> impl Iterator<Item = &'static str> {
        InitStrategyType::ALL.into_iter().map(InitStrategyType::name)
    }

    /// Looks up a strategy by its configuration name.
    pub fn lookup(name: &str) -> std::result::Result<InitStrategyType, ConfigError> {
        name.parse()
    }

    /// Runs the strategy selected by `config.init_strategy`.
    pub fn run_configured<B: Backend>(
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        Self::run(config.init_strategy, problem, scope, config)
    }

    /// Runs the given strategy.
    pub fn run<B: Backend>(
        strategy: InitStrategyType,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        match strategy {
            InitStrategyType::NoInit => Self::run_timed(&NoInit, problem, scope, config),
            InitStrategyType::CustomDisjuncts => {
                Self::run_timed(&CustomDisjuncts, problem, scope, config)
            }
            InitStrategyType::FixDisjuncts => Self::run_timed(&FixDisjuncts, problem, scope, config),
            InitStrategyType::MaxBinary => Self::run_timed(&MaxBinary, problem, scope, config),
            InitStrategyType::SetCovering => Self::run_timed(&SetCovering, problem, scope, config),
        }
    }

    fn run_timed<S: InitStrategy, B: Backend>(
        strategy: &S,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        let start = Instant::now();
        let mip_before = scope.counters().mip_iteration;
        info!(event = "init_start", strategy = strategy.strategy_name());

        let result = strategy.run(problem, scope, config);

        info!(
            event = "init_end",
            strategy = strategy.strategy_name(),
            duration_ms = start.elapsed().as_millis() as u64,
            relaxation_solves = scope.counters().mip_iteration - mip_before,
            success = matches!(result, Ok(true)),
            lower_bound = scope.lower_bound(),
            upper_bound = scope.upper_bound(),
        );
        result
    }
}
