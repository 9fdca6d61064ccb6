//! Contracts for the collaborators the initialization phase drives.
//!
//! The MIP and NLP backends and the outer approximation cut mathematics live
//! outside this workspace; strategies only decide when they are invoked.

use lboa_config::GdpoptConfig;

use crate::block::{MasterBlock, SubproblemBlock};
use crate::error::Result;
use crate::model::{Cut, ObjectiveSense};

/// Solves the master relaxation in place.
pub trait MipSolver {
    /// Returns `true` if a feasible solution was found. On success every
    /// variable of the master holds its solution value.
    fn solve_relaxation(&mut self, master: &mut MasterBlock, config: &GdpoptConfig)
        -> Result<bool>;
}

/// Solves the subproblem with all disjunctive choices fixed.
pub trait NlpSolver {
    /// Returns `true` if the subproblem is feasible. On success the
    /// subproblem's variables hold the solution.
    fn solve_subproblem(
        &mut self,
        subproblem: &mut SubproblemBlock,
        config: &GdpoptConfig,
    ) -> Result<bool>;
}

/// Appends cuts to the master relaxation.
pub trait CutGenerator {
    /// Adds the linearization cuts for the configured algorithm, taken at the
    /// solution currently held by `subproblem`.
    fn add_cuts_for_mode(
        &mut self,
        subproblem: &SubproblemBlock,
        master: &mut MasterBlock,
        sense: ObjectiveSense,
        config: &GdpoptConfig,
    ) -> Result<()>;

    /// Adds a cut excluding the master's current binary assignment.
    fn add_no_good_cut(&mut self, master: &mut MasterBlock, config: &GdpoptConfig) -> Result<()> {
        let cut = master
            .model()
            .no_good_cut_for_current(config.integer_tolerance)?;
        master.model_mut().add_cut(Cut::no_good(cut));
        Ok(())
    }
}

/// Everything a strategy needs from the outside world.
pub trait Backend: MipSolver + NlpSolver + CutGenerator {}

impl<T: MipSolver + NlpSolver + CutGenerator> Backend for T {}
