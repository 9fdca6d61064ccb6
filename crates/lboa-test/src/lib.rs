//! Shared test fixtures for LBOA crates.
//!
//! This crate provides small in-memory backends and sample models.
//! It does NOT depend on `lboa-init` so that crate can use it as a
//! dev-dependency without a cycle.
//!
//! - [`mip`] - Exhaustive MIP backend over the binary variables
//! - [`nlp`] - Scripted subproblem backend
//! - [`cuts`] - Cut generator that records its calls
//! - [`models`] - Sample disjunctive models
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! lboa-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use lboa_test::{models::disjunctive_problem, TestBackend};
//! ```

pub mod cuts;
pub mod mip;
pub mod models;
pub mod nlp;

use lboa_config::GdpoptConfig;
use lboa_core::{
    CutGenerator, MasterBlock, MipSolver, NlpSolver, ObjectiveSense, Result, SubproblemBlock,
};

// Re-export commonly used types at crate root for convenience
pub use cuts::{CutCall, RecordingCutGenerator};
pub use mip::EnumeratingMipSolver;
pub use nlp::ScriptedNlpSolver;

/// Backend bundling the three fixtures.
#[derive(Debug, Default)]
pub struct TestBackend {
    pub mip: EnumeratingMipSolver,
    pub nlp: ScriptedNlpSolver,
    pub cuts: RecordingCutGenerator,
}

impl TestBackend {
    pub fn new(mip: EnumeratingMipSolver, nlp: ScriptedNlpSolver) -> Self {
        Self {
            mip,
            nlp,
            cuts: RecordingCutGenerator::default(),
        }
    }
}

impl MipSolver for TestBackend {
    fn solve_relaxation(
        &mut self,
        master: &mut MasterBlock,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        self.mip.solve_relaxation(master, config)
    }
}

impl NlpSolver for TestBackend {
    fn solve_subproblem(
        &mut self,
        subproblem: &mut SubproblemBlock,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        self.nlp.solve_subproblem(subproblem, config)
    }
}

impl CutGenerator for TestBackend {
    fn add_cuts_for_mode(
        &mut self,
        subproblem: &SubproblemBlock,
        master: &mut MasterBlock,
        sense: ObjectiveSense,
        config: &GdpoptConfig,
    ) -> Result<()> {
        self.cuts.add_cuts_for_mode(subproblem, master, sense, config)
    }

    fn add_no_good_cut(&mut self, master: &mut MasterBlock, config: &GdpoptConfig) -> Result<()> {
        self.cuts.add_no_good_cut(master, config)
    }
}
