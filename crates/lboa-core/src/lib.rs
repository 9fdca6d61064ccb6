//! LBOA Core - model types and collaborator contracts
//!
//! This crate provides the fundamental abstractions shared by the
//! initialization strategies:
//! - Model types for generalized disjunctive programs
//! - Utility blocks pairing the original, master and subproblem copies
//! - Collaborator traits for the MIP/NLP backends and cut generation

pub mod block;
pub mod error;
pub mod model;
pub mod solver;

pub use block::{GdpProblem, MasterBlock, OriginalBlock, SubproblemBlock};
pub use error::{LboaError, Result};
pub use model::{
    Constraint, Cut, CutKind, Disjunct, Disjunction, Domain, GdpModel, LinearExpr, NoGoodCut,
    Objective, ObjectiveSense, VarId, Variable,
};
pub use solver::{Backend, CutGenerator, MipSolver, NlpSolver};
