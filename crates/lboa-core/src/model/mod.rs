//! Generalized disjunctive program model.
//!
//! A [`GdpModel`] holds variables, disjuncts, disjunctions, objectives and
//! the cuts accumulated on it. The original model, the master relaxation and
//! the subproblem are three copies of the same declaration order, so a
//! [`VarId`] or a disjunct index means the same thing in each copy.

mod cut;
mod disjunct;
mod expr;
mod gdp;
mod objective;
mod variable;

pub use cut::{Cut, CutKind, NoGoodCut};
pub use disjunct::{Constraint, Disjunct, Disjunction};
pub use expr::LinearExpr;
pub use gdp::GdpModel;
pub use objective::{Objective, ObjectiveSense};
pub use variable::{Domain, VarId, Variable};
