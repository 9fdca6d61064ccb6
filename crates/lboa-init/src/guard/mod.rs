//! Scoped mutations of the master relaxation and the subproblem.
//!
//! Each guard mutably borrows its block, applies a temporary change on
//! construction and undoes it in `Drop`, so the change is reverted on early
//! returns, `?` propagation and unwinding alike. Guards deref to the block
//! they wrap and nest by borrowing one another.

mod bounds;
mod indicator;
mod linearization;
mod objective;
mod subproblem;

pub use bounds::{BoundsGuard, BoundsSnapshot};
pub use indicator::IndicatorFixGuard;
pub use linearization::SuspendedLinearizations;
pub use objective::ObjectiveSwap;
pub use subproblem::{fix_master_solution_in_subproblem, FixedSubproblem};
