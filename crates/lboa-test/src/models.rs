//! Sample disjunctive models.
//!
//! # Example
//!
//! ```
//! use lboa_test::models::disjunctive_problem;
//!
//! // Two disjunctions: the first with a nonlinear and a linear branch,
//! // the second with two nonlinear branches.
//! let problem = disjunctive_problem(&[&[true, false], &[true, true]]);
//! assert_eq!(problem.master.disjuncts().len(), 4);
//! ```

use lboa_core::{
    Constraint, Disjunct, GdpModel, GdpProblem, LinearExpr, Objective, VarId, Variable,
};

/// Builds a model with one exactly-one disjunction per entry of
/// `disjunctions`; each flag says whether that disjunct is nonlinear.
///
/// Disjunct `k` of disjunction `j` is named `d{j}_{k}` with indicator
/// `y{j}_{k}`. A continuous `cost` in `[0, 100]` is minimized.
pub fn disjunctive_model(disjunctions: &[&[bool]]) -> GdpModel {
    let mut model = GdpModel::new("gdp");
    let mut members = Vec::new();
    for (j, flags) in disjunctions.iter().enumerate() {
        let mut disjunct_indices = Vec::new();
        for (k, &nonlinear) in flags.iter().enumerate() {
            let indicator = model.add_variable(Variable::binary(format!("y{}_{}", j, k)));
            let constraint = if nonlinear {
                Constraint::with_degree(format!("d{}_{}_q", j, k), Some(2))
            } else {
                Constraint::linear(format!("d{}_{}_l", j, k))
            };
            let disjunct = Disjunct::new(format!("d{}_{}", j, k), indicator)
                .with_constraint(Constraint::linear(format!("d{}_{}_bound", j, k)))
                .with_constraint(constraint);
            disjunct_indices.push(model.add_disjunct(disjunct));
        }
        members.push((format!("disjunction_{}", j), disjunct_indices));
    }
    for (name, disjunct_indices) in members {
        model.add_disjunction(name, disjunct_indices, true);
    }
    let cost = model.add_variable(Variable::continuous("cost").with_bounds(Some(0.0), Some(100.0)));
    model.add_objective(Objective::minimize("total_cost", LinearExpr::sum([cost])));
    model
}

/// Three paired copies of [`disjunctive_model`].
pub fn disjunctive_problem(disjunctions: &[&[bool]]) -> GdpProblem {
    GdpProblem::from_working_model(disjunctive_model(disjunctions))
}

/// Indicator id of disjunct `name` in `model`.
///
/// # Panics
///
/// Panics if no disjunct has that name.
pub fn indicator_of(model: &GdpModel, name: &str) -> VarId {
    model
        .disjuncts()
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.indicator)
        .unwrap_or_else(|| panic!("no disjunct named {}", name))
}

/// `(lb, ub)` of every variable, in declaration order.
pub fn bounds_of(model: &GdpModel) -> Vec<(Option<f64>, Option<f64>)> {
    model.variables().iter().map(|v| v.bounds()).collect()
}

/// Fixed flag of every variable, in declaration order.
pub fn fixed_flags(model: &GdpModel) -> Vec<bool> {
    model.variables().iter().map(|v| v.fixed).collect()
}
