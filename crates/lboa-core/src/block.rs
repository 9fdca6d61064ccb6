//! Utility blocks around the three model copies.
//!
//! The outer solver keeps an untouched original model, a master relaxation
//! it strengthens with cuts, and a subproblem it solves with the discrete
//! choices fixed. Disjuncts and variables are paired across copies by
//! declaration order.

use crate::error::{LboaError, Result};
use crate::model::{Disjunct, GdpModel, Objective, VarId};

/// The master relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterBlock {
    model: GdpModel,
}

impl MasterBlock {
    pub fn new(model: GdpModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &GdpModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut GdpModel {
        &mut self.model
    }

    pub fn into_model(self) -> GdpModel {
        self.model
    }

    /// Disjuncts in declaration order.
    pub fn disjuncts(&self) -> &[Disjunct] {
        self.model.disjuncts()
    }

    /// Every decision variable, discrete and continuous, in declaration order.
    pub fn all_mip_variables(&self) -> Vec<VarId> {
        self.model.var_ids().collect()
    }

    pub fn active_objective(&self) -> Result<&Objective> {
        self.model.active_objective()
    }

    /// Indicator ids of every disjunct, in disjunct order.
    pub fn indicators(&self) -> Vec<VarId> {
        self.model.disjuncts().iter().map(|d| d.indicator).collect()
    }
}

/// The subproblem solved with the master's discrete choices fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubproblemBlock {
    model: GdpModel,
}

impl SubproblemBlock {
    pub fn new(model: GdpModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &GdpModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut GdpModel {
        &mut self.model
    }

    pub fn disjuncts(&self) -> &[Disjunct] {
        self.model.disjuncts()
    }

    /// Value of the subproblem objective at its current solution.
    pub fn objective_value(&self) -> Result<f64> {
        self.model.objective_value()
    }
}

/// Read-only view of the model as the user declared it.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalBlock {
    model: GdpModel,
}

impl OriginalBlock {
    pub fn new(model: GdpModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &GdpModel {
        &self.model
    }

    pub fn disjuncts(&self) -> &[Disjunct] {
        self.model.disjuncts()
    }
}

/// The three paired copies a strategy works on.
#[derive(Debug, Clone)]
pub struct GdpProblem {
    pub original: OriginalBlock,
    pub master: MasterBlock,
    pub subproblem: SubproblemBlock,
}

impl GdpProblem {
    /// Pairs three copies, checking that they line up.
    ///
    /// # Errors
    ///
    /// Returns [`LboaError::ModelMismatch`] when disjunct counts differ
    /// between any two copies, or variable counts differ between master and
    /// subproblem.
    pub fn new(original: GdpModel, master: GdpModel, subproblem: GdpModel) -> Result<Self> {
        let counts = [
            original.disjuncts().len(),
            master.disjuncts().len(),
            subproblem.disjuncts().len(),
        ];
        if counts.iter().any(|&c| c != counts[0]) {
            return Err(LboaError::ModelMismatch(format!(
                "disjunct counts differ: original {}, master {}, subproblem {}",
                counts[0], counts[1], counts[2]
            )));
        }
        if master.variables().len() != subproblem.variables().len() {
            return Err(LboaError::ModelMismatch(format!(
                "variable counts differ: master {}, subproblem {}",
                master.variables().len(),
                subproblem.variables().len()
            )));
        }
        Ok(Self {
            original: OriginalBlock::new(original),
            master: MasterBlock::new(master),
            subproblem: SubproblemBlock::new(subproblem),
        })
    }

    /// Builds all three copies from one working model.
    pub fn from_working_model(model: GdpModel) -> Self {
        Self {
            original: OriginalBlock::new(model.clone()),
            master: MasterBlock::new(model.clone()),
            subproblem: SubproblemBlock::new(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Disjunct, LinearExpr, Objective, Variable};

    fn model_with_disjuncts(n: usize) -> GdpModel {
        let mut model = GdpModel::new("m");
        for i in 0..n {
            let y = model.add_variable(Variable::binary(format!("y{}", i)));
            model.add_disjunct(Disjunct::new(format!("d{}", i), y));
        }
        model.add_objective(Objective::minimize("obj", LinearExpr::new()));
        model
    }

    #[test]
    fn test_pairing_accepts_matching_copies() {
        let problem = GdpProblem::new(
            model_with_disjuncts(3),
            model_with_disjuncts(3),
            model_with_disjuncts(3),
        )
        .unwrap();
        assert_eq!(problem.master.disjuncts().len(), 3);
        assert_eq!(problem.master.all_mip_variables().len(), 3);
        assert_eq!(problem.master.indicators(), vec![VarId(0), VarId(1), VarId(2)]);
    }

    #[test]
    fn test_pairing_rejects_disjunct_mismatch() {
        let result = GdpProblem::new(
            model_with_disjuncts(2),
            model_with_disjuncts(3),
            model_with_disjuncts(3),
        );
        assert!(matches!(result, Err(LboaError::ModelMismatch(_))));
    }

    #[test]
    fn test_pairing_rejects_variable_mismatch() {
        let mut subproblem = model_with_disjuncts(2);
        subproblem.add_variable(Variable::continuous("extra"));
        let result = GdpProblem::new(model_with_disjuncts(2), model_with_disjuncts(2), subproblem);
        assert!(matches!(result, Err(LboaError::ModelMismatch(_))));
    }
}
