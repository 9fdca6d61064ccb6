//! The model container.

use crate::error::{LboaError, Result};

use super::{Cut, Disjunct, Disjunction, NoGoodCut, Objective, VarId, Variable};

/// A generalized disjunctive program.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpModel {
    name: String,
    variables: Vec<Variable>,
    disjuncts: Vec<Disjunct>,
    disjunctions: Vec<Disjunction>,
    objectives: Vec<Objective>,
    cuts: Vec<Cut>,
}

impl GdpModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            disjuncts: Vec::new(),
            disjunctions: Vec::new(),
            objectives: Vec::new(),
            cuts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // === Building ===

    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    /// Adds a disjunct and returns its index.
    pub fn add_disjunct(&mut self, disjunct: Disjunct) -> usize {
        self.disjuncts.push(disjunct);
        self.disjuncts.len() - 1
    }

    pub fn add_disjunction(
        &mut self,
        name: impl Into<String>,
        disjuncts: Vec<usize>,
        exactly_one: bool,
    ) -> usize {
        self.disjunctions.push(Disjunction {
            name: name.into(),
            disjuncts,
            exactly_one,
        });
        self.disjunctions.len() - 1
    }

    /// Adds an objective and returns its index.
    pub fn add_objective(&mut self, objective: Objective) -> usize {
        self.objectives.push(objective);
        self.objectives.len() - 1
    }

    /// Removes and returns the objective at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_objective(&mut self, index: usize) -> Objective {
        self.objectives.remove(index)
    }

    pub fn add_cut(&mut self, cut: Cut) {
        self.cuts.push(cut);
    }

    // === Access ===

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut [Variable] {
        &mut self.variables
    }

    pub fn var(&self, id: VarId) -> Result<&Variable> {
        self.variables
            .get(id.index())
            .ok_or(LboaError::UnknownVariable(id.index()))
    }

    pub fn var_mut(&mut self, id: VarId) -> Result<&mut Variable> {
        self.variables
            .get_mut(id.index())
            .ok_or(LboaError::UnknownVariable(id.index()))
    }

    /// Ids of every variable, in declaration order.
    pub fn var_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.variables.len()).map(VarId)
    }

    pub fn disjuncts(&self) -> &[Disjunct] {
        &self.disjuncts
    }

    pub fn disjuncts_mut(&mut self) -> &mut [Disjunct] {
        &mut self.disjuncts
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn objectives_mut(&mut self) -> &mut [Objective] {
        &mut self.objectives
    }

    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    pub fn cuts_mut(&mut self) -> &mut [Cut] {
        &mut self.cuts
    }

    pub fn no_good_cut_count(&self) -> usize {
        self.cuts.iter().filter(|c| c.as_no_good().is_some()).count()
    }

    pub fn linearization_count(&self) -> usize {
        self.cuts.iter().filter(|c| c.is_linearization()).count()
    }

    // === Queries ===

    /// Index of the unique active objective.
    ///
    /// # Errors
    ///
    /// Fails when no objective, or more than one, is active.
    pub fn active_objective_index(&self) -> Result<usize> {
        let mut active = self
            .objectives
            .iter()
            .enumerate()
            .filter(|(_, o)| o.active)
            .map(|(i, _)| i);
        let first = active
            .next()
            .ok_or_else(|| LboaError::NoActiveObjective(self.name.clone()))?;
        let extra = active.count();
        if extra > 0 {
            return Err(LboaError::MultipleActiveObjectives {
                model: self.name.clone(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    pub fn active_objective(&self) -> Result<&Objective> {
        let index = self.active_objective_index()?;
        Ok(&self.objectives[index])
    }

    /// Value of the active objective at the current variable values.
    pub fn objective_value(&self) -> Result<f64> {
        let objective = self.active_objective()?;
        objective
            .expr
            .evaluate(&self.variables)
            .ok_or_else(|| LboaError::MissingValue(format!("objective '{}'", objective.name)))
    }

    /// Binary variables that are not fixed.
    pub fn free_binaries(&self) -> Vec<VarId> {
        self.var_ids()
            .filter(|&id| {
                let v = &self.variables[id.index()];
                v.is_binary() && !v.fixed
            })
            .collect()
    }

    /// Builds a no-good cut excluding the current assignment of every binary
    /// variable.
    ///
    /// # Errors
    ///
    /// Fails when a binary has no value or a value farther than `tolerance`
    /// from 0 or 1.
    pub fn no_good_cut_for_current(&self, tolerance: f64) -> Result<NoGoodCut> {
        let mut assignment = Vec::new();
        for (id, var) in self.var_ids().zip(&self.variables) {
            if !var.is_binary() {
                continue;
            }
            let value = var
                .value
                .ok_or_else(|| LboaError::MissingValue(var.name.clone()))?;
            let rounded = var
                .integral_value(tolerance)
                .ok_or_else(|| LboaError::NonIntegralValue {
                    name: var.name.clone(),
                    value,
                })?;
            assignment.push((id, rounded >= 0.5));
        }
        Ok(NoGoodCut::new(assignment))
    }
}
