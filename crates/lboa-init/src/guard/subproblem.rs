//! Fixing the master's discrete solution into the subproblem.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use lboa_config::GdpoptConfig;
use lboa_core::{LboaError, MasterBlock, Result, SubproblemBlock, VarId};

/// Subproblem with the master's discrete choices fixed.
///
/// On drop every touched variable gets its previous value and fixed flag
/// back and every deactivated disjunct is reactivated. Continuous values
/// written by the subproblem solve are kept.
pub struct FixedSubproblem<'a> {
    subproblem: &'a mut SubproblemBlock,
    saved: Vec<(VarId, Option<f64>, bool)>,
    deactivated: Vec<usize>,
}

impl FixedSubproblem<'_> {
    /// Variables fixed by this guard.
    pub fn fixed_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.saved.iter().map(|&(id, _, _)| id)
    }

    /// Disjuncts deactivated because their indicator is fixed to zero.
    pub fn deactivated_disjuncts(&self) -> &[usize] {
        &self.deactivated
    }

    fn fix_var(&mut self, id: VarId, value: f64) -> Result<()> {
        let var = self.subproblem.model_mut().var_mut(id)?;
        self.saved.push((id, var.value, var.fixed));
        var.fix(value);
        Ok(())
    }
}

/// Copies the master's discrete solution into the subproblem and fixes it.
///
/// Indicators are always fixed; other discrete variables only when
/// `force_subproblem_nlp` is set. Disjuncts whose indicator is fixed to zero
/// are deactivated.
///
/// # Errors
///
/// Fails when a discrete master variable has no value or a value farther
/// than `integer_tolerance` from an integer. Anything fixed before the
/// failure is undone.
pub fn fix_master_solution_in_subproblem<'a>(
    master: &MasterBlock,
    subproblem: &'a mut SubproblemBlock,
    config: &GdpoptConfig,
) -> Result<FixedSubproblem<'a>> {
    let indicators: HashSet<VarId> = master.indicators().into_iter().collect();
    let mut guard = FixedSubproblem {
        subproblem,
        saved: Vec::new(),
        deactivated: Vec::new(),
    };

    for (id, var) in master.model().var_ids().zip(master.model().variables()) {
        if !var.domain.is_discrete() {
            continue;
        }
        if !indicators.contains(&id) && !config.force_subproblem_nlp {
            continue;
        }
        let value = var
            .value
            .ok_or_else(|| LboaError::MissingValue(var.name.clone()))?;
        let rounded = var
            .integral_value(config.integer_tolerance)
            .ok_or_else(|| LboaError::NonIntegralValue {
                name: var.name.clone(),
                value,
            })?;
        guard.fix_var(id, rounded)?;
    }

    let model = guard.subproblem.model_mut();
    let mut to_deactivate = Vec::new();
    for (index, disjunct) in model.disjuncts().iter().enumerate() {
        let off = model
            .var(disjunct.indicator)?
            .value
            .is_some_and(|v| v.abs() <= config.integer_tolerance);
        if disjunct.active && off {
            to_deactivate.push(index);
        }
    }
    for &index in &to_deactivate {
        model.disjuncts_mut()[index].active = false;
    }
    guard.deactivated = to_deactivate;

    Ok(guard)
}

impl Deref for FixedSubproblem<'_> {
    type Target = SubproblemBlock;

    fn deref(&self) -> &SubproblemBlock {
        self.subproblem
    }
}

impl DerefMut for FixedSubproblem<'_> {
    fn deref_mut(&mut self) -> &mut SubproblemBlock {
        self.subproblem
    }
}

impl Drop for FixedSubproblem<'_> {
    fn drop(&mut self) {
        let model = self.subproblem.model_mut();
        for &index in &self.deactivated {
            if let Some(disjunct) = model.disjuncts_mut().get_mut(index) {
                disjunct.active = true;
            }
        }
        for &(id, value, fixed) in self.saved.iter().rev() {
            if let Ok(var) = model.var_mut(id) {
                var.value = value;
                var.fixed = fixed;
            }
        }
    }
}
