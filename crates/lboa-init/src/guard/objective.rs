//! Temporary objectives on the master relaxation.

use std::ops::{Deref, DerefMut};

use lboa_core::{LinearExpr, MasterBlock, Objective, Result};

/// Replaces the active objective for the lifetime of the guard.
///
/// On drop the temporary objective is removed and the original one is
/// reactivated. Cuts added meanwhile are left in place.
pub struct ObjectiveSwap<'a> {
    master: &'a mut MasterBlock,
    original: usize,
    temporary: usize,
}

impl<'a> ObjectiveSwap<'a> {
    /// Deactivates the unique active objective and installs `objective`.
    ///
    /// # Errors
    ///
    /// Fails unless exactly one objective is active.
    pub fn install(master: &'a mut MasterBlock, mut objective: Objective) -> Result<Self> {
        let original = master.model().active_objective_index()?;
        let model = master.model_mut();
        model.objectives_mut()[original].active = false;
        objective.active = true;
        let temporary = model.add_objective(objective);
        Ok(Self {
            master,
            original,
            temporary,
        })
    }

    /// Maximizes the sum of all binaries that are not fixed.
    pub fn maximize_free_binaries(master: &'a mut MasterBlock) -> Result<Self> {
        let expr = LinearExpr::sum(master.model().free_binaries());
        Self::install(master, Objective::maximize("max_binary_obj", expr))
    }

    /// Installs an empty maximization objective to be reweighted per iteration.
    pub fn set_covering(master: &'a mut MasterBlock) -> Result<Self> {
        Self::install(master, Objective::maximize("set_cover_obj", LinearExpr::new()))
    }

    pub fn set_expr(&mut self, expr: LinearExpr) {
        self.master.model_mut().objectives_mut()[self.temporary].expr = expr;
    }

    pub fn temporary(&self) -> &Objective {
        &self.master.model().objectives()[self.temporary]
    }

    pub fn original(&self) -> &Objective {
        &self.master.model().objectives()[self.original]
    }
}

impl Deref for ObjectiveSwap<'_> {
    type Target = MasterBlock;

    fn deref(&self) -> &MasterBlock {
        self.master
    }
}

impl DerefMut for ObjectiveSwap<'_> {
    fn deref_mut(&mut self) -> &mut MasterBlock {
        self.master
    }
}

impl Drop for ObjectiveSwap<'_> {
    fn drop(&mut self) {
        let model = self.master.model_mut();
        if self.temporary < model.objectives().len() {
            model.remove_objective(self.temporary);
        }
        if let Some(objective) = model.objectives_mut().get_mut(self.original) {
            objective.active = true;
        }
    }
}
