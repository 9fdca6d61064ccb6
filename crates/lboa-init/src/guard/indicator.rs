//! Temporary fixing of disjunct indicators.

use std::ops::{Deref, DerefMut};

use lboa_core::{MasterBlock, Result, VarId};

/// Fixes indicators on the master and unfixes, on drop, only the ones it
/// fixed itself.
///
/// On drop the fixed indicators also get their previous values back, unless
/// [`keep_solution`](Self::keep_solution) was called after a feasible solve;
/// the relaxation solution then stays readable after the guard ends.
pub struct IndicatorFixGuard<'a> {
    master: &'a mut MasterBlock,
    fixed_here: Vec<VarId>,
    prior_values: Vec<Option<f64>>,
    keep_solution: bool,
}

impl<'a> IndicatorFixGuard<'a> {
    pub fn new(master: &'a mut MasterBlock) -> Self {
        Self {
            master,
            fixed_here: Vec::new(),
            prior_values: Vec::new(),
            keep_solution: false,
        }
    }

    /// Keeps the current values of the fixed indicators on drop.
    pub fn keep_solution(&mut self) {
        self.keep_solution = true;
    }

    /// Fixes `indicator` to `value` unless it is already fixed.
    ///
    /// Returns `false` when the indicator was fixed beforehand; it is then
    /// left exactly as it was.
    pub fn fix(&mut self, indicator: VarId, value: bool) -> Result<bool> {
        let var = self.master.model_mut().var_mut(indicator)?;
        if var.fixed {
            return Ok(false);
        }
        self.prior_values.push(var.value);
        var.fix(if value { 1.0 } else { 0.0 });
        self.fixed_here.push(indicator);
        Ok(true)
    }

    pub fn fixed_here(&self) -> &[VarId] {
        &self.fixed_here
    }
}

impl Deref for IndicatorFixGuard<'_> {
    type Target = MasterBlock;

    fn deref(&self) -> &MasterBlock {
        self.master
    }
}

impl DerefMut for IndicatorFixGuard<'_> {
    fn deref_mut(&mut self) -> &mut MasterBlock {
        self.master
    }
}

impl Drop for IndicatorFixGuard<'_> {
    fn drop(&mut self) {
        let model = self.master.model_mut();
        for (&id, &prior) in self.fixed_here.iter().zip(&self.prior_values) {
            if let Ok(var) = model.var_mut(id) {
                var.unfix();
                if !self.keep_solution {
                    var.value = prior;
                }
            }
        }
    }
}
