//! Bound preservation around relaxation solves.

use std::ops::{Deref, DerefMut};

use lboa_core::{MasterBlock, VarId};

/// Captured `(lb, ub)` pairs for every variable of the master relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsSnapshot {
    bounds: Vec<(VarId, Option<f64>, Option<f64>)>,
}

impl BoundsSnapshot {
    pub fn capture(master: &MasterBlock) -> Self {
        let variables = master.model().variables();
        let bounds = master
            .all_mip_variables()
            .into_iter()
            .map(|id| {
                let (lb, ub) = variables[id.index()].bounds();
                (id, lb, ub)
            })
            .collect();
        Self { bounds }
    }

    /// Writes every captured pair back verbatim.
    pub fn restore(&self, master: &mut MasterBlock) {
        let variables = master.model_mut().variables_mut();
        for &(id, lb, ub) in &self.bounds {
            if let Some(var) = variables.get_mut(id.index()) {
                var.lb = lb;
                var.ub = ub;
            }
        }
    }

    pub fn get(&self, id: VarId) -> Option<(Option<f64>, Option<f64>)> {
        self.bounds
            .iter()
            .find(|(v, _, _)| *v == id)
            .map(|&(_, lb, ub)| (lb, ub))
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Restores master bounds on drop when bound preservation is enabled.
pub struct BoundsGuard<'a> {
    master: &'a mut MasterBlock,
    snapshot: Option<BoundsSnapshot>,
}

impl<'a> BoundsGuard<'a> {
    pub fn new(master: &'a mut MasterBlock, preserve: bool) -> Self {
        let snapshot = if preserve {
            Some(BoundsSnapshot::capture(master))
        } else {
            None
        };
        Self { master, snapshot }
    }

    pub fn snapshot(&self) -> Option<&BoundsSnapshot> {
        self.snapshot.as_ref()
    }
}

impl Deref for BoundsGuard<'_> {
    type Target = MasterBlock;

    fn deref(&self) -> &MasterBlock {
        self.master
    }
}

impl DerefMut for BoundsGuard<'_> {
    fn deref_mut(&mut self) -> &mut MasterBlock {
        self.master
    }
}

impl Drop for BoundsGuard<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(self.master);
        }
    }
}
