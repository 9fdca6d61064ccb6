//! Suspension of linearization cuts.

use std::ops::{Deref, DerefMut};

use lboa_core::MasterBlock;

/// Deactivates every active linearization cut until dropped.
///
/// No-good cuts stay active. Cuts added while the guard is alive are not
/// touched on drop.
pub struct SuspendedLinearizations<'a> {
    master: &'a mut MasterBlock,
    suspended: Vec<usize>,
}

impl<'a> SuspendedLinearizations<'a> {
    pub fn new(master: &'a mut MasterBlock) -> Self {
        let mut suspended = Vec::new();
        for (index, cut) in master.model_mut().cuts_mut().iter_mut().enumerate() {
            if cut.active && cut.is_linearization() {
                cut.active = false;
                suspended.push(index);
            }
        }
        Self { master, suspended }
    }

    pub fn suspended_count(&self) -> usize {
        self.suspended.len()
    }
}

impl Deref for SuspendedLinearizations<'_> {
    type Target = MasterBlock;

    fn deref(&self) -> &MasterBlock {
        self.master
    }
}

impl DerefMut for SuspendedLinearizations<'_> {
    fn deref_mut(&mut self) -> &mut MasterBlock {
        self.master
    }
}

impl Drop for SuspendedLinearizations<'_> {
    fn drop(&mut self) {
        let cuts = self.master.model_mut().cuts_mut();
        for &index in &self.suspended {
            if let Some(cut) = cuts.get_mut(index) {
                cut.active = true;
            }
        }
    }
}
