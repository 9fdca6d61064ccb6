//! Cut generator that records its calls.

use lboa_config::{Algorithm, GdpoptConfig};
use lboa_core::{
    Cut, CutGenerator, LinearExpr, MasterBlock, ObjectiveSense, Result, SubproblemBlock, VarId,
};

/// One `add_cuts_for_mode` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CutCall {
    pub algorithm: Algorithm,
    pub sense: ObjectiveSense,
    pub objective_value: Option<f64>,
}

/// Adds one placeholder linearization per call, over the indicators that
/// are on in the subproblem, and counts no-good cuts.
#[derive(Debug, Clone, Default)]
pub struct RecordingCutGenerator {
    calls: Vec<CutCall>,
    no_good_calls: usize,
}

impl RecordingCutGenerator {
    pub fn calls(&self) -> &[CutCall] {
        &self.calls
    }

    pub fn no_good_calls(&self) -> usize {
        self.no_good_calls
    }
}

impl CutGenerator for RecordingCutGenerator {
    fn add_cuts_for_mode(
        &mut self,
        subproblem: &SubproblemBlock,
        master: &mut MasterBlock,
        sense: ObjectiveSense,
        config: &GdpoptConfig,
    ) -> Result<()> {
        let model = subproblem.model();
        let selected: Vec<VarId> = model
            .disjuncts()
            .iter()
            .filter(|d| d.active)
            .map(|d| d.indicator)
            .collect();
        self.calls.push(CutCall {
            algorithm: config.algorithm,
            sense,
            objective_value: subproblem.objective_value().ok(),
        });
        let name = format!("oa_cut_{}", self.calls.len());
        master
            .model_mut()
            .add_cut(Cut::linearization(name, LinearExpr::sum(selected), 1.0));
        Ok(())
    }

    fn add_no_good_cut(&mut self, master: &mut MasterBlock, config: &GdpoptConfig) -> Result<()> {
        let cut = master
            .model()
            .no_good_cut_for_current(config.integer_tolerance)?;
        master.model_mut().add_cut(Cut::no_good(cut));
        self.no_good_calls += 1;
        Ok(())
    }
}
