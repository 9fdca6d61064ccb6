//! Initialization from user-supplied disjunct sets.

use std::collections::HashSet;

use lboa_config::{GdpoptConfig, InitStrategyType};
use lboa_core::{Backend, GdpProblem, LboaError, OriginalBlock, Result};
use tracing::{error, info, warn};

use super::InitStrategy;
use crate::guard::{BoundsGuard, IndicatorFixGuard};
use crate::scope::SolveScope;
use crate::step::{add_no_good_cut, fix_master_solution_solve_subproblem_and_add_cuts, solve_master};

/// Solves the master once per entry of `custom_init_disjuncts`, with exactly
/// the named disjuncts selected.
///
/// A set whose relaxation is infeasible is logged and skipped. Indicators
/// the model already fixes are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomDisjuncts;

impl InitStrategy for CustomDisjuncts {
    fn run<B: Backend>(
        &self,
        problem: &mut GdpProblem,
        scope: &mut SolveScope<B>,
        config: &GdpoptConfig,
    ) -> Result<bool> {
        let GdpProblem {
            original,
            master,
            subproblem,
        } = problem;
        if original.disjuncts().len() != master.disjuncts().len() {
            return Err(LboaError::ModelMismatch(format!(
                "original has {} disjuncts, master has {}",
                original.disjuncts().len(),
                master.disjuncts().len()
            )));
        }

        for (set_index, active_set) in config.custom_init_disjuncts.iter().enumerate() {
            info!(
                event = "custom_set_start",
                set = set_index,
                disjuncts = ?active_set,
            );

            let feasible = {
                let mut bounds = BoundsGuard::new(master, config.mip_presolve);
                let mut fixings = IndicatorFixGuard::new(&mut bounds);
                let used = select_disjuncts(&mut fixings, original, active_set, config)?;

                let unused: Vec<&str> = active_set
                    .iter()
                    .map(String::as_str)
                    .filter(|name| !used.contains(name))
                    .collect();
                if !unused.is_empty() {
                    warn!(
                        set = set_index,
                        unused = ?unused,
                        "Custom initialization disjuncts do not match any active disjunct and were unused"
                    );
                }

                let feasible = solve_master(&mut fixings, scope, config)?;
                if feasible {
                    fixings.keep_solution();
                }
                feasible
            };

            if feasible {
                fix_master_solution_solve_subproblem_and_add_cuts(master, subproblem, scope, config)?;
                add_no_good_cut(master, scope, config)?;
            } else {
                error!(
                    set = set_index,
                    disjuncts = ?active_set,
                    "Relaxation infeasible for custom initialization disjunct set; skipping it and continuing"
                );
            }
        }
        Ok(true)
    }

    fn strategy_name(&self) -> &'static str {
        InitStrategyType::CustomDisjuncts.name()
    }
}

// Fixes each master indicator on or off according to `active_set` and
// returns the names that matched an active original disjunct.
fn select_disjuncts<'o>(
    fixings: &mut IndicatorFixGuard<'_>,
    original: &'o OriginalBlock,
    active_set: &[String],
    config: &GdpoptConfig,
) -> Result<HashSet<&'o str>> {
    let mut used = HashSet::new();
    let indicators = fixings.indicators();
    for (disjunct, indicator) in original.disjuncts().iter().zip(indicators) {
        let wanted = disjunct.active && active_set.iter().any(|n| *n == disjunct.name);
        if wanted {
            used.insert(disjunct.name.as_str());
        }
        if !fixings.fix(indicator, wanted)? {
            let current = fixings
                .model()
                .var(indicator)?
                .integral_value(config.integer_tolerance);
            if current != Some(if wanted { 1.0 } else { 0.0 }) {
                warn!(
                    disjunct = %disjunct.name,
                    requested = wanted,
                    "Indicator is already fixed by the model; keeping its fixed value"
                );
            }
        }
    }
    Ok(used)
}
