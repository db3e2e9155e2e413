//! Tier-2 cost: composed actions
//!
//! Every semantic line of a composed action's entry routine costs one line,
//! except lines invoking a primitive's entry point, which cost that
//! primitive's tier-1 cost instead. A line whose receiver is missing from
//! the primitive table falls back to one line and never fails.

use serde::{Deserialize, Serialize};

use crate::callsite::{CallSiteIndex, UnmatchedCallSite};
use crate::error::{TierlocError, TierlocResult};
use crate::markers::Markers;
use crate::table::{CostTable, Tier};

/// Cost of one composed action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositeCost {
    /// Total after substitution
    pub total: usize,
    /// Lines charged at a primitive's cost
    pub substituted_lines: usize,
    /// Lines charged at one line each
    pub literal_lines: usize,
}

/// Composite costs plus the call sites nothing matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeTable {
    /// Tier-2 cost table
    pub table: CostTable,
    /// Invocations of unknown receivers
    pub unmatched: Vec<UnmatchedCallSite>,
}

/// Computes tier-2 costs by substituting primitive costs
#[derive(Debug, Clone)]
pub struct CompositeCalculator<'t> {
    primitives: &'t CostTable,
    index: CallSiteIndex<'t>,
    entry_point: String,
}

impl<'t> CompositeCalculator<'t> {
    /// Create a calculator over a completed primitive table
    pub fn new(primitives: &'t CostTable, markers: &Markers) -> TierlocResult<Self> {
        if primitives.tier() != Tier::Primitive {
            return Err(TierlocError::TierMismatch {
                expected: Tier::Primitive,
                actual: primitives.tier(),
            });
        }
        Ok(Self {
            primitives,
            index: CallSiteIndex::new(primitives, &markers.entry_point),
            entry_point: markers.entry_point.clone(),
        })
    }

    /// Cost of one entry routine
    #[must_use]
    pub fn cost<S: AsRef<str>>(&self, lines: &[S]) -> CompositeCost {
        let mut cost = CompositeCost::default();
        for line in lines {
            match self.index.first_match(line.as_ref()) {
                Some(entry) => {
                    cost.total += entry.cost;
                    cost.substituted_lines += 1;
                }
                None => {
                    cost.total += 1;
                    cost.literal_lines += 1;
                }
            }
        }
        cost
    }

    /// Lines of `routine` that invoke a receiver absent from the primitive table
    #[must_use]
    pub fn unmatched<S: AsRef<str>>(&self, routine: &str, lines: &[S]) -> Vec<UnmatchedCallSite> {
        lines
            .iter()
            .map(AsRef::as_ref)
            .flat_map(|line| {
                UnmatchedCallSite::scan(
                    Tier::Composite,
                    routine,
                    line,
                    self.primitives,
                    &self.entry_point,
                )
            })
            .collect()
    }

    /// Build the composite cost table in the given order
    pub fn build_table<'a, N>(
        &self,
        actions: impl IntoIterator<Item = (N, &'a [String])>,
    ) -> CompositeTable
    where
        N: AsRef<str>,
    {
        let mut table = CostTable::new(Tier::Composite);
        let mut unmatched = Vec::new();

        for (name, lines) in actions {
            let name = name.as_ref();
            let cost = self.cost(lines);
            tracing::debug!(
                action = %name,
                substituted = cost.substituted_lines,
                literal = cost.literal_lines,
                total = cost.total,
                "composite cost"
            );
            for miss in self.unmatched(name, lines) {
                tracing::warn!(
                    action = %name,
                    receiver = %miss.receiver,
                    "call site matches no primitive; counted as one line"
                );
                unmatched.push(miss);
            }
            table.insert(name, cost.total);
        }

        CompositeTable { table, unmatched }
    }
}
