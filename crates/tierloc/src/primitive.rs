//! Tier-1 cost: primitive actions
//!
//! ```text
//! cost = create_facts (each add_fact call -> add_fact's line count)
//!      + reset_facts  (each remove_fact call -> remove_fact's line count)
//!      + get_result
//! ```
//!
//! Substitution goes one level deep: the shared routines contribute their
//! own semantic line count and are not expanded further.

use serde::{Deserialize, Serialize};

use crate::callsite::CallSite;
use crate::markers::Markers;
use crate::table::{CostTable, Tier};

/// Semantic line counts of the two shared fact routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedRoutines {
    /// Lines of `add_fact`
    pub add_fact: usize,
    /// Lines of `remove_fact`
    pub remove_fact: usize,
}

impl SharedRoutines {
    /// Create from known counts
    #[must_use]
    pub const fn new(add_fact: usize, remove_fact: usize) -> Self {
        Self {
            add_fact,
            remove_fact,
        }
    }

    /// Count the semantic lines of both routines
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(add_fact: &[S], remove_fact: &[S]) -> Self {
        Self::new(add_fact.len(), remove_fact.len())
    }
}

/// Semantic lines of the three lifecycle routines of one primitive
#[derive(Debug, Clone, Copy)]
pub struct Lifecycle<'a> {
    /// `create_facts` lines
    pub create_facts: &'a [String],
    /// `reset_facts` lines
    pub reset_facts: &'a [String],
    /// `get_result` lines
    pub get_result: &'a [String],
}

/// Cost of one primitive, split by lifecycle routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimitiveCost {
    /// `create_facts` after add_fact substitution
    pub create_facts: usize,
    /// `reset_facts` after remove_fact substitution
    pub reset_facts: usize,
    /// `get_result`, literal
    pub get_result: usize,
}

impl PrimitiveCost {
    /// Sum of the three parts
    #[must_use]
    pub const fn total(&self) -> usize {
        self.create_facts + self.reset_facts + self.get_result
    }
}

/// Count `lines`, charging `replacement` instead of 1 for each call site hit
#[must_use]
pub fn substituted_count<S: AsRef<str>>(lines: &[S], site: &CallSite, replacement: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            if site.occurs_in(line.as_ref()) {
                replacement
            } else {
                1
            }
        })
        .sum()
}

/// Computes tier-1 costs against fixed shared-routine constants
#[derive(Debug, Clone)]
pub struct PrimitiveCalculator {
    shared: SharedRoutines,
    add_fact_site: CallSite,
    remove_fact_site: CallSite,
}

impl PrimitiveCalculator {
    /// Create a calculator using the markers' shared-routine call sites
    #[must_use]
    pub fn new(shared: SharedRoutines, markers: &Markers) -> Self {
        Self {
            shared,
            add_fact_site: CallSite::literal(markers.add_fact_call.as_str()),
            remove_fact_site: CallSite::literal(markers.remove_fact_call.as_str()),
        }
    }

    /// Shared-routine constants in use
    #[must_use]
    pub const fn shared(&self) -> SharedRoutines {
        self.shared
    }

    /// Cost of one primitive
    #[must_use]
    pub fn cost(&self, lifecycle: &Lifecycle<'_>) -> PrimitiveCost {
        PrimitiveCost {
            create_facts: substituted_count(
                lifecycle.create_facts,
                &self.add_fact_site,
                self.shared.add_fact,
            ),
            reset_facts: substituted_count(
                lifecycle.reset_facts,
                &self.remove_fact_site,
                self.shared.remove_fact,
            ),
            get_result: lifecycle.get_result.len(),
        }
    }

    /// Build the primitive cost table in the given order
    pub fn build_table<'a, N>(&self, actions: impl IntoIterator<Item = (N, Lifecycle<'a>)>) -> CostTable
    where
        N: Into<String>,
    {
        let mut table = CostTable::new(Tier::Primitive);
        for (name, lifecycle) in actions {
            let name = name.into();
            let cost = self.cost(&lifecycle);
            tracing::debug!(
                action = %name,
                create_facts = cost.create_facts,
                reset_facts = cost.reset_facts,
                get_result = cost.get_result,
                total = cost.total(),
                "primitive cost"
            );
            table.insert(name, cost.total());
        }
        table
    }
}
