//! Tier-3 aggregation: strategy routines
//!
//! `actual_lines` is the literal semantic count. `saved_lines` only counts
//! what abstraction call sites stand in for: a line invoking a composed
//! action adds that action's cost, any other line adds nothing.

use serde::{Deserialize, Serialize};

use crate::callsite::{CallSiteIndex, UnmatchedCallSite};
use crate::error::{TierlocError, TierlocResult};
use crate::filter::count_mentions;
use crate::markers::Markers;
use crate::table::{CostTable, Tier};

/// Per-strategy figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRecord {
    /// Strategy name
    pub name: String,
    /// Semantic lines as written against the abstraction
    pub actual_lines: usize,
    /// Lines the composed-action call sites stand in for
    pub saved_lines: usize,
    /// `actual_lines + saved_lines`
    pub hypothetical_total: usize,
}

impl StrategyRecord {
    /// Build a record; the hypothetical total is derived
    #[must_use]
    pub fn new(name: impl Into<String>, actual_lines: usize, saved_lines: usize) -> Self {
        Self {
            name: name.into(),
            actual_lines,
            saved_lines,
            hypothetical_total: actual_lines + saved_lines,
        }
    }
}

/// Occurrences of the event-parsing marker in one strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParsingCount {
    /// Strategy name
    pub strategy: String,
    /// Lines mentioning the marker
    pub lines: usize,
}

/// Number of lines mentioning the event-parsing marker
#[must_use]
pub fn event_parsing_lines<S: AsRef<str>>(lines: &[S], markers: &Markers) -> usize {
    count_mentions(lines, &markers.event_parsing)
}

/// Aggregates strategy figures against a completed composite table
#[derive(Debug, Clone)]
pub struct StrategyAggregator<'t> {
    composites: &'t CostTable,
    index: CallSiteIndex<'t>,
    entry_point: String,
}

impl<'t> StrategyAggregator<'t> {
    /// Create an aggregator over a completed composite table
    pub fn new(composites: &'t CostTable, markers: &Markers) -> TierlocResult<Self> {
        if composites.tier() != Tier::Composite {
            return Err(TierlocError::TierMismatch {
                expected: Tier::Composite,
                actual: composites.tier(),
            });
        }
        Ok(Self {
            composites,
            index: CallSiteIndex::new(composites, &markers.entry_point),
            entry_point: markers.entry_point.clone(),
        })
    }

    /// Lines saved by composed-action call sites
    #[must_use]
    pub fn saved_lines<S: AsRef<str>>(&self, lines: &[S]) -> usize {
        lines
            .iter()
            .filter_map(|line| self.index.first_match(line.as_ref()))
            .map(|entry| entry.cost)
            .sum()
    }

    /// Figures for one strategy
    #[must_use]
    pub fn aggregate<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> StrategyRecord {
        let record = StrategyRecord::new(name, lines.len(), self.saved_lines(lines));
        tracing::debug!(
            strategy = %name,
            actual = record.actual_lines,
            saved = record.saved_lines,
            hypothetical = record.hypothetical_total,
            "strategy aggregated"
        );
        record
    }

    /// Lines of `routine` that invoke a receiver absent from the composite table
    #[must_use]
    pub fn unmatched<S: AsRef<str>>(&self, routine: &str, lines: &[S]) -> Vec<UnmatchedCallSite> {
        lines
            .iter()
            .map(AsRef::as_ref)
            .flat_map(|line| {
                UnmatchedCallSite::scan(
                    Tier::Strategy,
                    routine,
                    line,
                    self.composites,
                    &self.entry_point,
                )
            })
            .collect()
    }
}
