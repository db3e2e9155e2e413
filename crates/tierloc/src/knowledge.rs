//! Knowledge-base line counts

use serde::{Deserialize, Serialize};

/// Semantic lines of one domain model module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Module name
    pub name: String,
    /// Semantic lines
    pub lines: usize,
}

/// Knowledge base measured as one unit and as the sum of its modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseSummary {
    /// Semantic lines of the aggregate unit
    pub aggregate_lines: usize,
    /// Per-module counts, in manifest order
    pub items: Vec<KnowledgeItem>,
    /// Sum of `items`
    pub itemized_lines: usize,
}

impl KnowledgeBaseSummary {
    /// Build a summary; the itemized sum is derived
    #[must_use]
    pub fn new(aggregate_lines: usize, items: Vec<KnowledgeItem>) -> Self {
        let itemized_lines = items.iter().map(|i| i.lines).sum();
        Self {
            aggregate_lines,
            items,
            itemized_lines,
        }
    }
}
