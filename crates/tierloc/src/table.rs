//! Per-tier cost tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstraction tier of a cost table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Primitive actions with a create/reset/result lifecycle
    Primitive,
    /// Actions composed from primitives
    Composite,
    /// End-to-end strategy routines
    Strategy,
}

impl Tier {
    /// Get display string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Composite => "composite",
            Self::Strategy => "strategy",
        }
    }

    /// Tier whose costs this tier substitutes, if any
    #[must_use]
    pub const fn below(&self) -> Option<Self> {
        match self {
            Self::Primitive => None,
            Self::Composite => Some(Self::Primitive),
            Self::Strategy => Some(Self::Composite),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Action name, also the call-site receiver
    pub name: String,
    /// Line cost
    pub cost: usize,
}

/// Mapping from action name to line cost, kept in insertion order
///
/// Insertion order is the tie-break order when one line matches several
/// call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    tier: Tier,
    entries: Vec<CostEntry>,
}

impl CostTable {
    /// Create an empty table for `tier`
    #[must_use]
    pub const fn new(tier: Tier) -> Self {
        Self {
            tier,
            entries: Vec::new(),
        }
    }

    /// Tier of this table
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Insert or replace a cost; replacing keeps the original position
    pub fn insert(&mut self, name: impl Into<String>, cost: usize) {
        let name = name.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == name) {
            existing.cost = cost;
        } else {
            self.entries.push(CostEntry { name, cost });
        }
    }

    /// Look up a cost by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.cost)
    }

    /// Check if a name is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, CostEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all costs
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.cost).sum()
    }
}

impl<'a> IntoIterator for &'a CostTable {
    type Item = &'a CostEntry;
    type IntoIter = std::slice::Iter<'a, CostEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_as_str() {
        assert_eq!(Tier::Primitive.as_str(), "primitive");
        assert_eq!(Tier::Composite.to_string(), "composite");
        assert_eq!(Tier::Strategy.as_str(), "strategy");
    }

    #[test]
    fn test_tier_below() {
        assert_eq!(Tier::Primitive.below(), None);
        assert_eq!(Tier::Composite.below(), Some(Tier::Primitive));
        assert_eq!(Tier::Strategy.below(), Some(Tier::Composite));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut table = CostTable::new(Tier::Primitive);
        table.insert("zeta", 1);
        table.insert("alpha", 2);
        table.insert("mid", 3);
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut table = CostTable::new(Tier::Composite);
        table.insert("a", 1);
        table.insert("b", 2);
        table.insert("a", 10);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(10));
        assert_eq!(table.iter().next().unwrap().name, "a");
    }

    #[test]
    fn test_lookup_and_total() {
        let mut table = CostTable::new(Tier::Primitive);
        assert!(table.is_empty());
        table.insert("scan", 9);
        table.insert("read", 4);
        assert!(table.contains("scan"));
        assert!(!table.contains("write"));
        assert_eq!(table.get("write"), None);
        assert_eq!(table.total(), 13);
        assert_eq!(table.tier(), Tier::Primitive);
    }

    #[test]
    fn test_serialize_json() {
        let mut table = CostTable::new(Tier::Primitive);
        table.insert("scan", 9);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"tier\":\"primitive\""));
        assert!(json.contains("\"name\":\"scan\""));
        assert!(json.contains("\"cost\":9"));
    }
}
