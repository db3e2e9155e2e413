//! Call-site recognition
//!
//! A call site `scanAction.run` only matches where it stands as a whole
//! token pair: the occurrence may not be glued to identifier characters on
//! either side. `myscanAction.run()` and `scanAction.runner()` do not match.

use serde::{Deserialize, Serialize};

use crate::table::{CostEntry, CostTable, Tier};

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A declared pattern that marks an invocation in a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pattern: String,
}

impl CallSite {
    /// Call site of an action's entry point: `<name>.<entry_point>`
    #[must_use]
    pub fn entry(name: &str, entry_point: &str) -> Self {
        Self {
            pattern: format!("{name}.{entry_point}"),
        }
    }

    /// Call site given verbatim, e.g. `self.add_fact`
    #[must_use]
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The text being matched
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether `line` contains this call site on token boundaries
    #[must_use]
    pub fn occurs_in(&self, line: &str) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        let guard_start = self.pattern.chars().next().is_some_and(is_ident_char);
        let guard_end = self.pattern.chars().next_back().is_some_and(is_ident_char);

        line.match_indices(self.pattern.as_str()).any(|(start, hit)| {
            let before = line[..start].chars().next_back();
            let after = line[start + hit.len()..].chars().next();
            let clean_start = !guard_start || !before.is_some_and(is_ident_char);
            let clean_end = !guard_end || !after.is_some_and(is_ident_char);
            clean_start && clean_end
        })
    }
}

/// Call sites for every entry of a cost table, in table order
#[derive(Debug, Clone)]
pub struct CallSiteIndex<'t> {
    sites: Vec<(CallSite, &'t CostEntry)>,
}

impl<'t> CallSiteIndex<'t> {
    /// Build the index for `table` using `entry_point` as the invoked method
    #[must_use]
    pub fn new(table: &'t CostTable, entry_point: &str) -> Self {
        let sites = table
            .iter()
            .map(|entry| (CallSite::entry(&entry.name, entry_point), entry))
            .collect();
        Self { sites }
    }

    /// First table entry (in table order) whose call site appears in `line`
    #[must_use]
    pub fn first_match(&self, line: &str) -> Option<&'t CostEntry> {
        self.sites
            .iter()
            .find(|(site, _)| site.occurs_in(line))
            .map(|(_, entry)| *entry)
    }

    /// Number of indexed call sites
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Check if the index has no call sites
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// A line that invokes `X.<entry_point>` where `X` is in no cost table
///
/// Such lines still count as plain lines. The diagnostic only separates a
/// deliberately non-abstracted line from a name that drifted between tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedCallSite {
    /// Tier of the routine containing the line
    pub tier: Tier,
    /// Name of that routine
    pub routine: String,
    /// Receiver that matched nothing
    pub receiver: String,
    /// The trimmed line
    pub line: String,
}

impl UnmatchedCallSite {
    /// Collect unmatched receivers of `line` against `table`
    #[must_use]
    pub fn scan(
        tier: Tier,
        routine: &str,
        line: &str,
        table: &CostTable,
        entry_point: &str,
    ) -> Vec<Self> {
        dangling_receivers(line, entry_point)
            .into_iter()
            .filter(|receiver| !table.contains(receiver))
            .map(|receiver| Self {
                tier,
                routine: routine.to_string(),
                receiver: receiver.to_string(),
                line: line.trim().to_string(),
            })
            .collect()
    }
}

/// Identifiers `X` such that `X.<entry_point>` appears in `line`
///
/// Used to spot call sites that look like action invocations but match no
/// table entry.
#[must_use]
pub fn dangling_receivers<'l>(line: &'l str, entry_point: &str) -> Vec<&'l str> {
    if entry_point.is_empty() {
        return Vec::new();
    }
    let needle = format!(".{entry_point}");
    let mut receivers = Vec::new();

    for (dot, hit) in line.match_indices(needle.as_str()) {
        let after = line[dot + hit.len()..].chars().next();
        if after.is_some_and(is_ident_char) {
            continue;
        }
        let head = &line[..dot];
        let start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_ident_char(*c))
            .last()
            .map_or(dot, |(i, _)| i);
        if start < dot {
            receivers.push(&line[start..dot]);
        }
    }
    receivers
}
