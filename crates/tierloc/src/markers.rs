//! Classification tokens
//!
//! Every pattern the engine matches against source text lives here, so a
//! manifest can retarget the measurement at a code base with different
//! naming conventions without touching the calculators.

use serde::{Deserialize, Serialize};

/// Tokens used to classify and match source lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Line-comment marker
    pub comment: String,
    /// Token identifying logging/telemetry statements
    pub instrumentation: String,
    /// Entry-point method invoked on actions (`<name>.<entry_point>`)
    pub entry_point: String,
    /// Call site of the shared fact-adding routine inside `create_facts`
    pub add_fact_call: String,
    /// Call site of the shared fact-removing routine inside `reset_facts`
    pub remove_fact_call: String,
    /// Token counted by the event-parsing signal
    pub event_parsing: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            comment: "#".to_string(),
            instrumentation: "log_event".to_string(),
            entry_point: "run".to_string(),
            add_fact_call: "self.add_fact".to_string(),
            remove_fact_call: "self.remove_fact".to_string(),
            event_parsing: "parse_events".to_string(),
        }
    }
}

impl Markers {
    /// Create the default marker set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment marker
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the instrumentation marker
    #[must_use]
    pub fn with_instrumentation(mut self, token: impl Into<String>) -> Self {
        self.instrumentation = token.into();
        self
    }

    /// Set the entry-point token
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Names of markers that are empty
    ///
    /// An empty token would match every line, so the manifest rejects them.
    #[must_use]
    pub fn empty_fields(&self) -> Vec<&'static str> {
        [
            ("comment", &self.comment),
            ("instrumentation", &self.instrumentation),
            ("entry_point", &self.entry_point),
            ("add_fact_call", &self.add_fact_call),
            ("remove_fact_call", &self.remove_fact_call),
            ("event_parsing", &self.event_parsing),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
