//! Tierloc: abstraction-aware line accounting
//!
//! Estimates what a layered action abstraction saves: how many source lines
//! a workflow costs when written against composed actions, and how many it
//! would cost with every action call inlined down to its primitives.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐
//! │ registry │──►│  filter  │──►│ primitive │──►│ composite │──►│ strategy │
//! │ (source) │   │          │   │  tier 1   │   │  tier 2   │   │  tier 3  │
//! └──────────┘   └──────────┘   └───────────┘   └───────────┘   └──────────┘
//!                                                                     │
//!                                                                 ┌────────┐
//!                                                                 │ report │
//!                                                                 └────────┘
//! ```
//!
//! Each tier is computed from the completed table of the tier below; no
//! table ever references its own tier or a higher one.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = tierloc::measure_file(Path::new("tierloc.yaml"))?;
//! print!("{}", tierloc::render_report(&report));
//! # Ok::<(), tierloc::TierlocError>(())
//! ```

#![warn(missing_docs)]

pub mod callsite;
pub mod composite;
mod error;
pub mod filter;
pub mod knowledge;
pub mod manifest;
pub mod markers;
pub mod pipeline;
pub mod primitive;
pub mod report;
pub mod source;
pub mod strategy;
pub mod table;

pub use callsite::{CallSite, CallSiteIndex, UnmatchedCallSite};
pub use composite::{CompositeCalculator, CompositeCost, CompositeTable};
pub use error::{TierlocError, TierlocResult};
pub use filter::{count_mentions, is_semantic_line, semantic_lines, SemanticLines};
pub use knowledge::{KnowledgeBaseSummary, KnowledgeItem};
pub use manifest::{
    CompositeSpec, KnowledgeBaseSpec, KnowledgeModuleSpec, Manifest, PrimitiveSpec, SharedSpec,
    StrategySpec, UnitSpec, MANIFEST_VERSION,
};
pub use markers::Markers;
pub use pipeline::{manifest_dir, measure, measure_file, measure_registry, MeasurementReport};
pub use primitive::{Lifecycle, PrimitiveCalculator, PrimitiveCost, SharedRoutines};
pub use report::{render_cost_table, render_report, render_report_json, render_strategy};
pub use source::{extract_symbol, ResolvedUnit, SourceEntry, SourceRegistry};
pub use strategy::{event_parsing_lines, EventParsingCount, StrategyAggregator, StrategyRecord};
pub use table::{CostEntry, CostTable, Tier};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        measure, measure_file, render_report, semantic_lines, CompositeCalculator, CostTable,
        Lifecycle, Manifest, Markers, MeasurementReport, PrimitiveCalculator, SharedRoutines,
        SourceRegistry, StrategyAggregator, StrategyRecord, Tier, TierlocError, TierlocResult,
    };
}
