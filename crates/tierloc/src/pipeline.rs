//! Full measurement pass
//!
//! One synchronous batch: resolve every unit, then compute each tier from
//! the completed table of the tier below. Nothing is cached between runs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::callsite::UnmatchedCallSite;
use crate::composite::CompositeCalculator;
use crate::error::TierlocResult;
use crate::filter::SemanticLines;
use crate::knowledge::{KnowledgeBaseSummary, KnowledgeItem};
use crate::manifest::{keys, Manifest};
use crate::primitive::{Lifecycle, PrimitiveCalculator, SharedRoutines};
use crate::source::SourceRegistry;
use crate::strategy::{event_parsing_lines, EventParsingCount, StrategyAggregator, StrategyRecord};
use crate::table::CostTable;

/// Everything one run derives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Shared fact-routine constants
    pub shared: SharedRoutines,
    /// Tier-1 costs
    pub primitives: CostTable,
    /// Tier-2 costs
    pub composites: CostTable,
    /// Tier-3 figures, in manifest order
    pub strategies: Vec<StrategyRecord>,
    /// Token counted by the event-parsing signal
    pub event_parsing_marker: String,
    /// Event-parsing occurrences per strategy
    pub event_parsing: Vec<EventParsingCount>,
    /// Knowledge-base counts, if declared
    pub knowledge_base: Option<KnowledgeBaseSummary>,
    /// Call sites whose receiver matched no table entry
    pub unmatched_call_sites: Vec<UnmatchedCallSite>,
}

/// Directory that relative unit paths of a manifest resolve against
#[must_use]
pub fn manifest_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Load `path`, then measure relative to its directory
pub fn measure_file(path: &Path) -> TierlocResult<MeasurementReport> {
    let manifest = Manifest::from_file(path)?;
    measure(&manifest, manifest_dir(path))
}

/// Resolve the manifest's units under `base_dir` and measure them
pub fn measure(manifest: &Manifest, base_dir: &Path) -> TierlocResult<MeasurementReport> {
    let registry = SourceRegistry::resolve(manifest, base_dir)?;
    measure_registry(manifest, &registry)
}

/// Measure units already present in `registry`
pub fn measure_registry(
    manifest: &Manifest,
    registry: &SourceRegistry,
) -> TierlocResult<MeasurementReport> {
    let markers = &manifest.markers;
    let lines = |key: &str| registry.semantic_lines(key, markers);

    let shared = SharedRoutines::from_lines(&lines(keys::ADD_FACT)?, &lines(keys::REMOVE_FACT)?);
    tracing::debug!(
        add_fact = shared.add_fact,
        remove_fact = shared.remove_fact,
        "shared routine constants"
    );

    // Tier 1
    let mut lifecycles: Vec<(&str, [SemanticLines; 3])> = Vec::with_capacity(manifest.primitives.len());
    for p in &manifest.primitives {
        lifecycles.push((
            p.name.as_str(),
            [
                lines(&keys::primitive(&p.name, "create_facts"))?,
                lines(&keys::primitive(&p.name, "reset_facts"))?,
                lines(&keys::primitive(&p.name, "get_result"))?,
            ],
        ));
    }
    let primitives = PrimitiveCalculator::new(shared, markers).build_table(lifecycles.iter().map(
        |(name, [create, reset, result])| {
            (
                *name,
                Lifecycle {
                    create_facts: create,
                    reset_facts: reset,
                    get_result: result,
                },
            )
        },
    ));
    tracing::info!(actions = primitives.len(), "primitive table complete");

    // Tier 2
    let mut entries: Vec<(&str, SemanticLines)> = Vec::with_capacity(manifest.composites.len());
    for c in &manifest.composites {
        entries.push((c.name.as_str(), lines(&keys::composite(&c.name))?));
    }
    let built = CompositeCalculator::new(&primitives, markers)?
        .build_table(entries.iter().map(|(name, body)| (*name, body.as_slice())));
    let composites = built.table;
    let mut unmatched_call_sites = built.unmatched;
    tracing::info!(actions = composites.len(), "composite table complete");

    // Tier 3
    let aggregator = StrategyAggregator::new(&composites, markers)?;
    let mut strategies = Vec::with_capacity(manifest.strategies.len());
    let mut event_parsing = Vec::with_capacity(manifest.strategies.len());
    for s in &manifest.strategies {
        let body = lines(&keys::strategy(&s.name))?;
        strategies.push(aggregator.aggregate(&s.name, &body));
        event_parsing.push(EventParsingCount {
            strategy: s.name.clone(),
            lines: event_parsing_lines(&body, markers),
        });
        for miss in aggregator.unmatched(&s.name, &body) {
            tracing::warn!(
                strategy = %s.name,
                receiver = %miss.receiver,
                "call site matches no composed action; saves nothing"
            );
            unmatched_call_sites.push(miss);
        }
    }
    tracing::info!(strategies = strategies.len(), "strategies aggregated");

    let knowledge_base = match &manifest.knowledge_base {
        None => None,
        Some(kb) => {
            let aggregate_lines = lines(keys::KNOWLEDGE_AGGREGATE)?.len();
            let mut items = Vec::with_capacity(kb.modules.len());
            for m in &kb.modules {
                items.push(KnowledgeItem {
                    name: m.name.clone(),
                    lines: lines(&keys::knowledge_module(&m.name))?.len(),
                });
            }
            Some(KnowledgeBaseSummary::new(aggregate_lines, items))
        }
    };

    Ok(MeasurementReport {
        shared,
        primitives,
        composites,
        strategies,
        event_parsing_marker: markers.event_parsing.clone(),
        event_parsing,
        knowledge_base,
        unmatched_call_sites,
    })
}
