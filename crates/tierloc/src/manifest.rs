//! Measurement manifest
//!
//! The manifest declares the fixed input set of a measurement run: the two
//! shared fact routines, the three action tiers and the knowledge-base
//! modules. Paths are relative to the manifest's directory.
//!
//! ```yaml
//! version: "1.0"
//! shared:
//!   add_fact: { file: actions/low_level_action.py, symbol: LowLevelAction.add_fact }
//!   remove_fact: { file: actions/low_level_action.py, symbol: LowLevelAction.remove_fact }
//! primitives:
//!   - name: scanHostAction
//!     create_facts: { file: actions/low_level.py, symbol: ScanHost.create_facts }
//!     reset_facts: { file: actions/low_level.py, symbol: ScanHost.reset_facts }
//!     get_result: { file: actions/low_level.py, symbol: ScanHost.get_result }
//! composites:
//!   - name: scanAction
//!     entry: { file: actions/high_level.py, symbol: Scan.run }
//! strategies:
//!   - name: Greedy
//!     units:
//!       - { file: strategies/greedy.py, symbol: LogicalPlanner.main }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{TierlocError, TierlocResult};
use crate::markers::Markers;

/// Supported manifest schema version
pub const MANIFEST_VERSION: &str = "1.0";

/// Reference to one callable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitSpec {
    /// A routine (or whole module) in a source file
    File {
        /// Path relative to the manifest directory
        file: PathBuf,
        /// Dotted symbol path, e.g. `ScanHost.create_facts`; absent = whole file
        #[serde(default)]
        symbol: Option<String>,
    },
    /// Source text embedded in the manifest
    Inline {
        /// The literal source
        source: String,
    },
}

impl UnitSpec {
    /// Reference a whole file
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            file: path.into(),
            symbol: None,
        }
    }

    /// Reference a symbol inside a file
    #[must_use]
    pub fn symbol(path: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        Self::File {
            file: path.into(),
            symbol: Some(symbol.into()),
        }
    }

    /// Embed source text
    #[must_use]
    pub fn inline(source: impl Into<String>) -> Self {
        Self::Inline {
            source: source.into(),
        }
    }
}

impl fmt::Display for UnitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { file, symbol: None } => write!(f, "{}", file.display()),
            Self::File {
                file,
                symbol: Some(symbol),
            } => write!(f, "{}::{}", file.display(), symbol),
            Self::Inline { .. } => f.write_str("<inline>"),
        }
    }
}

/// The two shared routines every primitive builds on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedSpec {
    /// Routine that records a fact
    pub add_fact: UnitSpec,
    /// Routine that retracts a fact
    pub remove_fact: UnitSpec,
}

/// Tier-1 action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveSpec {
    /// Action name, the receiver at composite call sites
    pub name: String,
    /// Lifecycle step that records facts
    pub create_facts: UnitSpec,
    /// Lifecycle step that retracts facts
    pub reset_facts: UnitSpec,
    /// Lifecycle step that extracts the result
    pub get_result: UnitSpec,
}

/// Tier-2 action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeSpec {
    /// Action name, the receiver at strategy call sites
    pub name: String,
    /// Entry routine
    pub entry: UnitSpec,
}

/// Tier-3 routine group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategySpec {
    /// Strategy name used in the report
    pub name: String,
    /// Routines whose lines are concatenated, in order
    pub units: Vec<UnitSpec>,
}

/// One itemized knowledge-base module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeModuleSpec {
    /// Module name used in the report
    pub name: String,
    /// Module source
    pub unit: UnitSpec,
}

/// Knowledge-base modules, measured as one unit and itemized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeBaseSpec {
    /// The aggregate unit (typically the knowledge-base class)
    pub aggregate: UnitSpec,
    /// The domain model modules
    #[serde(default)]
    pub modules: Vec<KnowledgeModuleSpec>,
}

/// A named group of units the registry resolves together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitGroup<'m> {
    /// Registry key
    pub key: String,
    /// Units concatenated in order
    pub units: Vec<&'m UnitSpec>,
}

impl<'m> UnitGroup<'m> {
    fn single(key: String, unit: &'m UnitSpec) -> Self {
        Self {
            key,
            units: vec![unit],
        }
    }
}

/// Registry keys for every unit role
pub mod keys {
    /// Shared add-fact routine
    pub const ADD_FACT: &str = "shared:add_fact";
    /// Shared remove-fact routine
    pub const REMOVE_FACT: &str = "shared:remove_fact";
    /// Knowledge-base aggregate unit
    pub const KNOWLEDGE_AGGREGATE: &str = "knowledge:aggregate";

    /// Lifecycle step of a primitive action
    #[must_use]
    pub fn primitive(name: &str, step: &str) -> String {
        format!("primitive:{name}:{step}")
    }

    /// Entry routine of a composed action
    #[must_use]
    pub fn composite(name: &str) -> String {
        format!("composite:{name}")
    }

    /// Routine group of a strategy
    #[must_use]
    pub fn strategy(name: &str) -> String {
        format!("strategy:{name}")
    }

    /// Itemized knowledge-base module
    #[must_use]
    pub fn knowledge_module(name: &str) -> String {
        format!("knowledge:module:{name}")
    }
}

/// Declared input set of a measurement run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Schema version
    pub version: String,
    /// Classification tokens
    #[serde(default)]
    pub markers: Markers,
    /// Shared fact routines
    pub shared: SharedSpec,
    /// Tier-1 actions
    #[serde(default)]
    pub primitives: Vec<PrimitiveSpec>,
    /// Tier-2 actions
    #[serde(default)]
    pub composites: Vec<CompositeSpec>,
    /// Tier-3 routines
    #[serde(default)]
    pub strategies: Vec<StrategySpec>,
    /// Knowledge-base modules
    #[serde(default)]
    pub knowledge_base: Option<KnowledgeBaseSpec>,
}

impl Manifest {
    /// Parse and validate a manifest from YAML
    pub fn from_yaml(yaml: &str) -> TierlocResult<Self> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TierlocError::manifest_parse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file
    pub fn from_file(path: &Path) -> TierlocResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| TierlocError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Check structural rules serde cannot express
    pub fn validate(&self) -> TierlocResult<()> {
        if self.version != MANIFEST_VERSION {
            return Err(TierlocError::manifest_invalid(format!(
                "unsupported version '{}', expected '{MANIFEST_VERSION}'",
                self.version
            )));
        }

        let empty = self.markers.empty_fields();
        if !empty.is_empty() {
            return Err(TierlocError::manifest_invalid(format!(
                "empty markers: {}",
                empty.join(", ")
            )));
        }

        check_names("primitive", self.primitives.iter().map(|p| p.name.as_str()))?;
        check_names("composite", self.composites.iter().map(|c| c.name.as_str()))?;
        check_names("strategy", self.strategies.iter().map(|s| s.name.as_str()))?;

        if let Some(strategy) = self.strategies.iter().find(|s| s.units.is_empty()) {
            return Err(TierlocError::manifest_invalid(format!(
                "strategy '{}' lists no units",
                strategy.name
            )));
        }

        if let Some(kb) = &self.knowledge_base {
            check_names("knowledge module", kb.modules.iter().map(|m| m.name.as_str()))?;
        }

        Ok(())
    }

    /// Every unit group in dependency order: shared, primitives, composites,
    /// strategies, knowledge base
    #[must_use]
    pub fn unit_groups(&self) -> Vec<UnitGroup<'_>> {
        let mut groups = vec![
            UnitGroup::single(keys::ADD_FACT.to_string(), &self.shared.add_fact),
            UnitGroup::single(keys::REMOVE_FACT.to_string(), &self.shared.remove_fact),
        ];

        for p in &self.primitives {
            groups.push(UnitGroup::single(
                keys::primitive(&p.name, "create_facts"),
                &p.create_facts,
            ));
            groups.push(UnitGroup::single(
                keys::primitive(&p.name, "reset_facts"),
                &p.reset_facts,
            ));
            groups.push(UnitGroup::single(
                keys::primitive(&p.name, "get_result"),
                &p.get_result,
            ));
        }

        for c in &self.composites {
            groups.push(UnitGroup::single(keys::composite(&c.name), &c.entry));
        }

        for s in &self.strategies {
            groups.push(UnitGroup {
                key: keys::strategy(&s.name),
                units: s.units.iter().collect(),
            });
        }

        if let Some(kb) = &self.knowledge_base {
            groups.push(UnitGroup::single(
                keys::KNOWLEDGE_AGGREGATE.to_string(),
                &kb.aggregate,
            ));
            for m in &kb.modules {
                groups.push(UnitGroup::single(keys::knowledge_module(&m.name), &m.unit));
            }
        }

        groups
    }
}

fn check_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> TierlocResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(TierlocError::manifest_invalid(format!(
                "{kind} with an empty name"
            )));
        }
        if !seen.insert(name) {
            return Err(TierlocError::manifest_invalid(format!(
                "duplicate {kind} '{name}'"
            )));
        }
    }
    Ok(())
}
