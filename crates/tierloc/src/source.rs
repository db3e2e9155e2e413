//! Source extraction
//!
//! Builds the source registry once per run: every unit group declared in the
//! manifest is resolved to its literal text, keyed by a stable name. Nothing
//! downstream touches the filesystem.
//!
//! Symbols are located with an indentation scan over `def` / `async def` /
//! `class` headers. A block is its header (plus decorators and a signature
//! spread over several lines) followed by every blank, comment-only or more
//! deeply indented line. Lines continuing an open bracket, triple-quoted
//! string or backslash join stay in the block whatever their indentation.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::{TierlocError, TierlocResult};
use crate::filter::{semantic_lines, SemanticLines};
use crate::manifest::{Manifest, UnitSpec};
use crate::markers::Markers;

/// One resolved unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    /// Where the text came from, e.g. `actions/low.py::ScanHost.get_result`
    pub origin: String,
    /// Raw source lines
    pub lines: Vec<String>,
}

/// A registry key and the units it concatenates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Registry key
    pub key: String,
    /// Units in declaration order
    pub units: Vec<ResolvedUnit>,
}

impl SourceEntry {
    /// Concatenated raw lines of every unit, in order
    #[must_use]
    pub fn raw_lines(&self) -> Vec<&str> {
        self.units
            .iter()
            .flat_map(|u| u.lines.iter().map(String::as_str))
            .collect()
    }
}

/// Stable names mapped to source text, built once per run
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every unit group of `manifest`, reading files under `base_dir`
    ///
    /// Each file is read at most once. The first unit that cannot be
    /// resolved aborts the whole run.
    pub fn resolve(manifest: &Manifest, base_dir: &Path) -> TierlocResult<Self> {
        let comment = manifest.markers.comment.as_str();
        let mut files: HashMap<PathBuf, String> = HashMap::new();
        let mut registry = Self::new();

        for group in manifest.unit_groups() {
            let mut units = Vec::with_capacity(group.units.len());
            for spec in group.units {
                let unit = resolve_unit(spec, base_dir, comment, &mut files)
                    .map_err(|reason| TierlocError::resolution(&group.key, reason))?;
                units.push(unit);
            }
            tracing::debug!(
                key = %group.key,
                units = units.len(),
                lines = units.iter().map(|u| u.lines.len()).sum::<usize>(),
                "resolved unit group"
            );
            registry.insert(group.key, units);
        }

        tracing::info!(
            groups = registry.len(),
            files = files.len(),
            "source registry built"
        );
        Ok(registry)
    }

    /// Register units under `key`, replacing any previous entry
    pub fn insert(&mut self, key: impl Into<String>, units: Vec<ResolvedUnit>) {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].units = units;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push(SourceEntry { key, units });
        }
    }

    /// Look up an entry
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SourceEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Concatenated raw lines of an entry
    pub fn raw_lines(&self, key: &str) -> TierlocResult<Vec<&str>> {
        self.get(key)
            .map(SourceEntry::raw_lines)
            .ok_or_else(|| TierlocError::resolution(key, "not present in the source registry"))
    }

    /// Semantic lines of an entry
    pub fn semantic_lines(&self, key: &str, markers: &Markers) -> TierlocResult<SemanticLines> {
        let raw = self.raw_lines(key)?;
        Ok(semantic_lines(&raw, markers))
    }

    /// Entries in resolution order
    pub fn entries(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_unit(
    spec: &UnitSpec,
    base_dir: &Path,
    comment: &str,
    files: &mut HashMap<PathBuf, String>,
) -> Result<ResolvedUnit, String> {
    let origin = spec.to_string();
    match spec {
        UnitSpec::Inline { source } => {
            if source.trim().is_empty() {
                return Err("inline source is empty".to_string());
            }
            Ok(ResolvedUnit {
                origin,
                lines: source.lines().map(str::to_string).collect(),
            })
        }
        UnitSpec::File { file, symbol } => {
            let path = base_dir.join(file);
            if !files.contains_key(&path) {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                files.insert(path.clone(), text);
            }
            let text = files.get(&path).map_or("", String::as_str);

            let lines = match symbol {
                None => text.lines().map(str::to_string).collect(),
                Some(symbol) => extract_symbol(text, symbol, comment).ok_or_else(|| {
                    format!("symbol '{symbol}' not found in {}", file.display())
                })?,
            };
            Ok(ResolvedUnit { origin, lines })
        }
    }
}

/// Extract the block of a dotted symbol path such as `ScanHost.create_facts`
///
/// Returns `None` if any segment of the path has no matching header.
#[must_use]
pub fn extract_symbol(text: &str, symbol: &str, comment: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut range = 0..lines.len();

    for segment in symbol.split('.') {
        if segment.is_empty() {
            return None;
        }
        range = find_block(&lines, range, segment, comment)?;
    }

    Some(lines[range].iter().map(|l| (*l).to_string()).collect())
}

fn find_block(
    lines: &[&str],
    within: Range<usize>,
    name: &str,
    comment: &str,
) -> Option<Range<usize>> {
    // Shallowest header wins so `Scan.run` never lands in a nested helper.
    let header = within
        .clone()
        .filter(|&i| is_header_for(lines[i].trim_start(), name))
        .min_by_key(|&i| indent_of(lines[i]))?;
    let indent = indent_of(lines[header]);

    let mut start = header;
    while start > within.start
        && lines[start - 1].trim_start().starts_with('@')
        && indent_of(lines[start - 1]) == indent
    {
        start -= 1;
    }

    let mut open = Continuation::default();
    open.feed(lines[header], comment);
    let mut signature_end = header;
    while open.is_open() && signature_end + 1 < within.end {
        signature_end += 1;
        open.feed(lines[signature_end], comment);
    }

    let mut end = signature_end + 1;
    for (i, line) in lines
        .iter()
        .enumerate()
        .take(within.end)
        .skip(signature_end + 1)
    {
        // Lines inside an open string or bracket belong to the statement above.
        if open.is_open() {
            open.feed(line, comment);
            end = i + 1;
            continue;
        }
        if is_filler(line, comment) {
            continue;
        }
        if indent_of(line) <= indent {
            break;
        }
        open.feed(line, comment);
        end = i + 1;
    }

    Some(start..end)
}

fn is_header_for(trimmed: &str, name: &str) -> bool {
    ["def ", "async def ", "class "].iter().any(|keyword| {
        trimmed
            .strip_prefix(keyword)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix(name))
            .is_some_and(|after| after.starts_with(|c| matches!(c, '(' | ':' | '[')))
    })
}

fn is_filler(line: &str, comment: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(comment)
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Lexical state that carries a statement onto the next physical line
#[derive(Debug, Clone, Copy, Default)]
struct Continuation {
    depth: usize,
    triple_quote: Option<char>,
    backslash: bool,
}

impl Continuation {
    fn is_open(self) -> bool {
        self.depth > 0 || self.triple_quote.is_some() || self.backslash
    }

    /// Advance over one line; quoted text and trailing comments are skipped
    fn feed(&mut self, line: &str, comment: &str) {
        self.backslash = false;
        let mut chars = line.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if let Some(quote) = self.triple_quote {
                if c == '\\' {
                    chars.next();
                } else if c == quote && line[i..].starts_with(&quote.to_string().repeat(3)) {
                    chars.next();
                    chars.next();
                    self.triple_quote = None;
                }
                continue;
            }

            match c {
                _ if line[i..].starts_with(comment) => return,
                '\'' | '"' => {
                    if line[i..].starts_with(&c.to_string().repeat(3)) {
                        chars.next();
                        chars.next();
                        self.triple_quote = Some(c);
                        continue;
                    }
                    // Single-quoted strings end on their line, closed or not.
                    while let Some((_, s)) = chars.next() {
                        if s == '\\' {
                            chars.next();
                        } else if s == c {
                            break;
                        }
                    }
                }
                '(' | '[' | '{' => self.depth += 1,
                ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                '\\' if chars.peek().is_none() => self.backslash = true,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LOW_LEVEL: &str = "\
import os


class ScanHost(LowLevelAction):
    \"\"\"Scan one host.\"\"\"

    def __init__(self, host):
        self.host = host

    async def create_facts(self):
        # record open ports
        for port in self.ports:

            await self.add_fact(port)
    async def reset_facts(self):
        pass

    @staticmethod
    def get_result(
        output,
        host,
    ):
        return parse(output)
# trailing comment at column zero


class ReadFile(LowLevelAction):
    def get_result(output):
        return output
";

    #[test]
    fn test_extract_method() {
        let lines = extract_symbol(LOW_LEVEL, "ScanHost.create_facts", "#").unwrap();
        assert_eq!(
            lines,
            vec![
                "    async def create_facts(self):",
                "        # record open ports",
                "        for port in self.ports:",
                "",
                "            await self.add_fact(port)",
            ]
        );
    }

    #[test]
    fn test_extract_includes_decorator_and_multiline_signature() {
        let lines = extract_symbol(LOW_LEVEL, "ScanHost.get_result", "#").unwrap();
        assert_eq!(lines.first().unwrap(), "    @staticmethod");
        assert_eq!(lines.last().unwrap(), "        return parse(output)");
        assert_eq!(lines.len(), 6);
    }

    const AFTER: &str = "\n    def other(self):\n        x = 1\n        y = 2\n";

    #[test]
    fn test_bracket_in_header_comment_is_ignored() {
        let text = format!(
            "class A:\n    def get_result(self):  # returns (ok\n        return 1\n{AFTER}"
        );
        assert_eq!(
            extract_symbol(&text, "A.get_result", "#").unwrap(),
            vec!["    def get_result(self):  # returns (ok", "        return 1"]
        );
    }

    #[test]
    fn test_bracket_in_header_string_is_ignored() {
        let text = format!(
            "class A:\n    def get_result(self, sep=\"(\", end='[#'):\n        return sep\n{AFTER}"
        );
        let lines = extract_symbol(&text, "A.get_result", "#").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "        return sep");
    }

    #[test]
    fn test_dedented_triple_quoted_string_stays_in_block() {
        let text = format!(
            "class A:\n    def run(self):\n        q = \"\"\"\nSELECT 1 -- (\n\"\"\"\n        return q\n{AFTER}"
        );
        assert_eq!(
            extract_symbol(&text, "A.run", "#").unwrap(),
            vec![
                "    def run(self):",
                "        q = \"\"\"",
                "SELECT 1 -- (",
                "\"\"\"",
                "        return q",
            ]
        );
    }

    #[test]
    fn test_dedented_bracket_and_backslash_continuations_stay_in_block() {
        let text = format!(
            "class A:\n    def run(self):\n        items = [\n    1,\n# two\n]\n        total = 1 + \\\n2\n        return items\n{AFTER}"
        );
        let lines = extract_symbol(&text, "A.run", "#").unwrap();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[5], "        total = 1 + \\");
        assert_eq!(lines[6], "2");
        assert_eq!(lines.last().unwrap(), "        return items");
        assert!(!lines.iter().any(|l| l.contains("other")));
    }

    #[test]
    fn test_single_quoted_string_closes_on_its_line() {
        let text = "def f():\n    s = 'a (b'\n    return s\ndef g():\n    pass\n";
        assert_eq!(
            extract_symbol(text, "f", "#").unwrap(),
            vec!["def f():", "    s = 'a (b'", "    return s"]
        );
    }

    #[test]
    fn test_extract_class_stops_at_dedent() {
        let lines = extract_symbol(LOW_LEVEL, "ScanHost", "#").unwrap();
        assert_eq!(lines.first().unwrap(), "class ScanHost(LowLevelAction):");
        assert_eq!(lines.last().unwrap(), "        return parse(output)");
        assert!(!lines.iter().any(|l| l.contains("ReadFile")));
    }

    #[test]
    fn test_same_method_name_resolved_per_class() {
        let lines = extract_symbol(LOW_LEVEL, "ReadFile.get_result", "#").unwrap();
        assert_eq!(
            lines,
            vec!["    def get_result(output):", "        return output"]
        );
    }

    #[test]
    fn test_missing_symbol() {
        assert!(extract_symbol(LOW_LEVEL, "ScanHost.missing", "#").is_none());
        assert!(extract_symbol(LOW_LEVEL, "Nope", "#").is_none());
        assert!(extract_symbol(LOW_LEVEL, "ScanHost.", "#").is_none());
    }

    #[test]
    fn test_prefix_name_does_not_match() {
        let text = "def runner():\n    a = 1\ndef run():\n    b = 2\n";
        assert_eq!(
            extract_symbol(text, "run", "#").unwrap(),
            vec!["def run():", "    b = 2"]
        );
    }

    #[test]
    fn test_shallowest_header_preferred() {
        let text = "class A:\n    def run(self):\n        pass\ndef run():\n    top = 1\n";
        assert_eq!(
            extract_symbol(text, "run", "#").unwrap(),
            vec!["def run():", "    top = 1"]
        );
    }

    fn write_tree(dir: &TempDir) {
        fs::write(dir.path().join("low.py"), LOW_LEVEL).unwrap();
        fs::write(
            dir.path().join("base.py"),
            "class Base:\n    async def add_fact(self, f):\n        self.facts.append(f)\n        self.log_event(f)\n\n    async def remove_fact(self, f):\n        self.facts.remove(f)\n",
        )
        .unwrap();
    }

    fn manifest(extra: &str) -> Manifest {
        Manifest::from_yaml(&format!(
            "version: \"1.0\"\nshared:\n  add_fact: {{ file: base.py, symbol: Base.add_fact }}\n  remove_fact: {{ file: base.py, symbol: Base.remove_fact }}\n{extra}"
        ))
        .unwrap()
    }

    #[test]
    fn test_registry_resolves_files_and_inline() {
        let dir = TempDir::new().unwrap();
        write_tree(&dir);
        let m = manifest(
            "strategies:\n  - name: Greedy\n    units:\n      - { file: low.py, symbol: ReadFile.get_result }\n      - { source: \"x = 1\\ny = 2\" }\n",
        );

        let registry = SourceRegistry::resolve(&m, dir.path()).unwrap();
        assert_eq!(registry.len(), 3);

        let add = registry.raw_lines("shared:add_fact").unwrap();
        assert_eq!(add.len(), 3);

        let strategy = registry.get("strategy:Greedy").unwrap();
        assert_eq!(strategy.units.len(), 2);
        assert_eq!(strategy.units[0].origin, "low.py::ReadFile.get_result");
        assert_eq!(
            strategy.raw_lines(),
            vec!["    def get_result(output):", "        return output", "x = 1", "y = 2"]
        );
    }

    #[test]
    fn test_registry_semantic_lines() {
        let dir = TempDir::new().unwrap();
        write_tree(&dir);
        let m = manifest("");
        let registry = SourceRegistry::resolve(&m, dir.path()).unwrap();
        let lines = registry
            .semantic_lines("shared:add_fact", &Markers::default())
            .unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_registry_missing_file_is_resolution_error() {
        let dir = TempDir::new().unwrap();
        write_tree(&dir);
        let m = manifest("composites:\n  - { name: scan, entry: { file: gone.py } }\n");
        let err = SourceRegistry::resolve(&m, dir.path()).unwrap_err();
        assert!(err.is_resolution());
        assert!(err.to_string().contains("composite:scan"));
        assert!(err.to_string().contains("gone.py"));
    }

    #[test]
    fn test_registry_missing_symbol_is_resolution_error() {
        let dir = TempDir::new().unwrap();
        write_tree(&dir);
        let m = manifest("composites:\n  - { name: scan, entry: { file: low.py, symbol: Scan.run } }\n");
        let err = SourceRegistry::resolve(&m, dir.path()).unwrap_err();
        assert!(err.to_string().contains("symbol 'Scan.run' not found"));
    }

    #[test]
    fn test_registry_empty_inline_is_resolution_error() {
        let dir = TempDir::new().unwrap();
        write_tree(&dir);
        let m = manifest("composites:\n  - { name: scan, entry: { source: \"  \" } }\n");
        let err = SourceRegistry::resolve(&m, dir.path()).unwrap_err();
        assert!(err.to_string().contains("inline source is empty"));
    }

    #[test]
    fn test_unknown_key() {
        let registry = SourceRegistry::new();
        assert!(registry.is_empty());
        let err = registry.raw_lines("composite:nope").unwrap_err();
        assert!(err.is_resolution());
    }

    #[test]
    fn test_insert_replaces() {
        let mut registry = SourceRegistry::new();
        let unit = |s: &str| ResolvedUnit {
            origin: "<inline>".into(),
            lines: vec![s.to_string()],
        };
        registry.insert("k", vec![unit("a")]);
        registry.insert("k", vec![unit("b")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.raw_lines("k").unwrap(), vec!["b"]);
        assert_eq!(registry.entries().count(), 1);
    }
}
