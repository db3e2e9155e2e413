//! Report rendering

use crate::error::TierlocResult;
use crate::pipeline::MeasurementReport;
use crate::strategy::StrategyRecord;
use crate::table::CostTable;

/// Prefix of every section heading line
pub const HEADING_PREFIX: &str = "### ";

fn heading(output: &mut String, title: &str) {
    output.push_str(&format!("{HEADING_PREFIX}{title} ###\n"));
}

/// Render one strategy's three figures
#[must_use]
pub fn render_strategy(record: &StrategyRecord) -> String {
    let mut output = String::new();
    heading(&mut output, &record.name);
    output.push_str(&format!("Lines with abstraction: {}\n", record.actual_lines));
    output.push_str(&format!(
        "Lines without abstraction: {}\n",
        record.hypothetical_total
    ));
    output.push_str(&format!("Saved lines: {}\n", record.saved_lines));
    output
}

/// Render a cost table as `name: cost` lines
#[must_use]
pub fn render_cost_table(title: &str, table: &CostTable) -> String {
    let mut output = String::new();
    heading(&mut output, title);
    if table.is_empty() {
        output.push_str("(none)\n");
    }
    for entry in table {
        output.push_str(&format!("{}: {}\n", entry.name, entry.cost));
    }
    output
}

/// Render the full report as text
#[must_use]
pub fn render_report(report: &MeasurementReport) -> String {
    let mut output = String::new();

    for record in &report.strategies {
        output.push_str(&render_strategy(record));
    }

    output.push_str(&render_cost_table("Primitive Actions", &report.primitives));
    output.push_str(&render_cost_table("Composite Actions", &report.composites));

    if let Some(kb) = &report.knowledge_base {
        heading(&mut output, "LOC of knowledge base");
        output.push_str(&format!("KnowledgeBase: {}\n", kb.aggregate_lines));
        output.push_str(&format!("Static KnowledgeBase: {}\n", kb.itemized_lines));
        for item in &kb.items {
            output.push_str(&format!("  {}: {}\n", item.name, item.lines));
        }
    }

    heading(
        &mut output,
        &format!("LOC of {}", report.event_parsing_marker),
    );
    for count in &report.event_parsing {
        output.push_str(&format!(
            "{} {}: {}\n",
            count.strategy, report.event_parsing_marker, count.lines
        ));
    }

    if !report.unmatched_call_sites.is_empty() {
        heading(&mut output, "Unmatched call sites");
        for miss in &report.unmatched_call_sites {
            output.push_str(&format!(
                "  [{} {}] {}: {}\n",
                miss.tier, miss.routine, miss.receiver, miss.line
            ));
        }
    }

    output
}

/// Render the full report as pretty JSON
pub fn render_report_json(report: &MeasurementReport) -> TierlocResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
