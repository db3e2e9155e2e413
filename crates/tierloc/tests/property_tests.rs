//! Property-based tests for tierloc.
//!
//! Uses proptest to check the counting invariants over arbitrary line sets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use tierloc::prelude::*;

// Lines that never contain a call site, comment, or instrumentation token
fn plain_line() -> impl Strategy<Value = String> {
    "[a-z]{1,8} = [a-z0-9]{1,8}"
}

fn primitive_table(costs: &[usize]) -> CostTable {
    let mut table = CostTable::new(Tier::Primitive);
    for (i, cost) in costs.iter().enumerate() {
        table.insert(format!("prim{i}Action"), *cost);
    }
    table
}

fn composite_table(costs: &[usize]) -> CostTable {
    let mut table = CostTable::new(Tier::Composite);
    for (i, cost) in costs.iter().enumerate() {
        table.insert(format!("comp{i}Action"), *cost);
    }
    table
}

proptest! {
    /// Filter output never keeps blank, comment, or instrumentation lines.
    #[test]
    fn prop_filter_output_is_clean(
        raw in prop::collection::vec(
            prop_oneof![
                "[ \t]{0,4}",
                "[ ]{0,4}# [a-z ]{0,10}",
                "[ ]{0,4}self\\.log_event\\([a-z]{0,5}\\)",
                "[ ]{0,4}[a-z]{1,6}\\([a-z#]{0,6}\\)",
            ],
            0..40,
        )
    ) {
        let markers = Markers::default();
        let kept = semantic_lines(&raw, &markers);
        for line in &kept {
            prop_assert!(!line.trim().is_empty());
            prop_assert!(!line.trim().starts_with(markers.comment.as_str()));
            prop_assert!(!line.contains(markers.instrumentation.as_str()));
        }
        prop_assert!(kept.len() <= raw.len());
    }

    /// A composite with k invoking lines costs (n - k) + sum of their costs.
    #[test]
    fn prop_monotonic_substitution(
        costs in prop::collection::vec(1usize..50, 1..6),
        plain in prop::collection::vec(plain_line(), 0..20),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let table = primitive_table(&costs);
        let calc = CompositeCalculator::new(&table, &Markers::default()).unwrap();

        let mut body = plain.clone();
        let mut expected = plain.len();
        for pick in &picks {
            let i = pick.index(costs.len());
            body.push(format!("    await self.prim{i}Action.run(target)"));
            expected += costs[i];
        }

        let cost = calc.cost(&body);
        prop_assert_eq!(cost.total, expected);
        prop_assert_eq!(cost.substituted_lines, picks.len());
        prop_assert_eq!(cost.literal_lines, plain.len());
    }

    /// No composite invocation means nothing saved.
    #[test]
    fn prop_zero_invocations_save_nothing(
        costs in prop::collection::vec(1usize..50, 0..6),
        body in prop::collection::vec(plain_line(), 0..30),
    ) {
        let table = composite_table(&costs);
        let agg = StrategyAggregator::new(&table, &Markers::default()).unwrap();
        let record = agg.aggregate("S", &body);
        prop_assert_eq!(record.saved_lines, 0);
        prop_assert_eq!(record.hypothetical_total, record.actual_lines);
        prop_assert_eq!(record.actual_lines, body.len());
    }

    /// Primitive cost decomposes into its three substituted parts.
    #[test]
    fn prop_primitive_decomposition(
        add_cost in 0usize..20,
        remove_cost in 0usize..20,
        create_plain in 0usize..10,
        create_calls in 0usize..5,
        reset_plain in 0usize..10,
        reset_calls in 0usize..5,
        result_lines in 0usize..10,
    ) {
        let create: Vec<String> = std::iter::repeat("x = 1".to_string())
            .take(create_plain)
            .chain(std::iter::repeat("await self.add_fact(f)".to_string()).take(create_calls))
            .collect();
        let reset: Vec<String> = std::iter::repeat("y = 2".to_string())
            .take(reset_plain)
            .chain(std::iter::repeat("await self.remove_fact(f)".to_string()).take(reset_calls))
            .collect();
        let result: Vec<String> = vec!["return r".to_string(); result_lines];

        let calc = PrimitiveCalculator::new(
            SharedRoutines::new(add_cost, remove_cost),
            &Markers::default(),
        );
        let cost = calc.cost(&Lifecycle {
            create_facts: &create,
            reset_facts: &reset,
            get_result: &result,
        });

        prop_assert_eq!(cost.create_facts, create_plain + create_calls * add_cost);
        prop_assert_eq!(cost.reset_facts, reset_plain + reset_calls * remove_cost);
        prop_assert_eq!(cost.get_result, result_lines);
        prop_assert_eq!(cost.total(), cost.create_facts + cost.reset_facts + cost.get_result);
    }

    /// Saved lines equal the summed costs of invoked composed actions.
    #[test]
    fn prop_saved_lines_sum(
        costs in prop::collection::vec(1usize..50, 1..6),
        plain in prop::collection::vec(plain_line(), 0..10),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let table = composite_table(&costs);
        let agg = StrategyAggregator::new(&table, &Markers::default()).unwrap();

        let mut body = plain.clone();
        let mut saved = 0;
        for pick in &picks {
            let i = pick.index(costs.len());
            body.push(format!("await self.comp{i}Action.run()"));
            saved += costs[i];
        }

        let record = agg.aggregate("S", &body);
        prop_assert_eq!(record.actual_lines, body.len());
        prop_assert_eq!(record.saved_lines, saved);
        prop_assert_eq!(record.hypothetical_total, body.len() + saved);
    }
}

#[test]
fn reference_example_across_tiers() {
    let markers = Markers::default();
    let lines = |raw: &[&str]| raw.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

    let create = lines(&["a = 1", "b = 2", "await self.add_fact(a)"]);
    let reset = lines(&["c = 1", "d = 2"]);
    let result = lines(&["return c"]);
    let primitives = PrimitiveCalculator::new(SharedRoutines::new(4, 2), &markers).build_table([(
        "scanHostAction",
        Lifecycle {
            create_facts: &create,
            reset_facts: &reset,
            get_result: &result,
        },
    )]);
    assert_eq!(primitives.get("scanHostAction"), Some(9));

    let entry = lines(&[
        "a",
        "b",
        "c",
        "d",
        "await self.scanHostAction.run(h)",
    ]);
    let composites = CompositeCalculator::new(&primitives, &markers)
        .unwrap()
        .build_table([("scanAction", entry.as_slice())])
        .table;
    assert_eq!(composites.get("scanAction"), Some(13));

    let routine = lines(&["w", "x", "y", "await self.scanAction.run(n)"]);
    let record = StrategyAggregator::new(&composites, &markers)
        .unwrap()
        .aggregate("Strategy", &routine);
    assert_eq!(record.actual_lines, 4);
    assert_eq!(record.saved_lines, 13);
    assert_eq!(record.hypothetical_total, 17);
}
