//! Property-based tests for costing and checklist progress.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use dogflow_core::costing::{compute_cost, round_money};
use dogflow_core::session::{apply_toggle, progress};
use dogflow_db::models::{Checklist, ChecklistItem, IngredientLine};

fn line(quantity_milli: i64, cost_cents: i64) -> IngredientLine {
    IngredientLine {
        ingredient_name: format!("insumo-{quantity_milli}-{cost_cents}"),
        unit: "un".to_owned(),
        quantity: Decimal::new(quantity_milli, 3),
        unit_cost: Decimal::new(cost_cents, 2),
    }
}

fn checklist(done: Vec<bool>) -> Checklist {
    Checklist {
        id: Uuid::new_v4(),
        date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        template_name: "Abertura".to_owned(),
        items: done
            .into_iter()
            .map(|d| ChecklistItem {
                name: "passo".to_owned(),
                done: d,
                completed_at: d.then(Utc::now),
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn compute_cost_ignores_line_order(
        raw in prop::collection::vec((0i64..100_000, 0i64..100_000), 0..12),
        seed in any::<u64>(),
    ) {
        let lines: Vec<IngredientLine> = raw.iter().map(|&(q, c)| line(q, c)).collect();
        let mut shuffled = lines.clone();
        let n = shuffled.len();
        if n > 1 {
            let rotate_by = (seed as usize) % n;
            shuffled.rotate_left(rotate_by);
            shuffled.reverse();
        }
        prop_assert_eq!(compute_cost(&lines).unwrap(), compute_cost(&shuffled).unwrap());
    }

    #[test]
    fn compute_cost_is_rounded_literal_sum(
        raw in prop::collection::vec((0i64..100_000, 0i64..100_000), 0..12),
    ) {
        let lines: Vec<IngredientLine> = raw.iter().map(|&(q, c)| line(q, c)).collect();
        let mut sum = Decimal::ZERO;
        for l in &lines {
            sum += l.quantity * l.unit_cost;
        }
        let cost = compute_cost(&lines).unwrap();
        prop_assert_eq!(cost, round_money(sum));
        prop_assert!(cost.scale() <= 2);
    }

    #[test]
    fn progress_bounds_and_formula(done in prop::collection::vec(any::<bool>(), 0..40)) {
        let c = checklist(done);
        let p = progress(&c);
        let expected_total = c.items.len().max(1);
        prop_assert!(p.done <= p.total);
        prop_assert_eq!(p.total, expected_total);
        prop_assert_eq!(p.percent as usize, 100 * p.done / expected_total);
    }

    #[test]
    fn toggling_twice_restores_state(start_done in any::<bool>()) {
        let mut item = ChecklistItem {
            name: "passo".to_owned(),
            done: start_done,
            completed_at: start_done.then(Utc::now),
        };
        let original_done = item.done;

        apply_toggle(&mut item, Utc::now());
        prop_assert_eq!(item.done, !original_done);
        prop_assert_eq!(item.completed_at.is_some(), item.done);

        apply_toggle(&mut item, Utc::now());
        prop_assert_eq!(item.done, original_done);
        prop_assert_eq!(item.completed_at.is_some(), item.done);
    }
}
