use chrono::NaiveDate;
use expense_core::{
    category_totals, filter_by_category, summarize, CategoryConfig, CategoryFilter, Expense,
};
use proptest::prelude::*;
use uuid::Uuid;

const EXTRA_LABELS: &[&str] = &["Mystery", "Travel"];

fn label_for(index: usize, config: &CategoryConfig) -> String {
    config
        .categories()
        .get(index)
        .cloned()
        .unwrap_or_else(|| EXTRA_LABELS[index % EXTRA_LABELS.len()].to_string())
}

fn expenses_strategy() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec((1u32..1_000_000u32, 0usize..9), 0..40).prop_map(|items| {
        let config = CategoryConfig::default();
        let count = items.len() as i64;
        items
            .into_iter()
            .enumerate()
            .map(|(index, (cents, category))| Expense {
                id: Uuid::new_v4(),
                title: format!("expense {index}"),
                amount: f64::from(cents) / 100.0,
                category: label_for(category, &config),
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                created_at: count - index as i64,
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = CategoryFilter> {
    prop_oneof![
        Just(CategoryFilter::All),
        (0usize..7).prop_map(|index| {
            CategoryFilter::Category(label_for(index, &CategoryConfig::default()))
        }),
    ]
}

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= 1e-6 * left.abs().max(right.abs()).max(1.0)
}

proptest! {
    #[test]
    fn totals_cover_every_configured_amount(expenses in expenses_strategy()) {
        let config = CategoryConfig::default();
        let totals = category_totals(&expenses, &config);

        let from_totals: f64 = totals.iter().map(|t| t.total).sum();
        let configured: f64 = expenses
            .iter()
            .filter(|e| config.contains(&e.category))
            .map(|e| e.amount)
            .sum();
        prop_assert!(approx_eq(from_totals, configured));
    }

    #[test]
    fn totals_are_positive_and_in_configured_order(expenses in expenses_strategy()) {
        let config = CategoryConfig::default();
        let totals = category_totals(&expenses, &config);

        prop_assert!(totals.iter().all(|t| t.total > 0.0));
        let positions: Vec<usize> = totals
            .iter()
            .map(|t| config.index_of(&t.name).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn all_filter_is_identity(expenses in expenses_strategy()) {
        prop_assert_eq!(filter_by_category(&expenses, &CategoryFilter::All), expenses);
    }

    #[test]
    fn category_filter_is_matching_subsequence(
        expenses in expenses_strategy(),
        filter in filter_strategy(),
    ) {
        let filtered = filter_by_category(&expenses, &filter);
        prop_assert!(filtered.iter().all(|e| filter.matches(e)));

        let mut cursor = expenses.iter();
        for kept in &filtered {
            prop_assert!(cursor.any(|candidate| candidate.id == kept.id));
        }
        let expected = expenses.iter().filter(|e| filter.matches(e)).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn average_times_count_is_total(
        expenses in expenses_strategy(),
        filter in filter_strategy(),
    ) {
        let summary = summarize(&filter_by_category(&expenses, &filter));
        if summary.count == 0 {
            prop_assert_eq!(summary.total_amount, 0.0);
            prop_assert_eq!(summary.average, 0.0);
        } else {
            prop_assert!(approx_eq(summary.average * summary.count as f64, summary.total_amount));
        }
    }
}

#[test]
fn empty_list_has_no_totals_and_zero_summary() {
    let summary = summarize(&[]);
    assert_eq!(summary.total_amount, 0.0);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, 0.0);
    assert!(category_totals(&[], &CategoryConfig::default()).is_empty());
}
