//! Render-ready view model.
//!
//! Everything the presentation layer draws is derived here from one snapshot,
//! the active filter and the active tab. Chart datasets are plain arrays so
//! they can be serialized straight into a charting front end.

use super::aggregation::{
    category_totals, color_for, filter_by_category, summarize, CategoryFilter, CategoryTotal,
    ViewSummary,
};
use crate::config::CategoryConfig;
use crate::format::CurrencyFormat;
use crate::model::expense::Expense;
use serde::{Deserialize, Serialize};

/// Alpha suffix appended to a category color for the badge background.
const BADGE_BACKGROUND_ALPHA: &str = "22";

/// Which panel is visible below the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    List,
    Charts,
}

/// One line of the expense list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRow {
    pub expense: Expense,
    /// `None` for categories outside the configuration.
    pub badge_color: Option<String>,
    pub badge_background: Option<String>,
    pub amount_label: String,
}

/// Labels, values and colors of one chart, index-aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    /// Dataset legend; empty for the pie chart.
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartData {
    fn from_totals(
        dataset_label: impl Into<String>,
        totals: &[CategoryTotal],
        config: &CategoryConfig,
    ) -> Self {
        Self {
            dataset_label: dataset_label.into(),
            labels: totals.iter().map(|total| total.name.clone()).collect(),
            values: totals.iter().map(|total| total.total).collect(),
            // Totals only ever name configured categories.
            colors: totals
                .iter()
                .filter_map(|total| color_for(&total.name, config))
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Complete derived state for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseView {
    pub tab: Tab,
    pub filter: CategoryFilter,
    pub filter_label: String,
    pub rows: Vec<ExpenseRow>,
    pub summary: ViewSummary,
    pub total_label: String,
    pub average_label: String,
    pub category_totals: Vec<CategoryTotal>,
    pub pie: ChartData,
    pub bar: ChartData,
    /// The filtered list has nothing to show.
    pub list_empty: bool,
    /// The store has no expenses at all.
    pub charts_empty: bool,
}

impl ExpenseView {
    /// Serializes the view for a JSON-speaking front end.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Builds the view for `expenses` (newest first) under `filter`.
///
/// Summary and rows follow the filter; totals and charts use every expense.
pub fn build_view(
    expenses: &[Expense],
    filter: &CategoryFilter,
    tab: Tab,
    config: &CategoryConfig,
    currency: &CurrencyFormat,
) -> ExpenseView {
    let filtered = filter_by_category(expenses, filter);
    let summary = summarize(&filtered);
    let totals = category_totals(expenses, config);

    let rows = filtered
        .into_iter()
        .map(|expense| {
            let badge_color = color_for(&expense.category, config).map(str::to_string);
            ExpenseRow {
                badge_background: badge_color
                    .as_ref()
                    .map(|color| format!("{color}{BADGE_BACKGROUND_ALPHA}")),
                badge_color,
                amount_label: currency.format(expense.amount),
                expense,
            }
        })
        .collect::<Vec<_>>();

    ExpenseView {
        tab,
        filter: filter.clone(),
        filter_label: filter.label(config).to_string(),
        list_empty: rows.is_empty(),
        charts_empty: expenses.is_empty(),
        rows,
        summary,
        total_label: currency.format(summary.total_amount),
        average_label: currency.format(summary.average),
        pie: ChartData::from_totals("", &totals, config),
        bar: ChartData::from_totals(currency.spending_label(), &totals, config),
        category_totals: totals,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_view, Tab};
    use crate::config::CategoryConfig;
    use crate::engine::aggregation::CategoryFilter;
    use crate::format::CurrencyFormat;
    use crate::model::expense::Expense;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn expense(amount: f64, category: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: "item".to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 2).expect("valid date"),
            created_at: 0,
        }
    }

    #[test]
    fn chart_colors_stay_aligned_when_categories_are_skipped() {
        let config = CategoryConfig::default();
        // Food (index 0) is absent, so the first chart slice is Transport.
        let expenses = vec![expense(10.0, "Transport"), expense(4.0, "Other")];

        let view = build_view(
            &expenses,
            &CategoryFilter::All,
            Tab::Charts,
            &config,
            &CurrencyFormat::us_dollar(),
        );

        assert_eq!(view.pie.labels, vec!["Transport", "Other"]);
        assert_eq!(view.pie.colors, vec!["#3b82f6", "#6b7280"]);
        assert_eq!(view.bar.colors, view.pie.colors);
        assert_eq!(view.bar.values, vec![10.0, 4.0]);
        assert_eq!(view.bar.dataset_label, "Spending ($)");
    }

    #[test]
    fn rows_carry_badge_colors_and_labels() {
        let config = CategoryConfig::default();
        let expenses = vec![expense(1234.5, "Food"), expense(2.0, "Mystery")];

        let view = build_view(
            &expenses,
            &CategoryFilter::All,
            Tab::List,
            &config,
            &CurrencyFormat::turkish_lira(),
        );

        assert_eq!(view.rows[0].badge_color.as_deref(), Some("#f59e0b"));
        assert_eq!(view.rows[0].badge_background.as_deref(), Some("#f59e0b22"));
        assert_eq!(view.rows[0].amount_label, "₺1.234,50");
        assert_eq!(view.rows[1].badge_color, None);
        assert_eq!(view.filter_label, "All");
    }

    #[test]
    fn serializes_to_json() {
        let view = build_view(
            &[expense(3.0, "Health")],
            &CategoryFilter::Category("Health".to_string()),
            Tab::List,
            &CategoryConfig::default(),
            &CurrencyFormat::default(),
        );

        let json = view.to_json().expect("view serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["tab"], "list");
        assert_eq!(value["filter"]["category"], "Health");
        assert_eq!(value["pie"]["labels"][0], "Health");
    }
}
