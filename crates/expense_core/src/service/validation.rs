//! Entry form draft and pre-submission validation.
//!
//! # Invariants
//! - A draft that fails validation never reaches a store.
//! - Accepted amounts are strictly positive and at most [`MAX_AMOUNT`].
//! - Accepted titles are trimmed and non-empty.

use crate::config::CategoryConfig;
use crate::model::expense::NewExpense;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest accepted amount. Cents stay exact in `f64` below it, and sums of
/// accepted amounts cannot overflow in practice.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Local, pre-submission validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is blank or nothing was typed into the amount field.
    MissingFields,
    /// Amount is not a number in `(0, MAX_AMOUNT]`.
    InvalidAmount(String),
    /// Category is not part of the configured set.
    UnknownCategory(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "please enter a title and an amount"),
            Self::InvalidAmount(_) => write!(f, "invalid amount"),
            Self::UnknownCategory(name) => write!(f, "unknown category: `{name}`"),
        }
    }
}

impl Error for ValidationError {}

impl ValidationError {
    /// Stable reason code for metadata-only logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::UnknownCategory(_) => "unknown_category",
        }
    }
}

/// Raw entry form state. `amount` holds the text as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    /// Blank draft: first configured category, dated `today`.
    pub fn new(config: &CategoryConfig, today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            amount: String::new(),
            category: config.default_category().to_string(),
            date: today,
        }
    }
}

/// Checks a draft and converts it into a create payload.
pub fn validate_draft(
    draft: &ExpenseDraft,
    config: &CategoryConfig,
) -> Result<NewExpense, ValidationError> {
    let title = draft.title.trim();
    // A whitespace-only amount counts as typed, so it fails as invalid.
    if title.is_empty() || draft.amount.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let amount = parse_amount(draft.amount.trim())
        .ok_or_else(|| ValidationError::InvalidAmount(draft.amount.clone()))?;

    if !config.contains(&draft.category) {
        return Err(ValidationError::UnknownCategory(draft.category.clone()));
    }

    Ok(NewExpense::new(
        title,
        amount,
        draft.category.as_str(),
        draft.date,
    ))
}

fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|amount| *amount > 0.0 && *amount <= MAX_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::{validate_draft, ExpenseDraft, ValidationError};
    use crate::config::CategoryConfig;
    use chrono::NaiveDate;

    fn draft(title: &str, amount: &str) -> ExpenseDraft {
        let mut draft = ExpenseDraft::new(
            &CategoryConfig::default(),
            NaiveDate::from_ymd_opt(2026, 6, 30).expect("valid date"),
        );
        draft.title = title.to_string();
        draft.amount = amount.to_string();
        draft
    }

    #[test]
    fn accepts_and_trims_valid_draft() {
        let fields = validate_draft(&draft("  Groceries ", " 42.5 "), &CategoryConfig::default())
            .expect("valid draft");
        assert_eq!(fields.title, "Groceries");
        assert_eq!(fields.amount, 42.5);
        assert_eq!(fields.category, "Food");
    }

    #[test]
    fn rejects_blank_title_or_amount() {
        let config = CategoryConfig::default();
        assert_eq!(
            validate_draft(&draft("   ", "10"), &config),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_draft(&draft("Taxi", ""), &config),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_amounts() {
        let config = CategoryConfig::default();
        for input in ["-5", "0", "abc", "NaN", "inf", "1,5", "1e300", "   "] {
            let err = validate_draft(&draft("Taxi", input), &config)
                .expect_err("amount must be rejected");
            assert_eq!(err, ValidationError::InvalidAmount(input.to_string()));
            assert_eq!(err.to_string(), "invalid amount");
        }
    }

    #[test]
    fn accepts_amount_up_to_the_cap() {
        let fields = validate_draft(&draft("House", "1000000000000"), &CategoryConfig::default())
            .expect("cap is inclusive");
        assert_eq!(fields.amount, super::MAX_AMOUNT);
    }

    #[test]
    fn rejects_category_outside_config() {
        let mut input = draft("Taxi", "9");
        input.category = "Travel".to_string();
        assert_eq!(
            validate_draft(&input, &CategoryConfig::default()),
            Err(ValidationError::UnknownCategory("Travel".to_string()))
        );
    }
}
