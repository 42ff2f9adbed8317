//! Tracker configuration.
//!
//! # Responsibility
//! - Hold the closed category set, its color palette and the "All" sentinel.
//! - Hold the currency display format.
//! - Load and validate configuration supplied by the embedding application.
//!
//! # Invariants
//! - Category labels are non-empty and unique.
//! - The palette has at least as many entries as there are categories.
//! - The "All" sentinel never collides with a category label.

use crate::format::CurrencyFormat;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Label of the synthetic filter option that selects every category.
pub const DEFAULT_ALL_LABEL: &str = "All";

const REFERENCE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Entertainment",
    "Health",
    "Shopping",
    "Bills",
    "Other",
];

const REFERENCE_PALETTE: &[&str] = &[
    "#f59e0b", "#3b82f6", "#8b5cf6", "#ef4444", "#10b981", "#f97316", "#6b7280",
];

/// Configuration validation and loading errors.
#[derive(Debug)]
pub enum ConfigError {
    NoCategories,
    EmptyCategory,
    DuplicateCategory(String),
    PaletteTooShort { categories: usize, colors: usize },
    EmptyAllLabel,
    AllLabelCollides(String),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCategories => write!(f, "at least one category is required"),
            Self::EmptyCategory => write!(f, "category labels must not be empty"),
            Self::DuplicateCategory(name) => write!(f, "duplicate category: `{name}`"),
            Self::PaletteTooShort { categories, colors } => write!(
                f,
                "palette has {colors} color(s) for {categories} categories"
            ),
            Self::EmptyAllLabel => write!(f, "the all-categories label must not be empty"),
            Self::AllLabelCollides(name) => {
                write!(f, "the all-categories label `{name}` is also a category")
            }
            Self::Parse(err) => write!(f, "invalid tracker config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Ordered category set with its position-matched color palette.
///
/// The category order is the order used by category totals and both charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryConfig {
    categories: Vec<String>,
    palette: Vec<String>,
    all_label: String,
}

impl CategoryConfig {
    /// Builds a validated category configuration.
    ///
    /// # Errors
    /// - Returns an error when the category list is empty, has empty or
    ///   duplicate labels, or the palette is shorter than the category list.
    /// - Returns an error when `all_label` is empty or equals a category.
    pub fn new(
        categories: Vec<String>,
        palette: Vec<String>,
        all_label: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let all_label = all_label.into();
        if categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        for (index, name) in categories.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyCategory);
            }
            if categories[..index].contains(name) {
                return Err(ConfigError::DuplicateCategory(name.clone()));
            }
        }
        if palette.len() < categories.len() {
            return Err(ConfigError::PaletteTooShort {
                categories: categories.len(),
                colors: palette.len(),
            });
        }
        if all_label.trim().is_empty() {
            return Err(ConfigError::EmptyAllLabel);
        }
        if categories.contains(&all_label) {
            return Err(ConfigError::AllLabelCollides(all_label));
        }

        Ok(Self {
            categories,
            palette,
            all_label,
        })
    }

    /// Categories in their fixed display order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn all_label(&self) -> &str {
        &self.all_label
    }

    /// Position of `category` in the configured order.
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|name| name == category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index_of(category).is_some()
    }

    /// First configured category, used as the form default.
    pub fn default_category(&self) -> &str {
        // `new` rejects empty category lists.
        self.categories.first().map(String::as_str).unwrap_or_default()
    }

    /// Filter options in display order: the sentinel, then every category.
    pub fn filter_labels(&self) -> Vec<&str> {
        std::iter::once(self.all_label.as_str())
            .chain(self.categories.iter().map(String::as_str))
            .collect()
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            categories: REFERENCE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            palette: REFERENCE_PALETTE.iter().map(|s| s.to_string()).collect(),
            all_label: DEFAULT_ALL_LABEL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawCategoryConfig {
    categories: Vec<String>,
    palette: Vec<String>,
    #[serde(default = "default_all_label")]
    all_label: String,
}

fn default_all_label() -> String {
    DEFAULT_ALL_LABEL.to_string()
}

impl<'de> Deserialize<'de> for CategoryConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCategoryConfig::deserialize(deserializer)?;
        Self::new(raw.categories, raw.palette, raw.all_label).map_err(serde::de::Error::custom)
    }
}

/// Complete configuration consumed by the tracker session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub currency: CurrencyFormat,
}

impl TrackerConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing sections fall back to the reference configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
