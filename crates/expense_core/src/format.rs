//! Currency display formatting.
//!
//! Amounts are shown with a currency symbol, locale separators and exactly
//! two fraction digits.

use serde::{Deserialize, Serialize};

/// Locale-specific currency rendering rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl CurrencyFormat {
    /// `tr-TR` lira format: `₺1.234,50`.
    pub fn turkish_lira() -> Self {
        Self {
            symbol: "₺".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }

    /// `en-US` dollar format: `$1,234.50`.
    pub fn us_dollar() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }

    /// Formats `amount` with the symbol prefix and two fraction digits.
    ///
    /// Sums that overflow `f64` render as `₺∞` / `-₺∞`; `NaN` renders as
    /// `₺NaN`.
    pub fn format(&self, amount: f64) -> String {
        if amount.is_nan() {
            return format!("{}NaN", self.symbol);
        }
        if amount.is_infinite() {
            let sign = if amount < 0.0 { "-" } else { "" };
            return format!("{sign}{}∞", self.symbol);
        }

        let fixed = format!("{:.2}", amount.abs());
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        // `{:.2}` can round a tiny negative value to zero; never print `-0,00`.
        let sign = if amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
            "-"
        } else {
            ""
        };

        format!(
            "{sign}{}{}{}{fraction}",
            self.symbol,
            group_thousands(integer, &self.thousands_separator),
            self.decimal_separator
        )
    }

    /// Label for the bar chart dataset.
    pub fn spending_label(&self) -> String {
        format!("Spending ({})", self.symbol)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::turkish_lira()
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + (len / 3) * separator.len());
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::CurrencyFormat;

    #[test]
    fn formats_turkish_lira_with_grouping() {
        let lira = CurrencyFormat::turkish_lira();
        assert_eq!(lira.format(0.0), "₺0,00");
        assert_eq!(lira.format(60.0), "₺60,00");
        assert_eq!(lira.format(1234.5), "₺1.234,50");
        assert_eq!(lira.format(1_234_567.891), "₺1.234.567,89");
    }

    #[test]
    fn formats_us_dollar() {
        let usd = CurrencyFormat::us_dollar();
        assert_eq!(usd.format(999.999), "$1,000.00");
        assert_eq!(usd.format(100000.0), "$100,000.00");
    }

    #[test]
    fn keeps_sign_but_not_negative_zero() {
        let usd = CurrencyFormat::us_dollar();
        assert_eq!(usd.format(-12.5), "-$12.50");
        assert_eq!(usd.format(-0.001), "$0.00");
    }

    #[test]
    fn overflowing_totals_render_as_infinity() {
        let lira = CurrencyFormat::turkish_lira();
        assert_eq!(lira.format(f64::MAX + f64::MAX), "₺∞");
        assert_eq!(lira.format(f64::NEG_INFINITY), "-₺∞");
        assert_eq!(lira.format(f64::NAN), "₺NaN");
    }

    #[test]
    fn spending_label_uses_symbol() {
        assert_eq!(
            CurrencyFormat::turkish_lira().spending_label(),
            "Spending (₺)"
        );
    }
}
