//! Numeric display formatting with magnitude scaling.

use crate::data::CellValue;
use crate::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magnitude tier applied to formatted cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    /// Raw value
    #[default]
    None,
    /// Divide by 1e3
    Thousands,
    /// Divide by 1e6
    Millions,
    /// Divide by 1e9
    Billions,
    /// Divide by 1e12
    Trillions,
    /// Pick the largest tier the magnitude reaches
    Auto,
}

/// Auto tiers, largest first.
const AUTO_TIERS: [Scaling; 4] = [
    Scaling::Trillions,
    Scaling::Billions,
    Scaling::Millions,
    Scaling::Thousands,
];

impl Scaling {
    /// All modes in selector order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Thousands,
        Self::Millions,
        Self::Billions,
        Self::Trillions,
        Self::Auto,
    ];

    /// Divisor for a fixed tier. `Auto` has no fixed divisor and returns 1.
    #[must_use]
    pub const fn divisor(self) -> f64 {
        match self {
            Self::None | Self::Auto => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
            Self::Trillions => 1e12,
        }
    }

    /// Compact suffix used when `Auto` lands on this tier.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::None | Self::Auto => "",
            Self::Thousands => "K",
            Self::Millions => "M",
            Self::Billions => "B",
            Self::Trillions => "T",
        }
    }

    /// Wire name, as persisted to the host.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thousands => "thousands",
            Self::Millions => "millions",
            Self::Billions => "billions",
            Self::Trillions => "trillions",
            Self::Auto => "auto",
        }
    }

    /// Human-readable label for selector controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Thousands => "Thousands",
            Self::Millions => "Millions",
            Self::Billions => "Billions",
            Self::Trillions => "Trillions",
            Self::Auto => "Auto",
        }
    }

    /// Resolve `Auto` to the fixed tier for a magnitude.
    #[must_use]
    pub fn resolve(self, value: f64) -> Self {
        if self != Self::Auto {
            return self;
        }
        let magnitude = value.abs();
        AUTO_TIERS
            .into_iter()
            .find(|tier| magnitude >= tier.divisor())
            .unwrap_or(Self::None)
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scaling {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("scaling", s))
    }
}

/// Parse a possibly decorated numeric string ("$1,234.50", "12 %").
///
/// Everything except ASCII digits, `.` and `-` is stripped first, then the
/// longest leading number is read: an optional `-`, digits and at most one
/// `.`. Trailing leftovers are ignored, so `"2024-01-15"` reads as `2024`.
/// Returns `None` when no digit leads the remainder.
#[must_use]
pub fn parse_numeric(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let bytes = stripped.as_bytes();

    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    stripped[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a finite number under a scaling mode.
///
/// Non-finite input yields an empty string.
#[must_use]
pub fn format_number(value: f64, scaling: Scaling) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let tier = scaling.resolve(value);
    let scaled = value / tier.divisor();
    if scaling == Scaling::Auto {
        format!("{scaled:.2}{}", tier.suffix())
    } else {
        format!("{scaled:.2}")
    }
}

/// Format a raw cell value under a scaling mode.
///
/// Numbers are formatted directly, text is parsed with [`parse_numeric`].
/// Anything that does not yield a finite number formats to an empty string.
#[must_use]
pub fn format_value(value: &CellValue, scaling: Scaling) -> String {
    let number = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(text) => parse_numeric(text),
        CellValue::Bool(_) | CellValue::Empty => None,
    };
    number.map_or_else(String::new, |n| format_number(n, scaling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ===== Fixed Tier Tests =====

    #[test]
    fn test_format_millions() {
        assert_eq!(format_value(&CellValue::Number(1_500_000.0), Scaling::Millions), "1.50");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_value(&CellValue::Number(2_300.0), Scaling::Thousands), "2.30");
    }

    #[test]
    fn test_format_billions_and_trillions() {
        assert_eq!(format_number(4_250_000_000.0, Scaling::Billions), "4.25");
        assert_eq!(format_number(7e12, Scaling::Trillions), "7.00");
    }

    #[test]
    fn test_format_none_two_decimals() {
        assert_eq!(format_number(42.0, Scaling::None), "42.00");
        assert_eq!(format_number(-3.456, Scaling::None), "-3.46");
    }

    // ===== Auto Tests =====

    #[test]
    fn test_format_auto_below_thousand() {
        assert_eq!(format_number(999.0, Scaling::Auto), "999.00");
    }

    #[test]
    fn test_format_auto_picks_largest_tier() {
        assert_eq!(format_number(1_000.0, Scaling::Auto), "1.00K");
        assert_eq!(format_number(2_500_000.0, Scaling::Auto), "2.50M");
        assert_eq!(format_number(-3_000_000_000.0, Scaling::Auto), "-3.00B");
        assert_eq!(format_number(1.2e13, Scaling::Auto), "12.00T");
    }

    #[test]
    fn test_resolve_fixed_tier_is_identity() {
        assert_eq!(Scaling::Millions.resolve(5.0), Scaling::Millions);
        assert_eq!(Scaling::Auto.resolve(5.0), Scaling::None);
        assert_eq!(Scaling::Auto.resolve(5e6), Scaling::Millions);
    }

    // ===== Parsing Tests =====

    #[test]
    fn test_format_decorated_text() {
        let value = CellValue::Text("$1,234.50".to_string());
        assert_eq!(format_value(&value, Scaling::None), "1234.50");
    }

    #[test]
    fn test_format_non_numeric_text() {
        let value = CellValue::Text("abc".to_string());
        assert_eq!(format_value(&value, Scaling::None), "");
    }

    #[test]
    fn test_format_bool_and_empty() {
        assert_eq!(format_value(&CellValue::Bool(true), Scaling::None), "");
        assert_eq!(format_value(&CellValue::Empty, Scaling::Auto), "");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_number(f64::NAN, Scaling::None), "");
        assert_eq!(format_number(f64::INFINITY, Scaling::Auto), "");
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("12 %"), Some(12.0));
        assert_eq!(parse_numeric("-7.5"), Some(-7.5));
        assert_eq!(parse_numeric("€"), None);
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_numeric_reads_leading_number() {
        assert_eq!(parse_numeric("1.2.3"), Some(1.2));
        assert_eq!(parse_numeric("2024-01-15"), Some(2024.0));
        assert_eq!(parse_numeric("--5"), None);
        assert_eq!(format_value(&CellValue::from("12-15"), Scaling::None), "12.00");
        assert_eq!(format_value(&CellValue::from("1.2.3"), Scaling::None), "1.20");
    }

    // ===== Scaling Enum Tests =====

    #[test]
    fn test_scaling_from_str() {
        assert_eq!("millions".parse::<Scaling>(), Ok(Scaling::Millions));
        assert_eq!(" Auto ".parse::<Scaling>(), Ok(Scaling::Auto));
        assert!("gazillions".parse::<Scaling>().is_err());
    }

    #[test]
    fn test_scaling_serde_lowercase() {
        let json = serde_json::to_string(&Scaling::Thousands).unwrap();
        assert_eq!(json, "\"thousands\"");
        let parsed: Scaling = serde_json::from_str("\"trillions\"").unwrap();
        assert_eq!(parsed, Scaling::Trillions);
    }

    proptest! {
        #[test]
        fn prop_fixed_tiers_have_two_decimals(n in -1e15f64..1e15, idx in 0usize..5) {
            let out = format_number(n, Scaling::ALL[idx]);
            let decimals = out.rsplit('.').next().unwrap_or_default();
            prop_assert_eq!(decimals.len(), 2);
        }

        #[test]
        fn prop_auto_result_below_thousand_tier(n in -1e15f64..1e15) {
            let tier = Scaling::Auto.resolve(n);
            prop_assert!((n / tier.divisor()).abs() < 1000.0);
        }
    }
}
