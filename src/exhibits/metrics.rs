//! Arithmetic behind the exhibit callouts
//!
//! Everything here is plain arithmetic over the literal tables: conversion
//! rates, ratios, SME savings, cumulative sums and axis headroom.

use super::data::{CostRange, SmeScenario};

/// Default headroom factor applied above the tallest bar
pub const DEFAULT_HEADROOM: f64 = 1.25;

/// Round to `decimals` decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Active use as a share of awareness, in %, rounded to one decimal
///
/// Returns None when awareness is zero or an input is not finite.
pub fn conversion_rate(usage_pct: f64, awareness_pct: f64) -> Option<f64> {
    if !usage_pct.is_finite() || !awareness_pct.is_finite() || awareness_pct == 0.0 {
        return None;
    }
    Some(round_to(usage_pct / awareness_pct * 100.0, 1))
}

/// numerator / denominator, None for a zero or non-finite denominator
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if !numerator.is_finite() || !denominator.is_finite() || denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Sum of a series (e.g. five-year cumulative savings)
pub fn cumulative(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Largest finite value of a series, 0 when empty
pub fn max_value(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Upper axis limit leaving room above the tallest value for labels
///
/// Never returns zero so an all-zero series still gets a drawable axis.
pub fn headroom(max: f64, factor: f64) -> f64 {
    let limit = max * factor;
    if limit > 0.0 && limit.is_finite() {
        limit
    } else {
        1.0
    }
}

impl SmeScenario {
    /// Monthly MXN freed by moving from the card rate to the instant-payment rate
    pub fn monthly_savings(&self) -> f64 {
        self.monthly_sales_mxn * (self.card_rate - self.instant_rate)
    }

    pub fn annual_savings(&self) -> f64 {
        self.monthly_savings() * 12.0
    }
}

impl CostRange {
    /// Mean of the range
    pub fn midpoint(&self) -> f64 {
        (self.low_pct + self.high_pct) / 2.0
    }

    /// Whisker length on either side of the midpoint
    pub fn half_range(&self) -> f64 {
        (self.high_pct - self.low_pct) / 2.0
    }
}

/// Format with comma thousands separators and no decimals: 45600.0 → "45,600"
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

/// A fractional rate as a short percentage: 0.025 → "2.5", 0.0022 → "0.22"
pub fn format_rate_pct(rate: f64) -> String {
    let text = format!("{:.2}", rate * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::data::{ACCEPTANCE_COST_RANGES, ENIF_2024, SME_SCENARIO, TRANSACTION_GAP};

    #[test]
    fn test_conversion_rates_from_enif() {
        let codi = &ENIF_2024[0];
        let dimo = &ENIF_2024[1];
        assert_eq!(conversion_rate(codi.usage_pct, codi.awareness_pct), Some(33.7));
        assert_eq!(conversion_rate(dimo.usage_pct, dimo.awareness_pct), Some(36.8));
    }

    #[test]
    fn test_conversion_rate_edge_cases() {
        assert_eq!(conversion_rate(5.0, 0.0), None);
        assert_eq!(conversion_rate(f64::NAN, 10.0), None);
        assert_eq!(conversion_rate(0.0, 10.0), Some(0.0));
    }

    #[test]
    fn test_transaction_gap_ratio() {
        let r = ratio(TRANSACTION_GAP.pix_single_day_m, TRANSACTION_GAP.codi_cumulative_m).unwrap();
        assert!((r - 23.25).abs() < 0.01);
        assert_eq!(r.round(), 23.0);
        assert_eq!(ratio(1.0, 0.0), None);
    }

    #[test]
    fn test_sme_savings() {
        assert!((SME_SCENARIO.monthly_savings() - 4_560.0).abs() < 1e-6);
        assert!((SME_SCENARIO.annual_savings() - 54_720.0).abs() < 1e-6);
        assert_eq!(format_thousands(SME_SCENARIO.monthly_savings()), "4,560");
        assert_eq!(format_thousands(SME_SCENARIO.annual_savings()), "54,720");
    }

    #[test]
    fn test_cumulative_and_headroom() {
        let savings = [1.5, 3.0, 4.5, 5.5, 6.0];
        assert!((cumulative(&savings) - 20.5).abs() < 1e-9);
        assert!((headroom(max_value(&savings), DEFAULT_HEADROOM) - 7.5).abs() < 1e-9);
        assert_eq!(headroom(0.0, DEFAULT_HEADROOM), 1.0);
        assert_eq!(max_value(&[]), 0.0);
    }

    #[test]
    fn test_cost_range_midpoints() {
        let cash = &ACCEPTANCE_COST_RANGES[0];
        assert_eq!(cash.midpoint(), 3.5);
        assert_eq!(cash.half_range(), 1.5);

        let pix = &ACCEPTANCE_COST_RANGES[4];
        assert_eq!(pix.midpoint(), 0.22);
        assert_eq!(pix.half_range(), 0.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(200_000.0), "200,000");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-45_600.0), "-45,600");
    }

    #[test]
    fn test_format_rate_pct() {
        assert_eq!(format_rate_pct(SME_SCENARIO.card_rate), "2.5");
        assert_eq!(format_rate_pct(SME_SCENARIO.instant_rate), "0.22");
        assert_eq!(format_rate_pct(0.03), "3");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(33.684, 1), 33.7);
        assert_eq!(round_to(2.0849, 2), 2.08);
    }
}
