//! Engineering Notation
//!
//! Converts raw values to SI-prefixed engineering notation and back:
//! - `4700.0` with suffix `"Ω"` renders as `"4.70 KΩ"`
//! - significand `4.7` with prefix index 5 (kilo) parses to `4700.0`
//!
//! The prefix table has nine buckets, `1e-12` up to `1e12` in steps of 1000:
//!
//! | index | threshold | symbol |
//! |-------|-----------|--------|
//! | 0     | 1e-12     | f      |
//! | 1     | 1e-9      | n      |
//! | 2     | 1e-6      | µ      |
//! | 3     | 1e-3      | m      |
//! | 4     | 1         |        |
//! | 5     | 1e3       | K      |
//! | 6     | 1e6       | M      |
//! | 7     | 1e9       | G      |
//! | 8     | 1e12      | T      |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::series::{self, scale, EiaSeries, SeriesError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("Tolerance must be non-negative, got {0}")]
    NegativeTolerance(f64),
    #[error("Invalid engineering value: {0}")]
    InvalidValue(String),
}

/// Lower bound of each prefix bucket
pub const PREFIX_THRESHOLDS: [f64; 9] = [1e-12, 1e-9, 1e-6, 1e-3, 1.0, 1e3, 1e6, 1e9, 1e12];

/// Display symbol of each prefix bucket
pub const PREFIX_SYMBOLS: [&str; 9] = ["f", "n", "µ", "m", "", "K", "M", "G", "T"];

/// Unit suffix for resistances
pub const OHMS: &str = "Ω";

/// Digits kept when rendering editable numbers before trailing zeros are trimmed
const EDIT_PRECISION: usize = 6;

/// Magnitude prefix, one per entry of [`PREFIX_THRESHOLDS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiPrefix {
    Femto,
    Nano,
    Micro,
    Milli,
    Unit,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl SiPrefix {
    pub const ALL: [SiPrefix; 9] = [
        SiPrefix::Femto,
        SiPrefix::Nano,
        SiPrefix::Micro,
        SiPrefix::Milli,
        SiPrefix::Unit,
        SiPrefix::Kilo,
        SiPrefix::Mega,
        SiPrefix::Giga,
        SiPrefix::Tera,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn symbol(&self) -> &'static str {
        PREFIX_SYMBOLS[self.index()]
    }

    pub fn multiplier(&self) -> f64 {
        PREFIX_THRESHOLDS[self.index()]
    }

    /// Power of ten of the multiplier (-12 for index 0, 0 for unit, 12 for tera)
    pub fn exponent(&self) -> i32 {
        3 * (self.index() as i32 - 4)
    }

    /// Bucket for `value`: the first whose upper neighbour exceeds |value|.
    ///
    /// Zero and non-finite values map to [`SiPrefix::Unit`].
    pub fn for_value(value: f64) -> Self {
        let magnitude = value.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return SiPrefix::Unit;
        }
        let last = PREFIX_THRESHOLDS.len() - 1;
        let index = (0..last)
            .find(|&i| magnitude < PREFIX_THRESHOLDS[i + 1])
            .unwrap_or(last);
        Self::ALL[index]
    }
}

/// Fixed decimals for a scaled significand
fn decimals_for(engr: f64) -> usize {
    if engr >= 100.0 {
        0
    } else if engr >= 10.0 {
        1
    } else if engr >= 1.0 {
        2
    } else {
        3
    }
}

fn trim_trailing_zeros(mut text: String) -> String {
    if text.contains('.') {
        let len = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(len);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Significand after rounding to its display decimals
fn displayed_significand(engr: f64) -> f64 {
    format!("{:.*}", decimals_for(engr), engr)
        .parse()
        .unwrap_or(engr)
}

/// Render `value` as `"<significand> <prefix><suffix>"`.
///
/// Negative values keep their sign and use the bucket of their magnitude,
/// zero renders unprefixed and non-finite values are printed as-is.
/// Decimals follow the rounded significand, so `9.996` renders as `"10.0"`,
/// and a carry to 1000 (`999.7`) moves up one prefix to `"1.00 KΩ"`.
pub fn engineering_format(value: f64, suffix: &str) -> String {
    if !value.is_finite() {
        return format!("{} {}", value, suffix);
    }
    let magnitude = value.abs();
    let mut prefix = SiPrefix::for_value(value);
    let mut engr = scale(magnitude, -prefix.exponent());

    if displayed_significand(engr) >= 1000.0 {
        if let Some(next) = SiPrefix::from_index(prefix.index() + 1) {
            prefix = next;
            engr = scale(magnitude, -prefix.exponent());
        }
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!(
        "{}{:.*} {}{}",
        sign,
        decimals_for(displayed_significand(engr)),
        engr,
        prefix.symbol(),
        suffix
    )
}

/// Raw value for a significand in the given prefix bucket.
///
/// # Panics
/// When `prefix_index` is not a valid index into [`PREFIX_THRESHOLDS`].
pub fn value_from_sig_exp(significand: f64, prefix_index: usize) -> f64 {
    assert!(
        prefix_index < PREFIX_THRESHOLDS.len(),
        "Prefix index must be below {}, got {}",
        PREFIX_THRESHOLDS.len(),
        prefix_index
    );
    scale(significand, SiPrefix::ALL[prefix_index].exponent())
}

/// Percent string for a tolerance fraction: `0.05` -> `"5"`, `0.001` -> `"0.1"`.
pub fn tolerance_to_string(fraction: f64) -> String {
    trim_trailing_zeros(format!("{:.*}", EDIT_PRECISION, fraction * 100.0))
}

/// Scaled significand of `value` as a plain editable number (`4700.0` -> `"4.7"`).
pub fn significand_to_string(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let prefix = SiPrefix::for_value(value);
    let engr = scale(value, -prefix.exponent());
    trim_trailing_zeros(format!("{:.*}", EDIT_PRECISION, engr))
}

/// Exponent for a prefix symbol typed after a number. `R` is the RKM
/// marker for unit values (`4R7`).
fn prefix_exponent(symbol: char) -> Option<i32> {
    match symbol {
        'f' | 'p' => Some(-12),
        'n' => Some(-9),
        'u' | 'µ' | 'μ' => Some(-6),
        'm' => Some(-3),
        'R' => Some(0),
        'k' | 'K' => Some(3),
        'M' => Some(6),
        'G' => Some(9),
        'T' => Some(12),
        _ => None,
    }
}

/// Parse typed engineering text such as `"4.7k"`, `"4.70 KΩ"`, `"100nF"` or `"1e3"`.
///
/// The number may be followed by one prefix symbol and then unit text, which
/// is ignored. Prefixes are case sensitive where it matters: `m` is milli,
/// `M` (or `meg`) is mega. `p` is accepted as an alias of the lowest bucket
/// so capacitor values like `"22pF"` parse.
///
/// RKM notation puts the prefix in place of the decimal point: `"4k7"` is
/// 4700, `"2M2"` is 2.2e6 and `"4R7"` is 4.7. Digits anywhere else in the
/// unit text are rejected.
pub fn parse_engineering(text: &str) -> Result<f64, ValueError> {
    let invalid = || ValueError::InvalidValue(text.to_string());
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    let mut end = 0;
    while end < chars.len() && (chars[end].is_ascii_digit() || matches!(chars[end], '.' | '-' | '+')) {
        end += 1;
    }
    // Optional exponent, only when digits follow
    if end < chars.len() && matches!(chars[end], 'e' | 'E') {
        let mut exp_end = end + 1;
        if exp_end < chars.len() && matches!(chars[exp_end], '-' | '+') {
            exp_end += 1;
        }
        if exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
            while exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            end = exp_end;
        }
    }

    let num_str: String = chars[..end].iter().collect();
    if num_str.is_empty() {
        return Err(invalid());
    }
    let number = num_str.parse::<f64>().map_err(|_| invalid())?;

    let rest: String = chars[end..].iter().collect();
    let rest = rest.trim_start();
    let (exponent, after_prefix) = if rest.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("meg")) {
        (6, &rest[3..])
    } else {
        match rest.chars().next().and_then(|c| prefix_exponent(c).map(|e| (e, c))) {
            Some((e, symbol)) => (e, &rest[symbol.len_utf8()..]),
            None => (0, rest),
        }
    };

    let fraction: String = after_prefix
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let is_integer = num_str
        .trim_start_matches(|c: char| c == '-' || c == '+')
        .chars()
        .all(|c| c.is_ascii_digit());

    let has_prefix = after_prefix.len() < rest.len();

    let (number, unit) = if has_prefix && is_integer && !fraction.is_empty() {
        let rkm = format!("{}.{}", num_str, fraction);
        (rkm.parse::<f64>().map_err(|_| invalid())?, &after_prefix[fraction.len()..])
    } else {
        (number, after_prefix)
    };
    if unit.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok(scale(number, exponent))
}

/// A value with a tolerance and a unit, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeringValue {
    value: f64,
    tolerance: f64,
    units: String,
}

impl EngineeringValue {
    pub fn new(value: f64, tolerance: f64, units: impl Into<String>) -> Result<Self, ValueError> {
        if tolerance < 0.0 || tolerance.is_nan() {
            return Err(ValueError::NegativeTolerance(tolerance));
        }
        Ok(Self {
            value,
            tolerance,
            units: units.into(),
        })
    }

    /// Zero-tolerance value
    pub fn exact(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            tolerance: 0.0,
            units: units.into(),
        }
    }

    /// Build from a significand and prefix bucket, e.g. `(4.7, Kilo)`.
    pub fn from_sig_exp(significand: f64, prefix: SiPrefix, units: impl Into<String>) -> Self {
        Self::exact(value_from_sig_exp(significand, prefix.index()), units)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Tolerance as a fraction (0.05 = 5%)
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn prefix(&self) -> SiPrefix {
        SiPrefix::for_value(self.value)
    }

    /// Same units and tolerance, new value
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            tolerance: self.tolerance,
            units: self.units.clone(),
        }
    }

    pub fn with_tolerance(&self, tolerance: f64) -> Result<Self, ValueError> {
        Self::new(self.value, tolerance, self.units.clone())
    }

    pub fn min_value(&self) -> f64 {
        self.value * (1.0 - self.tolerance)
    }

    pub fn max_value(&self) -> f64 {
        self.value * (1.0 + self.tolerance)
    }

    pub fn significand_string(&self) -> String {
        significand_to_string(self.value)
    }

    pub fn tolerance_string(&self) -> String {
        tolerance_to_string(self.tolerance)
    }
}

impl fmt::Display for EngineeringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", engineering_format(self.value, &self.units))
    }
}

/// A resistance tagged with the series it was picked from.
///
/// Tolerance starts at the series' recommended tolerance and can be
/// overridden independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EiaResistorValue {
    value: EngineeringValue,
    series: EiaSeries,
}

impl EiaResistorValue {
    /// Resistance in ohms with the series tolerance
    pub fn new(ohms: f64, series: EiaSeries) -> Self {
        Self {
            value: EngineeringValue {
                value: ohms,
                tolerance: series.tolerance(),
                units: OHMS.to_string(),
            },
            series,
        }
    }

    /// Wrap an existing value, keeping its units and tolerance.
    pub fn from_engineering(value: EngineeringValue, series: EiaSeries) -> Self {
        Self { value, series }
    }

    pub fn value(&self) -> &EngineeringValue {
        &self.value
    }

    pub fn series(&self) -> EiaSeries {
        self.series
    }

    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value: self.value.with_value(value),
            series: self.series,
        }
    }

    pub fn with_tolerance(&self, tolerance: f64) -> Result<Self, ValueError> {
        Ok(Self {
            value: self.value.with_tolerance(tolerance)?,
            series: self.series,
        })
    }

    pub fn is_standard(&self) -> bool {
        series::is_standard_value(self.value.value(), self.series)
    }

    /// Nearest standard value of the same series, keeping units and tolerance
    pub fn nearest(&self) -> Result<Self, SeriesError> {
        let nearest = series::nearest_standard_value(self.value.value(), self.series)?;
        Ok(self.with_value(nearest))
    }

    /// Deviation of the nearest standard value from this one, in percent
    pub fn error_percent(&self) -> Result<f64, SeriesError> {
        let nearest = self.nearest()?;
        Ok(series::percent_error(nearest.value.value(), self.value.value()))
    }
}

impl fmt::Display for EiaResistorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engineering_format() {
        assert_eq!(engineering_format(4700.0, "Ω"), "4.70 KΩ");
        assert_eq!(engineering_format(47_000.0, "Ω"), "47.0 KΩ");
        assert_eq!(engineering_format(470_000.0, "Ω"), "470 KΩ");
        assert_eq!(engineering_format(0.33, "Ω"), "330 mΩ");
        assert_eq!(engineering_format(1.0, "V"), "1.00 V");
        assert_eq!(engineering_format(2.2e6, "Ω"), "2.20 MΩ");
        assert_eq!(engineering_format(100e-9, "F"), "100 nF");
        assert_eq!(engineering_format(4.7e-6, "F"), "4.70 µF");
    }

    #[test]
    fn test_engineering_format_extremes() {
        // Above the top threshold everything stays in tera
        assert_eq!(engineering_format(4.7e15, "Ω"), "4700 TΩ");
        // Below the bottom threshold the significand drops under 1
        assert_eq!(engineering_format(4.7e-13, "F"), "0.470 fF");
    }

    #[test]
    fn test_engineering_format_rounding_carry() {
        assert_eq!(engineering_format(999.7, "Ω"), "1.00 KΩ");
        assert_eq!(engineering_format(0.9999, "Ω"), "1.00 Ω");
        assert_eq!(engineering_format(999_700.0, "Ω"), "1.00 MΩ");
        assert_eq!(engineering_format(9.996, "V"), "10.0 V");
        assert_eq!(engineering_format(99.96, "V"), "100 V");
        assert_eq!(engineering_format(-999.7, "Ω"), "-1.00 KΩ");
        assert_eq!(engineering_format(999.4, "Ω"), "999 Ω");
        // Nothing above tera to carry into
        assert_eq!(engineering_format(999.7e12, "Ω"), "1000 TΩ");
    }

    #[test]
    fn test_engineering_format_non_positive() {
        assert_eq!(engineering_format(0.0, "Ω"), "0.000 Ω");
        assert_eq!(engineering_format(-4700.0, "Ω"), "-4.70 KΩ");
        assert_eq!(engineering_format(-0.0047, "A"), "-4.70 mA");
    }

    #[test]
    fn test_prefix_buckets() {
        assert_eq!(SiPrefix::for_value(1.0), SiPrefix::Unit);
        assert_eq!(SiPrefix::for_value(999.0), SiPrefix::Unit);
        assert_eq!(SiPrefix::for_value(1000.0), SiPrefix::Kilo);
        assert_eq!(SiPrefix::for_value(0.001), SiPrefix::Milli);
        assert_eq!(SiPrefix::for_value(0.0), SiPrefix::Unit);
        assert_eq!(SiPrefix::for_value(f64::NAN), SiPrefix::Unit);
        assert_eq!(SiPrefix::Femto.exponent(), -12);
        assert_eq!(SiPrefix::Tera.exponent(), 12);
        for prefix in SiPrefix::ALL {
            assert_eq!(SiPrefix::from_index(prefix.index()), Some(prefix));
        }
        assert_eq!(SiPrefix::from_index(9), None);
    }

    #[test]
    fn test_value_from_sig_exp() {
        assert_eq!(value_from_sig_exp(4.7, 5), 4700.0);
        assert_eq!(value_from_sig_exp(4.7, 4), 4.7);
        assert_eq!(value_from_sig_exp(100.0, 1), 100e-9);
        assert_eq!(value_from_sig_exp(2.2, 6), 2.2e6);
    }

    #[test]
    #[should_panic(expected = "Prefix index")]
    fn test_value_from_sig_exp_bad_index() {
        value_from_sig_exp(1.0, 9);
    }

    #[test]
    fn test_tolerance_to_string() {
        assert_eq!(tolerance_to_string(0.05), "5");
        assert_eq!(tolerance_to_string(0.001), "0.1");
        assert_eq!(tolerance_to_string(0.20), "20");
        assert_eq!(tolerance_to_string(0.0025), "0.25");
        assert_eq!(tolerance_to_string(0.0), "0");
    }

    #[test]
    fn test_significand_to_string() {
        assert_eq!(significand_to_string(4700.0), "4.7");
        assert_eq!(significand_to_string(0.33), "330");
        assert_eq!(significand_to_string(1e6), "1");
        assert_eq!(significand_to_string(12_345.0), "12.345");
        assert_eq!(significand_to_string(-4700.0), "-4.7");
    }

    #[test]
    fn test_significand_round_trip() {
        for raw in [4700.0, 0.33, 2.2e6, 100e-9, 47.0] {
            let prefix = SiPrefix::for_value(raw);
            let sig: f64 = significand_to_string(raw).parse().unwrap();
            let back = value_from_sig_exp(sig, prefix.index());
            assert!((back - raw).abs() <= raw * 1e-12, "{} -> {}", raw, back);
        }
    }

    #[test]
    fn test_parse_engineering() {
        assert_eq!(parse_engineering("4.7k").unwrap(), 4700.0);
        assert_eq!(parse_engineering("4.70 KΩ").unwrap(), 4700.0);
        assert_eq!(parse_engineering("100").unwrap(), 100.0);
        assert_eq!(parse_engineering("1M").unwrap(), 1e6);
        assert_eq!(parse_engineering("1 meg").unwrap(), 1e6);
        assert_eq!(parse_engineering("330 mΩ").unwrap(), 0.33);
        assert_eq!(parse_engineering("100nF").unwrap(), 100e-9);
        assert_eq!(parse_engineering("4.7uF").unwrap(), 4.7e-6);
        assert_eq!(parse_engineering("10µF").unwrap(), 10e-6);
        assert_eq!(parse_engineering("22pF").unwrap(), 22e-12);
        assert_eq!(parse_engineering("1e3").unwrap(), 1000.0);
        assert_eq!(parse_engineering("  12 V ").unwrap(), 12.0);
    }

    #[test]
    fn test_parse_engineering_rkm() {
        assert_eq!(parse_engineering("4k7").unwrap(), 4700.0);
        assert_eq!(parse_engineering("2M2").unwrap(), 2.2e6);
        assert_eq!(parse_engineering("4R7").unwrap(), 4.7);
        assert_eq!(parse_engineering("100R").unwrap(), 100.0);
        assert_eq!(parse_engineering("1m5").unwrap(), 1.5e-3);
        assert_eq!(parse_engineering("4k7Ω").unwrap(), 4700.0);
        assert_eq!(parse_engineering("-4k7").unwrap(), -4700.0);
    }

    #[test]
    fn test_parse_engineering_rejects_stray_digits() {
        for text in ["4.7k7", "1e3k5", "4k7.5", "12 V5", "4 7"] {
            assert_eq!(
                parse_engineering(text),
                Err(ValueError::InvalidValue(text.to_string())),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_engineering_invalid() {
        assert!(matches!(
            parse_engineering("abc"),
            Err(ValueError::InvalidValue(s)) if s == "abc"
        ));
        assert!(parse_engineering("").is_err());
        assert!(parse_engineering("1.2.3k").is_err());
    }

    #[test]
    fn test_format_then_parse() {
        for raw in [4700.0, 0.33, 2.2e6, 15.0] {
            let text = engineering_format(raw, OHMS);
            assert_eq!(parse_engineering(&text).unwrap(), raw, "{}", text);
        }
    }

    #[test]
    fn test_engineering_value() {
        let v = EngineeringValue::new(4700.0, 0.05, OHMS).unwrap();
        assert_eq!(v.to_string(), "4.70 KΩ");
        assert_eq!(v.prefix(), SiPrefix::Kilo);
        assert_eq!(v.significand_string(), "4.7");
        assert_eq!(v.tolerance_string(), "5");
        assert!((v.min_value() - 4465.0).abs() < 1e-9);
        assert!((v.max_value() - 4935.0).abs() < 1e-9);

        let changed = v.with_value(10_000.0);
        assert_eq!(changed.units(), "Ω");
        assert_eq!(changed.tolerance(), 0.05);
        assert_eq!(v.value(), 4700.0);
    }

    #[test]
    fn test_engineering_value_rejects_negative_tolerance() {
        assert_eq!(
            EngineeringValue::new(1.0, -0.01, OHMS),
            Err(ValueError::NegativeTolerance(-0.01))
        );
        let v = EngineeringValue::exact(1.0, "V");
        assert!(v.with_tolerance(-1.0).is_err());
        assert_eq!(v.with_tolerance(0.1).unwrap().tolerance(), 0.1);
    }

    #[test]
    fn test_from_sig_exp() {
        let v = EngineeringValue::from_sig_exp(2.2, SiPrefix::Micro, "F");
        assert_eq!(v.value(), 2.2e-6);
        assert_eq!(v.to_string(), "2.20 µF");
    }

    #[test]
    fn test_eia_resistor_value() {
        let r = EiaResistorValue::new(4750.0, EiaSeries::E24);
        assert_eq!(r.value().tolerance(), 0.05);
        assert!(!r.is_standard());

        let nearest = r.nearest().unwrap();
        assert_eq!(nearest.value().value(), 4700.0);
        assert!(nearest.is_standard());
        assert_eq!(nearest.series(), EiaSeries::E24);

        let err = r.error_percent().unwrap();
        assert!((err + 1.0526).abs() < 1e-3);
    }

    #[test]
    fn test_eia_resistor_tolerance_override() {
        let r = EiaResistorValue::new(1000.0, EiaSeries::E12)
            .with_tolerance(0.01)
            .unwrap();
        assert_eq!(r.value().tolerance(), 0.01);
        assert_eq!(r.nearest().unwrap().value().tolerance(), 0.01);
        assert_eq!(r.to_string(), "1.00 KΩ (E12)");
    }
}
