//! EIA / IEC 60063 Preferred-Value Series
//!
//! Canonical mantissas for the E6, E12, E24, E48 and E96 decade series,
//! the EIA-96 multiplier letters used by SMD markings, and the
//! membership / nearest-value searches built on top of them.
//!
//! Every series is decade-periodic: a value is standard when its mantissa
//! (the value scaled into `[1, 10)`) appears in the series table. The tables
//! are the literal rounded values from the standard. They are NOT a
//! `10^(i/n)` progression (E24 carries 2.7, 3.0, 3.3 ... where the formula
//! would round to 2.6, 2.9, 3.2).
//!
//! Reference: IEC 60063:2015 Preferred number series for resistors and capacitors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Value must be positive and finite, got {0}")]
    NonPositive(f64),
    #[error("Unknown EIA series: {0}")]
    UnknownSeries(String),
}

/// E6 mantissas (20% tolerance)
pub const E6_VALUES: [f64; 6] = [1.0, 1.5, 2.2, 3.3, 4.7, 6.8];

/// E12 mantissas (10% tolerance)
pub const E12_VALUES: [f64; 12] = [1.0, 1.2, 1.5, 1.8, 2.2, 2.7, 3.3, 3.9, 4.7, 5.6, 6.8, 8.2];

/// E24 mantissas (5% tolerance)
pub const E24_VALUES: [f64; 24] = [
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0,
    3.3, 3.6, 3.9, 4.3, 4.7, 5.1, 5.6, 6.2, 6.8, 7.5, 8.2, 9.1,
];

/// E48 mantissas (2% tolerance)
pub const E48_VALUES: [f64; 48] = [
    1.00, 1.05, 1.10, 1.15, 1.21, 1.27, 1.33, 1.40, 1.47, 1.54, 1.62, 1.69,
    1.78, 1.87, 1.96, 2.05, 2.15, 2.26, 2.37, 2.49, 2.61, 2.74, 2.87, 3.01,
    3.16, 3.32, 3.48, 3.65, 3.83, 4.02, 4.22, 4.42, 4.64, 4.87, 5.11, 5.36,
    5.62, 5.90, 6.19, 6.49, 6.81, 7.15, 7.50, 7.87, 8.25, 8.66, 9.09, 9.53,
];

/// E96 mantissas (1% tolerance). Also the significand table for EIA-96 SMD codes:
/// code `01` is entry 0, code `96` is entry 95.
pub const E96_VALUES: [f64; 96] = [
    1.00, 1.02, 1.05, 1.07, 1.10, 1.13, 1.15, 1.18, 1.21, 1.24, 1.27, 1.30,
    1.33, 1.37, 1.40, 1.43, 1.47, 1.50, 1.54, 1.58, 1.62, 1.65, 1.69, 1.74,
    1.78, 1.82, 1.87, 1.91, 1.96, 2.00, 2.05, 2.10, 2.15, 2.21, 2.26, 2.32,
    2.37, 2.43, 2.49, 2.55, 2.61, 2.67, 2.74, 2.80, 2.87, 2.94, 3.01, 3.09,
    3.16, 3.24, 3.32, 3.40, 3.48, 3.57, 3.65, 3.74, 3.83, 3.92, 4.02, 4.12,
    4.22, 4.32, 4.42, 4.53, 4.64, 4.75, 4.87, 4.99, 5.11, 5.23, 5.36, 5.49,
    5.62, 5.76, 5.90, 6.04, 6.19, 6.34, 6.49, 6.65, 6.81, 6.98, 7.15, 7.32,
    7.50, 7.68, 7.87, 8.06, 8.25, 8.45, 8.66, 8.87, 9.09, 9.31, 9.53, 9.76,
];

/// Relative tolerance when matching a value against a standard value.
/// Adjacent entries are at least ~1.5% apart, so this only absorbs float noise.
const MANTISSA_EPSILON: f64 = 1e-9;

/// Largest power of ten applied in one step; `10^309` is already infinite.
const MAX_POW10_STEP: i32 = 300;

/// A preferred-value decade series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EiaSeries {
    E6,
    E12,
    E24,
    E48,
    E96,
}

impl Default for EiaSeries {
    fn default() -> Self {
        EiaSeries::E96
    }
}

impl EiaSeries {
    /// All series, coarsest first. Position matches [`EiaSeries::index`].
    pub const ALL: [EiaSeries; 5] = [
        EiaSeries::E6,
        EiaSeries::E12,
        EiaSeries::E24,
        EiaSeries::E48,
        EiaSeries::E96,
    ];

    /// Sorted canonical mantissas in `[1.0, 10.0)`
    pub fn mantissas(&self) -> &'static [f64] {
        match self {
            EiaSeries::E6 => &E6_VALUES,
            EiaSeries::E12 => &E12_VALUES,
            EiaSeries::E24 => &E24_VALUES,
            EiaSeries::E48 => &E48_VALUES,
            EiaSeries::E96 => &E96_VALUES,
        }
    }

    /// Recommended tolerance as a fraction (0.05 = 5%)
    pub fn tolerance(&self) -> f64 {
        match self {
            EiaSeries::E6 => 0.20,
            EiaSeries::E12 => 0.10,
            EiaSeries::E24 => 0.05,
            EiaSeries::E48 => 0.02,
            EiaSeries::E96 => 0.01,
        }
    }

    pub fn values_per_decade(&self) -> usize {
        self.mantissas().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            EiaSeries::E6 => "E6",
            EiaSeries::E12 => "E12",
            EiaSeries::E24 => "E24",
            EiaSeries::E48 => "E48",
            EiaSeries::E96 => "E96",
        }
    }

    /// Position in [`EiaSeries::ALL`], as stored by selection widgets.
    pub fn index(&self) -> usize {
        match self {
            EiaSeries::E6 => 0,
            EiaSeries::E12 => 1,
            EiaSeries::E24 => 2,
            EiaSeries::E48 => 3,
            EiaSeries::E96 => 4,
        }
    }

    /// Lenient lookup for caller-supplied selectors.
    ///
    /// Unrecognized names fall back to E96, the most permissive series.
    pub fn from_selector(selector: &str) -> Self {
        match selector.parse() {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!("{}, falling back to E96", e);
                EiaSeries::E96
            }
        }
    }

    /// Lenient lookup by widget index, falling back to E96 when out of range.
    pub fn from_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(series) => *series,
            None => {
                tracing::warn!("Series index {} out of range, falling back to E96", index);
                EiaSeries::E96
            }
        }
    }
}

impl fmt::Display for EiaSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EiaSeries {
    type Err = SeriesError;

    /// Accepts `"E24"`, `"e24"` or a bare `"24"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('E')
            .or_else(|| trimmed.strip_prefix('e'))
            .unwrap_or(trimmed);
        match digits {
            "6" => Ok(EiaSeries::E6),
            "12" => Ok(EiaSeries::E12),
            "24" => Ok(EiaSeries::E24),
            "48" => Ok(EiaSeries::E48),
            "96" => Ok(EiaSeries::E96),
            _ => Err(SeriesError::UnknownSeries(s.to_string())),
        }
    }
}

/// `mantissa × 10^exponent`, keeping the power of ten exact for negative exponents.
///
/// Exponents beyond the finite range of `f64` powers (subnormal inputs and
/// results) are applied in steps so the power itself never overflows.
pub(crate) fn scale(mut mantissa: f64, mut exponent: i32) -> f64 {
    while exponent > MAX_POW10_STEP {
        mantissa *= 10f64.powi(MAX_POW10_STEP);
        exponent -= MAX_POW10_STEP;
    }
    while exponent < -MAX_POW10_STEP {
        mantissa /= 10f64.powi(MAX_POW10_STEP);
        exponent += MAX_POW10_STEP;
    }
    if exponent >= 0 {
        mantissa * 10f64.powi(exponent)
    } else {
        mantissa / 10f64.powi(-exponent)
    }
}

/// Standard value for a table mantissa in the decade `10^exponent`.
///
/// Goes through the integer significand (4.7 -> 470) so the result is the
/// correctly rounded decimal, e.g. exactly `820.0` rather than `819.9999999999999`.
pub(crate) fn canonical_value(mantissa: f64, exponent: i32) -> f64 {
    scale((mantissa * 100.0).round(), exponent - 2)
}

fn unscale(value: f64, exponent: i32) -> f64 {
    scale(value, -exponent)
}

/// Split a positive finite value into a mantissa in `[1, 10)` and a decade exponent.
pub(crate) fn normalize(value: f64) -> (f64, i32) {
    let mut exponent = value.log10().floor() as i32;
    let mut mantissa = unscale(value, exponent);
    // log10 can land one ulp on the wrong side of an exact power of ten
    if mantissa >= 10.0 {
        exponent += 1;
        mantissa = unscale(value, exponent);
    } else if mantissa < 1.0 {
        exponent -= 1;
        mantissa = unscale(value, exponent);
    }
    (mantissa, exponent)
}

fn check_positive(value: f64) -> Result<f64, SeriesError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SeriesError::NonPositive(value));
    }
    Ok(value)
}

fn value_matches(value: f64, canonical: f64) -> bool {
    // The next decade above ~1e308 overflows to infinity
    canonical.is_finite() && (value - canonical).abs() <= MANTISSA_EPSILON * canonical
}

/// True when `value` is a canonical mantissa of `series` times some power of ten.
///
/// Non-positive and non-finite values are never standard.
pub fn is_standard_value(value: f64, series: EiaSeries) -> bool {
    if check_positive(value).is_err() {
        return false;
    }
    let (_, exponent) = normalize(value);
    let table = series.mantissas();
    // Compared in value space against the same canonical values the nearest
    // search returns, so subnormal standard values still match exactly.
    // The first entry of the next decade covers 9.9999999 ≈ 10.
    table
        .iter()
        .map(|&m| canonical_value(m, exponent))
        .chain(std::iter::once(canonical_value(table[0], exponent + 1)))
        .any(|canonical| value_matches(value, canonical))
}

/// Closest standard value of `series` to `value`, searching across decade boundaries.
///
/// When two candidates are exactly equidistant the smaller one wins.
pub fn nearest_standard_value(value: f64, series: EiaSeries) -> Result<f64, SeriesError> {
    let value = check_positive(value)?;
    let (mantissa, exponent) = normalize(value);
    let table = series.mantissas();

    let split = table.partition_point(|&m| m < mantissa);
    // Below the first entry sits the top of the previous decade; past the
    // last entry sits the first entry of the next decade.
    let lower = match split {
        0 => canonical_value(table[table.len() - 1], exponent - 1),
        i => canonical_value(table[i - 1], exponent),
    };
    let upper = match table.get(split) {
        Some(&m) => canonical_value(m, exponent),
        None => canonical_value(table[0], exponent + 1),
    };

    let nearest = if upper - value < value - lower {
        upper
    } else {
        lower
    };
    tracing::debug!("Nearest {} value to {} is {}", series, value, nearest);
    Ok(nearest)
}

/// Relative deviation of `actual` from `reference` in percent.
///
/// A non-positive reference yields 0 instead of NaN or infinity.
pub fn percent_error(actual: f64, reference: f64) -> f64 {
    if reference <= 0.0 || !reference.is_finite() {
        return 0.0;
    }
    (actual - reference) / reference * 100.0
}

/// All standard values of `series` in the decade `10^exponent`.
pub fn values_in_decade(series: EiaSeries, exponent: i32) -> Vec<f64> {
    series
        .mantissas()
        .iter()
        .map(|&m| canonical_value(m, exponent))
        .collect()
}

/// Standard values of `series` in `[low, high]`, ascending.
pub fn standard_values_between(
    series: EiaSeries,
    low: f64,
    high: f64,
) -> Result<Vec<f64>, SeriesError> {
    let low = check_positive(low)?;
    let high = check_positive(high)?;
    if low > high {
        return Ok(Vec::new());
    }

    let (_, first_decade) = normalize(low);
    let (_, last_decade) = normalize(high);
    let min = low * (1.0 - MANTISSA_EPSILON);
    let max = high * (1.0 + MANTISSA_EPSILON);

    let values = (first_decade..=last_decade)
        .flat_map(|exponent| values_in_decade(series, exponent))
        .filter(|&v| v >= min && v <= max)
        .collect();
    Ok(values)
}

/// EIA-96 multiplier exponent for an SMD marking letter.
///
/// R, S and H are sometimes printed as aliases for Y, X and B; they are not
/// accepted here because R doubles as the decimal marker in other codes.
pub(crate) fn multiplier_exponent(letter: char) -> Option<i32> {
    match letter {
        'Z' => Some(-3),
        'Y' => Some(-2),
        'X' => Some(-1),
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}

/// Multiplier (0.001 to 1000) for an uppercase EIA-96 letter, or `0.0` when
/// the letter has no mapping.
pub fn letter_to_multiplier(letter: char) -> f64 {
    multiplier_exponent(letter)
        .map(|exponent| scale(1.0, exponent))
        .unwrap_or(0.0)
}

/// Index into [`E96_VALUES`] for a two-digit EIA-96 code.
///
/// # Panics
/// When `code` is outside `1..=96`. Callers validate user input first.
pub fn e96_smd_code(code: u32) -> usize {
    assert!(
        (1..=96).contains(&code),
        "EIA-96 code must be in 01..=96, got {:02}",
        code
    );
    (code - 1) as usize
}

/// Three-digit significand (100 to 976) printed for an EIA-96 code.
pub fn e96_significand(code: u32) -> f64 {
    (E96_VALUES[e96_smd_code(code)] * 100.0).round()
}
