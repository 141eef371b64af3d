//! Calculator logic shared by the CLI and any embedding UI.
//! Pure functions over the series tables; no I/O and no host state.

use serde::Serialize;

use crate::series::{is_standard_value, nearest_standard_value, percent_error, EiaSeries, SeriesError};
use crate::smd::{decode_smd_code, SmdCodeKind, SmdError};
use crate::value::{
    engineering_format, parse_engineering, EiaResistorValue, EngineeringValue, ValueError, OHMS,
};

#[derive(Debug, thiserror::Error)]
pub enum EiaCalcError {
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),
    #[error("Value error: {0}")]
    Value(#[from] ValueError),
    #[error("SMD code error: {0}")]
    Smd(#[from] SmdError),
}

pub type Result<T> = std::result::Result<T, EiaCalcError>;

/// Options for a lookup (CLI flags or UI selections).
#[derive(Clone, Debug)]
pub struct CalculatorOptions {
    pub series: EiaSeries,
    pub unit: String,
    /// Overrides the series' recommended tolerance (fraction)
    pub tolerance: Option<f64>,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            series: EiaSeries::E24,
            unit: OHMS.to_string(),
            tolerance: None,
        }
    }
}

/// Nearest-standard-value lookup for one input.
#[derive(Debug, Clone, Serialize)]
pub struct StandardValueReport {
    pub input: f64,
    pub series: EiaSeries,
    pub nearest: f64,
    /// Deviation of `nearest` from `input` in percent
    pub error_percent: f64,
    pub is_standard: bool,
    pub input_display: String,
    pub nearest_display: String,
    /// Percent, trailing zeros trimmed
    pub tolerance: String,
    pub min_value: f64,
    pub max_value: f64,
}

/// Decoded SMD marking with its display form.
#[derive(Debug, Clone, Serialize)]
pub struct SmdReport {
    pub code: String,
    pub kind: SmdCodeKind,
    pub value: f64,
    pub tolerance_percent: f64,
    pub display: String,
    /// Series matching the implied tolerance class (E24 for 5%, E96 for 1%)
    pub series: EiaSeries,
    pub is_standard: bool,
}

impl StandardValueReport {
    pub fn is_exact(&self) -> bool {
        self.is_standard && self.error_percent == 0.0
    }
}

/// Series a marking's tolerance class belongs to.
fn series_for_tolerance(percent: f64) -> EiaSeries {
    if percent <= 1.0 {
        EiaSeries::E96
    } else {
        EiaSeries::E24
    }
}

/// Core calculator API used by the CLI.
pub struct EiaCalcCore;

impl EiaCalcCore {
    /// Find the nearest standard value to `raw` in the configured series.
    pub fn lookup(raw: f64, options: &CalculatorOptions) -> Result<StandardValueReport> {
        let series = options.series;
        let nearest = nearest_standard_value(raw, series)?;
        let tolerance = options.tolerance.unwrap_or_else(|| series.tolerance());

        let standard = EiaResistorValue::from_engineering(
            EngineeringValue::new(nearest, tolerance, options.unit.clone())?,
            series,
        );
        let value = standard.value();

        Ok(StandardValueReport {
            input: raw,
            series,
            nearest,
            error_percent: percent_error(nearest, raw),
            is_standard: is_standard_value(raw, series),
            input_display: engineering_format(raw, &options.unit),
            nearest_display: value.to_string(),
            tolerance: value.tolerance_string(),
            min_value: value.min_value(),
            max_value: value.max_value(),
        })
    }

    /// Same as [`EiaCalcCore::lookup`] for typed text such as `"4.75k"`.
    pub fn lookup_text(text: &str, options: &CalculatorOptions) -> Result<StandardValueReport> {
        let raw = parse_engineering(text)?;
        Self::lookup(raw, options)
    }

    /// Decode an SMD marking and classify the result.
    pub fn decode(code: &str, options: &CalculatorOptions) -> Result<SmdReport> {
        let decoded = decode_smd_code(code)?;
        let tolerance_percent = decoded.implied_tolerance_percent();
        let series = series_for_tolerance(tolerance_percent);

        Ok(SmdReport {
            code: decoded.code.clone(),
            kind: decoded.kind,
            value: decoded.value,
            tolerance_percent,
            display: engineering_format(decoded.value, &options.unit),
            series,
            is_standard: is_standard_value(decoded.value, series),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_non_standard() {
        let report = EiaCalcCore::lookup(4750.0, &CalculatorOptions::default()).unwrap();
        assert_eq!(report.nearest, 4700.0);
        assert_eq!(report.series, EiaSeries::E24);
        assert!(!report.is_standard);
        assert!((report.error_percent + 1.0526).abs() < 1e-3);
        assert_eq!(report.input_display, "4.75 KΩ");
        assert_eq!(report.nearest_display, "4.70 KΩ");
        assert_eq!(report.tolerance, "5");
        assert!(!report.is_exact());
    }

    #[test]
    fn test_lookup_standard_value() {
        let options = CalculatorOptions {
            series: EiaSeries::E96,
            ..Default::default()
        };
        let report = EiaCalcCore::lookup(4750.0, &options).unwrap();
        assert!(report.is_standard);
        assert!(report.is_exact());
        assert_eq!(report.tolerance, "1");
    }

    #[test]
    fn test_lookup_tolerance_override() {
        let options = CalculatorOptions {
            series: EiaSeries::E12,
            unit: "F".to_string(),
            tolerance: Some(0.2),
        };
        let report = EiaCalcCore::lookup(90e-9, &options).unwrap();
        assert_eq!(report.nearest_display, "82.0 nF");
        assert_eq!(report.tolerance, "20");
        assert!((report.min_value - 65.6e-9).abs() < 1e-15);
    }

    #[test]
    fn test_lookup_rejects_bad_input() {
        let options = CalculatorOptions::default();
        assert!(matches!(
            EiaCalcCore::lookup(0.0, &options),
            Err(EiaCalcError::Series(SeriesError::NonPositive(_)))
        ));
        let options = CalculatorOptions {
            tolerance: Some(-0.1),
            ..Default::default()
        };
        assert!(matches!(
            EiaCalcCore::lookup(100.0, &options),
            Err(EiaCalcError::Value(ValueError::NegativeTolerance(_)))
        ));
    }

    #[test]
    fn test_lookup_text() {
        let report = EiaCalcCore::lookup_text("4.75k", &CalculatorOptions::default()).unwrap();
        assert_eq!(report.nearest, 4700.0);
        let report = EiaCalcCore::lookup_text("4k7", &CalculatorOptions::default()).unwrap();
        assert_eq!(report.input, 4700.0);
        assert!(report.is_standard);
        assert!(EiaCalcCore::lookup_text("n/a", &CalculatorOptions::default()).is_err());
    }

    #[test]
    fn test_decode() {
        let options = CalculatorOptions::default();
        let report = EiaCalcCore::decode("01C", &options).unwrap();
        assert_eq!(report.value, 10_000.0);
        assert_eq!(report.display, "10.0 KΩ");
        assert_eq!(report.series, EiaSeries::E96);
        assert!(report.is_standard);

        let report = EiaCalcCore::decode("472", &options).unwrap();
        assert_eq!(report.series, EiaSeries::E24);
        assert_eq!(report.tolerance_percent, 5.0);
        assert!(report.is_standard);

        let err = EiaCalcCore::decode("47K2", &options).unwrap_err();
        assert_eq!(err.to_string(), "SMD code error: Invalid SMD code format: 47K2");
    }
}
