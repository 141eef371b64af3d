//! EiaCalc - engineering notation, EIA preferred values and SMD resistor codes
//!
//! This library converts raw component values to and from SI engineering
//! notation, checks values against the IEC 60063 E-series, finds the
//! nearest standard value and decodes SMD resistor markings.
//!
//! # Quick Start
//!
//! ```
//! use eiacalc::{decode_smd_code, format_value, nearest_standard_value, EiaSeries};
//!
//! let nearest = nearest_standard_value(4750.0, EiaSeries::E24).unwrap();
//! assert_eq!(nearest, 4700.0);
//! assert_eq!(format_value(nearest, "Ω"), "4.70 KΩ");
//!
//! let decoded = decode_smd_code("4R7").unwrap();
//! assert_eq!(decoded.as_pair(), (4.7, 5.0));
//! ```
//!
//! # Features
//!
//! - **Engineering notation**: `f` to `T` prefixes, significand editing, tolerance strings
//! - **E-series**: E6 through E96 membership and nearest-value search across decades
//! - **SMD codes**: 3-digit, 4-digit, R-decimal and EIA-96 markings

pub mod core;
pub mod series;
pub mod smd;
pub mod value;

// Re-export main types
pub use crate::core::{
    CalculatorOptions, EiaCalcCore, EiaCalcError, Result, SmdReport, StandardValueReport,
};
pub use series::{
    e96_smd_code, is_standard_value, letter_to_multiplier, nearest_standard_value, percent_error,
    standard_values_between, values_in_decade, EiaSeries, SeriesError,
};
pub use smd::{decode_smd_code, SmdCodeKind, SmdDecoding, SmdError};
pub use value::{
    engineering_format, parse_engineering, significand_to_string, tolerance_to_string,
    value_from_sig_exp, EiaResistorValue, EngineeringValue, SiPrefix, ValueError,
};

/// Render a raw value in engineering notation (convenience wrapper).
pub fn format_value(raw: f64, unit: &str) -> String {
    engineering_format(raw, unit)
}

/// Raw value from a significand and prefix index (convenience wrapper).
///
/// # Panics
/// When `prefix_index` is 9 or more.
pub fn parse_value(significand: f64, prefix_index: usize) -> f64 {
    value_from_sig_exp(significand, prefix_index)
}

/// Tolerance fraction as a percent string (convenience wrapper).
pub fn tolerance_to_display_string(fraction: f64) -> String {
    tolerance_to_string(fraction)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CalculatorOptions, EiaCalcCore, EiaCalcError, EiaResistorValue, EiaSeries,
        EngineeringValue, SiPrefix, SmdCodeKind, SmdDecoding,
    };
}
