//! SMD Resistor Marking Decoder
//!
//! Decodes the 3- and 4-character value markings printed on surface-mount
//! resistors. Branches are tried in order and the first match wins:
//!
//! ```text
//! 3 characters                         4 characters
//! DDM  47 × 10^2      "472"  -> 4.7K   DDDM  470 × 10^2   "4702" -> 47K
//! DDR  whole ohms     "33R"  -> 33     DDDR  whole ohms   "330R" -> 330
//! DDL  EIA-96 index   "01C"  -> 10K    RDDD  0.DDD        "R100" -> 0.1
//! RDD  0.DD           "R33"  -> 0.33   DRDD  D.DD         "1R00" -> 1
//! DRD  D.D            "3R3"  -> 3.3    DDRD  DD.D         "10R0" -> 10
//! ```
//!
//! The matched branch is kept on the result since it determines the
//! tolerance class the marking implies.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::series::{e96_significand, multiplier_exponent, scale};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmdError {
    #[error("Invalid SMD code format: {0}")]
    InvalidCodeFormat(String),
}

/// Grammar branch a code was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SmdCodeKind {
    /// `DDM`: two significant digits and a power-of-ten digit
    ThreeDigit,
    /// `DDR`
    ThreeDigitWholeOhms,
    /// `DDL`: EIA-96 index 01-96 and a multiplier letter
    Eia96,
    /// `RDD`
    ThreeDigitLeadingDecimal,
    /// `DRD`
    ThreeDigitEmbeddedDecimal,
    /// `DDDM`
    FourDigit,
    /// `DDDR`
    FourDigitWholeOhms,
    /// `RDDD`
    FourDigitLeadingDecimal,
    /// `DRDD`
    FourDigitDecimalAfterFirst,
    /// `DDRD`
    FourDigitDecimalAfterSecond,
}

impl SmdCodeKind {
    /// Tolerance class implied by the marking style, in percent
    pub fn implied_tolerance_percent(&self) -> f64 {
        match self {
            SmdCodeKind::ThreeDigit
            | SmdCodeKind::ThreeDigitWholeOhms
            | SmdCodeKind::ThreeDigitLeadingDecimal
            | SmdCodeKind::ThreeDigitEmbeddedDecimal
            | SmdCodeKind::FourDigitWholeOhms => 5.0,
            SmdCodeKind::Eia96
            | SmdCodeKind::FourDigit
            | SmdCodeKind::FourDigitLeadingDecimal
            | SmdCodeKind::FourDigitDecimalAfterFirst
            | SmdCodeKind::FourDigitDecimalAfterSecond => 1.0,
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            SmdCodeKind::ThreeDigit => "DDM",
            SmdCodeKind::ThreeDigitWholeOhms => "DDR",
            SmdCodeKind::Eia96 => "DDL",
            SmdCodeKind::ThreeDigitLeadingDecimal => "RDD",
            SmdCodeKind::ThreeDigitEmbeddedDecimal => "DRD",
            SmdCodeKind::FourDigit => "DDDM",
            SmdCodeKind::FourDigitWholeOhms => "DDDR",
            SmdCodeKind::FourDigitLeadingDecimal => "RDDD",
            SmdCodeKind::FourDigitDecimalAfterFirst => "DRDD",
            SmdCodeKind::FourDigitDecimalAfterSecond => "DDRD",
        }
    }
}

impl fmt::Display for SmdCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmdCodeKind::ThreeDigit => "3-digit",
            SmdCodeKind::ThreeDigitWholeOhms => "3-digit, whole ohms",
            SmdCodeKind::Eia96 => "EIA-96",
            SmdCodeKind::ThreeDigitLeadingDecimal
            | SmdCodeKind::ThreeDigitEmbeddedDecimal => "3-digit, R decimal",
            SmdCodeKind::FourDigit => "4-digit",
            SmdCodeKind::FourDigitWholeOhms => "4-digit, whole ohms",
            SmdCodeKind::FourDigitLeadingDecimal
            | SmdCodeKind::FourDigitDecimalAfterFirst
            | SmdCodeKind::FourDigitDecimalAfterSecond => "4-digit, R decimal",
        };
        write!(f, "{} ({})", name, self.pattern())
    }
}

/// A decoded marking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmdDecoding {
    /// Code as given by the caller
    pub code: String,
    /// Resistance in ohms
    pub value: f64,
    pub kind: SmdCodeKind,
}

impl SmdDecoding {
    pub fn implied_tolerance_percent(&self) -> f64 {
        self.kind.implied_tolerance_percent()
    }

    /// `(value, tolerance percent)` pair
    pub fn as_pair(&self) -> (f64, f64) {
        (self.value, self.implied_tolerance_percent())
    }
}

fn all_digits(chars: &[char]) -> bool {
    chars.iter().all(|c| c.is_ascii_digit())
}

/// Integer spelled by ASCII digits. Callers check [`all_digits`] first.
fn number(chars: &[char]) -> u32 {
    chars
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + d)
}

fn decode_three(chars: [char; 3]) -> Option<(f64, SmdCodeKind)> {
    match chars {
        [a, b, m] if all_digits(&[a, b, m]) => Some((
            scale(number(&[a, b]) as f64, number(&[m]) as i32),
            SmdCodeKind::ThreeDigit,
        )),
        [a, b, 'R'] if all_digits(&[a, b]) => {
            Some((number(&[a, b]) as f64, SmdCodeKind::ThreeDigitWholeOhms))
        }
        [a, b, letter] if all_digits(&[a, b]) && letter.is_ascii_alphabetic() => {
            let index = number(&[a, b]);
            if !(1..=96).contains(&index) {
                return None;
            }
            let exponent = multiplier_exponent(letter)?;
            Some((scale(e96_significand(index), exponent), SmdCodeKind::Eia96))
        }
        ['R', a, b] if all_digits(&[a, b]) => Some((
            scale(number(&[a, b]) as f64, -2),
            SmdCodeKind::ThreeDigitLeadingDecimal,
        )),
        [a, 'R', b] if all_digits(&[a, b]) => Some((
            scale(number(&[a, b]) as f64, -1),
            SmdCodeKind::ThreeDigitEmbeddedDecimal,
        )),
        _ => None,
    }
}

fn decode_four(chars: [char; 4]) -> Option<(f64, SmdCodeKind)> {
    match chars {
        [a, b, c, m] if all_digits(&[a, b, c, m]) => Some((
            scale(number(&[a, b, c]) as f64, number(&[m]) as i32),
            SmdCodeKind::FourDigit,
        )),
        [a, b, c, 'R'] if all_digits(&[a, b, c]) => {
            Some((number(&[a, b, c]) as f64, SmdCodeKind::FourDigitWholeOhms))
        }
        ['R', a, b, c] if all_digits(&[a, b, c]) => Some((
            scale(number(&[a, b, c]) as f64, -3),
            SmdCodeKind::FourDigitLeadingDecimal,
        )),
        [a, 'R', b, c] if all_digits(&[a, b, c]) => Some((
            scale(number(&[a, b, c]) as f64, -2),
            SmdCodeKind::FourDigitDecimalAfterFirst,
        )),
        [a, b, 'R', c] if all_digits(&[a, b, c]) => Some((
            scale(number(&[a, b, c]) as f64, -1),
            SmdCodeKind::FourDigitDecimalAfterSecond,
        )),
        _ => None,
    }
}

/// Decode a 3- or 4-character SMD resistor marking.
///
/// Surrounding whitespace is ignored and letters are matched
/// case-insensitively. The error carries the code exactly as given.
pub fn decode_smd_code(code: &str) -> Result<SmdDecoding, SmdError> {
    let chars: Vec<char> = code.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
    let decoded = match chars.as_slice() {
        &[a, b, c] => decode_three([a, b, c]),
        &[a, b, c, d] => decode_four([a, b, c, d]),
        _ => None,
    };

    match decoded {
        Some((value, kind)) => {
            tracing::debug!("SMD code {:?} matched {} -> {} Ω", code, kind, value);
            Ok(SmdDecoding {
                code: code.to_string(),
                value,
                kind,
            })
        }
        None => Err(SmdError::InvalidCodeFormat(code.to_string())),
    }
}
