//! Float fields with decimal-mark normalization and fraction support.

use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::error::{FieldError, FieldResult};
use crate::separator::detect_separator;
use crate::types::{DataType, Value};

use super::Coerce;

/// Decimal marks recognized when none are configured.
pub const DEFAULT_FLOAT_SEPARATORS: &[&str] = &[",", "."];

/// Float-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatOptions {
    /// Candidate decimal marks. The first one found in the text is replaced by `.`.
    pub separators: Vec<String>,
}

impl Default for FloatOptions {
    fn default() -> Self {
        Self {
            separators: DEFAULT_FLOAT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parses floats, accepting alternative decimal marks and (mixed) fractions.
#[derive(Debug, Clone)]
pub struct FloatField {
    separators: Vec<String>,
}

impl FloatField {
    /// Create a float field. An empty separator list falls back to the defaults.
    pub fn new(options: FloatOptions) -> Self {
        let separators = if options.separators.is_empty() {
            FloatOptions::default().separators
        } else {
            options.separators
        };
        Self { separators }
    }

    /// Configured decimal marks.
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    fn parse(&self, raw: &str) -> FieldResult<f64> {
        let normalized = match detect_separator(&self.separators, raw) {
            Some(sep) => raw.replace(sep, "."),
            None => raw.to_owned(),
        };

        if normalized.contains('/') {
            let mut sum = BigRational::zero();
            for token in normalized.split_whitespace() {
                sum += parse_ratio(token, raw)?;
            }
            return sum
                .to_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| FieldError::overflow(format!("fraction sum of '{raw}' is out of range")));
        }

        normalized
            .trim()
            .parse::<f64>()
            .map_err(|e| FieldError::parse(DataType::Float64, raw, e.to_string()))
    }
}

impl Coerce for FloatField {
    fn type_name(&self) -> &'static str {
        "FloatField"
    }

    fn coerce(&self, value: &Value) -> FieldResult<Value> {
        match value {
            Value::Float64(v) => Ok(Value::Float64(*v)),
            Value::Int64(v) => Ok(Value::Float64(*v as f64)),
            Value::Utf8(s) => self.parse(s).map(Value::Float64),
            other => Err(FieldError::UnsupportedInput {
                field: self.type_name(),
                actual: other.data_type(),
            }),
        }
    }
}

/// Largest exponent magnitude accepted in a fraction-sum token (`1e-4096`).
const MAX_EXPONENT: u32 = 4096;

/// Parse one whitespace-free token as an exact rational: `a/b`, an integer, or a decimal with
/// optional exponent.
fn parse_ratio(token: &str, raw: &str) -> FieldResult<BigRational> {
    let malformed = |message: &str| FieldError::parse(DataType::Float64, raw, message);

    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let ratio = if let Some((num, den)) = body.split_once('/') {
        let num = parse_digits(num).ok_or_else(|| malformed("malformed fraction"))?;
        let den = parse_digits(den).ok_or_else(|| malformed("malformed fraction"))?;
        if den.is_zero() {
            return Err(malformed("fraction has a zero denominator"));
        }
        BigRational::new(num, den)
    } else {
        let (mantissa, exp) = match body.find(['e', 'E']) {
            Some(idx) => {
                let exp = i64::from_str(&body[idx + 1..])
                    .map_err(|_| malformed("malformed exponent"))?;
                (&body[..idx], exp)
            }
            None => (body, 0),
        };
        if exp.unsigned_abs() > u64::from(MAX_EXPONENT) {
            return Err(FieldError::overflow(format!(
                "exponent of '{token}' in '{raw}' is out of range"
            )));
        }
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed("malformed number"));
        }
        let num = parse_digits(&format!("{int_part}{frac_part}"))
            .ok_or_else(|| malformed("malformed number"))?;
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| malformed("malformed number"))?;
        // value = num * 10^scale
        let scale = exp - frac_len;
        let factor = BigInt::from(10u32).pow(
            u32::try_from(scale.unsigned_abs())
                .map_err(|_| FieldError::overflow(format!("'{token}' in '{raw}' is too long")))?,
        );
        if scale >= 0 {
            BigRational::from_integer(num * factor)
        } else {
            BigRational::new(num, factor)
        }
    };

    Ok(if negative { -ratio } else { ratio })
}

/// `None` unless `s` is a non-empty run of ASCII digits.
fn parse_digits(s: &str) -> Option<BigInt> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::parse_bytes(s.as_bytes(), 10)
}
