//! Date fields.
//!
//! Input is resolved into a [`DateInput`] before any parsing happens:
//!
//! - text goes through [`crate::fuzzy::parse_fuzzy`]
//! - integers and floats are Unix timestamps, converted to local time
//! - date-times pass through
//!
//! The parsed date-time can then be reduced to a [`DateAttribute`] and/or rendered with a
//! `strftime`-style format.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDateTime, TimeZone, Timelike};

use crate::error::{FieldError, FieldResult};
use crate::fuzzy::parse_fuzzy;
use crate::types::{DataType, Value};

use super::Coerce;

/// `dd.mm.yyyy`, the default output format.
pub const EUROPEAN_DATE_FORMAT: &str = "%d.%m.%Y";

/// A derived view of a date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAttribute {
    /// Calendar date ([`Value::Date`]).
    Date,
    /// Wall-clock time ([`Value::Time`]).
    Time,
    /// Calendar year.
    Year,
    /// Month, 1 to 12.
    Month,
    /// Day of the month.
    Day,
    /// Hour, 0 to 23.
    Hour,
    /// Minute, 0 to 59.
    Minute,
    /// Second, 0 to 59.
    Second,
    /// Monday is 0.
    Weekday,
    /// Monday is 1.
    IsoWeekday,
    /// Seconds since the Unix epoch, interpreting the value as local time.
    Timestamp,
}

impl DateAttribute {
    /// Name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            DateAttribute::Date => "date",
            DateAttribute::Time => "time",
            DateAttribute::Year => "year",
            DateAttribute::Month => "month",
            DateAttribute::Day => "day",
            DateAttribute::Hour => "hour",
            DateAttribute::Minute => "minute",
            DateAttribute::Second => "second",
            DateAttribute::Weekday => "weekday",
            DateAttribute::IsoWeekday => "isoweekday",
            DateAttribute::Timestamp => "timestamp",
        }
    }

    /// The data type [`DateAttribute::extract`] produces.
    pub fn output_type(&self) -> DataType {
        match self {
            DateAttribute::Date => DataType::Date,
            DateAttribute::Time => DataType::Time,
            DateAttribute::Timestamp => DataType::Float64,
            _ => DataType::Int64,
        }
    }

    /// Select this attribute from `dt`.
    pub fn extract(&self, dt: NaiveDateTime) -> FieldResult<Value> {
        let value = match self {
            DateAttribute::Date => Value::Date(dt.date()),
            DateAttribute::Time => Value::Time(dt.time()),
            DateAttribute::Year => Value::Int64(dt.year().into()),
            DateAttribute::Month => Value::Int64(dt.month().into()),
            DateAttribute::Day => Value::Int64(dt.day().into()),
            DateAttribute::Hour => Value::Int64(dt.hour().into()),
            DateAttribute::Minute => Value::Int64(dt.minute().into()),
            DateAttribute::Second => Value::Int64(dt.second().into()),
            DateAttribute::Weekday => Value::Int64(dt.weekday().num_days_from_monday().into()),
            DateAttribute::IsoWeekday => Value::Int64(dt.weekday().number_from_monday().into()),
            DateAttribute::Timestamp => {
                let local = Local
                    .from_local_datetime(&dt)
                    .earliest()
                    .ok_or_else(|| FieldError::overflow(format!("{dt} has no local timestamp")))?;
                Value::Float64(local.timestamp_micros() as f64 / 1_000_000.0)
            }
        };
        Ok(value)
    }
}

impl FromStr for DateAttribute {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let attr = match s {
            "date" => DateAttribute::Date,
            "time" => DateAttribute::Time,
            "year" => DateAttribute::Year,
            "month" => DateAttribute::Month,
            "day" => DateAttribute::Day,
            "hour" => DateAttribute::Hour,
            "minute" => DateAttribute::Minute,
            "second" => DateAttribute::Second,
            "weekday" => DateAttribute::Weekday,
            "isoweekday" => DateAttribute::IsoWeekday,
            "timestamp" => DateAttribute::Timestamp,
            other => {
                return Err(FieldError::configuration(format!(
                    "unknown date attribute `{other}`"
                )));
            }
        };
        Ok(attr)
    }
}

impl fmt::Display for DateAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date field input, resolved from a [`Value`] by kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    /// Free text for the fuzzy parser.
    Text(&'a str),
    /// Unix timestamp split into whole seconds and nanoseconds.
    Numeric { secs: i64, nanos: u32 },
    /// A date-time that needs no parsing.
    AlreadyDate(NaiveDateTime),
}

impl<'a> TryFrom<&'a Value> for DateInput<'a> {
    type Error = FieldError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Utf8(s) => Ok(DateInput::Text(s)),
            Value::Int64(secs) => Ok(DateInput::Numeric {
                secs: *secs,
                nanos: 0,
            }),
            Value::Float64(v) => {
                if v.is_nan() {
                    return Err(FieldError::parse(
                        DataType::DateTime,
                        v.to_string(),
                        "timestamp is NaN",
                    ));
                }
                let secs = v.floor();
                if secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
                    return Err(FieldError::overflow(format!(
                        "timestamp {v} is out of range"
                    )));
                }
                let nanos = ((v - secs) * 1e9).round().min(999_999_999.0) as u32;
                Ok(DateInput::Numeric {
                    secs: secs as i64,
                    nanos,
                })
            }
            Value::DateTime(dt) => Ok(DateInput::AlreadyDate(*dt)),
            other => Err(FieldError::UnsupportedInput {
                field: "DateField",
                actual: other.data_type(),
            }),
        }
    }
}

/// Date-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOptions {
    /// Return the result formatted with `out_date_format` instead of as a date value.
    pub as_string: bool,
    /// `strftime`-style output format. `None` or empty disables formatting.
    pub out_date_format: Option<String>,
    /// Attribute to select from the parsed date-time (e.g. `"date"`, `"year"`).
    pub date_attribute: Option<String>,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            as_string: false,
            out_date_format: Some(EUROPEAN_DATE_FORMAT.to_string()),
            date_attribute: None,
        }
    }
}

/// Parses dates from text, timestamps or date-times.
#[derive(Debug, Clone)]
pub struct DateField {
    as_string: bool,
    out_date_format: Option<String>,
    date_attribute: Option<DateAttribute>,
}

impl DateField {
    /// Create a date field. Fails on an unknown attribute name.
    pub fn new(options: DateOptions) -> FieldResult<Self> {
        let date_attribute = options
            .date_attribute
            .as_deref()
            .map(DateAttribute::from_str)
            .transpose()?;
        Ok(Self {
            as_string: options.as_string,
            out_date_format: options.out_date_format.filter(|f| !f.is_empty()),
            date_attribute,
        })
    }

    /// Configured attribute, if any.
    pub fn date_attribute(&self) -> Option<DateAttribute> {
        self.date_attribute
    }

    fn parse(&self, input: DateInput<'_>) -> FieldResult<NaiveDateTime> {
        match input {
            DateInput::Text(text) => parse_fuzzy(text, Local::now().date_naive()),
            DateInput::Numeric { secs, nanos } => Local
                .timestamp_opt(secs, nanos)
                .single()
                .map(|dt| dt.naive_local())
                .ok_or_else(|| FieldError::overflow(format!("timestamp {secs} is out of range"))),
            DateInput::AlreadyDate(dt) => Ok(dt),
        }
    }
}

impl Coerce for DateField {
    fn type_name(&self) -> &'static str {
        "DateField"
    }

    fn coerce(&self, value: &Value) -> FieldResult<Value> {
        let parsed = self.parse(DateInput::try_from(value)?)?;

        let value = match self.date_attribute {
            Some(attr) => attr.extract(parsed)?,
            None => Value::DateTime(parsed),
        };

        if self.as_string {
            if let Some(format) = &self.out_date_format {
                return format_value(&value, format).map(Value::Utf8);
            }
        }

        if let Some(attr) = self.date_attribute {
            if value.data_type() != attr.output_type() {
                return Err(FieldError::MissingAttribute {
                    attribute: attr.to_string(),
                });
            }
        }

        Ok(value)
    }
}

fn format_value(value: &Value, format: &str) -> FieldResult<String> {
    let mut out = String::new();
    let written = match value {
        Value::DateTime(dt) => write!(out, "{}", dt.format(format)),
        Value::Date(d) => write!(out, "{}", d.format(format)),
        Value::Time(t) => write!(out, "{}", t.format(format)),
        _ => {
            return Err(FieldError::MissingAttribute {
                attribute: "strftime".to_string(),
            });
        }
    };
    written.map_err(|_| {
        FieldError::parse(
            DataType::Utf8,
            value.to_string(),
            format!("cannot format with '{format}'"),
        )
    })?;
    Ok(out)
}
