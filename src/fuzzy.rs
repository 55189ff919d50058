//! Fuzzy date/time parsing.
//!
//! [`parse_fuzzy`] scans free text for date and time components and ignores every word it
//! does not recognize, so `"meeting on 2023-05-01 at 10:30"` yields `2023-05-01 10:30:00`.
//!
//! Recognized components:
//!
//! - ISO-like dates: `2023-05-01`, `2023/05/01`, `2023.05.01`, optionally followed by
//!   `T10:30:00` and a `Z` or numeric offset (the offset is dropped)
//! - numeric dates: `05/01/2023` (month first), `25/12/2023` (day first when the first part
//!   exceeds 12), two-digit years
//! - compact `20230501`
//! - month names and abbreviations, weekday names (ignored), ordinals (`1st`, `22nd`)
//! - clock times `10:30`, `10:30:15.250`, `3pm`, `3:30 pm`
//!
//! Missing components are taken from `today` (date) and midnight (time).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FieldError, FieldResult};
use crate::types::DataType;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const TRIM: &[char] = &['(', ')', '[', ']', '{', '}', '"', '\'', '!', '?', ';'];

#[derive(Debug, Clone, Copy)]
struct Clock {
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    pm: Option<bool>,
}

#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    clock: Option<Clock>,
    pm: Option<bool>,
    /// Bare numbers not yet assigned, with their digit count.
    loose: Vec<(u32, usize)>,
}

/// Parse a date/time out of free text.
pub fn parse_fuzzy(text: &str, today: NaiveDate) -> FieldResult<NaiveDateTime> {
    let fail = |message: &str| FieldError::parse(DataType::DateTime, text, message);

    let mut parts = Parts::default();
    for raw in text.split(|c: char| c.is_whitespace() || c == ',') {
        let token = raw.trim_matches(TRIM).trim_end_matches('.').to_ascii_lowercase();
        if token.is_empty() {
            continue;
        }
        parts.absorb(&token, today.year()).map_err(|m| fail(&m))?;
    }

    parts.resolve(today).map_err(|m| fail(&m))
}

impl Parts {
    fn absorb(&mut self, token: &str, this_year: i32) -> Result<(), String> {
        if let Some((date, time)) = split_iso(token) {
            if let Some((y, m, d)) = numeric_date(date, this_year) {
                if let Some(clock) = clock(time) {
                    self.set_date(y, m, d)?;
                    return self.set_clock(clock);
                }
            }
        }

        if let Some((y, m, d)) = numeric_date(token, this_year) {
            return self.set_date(y, m, d);
        }
        if let Some(clock) = clock(token).or_else(|| hour_only(token)) {
            return self.set_clock(clock);
        }
        if let Some(pm) = meridiem(token) {
            self.pm = Some(pm);
            if self.clock.is_none() {
                if let Some(&(hour, len)) = self.loose.last() {
                    if len <= 2 && hour <= 12 {
                        self.loose.pop();
                        self.set_clock(Clock {
                            hour,
                            minute: 0,
                            second: 0,
                            nanos: 0,
                            pm: Some(pm),
                        })?;
                    }
                }
            }
            return Ok(());
        }
        if let Some(month) = month_name(token) {
            if self.month.is_none() {
                self.month = Some(month);
            }
            return Ok(());
        }
        if is_weekday(token) {
            return Ok(());
        }
        if token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit()) {
            let y = token[..4].parse::<i32>().map_err(|e| e.to_string())?;
            let m = token[4..6].parse::<u32>().map_err(|e| e.to_string())?;
            let d = token[6..].parse::<u32>().map_err(|e| e.to_string())?;
            return self.set_date(Some(y), Some(m), Some(d));
        }
        if let Some(n) = number(token) {
            self.loose.push(n);
            return Ok(());
        }
        // Anything else is noise.
        Ok(())
    }

    fn set_date(&mut self, y: Option<i32>, m: Option<u32>, d: Option<u32>) -> Result<(), String> {
        if (y.is_some() && self.year.is_some())
            || (m.is_some() && self.month.is_some())
            || (d.is_some() && self.day.is_some())
        {
            return Err("more than one date in text".to_string());
        }
        self.year = self.year.or(y);
        self.month = self.month.or(m);
        self.day = self.day.or(d);
        Ok(())
    }

    fn set_clock(&mut self, clock: Clock) -> Result<(), String> {
        if self.clock.is_some() {
            return Err("more than one time in text".to_string());
        }
        self.clock = Some(clock);
        Ok(())
    }

    fn resolve(mut self, today: NaiveDate) -> Result<NaiveDateTime, String> {
        for (value, len) in std::mem::take(&mut self.loose) {
            if len >= 3 || value > 31 {
                if self.year.is_some() {
                    return Err(format!("unexpected number {value}"));
                }
                self.year = Some(value as i32);
            } else if self.month.is_some() && self.day.is_none() {
                self.day = Some(value);
            } else if self.month.is_none() && value <= 12 {
                self.month = Some(value);
            } else if self.day.is_none() {
                self.day = Some(value);
            } else if self.year.is_none() {
                self.year = Some(expand_year(value as i32, today.year()));
            } else {
                return Err(format!("unexpected number {value}"));
            }
        }

        if self.year.is_none() && self.month.is_none() && self.day.is_none() && self.clock.is_none() {
            return Err("string does not contain a date".to_string());
        }

        let year = self.year.unwrap_or(today.year());
        let month = self.month.unwrap_or(today.month());
        let day = match self.day {
            Some(day) => day,
            None => days_in_month(year, month).map_or(today.day(), |last| today.day().min(last)),
        };
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| format!("day {day} is out of range for {year}-{month:02}"))?;

        let time = match self.clock {
            None => NaiveTime::MIN,
            Some(clock) => {
                let meridiem = clock.pm.or(self.pm);
                if meridiem.is_some() && clock.hour > 12 {
                    return Err(format!(
                        "invalid time {}:{:02} with am/pm",
                        clock.hour, clock.minute
                    ));
                }
                let hour = match meridiem {
                    Some(true) if clock.hour < 12 => clock.hour + 12,
                    Some(false) if clock.hour == 12 => 0,
                    _ => clock.hour,
                };
                NaiveTime::from_hms_nano_opt(hour, clock.minute, clock.second, clock.nanos)
                    .ok_or_else(|| format!("invalid time {hour}:{:02}:{:02}", clock.minute, clock.second))?
            }
        };

        Ok(date.and_time(time))
    }
}

/// Split `2023-05-01t10:30` into date and time halves.
fn split_iso(token: &str) -> Option<(&str, &str)> {
    let idx = token.find('t')?;
    Some((&token[..idx], &token[idx + 1..]))
}

/// `Y-M-D`, `M/D/Y`, `D/M/Y`, `M/D` and `Y-M` forms, with `-`, `/` or `.` separators.
fn numeric_date(token: &str, this_year: i32) -> Option<(Option<i32>, Option<u32>, Option<u32>)> {
    let sep = ['-', '/', '.'].into_iter().find(|c| token.contains(*c))?;
    let fields: Vec<&str> = token.split(sep).collect();
    if fields
        .iter()
        .any(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    let nums: Vec<u32> = fields.iter().map(|f| f.parse().ok()).collect::<Option<_>>()?;

    match (fields.as_slice(), nums.as_slice()) {
        ([y, _, _], [yv, m, d]) if y.len() == 4 => Some((Some(*yv as i32), Some(*m), Some(*d))),
        ([_, _, y], [a, b, yv]) if y.len() == 4 || y.len() == 2 => {
            let year = if y.len() == 2 {
                expand_year(*yv as i32, this_year)
            } else {
                *yv as i32
            };
            let (m, d) = if *a > 12 { (*b, *a) } else { (*a, *b) };
            Some((Some(year), Some(m), Some(d)))
        }
        ([y, _], [yv, m]) if y.len() == 4 && sep != '.' => Some((Some(*yv as i32), Some(*m), None)),
        ([a, b], [av, bv]) if a.len() <= 2 && b.len() <= 2 && sep != '.' => {
            let (m, d) = if *av > 12 { (*bv, *av) } else { (*av, *bv) };
            Some((None, Some(m), Some(d)))
        }
        _ => None,
    }
}

/// `H:MM`, `H:MM:SS`, `H:MM:SS.ffffff`, with optional `am`/`pm`, `z` or offset suffix.
fn clock(token: &str) -> Option<Clock> {
    if !token.contains(':') {
        return None;
    }
    let (body, pm) = strip_meridiem(token);
    let body = body.trim_end_matches('z');
    // Drop a trailing UTC offset such as `+02:00` or `-0500`.
    let body = match body.find(['+', '-']) {
        Some(idx) if idx > 0 => &body[..idx],
        _ => body,
    };

    let mut fields = body.split(':');
    let hour = fields.next()?;
    let minute = fields.next()?;
    let second = fields.next();
    if fields.next().is_some() || hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    let hour: u32 = digits(hour)?;
    let minute: u32 = digits(minute)?;

    let (second, nanos) = match second {
        None => (0, 0),
        Some(s) => {
            let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
            if whole.len() != 2 {
                return None;
            }
            let nanos = if frac.is_empty() {
                0
            } else {
                let mut padded: String = frac.chars().take(9).collect();
                while padded.len() < 9 {
                    padded.push('0');
                }
                digits(&padded)?
            };
            (digits(whole)?, nanos)
        }
    };

    Some(Clock {
        hour,
        minute,
        second,
        nanos,
        pm,
    })
}

/// `3pm`, `11am`.
fn hour_only(token: &str) -> Option<Clock> {
    let (body, pm) = strip_meridiem(token);
    let pm = pm?;
    if body.len() > 2 {
        return None;
    }
    let hour: u32 = digits(body)?;
    Some(Clock {
        hour,
        minute: 0,
        second: 0,
        nanos: 0,
        pm: Some(pm),
    })
}

fn strip_meridiem(token: &str) -> (&str, Option<bool>) {
    for (suffix, pm) in [("a.m", false), ("p.m", true), ("am", false), ("pm", true)] {
        if let Some(body) = token.strip_suffix(suffix) {
            if !body.is_empty() {
                return (body, Some(pm));
            }
        }
    }
    (token, None)
}

fn meridiem(token: &str) -> Option<bool> {
    match token {
        "am" | "a.m" => Some(false),
        "pm" | "p.m" => Some(true),
        _ => None,
    }
}

fn month_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    if token == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == token || (token.len() == 3 && m.starts_with(token)))
        .map(|idx| idx as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    token.len() >= 3
        && WEEKDAYS
            .iter()
            .any(|d| *d == token || (token.len() <= 4 && d.starts_with(token)))
}

/// A bare number, optionally with an ordinal suffix.
fn number(token: &str) -> Option<(u32, usize)> {
    let body = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|s| token.strip_suffix(*s))
        .unwrap_or(token);
    if body.len() > 4 {
        return None;
    }
    digits(body).map(|v| (v, body.len()))
}

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Place a two-digit year within 50 years of `this_year`.
fn expand_year(year: i32, this_year: i32) -> i32 {
    if year >= 100 {
        return year;
    }
    let mut full = this_year / 100 * 100 + year;
    if full >= this_year + 50 {
        full -= 100;
    } else if full < this_year - 50 {
        full += 100;
    }
    full
}
