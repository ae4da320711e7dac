use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use tracing::debug;

use xmlseed_core::Facets;

/// Length restrictions of a value, in characters, items or bytes depending on
/// the datatype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthLimits {
    pub exact: Option<usize>,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthLimits {
    pub fn from_facets(facets: &Facets) -> Self {
        Self {
            exact: facets.length.map(to_usize),
            min: facets.min_length.map(to_usize),
            max: facets.max_length.map(to_usize),
        }
    }

    /// Length to use for a value whose natural length is `natural`.
    ///
    /// An exact length wins; otherwise the minimum and the maximum are
    /// applied independently.
    pub fn resolve(&self, natural: usize) -> usize {
        if let Some(exact) = self.exact {
            return exact;
        }
        let mut target = natural;
        if let Some(min) = self.min
            && target < min
        {
            target = min;
        }
        if let Some(max) = self.max
            && target > max
        {
            target = max;
        }
        target
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

pub fn text_length(value: &str) -> usize {
    value.chars().count()
}

pub fn parse_integer(value: &str) -> Option<i128> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let parsed = digits.parse::<i128>().ok();
    if parsed.is_none() {
        debug!(value, "ignoring unparsable integer facet");
    }
    parsed
}

pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let parsed = Decimal::from_str(digits).ok();
    if parsed.is_none() {
        debug!(value, "ignoring unparsable decimal facet");
    }
    parsed
}

/// Parse a float facet; the special values `INF`, `-INF` and `NaN` give `None`.
pub fn parse_float(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    if parsed.is_none() {
        debug!(value, "ignoring non-finite or unparsable float facet");
    }
    parsed
}

/// Drop a trailing `Z` or `+hh:mm` / `-hh:mm` timezone.
pub fn strip_timezone(value: &str) -> &str {
    if let Some(stripped) = value.strip_suffix('Z') {
        return stripped;
    }
    let bytes = value.as_bytes();
    if bytes.len() >= 6 {
        let sign = bytes[bytes.len() - 6];
        if (sign == b'+' || sign == b'-') && bytes[bytes.len() - 3] == b':' {
            return &value[..value.len() - 6];
        }
    }
    value
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_time_value(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(value, "%H:%M:%S%.f").ok())
}

pub fn parse_timestamp_value(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Parse an `xs:duration` lexical value.
///
/// Years count as 365 days and months as 30 days; fractional seconds are kept
/// to the millisecond.
pub fn parse_duration(value: &str) -> Option<TimeDelta> {
    let trimmed = value.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = TimeDelta::zero();
    let mut seen_any = false;
    for (number, designator) in designators(date_part)? {
        let amount = number.parse::<i64>().ok()?;
        let days = match designator {
            'Y' => amount.checked_mul(365)?,
            'M' => amount.checked_mul(30)?,
            'D' => amount,
            _ => return None,
        };
        total = total.checked_add(&TimeDelta::try_days(days)?)?;
        seen_any = true;
    }
    if let Some(time_part) = time_part {
        for (number, designator) in designators(time_part)? {
            let delta = match designator {
                'H' => TimeDelta::try_hours(number.parse::<i64>().ok()?)?,
                'M' => TimeDelta::try_minutes(number.parse::<i64>().ok()?)?,
                'S' => {
                    let seconds = number.parse::<f64>().ok()?;
                    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)?
                }
                _ => return None,
            };
            total = total.checked_add(&delta)?;
            seen_any = true;
        }
    }
    if !seen_any {
        return None;
    }
    Some(if negative { -total } else { total })
}

fn designators(part: &str) -> Option<Vec<(&str, char)>> {
    let mut pairs = Vec::new();
    let mut start = 0;
    for (index, ch) in part.char_indices() {
        if ch.is_ascii_alphabetic() {
            let number = &part[start..index];
            if number.is_empty() {
                return None;
            }
            pairs.push((number, ch));
            start = index + ch.len_utf8();
        }
    }
    if start != part.len() {
        return None;
    }
    Some(pairs)
}
