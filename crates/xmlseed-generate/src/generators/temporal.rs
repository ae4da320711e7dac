use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};

use xmlseed_core::{Bound, Builtin, Facets};

use crate::facets::{
    parse_date_value, parse_duration, parse_time_value, parse_timestamp_value, strip_timezone,
};
use crate::generators::boundary::BoundaryCycle;

/// Date and time families sharing a `NaiveDateTime` value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    DateTime,
    Date,
    Time,
    GYear,
    GYearMonth,
    GMonth,
    GMonthDay,
    GDay,
}

impl TemporalKind {
    pub fn from_builtin(builtin: Builtin) -> Option<Self> {
        match builtin {
            Builtin::DateTime => Some(TemporalKind::DateTime),
            Builtin::Date => Some(TemporalKind::Date),
            Builtin::Time => Some(TemporalKind::Time),
            Builtin::GYear => Some(TemporalKind::GYear),
            Builtin::GYearMonth => Some(TemporalKind::GYearMonth),
            Builtin::GMonth => Some(TemporalKind::GMonth),
            Builtin::GMonthDay => Some(TemporalKind::GMonthDay),
            Builtin::GDay => Some(TemporalKind::GDay),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            TemporalKind::DateTime => "temporal.date_time",
            TemporalKind::Date => "temporal.date",
            TemporalKind::Time => "temporal.time",
            TemporalKind::GYear => "temporal.g_year",
            TemporalKind::GYearMonth => "temporal.g_year_month",
            TemporalKind::GMonth => "temporal.g_month",
            TemporalKind::GMonthDay => "temporal.g_month_day",
            TemporalKind::GDay => "temporal.g_day",
        }
    }

    fn natural_range(self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (floor, ceiling) = match self {
            TemporalKind::DateTime | TemporalKind::Date => {
                (moment(1, 1, 1, 0, 0, 0)?, moment(9999, 12, 31, 23, 59, 59)?)
            }
            TemporalKind::Time => (moment(2000, 1, 1, 0, 0, 0)?, moment(2000, 1, 1, 23, 59, 59)?),
            TemporalKind::GYear => (moment(1, 1, 1, 0, 0, 0)?, moment(9999, 12, 31, 0, 0, 0)?),
            TemporalKind::GYearMonth => {
                (moment(1, 1, 1, 0, 0, 0)?, moment(9999, 12, 31, 0, 0, 0)?)
            }
            TemporalKind::GMonth | TemporalKind::GMonthDay => {
                (moment(2000, 1, 1, 0, 0, 0)?, moment(2000, 12, 31, 0, 0, 0)?)
            }
            TemporalKind::GDay => (moment(2000, 1, 1, 0, 0, 0)?, moment(2000, 1, 31, 0, 0, 0)?),
        };
        Some((floor, ceiling))
    }

    fn default_start(self) -> Option<NaiveDateTime> {
        match self {
            TemporalKind::DateTime
            | TemporalKind::Date
            | TemporalKind::GYear
            | TemporalKind::GYearMonth => moment(2024, 1, 1, 0, 0, 0),
            TemporalKind::Time => moment(2000, 1, 1, 12, 0, 0),
            TemporalKind::GMonth | TemporalKind::GMonthDay | TemporalKind::GDay => {
                moment(2000, 1, 1, 0, 0, 0)
            }
        }
    }

    fn step(self) -> TimeDelta {
        match self {
            TemporalKind::Time => TimeDelta::minutes(1),
            TemporalKind::GYear => TimeDelta::days(366),
            TemporalKind::GYearMonth | TemporalKind::GMonth => TimeDelta::days(31),
            TemporalKind::DateTime
            | TemporalKind::Date
            | TemporalKind::GMonthDay
            | TemporalKind::GDay => TimeDelta::days(1),
        }
    }

    pub fn format(self, value: NaiveDateTime) -> String {
        let pattern = match self {
            TemporalKind::DateTime => "%Y-%m-%dT%H:%M:%S%.f",
            TemporalKind::Date => "%Y-%m-%d",
            TemporalKind::Time => "%H:%M:%S%.f",
            TemporalKind::GYear => "%Y",
            TemporalKind::GYearMonth => "%Y-%m",
            TemporalKind::GMonth => "--%m",
            TemporalKind::GMonthDay => "--%m-%d",
            TemporalKind::GDay => "---%d",
        };
        value.format(pattern).to_string()
    }

    /// Parse a bound facet into the shared value space. Timezones are dropped.
    pub fn parse(self, value: &str) -> Option<NaiveDateTime> {
        let value = strip_timezone(value.trim());
        match self {
            TemporalKind::DateTime => parse_timestamp_value(value),
            TemporalKind::Date => parse_date_value(value).and_then(|date| date.and_hms_opt(0, 0, 0)),
            TemporalKind::Time => {
                let time = parse_time_value(value)?;
                NaiveDate::from_ymd_opt(2000, 1, 1).map(|date| date.and_time(time))
            }
            TemporalKind::GYear => moment(value.parse().ok()?, 1, 1, 0, 0, 0),
            TemporalKind::GYearMonth => {
                let (year, month) = value.rsplit_once('-')?;
                moment(year.parse().ok()?, month.parse().ok()?, 1, 0, 0, 0)
            }
            TemporalKind::GMonth => {
                let month = value.strip_prefix("--")?;
                moment(2000, month.parse().ok()?, 1, 0, 0, 0)
            }
            TemporalKind::GMonthDay => {
                let (month, day) = value.strip_prefix("--")?.split_once('-')?;
                moment(2000, month.parse().ok()?, day.parse().ok()?, 0, 0, 0)
            }
            TemporalKind::GDay => {
                let day = value.strip_prefix("---")?;
                moment(2000, 1, day.parse().ok()?, 0, 0, 0)
            }
        }
    }

    /// Smallest distinguishable value after `value`, used for exclusive bounds.
    fn successor(self, value: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TemporalKind::DateTime | TemporalKind::Time => {
                value.checked_add_signed(TimeDelta::seconds(1))
            }
            TemporalKind::Date | TemporalKind::GDay | TemporalKind::GMonthDay => {
                value.checked_add_signed(TimeDelta::days(1))
            }
            TemporalKind::GMonth | TemporalKind::GYearMonth => {
                value.checked_add_months(Months::new(1))
            }
            TemporalKind::GYear => value.checked_add_months(Months::new(12)),
        }
    }

    fn predecessor(self, value: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TemporalKind::DateTime | TemporalKind::Time => {
                value.checked_sub_signed(TimeDelta::seconds(1))
            }
            TemporalKind::Date | TemporalKind::GDay | TemporalKind::GMonthDay => {
                value.checked_sub_signed(TimeDelta::days(1))
            }
            TemporalKind::GMonth | TemporalKind::GYearMonth => {
                value.checked_sub_months(Months::new(1))
            }
            TemporalKind::GYear => value.checked_sub_months(Months::new(12)),
        }
    }
}

fn moment(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)
}

/// Generator for one of the [`TemporalKind`] families.
#[derive(Debug, Clone)]
pub struct TemporalGenerator {
    kind: TemporalKind,
    cycle: BoundaryCycle<NaiveDateTime>,
}

impl TemporalGenerator {
    pub fn new(kind: TemporalKind, facets: &Facets) -> Option<Self> {
        let (floor, ceiling) = kind.natural_range()?;
        let start = kind.default_start()?;
        let lower = facets.lower_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => kind.parse(value),
            Bound::Exclusive(value) => kind.parse(value).and_then(|v| kind.successor(v)),
        });
        let upper = facets.upper_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => kind.parse(value),
            Bound::Exclusive(value) => kind.parse(value).and_then(|v| kind.predecessor(v)),
        });

        Some(Self {
            kind,
            cycle: BoundaryCycle::bounded(floor, ceiling, start, lower, upper, kind.step()),
        })
    }

    pub fn kind(&self) -> TemporalKind {
        self.kind
    }

    pub fn next_value(&mut self) -> String {
        self.kind.format(self.cycle.next_value())
    }
}

const DURATION_LIMIT_DAYS: i64 = 10_000 * 366;

/// `xs:duration`, stepping by whole days from `P1D`, or by seconds when the
/// bounds are less than a day apart.
#[derive(Debug, Clone)]
pub struct DurationGenerator {
    cycle: BoundaryCycle<TimeDelta>,
}

impl DurationGenerator {
    pub fn new(facets: &Facets) -> Self {
        let ceiling = TimeDelta::days(DURATION_LIMIT_DAYS);
        let second = TimeDelta::seconds(1);
        let lower = facets.lower_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_duration(value),
            Bound::Exclusive(value) => parse_duration(value).and_then(|v| v.checked_add(&second)),
        });
        let upper = facets.upper_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_duration(value),
            Bound::Exclusive(value) => parse_duration(value).and_then(|v| v.checked_sub(&second)),
        });

        let day = TimeDelta::days(1);
        let sub_day = matches!(
            (lower, upper),
            (Some(lower), Some(upper)) if upper.checked_sub(&lower).is_some_and(|span| span < day)
        );
        let step = if sub_day { second } else { day };

        Self {
            cycle: BoundaryCycle::bounded(-ceiling, ceiling, day, lower, upper, step),
        }
    }

    pub fn next_value(&mut self) -> String {
        format_duration(self.cycle.next_value())
    }
}

pub fn format_duration(value: TimeDelta) -> String {
    if value.is_zero() {
        return "PT0S".to_string();
    }
    let negative = value < TimeDelta::zero();
    let magnitude = if negative { -value } else { value };

    let days = magnitude.num_days();
    let hours = magnitude.num_hours() % 24;
    let minutes = magnitude.num_minutes() % 60;
    let seconds = magnitude.num_seconds() % 60;
    let nanos = magnitude.subsec_nanos();

    let mut out = String::from(if negative { "-P" } else { "P" });
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if nanos > 0 {
            let fraction = format!("{nanos:09}");
            out.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
        } else if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    out
}
