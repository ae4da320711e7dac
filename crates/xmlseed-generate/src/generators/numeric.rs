use rust_decimal::{Decimal, RoundingStrategy};

use xmlseed_core::{Bound, Builtin, Facets};

use crate::facets::{parse_decimal, parse_float, parse_integer};
use crate::generators::boundary::BoundaryCycle;

/// Natural value range of an integer-derived built-in.
pub fn natural_integer_range(builtin: Builtin) -> (i128, i128) {
    match builtin {
        Builtin::NonPositiveInteger => (i64::MIN as i128, 0),
        Builtin::NegativeInteger => (i64::MIN as i128, -1),
        Builtin::Int => (i32::MIN as i128, i32::MAX as i128),
        Builtin::Short => (i16::MIN as i128, i16::MAX as i128),
        Builtin::Byte => (i8::MIN as i128, i8::MAX as i128),
        Builtin::NonNegativeInteger | Builtin::UnsignedLong => (0, u64::MAX as i128),
        Builtin::PositiveInteger => (1, u64::MAX as i128),
        Builtin::UnsignedInt => (0, u32::MAX as i128),
        Builtin::UnsignedShort => (0, u16::MAX as i128),
        Builtin::UnsignedByte => (0, u8::MAX as i128),
        _ => (i64::MIN as i128, i64::MAX as i128),
    }
}

/// Integer family: `xs:integer` and every built-in derived from it.
#[derive(Debug, Clone)]
pub struct IntegerGenerator {
    cycle: BoundaryCycle<i128>,
}

impl IntegerGenerator {
    pub fn new(builtin: Builtin, facets: &Facets) -> Self {
        let (mut floor, mut ceiling) = natural_integer_range(builtin);
        if let Some(digits) = facets.total_digits {
            let limit = 10_i128
                .checked_pow(digits)
                .map(|power| power - 1)
                .unwrap_or(i128::MAX);
            floor = floor.max(-limit);
            ceiling = ceiling.min(limit);
        }

        let lower = facets.lower_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_integer(value),
            Bound::Exclusive(value) => parse_integer(value).and_then(|v| v.checked_add(1)),
        });
        let upper = facets.upper_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_integer(value),
            Bound::Exclusive(value) => parse_integer(value).and_then(|v| v.checked_sub(1)),
        });

        Self {
            cycle: BoundaryCycle::bounded(floor, ceiling, 1, lower, upper, 1),
        }
    }

    pub fn next_value(&mut self) -> String {
        self.cycle.next_value().to_string()
    }
}

/// `xs:decimal`, narrowed by the digit-count facets.
///
/// Every value is kept on the grid of `10^-scale`, where the scale is
/// `fractionDigits` (else the finest bound) capped by `totalDigits`. Bounds are
/// rounded inward onto that grid, so values never need rounding afterwards.
#[derive(Debug, Clone)]
pub struct DecimalGenerator {
    cycle: BoundaryCycle<Decimal>,
}

impl DecimalGenerator {
    pub fn new(facets: &Facets) -> Self {
        let lower = facets.lower_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_decimal(value).map(|v| (v, false)),
            Bound::Exclusive(value) => parse_decimal(value).map(|v| (v, true)),
        });
        let upper = facets.upper_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_decimal(value).map(|v| (v, false)),
            Bound::Exclusive(value) => parse_decimal(value).map(|v| (v, true)),
        });

        let total_digits = facets.total_digits.map(|digits| digits.clamp(1, 28));
        let bound_scale = [lower, upper]
            .iter()
            .flatten()
            .map(|(value, _)| value.normalize().scale())
            .max()
            .unwrap_or(0);
        let mut scale = facets.fraction_digits.unwrap_or(bound_scale).min(28);
        if let Some(total) = total_digits {
            scale = scale.min(total);
        }
        let unit = Decimal::new(1, scale);

        let mut floor = Decimal::MIN;
        let mut ceiling = Decimal::MAX;
        if let Some(total) = total_digits {
            let mantissa = 10_i128.pow(total) - 1;
            if let Ok(limit) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                floor = -limit;
                ceiling = limit;
            }
        }

        let lower = lower.and_then(|(value, exclusive)| {
            if exclusive {
                value
                    .round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity)
                    .checked_add(unit)
            } else {
                Some(value.round_dp_with_strategy(scale, RoundingStrategy::ToPositiveInfinity))
            }
        });
        let upper = upper.and_then(|(value, exclusive)| {
            if exclusive {
                value
                    .round_dp_with_strategy(scale, RoundingStrategy::ToPositiveInfinity)
                    .checked_sub(unit)
            } else {
                Some(value.round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity))
            }
        });

        // Whole steps only while they fit the range; narrow ranges walk the grid.
        let span = upper
            .unwrap_or(ceiling)
            .checked_sub(lower.unwrap_or(floor))
            .unwrap_or(Decimal::MAX);
        let step = if span >= Decimal::ONE { Decimal::ONE } else { unit };

        Self {
            cycle: BoundaryCycle::bounded(floor, ceiling, Decimal::ONE, lower, upper, step),
        }
    }

    pub fn next_value(&mut self) -> String {
        self.cycle.next_value().normalize().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Single,
    Double,
}

/// `xs:float` and `xs:double`.
#[derive(Debug, Clone)]
pub struct FloatGenerator {
    width: FloatWidth,
    cycle: BoundaryCycle<f64>,
}

impl FloatGenerator {
    pub fn new(width: FloatWidth, facets: &Facets) -> Self {
        let (ceiling, epsilon) = match width {
            FloatWidth::Single => (f32::MAX as f64, f32::EPSILON as f64),
            FloatWidth::Double => (f64::MAX, f64::EPSILON),
        };
        let nudge = |value: f64| value.abs().max(1.0) * epsilon * 2.0;
        let lower = facets.lower_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_float(value),
            Bound::Exclusive(value) => parse_float(value).map(|v| v + nudge(v)),
        });
        let upper = facets.upper_bound().and_then(|bound| match bound {
            Bound::Inclusive(value) => parse_float(value),
            Bound::Exclusive(value) => parse_float(value).map(|v| v - nudge(v)),
        });

        Self {
            width,
            cycle: BoundaryCycle::bounded(-ceiling, ceiling, 1.0, lower, upper, 1.0),
        }
    }

    pub fn width(&self) -> FloatWidth {
        self.width
    }

    pub fn next_value(&mut self) -> String {
        format_float(self.cycle.next_value())
    }
}

pub fn format_float(value: f64) -> String {
    if value.abs() >= 1e15 {
        format!("{value:E}")
    } else {
        format!("{value}")
    }
}
