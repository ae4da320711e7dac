use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;

/// Value space a [`BoundaryCycle`] can walk.
///
/// Every arithmetic operation is checked; `None` means the value left the
/// representable range of the family.
pub trait CycleDomain: Clone + PartialOrd {
    type Step: Clone;

    fn zero_step() -> Self::Step;
    fn grow(increment: &Self::Step, step: &Self::Step) -> Option<Self::Step>;
    fn plus(&self, by: &Self::Step) -> Option<Self>;
    fn minus(&self, by: &Self::Step) -> Option<Self>;
}

impl CycleDomain for i128 {
    type Step = i128;

    fn zero_step() -> i128 {
        0
    }

    fn grow(increment: &i128, step: &i128) -> Option<i128> {
        increment.checked_add(*step)
    }

    fn plus(&self, by: &i128) -> Option<i128> {
        self.checked_add(*by)
    }

    fn minus(&self, by: &i128) -> Option<i128> {
        self.checked_sub(*by)
    }
}

impl CycleDomain for Decimal {
    type Step = Decimal;

    fn zero_step() -> Decimal {
        Decimal::ZERO
    }

    fn grow(increment: &Decimal, step: &Decimal) -> Option<Decimal> {
        increment.checked_add(*step)
    }

    fn plus(&self, by: &Decimal) -> Option<Decimal> {
        self.checked_add(*by)
    }

    fn minus(&self, by: &Decimal) -> Option<Decimal> {
        self.checked_sub(*by)
    }
}

impl CycleDomain for f64 {
    type Step = f64;

    fn zero_step() -> f64 {
        0.0
    }

    fn grow(increment: &f64, step: &f64) -> Option<f64> {
        finite(increment + step)
    }

    fn plus(&self, by: &f64) -> Option<f64> {
        finite(self + by)
    }

    fn minus(&self, by: &f64) -> Option<f64> {
        finite(self - by)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl CycleDomain for TimeDelta {
    type Step = TimeDelta;

    fn zero_step() -> TimeDelta {
        TimeDelta::zero()
    }

    fn grow(increment: &TimeDelta, step: &TimeDelta) -> Option<TimeDelta> {
        increment.checked_add(step)
    }

    fn plus(&self, by: &TimeDelta) -> Option<TimeDelta> {
        self.checked_add(by)
    }

    fn minus(&self, by: &TimeDelta) -> Option<TimeDelta> {
        self.checked_sub(by)
    }
}

impl CycleDomain for NaiveDateTime {
    type Step = TimeDelta;

    fn zero_step() -> TimeDelta {
        TimeDelta::zero()
    }

    fn grow(increment: &TimeDelta, step: &TimeDelta) -> Option<TimeDelta> {
        increment.checked_add(step)
    }

    fn plus(&self, by: &TimeDelta) -> Option<NaiveDateTime> {
        self.checked_add_signed(*by)
    }

    fn minus(&self, by: &TimeDelta) -> Option<NaiveDateTime> {
        self.checked_sub_signed(*by)
    }
}

/// Four-phase walk over `[min, max]` that keeps returning to the edges.
///
/// Phases, in rotation: `start + increment`, `min + increment`,
/// `max - increment` (then the increment grows by `step`), and
/// `start - increment` (after the increment grows by `step`). Every candidate
/// is clamped into `[min, max]`. Leaving the natural range `[floor, ceiling]`
/// resets the walk.
#[derive(Debug, Clone)]
pub struct BoundaryCycle<T: CycleDomain> {
    start: T,
    min: T,
    max: T,
    floor: T,
    ceiling: T,
    step: T::Step,
    increment: T::Step,
    phase: u8,
    stride: u8,
}

impl<T: CycleDomain> BoundaryCycle<T> {
    /// Cycle over the natural range `[floor, ceiling]` narrowed by optional
    /// facet bounds. A lower bound pins the start value.
    pub fn bounded(
        floor: T,
        ceiling: T,
        default_start: T,
        lower: Option<T>,
        upper: Option<T>,
        step: T::Step,
    ) -> Self {
        let pinned = lower.is_some();
        let min = clamp(lower.unwrap_or_else(|| floor.clone()), &floor, &ceiling);
        let mut max = clamp(upper.unwrap_or_else(|| ceiling.clone()), &floor, &ceiling);
        if min > max {
            max = min.clone();
        }
        let start = if pinned { min.clone() } else { default_start };
        Self::new(start, min, max, floor, ceiling, step)
    }

    /// `min` and `max` must lie inside `[floor, ceiling]`; `start` is clamped
    /// into `[min, max]`.
    pub fn new(start: T, min: T, max: T, floor: T, ceiling: T, step: T::Step) -> Self {
        let start = clamp(start, &min, &max);
        let degenerate = start == min || start == max;
        let mut cycle = Self {
            start,
            min,
            max,
            floor,
            ceiling,
            step,
            increment: T::zero_step(),
            phase: 0,
            stride: if degenerate { 2 } else { 1 },
        };
        cycle.reset();
        cycle
    }

    pub fn next_value(&mut self) -> T {
        for _ in 0..2 {
            match self.advance() {
                Some(candidate) => return clamp(candidate, &self.min, &self.max),
                None => self.reset(),
            }
        }
        self.start.clone()
    }

    fn advance(&mut self) -> Option<T> {
        let candidate = match self.phase {
            0 => self.start.plus(&self.increment)?,
            1 => self.min.plus(&self.increment)?,
            2 => {
                let value = self.max.minus(&self.increment)?;
                self.increment = T::grow(&self.increment, &self.step)?;
                value
            }
            _ => {
                self.increment = T::grow(&self.increment, &self.step)?;
                self.start.minus(&self.increment)?
            }
        };
        if candidate < self.floor || candidate > self.ceiling {
            return None;
        }
        self.phase = (self.phase + self.stride) % 4;
        Some(candidate)
    }

    fn reset(&mut self) {
        self.increment = T::zero_step();
        // With the start on the upper edge the odd phases are the distinct ones.
        self.phase = if self.start == self.max && self.start != self.min {
            1
        } else {
            0
        };
    }
}

fn clamp<T: PartialOrd>(value: T, min: &T, max: &T) -> T
where
    T: Clone,
{
    if value < *min {
        min.clone()
    } else if value > *max {
        max.clone()
    } else {
        value
    }
}
