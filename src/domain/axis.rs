// Axis scaler - rounded chart bounds that always contain the data

/// Rounded value range used to lay out chart gridlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub lower: f64,
    pub upper: f64,
}

impl AxisBounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// `increments + 1` evenly spaced tick values from lower to upper.
    pub fn ticks(&self, increments: usize) -> Vec<f64> {
        if increments == 0 {
            return vec![self.lower];
        }
        let step = self.span() / increments as f64;
        (0..=increments)
            .map(|i| {
                if i == increments {
                    self.upper
                } else {
                    self.lower + step * i as f64
                }
            })
            .collect()
    }

    /// Bounds for a series of values, `None` when there is nothing to scale.
    pub fn for_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;
        Some(compute_bounds(min, max))
    }

    fn merge(self, other: AxisBounds) -> AxisBounds {
        AxisBounds::new(self.lower.min(other.lower), self.upper.max(other.upper))
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Rounding unit for a data range of at least 10.
fn rounding_unit(range: f64) -> f64 {
    if range < 100.0 {
        10.0
    } else if range < 1_000.0 {
        50.0
    } else if range < 10_000.0 {
        100.0
    } else {
        1_000.0
    }
}

/// Magnitude-adaptive axis bounds with 10% padding.
///
/// Ranges under 10 snap to integers without padding. Wider ranges are padded
/// by 10% on both sides and snapped outward to a unit of 10, 50, 100 or 1000
/// depending on the size of the range. The result always satisfies
/// `lower <= data_min`, `upper >= data_max` and `lower < upper`; flat integer
/// data is widened by one on the upper side.
pub fn compute_bounds(data_min: f64, data_max: f64) -> AxisBounds {
    if !data_min.is_finite() || !data_max.is_finite() {
        return AxisBounds::default();
    }
    let (min, max) = if data_min <= data_max {
        (data_min, data_max)
    } else {
        (data_max, data_min)
    };

    let range = max - min;
    if range < 10.0 {
        let lower = min.floor();
        let mut upper = max.ceil();
        if upper <= lower {
            upper = lower + 1.0;
        }
        if upper <= lower {
            return widen_flat(lower);
        }
        return AxisBounds::new(lower, upper);
    }

    let padding = range * 0.10;
    let unit = rounding_unit(range);
    let lower = (((min - padding) / unit).floor() * unit).min(min);
    let upper = (((max + padding) / unit).ceil() * unit).max(max);
    if upper <= lower || !upper.is_finite() || !lower.is_finite() {
        return widen_flat(min).merge(widen_flat(max));
    }
    AxisBounds::new(lower, upper)
}

/// Bounds around a single value too large for a unit step to register.
///
/// The step grows with the magnitude so that it always exceeds the f64
/// spacing at `value`; near `f64::MAX` it is taken below instead of above.
fn widen_flat(value: f64) -> AxisBounds {
    let step = rounding_unit(value.abs().max(1.0)).max(value.abs() * 1e-12);
    let upper = value + step;
    if upper.is_finite() {
        AxisBounds::new(value, upper)
    } else {
        AxisBounds::new(value - step, value)
    }
}
