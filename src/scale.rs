//! Value-to-pixel scaling with degenerate-range handling.

/// A padded data range. `range` is strictly positive for every input, which
/// keeps the pixel mapping free of division by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// Pixel-space region the plot occupies inside the artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

const PADDING_FRAC: f64 = 0.05;

/// Compute a padded scale over `values`.
///
/// A non-degenerate range gets 5% padding per side. When every value is equal
/// the padding falls back to a tenth of the value's magnitude, and to 1 when
/// that is itself zero (an all-zero column). An empty slice yields the unit
/// scale so downstream mapping still has something to divide by.
pub fn compute_scale(values: &[f64]) -> Scale {
    if values.is_empty() {
        return Scale {
            min: 0.0,
            max: 1.0,
            range: 1.0,
        };
    }

    let data_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let data_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = data_max - data_min;

    let padding = if range > 0.0 {
        range * PADDING_FRAC
    } else {
        let fallback = data_min.abs() * 0.1;
        if fallback > 0.0 {
            fallback
        } else {
            1.0
        }
    };

    Scale {
        min: data_min - padding,
        max: data_max + padding,
        range: (range + 2.0 * padding).max(2.0 * padding),
    }
}

impl Scale {
    /// Horizontal pixel position of `value` inside `bounds`.
    pub fn to_px_x(&self, value: f64, bounds: &ChartBounds) -> f64 {
        bounds.left + ((value - self.min) / self.range) * bounds.width
    }

    /// Vertical pixel position of `value` inside `bounds`. Inverted: data y
    /// grows upward, pixel y grows downward.
    pub fn to_px_y(&self, value: f64, bounds: &ChartBounds) -> f64 {
        bounds.top + bounds.height - ((value - self.min) / self.range) * bounds.height
    }
}
