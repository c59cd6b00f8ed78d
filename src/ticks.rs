//! Nice-number engine shared by axis ticks and histogram bin boundaries.

/// Pick a "nice" step (1, 2, 2.5, 5 or 10 times a power of ten) for dividing
/// `[min, max]` into roughly `target_count` intervals.
///
/// Callers must guard the degenerate `min == max` range; a zero range would
/// send `log10` to negative infinity.
pub fn nice_step(min: f64, max: f64, target_count: usize) -> f64 {
    let range = max - min;
    let rough_step = range / target_count as f64;

    let magnitude = 10f64.powf(rough_step.abs().log10().floor());
    let normalized = rough_step / magnitude;

    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    factor * magnitude
}

/// Expand `[min, max]` outward to the nearest step multiples.
pub fn nice_bounds(min: f64, max: f64, step: f64) -> (f64, f64) {
    let nice_min = (min / step).floor() * step;
    let nice_max = (max / step).ceil() * step;
    (nice_min, nice_max)
}

/// Number of intervals between the nice bounds.
pub fn interval_count(nice_min: f64, nice_max: f64, step: f64) -> usize {
    ((nice_max - nice_min) / step).round() as usize
}

/// Generate aligned axis ticks covering `[min, max]`. A degenerate range
/// yields the single tick `[min]`. Each tick is re-rounded to the nearest
/// step multiple to suppress accumulated floating-point drift, and the loop
/// bound carries a `step * 0.001` tolerance so the final tick is not lost to
/// rounding error.
pub fn generate_ticks(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    if min == max {
        return vec![min];
    }

    let step = nice_step(min, max, target_count);
    let (nice_min, nice_max) = nice_bounds(min, max, step);

    let mut ticks = Vec::new();
    let mut tick = nice_min;
    while tick <= nice_max + step * 0.001 {
        ticks.push((tick / step).round() * step);
        tick += step;
    }
    ticks
}
