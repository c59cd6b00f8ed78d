//! Group color assignment: a fixed ten-color palette, extended with
//! golden-angle HSL hues when more groups are present.

const BASE_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Golden angle in degrees; successive hues land far apart on the wheel.
const GOLDEN_ANGLE: f64 = 137.508;

pub fn generate_colors(count: usize) -> Vec<String> {
    let mut colors: Vec<String> = BASE_COLORS
        .iter()
        .take(count)
        .map(|c| c.to_string())
        .collect();

    for i in BASE_COLORS.len()..count {
        let hue = (i as f64 * GOLDEN_ANGLE) % 360.0;
        colors.push(format!("hsl({}, 70%, 50%)", hue));
    }

    colors
}
