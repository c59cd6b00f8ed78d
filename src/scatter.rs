//! Scatter chart generation: scales, per-point pixel layout and group colors.

use anyhow::{anyhow, Result};

use crate::data::{Dataset, Value};
use crate::options::ChartOptions;
use crate::palette::generate_colors;
use crate::scale::{compute_scale, ChartBounds, Scale};

/// A laid-out point. Derived data, recomputed on every render.
#[derive(Debug, Clone)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub group: String,
    /// Index into the filtered row view this chart was generated from.
    pub row_index: usize,
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub points: Vec<Point>,
    pub x_scale: Scale,
    pub y_scale: Scale,
    /// Groups in first-seen row order, paired with their palette color.
    pub groups: Vec<(String, String)>,
    pub bounds: ChartBounds,
}

const MIN_RADIUS: f64 = 2.0;
const MAX_RADIUS: f64 = 10.0;

fn point_radius(weight: f64) -> f64 {
    (3.0 + weight.sqrt() * 2.0).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Generate a scatter chart over the (already filtered) `rows` view.
///
/// Rows whose x or y value is not numeric are dropped silently; that is a
/// data-quality condition, not an error. Weight defaults to 1 when no weight
/// field is configured or the row's weight is non-numeric.
pub fn generate_scatter(
    data: &Dataset,
    rows: &[&Vec<Value>],
    options: &ChartOptions,
    bounds: ChartBounds,
) -> Result<ScatterChart> {
    let x_field = options
        .x_field
        .as_deref()
        .ok_or_else(|| anyhow!("Scatter chart requires an x field"))?;
    let y_field = options
        .y_field
        .as_deref()
        .ok_or_else(|| anyhow!("Scatter chart requires a y field"))?;

    let numeric_column = |field: &str| -> Vec<f64> {
        rows.iter()
            .filter_map(|row| data.field_value(row, field).as_number())
            .collect()
    };

    let x_scale = compute_scale(&numeric_column(x_field));
    let y_scale = compute_scale(&numeric_column(y_field));

    // Groups in first-seen order, colored from the shared palette
    let group_of = |row: &[Value]| -> String {
        match &options.group_field {
            Some(field) => data.field_value(row, field).display(),
            None => "default".to_string(),
        }
    };
    let mut group_names: Vec<String> = Vec::new();
    for row in rows {
        let group = group_of(row);
        if !group_names.contains(&group) {
            group_names.push(group);
        }
    }
    let colors = generate_colors(group_names.len());
    let groups: Vec<(String, String)> = group_names.into_iter().zip(colors).collect();

    let mut points = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let (Some(x), Some(y)) = (
            data.field_value(row, x_field).as_number(),
            data.field_value(row, y_field).as_number(),
        ) else {
            continue;
        };

        let weight = options
            .weight_field
            .as_deref()
            .and_then(|field| data.field_value(row, field).as_number())
            .unwrap_or(1.0);

        let group = group_of(row);
        let color = groups
            .iter()
            .find(|(name, _)| name == &group)
            .map(|(_, color)| color.clone())
            .unwrap_or_default();

        points.push(Point {
            x: x_scale.to_px_x(x, &bounds),
            y: y_scale.to_px_y(y, &bounds),
            radius: point_radius(weight),
            color,
            group,
            row_index: index,
        });
    }

    Ok(ScatterChart {
        points,
        x_scale,
        y_scale,
        groups,
        bounds,
    })
}
