//! Static SVG markup assembly. These fragments form the initial render of the
//! artifact; the embedded runtime clears and rebuilds them on every state
//! change using the same layout rules.

use crate::data::{Dataset, Value};
use crate::format::format_number;
use crate::histogram::HistogramChart;
use crate::options::ChartOptions;
use crate::scatter::ScatterChart;
use crate::ticks::generate_ticks;

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Shared stylesheet for chart, legend and control classes.
pub fn stylesheet() -> &'static str {
    r#"      .chart-point { cursor: pointer; transition: all 0.2s ease; }
      .chart-point:hover { stroke: #000; stroke-width: 2; }
      .chart-point.highlighted { opacity: 1; }
      .chart-point.dimmed { opacity: 0.1; }
      .chart-point.hidden { display: none; }

      .axis-line { stroke: #333; stroke-width: 1; }
      .axis-tick { stroke: #333; stroke-width: 1; }
      .grid-line { stroke: #e0e0e0; stroke-width: 1; stroke-dasharray: 2,2; opacity: 0.6; }
      .axis-text { font-family: Arial, sans-serif; font-size: 12px; fill: #333; }
      .chart-title { font-family: Arial, sans-serif; font-size: 16px; font-weight: bold; fill: #333; }
      .histogram-bar { cursor: pointer; }
      .histogram-bar:hover { opacity: 0.8; }

      .legend-item { cursor: pointer; transition: all 0.2s ease; }
      .legend-item:hover { opacity: 0.8; }
      .legend-item.disabled { opacity: 0.4; }
      .legend-item.disabled .legend-indicator { fill: #ccc; }
      .legend-indicator { transition: fill 0.2s ease; }
      .legend-text { font-family: Arial, sans-serif; font-size: 11px; fill: #333; }
      .legend-checkbox { stroke: #333; stroke-width: 1; fill: none; }
      .legend-checkbox.checked { fill: #333; }

      .ui-label { font-family: Arial, sans-serif; font-size: 12px; font-weight: bold; fill: #333; }"#
}

fn sanitize_group_id(group: &str) -> String {
    group
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

// =============================================================================
// Scatter fragments
// =============================================================================

pub fn render_scatter(
    chart: &ScatterChart,
    data: &Dataset,
    rows: &[&Vec<Value>],
    options: &ChartOptions,
) -> String {
    let mut out = Vec::new();
    out.push(scatter_axes(chart, options));
    out.push(scatter_points(chart, data, rows, options));
    out.push(scatter_legend(chart, options));
    out.join("\n    ")
}

fn scatter_axes(chart: &ScatterChart, options: &ChartOptions) -> String {
    let b = &chart.bounds;
    let mut parts = Vec::new();

    parts.push(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis-line"/>"#,
        b.left,
        b.top + b.height,
        b.left + b.width,
        b.top + b.height
    ));
    parts.push(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis-line"/>"#,
        b.left,
        b.top,
        b.left,
        b.top + b.height
    ));

    let x_ticks: Vec<f64> = generate_ticks(chart.x_scale.min, chart.x_scale.max, 5)
        .into_iter()
        .filter(|t| *t >= chart.x_scale.min && *t <= chart.x_scale.max)
        .collect();
    for tick in x_ticks {
        let x = chart.x_scale.to_px_x(tick, b);
        if (x - b.left).abs() > 1.0 {
            parts.push(format!(
                r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" class="grid-line"/>"#,
                b.top,
                b.top + b.height
            ));
        }
        parts.push(format!(
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" class="axis-tick"/>"#,
            b.top + b.height,
            b.top + b.height + 5.0
        ));
        parts.push(format!(
            r#"<text x="{x}" y="{}" text-anchor="middle" class="axis-text">{}</text>"#,
            b.top + b.height + 18.0,
            escape_xml(&format_number(tick))
        ));
    }

    let y_ticks: Vec<f64> = generate_ticks(chart.y_scale.min, chart.y_scale.max, 5)
        .into_iter()
        .filter(|t| *t >= chart.y_scale.min && *t <= chart.y_scale.max)
        .collect();
    for tick in y_ticks {
        let y = chart.y_scale.to_px_y(tick, b);
        if (y - (b.top + b.height)).abs() > 1.0 {
            parts.push(format!(
                r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" class="grid-line"/>"#,
                b.left,
                b.left + b.width
            ));
        }
        parts.push(format!(
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" class="axis-tick"/>"#,
            b.left - 5.0,
            b.left
        ));
        parts.push(format!(
            r#"<text x="{}" y="{}" text-anchor="end" class="axis-text">{}</text>"#,
            b.left - 10.0,
            y + 4.0,
            escape_xml(&format_number(tick))
        ));
    }

    let x_field = options.x_field.as_deref().unwrap_or_default();
    let y_field = options.y_field.as_deref().unwrap_or_default();
    parts.push(format!(
        r#"<text x="{}" y="{}" text-anchor="middle" class="axis-text" style="font-weight: bold;">{}</text>"#,
        b.left + b.width / 2.0,
        b.top + b.height + 45.0,
        escape_xml(x_field)
    ));
    let y_title_x = b.left - 45.0;
    let y_title_y = b.top + b.height / 2.0;
    parts.push(format!(
        r#"<text x="{y_title_x}" y="{y_title_y}" text-anchor="middle" class="axis-text" style="font-weight: bold;" transform="rotate(-90, {y_title_x}, {y_title_y})">{}</text>"#,
        escape_xml(y_field)
    ));

    parts.join("\n    ")
}

fn scatter_points(
    chart: &ScatterChart,
    data: &Dataset,
    rows: &[&Vec<Value>],
    options: &ChartOptions,
) -> String {
    chart
        .points
        .iter()
        .map(|p| {
            let hidden = if options.is_group_visible(&p.group) {
                ""
            } else {
                " hidden"
            };
            let tooltip = rows
                .get(p.row_index)
                .map(|row| data.row_json(row))
                .unwrap_or_default();
            format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" class="chart-point{hidden}" data-group="{}" data-index="{}"><title>{}</title></circle>"#,
                p.x,
                p.y,
                p.radius,
                escape_xml(&p.color),
                escape_xml(&p.group),
                p.row_index,
                escape_xml(&tooltip)
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ")
}

fn scatter_legend(chart: &ScatterChart, options: &ChartOptions) -> String {
    if options.group_field.is_none() || chart.groups.len() <= 1 {
        return String::new();
    }

    let legend_x = options.width as f64 - 180.0;
    let legend_y = 50.0;
    let group_field = options.group_field.as_deref().unwrap_or_default();

    let mut parts = vec![format!(
        r#"<text x="{legend_x}" y="{legend_y}" class="legend-text" style="font-weight: bold;">{}</text>"#,
        escape_xml(group_field)
    )];

    for (index, (group, color)) in chart.groups.iter().enumerate() {
        let y = legend_y + 20.0 + index as f64 * 20.0;
        let visible = options.is_group_visible(group);
        let disabled = if visible { "" } else { " disabled" };
        let checked = if visible { " checked" } else { "" };
        parts.push(format!(
            r#"<g class="legend-item{disabled}" data-group="{group_esc}" id="group-{id}">
      <rect x="{bg_x}" y="{bg_y}" width="160" height="18" fill="transparent" stroke="none"/>
      <rect x="{legend_x}" y="{cb_y}" width="8" height="8" class="legend-checkbox{checked}" data-group="{group_esc}"/>
      <circle cx="{ind_x}" cy="{ind_y}" r="5" fill="{color}" class="legend-indicator" data-group="{group_esc}"/>
      <text x="{label_x}" y="{y}" class="legend-text" data-group="{group_esc}">{group_esc}</text>
    </g>"#,
            group_esc = escape_xml(group),
            id = sanitize_group_id(group),
            bg_x = legend_x - 5.0,
            bg_y = y - 12.0,
            cb_y = y - 8.0,
            ind_x = legend_x + 18.0,
            ind_y = y - 4.0,
            color = escape_xml(color),
            label_x = legend_x + 28.0,
        ));
    }

    parts.join("\n    ")
}

// =============================================================================
// Histogram fragments
// =============================================================================

pub fn render_histogram(chart: &HistogramChart) -> String {
    let mut out = Vec::new();
    out.push(histogram_axes(chart));
    out.push(histogram_bars(chart));
    out.join("\n    ")
}

fn histogram_axes(chart: &HistogramChart) -> String {
    let b = &chart.bounds;
    let max_count = chart.histogram.max_count().max(1) as f64;
    let mut parts = Vec::new();

    parts.push(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis-line"/>"#,
        b.left,
        b.top + b.height,
        b.left + b.width,
        b.top + b.height
    ));
    parts.push(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis-line"/>"#,
        b.left,
        b.top,
        b.left,
        b.top + b.height
    ));

    for tick in generate_ticks(0.0, max_count, 5) {
        if tick < 0.0 || tick > max_count {
            continue;
        }
        let y = b.top + b.height - (tick / max_count) * b.height;
        if tick > 0.0 {
            parts.push(format!(
                r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" class="grid-line"/>"#,
                b.left,
                b.left + b.width
            ));
        }
        parts.push(format!(
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" class="axis-tick"/>"#,
            b.left - 5.0,
            b.left
        ));
        parts.push(format!(
            r#"<text x="{}" y="{}" text-anchor="end" class="axis-text">{}</text>"#,
            b.left - 10.0,
            y + 4.0,
            escape_xml(&format_number(tick))
        ));
    }

    let y_title_x = b.left - 40.0;
    let y_title_y = b.top + b.height / 2.0;
    parts.push(format!(
        r#"<text x="{y_title_x}" y="{y_title_y}" text-anchor="middle" class="axis-text" style="font-weight: bold;" transform="rotate(-90, {y_title_x}, {y_title_y})">Count</text>"#
    ));
    parts.push(format!(
        r#"<text x="{}" y="{}" text-anchor="middle" class="axis-text" style="font-weight: bold;">{}</text>"#,
        b.left + b.width / 2.0,
        b.top + b.height + 45.0,
        escape_xml(&chart.field)
    ));

    parts.join("\n    ")
}

const MAX_BAR_LABEL: usize = 15;

fn histogram_bars(chart: &HistogramChart) -> String {
    let b = &chart.bounds;
    let labels = chart.histogram.labels();
    let counts = chart.histogram.counts();
    if labels.is_empty() {
        return String::new();
    }

    let max_count = chart.histogram.max_count().max(1) as f64;
    let bar_width = b.width / labels.len() as f64;
    let bar_padding = (bar_width * 0.1).min(4.0);

    let mut parts = Vec::new();
    for (index, (label, count)) in labels.iter().zip(counts.iter()).enumerate() {
        let x = b.left + index as f64 * bar_width + bar_padding;
        let width = bar_width - 2.0 * bar_padding;
        let height = (*count as f64 / max_count) * b.height;
        let y = b.top + b.height - height;

        parts.push(format!(
            r##"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="#1f77b4" class="histogram-bar" data-bin="{index}"><title>{}: {count}</title></rect>"##,
            escape_xml(label)
        ));

        let label_x = x + width / 2.0;
        let label_y = b.top + b.height + 15.0;
        let short: String = if label.chars().count() > MAX_BAR_LABEL {
            let truncated: String = label.chars().take(MAX_BAR_LABEL).collect();
            format!("{}...", truncated)
        } else {
            label.to_string()
        };
        parts.push(format!(
            r#"<text x="{label_x}" y="{label_y}" text-anchor="middle" class="axis-text" style="font-size: 9px;" transform="rotate(-45, {label_x}, {label_y})">{}</text>"#,
            escape_xml(&short)
        ));
    }

    parts.join("\n    ")
}

// =============================================================================
// Control panel
// =============================================================================

/// Static control-panel shell. The interactive widgets (dropdowns, filter
/// rows, buttons) need a live document, so the runtime builds them on load;
/// the shell keeps the initial frame visually complete.
pub fn render_controls_shell(panel_width: f64, height: u32) -> String {
    let panel_x = 10.0;
    let panel_y = 50.0;
    format!(
        r##"<rect x="{panel_x}" y="{panel_y}" width="{panel_width}" height="{}" fill="#f8f9fa" stroke="#dee2e6" stroke-width="1" rx="6"/>
    <text x="{}" y="{}" class="ui-label" text-anchor="middle" style="font-size: 14px;">Chart Controls</text>"##,
        height as f64 - panel_y - 20.0,
        panel_x + panel_width / 2.0,
        panel_y + 20.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{generate_histogram, HistogramChart};
    use crate::scale::ChartBounds;
    use crate::scatter::generate_scatter;

    fn bounds() -> ChartBounds {
        ChartBounds {
            left: 240.0,
            top: 60.0,
            width: 480.0,
            height: 480.0,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["x".to_string(), "y".to_string(), "kind".to_string()],
            vec![
                vec![
                    Value::Number(1.0),
                    Value::Number(2.0),
                    Value::Text("a<b".to_string()),
                ],
                vec![
                    Value::Number(3.0),
                    Value::Number(4.0),
                    Value::Text("c".to_string()),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a & "b">"#),
            "&lt;a &amp; &quot;b&quot;&gt;"
        );
    }

    #[test]
    fn test_scatter_markup_escapes_group_values() {
        let data = dataset();
        let rows: Vec<&Vec<Value>> = data.rows.iter().collect();
        let options = ChartOptions {
            x_field: Some("x".to_string()),
            y_field: Some("y".to_string()),
            group_field: Some("kind".to_string()),
            ..Default::default()
        };
        let chart = generate_scatter(&data, &rows, &options, bounds()).unwrap();
        let svg = render_scatter(&chart, &data, &rows, &options);
        assert!(svg.contains("data-group=\"a&lt;b\""));
        assert!(!svg.contains("data-group=\"a<b\""));
        assert!(svg.contains("class=\"chart-point\""));
        assert!(svg.contains("id=\"group-a-b\""));
    }

    #[test]
    fn test_hidden_groups_marked_in_markup() {
        let data = dataset();
        let rows: Vec<&Vec<Value>> = data.rows.iter().collect();
        let options = ChartOptions {
            x_field: Some("x".to_string()),
            y_field: Some("y".to_string()),
            group_field: Some("kind".to_string()),
            visible_groups: Some(vec!["c".to_string()]),
            ..Default::default()
        };
        let chart = generate_scatter(&data, &rows, &options, bounds()).unwrap();
        let svg = render_scatter(&chart, &data, &rows, &options);
        assert!(svg.contains("chart-point hidden"));
        assert!(svg.contains("legend-item disabled"));
    }

    #[test]
    fn test_no_legend_for_single_group() {
        let data = dataset();
        let rows: Vec<&Vec<Value>> = data.rows.iter().collect();
        let options = ChartOptions {
            x_field: Some("x".to_string()),
            y_field: Some("y".to_string()),
            ..Default::default()
        };
        let chart = generate_scatter(&data, &rows, &options, bounds()).unwrap();
        let svg = render_scatter(&chart, &data, &rows, &options);
        assert!(!svg.contains("legend-item"));
    }

    #[test]
    fn test_histogram_markup_has_bars_and_count_axis() {
        let owned: Vec<Value> = vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(2.0),
            Value::Number(9.0),
        ];
        let values: Vec<&Value> = owned.iter().collect();
        let chart = HistogramChart {
            field: "score".to_string(),
            histogram: generate_histogram(&values, 5),
            bounds: bounds(),
        };
        let svg = render_histogram(&chart);
        assert!(svg.contains("histogram-bar"));
        assert!(svg.contains(">Count</text>"));
        assert!(svg.contains(">score</text>"));
    }

    #[test]
    fn test_long_bar_labels_truncated() {
        let owned: Vec<Value> = vec![Value::Text(
            "a very long categorical label".to_string(),
        )];
        let values: Vec<&Value> = owned.iter().collect();
        let chart = HistogramChart {
            field: "f".to_string(),
            histogram: generate_histogram(&values, 5),
            bounds: bounds(),
        };
        let svg = render_histogram(&chart);
        assert!(svg.contains("a very long cat..."));
    }
}
