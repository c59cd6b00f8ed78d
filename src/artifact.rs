//! Artifact assembly: one self-contained SVG document carrying the initial
//! render, the full dataset and the interactive runtime in a CDATA script.
//!
//! The current options are embedded as a marked `defaultOptions` literal so
//! that both the in-browser "Save Current View" feature and
//! [`extract_embedded_defaults`] can locate and rewrite it.

use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use crate::data::Dataset;
use crate::dispatch::RenderDispatcher;
use crate::options::{ChartOptions, ChartType};
use crate::svg;

const RUNTIME_JS: &str = include_str!("../assets/runtime.js");

const DEFAULTS_OPEN: &str = "/* svgc:defaults */";
const DEFAULTS_CLOSE: &str = "/* /svgc:defaults */";

fn defaults_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"/\* svgc:defaults \*/const defaultOptions = (.*?);/\* /svgc:defaults \*/",
        )
        .unwrap_or_else(|_| unreachable!("defaults pattern is valid"))
    })
}

/// JSON serialization that is safe to splice into a CDATA section. A `]]>`
/// can only occur inside a JSON string, where the unicode escape for the
/// closing angle bracket is an equivalent spelling.
fn cdata_safe_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("serializing embedded JSON")?;
    Ok(json.replace("]]>", "]]\\u003e"))
}

fn chart_title(options: &ChartOptions) -> String {
    match options.chart_type {
        ChartType::Histogram => {
            let field = options.histogram_field.as_deref().unwrap_or_default();
            format!("Distribution of {}", field)
        }
        _ => {
            let x = options.x_field.as_deref().unwrap_or_default();
            let y = options.y_field.as_deref().unwrap_or_default();
            format!("{} vs {}", y, x)
        }
    }
}

/// Render the complete artifact for `data` under `options`.
pub fn generate_artifact(data: &Dataset, options: &ChartOptions) -> Result<String> {
    let dispatcher = RenderDispatcher::new();
    let (body, controls) = dispatcher
        .render_frame(data, options)?
        .ok_or_else(|| anyhow!("Unsupported chart type: {:?}", options.chart_type))?;

    let width = options.width;
    let height = options.height;
    let embedded_data = cdata_safe_json(data)?;
    let embedded_options = cdata_safe_json(options)?;

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
  <defs>
    <style>
{stylesheet}
    </style>
  </defs>
  <rect width="{width}" height="{height}" fill="white"/>
  <text x="{title_x}" y="30" text-anchor="middle" class="chart-title">{title}</text>
  <g id="chart-area">
    {body}
  </g>
  <g id="ui-controls">
    {controls}
  </g>
  <script type="text/javascript"><![CDATA[
const embeddedData = {embedded_data};
{open}const defaultOptions = {embedded_options};{close}
{runtime}
initializeChart();
]]></script>
</svg>
"#,
        stylesheet = svg::stylesheet(),
        title_x = width as f64 / 2.0,
        title = svg::escape_xml(&chart_title(options)),
        open = DEFAULTS_OPEN,
        close = DEFAULTS_CLOSE,
        runtime = RUNTIME_JS,
    ))
}

/// Rewrite the marked `defaultOptions` literal of an existing artifact so the
/// file reopens in the given view. Fails when the marker is missing, which
/// means the input is not an artifact this tool produced.
pub fn replace_embedded_defaults(artifact: &str, options: &ChartOptions) -> Result<String> {
    if !defaults_regex().is_match(artifact) {
        return Err(anyhow!("No embedded options marker found in artifact"));
    }
    let replacement = format!(
        "{}const defaultOptions = {};{}",
        DEFAULTS_OPEN,
        cdata_safe_json(options)?,
        DEFAULTS_CLOSE
    );
    Ok(defaults_regex()
        .replace(artifact, regex::NoExpand(&replacement))
        .into_owned())
}

/// Read back the options embedded in an artifact.
pub fn extract_embedded_defaults(artifact: &str) -> Result<ChartOptions> {
    let captures = defaults_regex()
        .captures(artifact)
        .ok_or_else(|| anyhow!("No embedded options marker found in artifact"))?;
    let json = captures
        .get(1)
        .ok_or_else(|| anyhow!("Malformed embedded options marker"))?
        .as_str();
    serde_json::from_str(json).context("parsing embedded chart options")
}
