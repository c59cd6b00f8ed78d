//! Chart-type dispatch: a registry mapping each chart type to its
//! generate / render / render-controls triple.

use anyhow::Result;
use tracing::warn;

use crate::data::Dataset;
use crate::filter;
use crate::histogram::{self, HistogramChart};
use crate::options::{ChartOptions, ChartType};
use crate::scale::ChartBounds;
use crate::scatter::{generate_scatter, ScatterChart};
use crate::svg;

pub const PADDING: f64 = 60.0;
const SCATTER_PANEL_WIDTH: f64 = 180.0;
const HISTOGRAM_PANEL_WIDTH: f64 = 240.0;

/// Computed chart content for one frame.
#[derive(Debug, Clone)]
pub enum ChartData {
    Scatter(ScatterChart),
    Histogram(HistogramChart),
}

/// One chart type's implementation: compute the chart data, emit its SVG
/// fragment, and emit the static shell of its control panel.
pub trait ChartHandler {
    fn control_panel_width(&self) -> f64;

    fn generate(&self, data: &Dataset, options: &ChartOptions) -> Result<ChartData>;

    fn render(&self, chart: &ChartData, data: &Dataset, options: &ChartOptions) -> String;

    fn render_controls(&self, options: &ChartOptions) -> String {
        svg::render_controls_shell(self.control_panel_width() - 20.0, options.height)
    }
}

fn plot_bounds(options: &ChartOptions, panel_width: f64) -> ChartBounds {
    ChartBounds {
        left: panel_width + PADDING,
        top: PADDING,
        width: options.width as f64 - panel_width - PADDING - 20.0,
        height: options.height as f64 - 2.0 * PADDING,
    }
}

struct ScatterHandler;

impl ChartHandler for ScatterHandler {
    fn control_panel_width(&self) -> f64 {
        SCATTER_PANEL_WIDTH
    }

    fn generate(&self, data: &Dataset, options: &ChartOptions) -> Result<ChartData> {
        let rows = filter::apply(data, &options.filters);
        let bounds = plot_bounds(options, SCATTER_PANEL_WIDTH);
        let chart = generate_scatter(data, &rows, options, bounds)?;
        Ok(ChartData::Scatter(chart))
    }

    fn render(&self, chart: &ChartData, data: &Dataset, options: &ChartOptions) -> String {
        match chart {
            ChartData::Scatter(scatter) => {
                let rows = filter::apply(data, &options.filters);
                svg::render_scatter(scatter, data, &rows, options)
            }
            _ => String::new(),
        }
    }
}

struct HistogramHandler;

impl ChartHandler for HistogramHandler {
    fn control_panel_width(&self) -> f64 {
        HISTOGRAM_PANEL_WIDTH
    }

    fn generate(&self, data: &Dataset, options: &ChartOptions) -> Result<ChartData> {
        let field = options
            .histogram_field
            .clone()
            .or_else(|| data.headers.first().cloned())
            .unwrap_or_default();

        let rows = filter::apply(data, &options.filters);
        let field_index = data.column_index(&field);
        let values: Vec<&crate::data::Value> = rows
            .iter()
            .filter_map(|row| field_index.and_then(|i| row.get(i)))
            .collect();

        let bin_count = options.bin_count.unwrap_or_else(|| {
            let n = values
                .iter()
                .filter(|v| v.as_number().is_some())
                .count();
            histogram::suggest_bin_count(n)
        });

        Ok(ChartData::Histogram(HistogramChart {
            field,
            histogram: histogram::generate_histogram(&values, bin_count),
            bounds: plot_bounds(options, HISTOGRAM_PANEL_WIDTH),
        }))
    }

    fn render(&self, chart: &ChartData, _data: &Dataset, _options: &ChartOptions) -> String {
        match chart {
            ChartData::Histogram(histogram) => svg::render_histogram(histogram),
            _ => String::new(),
        }
    }
}

/// Registry of chart handlers, polymorphic over the variant set.
pub struct RenderDispatcher {
    handlers: Vec<(ChartType, Box<dyn ChartHandler>)>,
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                (ChartType::Scatter, Box::new(ScatterHandler)),
                (ChartType::Histogram, Box::new(HistogramHandler)),
            ],
        }
    }

    pub fn handler(&self, chart_type: ChartType) -> Option<&dyn ChartHandler> {
        self.handlers
            .iter()
            .find(|(t, _)| *t == chart_type)
            .map(|(_, h)| h.as_ref())
    }

    /// Produce the chart body and controls shell for one frame, or `None`
    /// when the chart type has no handler. Unknown types are reported and
    /// skipped rather than failing: the previous frame stays visible.
    pub fn render_frame(
        &self,
        data: &Dataset,
        options: &ChartOptions,
    ) -> Result<Option<(String, String)>> {
        let Some(handler) = self.handler(options.chart_type) else {
            warn!(chart_type = ?options.chart_type, "no handler for chart type, skipping render");
            return Ok(None);
        };
        let chart = handler.generate(data, options)?;
        let body = handler.render(&chart, data, options);
        let controls = handler.render_controls(options);
        Ok(Some((body, controls)))
    }
}
