//! Histogram binning: numeric nice-boundary bins and frequency-sorted
//! categorical bins, plus the field classification that picks between them.

use crate::data::Value;
use crate::format::format_bin_label;
use crate::scale::ChartBounds;
use crate::ticks;

#[derive(Debug, Clone, PartialEq)]
pub struct NumericBin {
    pub range_start: f64,
    pub range_end: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBin {
    pub label: String,
    pub count: usize,
}

/// Binning result, tagged by classification. `max_count` is the largest
/// single-bin count, used to scale the bar heights.
#[derive(Debug, Clone, PartialEq)]
pub enum HistogramData {
    Numeric {
        bins: Vec<NumericBin>,
        nice_min: f64,
        nice_max: f64,
        max_count: usize,
    },
    Categorical {
        bins: Vec<CategoryBin>,
        max_count: usize,
    },
}

impl HistogramData {
    pub fn max_count(&self) -> usize {
        match self {
            HistogramData::Numeric { max_count, .. } => *max_count,
            HistogramData::Categorical { max_count, .. } => *max_count,
        }
    }

    pub fn bin_count(&self) -> usize {
        match self {
            HistogramData::Numeric { bins, .. } => bins.len(),
            HistogramData::Categorical { bins, .. } => bins.len(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            HistogramData::Numeric { bins, .. } => {
                bins.iter().map(|b| b.label.as_str()).collect()
            }
            HistogramData::Categorical { bins, .. } => {
                bins.iter().map(|b| b.label.as_str()).collect()
            }
        }
    }

    pub fn counts(&self) -> Vec<usize> {
        match self {
            HistogramData::Numeric { bins, .. } => bins.iter().map(|b| b.count).collect(),
            HistogramData::Categorical { bins, .. } => bins.iter().map(|b| b.count).collect(),
        }
    }
}

/// A generated histogram chart: the binned data plus the plot region.
#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub field: String,
    pub histogram: HistogramData,
    pub bounds: ChartBounds,
}

/// Bin the values of one field. Nulls are excluded before classification.
///
/// A field is numeric-mode only when every non-null value is a number; any
/// string mixed in demotes the whole field to categorical, with numbers
/// stringified. Empty input produces an empty categorical result.
pub fn generate_histogram(values: &[&Value], bin_count: usize) -> HistogramData {
    let values: Vec<&Value> = values.iter().filter(|v| !v.is_null()).copied().collect();

    let numeric: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
    let has_text = values.iter().any(|v| matches!(v, Value::Text(_)));

    if !numeric.is_empty() && !has_text {
        numeric_histogram(&numeric, bin_count)
    } else {
        let labels: Vec<String> = values.iter().map(|v| v.display()).collect();
        categorical_histogram(&labels)
    }
}

fn numeric_histogram(values: &[f64], bin_count: usize) -> HistogramData {
    let data_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let data_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // All values identical: a single zero-width bin holding everything
    if data_min == data_max {
        return HistogramData::Numeric {
            bins: vec![NumericBin {
                range_start: data_min,
                range_end: data_max,
                count: values.len(),
                label: Value::Number(data_min).display(),
            }],
            nice_min: data_min,
            nice_max: data_max,
            max_count: values.len(),
        };
    }

    // A zero target would blow up the step calculation; one bin is the floor
    let width = ticks::nice_step(data_min, data_max, bin_count.max(1));
    let (nice_min, nice_max) = ticks::nice_bounds(data_min, data_max, width);
    let n_bins = ticks::interval_count(nice_min, nice_max, width);

    let mut bins: Vec<NumericBin> = (0..n_bins)
        .map(|i| {
            let start = nice_min + i as f64 * width;
            let end = nice_min + (i + 1) as f64 * width;
            NumericBin {
                range_start: start,
                range_end: end,
                count: 0,
                label: format_bin_label(start, end, width),
            }
        })
        .collect();

    for &value in values {
        // Clamp captures values equal to nice_max, which would otherwise
        // index one past the last bin
        let index = ((value - nice_min) / width).floor() as i64;
        let index = index.clamp(0, n_bins as i64 - 1) as usize;
        bins[index].count += 1;
    }

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    HistogramData::Numeric {
        bins,
        nice_min,
        nice_max,
        max_count,
    }
}

fn categorical_histogram(labels: &[String]) -> HistogramData {
    let mut bins: Vec<CategoryBin> = Vec::new();
    for label in labels {
        match bins.iter_mut().find(|b| &b.label == label) {
            Some(bin) => bin.count += 1,
            None => bins.push(CategoryBin {
                label: label.clone(),
                count: 1,
            }),
        }
    }

    // Stable sort: ties keep first-seen order
    bins.sort_by(|a, b| b.count.cmp(&a.count));

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    HistogramData::Categorical { bins, max_count }
}

/// Sturges' rule bin-count suggestion, clamped to a usable range. An empty
/// field gets the historical default of 10.
pub fn suggest_bin_count(n: usize) -> usize {
    if n == 0 {
        return 10;
    }
    let sturges = (1.0 + 3.322 * (n as f64).log10()).ceil() as usize;
    sturges.clamp(5, 50)
}
