use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use svgc::artifact;
use svgc::csv_reader;
use svgc::data::Dataset;
use svgc::options::{ChartOptions, ChartType};

// -h is taken by --height, so the automatic help flag is disabled and
// --help is wired up by hand.
#[derive(Parser, Debug)]
#[command(name = "svgc")]
#[command(about = "Generate interactive SVG charts from CSV data", long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// Input CSV file
    input: PathBuf,

    /// Output SVG file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chart type: scatter or histogram
    #[arg(short = 't', long = "type", default_value = "scatter")]
    chart_type: String,

    /// Chart width in pixels
    #[arg(short, long, default_value_t = 800)]
    width: u32,

    /// Chart height in pixels
    #[arg(short, long, default_value_t = 600)]
    height: u32,

    /// X-axis field (scatter; defaults to the first numeric field)
    #[arg(short, long = "x-field")]
    x: Option<String>,

    /// Y-axis field (scatter; defaults to the second numeric field)
    #[arg(short, long = "y-field")]
    y: Option<String>,

    /// Field controlling point size (scatter)
    #[arg(short = 's', long = "size-field")]
    size_field: Option<String>,

    /// Field to group points by (scatter)
    #[arg(short = 'g', long = "group-field")]
    group_field: Option<String>,

    /// Field to bin (histogram; defaults to the first numeric field)
    #[arg(short = 'f', long = "field")]
    field: Option<String>,

    /// Number of histogram bins (defaults to a suggestion from the data)
    #[arg(short = 'b', long = "bins", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    bins: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn parse_chart_type(raw: &str) -> Result<ChartType> {
    match raw {
        "scatter" => Ok(ChartType::Scatter),
        "histogram" => Ok(ChartType::Histogram),
        other => Err(anyhow!(
            "Unknown chart type '{}': expected scatter or histogram",
            other
        )),
    }
}

fn build_options(args: &Args, data: &Dataset) -> Result<ChartOptions> {
    let chart_type = parse_chart_type(&args.chart_type)?;
    let numeric = data.numeric_fields();

    let mut options = ChartOptions {
        chart_type,
        width: args.width,
        height: args.height,
        weight_field: args.size_field.clone(),
        group_field: args.group_field.clone(),
        bin_count: args.bins,
        debug: args.debug,
        ..Default::default()
    };

    match chart_type {
        ChartType::Histogram => {
            options.histogram_field = args
                .field
                .clone()
                .or_else(|| numeric.first().cloned())
                .or_else(|| data.headers.first().cloned());
        }
        _ => {
            options.x_field = args.x.clone().or_else(|| numeric.first().cloned());
            options.y_field = args.y.clone().or_else(|| numeric.get(1).cloned());
            if options.x_field.is_none() || options.y_field.is_none() {
                return Err(anyhow!(
                    "Scatter chart needs two numeric fields; found {} in the CSV. \
                     Use -x and -y to pick fields explicitly.",
                    numeric.len()
                ));
            }
        }
    }

    Ok(options)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "svgc=debug" } else { "svgc=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    // 1. Load and cast the CSV
    let data = csv_reader::read_csv(&args.input)?;
    debug!(
        rows = data.rows.len(),
        fields = data.headers.len(),
        "loaded CSV"
    );

    // 2. Resolve chart options, auto-selecting fields where possible
    let options = build_options(&args, &data)?;
    debug!(?options.chart_type, "resolved chart options");

    // 3. Render the self-contained artifact
    let svg = artifact::generate_artifact(&data, &options).context("generating chart")?;

    // 4. Write it out
    match &args.output {
        Some(path) => {
            std::fs::write(path, &svg)
                .with_context(|| format!("writing output file '{}'", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(svg.as_bytes())
                .context("writing SVG to stdout")?;
            handle.flush().context("flushing stdout")?;
        }
    }

    Ok(())
}
