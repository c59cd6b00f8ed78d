//! CSV ingestion. Cells are cast on load: finite numbers become `Number`,
//! empty cells become `Null`, everything else stays `Text`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::data::{Dataset, Value};

fn cast_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(trimmed.to_string()),
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("CSV file is empty"));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("reading CSV record")?;
        // Short rows pad with nulls, long rows drop the extras.
        let row: Vec<Value> = (0..headers.len())
            .map(|i| record.get(i).map(cast_cell).unwrap_or(Value::Null))
            .collect();
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(anyhow!("CSV file has no data rows"));
    }

    Dataset::new(headers, rows)
}

pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("opening CSV file '{}'", path.display()))?;
    parse_csv(file).with_context(|| format!("parsing CSV file '{}'", path.display()))
}
