//! Row filtering: AND-combined field predicates with numeric-aware coercion.

use crate::data::{Dataset, Value};
use crate::options::{Filter, FilterOp};

/// Filter the dataset's rows down to those satisfying every filter. An empty
/// filter list is the identity transform.
pub fn apply<'a>(data: &'a Dataset, filters: &[Filter]) -> Vec<&'a Vec<Value>> {
    data.rows
        .iter()
        .filter(|row| filters.iter().all(|f| evaluate(data, row, f)))
        .collect()
}

/// Evaluate one filter against one row.
///
/// When the row value is numeric and the filter's string value parses as a
/// number, the comparison is numeric; otherwise equality and ordering fall
/// back to string comparison. The substring operators case-fold both operands
/// and apply to any field, numeric values included, via their display form.
/// An `Unknown` operator is always true.
pub fn evaluate(data: &Dataset, row: &[Value], filter: &Filter) -> bool {
    let value = data.field_value(row, &filter.field);
    let numeric = value
        .as_number()
        .zip(filter.value.trim().parse::<f64>().ok());

    match filter.operator {
        FilterOp::Eq => match numeric {
            Some((v, f)) => v == f,
            None => !value.is_null() && value.display() == filter.value,
        },
        FilterOp::Ne => match numeric {
            Some((v, f)) => v != f,
            None => value.is_null() || value.display() != filter.value,
        },
        FilterOp::Gt => compare(value, numeric, filter, |ord| ord.is_gt()),
        FilterOp::Lt => compare(value, numeric, filter, |ord| ord.is_lt()),
        FilterOp::Ge => compare(value, numeric, filter, |ord| ord.is_ge()),
        FilterOp::Le => compare(value, numeric, filter, |ord| ord.is_le()),
        FilterOp::Contains => fold(value).contains(&fold_str(&filter.value)),
        FilterOp::StartsWith => fold(value).starts_with(&fold_str(&filter.value)),
        FilterOp::EndsWith => fold(value).ends_with(&fold_str(&filter.value)),
        // Fail-open: an operator this build does not recognize never drops rows
        FilterOp::Unknown => true,
    }
}

fn compare(
    value: &Value,
    numeric: Option<(f64, f64)>,
    filter: &Filter,
    check: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    if let Some((v, f)) = numeric {
        return v.partial_cmp(&f).is_some_and(&check);
    }
    match value {
        // Numeric value but non-numeric filter string: no meaningful order
        Value::Number(_) | Value::Null => false,
        Value::Text(s) => check(s.as_str().cmp(filter.value.as_str())),
    }
}

fn fold(value: &Value) -> String {
    value.display().to_lowercase()
}

fn fold_str(s: &str) -> String {
    s.to_lowercase()
}
