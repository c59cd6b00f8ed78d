use anyhow::{anyhow, Result};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// A single cell value. CSV cells are cast on load: parseable numbers become
/// `Number`, empty cells become `Null`, everything else stays `Text`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Display form used for grouping keys, categorical bins and filter
    /// comparisons. Numbers print without a trailing `.0`; nulls print empty.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => format!("{}", n),
            Value::Text(s) => s.clone(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// An immutable table loaded from CSV. Rows are stored positionally, aligned
/// with `headers`; serialization emits each row as an object in header order
/// so the embedded runtime can index rows by field name.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, h) in headers.iter().enumerate() {
            if headers[..i].contains(h) {
                return Err(anyhow!("Duplicate CSV header '{}'", h));
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == field)
    }

    /// Value of `field` in `row`, or `Null` when the field does not exist.
    pub fn field_value<'a>(&self, row: &'a [Value], field: &str) -> &'a Value {
        self.column_index(field)
            .and_then(|i| row.get(i))
            .unwrap_or(&Value::Null)
    }

    pub fn column_values<'a>(&'a self, field: &str) -> Vec<&'a Value> {
        match self.column_index(field) {
            Some(i) => self.rows.iter().filter_map(|r| r.get(i)).collect(),
            None => Vec::new(),
        }
    }

    /// Fields where every non-null value is numeric (and at least one value
    /// exists). Used for axis auto-selection and the axis dropdowns.
    pub fn numeric_fields(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| self.is_numeric_field(h))
            .cloned()
            .collect()
    }

    /// One row serialized as a JSON object in header order; used for point
    /// tooltips in the rendered artifact.
    pub fn row_json(&self, row: &[Value]) -> String {
        serde_json::to_string(&RowObject {
            headers: &self.headers,
            row,
        })
        .unwrap_or_default()
    }

    pub fn is_numeric_field(&self, field: &str) -> bool {
        let values: Vec<&Value> = self
            .column_values(field)
            .into_iter()
            .filter(|v| !v.is_null())
            .collect();
        !values.is_empty() && values.iter().all(|v| v.as_number().is_some())
    }
}

struct RowObject<'a> {
    headers: &'a [String],
    row: &'a [Value],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, value) in self.headers.iter().zip(self.row.iter()) {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Rows<'a>(&'a Dataset);
        impl Serialize for Rows<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_seq(self.0.rows.iter().map(|row| RowObject {
                    headers: &self.0.headers,
                    row,
                }))
            }
        }

        let mut state = serializer.serialize_struct("Dataset", 2)?;
        state.serialize_field("headers", &self.headers)?;
        state.serialize_field("rows", &Rows(self))?;
        state.end()
    }
}
