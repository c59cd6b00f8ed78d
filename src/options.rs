use serde::{Deserialize, Serialize};

/// Chart variants the dispatcher knows how to draw. `Unknown` absorbs any
/// unrecognized type coming back from an edited artifact; rendering it is
/// skipped with a warning rather than failing the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Scatter,
    Histogram,
    #[serde(other)]
    Unknown,
}

/// Filter comparison operators, serialized with their wire names as they
/// appear in the embedded options JSON. An operator that fails to parse maps
/// to `Unknown`, which evaluates as always-true (fail-open by contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    Contains,
    StartsWith,
    EndsWith,
    #[serde(other)]
    Unknown,
}

/// A single row predicate. `id` is assigned from a monotonic counter at
/// creation time and is the stable identity used for edit and removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: u64,
    pub field: String,
    pub operator: FilterOp,
    pub value: String,
}

/// The live chart configuration: the single source of truth for what to
/// render. Serialized camelCase so it doubles as the embedded defaults
/// literal inside the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub chart_type: ChartType,
    pub width: u32,
    pub height: u32,
    pub x_field: Option<String>,
    pub y_field: Option<String>,
    pub group_field: Option<String>,
    pub weight_field: Option<String>,
    pub histogram_field: Option<String>,
    pub bin_count: Option<usize>,
    pub filters: Vec<Filter>,
    /// `None` is the "all groups visible" sentinel; an explicit list is
    /// created on the first visibility toggle.
    pub visible_groups: Option<Vec<String>>,
    pub debug: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Scatter,
            width: 800,
            height: 600,
            x_field: None,
            y_field: None,
            group_field: None,
            weight_field: None,
            histogram_field: None,
            bin_count: None,
            filters: Vec::new(),
            visible_groups: None,
            debug: false,
        }
    }
}

impl ChartOptions {
    /// True when `group` should be drawn given the current visibility set.
    pub fn is_group_visible(&self, group: &str) -> bool {
        match &self.visible_groups {
            None => true,
            Some(groups) => groups.iter().any(|g| g == group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChartType::Scatter).unwrap(),
            "\"scatter\""
        );
        let parsed: ChartType = serde_json::from_str("\"histogram\"").unwrap();
        assert_eq!(parsed, ChartType::Histogram);
    }

    #[test]
    fn test_unrecognized_chart_type_parses_as_unknown() {
        let parsed: ChartType = serde_json::from_str("\"pie\"").unwrap();
        assert_eq!(parsed, ChartType::Unknown);
    }

    #[test]
    fn test_filter_op_wire_names() {
        assert_eq!(serde_json::to_string(&FilterOp::Ge).unwrap(), "\">=\"");
        assert_eq!(
            serde_json::to_string(&FilterOp::StartsWith).unwrap(),
            "\"starts_with\""
        );
        let parsed: FilterOp = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(parsed, FilterOp::Contains);
    }

    #[test]
    fn test_unrecognized_operator_parses_as_unknown() {
        let parsed: FilterOp = serde_json::from_str("\"matches\"").unwrap();
        assert_eq!(parsed, FilterOp::Unknown);
    }

    #[test]
    fn test_options_round_trip() {
        let options = ChartOptions {
            chart_type: ChartType::Histogram,
            histogram_field: Some("age".to_string()),
            bin_count: Some(12),
            filters: vec![Filter {
                id: 3,
                field: "age".to_string(),
                operator: FilterOp::Gt,
                value: "25".to_string(),
            }],
            visible_groups: Some(vec!["a".to_string()]),
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"chartType\":\"histogram\""));
        assert!(json.contains("\"operator\":\">\""));
        let back: ChartOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_group_visibility_sentinel() {
        let mut options = ChartOptions::default();
        assert!(options.is_group_visible("anything"));
        options.visible_groups = Some(vec!["a".to_string()]);
        assert!(options.is_group_visible("a"));
        assert!(!options.is_group_visible("b"));
    }
}
