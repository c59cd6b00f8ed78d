//! The interactive state machine behind the embedded controls.
//!
//! All mutation goes through [`ChartState::dispatch`], a reducer over an
//! explicit [`Action`] enum. The returned [`Effect`] tells the caller which
//! surfaces to rebuild; rendering itself lives elsewhere, which keeps every
//! transition testable without a document tree. The embedded runtime mirrors
//! these exact semantics in the artifact.

use anyhow::Result;
use tracing::debug;

use crate::data::Dataset;
use crate::options::{ChartOptions, ChartType, Filter, FilterOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Partial edit applied to a pending filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPatch {
    Field(String),
    Operator(FilterOp),
    Value(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddFilter,
    UpdateFilter { id: u64, patch: FilterPatch },
    ApplyPendingFilters,
    RemoveFilter { id: u64 },
    ClearAllFilters,
    ToggleGroup { group: String },
    ChangeField { axis: Axis, field: String },
    ChangeGroupField { field: Option<String> },
    ChangeHistogramField { field: String },
    ChangeChartType { chart_type: ChartType },
    SetBinCount { count: usize },
}

/// What the caller must rebuild after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to redraw. Notably returned by `UpdateFilter`: re-rendering
    /// the controls mid-keystroke would steal focus from the text input.
    None,
    /// Controls only; the chart is untouched by staged edits.
    Controls,
    /// Chart only (visibility toggles, axis changes).
    Chart,
    /// Full rebuild of chart and controls.
    ChartAndControls,
}

/// Owns the applied options and the pending-filter buffer. Filter identity
/// comes from a monotonic counter, so rapid successive additions can never
/// collide.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub options: ChartOptions,
    pub pending_filters: Vec<Filter>,
    next_filter_id: u64,
}

impl ChartState {
    /// Pending starts as a deep copy of the applied filters so a reopened
    /// artifact presents its saved filters ready for editing.
    pub fn new(options: ChartOptions) -> Self {
        let pending_filters = options.filters.clone();
        let next_filter_id = options.filters.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        Self {
            options,
            pending_filters,
            next_filter_id,
        }
    }

    /// Apply one action and report what needs re-rendering.
    pub fn dispatch(&mut self, data: &Dataset, action: Action) -> Effect {
        debug!(?action, "state transition");
        match action {
            Action::AddFilter => {
                let field = data.headers.first().cloned().unwrap_or_default();
                self.pending_filters.push(Filter {
                    id: self.next_filter_id,
                    field,
                    operator: FilterOp::Eq,
                    value: String::new(),
                });
                self.next_filter_id += 1;
                Effect::Controls
            }
            Action::UpdateFilter { id, patch } => {
                if let Some(filter) = self.pending_filters.iter_mut().find(|f| f.id == id) {
                    match patch {
                        FilterPatch::Field(field) => filter.field = field,
                        FilterPatch::Operator(op) => filter.operator = op,
                        FilterPatch::Value(value) => filter.value = value,
                    }
                }
                Effect::None
            }
            Action::ApplyPendingFilters => {
                self.options.filters = self.pending_filters.clone();
                Effect::ChartAndControls
            }
            Action::RemoveFilter { id } => {
                // Removal from pending is unconditional; removal is live only
                // when the filter had already been applied
                self.pending_filters.retain(|f| f.id != id);
                let was_applied = self.options.filters.iter().any(|f| f.id == id);
                if was_applied {
                    self.options.filters.retain(|f| f.id != id);
                    Effect::ChartAndControls
                } else {
                    Effect::Controls
                }
            }
            Action::ClearAllFilters => {
                self.pending_filters.clear();
                self.options.filters.clear();
                Effect::ChartAndControls
            }
            Action::ToggleGroup { group } => {
                let visible = match self.options.visible_groups.take() {
                    // First toggle: materialize the "all visible" sentinel as
                    // every known group except the one being hidden
                    None => self
                        .known_groups(data)
                        .into_iter()
                        .filter(|g| g != &group)
                        .collect(),
                    Some(mut groups) => {
                        if let Some(pos) = groups.iter().position(|g| g == &group) {
                            groups.remove(pos);
                        } else {
                            groups.push(group);
                        }
                        groups
                    }
                };
                self.options.visible_groups = Some(visible);
                Effect::Chart
            }
            Action::ChangeField { axis, field } => {
                match axis {
                    Axis::X => self.options.x_field = Some(field),
                    Axis::Y => self.options.y_field = Some(field),
                }
                Effect::Chart
            }
            Action::ChangeGroupField { field } => {
                self.options.group_field = field;
                // Group set changed, so the explicit visibility list no
                // longer means anything
                self.options.visible_groups = None;
                Effect::Chart
            }
            Action::ChangeHistogramField { field } => {
                let values = data
                    .column_values(&field)
                    .into_iter()
                    .filter(|v| v.as_number().is_some())
                    .count();
                if values > 0 {
                    self.options.bin_count = Some(crate::histogram::suggest_bin_count(values));
                }
                self.options.histogram_field = Some(field);
                Effect::ChartAndControls
            }
            Action::ChangeChartType { chart_type } => {
                self.options.chart_type = chart_type;
                Effect::ChartAndControls
            }
            Action::SetBinCount { count } => {
                self.options.bin_count = Some(count);
                Effect::Chart
            }
        }
    }

    /// Serialize the live options as a JSON snapshot; the save operation
    /// splices this back into the artifact as its new embedded defaults.
    pub fn snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.options)?)
    }

    fn known_groups(&self, data: &Dataset) -> Vec<String> {
        match &self.options.group_field {
            None => vec!["default".to_string()],
            Some(field) => {
                let mut groups = Vec::new();
                for value in data.column_values(field) {
                    let group = value.display();
                    if !groups.contains(&group) {
                        groups.push(group);
                    }
                }
                groups
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use crate::filter;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["x".to_string(), "y".to_string(), "kind".to_string()],
            vec![
                vec![
                    Value::Number(1.0),
                    Value::Number(2.0),
                    Value::Text("a".to_string()),
                ],
                vec![
                    Value::Number(3.0),
                    Value::Number(4.0),
                    Value::Text("b".to_string()),
                ],
                vec![
                    Value::Number(5.0),
                    Value::Number(6.0),
                    Value::Text("c".to_string()),
                ],
            ],
        )
        .unwrap()
    }

    fn state() -> ChartState {
        ChartState::new(ChartOptions {
            x_field: Some("x".to_string()),
            y_field: Some("y".to_string()),
            group_field: Some("kind".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_added_filter_is_staged_not_applied() {
        let data = dataset();
        let mut state = state();
        let effect = state.dispatch(&data, Action::AddFilter);
        assert_eq!(effect, Effect::Controls);
        assert_eq!(state.pending_filters.len(), 1);
        assert!(state.options.filters.is_empty());
        // Staged filters never affect the rendered row set
        assert_eq!(filter::apply(&data, &state.options.filters).len(), 3);
    }

    #[test]
    fn test_filter_ids_are_unique_under_rapid_additions() {
        let data = dataset();
        let mut state = state();
        for _ in 0..100 {
            state.dispatch(&data, Action::AddFilter);
        }
        let mut ids: Vec<u64> = state.pending_filters.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_update_filter_returns_no_effect() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        let id = state.pending_filters[0].id;

        let effect = state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Value("25".to_string()),
            },
        );
        // Focus preservation: edits must not force a controls re-render
        assert_eq!(effect, Effect::None);
        assert_eq!(state.pending_filters[0].value, "25");
        assert!(state.options.filters.is_empty());
    }

    #[test]
    fn test_apply_pending_deep_copies() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        let id = state.pending_filters[0].id;
        state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Field("x".to_string()),
            },
        );
        state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Operator(FilterOp::Gt),
            },
        );
        state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Value("2".to_string()),
            },
        );

        let effect = state.dispatch(&data, Action::ApplyPendingFilters);
        assert_eq!(effect, Effect::ChartAndControls);
        assert_eq!(state.options.filters.len(), 1);
        assert_eq!(filter::apply(&data, &state.options.filters).len(), 2);

        // Later staged edits must not leak into the applied set
        state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Value("999".to_string()),
            },
        );
        assert_eq!(state.options.filters[0].value, "2");
    }

    #[test]
    fn test_remove_staged_filter_is_not_live() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        let id = state.pending_filters[0].id;

        let effect = state.dispatch(&data, Action::RemoveFilter { id });
        assert_eq!(effect, Effect::Controls);
        assert!(state.pending_filters.is_empty());
    }

    #[test]
    fn test_remove_applied_filter_is_live() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        let id = state.pending_filters[0].id;
        state.dispatch(&data, Action::ApplyPendingFilters);

        let effect = state.dispatch(&data, Action::RemoveFilter { id });
        assert_eq!(effect, Effect::ChartAndControls);
        assert!(state.pending_filters.is_empty());
        assert!(state.options.filters.is_empty());
    }

    #[test]
    fn test_clear_all_resets_both_buffers() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        state.dispatch(&data, Action::ApplyPendingFilters);
        state.dispatch(&data, Action::AddFilter);

        let effect = state.dispatch(&data, Action::ClearAllFilters);
        assert_eq!(effect, Effect::ChartAndControls);
        assert!(state.pending_filters.is_empty());
        assert!(state.options.filters.is_empty());
    }

    #[test]
    fn test_first_toggle_materializes_sentinel() {
        let data = dataset();
        let mut state = state();
        assert!(state.options.visible_groups.is_none());

        let effect = state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "b".to_string(),
            },
        );
        assert_eq!(effect, Effect::Chart);
        assert_eq!(
            state.options.visible_groups,
            Some(vec!["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_toggle_back_restores_membership() {
        let data = dataset();
        let mut state = state();
        state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "b".to_string(),
            },
        );
        state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "b".to_string(),
            },
        );
        let visible = state.options.visible_groups.clone().unwrap();
        assert!(visible.contains(&"b".to_string()));
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_toggles_do_not_touch_pending_filters() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "a".to_string(),
            },
        );
        state.dispatch(
            &data,
            Action::ChangeChartType {
                chart_type: ChartType::Histogram,
            },
        );
        assert_eq!(state.pending_filters.len(), 1);
    }

    #[test]
    fn test_change_group_field_resets_visibility() {
        let data = dataset();
        let mut state = state();
        state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "a".to_string(),
            },
        );
        assert!(state.options.visible_groups.is_some());
        state.dispatch(&data, Action::ChangeGroupField { field: None });
        assert!(state.options.visible_groups.is_none());
    }

    #[test]
    fn test_change_histogram_field_suggests_bins() {
        let data = dataset();
        let mut state = state();
        state.dispatch(
            &data,
            Action::ChangeHistogramField {
                field: "x".to_string(),
            },
        );
        assert_eq!(state.options.histogram_field, Some("x".to_string()));
        // 3 numeric values -> Sturges clamped to the floor of 5
        assert_eq!(state.options.bin_count, Some(5));
    }

    #[test]
    fn test_snapshot_round_trips() {
        let data = dataset();
        let mut state = state();
        state.dispatch(&data, Action::AddFilter);
        let id = state.pending_filters[0].id;
        state.dispatch(
            &data,
            Action::UpdateFilter {
                id,
                patch: FilterPatch::Value("1".to_string()),
            },
        );
        state.dispatch(&data, Action::ApplyPendingFilters);
        state.dispatch(
            &data,
            Action::ToggleGroup {
                group: "c".to_string(),
            },
        );

        let snapshot = state.snapshot().unwrap();
        let restored: ChartOptions = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(restored, state.options);

        // A state rebuilt from the snapshot presents the saved filters as
        // pending, ready for further editing
        let reopened = ChartState::new(restored);
        assert_eq!(reopened.pending_filters, state.options.filters);
    }
}
