//! Per-user filter state over a shared, immutable dataset.

use crate::filter::FilterSelection;
use crate::loader::Dataset;
use crate::reports::{build_dashboard, Dashboard};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One viewer's filter selection. Sessions share only the dataset handle.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
}

impl Session {
    /// Start with every observed year and severity selected.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = FilterSelection::all_observed(&dataset);
        Self { dataset, selection }
    }

    pub fn with_selection(dataset: Arc<Dataset>, selection: FilterSelection) -> Self {
        Self { dataset, selection }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_years(&mut self, years: impl IntoIterator<Item = i32>) {
        self.selection.years = years.into_iter().collect();
    }

    /// Ignored when the dataset has no severity column.
    pub fn set_severities(&mut self, severities: impl IntoIterator<Item = String>) {
        if self.selection.severities.is_some() {
            self.selection.severities = Some(severities.into_iter().collect::<BTreeSet<_>>());
        }
    }

    pub fn reset(&mut self) {
        self.selection = FilterSelection::all_observed(&self.dataset);
    }

    /// Recompute the full dashboard for the current selection.
    pub fn render(&self) -> Dashboard {
        build_dashboard(&self.dataset, &self.selection)
    }
}
