use std::sync::Arc;

use crate::analysis::correlation::CorrelationMatrix;
use crate::config::DashboardConfig;
use crate::data::filter::{Selection, YearRange};
use crate::data::model::ClimateDataset;
use crate::view::{DashboardView, render};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table; shared read-only.
    pub dataset: Arc<ClimateDataset>,

    /// Correlations of the whole table, computed once per dataset.
    pub correlation: CorrelationMatrix,

    /// Current country and year window.
    pub selection: Selection,

    /// View for `selection`, rebuilt only when the selection changes.
    pub view: DashboardView,

    /// Outcome of the last load or export, shown in the top bar.
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl AppState {
    pub fn new(config: DashboardConfig, dataset: ClimateDataset) -> Self {
        let dataset = Arc::new(dataset);
        let correlation = CorrelationMatrix::compute(&dataset.records);
        let selection = Selection::initial(&dataset, config.default_window());
        let view = render(&dataset, &correlation, &selection);
        Self {
            config,
            dataset,
            correlation,
            selection,
            view,
            status: None,
        }
    }

    /// Replace the table (File → Open…) and reset the selection.
    pub fn set_dataset(&mut self, dataset: ClimateDataset) {
        self.dataset = Arc::new(dataset);
        self.correlation = CorrelationMatrix::compute(&self.dataset.records);
        self.selection = Selection::initial(&self.dataset, self.config.default_window());
        self.view = render(&self.dataset, &self.correlation, &self.selection);
        self.status = None;
    }

    /// Apply a new selection; re-renders only when something changed.
    pub fn select(&mut self, selection: Selection) {
        if selection == self.selection {
            return;
        }
        self.selection = selection;
        self.view = render(&self.dataset, &self.correlation, &self.selection);
    }

    pub fn select_country(&mut self, country: &str) {
        let years = self.selection.years;
        self.select(Selection::new(country, years));
    }

    /// Set the year window, keeping `start <= end` by moving the other end.
    pub fn select_years(&mut self, start: i32, end: i32) {
        let years = if start > end {
            if start != self.selection.years.start {
                YearRange::new(start, start)
            } else {
                YearRange::new(end, end)
            }
        } else {
            YearRange::new(start, end)
        };
        let country = self.selection.country.clone();
        self.select(Selection::new(country, years));
    }
}
