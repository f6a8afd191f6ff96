// ── Analytics store ──
//
// One slice per report family. Any filter change marks every loaded
// report stale, since all of them are derived from the same criteria.

use std::collections::BTreeMap;

use hot22_api::AnalyticsReport;
use strum::IntoEnumIterator;

use crate::filters::{AnalyticsFilter, AnalyticsFilters};
use crate::query::QueryKey;
use crate::store::{FetchSlice, Reducer, RequestToken, Settled, StaleTracking};

pub type ReportSlice = FetchSlice<Option<serde_json::Value>>;

#[derive(Debug, Clone)]
pub struct AnalyticsState {
    pub filters: AnalyticsFilters,
    pub reports: BTreeMap<AnalyticsReport, ReportSlice>,
    pub active: AnalyticsReport,
}

impl Default for AnalyticsState {
    fn default() -> Self {
        Self {
            filters: AnalyticsFilters::default(),
            reports: AnalyticsReport::iter()
                .map(|r| (r, ReportSlice::default()))
                .collect(),
            active: AnalyticsReport::Revenue,
        }
    }
}

impl AnalyticsState {
    pub fn report(&self, report: AnalyticsReport) -> Option<&ReportSlice> {
        self.reports.get(&report)
    }

    fn slice_mut(&mut self, report: AnalyticsReport) -> &mut ReportSlice {
        self.reports.entry(report).or_default()
    }
}

#[derive(Debug, Clone)]
pub enum AnalyticsAction {
    SetFilter(AnalyticsFilter),
    ResetFilters,
    SetActive(AnalyticsReport),
    ReportPending(AnalyticsReport, RequestToken),
    ReportSettled(AnalyticsReport, RequestToken, Settled<serde_json::Value>),
}

impl Reducer for AnalyticsState {
    type Action = AnalyticsAction;

    fn reduce(&mut self, action: AnalyticsAction) {
        match action {
            AnalyticsAction::SetFilter(change) => {
                self.filters.apply(change);
                for slice in self.reports.values_mut() {
                    slice.stale = slice.last_updated.is_some();
                }
            }
            AnalyticsAction::ResetFilters => {
                self.filters = AnalyticsFilters::default();
                for slice in self.reports.values_mut() {
                    slice.stale = slice.last_updated.is_some();
                }
            }
            AnalyticsAction::SetActive(report) => self.active = report,
            AnalyticsAction::ReportPending(report, token) => self.slice_mut(report).begin(token),
            AnalyticsAction::ReportSettled(report, token, settled) => {
                self.slice_mut(report)
                    .settle(token, settled, |v| Some(v.clone()));
            }
        }
    }
}

impl StaleTracking for AnalyticsState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let mut changed = false;
        for slice in self.reports.values_mut() {
            changed |= slice.mark_stale_if(keys);
        }
        changed
    }
}
