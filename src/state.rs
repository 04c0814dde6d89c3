use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::data::aggregate::Metric;
use crate::data::cache::DatasetCache;
use crate::data::export::export_to_path;
use crate::data::filter::{InvestorMatch, YearFilter};
use crate::data::model::{Dataset, FundingRecord};
use crate::views::{InvestorView, OverallView, StartupView};

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Overall,
    Startup,
    Investor,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Overall, ViewMode::Startup, ViewMode::Investor];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Overall => "Overall Analysis",
            ViewMode::Startup => "Startup Analysis",
            ViewMode::Investor => "Investor Analysis",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Parsed datasets by source identity.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<Dataset>>,

    /// Path the current dataset came from.
    pub source: Option<PathBuf>,

    pub view_mode: ViewMode,

    /// Overall page selections.
    pub year: YearFilter,
    pub trend_metric: Metric,

    /// Detail page selections; analysis runs only on request.
    pub selected_startup: Option<String>,
    pub selected_investor: Option<String>,
    pub investor_match: InvestorMatch,

    /// Entries shown in top-N rankings.
    pub top_n: usize,

    /// Currency unit label appended to amounts.
    pub unit: String,

    /// Computed view bundles for the current selections.
    pub overall: Option<OverallView>,
    pub startup_view: Option<StartupView>,
    pub investor_view: Option<InvestorView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(10, "Cr")
    }
}

impl AppState {
    pub fn new(top_n: usize, unit: impl Into<String>) -> Self {
        Self {
            cache: DatasetCache::new(),
            dataset: None,
            source: None,
            view_mode: ViewMode::default(),
            year: YearFilter::All,
            trend_metric: Metric::Sum,
            selected_startup: None,
            selected_investor: None,
            investor_match: InvestorMatch::default(),
            top_n: top_n.max(1),
            unit: unit.into(),
            overall: None,
            startup_view: None,
            investor_view: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and make it current.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let dataset = self
            .cache
            .get_or_load(path)
            .with_context(|| format!("loading {}", path.display()))?;
        log::debug!("{} dataset(s) cached", self.cache.len());
        self.source = Some(path.to_path_buf());
        self.set_dataset(dataset);
        Ok(())
    }

    /// Drop the cached copy of the current source and load it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    /// Like [`load_path`](Self::load_path), reporting failure in the status line.
    pub fn open(&mut self, path: &Path) {
        if let Err(e) = self.load_path(path) {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Ingest a dataset: reset selections and compute the overall view.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if let YearFilter::Year(y) = self.year {
            if !dataset.years.contains(&y) {
                self.year = YearFilter::All;
            }
        }
        self.selected_startup = dataset.startups.first().cloned();
        self.selected_investor = dataset.investors.first().cloned();
        self.startup_view = None;
        self.investor_view = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_overall();
    }

    /// Recompute the overall view after a selection change.
    pub fn refresh_overall(&mut self) {
        self.overall = self
            .dataset
            .as_ref()
            .map(|ds| OverallView::build(ds, self.year, self.trend_metric, self.top_n));
    }

    pub fn set_year(&mut self, year: YearFilter) {
        if self.year != year {
            self.year = year;
            self.refresh_overall();
        }
    }

    pub fn set_trend_metric(&mut self, metric: Metric) {
        if self.trend_metric != metric {
            self.trend_metric = metric;
            self.refresh_overall();
        }
    }

    /// Build the startup page for the selected startup.
    pub fn analyze_startup(&mut self) {
        if let (Some(ds), Some(name)) = (&self.dataset, &self.selected_startup) {
            self.startup_view = Some(StartupView::build(ds, name));
        }
    }

    /// Build the investor page for the selected investor.
    pub fn analyze_investor(&mut self) {
        if let (Some(ds), Some(name)) = (&self.dataset, &self.selected_investor) {
            self.investor_view = Some(InvestorView::build(
                ds,
                name,
                self.investor_match,
                self.top_n,
            ));
        }
    }

    /// Change the match mode; an investor page already on screen is rebuilt.
    pub fn set_investor_match(&mut self, mode: InvestorMatch) {
        if self.investor_match == mode {
            return;
        }
        self.investor_match = mode;
        let shown = self.investor_view.as_ref().map(|v| v.investor.clone());
        if let (Some(ds), Some(investor)) = (&self.dataset, shown) {
            self.investor_view = Some(InvestorView::build(ds, &investor, mode, self.top_n));
        }
    }

    /// Records behind the page currently shown, if it has been built.
    pub fn active_records(&self) -> Option<&[FundingRecord]> {
        match self.view_mode {
            ViewMode::Overall => self.overall.as_ref().map(|v| v.records.as_slice()),
            ViewMode::Startup => self.startup_view.as_ref().map(|v| v.records.as_slice()),
            ViewMode::Investor => self.investor_view.as_ref().map(|v| v.records.as_slice()),
        }
    }

    /// Write the active page's records to `path`.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let records = self
            .active_records()
            .context("nothing to export for the current view")?;
        export_to_path(records, path).with_context(|| format!("exporting to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::new(10, "Cr");
        state.set_dataset(Arc::new(small_dataset()));
        state
    }

    #[test]
    fn loading_selects_first_names_and_builds_overall() {
        let state = loaded();
        assert_eq!(state.selected_startup.as_deref(), Some("X"));
        assert_eq!(state.selected_investor.as_deref(), Some("Acme Ventures"));
        assert_eq!(state.overall.as_ref().unwrap().summary.total, 35.0);
        assert!(state.startup_view.is_none());
    }

    #[test]
    fn year_and_metric_changes_recompute_overall() {
        let mut state = loaded();
        state.set_year(YearFilter::Year(2019));
        assert_eq!(state.overall.as_ref().unwrap().summary.total, 30.0);

        state.set_trend_metric(Metric::Count);
        let overall = state.overall.as_ref().unwrap();
        assert_eq!(overall.metric, Metric::Count);
        assert_eq!(overall.trend[0].value, 2.0);
    }

    #[test]
    fn analysis_runs_only_on_request() {
        let mut state = loaded();
        state.selected_startup = Some("Y".to_string());
        state.analyze_startup();
        assert_eq!(state.startup_view.as_ref().unwrap().records.len(), 1);

        state.selected_investor = Some("Acme".to_string());
        state.analyze_investor();
        assert_eq!(state.investor_view.as_ref().unwrap().records.len(), 2);

        state.set_investor_match(InvestorMatch::Exact);
        assert!(state.investor_view.as_ref().unwrap().is_empty());
    }

    #[test]
    fn vanished_startup_yields_empty_page() {
        let mut state = loaded();
        state.selected_startup = Some("Gone".to_string());
        state.analyze_startup();
        assert!(state.startup_view.as_ref().unwrap().is_empty());
    }

    #[test]
    fn active_records_follow_view_mode() {
        let mut state = loaded();
        assert_eq!(state.active_records().map(<[_]>::len), Some(3));
        state.view_mode = ViewMode::Startup;
        assert!(state.active_records().is_none());
        state.analyze_startup();
        assert_eq!(state.active_records().map(<[_]>::len), Some(2));
    }

    #[test]
    fn export_writes_active_records() {
        let mut state = loaded();
        state.set_year(YearFilter::Year(2020));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(state.export_to(&path).unwrap(), 1);
    }

    #[test]
    fn reload_picks_up_new_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funding.csv");
        let header = "date,startup,investors,vertical,city,round,amount\n";
        std::fs::write(&path, format!("{header}2021-02-03,Z,Q,AI,Pune,Seed,4\n")).unwrap();

        let mut state = AppState::default();
        state.open(&path);
        std::fs::write(
            &path,
            format!("{header}2021-02-03,Z,Q,AI,Pune,Seed,4\n2021-03-03,W,Q,AI,Pune,Seed,6\n"),
        )
        .unwrap();
        state.reload();

        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);
        assert_eq!(state.overall.as_ref().unwrap().summary.total, 10.0);
    }

    #[test]
    fn failed_open_sets_status_message() {
        let mut state = AppState::default();
        state.open(Path::new("/nonexistent/funding.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error: loading"));
    }

    #[test]
    fn open_reads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funding.csv");
        std::fs::write(
            &path,
            "date,startup,investors,vertical,city,round,amount\n2021-02-03,Z,Q,AI,Pune,Seed,4\n",
        )
        .unwrap();

        let mut state = AppState::default();
        state.open(&path);
        assert!(state.status_message.is_none());
        assert_eq!(state.dataset.as_ref().unwrap().len(), 1);
        assert_eq!(state.source.as_deref(), Some(path.as_path()));
    }
}
