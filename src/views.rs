use crate::data::aggregate::{
    aggregate_by, aggregate_by_investor, percentages, recent, summarize, time_buckets, top_n,
    yearly, GroupKey, Metric, OverallSummary, Series, TimeBucket,
};
use crate::data::filter::{
    filter_by_investor, filter_by_startup, filter_by_year, InvestorMatch, YearFilter,
};
use crate::data::model::{Dataset, FundingRecord};

/// Rows shown in the "recent rounds" tables.
pub const RECENT_ROWS: usize = 5;

fn owned(records: &[&FundingRecord]) -> Vec<FundingRecord> {
    records.iter().map(|r| (*r).clone()).collect()
}

// ---------------------------------------------------------------------------
// Overall market view
// ---------------------------------------------------------------------------

/// Everything the overall page draws for one (year, metric) selection.
#[derive(Debug, Clone)]
pub struct OverallView {
    pub year: YearFilter,
    pub metric: Metric,
    pub summary: OverallSummary,
    /// Month-on-month trend under `metric`.
    pub trend: Vec<TimeBucket>,
    pub top_startups: Series,
    pub top_investors: Series,
    pub top_cities: Series,
    /// The filtered records, kept for export.
    pub records: Vec<FundingRecord>,
}

impl OverallView {
    pub fn build(dataset: &Dataset, year: YearFilter, metric: Metric, top: usize) -> Self {
        let data = filter_by_year(&dataset.all(), year);

        OverallView {
            year,
            metric,
            summary: summarize(&data),
            trend: time_buckets(&data, metric),
            top_startups: top_n(aggregate_by(&data, GroupKey::Startup, Metric::Sum), top),
            top_investors: top_n(aggregate_by_investor(&data, Metric::Sum), top),
            top_cities: top_n(aggregate_by(&data, GroupKey::City, Metric::Sum), top),
            records: owned(&data),
        }
    }
}

// ---------------------------------------------------------------------------
// Startup detail view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StartupView {
    pub startup: String,
    pub recent: Vec<FundingRecord>,
    pub yearly: Vec<(i32, f64)>,
    pub by_round: Series,
    /// Every investor in the startup's rounds, largest first.
    pub investor_contributions: Series,
    pub records: Vec<FundingRecord>,
}

impl StartupView {
    pub fn build(dataset: &Dataset, startup: &str) -> Self {
        let data = filter_by_startup(&dataset.all(), startup);
        let contributions = aggregate_by_investor(&data, Metric::Sum);

        StartupView {
            startup: startup.to_string(),
            recent: owned(&recent(&data, RECENT_ROWS)),
            yearly: yearly(&data, Metric::Sum),
            by_round: aggregate_by(&data, GroupKey::Round, Metric::Sum),
            investor_contributions: top_n(contributions.clone(), contributions.len()),
            records: owned(&data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Investor detail view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct InvestorView {
    pub investor: String,
    pub mode: InvestorMatch,
    pub recent: Vec<FundingRecord>,
    pub yearly: Vec<(i32, f64)>,
    pub by_round: Series,
    pub top_startups: Series,
    /// Amount per vertical, in label order.
    pub sectors: Series,
    /// Percentage share of each entry in `sectors`.
    pub sector_shares: Vec<f64>,
    pub records: Vec<FundingRecord>,
}

impl InvestorView {
    pub fn build(dataset: &Dataset, investor: &str, mode: InvestorMatch, top: usize) -> Self {
        let data = filter_by_investor(&dataset.all(), investor, mode);
        let sectors = aggregate_by(&data, GroupKey::Vertical, Metric::Sum);

        InvestorView {
            investor: investor.to_string(),
            mode,
            recent: owned(&recent(&data, RECENT_ROWS)),
            yearly: yearly(&data, Metric::Sum),
            by_round: aggregate_by(&data, GroupKey::Round, Metric::Sum),
            top_startups: top_n(aggregate_by(&data, GroupKey::Startup, Metric::Sum), top),
            sector_shares: percentages(&sectors),
            sectors,
            records: owned(&data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    #[test]
    fn overall_view_for_all_years() {
        let ds = small_dataset();
        let view = OverallView::build(&ds, YearFilter::All, Metric::Sum, 10);

        assert_eq!(view.summary.total, 35.0);
        assert_eq!(view.records.len(), 3);
        assert_eq!(view.trend.len(), 2);
        assert_eq!(view.top_startups[0], ("Y".to_string(), 20.0));
        assert_eq!(view.top_investors[0], ("Beta Capital".to_string(), 30.0));
        assert_eq!(
            view.top_cities,
            vec![("Mumbai".to_string(), 20.0), ("Bengaluru".to_string(), 15.0)]
        );
    }

    #[test]
    fn overall_view_respects_year_and_metric() {
        let ds = small_dataset();
        let view = OverallView::build(&ds, YearFilter::Year(2020), Metric::Count, 1);

        assert_eq!(view.summary.total, 5.0);
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.trend[0].value, 1.0);
        assert_eq!(view.top_startups.len(), 1);
    }

    #[test]
    fn startup_view_collects_rounds_and_contributions() {
        let ds = small_dataset();
        let view = StartupView::build(&ds, "X");

        assert_eq!(view.records.len(), 2);
        assert_eq!(view.recent[0].year, Some(2020));
        assert_eq!(view.yearly, vec![(2019, 10.0), (2020, 5.0)]);
        assert_eq!(
            view.by_round,
            vec![("Seed".to_string(), 10.0), ("Series A".to_string(), 5.0)]
        );
        assert_eq!(
            view.investor_contributions,
            vec![
                ("Acme Ventures".to_string(), 10.0),
                ("Beta Capital".to_string(), 10.0),
                ("NotAcmeReally".to_string(), 5.0),
            ]
        );
    }

    #[test]
    fn unknown_startup_gives_empty_view() {
        let ds = small_dataset();
        let view = StartupView::build(&ds, "Ghost");
        assert!(view.is_empty());
        assert!(view.recent.is_empty());
        assert!(view.yearly.is_empty());
        assert!(view.investor_contributions.is_empty());
    }

    #[test]
    fn investor_view_uses_selected_match_mode() {
        let ds = small_dataset();

        let loose = InvestorView::build(&ds, "Acme", InvestorMatch::Substring, 10);
        assert_eq!(loose.records.len(), 2);
        assert_eq!(loose.top_startups, vec![("X".to_string(), 15.0)]);
        assert_eq!(loose.sectors, vec![("Fintech".to_string(), 15.0)]);
        assert_eq!(loose.sector_shares, vec![100.0]);

        let strict = InvestorView::build(&ds, "Acme", InvestorMatch::Exact, 10);
        assert!(strict.is_empty());
    }

    #[test]
    fn investor_view_sector_shares() {
        let ds = small_dataset();
        let view = InvestorView::build(&ds, "Beta Capital", InvestorMatch::Substring, 10);
        assert_eq!(
            view.sectors,
            vec![("Edtech".to_string(), 20.0), ("Fintech".to_string(), 10.0)]
        );
        let shares = &view.sector_shares;
        assert!((shares[0] - 200.0 / 3.0).abs() < 1e-9);
        assert!((shares[1] - 100.0 / 3.0).abs() < 1e-9);
    }
}
