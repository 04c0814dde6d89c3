use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::model::FundingRecord;

/// Label → value pairs. Ordered by label as produced, by value once ranked.
pub type Series = Vec<(String, f64)>;

// ---------------------------------------------------------------------------
// Metric and grouping key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Sum of `amount`.
    #[default]
    Sum,
    /// Number of records.
    Count,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Sum, Metric::Count];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Sum => write!(f, "Total Amount"),
            Metric::Count => write!(f, "Funding Count"),
        }
    }
}

/// Text columns records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Startup,
    City,
    Vertical,
    Round,
}

impl GroupKey {
    fn value_of(self, record: &FundingRecord) -> Option<&str> {
        match self {
            GroupKey::Startup => record.startup.as_deref(),
            GroupKey::City => record.city.as_deref(),
            GroupKey::Vertical => record.vertical.as_deref(),
            GroupKey::Round => record.round.as_deref(),
        }
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, amount: f64) {
        self.sum += amount;
        self.count += 1;
    }

    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sum => self.sum,
            Metric::Count => self.count as f64,
        }
    }
}

fn accumulate<K: Ord>(
    pairs: impl IntoIterator<Item = (K, f64)>,
) -> BTreeMap<K, Accumulator> {
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for (key, amount) in pairs {
        groups.entry(key).or_default().add(amount);
    }
    groups
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Aggregate `amount` per distinct key value. Null keys are skipped.
pub fn aggregate_by(records: &[&FundingRecord], key: GroupKey, metric: Metric) -> Series {
    accumulate(
        records
            .iter()
            .filter_map(|r| key.value_of(r).map(|k| (k, r.amount))),
    )
    .into_iter()
    .map(|(k, acc)| (k.to_string(), acc.value(metric)))
    .collect()
}

/// One (record, investor) pair of an exploded investors field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplodedInvestorRow<'a> {
    pub record: &'a FundingRecord,
    pub investor: &'a str,
}

impl ExplodedInvestorRow<'_> {
    /// The full amount of the round; it is not split between investors.
    pub fn amount(&self) -> f64 {
        self.record.amount
    }
}

/// One row per investor named in each record.
pub fn explode_investors<'a>(records: &[&'a FundingRecord]) -> Vec<ExplodedInvestorRow<'a>> {
    records
        .iter()
        .flat_map(|&record| {
            record
                .investor_names()
                .map(move |investor| ExplodedInvestorRow { record, investor })
        })
        .collect()
}

/// Aggregate per individual investor over the exploded rows.
pub fn aggregate_by_investor(records: &[&FundingRecord], metric: Metric) -> Series {
    accumulate(
        explode_investors(records)
            .into_iter()
            .map(|row| (row.investor, row.amount())),
    )
    .into_iter()
    .map(|(k, acc)| (k.to_string(), acc.value(metric)))
    .collect()
}

/// The `n` largest entries, descending. The sort is stable, so equal values
/// keep their incoming (label) order.
pub fn top_n(mut series: Series, n: usize) -> Series {
    series.sort_by(|a, b| b.1.total_cmp(&a.1));
    series.truncate(n);
    series
}

/// Share of the total for each entry, in percent. All zero when the total is.
pub fn percentages(series: &Series) -> Vec<f64> {
    let total: f64 = series.iter().map(|(_, v)| v).sum();
    series
        .iter()
        .map(|(_, v)| if total > 0.0 { v / total * 100.0 } else { 0.0 })
        .collect()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One (year, month) bucket of a trend line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBucket {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

impl TimeBucket {
    /// Display label, month first: `3-2019`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.month, self.year)
    }
}

/// Chronological (year, month) buckets. Undated records are left out.
pub fn time_buckets(records: &[&FundingRecord], metric: Metric) -> Vec<TimeBucket> {
    accumulate(
        records
            .iter()
            .filter_map(|r| Some(((r.year?, r.month?), r.amount))),
    )
    .into_iter()
    .map(|((year, month), acc)| TimeBucket {
        year,
        month,
        value: acc.value(metric),
    })
    .collect()
}

/// Chronological per-year aggregate. Undated records are left out.
pub fn yearly(records: &[&FundingRecord], metric: Metric) -> Vec<(i32, f64)> {
    accumulate(records.iter().filter_map(|r| Some((r.year?, r.amount))))
        .into_iter()
        .map(|(year, acc)| (year, acc.value(metric)))
        .collect()
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers for a filtered record set.
///
/// `top_startup` and `average_per_startup` are `None` when no record names a
/// startup, since neither a maximum nor a mean exists then.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverallSummary {
    pub total: f64,
    pub top_startup: Option<(String, f64)>,
    pub average_per_startup: Option<f64>,
    pub distinct_startups: usize,
}

pub fn summarize(records: &[&FundingRecord]) -> OverallSummary {
    let total = records.iter().map(|r| r.amount).sum();
    let per_startup = aggregate_by(records, GroupKey::Startup, Metric::Sum);

    let mut top_startup: Option<&(String, f64)> = None;
    for entry in &per_startup {
        if top_startup.map_or(true, |best| entry.1 > best.1) {
            top_startup = Some(entry);
        }
    }

    let average_per_startup = if per_startup.is_empty() {
        None
    } else {
        Some(per_startup.iter().map(|(_, v)| v).sum::<f64>() / per_startup.len() as f64)
    };

    OverallSummary {
        total,
        top_startup: top_startup.cloned(),
        average_per_startup,
        distinct_startups: per_startup.len(),
    }
}

/// The `n` most recent records, newest first. Undated records sort last and
/// ties keep their original order.
pub fn recent<'a>(records: &[&'a FundingRecord], n: usize) -> Vec<&'a FundingRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.truncate(n);
    sorted
}
