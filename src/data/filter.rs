use std::fmt;

use super::model::FundingRecord;

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Year selection for the overall view. `All` keeps every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "All"),
            YearFilter::Year(y) => write!(f, "{y}"),
        }
    }
}

/// How an investor name is matched against a record's investors field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvestorMatch {
    /// Case-sensitive substring of the raw comma-joined text. Loose: "Acme"
    /// also matches "NotAcmeReally".
    #[default]
    Substring,
    /// Exact equality with one of the trimmed, split names.
    Exact,
}

impl InvestorMatch {
    pub fn matches(self, record: &FundingRecord, name: &str) -> bool {
        match self {
            InvestorMatch::Substring => record
                .investors
                .as_deref()
                .is_some_and(|text| text.contains(name)),
            InvestorMatch::Exact => record.investor_names().any(|n| n == name),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Records from the selected year, or all of them.
pub fn filter_by_year<'a>(
    records: &[&'a FundingRecord],
    year: YearFilter,
) -> Vec<&'a FundingRecord> {
    match year {
        YearFilter::All => records.to_vec(),
        YearFilter::Year(y) => records
            .iter()
            .copied()
            .filter(|r| r.year == Some(y))
            .collect(),
    }
}

/// Records whose startup name equals `name` exactly.
pub fn filter_by_startup<'a>(records: &[&'a FundingRecord], name: &str) -> Vec<&'a FundingRecord> {
    records
        .iter()
        .copied()
        .filter(|r| r.startup.as_deref() == Some(name))
        .collect()
}

/// Records naming `investor`, under the given match mode.
pub fn filter_by_investor<'a>(
    records: &[&'a FundingRecord],
    investor: &str,
    mode: InvestorMatch,
) -> Vec<&'a FundingRecord> {
    records
        .iter()
        .copied()
        .filter(|r| mode.matches(r, investor))
        .collect()
}
