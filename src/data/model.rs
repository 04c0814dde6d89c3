use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// FundingRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single funding event.
///
/// Every text field is optional because the source data is patchy; only
/// `amount` is guaranteed, rows without a usable amount never get this far.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingRecord {
    pub date: Option<NaiveDate>,
    /// Calendar year of `date`.
    pub year: Option<i32>,
    /// Calendar month of `date` (1–12).
    pub month: Option<u32>,
    pub startup: Option<String>,
    /// Comma-separated investor names, exactly as they appear in the source.
    pub investors: Option<String>,
    pub vertical: Option<String>,
    pub city: Option<String>,
    pub round: Option<String>,
    pub amount: f64,
}

impl FundingRecord {
    /// A record with only a date and an amount; year and month are derived.
    pub fn new(date: Option<NaiveDate>, amount: f64) -> Self {
        FundingRecord {
            date,
            year: date.map(|d| d.year()),
            month: date.map(|d| d.month()),
            startup: None,
            investors: None,
            vertical: None,
            city: None,
            round: None,
            amount,
        }
    }

    /// Individual investor names: split on commas, trimmed, empties skipped.
    pub fn investor_names(&self) -> impl Iterator<Item = &str> {
        self.investors
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned dataset plus the selection lists the UI offers.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<FundingRecord>,
    /// Distinct years present, ascending.
    pub years: BTreeSet<i32>,
    /// Distinct startup names, ascending.
    pub startups: BTreeSet<String>,
    /// Distinct individual investor names across the whole table.
    pub investors: BTreeSet<String>,
    /// Rows seen in the source, before cleaning.
    pub rows_read: usize,
}

impl Dataset {
    /// Build selection indices from cleaned records.
    pub fn from_records(records: Vec<FundingRecord>, rows_read: usize) -> Self {
        let mut years = BTreeSet::new();
        let mut startups = BTreeSet::new();
        let mut investors = BTreeSet::new();

        for rec in &records {
            if let Some(year) = rec.year {
                years.insert(year);
            }
            if let Some(startup) = &rec.startup {
                startups.insert(startup.clone());
            }
            for name in rec.investor_names() {
                if !investors.contains(name) {
                    investors.insert(name.to_string());
                }
            }
        }

        Dataset {
            records,
            years,
            startups,
            investors,
            rows_read,
        }
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows the loader discarded for lack of a usable amount.
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.records.len())
    }

    /// Every record, as the starting point for filters.
    pub fn all(&self) -> Vec<&FundingRecord> {
        self.records.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn derives_year_and_month_from_date() {
        let rec = FundingRecord::new(date(2019, 3, 14), 1.0);
        assert_eq!(rec.year, Some(2019));
        assert_eq!(rec.month, Some(3));

        let undated = FundingRecord::new(None, 1.0);
        assert_eq!(undated.year, None);
        assert_eq!(undated.month, None);
    }

    #[test]
    fn investor_names_are_trimmed_and_skip_empties() {
        let rec = record("S", 2020, 1, 1.0, Some(" A,B ,, C "));
        let names: Vec<&str> = rec.investor_names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let none = record("S", 2020, 1, 1.0, None);
        assert_eq!(none.investor_names().count(), 0);
    }

    #[test]
    fn selection_indices_are_distinct_and_sorted() {
        let ds = small_dataset();
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2019, 2020]);
        assert_eq!(ds.startups.iter().cloned().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(
            ds.investors.iter().cloned().collect::<Vec<_>>(),
            vec!["Acme Ventures", "Beta Capital", "NotAcmeReally"]
        );
        assert_eq!(ds.rows_dropped(), 0);
    }
}
