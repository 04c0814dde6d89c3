use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::Series;
use crate::data::model::FundingRecord;
use crate::ui::format;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Record tables
// ---------------------------------------------------------------------------

/// A displayable record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordColumn {
    Date,
    Startup,
    Investors,
    Vertical,
    City,
    Round,
    Amount,
}

impl RecordColumn {
    /// Columns of the startup page's recent-rounds table.
    pub const STARTUP_ROUNDS: [RecordColumn; 6] = [
        RecordColumn::Date,
        RecordColumn::Investors,
        RecordColumn::Vertical,
        RecordColumn::City,
        RecordColumn::Round,
        RecordColumn::Amount,
    ];

    /// Columns of the investor page's recent-investments table.
    pub const INVESTOR_DEALS: [RecordColumn; 6] = [
        RecordColumn::Date,
        RecordColumn::Startup,
        RecordColumn::Vertical,
        RecordColumn::City,
        RecordColumn::Round,
        RecordColumn::Amount,
    ];

    pub fn header(self) -> &'static str {
        match self {
            RecordColumn::Date => "Date",
            RecordColumn::Startup => "Startup",
            RecordColumn::Investors => "Investors",
            RecordColumn::Vertical => "Vertical",
            RecordColumn::City => "City",
            RecordColumn::Round => "Round",
            RecordColumn::Amount => "Amount",
        }
    }

    pub fn cell(self, rec: &FundingRecord, unit: &str) -> String {
        match self {
            RecordColumn::Date => format::date(rec.date),
            RecordColumn::Startup => format::text(rec.startup.as_deref()).to_string(),
            RecordColumn::Investors => format::text(rec.investors.as_deref()).to_string(),
            RecordColumn::Vertical => format::text(rec.vertical.as_deref()).to_string(),
            RecordColumn::City => format::text(rec.city.as_deref()).to_string(),
            RecordColumn::Round => format::text(rec.round.as_deref()).to_string(),
            RecordColumn::Amount => format::exact_amount(rec.amount, unit),
        }
    }
}

pub fn records_table(
    ui: &mut Ui,
    id: &str,
    records: &[FundingRecord],
    columns: &[RecordColumn],
    unit: &str,
) {
    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center));
        for _ in columns {
            table = table.column(Column::auto().at_least(70.0).clip(true));
        }

        table
            .header(ROW_HEIGHT, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.header());
                    });
                }
            })
            .body(|mut body| {
                for rec in records {
                    body.row(ROW_HEIGHT, |mut row| {
                        for col in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(col.cell(rec, unit));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Series tables
// ---------------------------------------------------------------------------

/// Two-column label / amount table.
pub fn series_table(
    ui: &mut Ui,
    id: &str,
    headers: (&str, &str),
    series: &Series,
    unit: &str,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(headers.0);
                });
                header.col(|ui: &mut Ui| {
                    ui.strong(headers.1);
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, series.len(), |mut row| {
                    let (label, value) = &series[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(label.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format::exact_amount(*value, unit));
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn cells_render_missing_values_as_empty() {
        let rec = record("Alpha", 2019, 3, 12.5, None);
        assert_eq!(RecordColumn::Date.cell(&rec, "Cr"), "2019-03-01");
        assert_eq!(RecordColumn::Startup.cell(&rec, "Cr"), "Alpha");
        assert_eq!(RecordColumn::Investors.cell(&rec, "Cr"), "");
        assert_eq!(RecordColumn::Amount.cell(&rec, "Cr"), "12.5 Cr");
    }

    #[test]
    fn detail_tables_omit_the_filtered_column() {
        assert!(!RecordColumn::STARTUP_ROUNDS.contains(&RecordColumn::Startup));
        assert!(!RecordColumn::INVESTOR_DEALS.contains(&RecordColumn::Investors));
    }
}
