use eframe::egui::{self, RichText, Ui};

use crate::color::ColorMap;
use crate::data::aggregate::{Metric, Series};
use crate::state::{AppState, ViewMode};
use crate::ui::format;
use crate::ui::plot::{bar_chart, line_chart, pie_chart};
use crate::ui::tables::{records_table, series_table, RecordColumn};

// ---------------------------------------------------------------------------
// Central panel – the active analysis page
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a funding dataset to begin  (File → Open…)");
        });
        return;
    };
    if dataset.is_empty() {
        placeholder(ui, "The dataset contains no records with a usable amount.");
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.view_mode {
            ViewMode::Overall => overall_page(ui, state),
            ViewMode::Startup => startup_page(ui, state),
            ViewMode::Investor => investor_page(ui, state),
        });
}

fn metric_card(ui: &mut Ui, title: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(title).weak());
            ui.label(RichText::new(value).size(22.0).strong());
        });
    });
}

fn placeholder(ui: &mut Ui, message: &str) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(message).italics().weak());
    });
}

fn year_labels(yearly: &[(i32, f64)]) -> (Vec<String>, Vec<f64>) {
    yearly.iter().map(|(y, v)| (y.to_string(), *v)).unzip()
}

fn colors_for(series: &Series) -> ColorMap {
    ColorMap::new(series.iter().map(|(label, _)| label.as_str()))
}

// ---------------------------------------------------------------------------
// Overall analysis
// ---------------------------------------------------------------------------

fn overall_page(ui: &mut Ui, state: &mut AppState) {
    let mut metric = state.trend_metric;
    let unit = state.unit.as_str();
    let top = state.top_n;

    let Some(view) = &state.overall else {
        return;
    };

    ui.heading(format!("Overall Startup Funding Analysis  ({})", view.year));
    ui.add_space(8.0);

    let summary = &view.summary;
    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Funding", format::rounded_amount(summary.total, unit));
        metric_card(
            &mut cols[1],
            "Max Funding by Startup",
            summary
                .top_startup
                .as_ref()
                .map_or_else(
                    || format::NOT_AVAILABLE.to_string(),
                    |(_, v)| format::exact_amount(*v, unit),
                ),
        );
        metric_card(
            &mut cols[2],
            "Avg Funding per Startup",
            format::optional_rounded_amount(summary.average_per_startup, unit),
        );
        metric_card(&mut cols[3], "Unique Startups", summary.distinct_startups.to_string());
    });
    if let Some((name, _)) = &summary.top_startup {
        ui.label(RichText::new(format!("Top funded startup: {name}")).weak());
    }

    ui.add_space(12.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Month-on-Month Funding Trend");
        egui::ComboBox::from_id_salt("trend_metric")
            .selected_text(metric.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for m in Metric::ALL {
                    ui.selectable_value(&mut metric, m, m.to_string());
                }
            });
    });
    let (labels, values): (Vec<String>, Vec<f64>) =
        view.trend.iter().map(|b| (b.label(), b.value)).unzip();
    line_chart(ui, "trend", labels, &values, &view.metric.to_string());

    ui.add_space(12.0);
    ui.strong(format!("Top {top} Startups by Total Funding"));
    bar_chart(ui, "top_startups", &view.top_startups, None);

    ui.add_space(12.0);
    ui.strong(format!("Top {top} Investors by Total Investment"));
    bar_chart(ui, "top_investors", &view.top_investors, None);

    ui.add_space(12.0);
    ui.strong(format!("Top {top} Cities by Total Funding"));
    bar_chart(ui, "top_cities", &view.top_cities, None);

    ui.add_space(8.0);
    ui.label(
        RichText::new(format!(
            "{} records in this selection. Use File → Export filtered CSV… to download them.",
            view.records.len()
        ))
        .weak(),
    );

    if metric != state.trend_metric {
        state.set_trend_metric(metric);
    }
}

// ---------------------------------------------------------------------------
// Startup analysis
// ---------------------------------------------------------------------------

fn startup_page(ui: &mut Ui, state: &AppState) {
    let unit = state.unit.as_str();
    let Some(view) = &state.startup_view else {
        placeholder(ui, "Pick a startup in the side panel and press “Analyze Startup”.");
        return;
    };

    ui.heading(format!("Detailed Analysis for Startup: {}", view.startup));
    if view.is_empty() {
        placeholder(ui, "No funding rounds recorded for this startup.");
        return;
    }

    ui.add_space(8.0);
    ui.strong("Recent Funding Rounds");
    records_table(ui, "startup_recent", &view.recent, &RecordColumn::STARTUP_ROUNDS, unit);

    ui.add_space(12.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Funding Over Time");
        let (labels, values) = year_labels(&view.yearly);
        line_chart(&mut cols[0], "startup_yearly", labels, &values, unit);

        cols[1].strong("Funding by Round");
        let colors = colors_for(&view.by_round);
        bar_chart(&mut cols[1], "startup_rounds", &view.by_round, Some(&colors));
    });

    ui.add_space(12.0);
    ui.strong("Investor Contributions");
    bar_chart(ui, "startup_investors", &view.investor_contributions, None);
    series_table(
        ui,
        "startup_investor_table",
        ("Investor", "Total Investment"),
        &view.investor_contributions,
        unit,
    );
}

// ---------------------------------------------------------------------------
// Investor analysis
// ---------------------------------------------------------------------------

fn investor_page(ui: &mut Ui, state: &AppState) {
    let unit = state.unit.as_str();
    let top = state.top_n;
    let Some(view) = &state.investor_view else {
        placeholder(ui, "Pick an investor in the side panel and press “Analyze Investor”.");
        return;
    };

    ui.heading(format!("Investor Analysis: {}", view.investor));
    if view.is_empty() {
        placeholder(ui, "No investments recorded for this investor.");
        return;
    }

    ui.add_space(8.0);
    ui.strong("Recent Investments");
    records_table(ui, "investor_recent", &view.recent, &RecordColumn::INVESTOR_DEALS, unit);

    ui.add_space(12.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Investments Over Time");
        let (labels, values) = year_labels(&view.yearly);
        line_chart(&mut cols[0], "investor_yearly", labels, &values, unit);

        cols[1].strong("Investments by Round");
        let colors = colors_for(&view.by_round);
        bar_chart(&mut cols[1], "investor_rounds", &view.by_round, Some(&colors));
    });

    ui.add_space(12.0);
    ui.strong(format!("Top {top} Startups Funded"));
    bar_chart(ui, "investor_startups", &view.top_startups, None);

    ui.add_space(12.0);
    ui.strong("Sector Distribution");
    pie_chart(
        ui,
        "investor_sectors",
        &view.sectors,
        &view.sector_shares,
        &colors_for(&view.sectors),
    );
}
