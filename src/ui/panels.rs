use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::filter::{InvestorMatch, YearFilter};
use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – navigation and selections
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    for mode in ViewMode::ALL {
        ui.radio_value(&mut state.view_mode, mode, mode.label());
    }
    ui.separator();

    // Cheap Arc clone so the selection widgets can mutate `state`.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    match state.view_mode {
        ViewMode::Overall => {
            ui.strong("Filter by Year (Optional)");
            let mut year = state.year;
            egui::ComboBox::from_id_salt("year_filter")
                .selected_text(year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut year, YearFilter::All, "All");
                    for &y in &dataset.years {
                        ui.selectable_value(&mut year, YearFilter::Year(y), y.to_string());
                    }
                });
            state.set_year(year);
        }
        ViewMode::Startup => {
            ui.strong("Select Startup");
            let mut selected = state.selected_startup.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("startup_select")
                .selected_text(selected.as_str())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &dataset.startups {
                        ui.selectable_value(&mut selected, name.clone(), name.as_str());
                    }
                });
            if !selected.is_empty() {
                state.selected_startup = Some(selected);
            }
            ui.add_space(6.0);
            if ui.button("Analyze Startup").clicked() {
                state.analyze_startup();
            }
        }
        ViewMode::Investor => {
            ui.strong("Select Investor");
            let mut selected = state.selected_investor.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("investor_select")
                .selected_text(selected.as_str())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &dataset.investors {
                        ui.selectable_value(&mut selected, name.clone(), name.as_str());
                    }
                });
            if !selected.is_empty() {
                state.selected_investor = Some(selected);
            }

            let mut exact = state.investor_match == InvestorMatch::Exact;
            ui.checkbox(&mut exact, "Exact name match")
                .on_hover_text("Off: any record whose investors text contains the name.");
            state.set_investor_match(if exact {
                InvestorMatch::Exact
            } else {
                InvestorMatch::Substring
            });

            ui.add_space(6.0);
            if ui.button("Analyze Investor").clicked() {
                state.analyze_investor();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.active_records().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} dropped",
                ds.len(),
                ds.rows_dropped()
            ));
            if let Some(records) = state.active_records() {
                ui.separator();
                ui.label(format!("{} in view", records.len()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open funding data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(count) => {
                state.status_message = None;
                log::info!("Exported {count} rows");
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
