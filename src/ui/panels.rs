use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::{export, loader};
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    // The table outlives this frame's mutations of `state`.
    let dataset = Arc::clone(&state.dataset);

    // ---- Country selector ----
    ui.strong("Select a Country");
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("country")
        .selected_text(state.selection.country.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for country in &dataset.countries {
                if ui
                    .selectable_label(state.selection.country == *country, country)
                    .clicked()
                {
                    chosen = Some(country.clone());
                }
            }
        });
    if let Some(country) = chosen {
        state.select_country(&country);
    }
    ui.add_space(8.0);

    // ---- Year range ----
    ui.strong("Select Year Range");
    match dataset.year_bounds {
        Some((lo, hi)) => {
            let mut start = state.selection.years.start;
            let mut end = state.selection.years.end;
            let from = ui.add(egui::Slider::new(&mut start, lo..=hi).text("from"));
            let to = ui.add(egui::Slider::new(&mut end, lo..=hi).text("to"));
            if from.changed() || to.changed() {
                state.select_years(start, end);
            }
            ui.label(
                RichText::new(format!(
                    "{} of {} rows for this country",
                    state.view.rows.len(),
                    dataset.rows_for_country(&state.selection.country)
                ))
                .weak(),
            );
        }
        None => {
            ui.label("No years in the table.");
        }
    }

    ui.add_space(16.0);
    ui.separator();

    // ---- Download ----
    ui.strong("Download Dataset");
    if ui.button("📥 Download Data").clicked() {
        save_csv_dialog(state);
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
            if ui.button("Export CSV…").clicked() {
                save_csv_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows, {} countries; {} shown for {} ({})",
            state.dataset.len(),
            state.dataset.countries.len(),
            state.view.rows.len(),
            state.selection.country,
            state.selection.years
        ));

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(msg);
            }
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open climate debt table")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                state.set_dataset(dataset);
                state.status = Some(Status::Info(format!("Opened {}", path.display())));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }
}

/// Ask where to save the full table and write it as CSV.
pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download dataset")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::export_csv(&state.dataset, &path) {
            Ok(()) => {
                state.status = Some(Status::Info(format!("Saved {}", path.display())));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }
}
