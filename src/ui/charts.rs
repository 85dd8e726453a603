use eframe::egui::{
    self, Align2, Color32, FontId, Rect, RichText, ScrollArea, Sense, Stroke, Ui, pos2, vec2,
};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::analysis::advisor::{Recommendation, Tier};
use crate::analysis::correlation::CorrelationMatrix;
use crate::color;
use crate::data::filter::YearRange;
use crate::data::model::{CountryRecord, Metric, YEAR_HEADER};
use crate::state::AppState;
use crate::view::{ChartKind, ChartSeries};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the whole dashboard from the cached view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = &state.view;
    let country = view.selection.country.as_str();
    let years = view.selection.years;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("🌍 Climate Debt Analyzer - 10 Years Analysis");
            ui.add_space(8.0);

            for pair in view.charts.chunks(2) {
                ui.columns(2, |cols: &mut [Ui]| {
                    for (col, series) in cols.iter_mut().zip(pair) {
                        metric_chart(col, series, country, years);
                    }
                });
                ui.add_space(8.0);
            }

            ui.separator();
            ui.heading("📊 Correlation Insights");
            correlation_heatmap(ui, &view.correlation);

            ui.add_space(8.0);
            ui.separator();
            ui.heading("📌 Policy Recommendations");
            recommendation_box(ui, &view.recommendation);

            ui.add_space(8.0);
            egui::CollapsingHeader::new(format!("Filtered rows ({})", view.rows.len()))
                .default_open(false)
                .show(ui, |ui: &mut Ui| rows_table(ui, &view.rows));
        });
}

// ---------------------------------------------------------------------------
// Per-country metric charts
// ---------------------------------------------------------------------------

fn subheading(metric: Metric, country: &str) -> String {
    match metric {
        Metric::Debt => format!("Debt Trend ({country})"),
        Metric::Co2Emissions => format!("CO₂ Emissions Trend ({country})"),
        Metric::RenewableInvestment => format!("Renewable Energy Investment ({country})"),
        Metric::SdgScore => format!("SDG Score Trend ({country})"),
    }
}

fn metric_chart(ui: &mut Ui, series: &ChartSeries, country: &str, years: YearRange) {
    ui.strong(subheading(series.metric, country));
    ui.label(RichText::new(series.metric.chart_title()).weak());

    if series.is_empty() {
        ui.label(RichText::new("No rows in the selected range.").italics());
    }

    Plot::new(series.metric.header())
        .legend(Legend::default())
        .height(220.0)
        .x_axis_label("Year")
        .y_axis_label(series.metric.header())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| match series.kind {
            ChartKind::Line => {
                let line = Line::new(PlotPoints::from(series.points.clone()))
                    .name(country)
                    .width(2.0);
                let markers = Points::new(PlotPoints::from(series.points.clone()))
                    .name(country)
                    .radius(3.5);
                plot_ui.line(line);
                plot_ui.points(markers);
            }
            ChartKind::Bar => {
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|&[year, value]| {
                        Bar::new(year, value)
                            .width(0.8)
                            .fill(color::year_color(year as i32, (years.start, years.end)))
                            .name(format!("{}", year as i32))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(country));
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const CELL: f32 = 72.0;
const LABEL_WIDTH: f32 = 96.0;
const LABEL_HEIGHT: f32 = 24.0;

fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = Metric::ALL.len();
    let size = vec2(LABEL_WIDTH + CELL * n as f32, LABEL_HEIGHT + CELL * n as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(13.0);
    let text_color = ui.visuals().text_color();
    let grid_origin = rect.min + vec2(LABEL_WIDTH, LABEL_HEIGHT);

    for (j, metric) in Metric::ALL.iter().enumerate() {
        painter.text(
            pos2(grid_origin.x + CELL * (j as f32 + 0.5), rect.top() + LABEL_HEIGHT * 0.5),
            Align2::CENTER_CENTER,
            metric.short_label(),
            font.clone(),
            text_color,
        );
    }

    for (i, metric) in Metric::ALL.iter().enumerate() {
        let y = grid_origin.y + CELL * i as f32;
        painter.text(
            pos2(grid_origin.x - 8.0, y + CELL * 0.5),
            Align2::RIGHT_CENTER,
            metric.short_label(),
            font.clone(),
            text_color,
        );
        for (j, value) in matrix.rows()[i].iter().enumerate() {
            let cell = Rect::from_min_size(pos2(grid_origin.x + CELL * j as f32, y), vec2(CELL, CELL))
                .shrink(1.0);
            let fill = color::diverging(*value);
            painter.rect_filled(cell, 2.0, fill);
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                format_correlation(*value),
                font.clone(),
                color::text_on(fill),
            );
        }
    }

    // Tooltip with full column names for the hovered cell.
    if let Some(pos) = response.hover_pos() {
        let offset = pos - grid_origin;
        if offset.x >= 0.0 && offset.y >= 0.0 {
            let (i, j) = ((offset.y / CELL) as usize, (offset.x / CELL) as usize);
            if i < n && j < n {
                let (a, b) = (Metric::ALL[i], Metric::ALL[j]);
                response.on_hover_text_at_pointer(format!(
                    "{a}\n{b}\nr = {}",
                    format_correlation(matrix.get(a, b))
                ));
            }
        }
    }

    color_bar(ui);
}

fn format_correlation(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Legend strip for the diverging scale.
fn color_bar(ui: &mut Ui) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("−1");
        let (rect, _) = ui.allocate_exact_size(vec2(CELL * 3.0, 12.0), Sense::hover());
        let steps = 48;
        let step_width = rect.width() / steps as f32;
        for k in 0..steps {
            let value = -1.0 + 2.0 * (k as f64 + 0.5) / steps as f64;
            let slice = Rect::from_min_size(
                pos2(rect.left() + step_width * k as f32, rect.top()),
                vec2(step_width + 0.5, rect.height()),
            );
            ui.painter().rect_filled(slice, 0.0, color::diverging(value));
        }
        ui.label("+1");
    });
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

fn recommendation_box(ui: &mut Ui, rec: &Recommendation) {
    let (accent, icon) = match rec.tier {
        Tier::Critical => (Color32::from_rgb(230, 160, 20), "⚠"),
        Tier::Progressing => (Color32::from_rgb(60, 140, 220), "ℹ"),
        Tier::OnTrack => (Color32::from_rgb(50, 170, 90), "✔"),
        Tier::NoData => (Color32::GRAY, "…"),
    };
    let fill = Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), 40);

    egui::Frame::group(ui.style())
        .fill(fill)
        .stroke(Stroke::new(1.0, accent))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("{icon}  {}", rec.message)).size(15.0));
            if let Some(mean) = rec.mean_sdg {
                ui.label(
                    RichText::new(format!("Mean SDG score {mean:.1} ({})", rec.tier)).weak(),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Filtered rows table
// ---------------------------------------------------------------------------

fn rows_table(ui: &mut Ui, rows: &[CountryRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(110.0), Metric::ALL.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(YEAR_HEADER);
            });
            for metric in Metric::ALL {
                header.col(|ui| {
                    ui.strong(metric.header());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &rows[row.index()];
                row.col(|ui| {
                    ui.label(rec.year.to_string());
                });
                for metric in Metric::ALL {
                    row.col(|ui| {
                        ui.label(format!("{:.2}", metric.value(rec)));
                    });
                }
            });
        });
}
