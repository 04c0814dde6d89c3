use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::color::ColorMap;
use crate::data::aggregate::Series;
use crate::ui::format;

const CHART_HEIGHT: f32 = 260.0;
const AXIS_LABEL_CHARS: usize = 14;
const LINE_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

/// Axis formatter that prints `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value;
        if pos < 0.0 || (pos - pos.round()).abs() > 1e-6 {
            return String::new();
        }
        labels
            .get(pos.round() as usize)
            .map(|l| format::truncate(l, AXIS_LABEL_CHARS))
            .unwrap_or_default()
    }
}

fn empty_state(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(message).italics().weak());
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

/// Line over categorical x positions (periods, years).
pub fn line_chart(ui: &mut Ui, id: &str, labels: Vec<String>, values: &[f64], y_label: &str) {
    if values.is_empty() {
        empty_state(ui, "No dated records to chart.");
        return;
    }

    let points: Vec<[f64; 2]> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(labels))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(LINE_COLOR)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(LINE_COLOR)
                    .radius(3.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One bar per series entry, in series order. Hovering a bar shows its label.
pub fn bar_chart(ui: &mut Ui, id: &str, series: &Series, colors: Option<&ColorMap>) {
    if series.is_empty() {
        empty_state(ui, "Nothing to show for this selection.");
        return;
    }

    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let fill = colors.map_or(LINE_COLOR, |c| c.color_for(label));
            Bar::new(i as f64, *value).name(label).fill(fill).width(0.7)
        })
        .collect();
    let labels = series.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Degrees at which the first wedge starts, counter-clockwise from +x.
const PIE_START_DEG: f64 = 140.0;

/// Outline of one wedge: centre, then arc points from `start` to `end` (radians).
pub fn wedge_points(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / TAU) * 96.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for s in 0..=steps {
        let angle = start + (end - start) * s as f64 / steps as f64;
        points.push([angle.cos(), angle.sin()]);
    }
    points
}

/// Pie of `series`, with `shares` (percent) in the legend labels.
pub fn pie_chart(ui: &mut Ui, id: &str, series: &Series, shares: &[f64], colors: &ColorMap) {
    if series.iter().all(|(_, v)| *v <= 0.0) {
        empty_state(ui, "Nothing to show for this selection.");
        return;
    }

    let mut angle = PIE_START_DEG.to_radians();
    let mut wedges = Vec::with_capacity(series.len());
    for ((label, _), share) in series.iter().zip(shares) {
        let sweep = share / 100.0 * TAU;
        // Polygon fills assume convexity: draw wide wedges as quarter turns.
        let pieces = (sweep / (TAU / 4.0)).ceil() as usize;
        let name = format!("{label} ({share:.1}%)");
        for p in 0..pieces {
            let start = angle + sweep * p as f64 / pieces as f64;
            let end = angle + sweep * (p + 1) as f64 / pieces as f64;
            wedges.push((name.clone(), colors.color_for(label), wedge_points(start, end)));
        }
        angle += sweep;
    }

    Plot::new(id)
        .height(CHART_HEIGHT + 60.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (name, color, points) in wedges {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .name(name)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });
}
