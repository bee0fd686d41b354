use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{JOURNAL_BARS, YEAR_BARS};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Publications by year
// ---------------------------------------------------------------------------

/// Vertical bar chart of the year histogram.
pub fn year_chart(ui: &mut Ui, histogram: &[(i32, usize)]) {
    let bars: Vec<Bar> = histogram
        .iter()
        .map(|&(year, count)| {
            Bar::new(year as f64, count as f64)
                .width(0.8)
                .name(year.to_string())
        })
        .collect();

    let chart = BarChart::new(bars).color(YEAR_BARS).name("Papers");

    Plot::new("year_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Papers")
        .x_axis_formatter(|mark, _range| integer_label(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Top journals
// ---------------------------------------------------------------------------

/// Horizontal bar chart of the top journals, largest on top.
pub fn journal_chart(ui: &mut Ui, top: &[(String, usize)]) {
    let n = top.len();
    // Bar i sits at y = n - 1 - i so the first entry is drawn highest.
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, (journal, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .width(0.7)
                .name(journal)
        })
        .collect();

    let labels: Vec<String> = top.iter().rev().map(|(j, _)| j.clone()).collect();
    let chart = BarChart::new(bars)
        .color(JOURNAL_BARS)
        .name("Publications")
        .horizontal();

    Plot::new("journal_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Number of Publications")
        .y_axis_formatter(move |mark, _range| {
            let v = mark.value;
            if v.fract() != 0.0 || v < 0.0 {
                return String::new();
            }
            labels.get(v as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn integer_label(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        String::new()
    }
}
