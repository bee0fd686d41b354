use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::JournalFilter;
use crate::state::{AppState, SAMPLE_ROWS};
use crate::ui::{plot, word_cloud};

const ALL_JOURNALS: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Year range ----
    if let (Some((min, max)), Some(range)) = (state.year_limits, state.criteria.years) {
        ui.strong("Select publication year range:");
        let (mut lo, mut hi) = (range.lo, range.hi);
        ui.add(egui::Slider::new(&mut lo, min..=hi).text("from"));
        ui.add(egui::Slider::new(&mut hi, lo..=max).text("to"));
        state.set_year_range(lo, hi);
        ui.separator();
    }

    // ---- Journal ----
    if !state.journal_choices.is_empty() {
        ui.strong("Select journal:");
        let selected_text = match &state.criteria.journal {
            JournalFilter::All => ALL_JOURNALS.to_string(),
            JournalFilter::Only(j) => j.clone(),
        };
        let mut choice = state.criteria.journal.clone();
        egui::ComboBox::from_id_salt("journal_filter")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut choice, JournalFilter::All, ALL_JOURNALS);
                for journal in &state.journal_choices {
                    ui.selectable_value(&mut choice, JournalFilter::Only(journal.clone()), journal.as_str());
                }
            });
        state.set_journal(choice);
    }
}

// ---------------------------------------------------------------------------
// Central panel – summary, sample and charts
// ---------------------------------------------------------------------------

/// Render the dashboard body, or the load error when there is no data.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CORD-19 COVID-19 Research Explorer");
    ui.label("Explore the metadata of COVID-19 research papers from the CORD-19 dataset");
    ui.add_space(8.0);

    if let Some(msg) = &state.load_error {
        ui.label(RichText::new(msg).color(Color32::RED));
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                overview(&mut cols[0], state);
                sample_table(&mut cols[1], state);
            });

            ui.add_space(12.0);
            ui.heading("Visualizations");
            let summary = &state.summary;

            if let Some(histogram) = &summary.year_histogram {
                ui.strong("Publications by Year");
                plot::year_chart(ui, histogram);
            }

            if let Some(top) = &summary.top_journals {
                ui.strong("Top 10 Journals");
                plot::journal_chart(ui, top);
            }

            if summary.word_count > 0 {
                ui.add_space(12.0);
                ui.heading("Title Word Cloud");
                word_cloud::word_cloud(ui, &summary.word_frequencies, &mut state.cloud);
            }
        });
}

fn overview(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;
    ui.strong("Dataset Overview");
    ui.label(format!("Total papers: {}", format_count(summary.total_count)));
    ui.label(format!("Columns: {}", summary.column_count));

    if summary.year_histogram.is_some() {
        let range = match summary.year_bounds {
            Some((lo, hi)) => format!("{lo} - {hi}"),
            None => "n/a".to_string(),
        };
        ui.label(format!("Year range: {range}"));
    }
}

fn sample_table(ui: &mut Ui, state: &AppState) {
    ui.strong("Sample Data");
    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        ui.label("No papers match the current filters.");
        return;
    }
    let with_journal = state.summary.top_journals.is_some();

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder().clip(true));
    if with_journal {
        table = table
            .column(Column::initial(140.0).clip(true))
            .column(Column::auto());
    }

    table
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("title");
            });
            if with_journal {
                header.col(|ui| {
                    ui.strong("journal");
                });
                header.col(|ui| {
                    ui.strong("publication_year");
                });
            }
        })
        .body(|mut body| {
            for record in view.sample(SAMPLE_ROWS) {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(record.title.as_str());
                    });
                    if with_journal {
                        row.col(|ui| {
                            ui.label(record.journal.as_deref().unwrap_or("<null>"));
                        });
                        row.col(|ui| {
                            let year = record
                                .publication_year
                                .map(|y| y.to_string())
                                .unwrap_or_else(|| "<null>".to_string());
                            ui.label(year);
                        });
                    }
                });
            }
        });
}

/// `1234567` → `"1,234,567"`.
fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
