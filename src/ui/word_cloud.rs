use eframe::egui::{self, pos2, vec2, Align2, FontId, Pos2, Rect, Sense, Ui, Vec2};

use crate::color::{WordPalette, CLOUD_BACKGROUND};

/// Canvas size of the word cloud.
pub const CLOUD_SIZE: Vec2 = vec2(800.0, 400.0);

const MIN_FONT: f32 = 10.0;
/// Spiral step in radians.
const SPIRAL_STEP: f32 = 0.1;
/// Radius growth per radian.
const SPIRAL_GROWTH: f32 = 1.5;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// A word positioned on the canvas. `rect` is relative to the canvas origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f32,
    pub rect: Rect,
}

/// Place `words` (most frequent first) on a `canvas`-sized area.
///
/// Each word walks an archimedean spiral out from the centre until its box
/// fits inside the canvas without touching an already placed word. Words
/// that never fit are left out. `measure` returns the text size of a word
/// at a font size.
pub fn layout<F>(words: &[(String, usize)], canvas: Vec2, mut measure: F) -> Vec<PlacedWord>
where
    F: FnMut(&str, f32) -> Vec2,
{
    let Some(max_count) = words.iter().map(|(_, c)| *c).max() else {
        return Vec::new();
    };
    let bounds = Rect::from_min_size(Pos2::ZERO, canvas);
    let center = bounds.center();
    let max_font = (canvas.y / 5.0).max(MIN_FONT);
    let aspect = canvas.x / canvas.y.max(1.0);
    let max_radius = canvas.length();

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());

    for (word, count) in words {
        let weight = (*count as f32 / max_count as f32).sqrt();
        let font_size = MIN_FONT + (max_font - MIN_FONT) * weight;
        let size = measure(word, font_size);
        if size.x > canvas.x || size.y > canvas.y {
            continue;
        }

        let mut t = 0.0f32;
        loop {
            let r = SPIRAL_GROWTH * t;
            if r > max_radius {
                break;
            }
            let pos = pos2(
                center.x + r * aspect * t.cos(),
                center.y + r * t.sin(),
            );
            let rect = Rect::from_center_size(pos, size);
            if bounds.contains_rect(rect) && placed.iter().all(|p| !p.rect.intersects(rect)) {
                placed.push(PlacedWord {
                    word: word.clone(),
                    font_size,
                    rect,
                });
                break;
            }
            t += SPIRAL_STEP;
        }
    }

    log::trace!("Word cloud placed {} of {} words", placed.len(), words.len());
    placed
}

// ---------------------------------------------------------------------------
// Layout cache
// ---------------------------------------------------------------------------

/// The last computed layout and the canvas size it was computed for.
///
/// Cleared by [`CloudCache::invalidate`] whenever the word frequencies
/// change; a different canvas size also triggers a new layout.
#[derive(Debug, Default)]
pub struct CloudCache {
    canvas: Option<Vec2>,
    placed: Vec<PlacedWord>,
}

impl CloudCache {
    pub fn invalidate(&mut self) {
        self.canvas = None;
        self.placed.clear();
    }

    /// The cached layout for `canvas`, running `compute` only on a miss.
    pub fn get_or_layout<F>(&mut self, canvas: Vec2, compute: F) -> &[PlacedWord]
    where
        F: FnOnce() -> Vec<PlacedWord>,
    {
        if self.canvas != Some(canvas) {
            self.placed = compute();
            self.canvas = Some(canvas);
        }
        &self.placed
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw the word cloud for `frequencies` (most frequent first), reusing the
/// layout held in `cache` when it is still valid.
pub fn word_cloud(ui: &mut Ui, frequencies: &[(String, usize)], cache: &mut CloudCache) {
    let size = vec2(CLOUD_SIZE.x.min(ui.available_width()), CLOUD_SIZE.y);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let canvas = response.rect;
    painter.rect_filled(canvas, 4.0, CLOUD_BACKGROUND);

    let placed = cache.get_or_layout(canvas.size(), || {
        ui.fonts(|fonts| {
            layout(frequencies, canvas.size(), |word, font_size| {
                fonts
                    .layout_no_wrap(
                        word.to_string(),
                        FontId::proportional(font_size),
                        egui::Color32::BLACK,
                    )
                    .size()
            })
        })
    });

    let palette = WordPalette::default();
    for (i, w) in placed.iter().enumerate() {
        painter.text(
            canvas.min + w.rect.center().to_vec2(),
            Align2::CENTER_CENTER,
            &w.word,
            FontId::proportional(w.font_size),
            palette.color_for(i),
        );
    }
}
