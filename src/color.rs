use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Bar colour of the publications-per-year chart.
pub const YEAR_BARS: Color32 = Color32::from_rgb(135, 206, 235);
/// Bar colour of the top-journals chart.
pub const JOURNAL_BARS: Color32 = Color32::from_rgb(144, 238, 144);
/// Background of the word cloud canvas.
pub const CLOUD_BACKGROUND: Color32 = Color32::WHITE;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Lightness is kept low enough to stay readable on a white background.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.40);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Word colours
// ---------------------------------------------------------------------------

/// Cycles through a fixed palette so neighbouring cloud words differ.
#[derive(Debug, Clone)]
pub struct WordPalette {
    colors: Vec<Color32>,
}

impl WordPalette {
    pub fn new(size: usize) -> Self {
        WordPalette {
            colors: generate_palette(size.max(1)),
        }
    }

    /// Colour for the word placed at `index`.
    pub fn color_for(&self, index: usize) -> Color32 {
        // Stride through the hue wheel instead of walking it in order.
        let stride = 7;
        self.colors[(index * stride) % self.colors.len()]
    }
}

impl Default for WordPalette {
    fn default() -> Self {
        WordPalette::new(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_word_palette_never_panics() {
        let wp = WordPalette::new(0);
        let c = wp.color_for(41);
        assert_eq!(c, wp.color_for(0));

        let wp = WordPalette::default();
        for i in 0..100 {
            let _ = wp.color_for(i);
        }
    }
}
