pub const ELLIPSIS: char = '…';

/// Measures rendered text width in canvas units.
pub trait TextMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32;
}

/// Every character advances by a fixed fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub em_ratio: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        // Roughly the mean advance of a proportional sans-serif face.
        Self { em_ratio: 0.55 }
    }
}

impl TextMeasure for FixedAdvance {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.em_ratio
    }
}

/// Fit `text` into `max_width`, dropping trailing characters and appending an
/// ellipsis until it fits. Returns the empty string when nothing fits.
///
/// A label that already fits is returned unchanged, so fitting is idempotent.
pub fn fit_label(text: &str, max_width: f32, font_size: f32, measure: &dyn TextMeasure) -> String {
    if measure.width(text, font_size) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        if kept.is_empty() {
            break;
        }
        let candidate: String = kept.iter().chain(std::iter::once(&ELLIPSIS)).collect();
        if measure.width(&candidate, font_size) <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const M: FixedAdvance = FixedAdvance { em_ratio: 0.5 };

    #[test]
    fn fitting_label_is_untouched() {
        assert_eq!(fit_label("Tetris", 100.0, 10.0, &M), "Tetris");
    }

    #[test]
    fn truncates_with_ellipsis() {
        // 5 units per char, room for 4 chars
        assert_eq!(fit_label("Super Mario Bros.", 20.0, 10.0, &M), "Sup…");
    }

    #[test]
    fn nothing_fits_gives_empty() {
        assert_eq!(fit_label("Duck Hunt", 4.0, 10.0, &M), "");
        assert_eq!(fit_label("Duck Hunt", -10.0, 10.0, &M), "");
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(fit_label("Pokémon", 20.0, 10.0, &M), "Pok…");
    }

    proptest! {
        #[test]
        fn fitting_is_idempotent(label in "\\PC{0,40}", width in 0.0f32..400.0) {
            let once = fit_label(&label, width, 10.0, &M);
            let twice = fit_label(&once, width, 10.0, &M);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn result_never_exceeds_width(label in "\\PC{0,40}", width in 0.0f32..400.0) {
            let fitted = fit_label(&label, width, 10.0, &M);
            prop_assert!(M.width(&fitted, 10.0) <= width);
        }
    }
}
