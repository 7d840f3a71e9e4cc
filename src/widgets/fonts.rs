// src/widgets/fonts.rs
use once_cell::sync::OnceCell;

/// Metrics of the single monospace face every widget uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fonts {
    pub size: f32,
    pub line_height: i32,
    pub advance: i32,
}

impl Fonts {
    /// Line height is 6/5 of the size and the advance 3/5, both rounded up.
    pub fn new(size: f32) -> Self {
        let px = size.round().max(1.0) as i32;
        Self {
            size,
            line_height: (px * 6 + 4) / 5,
            advance: (px * 3 + 4) / 5,
        }
    }

    /// Process-wide metrics; the first call wins.
    pub fn init(size: f32) -> &'static Fonts {
        static FONTS: OnceCell<Fonts> = OnceCell::new();
        let fonts = FONTS.get_or_init(|| {
            log::debug!("fonts: monospace {size}px");
            Fonts::new(size)
        });
        if fonts.size != size {
            log::warn!("fonts: already initialised at {}px, ignoring {size}px", fonts.size);
        }
        fonts
    }

    pub fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance
    }

    pub fn text_size(&self, text: &str) -> (i32, i32) {
        (self.text_width(text), self.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_scale_with_size() {
        let fonts = Fonts::new(20.0);
        assert_eq!(fonts.line_height, 24);
        assert_eq!(fonts.advance, 12);
        assert_eq!(fonts.text_size(">HIRES<"), (84, 24));
    }

    #[test]
    fn init_returns_the_same_instance() {
        let a = Fonts::init(20.0);
        let b = Fonts::init(20.0);
        assert!(std::ptr::eq(a, b));
    }
}
