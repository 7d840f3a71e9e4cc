use crate::canvas::{Canvas, DisplayList};
use crate::types::{Color, Point, Rect};
use crate::widgets::fonts::Fonts;

/// Static text on a flat face. Never consumes input.
pub struct Label {
    rect: Rect,
    text: String,
    enabled: bool,
    font_size: f32,
    face: DisplayList,
}

impl Label {
    /// `size` of `None` shrinks the face to fit the text.
    pub fn new(
        fonts: &Fonts,
        text: impl Into<String>,
        pos: Point,
        size: Option<(i32, i32)>,
    ) -> Self {
        let text = text.into();
        let (w, h) = size.unwrap_or_else(|| fonts.text_size(&text));
        let mut label = Self {
            rect: Rect::new(pos.x, pos.y, w, h),
            text,
            enabled: true,
            font_size: fonts.size,
            face: DisplayList::new(),
        };
        label.redraw();
        label
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.redraw();
        }
    }

    pub fn enable(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.redraw();
        }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Rect {
        canvas.blit(&self.face);
        self.rect
    }

    pub(crate) fn face(&self) -> &DisplayList {
        &self.face
    }

    fn redraw(&mut self) {
        let color = if self.enabled {
            Color::BLACK
        } else {
            Color::DIMMED
        };
        self.face.clear();
        self.face.fill_rect(self.rect, Color::FACE);
        self.face
            .draw_text(self.rect.center(), &self.text, color, self.font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Primitive;

    #[test]
    fn auto_size_fits_text() {
        let fonts = Fonts::new(20.0);
        let label = Label::new(&fonts, "16G", Point::new(5, 5), None);
        assert_eq!(label.rect(), Rect::new(5, 5, 36, 24));
    }

    #[test]
    fn disabling_dims_the_text() {
        let fonts = Fonts::new(20.0);
        let mut label = Label::new(&fonts, "1620Hz", Point::new(0, 0), Some((155, 30)));
        label.enable(false);
        let text_color = label.face().primitives().iter().find_map(|p| match p {
            Primitive::Text(_, _, c, _) => Some(*c),
            _ => None,
        });
        assert_eq!(text_color, Some(Color::DIMMED));
        label.enable(true);
        label.set_text("1Hz");
        assert_eq!(label.face().texts().collect::<Vec<_>>(), vec!["1Hz"]);
    }
}
