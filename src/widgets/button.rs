use crate::canvas::{Canvas, DisplayList};
use crate::types::{Color, Point, Rect};
use crate::widgets::fonts::Fonts;

const BEVEL: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Enabled,
    Armed,
    Disabled,
}

impl ButtonState {
    fn text_color(self) -> Color {
        match self {
            ButtonState::Enabled => Color::BLACK,
            ButtonState::Armed => Color::WHITE,
            ButtonState::Disabled => Color::DIMMED,
        }
    }
}

pub type OnClick = Box<dyn FnMut()>;

pub struct PushButton {
    rect: Rect,
    text: String,
    state: ButtonState,
    font_size: f32,
    on_click: Option<OnClick>,
    face: DisplayList,
}

impl PushButton {
    /// `size` of `None` fits the text plus a two pixel margin.
    pub fn new(
        fonts: &Fonts,
        text: impl Into<String>,
        pos: Point,
        size: Option<(i32, i32)>,
        on_click: Option<OnClick>,
    ) -> Self {
        let text = text.into();
        let (w, h) = size.unwrap_or_else(|| {
            let (w, h) = fonts.text_size(&text);
            (w + 4, h + 4)
        });
        let mut button = Self {
            rect: Rect::new(pos.x, pos.y, w, h),
            text,
            state: ButtonState::Enabled,
            font_size: fonts.size,
            on_click,
            face: DisplayList::new(),
        };
        button.redraw();
        button
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[cfg(test)]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn press(&mut self, pos: Point) -> bool {
        if self.state == ButtonState::Enabled && self.rect.contains(pos) {
            self.set_state(ButtonState::Armed);
            return true;
        }
        false
    }

    /// Disarms an armed button. Runs `on_click` when released inside.
    pub fn release(&mut self, pos: Point) -> bool {
        if self.state != ButtonState::Armed {
            return false;
        }
        self.set_state(ButtonState::Enabled);
        if self.rect.contains(pos) {
            if let Some(on_click) = self.on_click.as_mut() {
                on_click();
            }
        }
        true
    }

    pub fn enable(&mut self, enabled: bool) {
        let state = if enabled {
            ButtonState::Enabled
        } else {
            ButtonState::Disabled
        };
        self.set_state(state);
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Rect {
        canvas.blit(&self.face);
        self.rect
    }

    pub(crate) fn face(&self) -> &DisplayList {
        &self.face
    }

    fn set_state(&mut self, state: ButtonState) {
        if self.state != state {
            self.state = state;
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        let r = self.rect;
        let color = self.state.text_color();
        let center = r.center();
        let face = &mut self.face;
        face.clear();
        face.fill_rect(r, Color::FACE);

        if self.state == ButtonState::Disabled {
            face.draw_text(center, &self.text, color, self.font_size);
            return;
        }
        // embossed: inverted copy down-right, text up-left
        face.draw_text(
            Point::new(center.x + 1, center.y + 1),
            &self.text,
            color.inverted(),
            self.font_size,
        );
        face.draw_text(
            Point::new(center.x - 1, center.y - 1),
            &self.text,
            color,
            self.font_size,
        );

        let (lower, upper) = match self.state {
            ButtonState::Armed => (Color::WHITE, Color::SHADOW),
            _ => (Color::SHADOW, Color::WHITE),
        };
        // right and bottom edges first, then top and left on top of them
        face.fill_rect(Rect::new(r.right() - BEVEL, r.y, BEVEL, r.h), lower);
        face.fill_rect(Rect::new(r.x, r.bottom() - BEVEL, r.w, BEVEL), lower);
        face.fill_rect(Rect::new(r.x, r.y, r.w, BEVEL), upper);
        face.fill_rect(Rect::new(r.x, r.y, BEVEL, r.h), upper);
    }
}
