// src/canvas.rs
use crate::types::{Color, Point, Rect};

/// The drawing surface the scope renders onto.
pub trait Canvas {
    fn draw_line_strip(&mut self, points: &[Point], color: Color);
    fn draw_line(&mut self, from: Point, to: Point, color: Color);
    /// Outline of `rect`, `width` pixels thick, drawn inside the rect.
    fn draw_rect(&mut self, rect: Rect, color: Color, width: i32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Single line of monospace text centred on `center`.
    fn draw_text(&mut self, center: Point, text: &str, color: Color, size: f32);

    /// Replay a pre-rendered display list.
    fn blit(&mut self, list: &DisplayList) {
        for primitive in list.primitives() {
            primitive.draw(self);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    LineStrip(Vec<Point>, Color),
    Line(Point, Point, Color),
    Rect(Rect, Color, i32),
    Fill(Rect, Color),
    Text(Point, String, Color, f32),
}

impl Primitive {
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self {
            Primitive::LineStrip(points, color) => canvas.draw_line_strip(points, *color),
            Primitive::Line(a, b, color) => canvas.draw_line(*a, *b, *color),
            Primitive::Rect(rect, color, width) => canvas.draw_rect(*rect, *color, *width),
            Primitive::Fill(rect, color) => canvas.fill_rect(*rect, *color),
            Primitive::Text(center, text, color, size) => {
                canvas.draw_text(*center, text, *color, *size)
            }
        }
    }
}

/// A recorded sequence of draw calls. Serves as the off-screen "surface" for
/// anything that only changes on state transitions (graticule, widget faces).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    primitives: Vec<Primitive>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Text strings in draw order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(_, text, _, _) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn draw_line_strip(&mut self, points: &[Point], color: Color) {
        // a strip needs at least two points to be visible
        if points.len() >= 2 {
            self.primitives
                .push(Primitive::LineStrip(points.to_vec(), color));
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.primitives.push(Primitive::Line(from, to, color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, width: i32) {
        self.primitives.push(Primitive::Rect(rect, color, width));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.primitives.push(Primitive::Fill(rect, color));
    }

    fn draw_text(&mut self, center: Point, text: &str, color: Color, size: f32) {
        self.primitives
            .push(Primitive::Text(center, text.to_owned(), color, size));
    }

    fn blit(&mut self, list: &DisplayList) {
        self.primitives.extend_from_slice(&list.primitives);
    }
}
