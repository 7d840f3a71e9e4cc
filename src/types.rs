// src/types.rs

/// One reading of the three acquisition channels, in arrival order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample(pub f64, pub f64, pub f64);

impl Sample {
    pub const ZERO: Sample = Sample(0.0, 0.0, 0.0);

    pub fn channel(&self, idx: usize) -> f64 {
        match idx {
            0 => self.0,
            1 => self.1,
            _ => self.2,
        }
    }
}

impl From<(f64, f64, f64)> for Sample {
    fn from((a, b, c): (f64, f64, f64)) -> Self {
        Sample(a, b, c)
    }
}

// Screen coordinates are whole pixels, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Half-open hit test: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const FACE: Color = Color(200, 200, 200);
    pub const DIMMED: Color = Color(100, 100, 100);
    pub const SHADOW: Color = Color(50, 50, 50);

    pub fn inverted(&self) -> Color {
        Color(255 - self.0, 255 - self.1, 255 - self.2)
    }
}
