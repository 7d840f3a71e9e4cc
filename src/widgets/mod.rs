// src/widgets/mod.rs
pub mod button;
pub mod combobox;
pub mod fonts;
pub mod label;
pub mod panel;
pub mod setting;

pub use combobox::Combobox;
pub use fonts::Fonts;
pub use panel::{settings_panel, Panel};
pub use setting::Setting;

use crate::canvas::Canvas;
use crate::types::{Point, Rect};

/// Called with the new index whenever a setting or combobox changes.
pub type OnUpdate = Box<dyn FnMut(usize)>;

/// Button cells below the plot: `offset` is the plot height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonGrid {
    pub offset: i32,
    pub size: (i32, i32),
}

impl ButtonGrid {
    pub fn pos(&self, row: i32, col: i32) -> Point {
        Point::new(
            15 + col * (self.size.0 + 12),
            self.offset + 5 + row * (self.size.1 + 5),
        )
    }
}

/// Everything a panel can hold. Labels and buttons only appear inside these.
pub enum Widget {
    Setting(Setting),
    Combobox(Combobox),
}

impl Widget {
    /// Draws the widget and returns the region it touched.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Rect {
        match self {
            Widget::Setting(w) => w.draw(canvas),
            Widget::Combobox(w) => w.draw(canvas),
        }
    }

    pub fn press(&mut self, pos: Point) -> bool {
        match self {
            Widget::Setting(w) => w.press(pos),
            Widget::Combobox(w) => w.press(pos),
        }
    }

    pub fn release(&mut self, pos: Point) -> bool {
        match self {
            Widget::Setting(w) => w.release(pos),
            Widget::Combobox(w) => w.release(pos),
        }
    }

    pub fn track(&mut self, pos: Point) -> bool {
        match self {
            Widget::Setting(w) => w.track(pos),
            Widget::Combobox(w) => w.track(pos),
        }
    }

    pub fn enable(&mut self, enabled: bool) {
        match self {
            Widget::Setting(w) => w.enable(enabled),
            Widget::Combobox(w) => w.enable(enabled),
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Widget::Setting(w) => w.rect(),
            Widget::Combobox(w) => w.rect(),
        }
    }
}
