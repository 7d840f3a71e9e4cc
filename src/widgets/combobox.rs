use crate::canvas::{Canvas, DisplayList};
use crate::drivers::ScopeError;
use crate::types::{Color, Point, Rect};
use crate::widgets::fonts::Fonts;
use crate::widgets::label::Label;
use crate::widgets::OnUpdate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboState {
    Default,
    Armed,
    /// Just closed: the next draw reports the list area once so it gets repainted.
    ArmedPost,
}

/// Drop-down picker. The closed face reads `>value<`.
pub struct Combobox {
    label: Label,
    values: Vec<String>,
    index: usize,
    hover: usize,
    state: ComboState,
    list_rect: Rect,
    line_height: i32,
    font_size: f32,
    list: DisplayList,
    on_update: Option<OnUpdate>,
}

fn closed_text(value: &str) -> String {
    format!(">{value}<")
}

impl Combobox {
    pub fn new(
        fonts: &Fonts,
        values: Vec<String>,
        index: usize,
        pos: Point,
        size: (i32, i32),
        on_update: Option<OnUpdate>,
    ) -> Result<Self, ScopeError> {
        let current = values.get(index).ok_or(ScopeError::InvalidIndex {
            table: "combobox",
            index,
            len: values.len(),
        })?;
        let label = Label::new(fonts, closed_text(current), pos, Some(size));
        let rect = label.rect();
        let list_rect = Rect::new(
            rect.x,
            rect.y,
            rect.w,
            fonts.line_height * values.len() as i32,
        );
        Ok(Self {
            label,
            values,
            index,
            hover: index,
            state: ComboState::Default,
            list_rect,
            line_height: fonts.line_height,
            font_size: fonts.size,
            list: DisplayList::new(),
            on_update,
        })
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn hover(&self) -> usize {
        self.hover
    }

    #[cfg(test)]
    pub fn state(&self) -> ComboState {
        self.state
    }

    pub fn rect(&self) -> Rect {
        self.label.rect()
    }

    pub fn is_armed(&self) -> bool {
        self.label.is_enabled() && self.state == ComboState::Armed
    }

    pub fn press(&mut self, pos: Point) -> bool {
        if self.label.is_enabled()
            && self.state == ComboState::Default
            && self.rect().contains(pos)
        {
            self.state = ComboState::Armed;
            self.hover = self.index;
            self.redraw_list();
            return true;
        }
        false
    }

    pub fn release(&mut self, pos: Point) -> bool {
        if !self.is_armed() {
            return false;
        }
        if self.list_rect.contains(pos) {
            log::debug!("combobox: {} -> {}", self.index, self.hover);
            self.index = self.hover;
            if let Some(on_update) = self.on_update.as_mut() {
                on_update(self.index);
            }
        }
        self.close();
        true
    }

    pub fn track(&mut self, pos: Point) -> bool {
        if !self.is_armed() {
            return false;
        }
        if self.list_rect.contains(pos) {
            let row = ((pos.y - self.list_rect.y) / self.line_height) as usize;
            let hover = row.min(self.values.len() - 1);
            if hover != self.hover {
                self.hover = hover;
                self.redraw_list();
            }
        } else {
            self.close();
        }
        true
    }

    pub fn enable(&mut self, enabled: bool) {
        if !enabled {
            self.close();
        }
        self.label.enable(enabled);
    }

    /// Returns the area that needs repainting: the list while open, and once
    /// more right after it closes.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Rect {
        if self.is_armed() {
            canvas.blit(&self.list);
            return self.list_rect;
        }
        self.label.draw(canvas);
        if self.state == ComboState::ArmedPost {
            self.state = ComboState::Default;
            return self.list_rect;
        }
        self.rect()
    }

    fn close(&mut self) {
        if self.state == ComboState::Armed {
            self.state = ComboState::ArmedPost;
            self.label.set_text(closed_text(&self.values[self.index]));
        }
    }

    fn redraw_list(&mut self) {
        let list = &mut self.list;
        list.clear();
        list.fill_rect(self.list_rect, Color::FACE);
        for (i, value) in self.values.iter().enumerate() {
            let row = Rect::new(
                self.list_rect.x,
                self.list_rect.y + i as i32 * self.line_height,
                self.list_rect.w,
                self.line_height,
            );
            if i == self.hover {
                list.fill_rect(row, Color::DIMMED);
                list.draw_text(row.center(), &closed_text(value), Color::WHITE, self.font_size);
            } else {
                list.draw_text(row.center(), value, Color::BLACK, self.font_size);
            }
        }
    }
}
