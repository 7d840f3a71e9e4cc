use std::cell::Cell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::drivers::ScopeError;
use crate::types::{Point, Rect};
use crate::widgets::button::{OnClick, PushButton};
use crate::widgets::fonts::Fonts;
use crate::widgets::label::Label;
use crate::widgets::{ButtonGrid, OnUpdate};

/// A "+" stepper, the current value and a "-" stepper stacked in one column.
pub struct Setting {
    next: PushButton,
    prev: PushButton,
    label: Label,
    values: Vec<String>,
    index: usize,
    initial: usize,
    /// Steps requested by stepper clicks, applied once the release is done.
    pending: Rc<Cell<i32>>,
    on_update: Option<OnUpdate>,
}

fn stepper(pending: &Rc<Cell<i32>>, delta: i32) -> OnClick {
    let pending = pending.clone();
    Box::new(move || pending.set(pending.get() + delta))
}

impl Setting {
    pub fn new(
        fonts: &Fonts,
        name: &str,
        values: Vec<String>,
        index: usize,
        grid: &ButtonGrid,
        (row, col): (i32, i32),
        on_update: Option<OnUpdate>,
    ) -> Result<Self, ScopeError> {
        if index >= values.len() {
            return Err(ScopeError::InvalidIndex {
                table: "setting",
                index,
                len: values.len(),
            });
        }
        let size = Some(grid.size);
        let pending = Rc::new(Cell::new(0));
        let next = PushButton::new(
            fonts,
            format!("{name} +"),
            grid.pos(row, col),
            size,
            Some(stepper(&pending, 1)),
        );
        let prev = PushButton::new(
            fonts,
            format!("{name} -"),
            grid.pos(row + 2, col),
            size,
            Some(stepper(&pending, -1)),
        );
        let mut setting = Self {
            next,
            prev,
            label: Label::new(fonts, values[index].as_str(), grid.pos(row + 1, col), size),
            values,
            index,
            initial: index,
            pending,
            on_update,
        };
        setting.refresh(false);
        Ok(setting)
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn value(&self) -> &str {
        &self.values[self.index]
    }

    #[cfg(test)]
    pub fn next_button(&self) -> &PushButton {
        &self.next
    }

    #[cfg(test)]
    pub fn prev_button(&self) -> &PushButton {
        &self.prev
    }

    pub fn step_next(&mut self) {
        self.index = (self.index + 1).min(self.values.len() - 1);
        self.refresh(true);
    }

    pub fn step_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
        self.refresh(true);
    }

    /// Back to the construction index. Always notifies.
    pub fn reset(&mut self) {
        self.index = self.initial;
        self.refresh(true);
    }

    pub fn press(&mut self, pos: Point) -> bool {
        // both steppers see the event
        let next = self.next.press(pos);
        let prev = self.prev.press(pos);
        next | prev
    }

    pub fn release(&mut self, pos: Point) -> bool {
        let consumed = self.next.release(pos) | self.prev.release(pos);
        match self.pending.replace(0) {
            0 => {}
            d if d > 0 => self.step_next(),
            _ => self.step_prev(),
        }
        consumed
    }

    pub fn track(&mut self, _pos: Point) -> bool {
        false
    }

    pub fn enable(&mut self, enabled: bool) {
        self.label.enable(enabled);
        if enabled {
            self.refresh_bounds();
        } else {
            self.next.enable(false);
            self.prev.enable(false);
        }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Rect {
        self.next.draw(canvas);
        self.prev.draw(canvas);
        self.label.draw(canvas);
        self.rect()
    }

    pub fn rect(&self) -> Rect {
        self.next.rect().union(&self.prev.rect())
    }

    fn refresh_bounds(&mut self) {
        self.next.enable(self.index + 1 < self.values.len());
        self.prev.enable(self.index > 0);
    }

    fn refresh(&mut self, notify: bool) {
        self.refresh_bounds();
        self.label.set_text(self.values[self.index].as_str());
        if notify {
            if let Some(on_update) = self.on_update.as_mut() {
                on_update(self.index);
            }
        }
    }
}
