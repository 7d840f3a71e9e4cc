use std::cell::Cell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::config::ScopeConfig;
use crate::drivers::queue::ControlSender;
use crate::drivers::{ControlCommand, Mode, Range, Rate, ScopeError};
use crate::types::{Point, Rect};
use crate::widgets::{ButtonGrid, Combobox, Fonts, Setting, Widget};

pub const ZOOM: usize = 0;
pub const MODE: usize = 1;
pub const FREQ: usize = 2;
pub const RANGE: usize = 3;
/// The widgets that talk to the sampler.
pub const ACQUISITION: [usize; 3] = [MODE, FREQ, RANGE];

/// Widgets in dispatch order. The one that consumed the latest event has focus
/// and is drawn last, so an open list stays on top.
pub struct Panel {
    widgets: Vec<Widget>,
    focus: Option<usize>,
}

impl Panel {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            widgets,
            focus: None,
        }
    }

    #[cfg(test)]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    #[cfg(test)]
    pub fn widget(&self, index: usize) -> Option<&Widget> {
        self.widgets.get(index)
    }

    pub fn press(&mut self, pos: Point) -> bool {
        self.dispatch(|w| w.press(pos))
    }

    pub fn release(&mut self, pos: Point) -> bool {
        self.dispatch(|w| w.release(pos))
    }

    pub fn track(&mut self, pos: Point) -> bool {
        self.dispatch(|w| w.track(pos))
    }

    pub fn enable(&mut self, index: usize, enabled: bool) {
        if let Some(widget) = self.widgets.get_mut(index) {
            widget.enable(enabled);
        }
    }

    /// Reset a setting to its start value. False if `index` is not a setting.
    pub fn reset(&mut self, index: usize) -> bool {
        match self.widgets.get_mut(index) {
            Some(Widget::Setting(setting)) => {
                setting.reset();
                true
            }
            _ => false,
        }
    }

    /// Draw every widget, focus last. Returns the touched regions in draw order.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Vec<Rect> {
        let mut regions = Vec::with_capacity(self.widgets.len());
        for (i, widget) in self.widgets.iter_mut().enumerate() {
            if Some(i) != self.focus {
                regions.push(widget.draw(canvas));
            }
        }
        if let Some(widget) = self.focus.and_then(|i| self.widgets.get_mut(i)) {
            regions.push(widget.draw(canvas));
        }
        regions
    }

    fn dispatch(&mut self, mut handle: impl FnMut(&mut Widget) -> bool) -> bool {
        for (i, widget) in self.widgets.iter_mut().enumerate() {
            if handle(widget) {
                self.focus = Some(i);
                return true;
            }
        }
        false
    }
}

fn labels(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| s.to_string()).collect()
}

/// The control row under the plot: zoom, mode, frequency and range.
/// Zoom writes the render step; the rest go to the sampler.
pub fn settings_panel(
    fonts: &Fonts,
    config: &ScopeConfig,
    plot_height: i32,
    control: ControlSender,
    step: Rc<Cell<usize>>,
) -> Result<Panel, ScopeError> {
    let grid = ButtonGrid {
        offset: plot_height,
        size: config.button_size,
    };
    let initial = config.initial;

    let zooms = (1..=config.zoom_levels).map(|i| i.to_string()).collect();
    step.set(initial.zoom + 1);
    let zoom = Setting::new(
        fonts,
        "Zoom",
        zooms,
        initial.zoom,
        &grid,
        (0, 0),
        Some(Box::new(move |i| step.set(i + 1))),
    )?;

    let tx = control.clone();
    let mode = Combobox::new(
        fonts,
        labels(&Mode::LABELS),
        initial.mode,
        grid.pos(1, 3),
        config.button_size,
        Some(Box::new(move |i| tx.send(ControlCommand::Mode(i)))),
    )?;

    let tx = control.clone();
    let freq = Setting::new(
        fonts,
        "Freq",
        labels(&Rate::LABELS),
        initial.rate,
        &grid,
        (0, 4),
        Some(Box::new(move |i| tx.send(ControlCommand::Rate(i)))),
    )?;

    let range = Setting::new(
        fonts,
        "Rnge",
        labels(&Range::LABELS),
        initial.range,
        &grid,
        (0, 5),
        Some(Box::new(move |i| control.send(ControlCommand::Range(i)))),
    )?;

    Ok(Panel::new(vec![
        Widget::Setting(zoom),
        Widget::Combobox(mode),
        Widget::Setting(freq),
        Widget::Setting(range),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DisplayList;
    use crate::config::InitialSettings;
    use crate::drivers::queue::{control_channel, ControlReceiver, Poll};

    fn build(config: &ScopeConfig) -> (Panel, ControlReceiver, Rc<Cell<usize>>) {
        let fonts = Fonts::new(config.font_size);
        let (tx, rx) = control_channel();
        let step = Rc::new(Cell::new(0));
        let panel = settings_panel(&fonts, config, 470, tx, step.clone()).unwrap();
        (panel, rx, step)
    }

    fn setting(panel: &Panel, index: usize) -> &Setting {
        match panel.widget(index) {
            Some(Widget::Setting(s)) => s,
            _ => panic!("widget {index} is not a setting"),
        }
    }

    fn click(panel: &mut Panel, at: Point) {
        panel.press(at);
        panel.release(at);
    }

    #[test]
    fn freq_minus_sends_rate_command() {
        let (mut panel, rx, _) = build(&ScopeConfig::default());
        let minus = setting(&panel, FREQ).prev_button().rect().center();
        click(&mut panel, minus);
        assert_eq!(rx.poll(), Poll::Command(ControlCommand::Rate(7)));
        assert_eq!(rx.poll(), Poll::Empty);
        assert_eq!(panel.focus(), Some(FREQ));
    }

    #[test]
    fn zoom_sets_step_and_resets() {
        let (mut panel, rx, step) = build(&ScopeConfig::default());
        assert_eq!(step.get(), 1);
        let plus = setting(&panel, ZOOM).next_button().rect().center();
        click(&mut panel, plus);
        click(&mut panel, plus);
        assert_eq!(step.get(), 3);
        assert!(panel.reset(ZOOM));
        assert_eq!(step.get(), 1);
        assert!(!panel.reset(MODE));
        // zoom never talks to the sampler
        assert_eq!(rx.poll(), Poll::Empty);
    }

    #[test]
    fn mode_combobox_commits_selection() {
        let (mut panel, rx, _) = build(&ScopeConfig::default());
        let face = panel.widget(MODE).unwrap().rect();
        panel.press(face.center());
        assert_eq!(panel.focus(), Some(MODE));
        // third row of the open list
        let row = Point::new(face.x + 10, face.y + 2 * 24 + 5);
        assert!(panel.track(row));
        assert!(panel.release(row));
        assert_eq!(rx.poll(), Poll::Command(ControlCommand::Mode(2)));
    }

    #[test]
    fn focused_widget_is_drawn_last() {
        let (mut panel, _rx, _) = build(&ScopeConfig::default());
        let face = panel.widget(MODE).unwrap().rect();
        panel.press(face.center());
        let mut frame = DisplayList::new();
        let regions = panel.draw(&mut frame);
        assert_eq!(regions.len(), 4);
        // the open list is taller than the closed face
        assert_eq!(regions[3].h, 3 * 24);
        assert_eq!(frame.texts().last(), Some("LOWPO"));
    }

    #[test]
    fn disabled_acquisition_widgets_ignore_clicks() {
        let (mut panel, rx, step) = build(&ScopeConfig::default());
        for index in ACQUISITION {
            panel.enable(index, false);
        }
        let minus = setting(&panel, FREQ).prev_button().rect().center();
        assert!(!panel.press(minus));
        let face = panel.widget(MODE).unwrap().rect();
        assert!(!panel.press(face.center()));
        assert_eq!(rx.poll(), Poll::Empty);
        // zoom only affects drawing and stays live
        let plus = setting(&panel, ZOOM).next_button().rect().center();
        click(&mut panel, plus);
        assert_eq!(step.get(), 2);
    }

    #[test]
    fn labels_follow_initial_indices() {
        let config = ScopeConfig {
            initial: InitialSettings {
                zoom: 4,
                rate: 0,
                range: 1,
                mode: 1,
            },
            ..ScopeConfig::default()
        };
        let (panel, _rx, step) = build(&config);
        assert_eq!(step.get(), 5);
        assert_eq!(setting(&panel, FREQ).value(), "1Hz");
        assert_eq!(setting(&panel, RANGE).value(), "4G");
        match panel.widget(MODE) {
            Some(Widget::Combobox(c)) => assert_eq!(c.index(), 1),
            _ => panic!("mode is a combobox"),
        }
    }

    #[test]
    fn bad_initial_index_fails_to_build() {
        let config = ScopeConfig {
            initial: InitialSettings {
                range: 9,
                ..InitialSettings::default()
            },
            ..ScopeConfig::default()
        };
        let (tx, _rx) = control_channel();
        let result = settings_panel(
            &Fonts::new(20.0),
            &config,
            470,
            tx,
            Rc::new(Cell::new(1)),
        );
        assert!(result.is_err());
    }
}
