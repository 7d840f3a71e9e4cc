// src/gui.rs
use std::time::Instant;

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rounding, Shape, Stroke};

use crate::canvas::Canvas;
use crate::scope::{InputEvent, Scope};
use crate::types::{Color, Point, Rect};

fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

fn pos2(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

fn egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(pos2(Point::new(r.x, r.y)), egui::vec2(r.w as f32, r.h as f32))
}

/// Paints straight onto an egui layer.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self { painter }
    }
}

impl Canvas for EguiCanvas<'_> {
    fn draw_line_strip(&mut self, points: &[Point], color: Color) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().copied().map(pos2).collect();
        self.painter
            .add(Shape::line(points, Stroke::new(1.0, color32(color))));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.painter
            .line_segment([pos2(from), pos2(to)], Stroke::new(1.0, color32(color)));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, width: i32) {
        // egui centres the stroke on the edge; keep it inside like the raster does
        let width = width.max(1) as f32;
        let rect = egui_rect(rect).shrink(width / 2.0);
        self.painter
            .rect_stroke(rect, Rounding::same(0.0), Stroke::new(width, color32(color)));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.painter
            .rect_filled(egui_rect(rect), Rounding::same(0.0), color32(color));
    }

    fn draw_text(&mut self, center: Point, text: &str, color: Color, size: f32) {
        self.painter.text(
            pos2(center),
            Align2::CENTER_CENTER,
            text,
            FontId::monospace(size),
            color32(color),
        );
    }
}

fn map_key(key: egui::Key) -> Option<char> {
    match key {
        egui::Key::Q => Some('q'),
        egui::Key::Num0 => Some('0'),
        egui::Key::S => Some('s'),
        _ => None,
    }
}

fn map_event(event: &egui::Event) -> Option<InputEvent> {
    let point = |pos: &Pos2| Point::new(pos.x.round() as i32, pos.y.round() as i32);
    match event {
        egui::Event::Key {
            key, pressed: true, ..
        } => map_key(*key).map(InputEvent::KeyDown),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            ..
        } => Some(if *pressed {
            InputEvent::PointerDown(point(pos))
        } else {
            InputEvent::PointerUp(point(pos))
        }),
        egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMove(point(pos))),
        _ => None,
    }
}

/// This frame's input in arrival order. A close request from the window
/// manager comes last, as `Quit`.
fn collect_input(events: &[egui::Event], close_requested: bool) -> Vec<InputEvent> {
    let mut input: Vec<InputEvent> = events.iter().filter_map(map_event).collect();
    if close_requested {
        input.push(InputEvent::Quit);
    }
    input
}

pub struct ScopeApp {
    scope: Scope,
}

impl ScopeApp {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let input = ctx.input(|i| collect_input(&i.events, i.viewport().close_requested()));
        for event in input {
            self.scope.handle(event);
        }
        // join the sampler while the window still exists
        if self.scope.should_quit() {
            self.scope.shutdown();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.scope.update();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let mut canvas = EguiCanvas::new(ui.painter());
                self.scope.render(&mut canvas);
            });
        self.scope.tick(Instant::now());
        ctx.request_repaint_after(self.scope.frame_interval());
    }
}
