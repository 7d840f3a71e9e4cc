// src/scope.rs
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::canvas::{Canvas, DisplayList};
use crate::config::ScopeConfig;
use crate::drivers::{
    save_png, Acquisition, ControlCommand, ControlSender, GraticuleRenderer, PlotGeometry,
    SampleQueue, SamplerReport, ScopeError, WindowBuffer,
};
use crate::types::{Color, Point, Rect};
use crate::widgets::{panel, settings_panel, Fonts, Panel};

const TITLE_COLOR: Color = Color::WHITE;
const FPS_IDLE_COLOR: Color = Color(100, 100, 100);
const FPS_COLOR: Color = Color(250, 250, 0);
const BATCH_COLOR: Color = Color(157, 157, 157);
const STATUS_COLOR: Color = Color(200, 200, 200);

/// Input the display shell hands to the scope, already in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(char),
    PointerDown(Point),
    PointerUp(Point),
    PointerMove(Point),
}

/// Frames per second, averaged over a fixed number of frames.
pub struct FrameRate {
    window: u32,
    frames: u32,
    started: Instant,
    fps: Option<f64>,
}

impl FrameRate {
    pub fn new(window: u32, now: Instant) -> Self {
        Self {
            window: window.max(1),
            frames: 0,
            started: now,
            fps: None,
        }
    }

    /// Count one frame. Returns the new rate whenever a full window has passed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        if self.frames < self.window {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        self.frames = 0;
        self.started = now;
        if elapsed > 0.0 {
            self.fps = Some(self.window as f64 / elapsed);
        }
        self.fps
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}

/// Everything the main loop does that does not depend on the display backend.
pub struct Scope {
    config: ScopeConfig,
    window_size: (i32, i32),
    window: WindowBuffer,
    renderer: GraticuleRenderer,
    panel: Panel,
    step: Rc<Cell<usize>>,
    samples: SampleQueue,
    control: ControlSender,
    acquisition: Option<Acquisition>,
    hud: Fonts,
    frame_rate: FrameRate,
    backlog: usize,
    pointer: Option<Point>,
    snapshots: u32,
    sampler_lost: bool,
    quit: bool,
}

impl Scope {
    pub fn new(
        config: ScopeConfig,
        fonts: &Fonts,
        samples: SampleQueue,
        control: ControlSender,
    ) -> Result<Self, ScopeError> {
        let (plot_w, plot_h) = config.plot_size(config.window_size);
        let geometry = PlotGeometry::new(plot_w, plot_h);
        let step = Rc::new(Cell::new(1));
        let panel = settings_panel(fonts, &config, plot_h, control.clone(), step.clone())?;
        log::info!(
            "scope: {}x{} plot, {} samples per window",
            plot_w,
            plot_h,
            geometry.sample_count()
        );
        Ok(Self {
            window_size: (config.window_size.0 as i32, config.window_size.1 as i32),
            window: WindowBuffer::new(geometry.sample_count()),
            renderer: GraticuleRenderer::new(geometry),
            panel,
            step,
            samples,
            control,
            acquisition: None,
            hud: Fonts::new(config.hud_font_size),
            frame_rate: FrameRate::new(config.fps_window, Instant::now()),
            backlog: 0,
            pointer: None,
            snapshots: 0,
            sampler_lost: false,
            quit: false,
            config,
        })
    }

    /// Hand over the sampler so quitting or dropping the scope joins it.
    pub fn with_acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = Some(acquisition);
        self
    }

    pub fn frame_interval(&self) -> Duration {
        self.config.frame_interval()
    }

    #[cfg(test)]
    pub fn step(&self) -> usize {
        self.step.get()
    }

    #[cfg(test)]
    pub fn backlog(&self) -> usize {
        self.backlog
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[cfg(test)]
    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    #[cfg(test)]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Returns true when the event was used.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Quit | InputEvent::KeyDown('q') => {
                log::info!("scope: quit requested");
                self.quit = true;
                true
            }
            InputEvent::KeyDown('0') => self.panel.reset(panel::ZOOM),
            InputEvent::KeyDown('s') => {
                if let Err(err) = self.snapshot() {
                    log::warn!("scope: snapshot failed: {err}");
                }
                true
            }
            InputEvent::KeyDown(_) => false,
            InputEvent::PointerDown(pos) => self.panel.press(pos),
            InputEvent::PointerUp(pos) => self.panel.release(pos),
            InputEvent::PointerMove(pos) => {
                self.pointer = Some(pos);
                self.panel.track(pos)
            }
        }
    }

    /// Move everything the sampler produced since the last frame into the window.
    /// Once the sampler is gone the window freezes and its controls are dimmed.
    pub fn update(&mut self) -> usize {
        self.backlog = self.window.extend(self.samples.drain());
        if !self.sampler_lost && !self.samples.is_connected() {
            self.sampler_lost = true;
            log::warn!("scope: sampler stopped, acquisition controls disabled");
            for index in panel::ACQUISITION {
                self.panel.enable(index, false);
            }
        }
        self.backlog
    }

    /// Count a displayed frame for the rate readout.
    pub fn tick(&mut self, now: Instant) {
        self.frame_rate.tick(now);
    }

    /// Plot, HUD, then the panel with the focused widget on top.
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let (w, h) = self.window_size;
        canvas.fill_rect(Rect::new(0, 0, w, h), Color::BLACK);
        self.renderer.draw(canvas, &self.window, self.step.get());
        self.draw_hud(canvas);
        self.panel.draw(canvas);
    }

    fn draw_hud<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let geometry = self.renderer.geometry();
        let (fps, fps_color) = match self.frame_rate.fps() {
            Some(fps) => (format!("fps: {fps:5.2}"), FPS_COLOR),
            None => ("fps:  0.00".to_owned(), FPS_IDLE_COLOR),
        };
        let fps_x = geometry.size.0 - self.hud.text_width(&fps) - 15;
        let batch = format!("batch: {}", self.backlog);
        let status = match self.pointer {
            Some(p) => format!("pos: {},{}", p.x, p.y),
            None => "pos:".to_owned(),
        };
        let status_y = self.window_size.1 - 1 - self.hud.line_height;

        self.hud_text(canvas, Point::new(15, 0), &self.config.title, TITLE_COLOR);
        self.hud_text(canvas, Point::new(geometry.x0, 0), &batch, BATCH_COLOR);
        self.hud_text(canvas, Point::new(fps_x, 0), &fps, fps_color);
        self.hud_text(canvas, Point::new(15, status_y), &status, STATUS_COLOR);
    }

    /// HUD strings are placed by their top-left corner.
    fn hud_text<C: Canvas + ?Sized>(&self, canvas: &mut C, at: Point, text: &str, color: Color) {
        let (w, h) = self.hud.text_size(text);
        let center = Point::new(at.x + w / 2, at.y + h / 2);
        canvas.draw_text(center, text, color, self.hud.size);
    }

    /// Write the current frame to `scope-NNN.png` in the working directory.
    pub fn snapshot(&mut self) -> Result<PathBuf, ScopeError> {
        let mut frame = DisplayList::new();
        self.render(&mut frame);
        let path = PathBuf::from(format!("scope-{:03}.png", self.snapshots));
        let (w, h) = self.window_size;
        save_png(&frame, w.max(0) as u32, h.max(0) as u32, &path)?;
        self.snapshots += 1;
        Ok(path)
    }

    /// Clear the run flag, tell the sampler, then wait for it. Safe to call
    /// more than once.
    pub fn shutdown(&mut self) -> Option<SamplerReport> {
        let mut acquisition = self.acquisition.take()?;
        acquisition.stop();
        self.control.send(ControlCommand::Shutdown);
        acquisition.shutdown()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.shutdown();
    }
}
