// src/main.rs
mod canvas;
mod config;
mod drivers;
mod gui;
mod scope;
mod types;
mod widgets;

use anyhow::{anyhow, Context};
use eframe::egui;
use egui::IconData;
use log::LevelFilter;

use crate::canvas::{Canvas, DisplayList};
use crate::config::{ScopeConfig, CONFIG_FILE};
use crate::drivers::{
    open_sensor, rasterize, select_source, Acquisition, AcquisitionSettings, ScopeError,
};
use crate::scope::Scope;
use crate::types::{Color, Point, Rect};
use crate::widgets::Fonts;

const ICON_SIZE: u32 = 32;

/// A tiny trace on a black square, rendered with the same display-list path as snapshots.
fn app_icon() -> Option<IconData> {
    let n = ICON_SIZE as i32;
    let mut icon = DisplayList::new();
    icon.draw_rect(Rect::new(0, 0, n, n), Color::WHITE, 2);
    icon.draw_line(Point::new(2, n / 2), Point::new(n - 3, n / 2), Color(64, 64, 64));
    let wave: Vec<Point> = (2..n - 2)
        .map(|x| {
            let phase = (x - 2) as f64 / (n - 4) as f64 * std::f64::consts::TAU;
            Point::new(x, n / 2 - (phase.sin() * (n / 3) as f64).round() as i32)
        })
        .collect();
    icon.draw_line_strip(&wave, Color(200, 200, 0));
    let image = match rasterize(&icon, ICON_SIZE, ICON_SIZE) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("no window icon: {err}");
            return None;
        }
    };
    let rgba = image::DynamicImage::ImageRgb8(image).to_rgba8();
    Some(IconData {
        rgba: rgba.into_raw(),
        width: ICON_SIZE,
        height: ICON_SIZE,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = ScopeConfig::load_or_default(CONFIG_FILE)?;
    let fonts = Fonts::init(config.font_size);
    let initial = config.initial;
    let settings = AcquisitionSettings::from_indices(initial.rate, initial.range, initial.mode)
        .context("initial acquisition settings")?;

    let i2c_path = config.i2c_path.clone();
    let force_synthetic = config.force_synthetic;
    let (acquisition, samples, control) = Acquisition::spawn(move || {
        let sensor = if force_synthetic {
            Err(ScopeError::HardwareUnavailable("disabled in config".into()))
        } else {
            open_sensor(&i2c_path)
        };
        select_source(sensor, settings)
    })
    .context("spawning sampler thread")?;

    let scope = Scope::new(config.clone(), fonts, samples, control)
        .context("building the control panel")?
        .with_acquisition(acquisition);

    let (width, height) = config.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_resizable(false)
        .with_title(config.title.as_str());
    let viewport = match app_icon() {
        Some(icon) => viewport.with_icon(icon),
        None => viewport,
    };
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "accelscope",
        options,
        Box::new(move |_cc| Box::new(gui::ScopeApp::new(scope))),
    )
    .map_err(|err| anyhow!("display: {err}"))?;
    log::info!("bye");
    Ok(())
}
