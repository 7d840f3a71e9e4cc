use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::canvas::{DisplayList, Primitive};
use crate::drivers::ScopeError;
use crate::types::{Color, Point};

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn coord(p: Point) -> (i32, i32) {
    (p.x, p.y)
}

/// Render a display list off-screen into an RGB image.
pub fn rasterize(list: &DisplayList, width: u32, height: u32) -> Result<RgbImage, ScopeError> {
    if width == 0 || height == 0 {
        return Err(ScopeError::Render(format!(
            "empty raster size {width}x{height}"
        )));
    }
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&BLACK)?;
        for primitive in list.primitives() {
            match primitive {
                Primitive::LineStrip(points, color) => {
                    let path: Vec<(i32, i32)> = points.iter().copied().map(coord).collect();
                    root.draw(&PathElement::new(path, rgb(*color)))?;
                }
                Primitive::Line(a, b, color) => {
                    root.draw(&PathElement::new(vec![coord(*a), coord(*b)], rgb(*color)))?;
                }
                Primitive::Rect(rect, color, stroke) => {
                    // nested 1px outlines, growing inwards
                    for k in 0..(*stroke).max(1) {
                        let corners = [
                            (rect.x + k, rect.y + k),
                            (rect.right() - 1 - k, rect.bottom() - 1 - k),
                        ];
                        root.draw(&Rectangle::new(corners, rgb(*color)))?;
                    }
                }
                Primitive::Fill(rect, color) => {
                    let corners = [(rect.x, rect.y), (rect.right() - 1, rect.bottom() - 1)];
                    root.draw(&Rectangle::new(corners, rgb(*color).filled()))?;
                }
                Primitive::Text(center, text, color, size) => {
                    let style = ("monospace", *size as f64)
                        .into_font()
                        .color(&rgb(*color))
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    root.draw(&Text::new(text.clone(), coord(*center), style))?;
                }
            }
        }
        root.present()?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ScopeError::Render("raster buffer size mismatch".into()))
}

/// Rasterize and write a PNG.
pub fn save_png(
    list: &DisplayList,
    width: u32,
    height: u32,
    path: impl AsRef<Path>,
) -> Result<(), ScopeError> {
    let image = rasterize(list, width, height)?;
    image.save_with_format(path.as_ref(), ImageFormat::Png)?;
    log::info!("snapshot written to {}", path.as_ref().display());
    Ok(())
}
