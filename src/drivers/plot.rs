use crate::canvas::{Canvas, DisplayList};
use crate::drivers::buffer::WindowBuffer;
use crate::types::{Color, Point, Rect};

const X_DIVISIONS: i32 = 10;
const Y_DIVISIONS: i32 = 8;
const SUB_TICKS: i32 = 5;
const TICK_LEN: i32 = 4;

const BORDER: Color = Color(255, 255, 255);
const GRID: Color = Color(64, 64, 64);
const SUB_DIVIDER: Color = Color(128, 128, 128);

pub const TRACE_COLORS: [Color; 3] = [Color(200, 200, 0), Color(0, 200, 0), Color(0, 200, 200)];

/// Pixel layout of the plot area. Division sizes are snapped so every grid
/// line and tick lands on a whole pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotGeometry {
    pub size: (i32, i32),
    pub xlim: (i32, i32),
    pub ylim: (i32, i32),
    pub x0: i32,
    pub y0: i32,
    pub xline: i32,
    pub yline: i32,
}

/// Snap one axis: returns (centre, division, limits).
fn snap_axis(min: i32, max: i32, divisions: i32) -> (i32, i32, (i32, i32)) {
    let span = max - min;
    let centre = min + span / 2;
    let line = (span / divisions) / SUB_TICKS * SUB_TICKS;
    let size = line * divisions;
    (centre, line, (centre - size / 2, centre + size / 2))
}

impl PlotGeometry {
    pub fn new(width: i32, height: i32) -> Self {
        let (x0, xline, xlim) = snap_axis(5, width - 5, X_DIVISIONS);
        let (y0, yline, ylim) = snap_axis(20, height, Y_DIVISIONS);
        Self {
            size: (width, height),
            xlim,
            ylim,
            x0,
            y0,
            xline,
            yline,
        }
    }

    pub fn xlim_width(&self) -> i32 {
        self.xlim.1 - self.xlim.0
    }

    pub fn ylim_height(&self) -> i32 {
        self.ylim.1 - self.ylim.0
    }

    /// Window capacity: one sample per pixel column at zoom 1.
    pub fn sample_count(&self) -> usize {
        self.xlim_width().max(0) as usize
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1)
    }

    /// Samples that fit across the plot at `step` pixels each, rounded up.
    pub fn visible(&self, step: usize) -> usize {
        let step = step.max(1);
        (self.sample_count() + step - 1) / step
    }

    /// Screen y of a value; 100 units span the full plot height.
    pub fn value_to_y(&self, value: f64) -> i32 {
        let scale = self.ylim_height() as f64 * 0.01;
        self.y0 - (value * scale).round() as i32
    }
}

/// Draws the static graticule once and the three traces every frame.
pub struct GraticuleRenderer {
    geometry: PlotGeometry,
    backdrop: DisplayList,
}

impl GraticuleRenderer {
    pub fn new(geometry: PlotGeometry) -> Self {
        let backdrop = build_backdrop(&geometry);
        log::debug!(
            "graticule: {}x{} plot, xlim {:?}, ylim {:?}",
            geometry.size.0,
            geometry.size.1,
            geometry.xlim,
            geometry.ylim
        );
        Self { geometry, backdrop }
    }

    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }

    #[cfg(test)]
    pub fn backdrop(&self) -> &DisplayList {
        &self.backdrop
    }

    /// Polyline points for one channel over the newest visible samples.
    pub fn trace(&self, window: &WindowBuffer, channel: usize, step: usize) -> Vec<Point> {
        let step = step.max(1);
        let g = &self.geometry;
        window
            .latest(g.visible(step))
            .enumerate()
            .map(|(i, s)| {
                Point::new(
                    g.xlim.0 + (i * step) as i32,
                    g.value_to_y(s.channel(channel)),
                )
            })
            .collect()
    }

    /// Backdrop then channels 0, 1, 2. Returns the region that changed.
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        window: &WindowBuffer,
        step: usize,
    ) -> Rect {
        canvas.blit(&self.backdrop);
        for (channel, color) in TRACE_COLORS.iter().enumerate() {
            let points = self.trace(window, channel, step);
            canvas.draw_line_strip(&points, *color);
        }
        self.geometry.rect()
    }
}

fn build_backdrop(g: &PlotGeometry) -> DisplayList {
    let mut bg = DisplayList::new();
    let (xmin, xmax) = g.xlim;
    let (ymin, ymax) = g.ylim;
    let xtick = g.xline / SUB_TICKS;
    let ytick = g.yline / SUB_TICKS;

    bg.fill_rect(g.rect(), Color::BLACK);
    bg.draw_rect(
        Rect::new(xmin - 2, ymin - 2, g.xlim_width() + 4, g.ylim_height() + 4),
        BORDER,
        2,
    );

    for i in 1..Y_DIVISIONS {
        let y = ymin + i * g.yline;
        bg.draw_line(Point::new(xmin, y), Point::new(xmax, y), GRID);
    }
    for i in 1..X_DIVISIONS {
        let x = xmin + i * g.xline;
        bg.draw_line(Point::new(x, ymin), Point::new(x, ymax), GRID);
    }

    for i in 1..Y_DIVISIONS * SUB_TICKS {
        let y = ymin + i * ytick;
        bg.draw_line(
            Point::new(g.x0 - TICK_LEN - 1, y),
            Point::new(g.x0 + TICK_LEN, y),
            SUB_DIVIDER,
        );
    }
    for i in 1..X_DIVISIONS * SUB_TICKS {
        let x = xmin + i * xtick;
        bg.draw_line(
            Point::new(x, g.y0 - TICK_LEN - 1),
            Point::new(x, g.y0 + TICK_LEN),
            SUB_DIVIDER,
        );
    }
    bg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Primitive;
    use crate::types::Sample;

    #[test]
    fn geometry_matches_default_window() {
        let g = PlotGeometry::new(1024, 470);
        assert_eq!(g.x0, 512);
        assert_eq!(g.xline, 100);
        assert_eq!(g.xlim, (12, 1012));
        assert_eq!(g.y0, 245);
        assert_eq!(g.yline, 55);
        assert_eq!(g.ylim, (25, 465));
        assert_eq!(g.sample_count(), 1000);
    }

    #[test]
    fn visible_rounds_up() {
        let g = PlotGeometry::new(1024, 470);
        assert_eq!(g.visible(1), 1000);
        assert_eq!(g.visible(3), 334);
        assert_eq!(g.visible(100), 10);
        assert_eq!(g.visible(0), 1000);
    }

    #[test]
    fn last_sample_maps_to_scaled_offset() {
        // 420 high gives ylim (20, 420): a 400 pixel plot, 500 wide window
        let g = PlotGeometry::new(510, 420);
        assert_eq!(g.ylim_height(), 400);
        assert_eq!(g.sample_count(), 500);
        let renderer = GraticuleRenderer::new(g);
        let mut window = WindowBuffer::new(g.sample_count());
        window.extend([Sample(50.0, -25.0, 0.0)]);
        let trace = renderer.trace(&window, 0, 1);
        assert_eq!(trace.len(), 500);
        let last = trace[499];
        assert_eq!(last.x, g.xlim.0 + 499);
        assert_eq!(last.y, g.y0 - 200);
        assert_eq!(renderer.trace(&window, 1, 1)[499].y, g.y0 + 100);
        // zero-prefilled history sits on the centre line
        assert_eq!(trace[0].y, g.y0);
    }

    #[test]
    fn zoom_strides_over_newest_samples() {
        let g = PlotGeometry::new(1024, 470);
        let renderer = GraticuleRenderer::new(g);
        let mut window = WindowBuffer::new(g.sample_count());
        window.extend((0..1000).map(|i| Sample(i as f64 * 0.01, 0.0, 0.0)));
        let trace = renderer.trace(&window, 0, 4);
        assert_eq!(trace.len(), 250);
        assert_eq!(trace[1].x - trace[0].x, 4);
        // the first plotted point is sample 750, not an average
        assert_eq!(trace[0].y, g.value_to_y(7.5));
    }

    #[test]
    fn backdrop_has_grid_and_ticks() {
        let renderer = GraticuleRenderer::new(PlotGeometry::new(1024, 470));
        let prims = renderer.backdrop().primitives();
        let count = |color: Color| {
            prims
                .iter()
                .filter(|p| matches!(p, Primitive::Line(_, _, c) if *c == color))
                .count()
        };
        assert_eq!(count(GRID), 7 + 9);
        assert_eq!(count(SUB_DIVIDER), 39 + 49);
        assert!(matches!(prims[0], Primitive::Fill(_, Color::BLACK)));
        assert_eq!(
            prims[1],
            Primitive::Rect(Rect::new(10, 23, 1004, 444), BORDER, 2)
        );
    }

    #[test]
    fn draw_blits_backdrop_then_three_traces() {
        let renderer = GraticuleRenderer::new(PlotGeometry::new(1024, 470));
        let window = WindowBuffer::new(1000);
        let mut frame = DisplayList::new();
        let region = renderer.draw(&mut frame, &window, 1);
        assert_eq!(region, Rect::new(0, 0, 1024, 470));
        let n = renderer.backdrop().primitives().len();
        let strips: Vec<Color> = frame.primitives()[n..]
            .iter()
            .map(|p| match p {
                Primitive::LineStrip(_, c) => *c,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(strips, TRACE_COLORS.to_vec());
    }
}
