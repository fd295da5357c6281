use equipcore::aggregate::{Rgba, ScatterSeries, Swatch, TypeDistribution};
use iced::{
    mouse,
    widget::canvas::{self, path::Arc as ArcSegment, Frame, Geometry, Path, Stroke, Text},
    Color, Point, Radians, Rectangle, Renderer, Size, Theme,
};
use std::f32::consts::{FRAC_PI_2, TAU};

const BACKGROUND: Color = Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};
const AXIS: Color = Color {
    r: 0.35,
    g: 0.35,
    b: 0.45,
    a: 1.0,
};
const LABEL: Color = Color {
    r: 0.8,
    g: 0.8,
    b: 0.85,
    a: 1.0,
};
const PADDING: f32 = 28.0;

pub fn to_color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Height of a bar for `value` when `peak` fills `height`.
pub fn bar_extent(value: f64, peak: f64, height: f32) -> f32 {
    if peak <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / peak).clamp(0.0, 1.0) as f32 * height
}

/// Start and end angle of each wedge, clockwise from twelve o'clock.
pub fn wedge_angles(shares: &[f64]) -> Vec<(f32, f32)> {
    let total: f64 = shares.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = -FRAC_PI_2;
    shares
        .iter()
        .map(|share| {
            let sweep = (share / total) as f32 * TAU;
            let wedge = (start, start + sweep);
            start += sweep;
            wedge
        })
        .collect()
}

fn label(frame: &mut Frame, content: impl Into<String>, position: Point) {
    frame.fill_text(Text {
        content: content.into(),
        position,
        color: LABEL,
        size: 12.0.into(),
        ..Text::default()
    });
}

/// One measure per equipment type, one bar each.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub bars: Vec<(String, f64)>,
    pub swatch: Swatch,
}

impl<Message> canvas::Program<Message> for BarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
        if self.bars.is_empty() {
            return vec![frame.into_geometry()];
        }

        let peak = self.bars.iter().map(|(_, value)| *value).fold(0.0, f64::max);
        let plot_height = bounds.height - 2.0 * PADDING;
        let slot = (bounds.width - 2.0 * PADDING) / self.bars.len() as f32;
        let fill = to_color(self.swatch.fill);
        let border = to_color(self.swatch.border);

        for (idx, (name, value)) in self.bars.iter().enumerate() {
            let height = bar_extent(*value, peak, plot_height);
            let x = PADDING + idx as f32 * slot + slot * 0.15;
            let top = bounds.height - PADDING - height;
            let size = Size::new(slot * 0.7, height);
            frame.fill_rectangle(Point::new(x, top), size, fill);
            frame.stroke(
                &Path::rectangle(Point::new(x, top), size),
                Stroke::default().with_color(border).with_width(1.0),
            );
            label(&mut frame, format!("{value:.1}"), Point::new(x, top - 14.0));
            label(
                &mut frame,
                name.clone(),
                Point::new(x, bounds.height - PADDING + 4.0),
            );
        }

        let baseline = Path::line(
            Point::new(PADDING, bounds.height - PADDING),
            Point::new(bounds.width - PADDING, bounds.height - PADDING),
        );
        frame.stroke(&baseline, Stroke::default().with_color(AXIS));
        vec![frame.into_geometry()]
    }
}

/// Type shares as a ring.
#[derive(Debug, Clone)]
pub struct DonutChart {
    pub distribution: TypeDistribution,
}

impl<Message> canvas::Program<Message> for DonutChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let center = Point::new(bounds.height / 2.0, bounds.height / 2.0);
        let radius = bounds.height / 2.0 - 12.0;
        let slices: Vec<_> = self.distribution.slices().collect();
        let shares: Vec<f64> = slices.iter().map(|slice| slice.share).collect();

        for (slice, (start, end)) in slices.iter().zip(wedge_angles(&shares)) {
            let wedge = Path::new(|builder| {
                builder.move_to(center);
                builder.arc(ArcSegment {
                    center,
                    radius,
                    start_angle: Radians(start),
                    end_angle: Radians(end),
                });
                builder.close();
            });
            frame.fill(&wedge, to_color(slice.swatch.fill));
            frame.stroke(
                &wedge,
                Stroke::default()
                    .with_color(to_color(slice.swatch.border))
                    .with_width(1.0),
            );
        }
        frame.fill(&Path::circle(center, radius * 0.55), BACKGROUND);

        let legend_x = bounds.height + 8.0;
        for (idx, slice) in slices.iter().enumerate() {
            let y = 16.0 + idx as f32 * 18.0;
            frame.fill_rectangle(
                Point::new(legend_x, y),
                Size::new(10.0, 10.0),
                to_color(slice.swatch.border),
            );
            label(&mut frame, slice.caption(), Point::new(legend_x + 16.0, y - 2.0));
        }
        vec![frame.into_geometry()]
    }
}

/// Pressure against temperature, one marker per item.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    pub series: ScatterSeries,
    pub swatch: Swatch,
}

impl<Message> canvas::Program<Message> for ScatterPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let width = bounds.width - 2.0 * PADDING;
        let height = bounds.height - 2.0 * PADDING;
        let axes = Path::new(|builder| {
            builder.move_to(Point::new(PADDING, PADDING));
            builder.line_to(Point::new(PADDING, bounds.height - PADDING));
            builder.line_to(Point::new(bounds.width - PADDING, bounds.height - PADDING));
        });
        frame.stroke(&axes, Stroke::default().with_color(AXIS).with_width(1.0));

        let marker_color = to_color(self.swatch.border);
        for point in &self.series.points {
            let x = PADDING + self.series.x_bounds.normalize(point.x) as f32 * width;
            let y = bounds.height - PADDING - self.series.y_bounds.normalize(point.y) as f32 * height;
            frame.fill(&Path::circle(Point::new(x, y), 4.0), marker_color);
        }

        let x_bounds = self.series.x_bounds;
        let y_bounds = self.series.y_bounds;
        label(
            &mut frame,
            format!("Pressure {:.1} to {:.1}", x_bounds.min, x_bounds.max),
            Point::new(PADDING, bounds.height - PADDING + 6.0),
        );
        label(
            &mut frame,
            format!("Temperature {:.1} to {:.1}", y_bounds.min, y_bounds.max),
            Point::new(PADDING + 4.0, 6.0),
        );
        vec![frame.into_geometry()]
    }
}
