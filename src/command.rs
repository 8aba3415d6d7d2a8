use crate::geometry::Point;
use crate::theme::Rgb;

/// One pixel-space drawing instruction. Thicknesses are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        thickness: f32,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgb,
        thickness: f32,
        filled: bool,
    },
    /// `angle` rotates the axes, in degrees.
    Ellipse {
        center: Point,
        axes: (f32, f32),
        angle: f32,
        color: Rgb,
        thickness: f32,
        filled: bool,
    },
    /// Line with an arrow head at `to`. Barb length is `tip_ratio` times the
    /// length of the shaft.
    ArrowedLine {
        from: Point,
        to: Point,
        color: Rgb,
        thickness: f32,
        tip_ratio: f32,
    },
    /// `anchor` is the left end of the text baseline.
    Text {
        text: String,
        anchor: Point,
        font_scale: f32,
        color: Rgb,
        thickness: f32,
    },
}

impl DrawCommand {
    pub fn points(&self) -> Vec<Point> {
        match self {
            DrawCommand::Line { from, to, .. } | DrawCommand::ArrowedLine { from, to, .. } => {
                vec![*from, *to]
            }
            DrawCommand::Polygon { points, .. } => points.clone(),
            DrawCommand::Ellipse { center, axes, .. } => {
                vec![*center, Point::new(axes.0, axes.1)]
            }
            DrawCommand::Text { anchor, .. } => vec![*anchor],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.points().into_iter().all(Point::is_finite)
    }

    pub fn apply<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            DrawCommand::Line {
                from,
                to,
                color,
                thickness,
            } => surface.draw_line(*from, *to, *color, *thickness),
            DrawCommand::Polygon {
                points,
                color,
                thickness,
                filled,
            } => surface.draw_polygon(points, *color, *thickness, *filled),
            DrawCommand::Ellipse {
                center,
                axes,
                angle,
                color,
                thickness,
                filled,
            } => surface.draw_ellipse(*center, *axes, *angle, *color, *thickness, *filled),
            DrawCommand::ArrowedLine {
                from,
                to,
                color,
                thickness,
                tip_ratio,
            } => surface.draw_arrow(*from, *to, *color, *thickness, *tip_ratio),
            DrawCommand::Text {
                text,
                anchor,
                font_scale,
                color,
                thickness,
            } => surface.draw_text(text, *anchor, *font_scale, *color, *thickness),
        }
    }
}

/// Raster primitives the composer draws through.
pub trait DrawSurface {
    fn draw_line(&mut self, from: Point, to: Point, color: Rgb, thickness: f32);

    fn draw_polygon(&mut self, points: &[Point], color: Rgb, thickness: f32, filled: bool);

    fn draw_ellipse(
        &mut self,
        center: Point,
        axes: (f32, f32),
        angle: f32,
        color: Rgb,
        thickness: f32,
        filled: bool,
    );

    fn draw_arrow(&mut self, from: Point, to: Point, color: Rgb, thickness: f32, tip_ratio: f32);

    fn draw_text(&mut self, text: &str, anchor: Point, font_scale: f32, color: Rgb, thickness: f32);
}
