use resvg::tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Rect, Stroke, Transform,
};
use std::f32::consts::FRAC_PI_4;
use ttf_parser::OutlineBuilder;

use crate::command::DrawSurface;
use crate::error::RenderError;
use crate::font::FontData;
use crate::geometry::Point;
use crate::theme::Rgb;

/// `DrawSurface` over a tiny-skia pixmap.
pub struct RasterSurface {
    pixmap: Pixmap,
    font: Option<FontData>,
    font_px: f32,
    skipped_text: usize,
}

impl RasterSurface {
    /// Opaque canvas filled with `background`. `None` when the size is zero or
    /// too large to allocate.
    pub fn new(width: u32, height: u32, background: Rgb, font: Option<FontData>, font_px: f32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(color(background));
        Some(Self {
            pixmap,
            font,
            font_px,
            skipped_text: 0,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Text commands dropped because no font was available.
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    fn stroke(&mut self, path: &Path, rgb: Rgb, thickness: f32) {
        let stroke = Stroke {
            width: thickness.max(1.0),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(rgb), &stroke, Transform::identity(), None);
    }

    fn fill(&mut self, path: &Path, rgb: Rgb) {
        self.pixmap
            .fill_path(path, &paint(rgb), FillRule::Winding, Transform::identity(), None);
    }
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

fn paint(rgb: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb));
    paint.anti_alias = true;
    paint
}

fn segment_path(from: Point, to: Point) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

impl DrawSurface for RasterSurface {
    fn draw_line(&mut self, from: Point, to: Point, color: Rgb, thickness: f32) {
        if let Some(path) = segment_path(from, to) {
            self.stroke(&path, color, thickness);
        }
    }

    fn draw_polygon(&mut self, points: &[Point], color: Rgb, thickness: f32, filled: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for point in rest {
            pb.line_to(point.x, point.y);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };
        if filled {
            self.fill(&path, color);
        } else {
            self.stroke(&path, color, thickness);
        }
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        axes: (f32, f32),
        angle: f32,
        color: Rgb,
        thickness: f32,
        filled: bool,
    ) {
        let (a, b) = axes;
        let Some(rect) = Rect::from_xywh(center.x - a, center.y - b, 2.0 * a, 2.0 * b) else {
            return;
        };
        let Some(path) = PathBuilder::from_oval(rect) else {
            return;
        };
        let path = if angle != 0.0 {
            match path.transform(Transform::from_rotate_at(angle, center.x, center.y)) {
                Some(path) => path,
                None => return,
            }
        } else {
            path
        };
        if filled {
            self.fill(&path, color);
        } else {
            self.stroke(&path, color, thickness);
        }
    }

    fn draw_arrow(&mut self, from: Point, to: Point, color: Rgb, thickness: f32, tip_ratio: f32) {
        self.draw_line(from, to, color, thickness);
        let tip = from.distance(to) * tip_ratio;
        if tip <= 0.0 || !tip.is_finite() {
            return;
        }
        let back = (from.y - to.y).atan2(from.x - to.x);
        for barb in [back + FRAC_PI_4, back - FRAC_PI_4] {
            let end = to.offset(tip * barb.cos(), tip * barb.sin());
            self.draw_line(end, to, color, thickness);
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Point, font_scale: f32, color: Rgb, thickness: f32) {
        if text.is_empty() {
            return;
        }
        let Some(face) = self.font.as_ref().and_then(FontData::face) else {
            self.skipped_text += 1;
            return;
        };
        let px = font_scale * self.font_px;
        let units = face.units_per_em().max(1) as f32;
        let mut pen = GlyphPen {
            builder: PathBuilder::new(),
            origin: anchor,
            scale: px / units,
        };
        for ch in text.chars() {
            match face.glyph_index(ch) {
                Some(glyph) => {
                    let _ = face.outline_glyph(glyph, &mut pen);
                    let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as f32;
                    pen.origin.x += advance * pen.scale;
                }
                None => pen.origin.x += px * 0.5,
            }
        }
        let Some(path) = pen.builder.finish() else {
            return;
        };
        self.fill(&path, color);
        self.stroke(&path, color, thickness / 2.0);
    }
}

/// Maps font units (y up) onto the pixmap (y down) at the pen position.
struct GlyphPen {
    builder: PathBuilder,
    origin: Point,
    scale: f32,
}

impl GlyphPen {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin.x + x * self.scale, self.origin.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Shrinks the supersampled canvas by `1 / scale` with bilinear filtering.
pub fn downsample(source: &Pixmap, scale: f32, width: u32, height: u32, background: Rgb) -> Option<Pixmap> {
    let mut target = Pixmap::new(width, height)?;
    target.fill(color(background));
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_scale(1.0 / scale, 1.0 / scale),
        None,
    );
    Some(target)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    pixmap.encode_png().map_err(|err| RenderError::Encode {
        message: err.to_string(),
    })
}
