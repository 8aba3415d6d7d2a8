use crate::command::DrawCommand;
use crate::config::RenderConfig;
use crate::geometry::{Point, Viewport, center, diagonal, slope_angle};
use crate::ir::{ArrowType, Bounds, DashPattern, LineStyle, Strength};
use crate::theme::Rgb;

/// Shaft fraction used for the head of a solid arrowed connector.
const SOLID_TIP_RATIO: f32 = 0.1;

/// Per-dash shift of an arrowed dashed connector, as multiples of the target
/// box (width, height) projected on the connector direction.
/// Indexed by `[dx >= 0][dy >= 0]`.
const DASH_OFFSET: [[(f32, f32); 2]; 2] = [[(-1.0, -0.5), (-1.0, -1.5)], [(0.5, 0.5), (0.5, 0.5)]];

pub fn connector_thickness(style: LineStyle, scale: f32) -> f32 {
    let units = match style.weight {
        Strength::Strong => 4.0,
        Strength::Weak => 2.0,
        Strength::Normal => 3.0,
    };
    units * scale
}

/// Drawing sequence for one edge between the `start` and `end` boxes.
///
/// Connectors of zero length (self-loops, coincident centers) produce nothing.
/// Dashes falling outside `viewport` are dropped, so the work done for a
/// dashed connector is bounded by the canvas, not by the edge length.
pub fn route_edge(
    start: &Bounds,
    end: &Bounds,
    style: LineStyle,
    arrow: ArrowType,
    config: &RenderConfig,
    color: Rgb,
    viewport: Viewport,
) -> Vec<DrawCommand> {
    let from = center(start);
    let to = center(end);
    let length = from.distance(to);
    if length == 0.0 || !(length * config.scale).is_finite() {
        return Vec::new();
    }

    let route = Route {
        from,
        to,
        end,
        length,
        scale: config.scale,
        thickness: connector_thickness(style, config.scale),
        color,
        viewport,
    };
    match (style.pattern, arrow.is_arrowed()) {
        (DashPattern::Solid, false) => route.solid(),
        (DashPattern::Solid, true) => route.solid_arrowed(),
        (DashPattern::Dashed, false) => route.dashed(config.dash_period),
        (DashPattern::Dashed, true) => route.dashed_arrowed(config.dash_period),
    }
}

struct Route<'a> {
    from: Point,
    to: Point,
    end: &'a Bounds,
    length: f32,
    scale: f32,
    thickness: f32,
    color: Rgb,
    viewport: Viewport,
}

impl Route<'_> {
    fn line(&self, from: Point, to: Point) -> DrawCommand {
        DrawCommand::Line {
            from,
            to,
            color: self.color,
            thickness: self.thickness,
        }
    }

    fn arrow(&self, from: Point, to: Point, tip_ratio: f32) -> DrawCommand {
        DrawCommand::ArrowedLine {
            from,
            to,
            color: self.color,
            thickness: self.thickness,
            tip_ratio,
        }
    }

    fn solid(&self) -> Vec<DrawCommand> {
        vec![self.line(self.from.scaled(self.scale), self.to.scaled(self.scale))]
    }

    /// Head pulled back from the end center by half the end box diagonal,
    /// followed by the legacy length-proportional correction.
    fn solid_arrowed(&self) -> Vec<DrawCommand> {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let theta = slope_angle(dx, dy);
        let (sin, cos) = theta.sin_cos();
        let dir = if dx >= 0.0 { 1.0 } else { -1.0 };
        let reach = 0.5 * diagonal(self.end);

        let head = Point::new(
            (self.to.x - dir * reach * cos) * self.scale - 0.5 * self.length * (1.0 - cos),
            (self.to.y - dir * reach * sin) * self.scale + 0.5 * self.length * sin,
        );
        vec![self.arrow(self.from.scaled(self.scale), head, SOLID_TIP_RATIO)]
    }

    /// Walks from the left-most center so the pattern does not depend on
    /// which end the edge was declared from.
    fn dashed(&self, period: usize) -> Vec<DrawCommand> {
        let (anchor, other) = if self.to.x < self.from.x {
            (self.to, self.from)
        } else {
            (self.from, self.to)
        };
        let theta = slope_angle(other.x - anchor.x, other.y - anchor.y);
        self.dashes(anchor, theta, (0.0, 0.0), self.length as usize, period)
    }

    fn dashed_arrowed(&self, period: usize) -> Vec<DrawCommand> {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let theta = slope_angle(dx, dy);
        let (sin, cos) = theta.sin_cos();
        let (mx, my) = DASH_OFFSET[usize::from(dx >= 0.0)][usize::from(dy >= 0.0)];
        let shift = (
            mx * self.scale * cos * self.end.width,
            my * self.scale * sin * self.end.height,
        );
        let step = self.stepper(self.from, theta, shift);
        let half = self.length / 2.0;

        let mut commands = self.dashes(self.from, theta, shift, half as usize, period);

        let cap = if dx < 0.0 {
            self.arrow(step(1.0), step(0.0), self.thickness)
        } else {
            self.arrow(step(half), step(half + 1.0), self.thickness)
        };
        commands.push(cap);
        commands
    }

    /// Unit segments `[i, i + 1]` for every `i < count` on the dash period,
    /// skipping those that cannot touch the viewport.
    fn dashes(&self, origin: Point, theta: f32, shift: (f32, f32), count: usize, period: usize) -> Vec<DrawCommand> {
        let period = period.max(1);
        let step = self.stepper(origin, theta, shift);
        let (sin, cos) = theta.sin_cos();
        let pad = self.thickness + self.scale;
        let visible = self
            .viewport
            .visible_steps(step(0.0), (self.scale * cos, self.scale * sin), count, pad);
        let first = visible.start.div_ceil(period) * period;

        (first..visible.end)
            .step_by(period)
            .map(|i| self.line(step(i as f32), step(i as f32 + 1.0)))
            .collect()
    }

    /// Pixel position `i` unit steps along `theta` from `origin`, plus `shift`.
    fn stepper(&self, origin: Point, theta: f32, shift: (f32, f32)) -> impl Fn(f32) -> Point {
        let (sin, cos) = theta.sin_cos();
        let base = origin.scaled(self.scale);
        let k = self.scale;
        move |i| base.offset(i * k * cos + shift.0, i * k * sin + shift.1)
    }
}
