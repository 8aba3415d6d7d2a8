use crate::command::DrawCommand;
use crate::config::RenderConfig;
use crate::geometry::{Point, center};
use crate::ir::{Bounds, Node, Strength, Valence};
use crate::theme::{Palette, Theme};

// x-fractions of the hexagon's shoulder vertices
const HEX_INNER: f32 = 0.8 / 3.0;
const HEX_OUTER: f32 = 2.2 / 3.0;
const AMBIVALENT_ELLIPSE_DIVISOR: f32 = 2.25;

/// Boundary stroke width in map units before scaling.
fn boundary_units(valence: Valence) -> f32 {
    match valence {
        Valence::Negative(strength) | Valence::Positive(strength) => match strength {
            Strength::Strong => 8.0,
            Strength::Weak => 1.0,
            Strength::Normal => 4.0,
        },
        Valence::Neutral | Valence::Ambivalent => 4.0,
    }
}

/// Drawing sequence for one node's outline and body: each primitive is
/// stroked with the border color first, then filled on top.
pub fn render_shape(node: &Node, config: &RenderConfig, theme: &Theme) -> Vec<DrawCommand> {
    let scale = config.scale;
    let bounds = &node.bounds;
    let palette = theme.palette(node.valence);
    let thickness = boundary_units(node.valence) * scale;
    let mut commands = Vec::with_capacity(4);

    match node.valence {
        Valence::Negative(_) => {
            let hexagon = hexagon_points(bounds, config.hexagon_height_ratio, scale);
            push_polygon(&mut commands, hexagon, palette, thickness);
        }
        Valence::Positive(_) => {
            let axes = (bounds.width / 2.0 * scale, bounds.height / 2.0 * scale);
            push_ellipse(&mut commands, center(bounds).scaled(scale), axes, palette, thickness);
        }
        Valence::Neutral => {
            let corners = vec![
                Point::new(bounds.x, bounds.y),
                Point::new(bounds.x + bounds.width, bounds.y),
                Point::new(bounds.x + bounds.width, bounds.y + bounds.height),
                Point::new(bounds.x, bounds.y + bounds.height),
            ]
            .into_iter()
            .map(|p| p.scaled(scale))
            .collect();
            push_polygon(&mut commands, corners, palette, thickness);
        }
        Valence::Ambivalent => {
            let ratio = config.hexagon_height_ratio;
            let hexagon = hexagon_points(bounds, ratio, scale);
            push_polygon(&mut commands, hexagon, palette, thickness);

            let drawn_height = bounds.height * ratio;
            let ellipse_center = Point::new(
                bounds.x + bounds.width / 2.0,
                bounds.y + drawn_height / 2.0,
            );
            let axes = (
                bounds.width / AMBIVALENT_ELLIPSE_DIVISOR * scale,
                drawn_height / AMBIVALENT_ELLIPSE_DIVISOR * scale,
            );
            push_ellipse(&mut commands, ellipse_center.scaled(scale), axes, palette, thickness);
        }
    }

    commands
}

/// Flat-sided hexagon hanging from the top edge of `bounds`, compressed to
/// `height_ratio` of the box height.
pub fn hexagon_points(bounds: &Bounds, height_ratio: f32, scale: f32) -> Vec<Point> {
    let Bounds {
        x,
        y,
        width: w,
        height,
    } = *bounds;
    let h = height * height_ratio;
    [
        Point::new(x, y + h / 2.0),
        Point::new(x + w * HEX_INNER, y + h),
        Point::new(x + w * HEX_OUTER, y + h),
        Point::new(x + w, y + h / 2.0),
        Point::new(x + w * HEX_OUTER, y),
        Point::new(x + w * HEX_INNER, y),
    ]
    .into_iter()
    .map(|p| p.scaled(scale))
    .collect()
}

fn push_polygon(commands: &mut Vec<DrawCommand>, points: Vec<Point>, palette: Palette, thickness: f32) {
    commands.push(DrawCommand::Polygon {
        points: points.clone(),
        color: palette.border,
        thickness,
        filled: false,
    });
    commands.push(DrawCommand::Polygon {
        points,
        color: palette.fill,
        thickness,
        filled: true,
    });
}

fn push_ellipse(
    commands: &mut Vec<DrawCommand>,
    center: Point,
    axes: (f32, f32),
    palette: Palette,
    thickness: f32,
) {
    commands.push(DrawCommand::Ellipse {
        center,
        axes,
        angle: 0.0,
        color: palette.border,
        thickness,
        filled: false,
    });
    commands.push(DrawCommand::Ellipse {
        center,
        axes,
        angle: 0.0,
        color: palette.fill,
        thickness,
        filled: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::CallLog;

    fn node(tag: &str, bounds: Bounds) -> Node {
        Node::new("n", bounds, Valence::from_tag(tag), "title")
    }

    fn default_box() -> Bounds {
        Bounds::new(10.0, 20.0, 100.0, 50.0)
    }

    fn stroke_width(commands: &[DrawCommand]) -> f32 {
        match &commands[0] {
            DrawCommand::Polygon { thickness, .. } | DrawCommand::Ellipse { thickness, .. } => *thickness,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_hexagon_vertices() {
        let config = RenderConfig::default();
        let commands = render_shape(&node("negative", default_box()), &config, &Theme::classic());
        assert_eq!(commands.len(), 2);
        let DrawCommand::Polygon { points, filled, .. } = &commands[0] else {
            panic!("expected polygon");
        };
        assert!(!filled);
        assert_eq!(points.len(), 6);
        let h = 50.0 * 0.6;
        let expected = [
            (10.0, 20.0 + h / 2.0),
            (10.0 + 100.0 * HEX_INNER, 20.0 + h),
            (10.0 + 100.0 * HEX_OUTER, 20.0 + h),
            (110.0, 20.0 + h / 2.0),
            (10.0 + 100.0 * HEX_OUTER, 20.0),
            (10.0 + 100.0 * HEX_INNER, 20.0),
        ];
        for (point, (ex, ey)) in points.iter().zip(expected) {
            assert!((point.x - ex * 5.0).abs() < 1e-3);
            assert!((point.y - ey * 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn boundary_thickness_follows_strength() {
        let config = RenderConfig::default();
        let theme = Theme::classic();
        let cases = [
            ("negative strong", 40.0),
            ("negative weak", 5.0),
            ("negative", 20.0),
            ("positive strong", 40.0),
            ("positive weak", 5.0),
            ("positive", 20.0),
            ("neutral strong", 20.0),
            ("ambivalent weak", 20.0),
        ];
        for (tag, expected) in cases {
            let commands = render_shape(&node(tag, default_box()), &config, &theme);
            assert_eq!(stroke_width(&commands), expected, "{tag}");
        }
    }

    #[test]
    fn positive_is_a_box_centered_ellipse() {
        let config = RenderConfig::default();
        let commands = render_shape(&node("positive", default_box()), &config, &Theme::classic());
        let DrawCommand::Ellipse { center, axes, .. } = &commands[1] else {
            panic!("expected ellipse");
        };
        assert_eq!(*center, Point::new(60.0 * 5.0, 45.0 * 5.0));
        assert_eq!(*axes, (250.0, 125.0));
    }

    #[test]
    fn neutral_is_a_rectangle() {
        let config = RenderConfig::default();
        let commands = render_shape(&node("neutral", default_box()), &config, &Theme::classic());
        let DrawCommand::Polygon { points, .. } = &commands[0] else {
            panic!("expected polygon");
        };
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Point::new(50.0, 100.0));
        assert_eq!(points[2], Point::new(550.0, 350.0));
    }

    #[test]
    fn border_is_drawn_before_fill() {
        let config = RenderConfig::default();
        let mut log = CallLog::default();
        for command in render_shape(&node("ambivalent", default_box()), &config, &Theme::classic()) {
            command.apply(&mut log);
        }
        assert_eq!(log.0, vec!["polygon", "fill_polygon", "ellipse", "fill_ellipse"]);
    }

    #[test]
    fn unknown_category_renders_as_ambivalent() {
        let config = RenderConfig::default();
        let theme = Theme::classic();
        let unknown = render_shape(&node("totally-unrecognized", default_box()), &config, &theme);
        let ambivalent = render_shape(&node("ambivalent", default_box()), &config, &theme);
        assert_eq!(unknown, ambivalent);
    }

    #[test]
    fn positive_sizes_never_produce_non_finite_output() {
        let config = RenderConfig::default();
        let theme = Theme::classic();
        let sizes = [(1e-6, 1e-6), (0.5, 3000.0), (1e6, 1e-3), (17.3, 4.1)];
        for tag in ["negative strong", "positive weak", "neutral", "ambivalent", "?"] {
            for (w, h) in sizes {
                let commands = render_shape(&node(tag, Bounds::new(-40.0, 7.5, w, h)), &config, &theme);
                assert!(commands.iter().all(DrawCommand::is_finite), "{tag} {w}x{h}");
            }
        }
    }
}
