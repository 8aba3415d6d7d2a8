use crate::command::DrawCommand;
use crate::config::RenderConfig;
use crate::connector::route_edge;
use crate::error::{RenderError, Result};
use crate::font::resolve_font;
use crate::geometry::Viewport;
use crate::ir::{Edge, Node};
use crate::label::layout_text;
use crate::raster::{RasterSurface, downsample, encode_png};
use crate::shape::render_shape;
use crate::theme::Theme;
use resvg::tiny_skia::Pixmap;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Immutable snapshot of one map export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub config: RenderConfig,
    pub theme: Theme,
}

impl RenderRequest {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            config: RenderConfig::default(),
            theme: Theme::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

/// Supersampled canvas extent. Only node positions count, so shapes at the
/// far right or bottom may be clipped.
pub fn canvas_size(nodes: &[Node], config: &RenderConfig) -> CanvasSize {
    let extent = |value: fn(&Node) -> f32| {
        let max = nodes.iter().map(value).fold(f32::NEG_INFINITY, f32::max);
        // 1.3 is inexact in f32; keep whole products like 1.3 * 5 * 120 whole
        let product = f64::from(config.margin) * f64::from(config.scale) * f64::from(max);
        let px = (product * (1.0 + 1e-6)).floor();
        if px.is_finite() && px > 0.0 { px as u32 } else { 0 }
    };
    CanvasSize {
        width: extent(|node| node.bounds.x),
        height: extent(|node| node.bounds.y),
    }
}

/// Final image size after the `1 / scale` downsample.
pub fn output_size(canvas: CanvasSize, scale: f32) -> CanvasSize {
    let shrink = |px: u32| (f64::from(px) / f64::from(scale)).floor() as u32;
    CanvasSize {
        width: shrink(canvas.width),
        height: shrink(canvas.height),
    }
}

/// Checks the whole snapshot before anything is drawn and returns the node
/// index used to resolve edge endpoints.
fn validate(request: &RenderRequest) -> Result<HashMap<&str, &Node>> {
    let scale = request.config.scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderError::InvalidScale { scale });
    }

    let mut index = HashMap::with_capacity(request.nodes.len());
    for node in &request.nodes {
        let b = node.bounds;
        if !b.fits_scale(scale) {
            return Err(RenderError::InvalidGeometry {
                node: node.id.clone(),
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            });
        }
        if index.insert(node.id.as_str(), node).is_some() {
            tracing::warn!(node = %node.id, "duplicate node id, last definition wins");
        }
    }

    for edge in &request.edges {
        for endpoint in [&edge.start, &edge.end] {
            if !index.contains_key(endpoint.as_str()) {
                return Err(RenderError::UnresolvedReference {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
    }
    Ok(index)
}

/// Ordered drawing commands for the request: connectors first, then shapes,
/// then labels on top.
///
/// Every label is emitted after every shape, rather than right after its own
/// shape, so a neighbouring box never covers a label. Dashes outside the
/// canvas are left out.
pub fn compose(request: &RenderRequest) -> Result<Vec<DrawCommand>> {
    let index = validate(request)?;
    let viewport = canvas_size(&request.nodes, &request.config).viewport();
    Ok(build_commands(request, &index, viewport))
}

fn build_commands(request: &RenderRequest, index: &HashMap<&str, &Node>, viewport: Viewport) -> Vec<DrawCommand> {
    let config = &request.config;
    let theme = &request.theme;
    let mut commands = Vec::new();

    for edge in &request.edges {
        let (Some(start), Some(end)) = (index.get(edge.start.as_str()), index.get(edge.end.as_str())) else {
            continue;
        };
        if edge.is_self_loop() {
            tracing::debug!(edge = %edge.id, "self-loop has no visible connector");
        }
        commands.extend(route_edge(
            &start.bounds,
            &end.bounds,
            edge.style,
            edge.arrow,
            config,
            theme.connector,
            viewport,
        ));
    }
    for node in &request.nodes {
        commands.extend(render_shape(node, config, theme));
    }
    for node in &request.nodes {
        commands.extend(layout_text(&node.title, &node.bounds, config, theme.text));
    }

    tracing::debug!(
        nodes = request.nodes.len(),
        edges = request.edges.len(),
        commands = commands.len(),
        "composed concept map"
    );
    commands
}

/// Pre-downsample canvas and final output size, refused when empty or over
/// `max_canvas_pixels`.
fn checked_canvas(request: &RenderRequest) -> Result<(CanvasSize, CanvasSize)> {
    let config = &request.config;
    let canvas = canvas_size(&request.nodes, config);
    let output = output_size(canvas, config.scale);
    if canvas.pixels() == 0 || output.pixels() == 0 {
        return Err(RenderError::EmptyCanvas {
            width: output.width,
            height: output.height,
        });
    }
    if canvas.pixels() > config.max_canvas_pixels {
        return Err(RenderError::CanvasTooLarge {
            width: canvas.width,
            height: canvas.height,
            limit: config.max_canvas_pixels,
        });
    }
    Ok((canvas, output))
}

/// Renders the request into its final, downsampled pixmap.
pub fn render_pixmap(request: &RenderRequest) -> Result<Pixmap> {
    let index = validate(request)?;
    let (canvas, output) = checked_canvas(request)?;
    let commands = build_commands(request, &index, canvas.viewport());
    let config = &request.config;

    let background = request.theme.background;
    let font = resolve_font(config);
    let mut surface = RasterSurface::new(canvas.width, canvas.height, background, font, config.font_px)
        .ok_or(RenderError::CanvasTooLarge {
            width: canvas.width,
            height: canvas.height,
            limit: config.max_canvas_pixels,
        })?;
    for command in &commands {
        command.apply(&mut surface);
    }
    if surface.skipped_text() > 0 {
        tracing::warn!(labels = surface.skipped_text(), "labels skipped for lack of a font");
    }

    tracing::debug!(
        canvas_width = canvas.width,
        canvas_height = canvas.height,
        width = output.width,
        height = output.height,
        "downsampling canvas"
    );
    downsample(surface.pixmap(), config.scale, output.width, output.height, background).ok_or(
        RenderError::EmptyCanvas {
            width: output.width,
            height: output.height,
        },
    )
}

pub fn render_png(request: &RenderRequest) -> Result<Vec<u8>> {
    encode_png(&render_pixmap(request)?)
}

pub fn write_png<W: Write>(request: &RenderRequest, mut writer: W) -> Result<()> {
    let png = render_png(request)?;
    writer.write_all(&png)?;
    writer.flush()?;
    Ok(())
}

/// Renders and writes a PNG so that `path` either keeps its previous content
/// or holds the complete new image.
pub fn export_png(request: &RenderRequest, path: &Path) -> Result<()> {
    let png = render_png(request)?;
    write_atomic(path, &png)?;
    tracing::debug!(path = %path.display(), bytes = png.len(), "wrote PNG");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let sink_err = |source: std::io::Error| RenderError::Sink {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(sink_err)?;
    tmp.write_all(bytes).map_err(sink_err)?;
    tmp.as_file().sync_all().map_err(sink_err)?;
    tmp.persist(path).map_err(|err| sink_err(err.error))?;
    Ok(())
}
