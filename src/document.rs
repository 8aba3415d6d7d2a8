use crate::config::RenderConfig;
use crate::error::DocumentError;
use crate::ir::{ArrowType, Bounds, Edge, LineStyle, Node, Valence};
use crate::render::RenderRequest;
use crate::theme::Theme;
use serde::Deserialize;
use std::path::Path;

/// A concept map as stored: boxes, connectors and an optional scale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub scale: Option<f32>,
}

impl MapDocument {
    /// A scale stored in the document wins over the configured one.
    pub fn into_request(self, mut config: RenderConfig, theme: Theme) -> RenderRequest {
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        RenderRequest::new(self.nodes, self.edges)
            .with_config(config)
            .with_theme(theme)
    }
}

/// Record ids arrive as database integers or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_key(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return int.to_string();
                }
                // json5 hands every number over as a float
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => {
                        (float as i64).to_string()
                    }
                    _ => number.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: RawId,
    #[serde(alias = "x_pos")]
    x: f32,
    #[serde(alias = "y_pos")]
    y: f32,
    width: f32,
    height: f32,
    #[serde(default, alias = "category")]
    shape: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EdgeRecord {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(alias = "starting_block")]
    start: RawId,
    #[serde(alias = "ending_block")]
    end: RawId,
    #[serde(default, alias = "line_style")]
    line_style: Option<String>,
    #[serde(default, alias = "arrow_type")]
    arrow_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
    #[serde(default)]
    scale: Option<f32>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Node::new(
            record.id.into_key(),
            Bounds::new(record.x, record.y, record.width, record.height),
            Valence::from_tag(record.shape.as_deref().unwrap_or_default()),
            record.title.unwrap_or_default(),
        )
    }
}

impl EdgeRecord {
    fn into_edge(self, position: usize) -> Edge {
        let id = match self.id {
            Some(id) => id.into_key(),
            None => format!("edge-{position}"),
        };
        let style = self
            .line_style
            .as_deref()
            .map(LineStyle::from_tag)
            .unwrap_or_default();
        let arrow = self
            .arrow_type
            .as_deref()
            .map(ArrowType::from_tag)
            .unwrap_or_default();
        Edge::new(id, self.start.into_key(), self.end.into_key(), style, arrow)
    }
}

/// Parses a JSON5 (or plain JSON) map document.
pub fn parse_document(input: &str) -> Result<MapDocument, DocumentError> {
    let value: serde_json::Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(_) => json5::from_str(input).map_err(|err| DocumentError::Malformed {
            message: err.to_string(),
        })?,
    };
    let file: DocumentFile = serde_json::from_value(value).map_err(|err| DocumentError::Malformed {
        message: err.to_string(),
    })?;

    let nodes: Vec<Node> = file.nodes.into_iter().map(Node::from).collect();
    let edges: Vec<Edge> = file
        .edges
        .into_iter()
        .enumerate()
        .map(|(position, record)| record.into_edge(position))
        .collect();
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "parsed map document");
    Ok(MapDocument {
        nodes,
        edges,
        scale: file.scale,
    })
}

pub fn load_document(path: &Path) -> Result<MapDocument, DocumentError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&contents)
}
