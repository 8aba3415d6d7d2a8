use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Failures of a single render pass. Validation errors are raised before any
/// pixel is committed, so a failed render never leaves a partial image behind.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("scale must be a finite number greater than zero, got {scale}")]
    InvalidScale { scale: f32 },

    #[error("node {node} has invalid geometry (x={x}, y={y}, width={width}, height={height})")]
    InvalidGeometry {
        node: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    #[error("edge {edge} references unknown node {node}")]
    UnresolvedReference { edge: String, node: String },

    #[error("canvas would be empty ({width}x{height} px)")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("canvas of {width}x{height} px exceeds the limit of {limit} pixels")]
    CanvasTooLarge { width: u32, height: u32, limit: u64 },

    #[error("failed to encode PNG: {message}")]
    Encode { message: String },

    #[error("failed to write {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures while reading map documents or config files.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed map document: {message}")]
    Malformed { message: String },

    #[error("malformed config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid color {value:?}: expected #RRGGBB")]
    InvalidColor { value: String },
}
