#[cfg(feature = "cli")]
pub mod cli;
pub mod command;
pub mod config;
pub mod connector;
pub mod document;
pub mod error;
pub mod font;
pub mod geometry;
pub mod ir;
pub mod label;
pub mod raster;
pub mod render;
pub mod shape;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use document::{MapDocument, load_document, parse_document};
pub use error::{DocumentError, RenderError};
pub use ir::{ArrowType, Bounds, Edge, LineStyle, Node, Valence};
pub use render::{RenderRequest, compose, export_png, render_png, write_png};
pub use theme::Theme;
