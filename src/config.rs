use crate::error::DocumentError;
use crate::theme::{Palette, Rgb, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SCALE: f32 = 5.0;
pub const CANVAS_MARGIN: f32 = 1.3;
pub const FONT_SCALE: f32 = 2.0;
pub const DASH_PERIOD: usize = 8;

/// Everything a render pass needs besides the map itself. Passed explicitly so
/// concurrent passes never share ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per map unit before the final downsample.
    pub scale: f32,
    /// Canvas extent multiplier over the largest node position.
    pub margin: f32,
    pub font_scale: f32,
    /// Pixel height of a glyph em at `font_scale == 1`.
    pub font_px: f32,
    pub dash_period: usize,
    /// Vertical compression applied to hexagon outlines.
    pub hexagon_height_ratio: f32,
    /// Upper bound on the pre-downsample canvas area.
    pub max_canvas_pixels: u64,
    pub font_family: String,
    pub font_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            margin: CANVAS_MARGIN,
            font_scale: FONT_SCALE,
            font_px: 22.0,
            dash_period: DASH_PERIOD,
            hexagon_height_ratio: 0.6,
            max_canvas_pixels: 200_000_000,
            font_family: "sans-serif".to_string(),
            font_path: None,
        }
    }
}

impl RenderConfig {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub render: RenderConfig,
    pub theme: Theme,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PaletteFile {
    fill: Option<Rgb>,
    border: Option<Rgb>,
}

impl PaletteFile {
    fn merge_into(self, palette: &mut Palette) {
        if let Some(v) = self.fill {
            palette.fill = v;
        }
        if let Some(v) = self.border {
            palette.border = v;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    negative: Option<PaletteFile>,
    positive: Option<PaletteFile>,
    neutral: Option<PaletteFile>,
    ambivalent: Option<PaletteFile>,
    connector: Option<Rgb>,
    text: Option<Rgb>,
    background: Option<Rgb>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    scale: Option<f32>,
    font_family: Option<String>,
    font_path: Option<PathBuf>,
    max_canvas_pixels: Option<u64>,
    theme: Option<ThemeFile>,
}

/// Reads an optional JSON config file and merges it over the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, DocumentError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&contents)?;
    // relative font paths resolve against the config file
    if let Some(font_path) = config.render.font_path.as_mut()
        && font_path.is_relative()
        && let Some(parent) = path.parent()
    {
        *font_path = parent.join(&*font_path);
    }
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config, DocumentError> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(v) = parsed.scale {
        config.render.scale = v;
    }
    if let Some(v) = parsed.font_family {
        config.render.font_family = v;
    }
    if let Some(v) = parsed.font_path {
        config.render.font_path = Some(v);
    }
    if let Some(v) = parsed.max_canvas_pixels {
        config.render.max_canvas_pixels = v;
    }

    if let Some(theme) = parsed.theme {
        if let Some(p) = theme.negative {
            p.merge_into(&mut config.theme.negative);
        }
        if let Some(p) = theme.positive {
            p.merge_into(&mut config.theme.positive);
        }
        if let Some(p) = theme.neutral {
            p.merge_into(&mut config.theme.neutral);
        }
        if let Some(p) = theme.ambivalent {
            p.merge_into(&mut config.theme.ambivalent);
        }
        if let Some(v) = theme.connector {
            config.theme.connector = v;
        }
        if let Some(v) = theme.text {
            config.theme.text = v;
        }
        if let Some(v) = theme.background {
            config.theme.background = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_export_constants() {
        let config = RenderConfig::default();
        assert_eq!(config.scale, 5.0);
        assert_eq!(config.margin, 1.3);
        assert_eq!(config.font_scale, 2.0);
        assert_eq!(config.dash_period, 8);
        assert_eq!(config.with_scale(2.5).scale, 2.5);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let config = parse_config(
            r##"{
                "scale": 3,
                "fontFamily": "DejaVu Sans",
                "theme": {
                    "negative": { "fill": "#FF0000" },
                    "connector": "#101010"
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.render.scale, 3.0);
        assert_eq!(config.render.font_family, "DejaVu Sans");
        assert_eq!(config.render.margin, CANVAS_MARGIN);
        assert_eq!(config.theme.negative.fill, Rgb::new(255, 0, 0));
        assert_eq!(config.theme.negative.border, Theme::classic().negative.border);
        assert_eq!(config.theme.connector, Rgb::new(0x10, 0x10, 0x10));
    }

    #[test]
    fn margin_is_not_configurable_from_file() {
        let config = parse_config(r#"{ "margin": 9.0 }"#).unwrap();
        assert_eq!(config.render.margin, CANVAS_MARGIN);
    }

    #[test]
    fn bad_color_is_rejected() {
        let err = parse_config(r#"{ "theme": { "text": "black" } }"#).unwrap_err();
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }
}
