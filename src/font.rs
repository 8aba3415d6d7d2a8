use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use ttf_parser::Face;

use crate::config::RenderConfig;

/// Raw bytes of one font face. Parsing is cheap, so faces are re-parsed per
/// draw call instead of holding a self-referential `Face`.
#[derive(Clone)]
pub struct FontData {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontData {
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Option<Self> {
        Face::parse(&data, index).ok()?;
        Some(Self {
            data: Arc::new(data),
            index,
        })
    }

    pub fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

static SYSTEM_FONTS: Lazy<Mutex<SystemFonts>> = Lazy::new(|| Mutex::new(SystemFonts::new()));

struct SystemFonts {
    db: Database,
    loaded: bool,
    cache: HashMap<String, Option<FontData>>,
}

impl SystemFonts {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded: false,
            cache: HashMap::new(),
        }
    }

    fn lookup(&mut self, font_family: &str) -> Option<FontData> {
        let key = normalize_family_key(font_family);
        if let Some(face) = self.cache.get(&key) {
            return face.clone();
        }
        if !self.loaded {
            self.db.load_system_fonts();
            self.loaded = true;
            tracing::debug!(faces = self.db.len(), "loaded system font database");
        }
        let face = self.query(&key);
        self.cache.insert(key, face.clone());
        face
    }

    fn query(&self, font_family: &str) -> Option<FontData> {
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" => Family::SansSerif,
                "monospace" => Family::Monospace,
                _ => Family::Name(*name),
            })
            .collect();
        // any face beats skipping the labels
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|face| face.id))?;
        self.db
            .with_face_data(id, |data, index| FontData::from_bytes(data.to_vec(), index))
            .flatten()
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

fn load_font_file(path: &Path) -> Option<FontData> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not read font file");
            return None;
        }
    };
    let face = FontData::from_bytes(bytes, 0);
    if face.is_none() {
        tracing::warn!(path = %path.display(), "font file is not a usable TrueType/OpenType face");
    }
    face
}

/// Picks the label font: the configured file first, then the system database.
pub fn resolve_font(config: &RenderConfig) -> Option<FontData> {
    if let Some(path) = config.font_path.as_deref()
        && let Some(face) = load_font_file(path)
    {
        return Some(face);
    }
    // the cache only ever grows, so a panicked holder leaves it usable
    let mut fonts = SYSTEM_FONTS.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("font cache lock was poisoned, reusing it");
        poisoned.into_inner()
    });
    let face = fonts.lookup(&config.font_family);
    if face.is_none() {
        tracing::warn!(family = %config.font_family, "no font available, labels will be skipped");
    }
    face
}
