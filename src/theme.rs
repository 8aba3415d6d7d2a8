use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::ir::Valence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = DocumentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DocumentError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub fill: Rgb,
    pub border: Rgb,
}

impl Palette {
    pub const fn new(fill: Rgb, border: Rgb) -> Self {
        Self { fill, border }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub negative: Palette,
    pub positive: Palette,
    pub neutral: Palette,
    pub ambivalent: Palette,
    pub connector: Rgb,
    pub text: Rgb,
    pub background: Rgb,
}

impl Theme {
    /// Palette of the classic concept-map editor.
    pub fn classic() -> Self {
        Self {
            negative: Palette::new(Rgb::new(0xE0, 0xBA, 0xB6), Rgb::new(0xB8, 0x42, 0x42)),
            positive: Palette::new(Rgb::new(0xD8, 0xE4, 0xD6), Rgb::new(0x95, 0xBC, 0x95)),
            neutral: Palette::new(Rgb::new(0xF2, 0xE6, 0xC0), Rgb::new(0xDF, 0xB4, 0x31)),
            ambivalent: Palette::new(Rgb::new(0xCF, 0xC7, 0xD2), Rgb::new(0x7E, 0x5A, 0x7F)),
            connector: Rgb::new(0x77, 0x77, 0x77),
            text: Rgb::BLACK,
            background: Rgb::WHITE,
        }
    }

    pub fn palette(&self, valence: Valence) -> Palette {
        match valence {
            Valence::Negative(_) => self.negative,
            Valence::Positive(_) => self.positive,
            Valence::Neutral => self.neutral,
            Valence::Ambivalent => self.ambivalent,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Strength;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#777777".parse::<Rgb>().unwrap(), Rgb::new(0x77, 0x77, 0x77));
        assert_eq!(" #b84242 ".parse::<Rgb>().unwrap(), Rgb::new(0xB8, 0x42, 0x42));
        assert!("777777".parse::<Rgb>().is_err());
        assert!("#77777".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102FF");
    }

    #[test]
    fn palettes_are_distinct_per_valence() {
        let theme = Theme::classic();
        let palettes = [
            theme.palette(Valence::Negative(Strength::Weak)),
            theme.palette(Valence::Positive(Strength::Normal)),
            theme.palette(Valence::Neutral),
            theme.palette(Valence::Ambivalent),
        ];
        for (i, a) in palettes.iter().enumerate() {
            for b in palettes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            theme.palette(Valence::Negative(Strength::Strong)),
            theme.palette(Valence::Negative(Strength::Weak))
        );
    }

    #[test]
    fn theme_round_trips_through_json() {
        let theme = Theme::classic();
        let json = serde_json::to_string(&theme).unwrap();
        assert!(json.contains("\"#777777\""));
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
    }
}
