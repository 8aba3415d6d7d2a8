use std::fmt;

/// Axis-aligned box in map units, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Finite coordinates and a strictly positive size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Valid, and every edge stays finite once multiplied into pixel space.
    pub fn fits_scale(&self, scale: f32) -> bool {
        self.is_valid()
            && [
                self.x,
                self.x + self.width,
                self.y,
                self.y + self.height,
            ]
            .into_iter()
            .all(|edge| (edge * scale).is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    Strong,
    Weak,
    Normal,
}

impl Strength {
    fn from_tag(tag: &str) -> Self {
        if tag.contains("strong") {
            Self::Strong
        } else if tag.contains("weak") {
            Self::Weak
        } else {
            Self::Normal
        }
    }
}

/// Semantic polarity of a node. Neutral and ambivalent nodes carry no strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valence {
    Negative(Strength),
    Positive(Strength),
    Neutral,
    Ambivalent,
}

impl Valence {
    /// Resolves a free-form category tag. The first matching polarity wins in
    /// the order negative, positive, neutral; anything else is ambivalent.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag.contains("negative") {
            Self::Negative(Strength::from_tag(&tag))
        } else if tag.contains("positive") {
            Self::Positive(Strength::from_tag(&tag))
        } else if tag.contains("neutral") {
            Self::Neutral
        } else {
            Self::Ambivalent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashPattern {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineStyle {
    pub pattern: DashPattern,
    pub weight: Strength,
}

impl LineStyle {
    pub const SOLID: Self = Self {
        pattern: DashPattern::Solid,
        weight: Strength::Normal,
    };

    pub fn new(pattern: DashPattern, weight: Strength) -> Self {
        Self { pattern, weight }
    }

    /// Parses tags such as `Solid`, `Dashed-Strong` or `solid weak`. Anything
    /// that is not solid is drawn dashed.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let pattern = if tag.contains("solid") {
            DashPattern::Solid
        } else {
            DashPattern::Dashed
        };
        Self {
            pattern,
            weight: Strength::from_tag(&tag),
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::SOLID
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = match self.pattern {
            DashPattern::Solid => "Solid",
            DashPattern::Dashed => "Dashed",
        };
        match self.weight {
            Strength::Strong => write!(f, "{pattern}-Strong"),
            Strength::Weak => write!(f, "{pattern}-Weak"),
            Strength::Normal => f.write_str(pattern),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowType {
    #[default]
    None,
    Uni,
    /// Accepted, but drawn with a single head exactly like `Uni`.
    Bi,
}

impl ArrowType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Self::None,
            "bi" => Self::Bi,
            _ => Self::Uni,
        }
    }

    pub fn is_arrowed(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub bounds: Bounds,
    pub valence: Valence,
    pub title: String,
}

impl Node {
    pub fn new(id: impl Into<String>, bounds: Bounds, valence: Valence, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bounds,
            valence,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub start: String,
    pub end: String,
    pub style: LineStyle,
    pub arrow: ArrowType,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        style: LineStyle,
        arrow: ArrowType,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            style,
            arrow,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }
}
