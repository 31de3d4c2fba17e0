use serde::{Deserialize, Serialize};

/// Where a label sits relative to its feature's anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Center,
    Right,
    Top,
    Left,
    Bottom,
}

impl Placement {
    /// The cardinal directions in retry order.
    pub const CARDINAL: [Placement; 4] = [
        Placement::Right,
        Placement::Top,
        Placement::Left,
        Placement::Bottom,
    ];

    /// Next candidate in the fixed cycle `Right -> Top -> Left -> Bottom ->
    /// Right`. A centred label enters the cycle at `Right`, so three retries
    /// from `Center` try right, top and left and never reach `Bottom`; a
    /// template that starts on a cardinal placement visits all four.
    pub fn next(self) -> Placement {
        match self {
            Placement::Center | Placement::Bottom => Placement::Right,
            Placement::Right => Placement::Top,
            Placement::Top => Placement::Left,
            Placement::Left => Placement::Bottom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Center => "center",
            Placement::Right => "right",
            Placement::Top => "top",
            Placement::Left => "left",
            Placement::Bottom => "bottom",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" | "middle" => Some(Placement::Center),
            "right" | "east" => Some(Placement::Right),
            "top" | "north" => Some(Placement::Top),
            "left" | "west" => Some(Placement::Left),
            "bottom" | "south" => Some(Placement::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            line_height: 1.2,
        }
    }
}

/// How a feature's label is drawn.
///
/// Symbols are values: the template handed to a collision strategy is never
/// mutated, alternate placements are produced with [`LabelSymbol::next_placement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSymbol {
    pub style: TextStyle,
    /// Allow alternate placements when the preferred one collides.
    pub auto: bool,
    pub placement: Placement,
    /// Gap in pixels between the anchor and a non-centred label.
    pub offset: f64,
}

impl Default for LabelSymbol {
    fn default() -> Self {
        Self {
            style: TextStyle::default(),
            auto: false,
            placement: Placement::Center,
            offset: 4.0,
        }
    }
}

impl LabelSymbol {
    pub fn new(style: TextStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// A copy of this symbol moved to the next placement in the cycle.
    pub fn next_placement(&self) -> LabelSymbol {
        LabelSymbol {
            placement: self.placement.next(),
            ..self.clone()
        }
    }
}
