use serde::{Deserialize, Serialize};

/// Colours and fonts for the SVG preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub label_color: String,
    pub label_halo: String,
    pub point_fill: String,
    pub point_radius: f64,
    pub line_color: String,
    pub polygon_fill: String,
    pub polygon_stroke: String,
    pub bound_stroke: String,
    pub background: String,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            label_color: "#1C2430".to_string(),
            label_halo: "#FFFFFF".to_string(),
            point_fill: "#D9485F".to_string(),
            point_radius: 3.5,
            line_color: "#7A8AA6".to_string(),
            polygon_fill: "#EEF2F8".to_string(),
            polygon_stroke: "#C7D2E5".to_string(),
            bound_stroke: "#F59E42".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            label_color: "#E8ECF4".to_string(),
            label_halo: "#10141C".to_string(),
            point_fill: "#F5C542".to_string(),
            point_radius: 3.5,
            line_color: "#4F5D75".to_string(),
            polygon_fill: "#1B2230".to_string(),
            polygon_stroke: "#2E3A50".to_string(),
            bound_stroke: "#EB5757".to_string(),
            background: "#10141C".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" | "default" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
