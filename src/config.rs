use crate::collision::{Collision, CoverCollision, SimpleCollision};
use crate::feature::Field;
use crate::geometry::Coord;
use crate::projection::{PlanarProjection, Projection, WebMercator};
use crate::symbol::{LabelSymbol, Placement, TextStyle};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub field: String,
    pub symbol: LabelSymbol,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            field: "name".to_string(),
            symbol: LabelSymbol::default(),
        }
    }
}

impl LabelConfig {
    pub fn field(&self) -> Field {
        Field::new(self.field.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProjectionConfig {
    WebMercator(WebMercator),
    Planar(PlanarProjection),
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig::WebMercator(WebMercator::default())
    }
}

impl ProjectionConfig {
    pub fn build(&self) -> Box<dyn Projection> {
        match *self {
            ProjectionConfig::WebMercator(mercator) => Box::new(mercator),
            ProjectionConfig::Planar(planar) => Box::new(planar),
        }
    }

    /// Keeps a Mercator viewport in step with the canvas size.
    pub fn fit_canvas(&mut self, width: f64, height: f64) {
        if let ProjectionConfig::WebMercator(mercator) = self {
            mercator.width = width;
            mercator.height = height;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
    /// Measure with calibrated character widths instead of system fonts.
    pub fast_text_metrics: bool,
    /// Outline each accepted label's buffered bound.
    pub show_bounds: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            fast_text_metrics: false,
            show_bounds: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub collision: Collision,
    pub label: LabelConfig,
    pub projection: ProjectionConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::default();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        let label = LabelConfig {
            symbol: LabelSymbol::new(TextStyle {
                font_family: theme.font_family.clone(),
                font_size: theme.font_size,
                ..TextStyle::default()
            }),
            ..Default::default()
        };
        Self {
            theme,
            collision: Collision::default(),
            label,
            projection: ProjectionConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollisionFile {
    strategy: Option<String>,
    distance: Option<f64>,
    buffer: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelFile {
    field: Option<String>,
    font_family: Option<String>,
    font_size: Option<f64>,
    line_height: Option<f64>,
    auto: Option<bool>,
    placement: Option<String>,
    offset: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    tile_size: Option<f64>,
    scale: Option<f64>,
    offset_x: Option<f64>,
    offset_y: Option<f64>,
    flip_y: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    width: Option<f64>,
    height: Option<f64>,
    background: Option<String>,
    fast_text_metrics: Option<bool>,
    show_bounds: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    label_color: Option<String>,
    label_halo: Option<String>,
    point_fill: Option<String>,
    line_color: Option<String>,
    polygon_fill: Option<String>,
    polygon_stroke: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    collision: Option<CollisionFile>,
    label: Option<LabelFile>,
    projection: Option<ProjectionFile>,
    render: Option<RenderFile>,
}

/// Loads a JSON (or JSON5) config file and merges it onto the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
            anyhow::anyhow!("invalid config: {json_err} (as JSON5: {json5_err})")
        })?,
    };
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
        config.render.background = config.theme.background.clone();
        config.label.symbol.style.font_family = config.theme.font_family.clone();
        config.label.symbol.style.font_size = config.theme.font_size;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.label.symbol.style.font_family = v.clone();
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.label.symbol.style.font_size = v;
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.label_halo {
            config.theme.label_halo = v;
        }
        if let Some(v) = vars.point_fill {
            config.theme.point_fill = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.polygon_fill {
            config.theme.polygon_fill = v;
        }
        if let Some(v) = vars.polygon_stroke {
            config.theme.polygon_stroke = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(collision) = parsed.collision {
        if let Some(name) = collision.strategy.as_deref() {
            config.collision = Collision::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("unknown collision strategy `{name}`"))?;
        }
        match &mut config.collision {
            Collision::Simple(SimpleCollision { distance }) => {
                if let Some(v) = collision.distance {
                    if !v.is_finite() {
                        return Err(anyhow::anyhow!("collision distance must be finite, got {v}"));
                    }
                    *distance = v;
                }
            }
            Collision::Cover(CoverCollision { buffer }) => {
                if let Some(v) = collision.buffer {
                    if !v.is_finite() || v < 0.0 {
                        return Err(anyhow::anyhow!(
                            "collision buffer must be a finite, non-negative number, got {v}"
                        ));
                    }
                    *buffer = v;
                }
            }
            Collision::Null => {}
        }
    }

    if let Some(label) = parsed.label {
        let symbol = &mut config.label.symbol;
        if let Some(v) = label.field {
            config.label.field = v;
        }
        if let Some(v) = label.font_family {
            symbol.style.font_family = v;
        }
        if let Some(v) = label.font_size {
            symbol.style.font_size = v;
        }
        if let Some(v) = label.line_height {
            symbol.style.line_height = v;
        }
        if let Some(v) = label.auto {
            symbol.auto = v;
        }
        if let Some(v) = label.placement.as_deref() {
            symbol.placement = Placement::from_token(v)
                .ok_or_else(|| anyhow::anyhow!("unknown label placement `{v}`"))?;
        }
        if let Some(v) = label.offset {
            symbol.offset = v;
        }
    }

    if let Some(projection) = parsed.projection {
        match projection.kind.as_deref().unwrap_or("webMercator") {
            "webMercator" | "mercator" => {
                let mut mercator = WebMercator::default();
                if let Some([x, y]) = projection.center {
                    mercator.center = Coord::new(x, y);
                }
                if let Some(v) = projection.zoom {
                    mercator.zoom = v;
                }
                if let Some(v) = projection.tile_size {
                    mercator.tile_size = v;
                }
                config.projection = ProjectionConfig::WebMercator(mercator);
            }
            "planar" => {
                let mut planar = PlanarProjection::default();
                if let Some(v) = projection.scale {
                    planar.scale = v;
                }
                if let Some(v) = projection.offset_x {
                    planar.offset_x = v;
                }
                if let Some(v) = projection.offset_y {
                    planar.offset_y = v;
                }
                if let Some(v) = projection.flip_y {
                    planar.flip_y = v;
                }
                config.projection = ProjectionConfig::Planar(planar);
            }
            other => return Err(anyhow::anyhow!("unknown projection `{other}`")),
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.fast_text_metrics {
            config.render.fast_text_metrics = v;
        }
        if let Some(v) = render.show_bounds {
            config.render.show_bounds = v;
        }
    }
    let (width, height) = (config.render.width, config.render.height);
    config.projection.fit_canvas(width, height);

    Ok(config)
}
