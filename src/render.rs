use crate::bound::Bound;
use crate::config::RenderConfig;
use crate::feature::{Feature, Field};
use crate::geometry::{Geometry, ScreenPoint};
use crate::projection::Projection;
use crate::surface::{split_lines, Canvas, TextExtent, TextMeasure};
use crate::symbol::{LabelSymbol, TextStyle};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// SVG text sink. Measurement is delegated to `metrics`.
pub struct SvgCanvas<'m> {
    metrics: &'m dyn TextMeasure,
    theme: Theme,
    body: String,
}

impl<'m> SvgCanvas<'m> {
    pub fn new(metrics: &'m dyn TextMeasure, theme: &Theme) -> Self {
        Self {
            metrics,
            theme: theme.clone(),
            body: String::new(),
        }
    }

    pub fn push_raw(&mut self, fragment: &str) {
        self.body.push_str(fragment);
    }

    pub fn finish(self, width: f64, height: f64, background: &str) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>"
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

impl TextMeasure for SvgCanvas<'_> {
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtent {
        self.metrics.measure_text(text, style)
    }
}

impl Canvas for SvgCanvas<'_> {
    fn draw_text(&mut self, text: &str, bound: &Bound, style: &TextStyle) {
        let (x, _) = bound.center();
        let line_step = style.font_size * style.line_height;
        // First baseline sits one font size below the top, less the leading.
        let start_y = bound.ymin + style.font_size + (line_step - style.font_size) / 2.0;
        let mut text_svg = format!(
            "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"3\" paint-order=\"stroke\">",
            escape_xml(&style.font_family),
            style.font_size,
            self.theme.label_color,
            self.theme.label_halo,
        );
        for (idx, line) in split_lines(text).iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_step };
            text_svg.push_str(&format!(
                "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                escape_xml(line)
            ));
        }
        text_svg.push_str("</text>");
        self.body.push_str(&text_svg);
    }
}

/// Inputs to [`render_svg`] for one frame.
pub struct Frame<'a> {
    pub features: &'a [Feature],
    /// Features a collision pass accepted, in draw order.
    pub accepted: &'a [&'a Feature],
    pub field: &'a Field,
    pub symbol: &'a LabelSymbol,
    pub projection: &'a dyn Projection,
}

/// Draws every feature's geometry, then the accepted labels at their
/// resolved placements.
pub fn render_svg(
    frame: &Frame<'_>,
    metrics: &dyn TextMeasure,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let mut canvas = SvgCanvas::new(metrics, theme);

    for feature in frame.features.iter().filter(|f| !f.geometry.is_empty()) {
        canvas.push_raw(&geometry_svg(&feature.geometry, frame.projection, theme));
    }

    for feature in frame.accepted {
        let Some(text) = feature.label_text(frame.field) else {
            continue;
        };
        let symbol = feature.resolved_symbol(frame.symbol);
        let Some(bound) = feature
            .geometry
            .measure(&text, &canvas, frame.projection, symbol)
        else {
            continue;
        };
        if config.show_bounds {
            canvas.push_raw(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.8\" stroke-dasharray=\"3 2\"/>",
                bound.xmin,
                bound.ymin,
                bound.width(),
                bound.height(),
                theme.bound_stroke
            ));
        }
        canvas.draw_text(&text, &bound, &symbol.style);
    }

    canvas.finish(config.width, config.height, &config.background)
}

fn geometry_svg(geometry: &Geometry, projection: &dyn Projection, theme: &Theme) -> String {
    match geometry {
        Geometry::Point(coord) => {
            let p = projection.project(*coord);
            format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"/>",
                p.x, p.y, theme.point_radius, theme.point_fill
            )
        }
        Geometry::LineString(coords) => format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            points_to_path(&projection.project_all(coords), false),
            theme.line_color
        ),
        Geometry::Polygon(rings) => {
            let d: Vec<String> = rings
                .iter()
                .map(|ring| points_to_path(&projection.project_all(ring), true))
                .collect();
            format!(
                "<path d=\"{}\" fill=\"{}\" fill-rule=\"evenodd\" stroke=\"{}\" stroke-width=\"1\"/>",
                d.join(" "),
                theme.polygon_fill,
                theme.polygon_stroke
            )
        }
    }
}

fn points_to_path(points: &[ScreenPoint], close: bool) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.x, first.y);
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.x, point.y));
    }
    if close {
        d.push_str(" Z");
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
