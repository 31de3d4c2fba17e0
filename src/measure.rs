// Screen footprint of a label.

use crate::bound::Bound;
use crate::feature::{Feature, Field};
use crate::geometry::{Geometry, ScreenPoint};
use crate::projection::Projection;
use crate::surface::{TextExtent, TextMeasure};
use crate::symbol::{LabelSymbol, Placement};

/// Bound of a label of `extent` placed around `anchor`.
pub fn label_bound(anchor: ScreenPoint, extent: TextExtent, symbol: &LabelSymbol) -> Bound {
    let ScreenPoint { x, y } = anchor;
    let TextExtent { width: w, height: h } = extent;
    let gap = symbol.offset;
    match symbol.placement {
        Placement::Center => Bound::from_center(x, y, w, h),
        Placement::Right => Bound::new(x + gap, y - h / 2.0, x + gap + w, y + h / 2.0),
        Placement::Left => Bound::new(x - gap - w, y - h / 2.0, x - gap, y + h / 2.0),
        Placement::Top => Bound::new(x - w / 2.0, y - gap - h, x + w / 2.0, y - gap),
        Placement::Bottom => Bound::new(x - w / 2.0, y + gap, x + w / 2.0, y + gap + h),
    }
}

/// Measures `text` drawn with `symbol` at the geometry's projected anchor.
///
/// Returns `None` when there is nothing to draw: empty text, a zero-size
/// extent, or a geometry that projects to no usable anchor.
pub fn measure_label(
    geometry: &Geometry,
    text: &str,
    surface: &dyn TextMeasure,
    projection: &dyn Projection,
    symbol: &LabelSymbol,
) -> Option<Bound> {
    if text.trim().is_empty() {
        return None;
    }
    let anchor = geometry.screen_anchor(projection)?;
    let extent = surface.measure_text(text, &symbol.style);
    if extent.is_empty() {
        return None;
    }
    let bound = label_bound(anchor, extent, symbol);
    bound.is_finite().then_some(bound)
}

/// Measures a feature's label for `field`.
pub fn measure_feature(
    feature: &Feature,
    field: &Field,
    symbol: &LabelSymbol,
    surface: &dyn TextMeasure,
    projection: &dyn Projection,
) -> Option<Bound> {
    let text = feature.label_text(field)?;
    feature.geometry.measure(&text, surface, projection, symbol)
}
