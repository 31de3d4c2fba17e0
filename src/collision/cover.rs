use super::CollisionStrategy;
use crate::bound::Bound;
use crate::feature::{Feature, Field};
use crate::geometry::Geometry;
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUFFER: f64 = 10.0;
/// Alternate placements tried after the preferred one collides. Together
/// with the preferred placement this covers the four cardinal directions.
pub const MAX_PLACEMENT_RETRIES: usize = 3;

/// Measured label-box suppression.
///
/// Each feature's label bound is measured, padded by `buffer` pixels and
/// rejected if it touches a bound accepted earlier in the same call. When
/// the symbol is `auto`, up to [`MAX_PLACEMENT_RETRIES`] alternate
/// placements are tried before the feature is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverCollision {
    pub buffer: f64,
}

impl Default for CoverCollision {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
        }
    }
}

/// What one [`CoverCollision::resolve`] call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverReport {
    /// Buffered bounds of the accepted labels, in acceptance order.
    pub bounds: Vec<Bound>,
    /// Alternate placements measured across all features.
    pub retries: usize,
    /// Features that got no label.
    pub dropped: usize,
}

impl CoverCollision {
    pub fn new(buffer: f64) -> Self {
        Self { buffer }
    }

    /// Runs the collision pass and also reports the accepted bounds.
    ///
    /// Accepted bounds live only for this call, so calls never influence
    /// each other and one instance may be shared between threads.
    pub fn resolve<'a>(
        &self,
        features: &'a mut [Feature],
        field: Option<&Field>,
        symbol: Option<&LabelSymbol>,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
    ) -> (Vec<&'a Feature>, CoverReport) {
        let mut report = CoverReport::default();
        let (Some(field), Some(template)) = (field, symbol) else {
            return (Vec::new(), report);
        };

        let mut accepted: Vec<&'a Feature> = Vec::new();
        for feature in features {
            feature.clear_label_symbol();
            let Some(text) = feature.label_text(field).map(|text| text.into_owned()) else {
                log::debug!("cover collision: {} has no `{}` value", feature.id, field.name);
                report.dropped += 1;
                continue;
            };
            let clear = |candidate: &LabelSymbol| {
                self.measure_clear(&feature.geometry, &text, candidate, surface, projection, &report.bounds)
            };

            if let Some(bound) = clear(template) {
                report.bounds.push(bound);
                accepted.push(feature);
                continue;
            }
            if !template.auto {
                log::debug!("cover collision: {} dropped", feature.id);
                report.dropped += 1;
                continue;
            }

            let mut candidate = template.clone();
            let mut placed = None;
            for attempt in 1..=MAX_PLACEMENT_RETRIES {
                candidate = candidate.next_placement();
                report.retries += 1;
                log::trace!(
                    "cover collision: {} retry {attempt} at {}",
                    feature.id,
                    candidate.placement.as_str()
                );
                if let Some(bound) = clear(&candidate) {
                    placed = Some(bound);
                    break;
                }
            }
            match placed {
                Some(bound) => {
                    report.bounds.push(bound);
                    feature.set_label_symbol(candidate);
                    accepted.push(feature);
                }
                None => {
                    log::debug!("cover collision: {} dropped after {MAX_PLACEMENT_RETRIES} retries", feature.id);
                    report.dropped += 1;
                }
            }
        }
        (accepted, report)
    }

    /// Buffered label bound under `symbol`, or `None` if it cannot be
    /// measured or touches one of `taken`.
    fn measure_clear(
        &self,
        geometry: &Geometry,
        text: &str,
        symbol: &LabelSymbol,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
        taken: &[Bound],
    ) -> Option<Bound> {
        let bound = geometry
            .measure(text, surface, projection, symbol)?
            .buffered(self.buffer);
        (!bound.intersects_any(taken)).then_some(bound)
    }
}

impl CollisionStrategy for CoverCollision {
    fn test<'a>(
        &self,
        features: &'a mut [Feature],
        field: Option<&Field>,
        symbol: Option<&LabelSymbol>,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
    ) -> Vec<&'a Feature> {
        self.resolve(features, field, symbol, surface, projection).0
    }

    fn name(&self) -> &'static str {
        "cover"
    }
}
