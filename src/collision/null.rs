use super::CollisionStrategy;
use crate::feature::{Feature, Field};
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;

/// Accepts every feature. For layers where overlap is acceptable or label
/// density is controlled elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCollision;

impl CollisionStrategy for NullCollision {
    fn test<'a>(
        &self,
        features: &'a mut [Feature],
        _field: Option<&Field>,
        _symbol: Option<&LabelSymbol>,
        _surface: &dyn TextMeasure,
        _projection: &dyn Projection,
    ) -> Vec<&'a Feature> {
        let features: &'a [Feature] = features;
        features.iter().collect()
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Geometry};
    use crate::projection::PlanarProjection;
    use crate::surface::ApproxMetrics;

    #[test]
    fn returns_input_unchanged() {
        // Deliberately stacked on top of each other.
        let mut features: Vec<Feature> = (0..5)
            .map(|i| Feature::new(format!("f{i}"), Geometry::Point(Coord::new(0.0, 0.0))))
            .collect();
        let expected = features.clone();
        let accepted = NullCollision.test(
            &mut features,
            None,
            None,
            &ApproxMetrics,
            &PlanarProjection::identity(),
        );
        assert_eq!(accepted.len(), expected.len());
        for (got, want) in accepted.iter().zip(&expected) {
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn preserves_identity() {
        let mut features = vec![Feature::new("a", Geometry::Point(Coord::new(1.0, 2.0)))];
        let ptr: *const Feature = &features[0];
        let accepted = NullCollision.test(
            &mut features,
            None,
            None,
            &ApproxMetrics,
            &PlanarProjection::identity(),
        );
        assert!(std::ptr::eq(accepted[0], ptr));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mut features: Vec<Feature> = Vec::new();
        let accepted = NullCollision.test(
            &mut features,
            None,
            None,
            &ApproxMetrics,
            &PlanarProjection::identity(),
        );
        assert!(accepted.is_empty());
    }
}
