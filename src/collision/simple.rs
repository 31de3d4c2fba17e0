use super::CollisionStrategy;
use crate::feature::{Feature, Field};
use crate::geometry::CoordinateSpace;
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DISTANCE: f64 = 50.0;

/// Proximity suppression: a feature is dropped when an already accepted
/// feature lies within `distance` screen pixels of it. Label extents are
/// never measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleCollision {
    pub distance: f64,
}

impl Default for SimpleCollision {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl SimpleCollision {
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }
}

impl CollisionStrategy for SimpleCollision {
    fn test<'a>(
        &self,
        features: &'a mut [Feature],
        _field: Option<&Field>,
        _symbol: Option<&LabelSymbol>,
        _surface: &dyn TextMeasure,
        projection: &dyn Projection,
    ) -> Vec<&'a Feature> {
        let mut accepted: Vec<&'a Feature> = Vec::new();
        for feature in features {
            // Placements from an earlier pass do not apply here.
            feature.clear_label_symbol();
            let feature: &'a Feature = feature;
            let crowded_by = accepted.iter().find(|kept| {
                kept.geometry
                    .distance(&feature.geometry, CoordinateSpace::Screen, projection)
                    <= self.distance
            });
            if let Some(kept) = crowded_by {
                log::debug!("simple collision: {} dropped, too close to {}", feature.id, kept.id);
                continue;
            }
            accepted.push(feature);
        }
        accepted
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Geometry};
    use crate::projection::PlanarProjection;
    use crate::surface::ApproxMetrics;

    fn point(id: &str, x: f64, y: f64) -> Feature {
        Feature::new(id, Geometry::Point(Coord::new(x, y)))
    }

    fn run(strategy: SimpleCollision, features: &mut [Feature], proj: &PlanarProjection) -> Vec<String> {
        strategy
            .test(features, None, None, &ApproxMetrics, proj)
            .into_iter()
            .map(|f| f.id.clone())
            .collect()
    }

    #[test]
    fn first_of_a_cluster_wins() {
        let mut features = vec![
            point("a", 0.0, 0.0),
            point("b", 10.0, 0.0),
            point("c", 20.0, 0.0),
            point("d", 200.0, 0.0),
        ];
        let ids = run(SimpleCollision::default(), &mut features, &PlanarProjection::identity());
        assert_eq!(ids, ["a", "d"]);
    }

    #[test]
    fn threshold_distance_counts_as_conflict() {
        let mut features = vec![point("a", 0.0, 0.0), point("b", 50.0, 0.0)];
        let ids = run(SimpleCollision::default(), &mut features, &PlanarProjection::identity());
        assert_eq!(ids, ["a"]);

        let mut features = vec![point("a", 0.0, 0.0), point("b", 50.001, 0.0)];
        let ids = run(SimpleCollision::default(), &mut features, &PlanarProjection::identity());
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn distance_is_measured_in_screen_space() {
        let mut features = vec![point("a", 0.0, 0.0), point("b", 30.0, 0.0)];
        let zoomed = PlanarProjection::new(2.0, 0.0, 0.0);
        let ids = run(SimpleCollision::default(), &mut features, &zoomed);
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn rejected_features_do_not_suppress_later_ones() {
        // b is rejected by a; c is only close to b, so it stays.
        let mut features = vec![point("a", 0.0, 0.0), point("b", 40.0, 0.0), point("c", 80.0, 0.0)];
        let ids = run(SimpleCollision::default(), &mut features, &PlanarProjection::identity());
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn accepted_pairs_exceed_threshold() {
        let mut features: Vec<Feature> = (0..40)
            .map(|i| {
                let x = (i * 37 % 300) as f64;
                let y = (i * 53 % 200) as f64;
                point(&format!("f{i}"), x, y)
            })
            .collect();
        let strategy = SimpleCollision::new(45.0);
        let proj = PlanarProjection::identity();
        let accepted = strategy.test(&mut features, None, None, &ApproxMetrics, &proj);
        assert!(!accepted.is_empty());
        for (i, a) in accepted.iter().enumerate() {
            for b in &accepted[i + 1..] {
                let d = a.geometry.distance(&b.geometry, CoordinateSpace::Screen, &proj);
                assert!(d > strategy.distance, "{} and {} are {d}px apart", a.id, b.id);
            }
        }
    }

    #[test]
    fn clears_stale_overrides() {
        let mut features = vec![point("a", 0.0, 0.0)];
        features[0].set_label_symbol(LabelSymbol::default());
        let accepted = SimpleCollision::default().test(
            &mut features,
            None,
            None,
            &ApproxMetrics,
            &PlanarProjection::identity(),
        );
        assert!(accepted[0].label_symbol().is_none());
    }
}
