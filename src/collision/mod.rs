// Label collision strategies.
// Each strategy decides which candidate features may draw a label this
// frame; the renderer then draws exactly the returned subset.

mod cover;
mod null;
mod simple;

pub use cover::{CoverCollision, CoverReport, DEFAULT_BUFFER, MAX_PLACEMENT_RETRIES};
pub use null::NullCollision;
pub use simple::{SimpleCollision, DEFAULT_DISTANCE};

use crate::feature::{Feature, Field};
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;
use serde::{Deserialize, Serialize};

/// A label collision strategy.
///
/// `test` returns the features allowed to draw a label, as a subsequence of
/// `features` in input order: earlier features always win over later ones.
/// Accepted features may carry a label-symbol override
/// ([`Feature::label_symbol`]) with the placement they must be drawn at.
///
/// The provided implementation accepts nothing.
pub trait CollisionStrategy {
    fn test<'a>(
        &self,
        features: &'a mut [Feature],
        field: Option<&Field>,
        symbol: Option<&LabelSymbol>,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
    ) -> Vec<&'a Feature> {
        let _ = (features, field, symbol, surface, projection);
        Vec::new()
    }

    fn name(&self) -> &'static str;
}

/// Strategy chosen at runtime, usually from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum Collision {
    Null,
    Simple(SimpleCollision),
    Cover(CoverCollision),
}

impl Default for Collision {
    fn default() -> Self {
        Collision::Cover(CoverCollision::default())
    }
}

impl Collision {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "null" | "none" => Some(Collision::Null),
            "simple" => Some(Collision::Simple(SimpleCollision::default())),
            "cover" => Some(Collision::Cover(CoverCollision::default())),
            _ => None,
        }
    }
}

impl CollisionStrategy for Collision {
    fn test<'a>(
        &self,
        features: &'a mut [Feature],
        field: Option<&Field>,
        symbol: Option<&LabelSymbol>,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
    ) -> Vec<&'a Feature> {
        match self {
            Collision::Null => NullCollision.test(features, field, symbol, surface, projection),
            Collision::Simple(simple) => simple.test(features, field, symbol, surface, projection),
            Collision::Cover(cover) => cover.test(features, field, symbol, surface, projection),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Collision::Null => NullCollision.name(),
            Collision::Simple(simple) => simple.name(),
            Collision::Cover(cover) => cover.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Geometry};
    use crate::projection::PlanarProjection;
    use crate::surface::ApproxMetrics;

    struct Unimplemented;

    impl CollisionStrategy for Unimplemented {
        fn name(&self) -> &'static str {
            "unimplemented"
        }
    }

    fn features() -> Vec<Feature> {
        (0..3)
            .map(|i| {
                Feature::new(
                    format!("f{i}"),
                    Geometry::Point(Coord::new(i as f64 * 500.0, 0.0)),
                )
                .with_property("name", format!("Feature {i}"))
            })
            .collect()
    }

    #[test]
    fn default_test_rejects_everything() {
        let mut features = features();
        let symbol = LabelSymbol::default();
        let accepted = Unimplemented.test(
            &mut features,
            Some(&Field::new("name")),
            Some(&symbol),
            &ApproxMetrics,
            &PlanarProjection::identity(),
        );
        assert!(accepted.is_empty());
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!(Collision::from_name("null"), Some(Collision::Null));
        assert_eq!(
            Collision::from_name("Simple"),
            Some(Collision::Simple(SimpleCollision::default()))
        );
        assert_eq!(
            Collision::from_name("cover"),
            Some(Collision::Cover(CoverCollision::default()))
        );
        assert_eq!(Collision::from_name("quadtree"), None);
        assert_eq!(Collision::default().name(), "cover");
    }

    #[test]
    fn enum_dispatches_to_strategy() {
        let symbol = LabelSymbol::default();
        let field = Field::new("name");
        let proj = PlanarProjection::identity();
        for collision in [
            Collision::Null,
            Collision::Simple(SimpleCollision::default()),
            Collision::Cover(CoverCollision::default()),
        ] {
            let mut features = features();
            let accepted =
                collision.test(&mut features, Some(&field), Some(&symbol), &ApproxMetrics, &proj);
            let ids: Vec<&str> = accepted.iter().map(|f| f.id.as_str()).collect();
            assert_eq!(ids, ["f0", "f1", "f2"], "{}", collision.name());
        }
    }

    #[test]
    fn collision_config_is_tagged_by_strategy() {
        let simple: Collision = serde_json::from_str(r#"{"strategy":"simple","distance":80}"#).unwrap();
        assert_eq!(simple, Collision::Simple(SimpleCollision::new(80.0)));
        let cover: Collision = serde_json::from_str(r#"{"strategy":"cover"}"#).unwrap();
        assert_eq!(cover, Collision::Cover(CoverCollision::new(DEFAULT_BUFFER)));
        let null: Collision = serde_json::from_str(r#"{"strategy":"null"}"#).unwrap();
        assert_eq!(null, Collision::Null);
    }
}
