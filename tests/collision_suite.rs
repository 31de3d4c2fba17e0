use map_label_collision::collision::CoverCollision;
use map_label_collision::config::parse_config;
use map_label_collision::scene::Scene;
use map_label_collision::surface::ApproxMetrics;
use map_label_collision::{
    Bound, Collision, CollisionStrategy, Coord, Feature, Field, Geometry, LabelSymbol,
    NullCollision, PlanarProjection, SimpleCollision, TextExtent, TextMeasure, TextStyle,
    WebMercator,
};

struct FixedSurface(f64, f64);

impl TextMeasure for FixedSurface {
    fn measure_text(&self, _text: &str, _style: &TextStyle) -> TextExtent {
        TextExtent::new(self.0, self.1)
    }
}

fn point(id: &str, x: f64, y: f64) -> Feature {
    Feature::new(id, Geometry::Point(Coord::new(x, y))).with_property("name", id)
}

fn ids(features: &[&Feature]) -> Vec<String> {
    features.iter().map(|f| f.id.clone()).collect()
}

/// Deterministic scatter of points around the origin.
fn scatter(count: usize) -> Vec<Feature> {
    let mut seed = 0x9E37_79B9_u64;
    (0..count)
        .map(|i| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let x = (seed >> 33) as f64 % 400.0;
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let y = (seed >> 33) as f64 % 300.0;
            point(&format!("f{i}"), x, y)
        })
        .collect()
}

fn is_subsequence(sub: &[String], full: &[String]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|id| rest.any(|candidate| candidate == id))
}

#[test]
fn cover_end_to_end_keeps_a_and_c() {
    let mut features = vec![point("A", 0.0, 0.0), point("B", 5.0, 0.0), point("C", 100.0, 0.0)];
    let accepted = CoverCollision::new(0.0).test(
        &mut features,
        Some(&Field::new("name")),
        Some(&LabelSymbol::default()),
        &FixedSurface(20.0, 10.0),
        &PlanarProjection::identity(),
    );
    assert_eq!(ids(&accepted), ["A", "C"]);
}

#[test]
fn cover_bounds_never_intersect() {
    let mut features = scatter(200);
    let all: Vec<String> = features.iter().map(|f| f.id.clone()).collect();
    let symbol = LabelSymbol::default().with_auto(true);
    let (accepted, report) = CoverCollision::new(2.0).resolve(
        &mut features,
        Some(&Field::new("name")),
        Some(&symbol),
        &FixedSurface(30.0, 12.0),
        &PlanarProjection::identity(),
    );
    assert!(!accepted.is_empty());
    assert_eq!(accepted.len(), report.bounds.len());
    assert_eq!(accepted.len() + report.dropped, all.len());
    for (i, a) in report.bounds.iter().enumerate() {
        for b in &report.bounds[i + 1..] {
            assert!(!a.intersect(b), "{a:?} intersects {b:?}");
        }
    }
    assert!(is_subsequence(&ids(&accepted), &all));
}

#[test]
fn simple_keeps_accepted_points_apart() {
    let mut features = scatter(150);
    let all: Vec<String> = features.iter().map(|f| f.id.clone()).collect();
    let accepted = SimpleCollision::new(40.0).test(
        &mut features,
        Some(&Field::new("name")),
        Some(&LabelSymbol::default()),
        &ApproxMetrics,
        &PlanarProjection::identity(),
    );
    for (i, a) in accepted.iter().enumerate() {
        for b in &accepted[i + 1..] {
            let (Geometry::Point(pa), Geometry::Point(pb)) = (&a.geometry, &b.geometry) else {
                unreachable!("scatter yields points");
            };
            assert!(((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt() > 40.0);
        }
    }
    assert!(is_subsequence(&ids(&accepted), &all));
}

#[test]
fn null_strategy_returns_everything() {
    let mut features = scatter(20);
    let all: Vec<String> = features.iter().map(|f| f.id.clone()).collect();
    let accepted = NullCollision.test(
        &mut features,
        None,
        None,
        &ApproxMetrics,
        &PlanarProjection::identity(),
    );
    assert_eq!(ids(&accepted), all);
}

#[test]
fn configured_strategy_runs_on_a_geographic_scene() {
    let scene = Scene::parse(
        r#"{"features":[
            {"id":"oslo","geometry":{"type":"Point","coordinates":[10.7522,59.9139]},"properties":{"name":"Oslo"}},
            {"id":"lysaker","geometry":{"type":"Point","coordinates":[10.6385,59.9127]},"properties":{"name":"Lysaker"}},
            {"id":"bergen","geometry":{"type":"Point","coordinates":[5.3221,60.3913]},"properties":{"name":"Bergen"}}
        ]}"#,
    )
    .unwrap();
    let config = parse_config(
        r#"{
            collision: { strategy: 'simple', distance: 30 },
            projection: { type: 'webMercator', center: [8, 60], zoom: 6 },
        }"#,
    )
    .unwrap();
    assert!(matches!(config.collision, Collision::Simple(_)));

    let projection = config.projection.build();
    let mut features = scene.features.clone();
    let accepted = config.collision.test(
        &mut features,
        Some(&config.label.field()),
        Some(&config.label.symbol),
        &ApproxMetrics,
        projection.as_ref(),
    );
    assert_eq!(ids(&accepted), ["oslo", "bergen"]);
}

#[test]
fn mercator_places_labels_on_canvas() {
    let mercator = WebMercator::new(Coord::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let feature = point("origin", 0.0, 0.0);
    let bound = feature
        .geometry
        .measure("origin", &FixedSurface(20.0, 10.0), &mercator, &LabelSymbol::default())
        .unwrap();
    assert_eq!(bound, Bound::new(390.0, 295.0, 410.0, 305.0));
}
