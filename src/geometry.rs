use crate::bound::Bound;
use crate::measure::measure_label;
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_008.8;
const AREA_EPS: f64 = 1e-9;

/// A map-space coordinate. For geographic data `x` is longitude and `y` is
/// latitude, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Coord {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coord> for [f64; 2] {
    fn from(value: Coord) -> Self {
        [value.x, value.y]
    }
}

/// A position in screen pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which space a distance is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Great-circle metres between map anchors.
    Map,
    /// Pixels between projected anchors.
    Screen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Outer ring first, holes after. Holes do not affect label anchoring.
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(coord) => Box::new(std::iter::once(coord)),
            Geometry::LineString(coords) => Box::new(coords.iter()),
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::LineString(coords) => coords.is_empty(),
            Geometry::Polygon(rings) => rings.first().is_none_or(|ring| ring.is_empty()),
        }
    }

    /// Where the label of this geometry attaches, in screen pixels.
    pub fn screen_anchor(&self, projection: &dyn Projection) -> Option<ScreenPoint> {
        let anchor = match self {
            Geometry::Point(coord) => Some(projection.project(*coord)),
            Geometry::LineString(coords) => {
                let points: Vec<(f64, f64)> = projection
                    .project_all(coords)
                    .into_iter()
                    .map(|p| (p.x, p.y))
                    .collect();
                path_midpoint(&points).map(|(x, y)| ScreenPoint::new(x, y))
            }
            Geometry::Polygon(rings) => {
                let ring = rings.first()?;
                let points: Vec<(f64, f64)> = projection
                    .project_all(ring)
                    .into_iter()
                    .map(|p| (p.x, p.y))
                    .collect();
                ring_centroid(&points).map(|(x, y)| ScreenPoint::new(x, y))
            }
        }?;
        anchor.is_finite().then_some(anchor)
    }

    /// The label anchor in map coordinates.
    pub fn map_anchor(&self) -> Option<Coord> {
        let anchor = match self {
            Geometry::Point(coord) => Some(*coord),
            Geometry::LineString(coords) => {
                let points: Vec<(f64, f64)> = coords.iter().map(|c| (c.x, c.y)).collect();
                path_midpoint(&points).map(|(x, y)| Coord::new(x, y))
            }
            Geometry::Polygon(rings) => {
                let ring = rings.first()?;
                let points: Vec<(f64, f64)> = ring.iter().map(|c| (c.x, c.y)).collect();
                ring_centroid(&points).map(|(x, y)| Coord::new(x, y))
            }
        }?;
        anchor.is_finite().then_some(anchor)
    }

    /// Distance between the label anchors of two geometries. Geometries
    /// without an anchor are infinitely far from everything.
    pub fn distance(
        &self,
        other: &Geometry,
        space: CoordinateSpace,
        projection: &dyn Projection,
    ) -> f64 {
        match space {
            CoordinateSpace::Screen => {
                match (self.screen_anchor(projection), other.screen_anchor(projection)) {
                    (Some(a), Some(b)) => a.distance_to(&b),
                    _ => f64::INFINITY,
                }
            }
            CoordinateSpace::Map => match (self.map_anchor(), other.map_anchor()) {
                (Some(a), Some(b)) => haversine_m(a, b),
                _ => f64::INFINITY,
            },
        }
    }

    /// Bound of `text` drawn with `symbol` at this geometry's anchor.
    pub fn measure(
        &self,
        text: &str,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
        symbol: &LabelSymbol,
    ) -> Option<Bound> {
        measure_label(self, text, surface, projection, symbol)
    }
}

fn haversine_m(a: Coord, b: Coord) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x - a.x).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Point halfway along the polyline.
fn path_midpoint(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let first = *points.first()?;
    let total: f64 = points
        .windows(2)
        .map(|w| ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt())
        .sum();
    if total <= 0.0 {
        return Some(first);
    }
    let mut remaining = total / 2.0;
    for w in points.windows(2) {
        let seg = ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt();
        if seg >= remaining && seg > 0.0 {
            let t = remaining / seg;
            return Some((
                w[0].0 + (w[1].0 - w[0].0) * t,
                w[0].1 + (w[1].1 - w[0].1) * t,
            ));
        }
        remaining -= seg;
    }
    points.last().copied()
}

/// Area-weighted centroid of a ring; vertex mean when the ring has no area.
fn ring_centroid(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = a.0 * b.1 - b.0 * a.1;
        area2 += cross;
        cx += (a.0 + b.0) * cross;
        cy += (a.1 + b.1) * cross;
    }
    if area2.abs() <= AREA_EPS {
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
        return Some((sx / n, sy / n));
    }
    Some((cx / (3.0 * area2), cy / (3.0 * area2)))
}
