use crate::geometry::{Coord, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Maximum latitude representable in spherical Web Mercator.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Converts map coordinates into screen pixels.
///
/// Implementations must be pure: the same coordinate always projects to the
/// same screen point for a given projection value.
pub trait Projection {
    fn project(&self, coord: Coord) -> ScreenPoint;

    fn project_all(&self, coords: &[Coord]) -> Vec<ScreenPoint> {
        coords.iter().map(|coord| self.project(*coord)).collect()
    }
}

impl<P: Projection + ?Sized> Projection for &P {
    fn project(&self, coord: Coord) -> ScreenPoint {
        (**self).project(coord)
    }
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn project(&self, coord: Coord) -> ScreenPoint {
        (**self).project(coord)
    }
}

/// Spherical Web Mercator onto a viewport centred on `center` (lon/lat
/// degrees) at a fractional `zoom` level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebMercator {
    pub center: Coord,
    pub zoom: f64,
    pub tile_size: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            center: Coord::new(0.0, 0.0),
            zoom: 2.0,
            tile_size: 256.0,
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl WebMercator {
    pub fn new(center: Coord, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
            ..Default::default()
        }
    }

    fn world_size(&self) -> f64 {
        self.tile_size * self.zoom.exp2()
    }

    /// Projects onto the unscaled world plane, `[0, world_size]` on both axes.
    fn world_pixel(&self, coord: Coord) -> (f64, f64) {
        let size = self.world_size();
        let lat = coord
            .y
            .clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE)
            .to_radians();
        let x = (coord.x + 180.0) / 360.0 * size;
        let sin_lat = lat.sin();
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * size;
        (x, y)
    }
}

impl Projection for WebMercator {
    fn project(&self, coord: Coord) -> ScreenPoint {
        let (wx, wy) = self.world_pixel(coord);
        let (cx, cy) = self.world_pixel(self.center);
        ScreenPoint::new(
            wx - cx + self.width / 2.0,
            wy - cy + self.height / 2.0,
        )
    }
}

/// Linear pan/zoom transform for data that is already planar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanarProjection {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Treat the data's y axis as pointing up.
    pub flip_y: bool,
}

impl Default for PlanarProjection {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            flip_y: false,
        }
    }
}

impl PlanarProjection {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
            flip_y: false,
        }
    }
}

impl Projection for PlanarProjection {
    fn project(&self, coord: Coord) -> ScreenPoint {
        let y = if self.flip_y { -coord.y } else { coord.y };
        ScreenPoint::new(
            coord.x * self.scale + self.offset_x,
            y * self.scale + self.offset_y,
        )
    }
}
