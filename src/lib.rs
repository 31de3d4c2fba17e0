pub mod bound;
#[cfg(feature = "cli")]
pub mod cli;
pub mod collision;
pub mod config;
pub mod dump;
pub mod feature;
pub mod geometry;
pub mod measure;
pub mod projection;
pub mod render;
pub mod scene;
pub mod surface;
pub mod symbol;
pub mod text_metrics;
pub mod theme;

pub use bound::Bound;
#[cfg(feature = "cli")]
pub use cli::run;
pub use collision::{Collision, CollisionStrategy, CoverCollision, NullCollision, SimpleCollision};
pub use feature::{Feature, Field};
pub use geometry::{Coord, CoordinateSpace, Geometry, ScreenPoint};
pub use projection::{PlanarProjection, Projection, WebMercator};
pub use surface::{Canvas, TextExtent, TextMeasure};
pub use symbol::{LabelSymbol, Placement, TextStyle};
