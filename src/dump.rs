use crate::feature::{Feature, Field};
use crate::measure::measure_feature;
use crate::projection::Projection;
use crate::surface::TextMeasure;
use crate::symbol::LabelSymbol;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Machine-readable result of one collision pass.
#[derive(Debug, Serialize)]
pub struct PlacementDump {
    pub strategy: String,
    pub width: f64,
    pub height: f64,
    pub labels: Vec<LabelEntry>,
    pub dropped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LabelEntry {
    pub id: String,
    pub text: String,
    pub placement: String,
    /// Unbuffered screen bound as `[xmin, ymin, xmax, ymax]`.
    pub bound: Option<[f64; 4]>,
}

/// Everything needed to describe a finished pass.
pub struct PassResult<'a> {
    pub strategy: &'a str,
    pub features: &'a [Feature],
    pub accepted: &'a [&'a Feature],
    pub field: &'a Field,
    pub symbol: &'a LabelSymbol,
}

impl PlacementDump {
    pub fn from_result(
        result: &PassResult<'_>,
        surface: &dyn TextMeasure,
        projection: &dyn Projection,
        width: f64,
        height: f64,
    ) -> Self {
        let labels = result
            .accepted
            .iter()
            .map(|feature| {
                let symbol = feature.resolved_symbol(result.symbol);
                let text = feature
                    .label_text(result.field)
                    .map(|text| text.into_owned())
                    .unwrap_or_default();
                let bound = measure_feature(feature, result.field, symbol, surface, projection)
                    .map(|bound| bound.to_array());
                LabelEntry {
                    id: feature.id.clone(),
                    text,
                    placement: symbol.placement.as_str().to_string(),
                    bound,
                }
            })
            .collect();

        let kept: HashSet<&str> = result.accepted.iter().map(|f| f.id.as_str()).collect();
        let dropped = result
            .features
            .iter()
            .filter(|f| !kept.contains(f.id.as_str()))
            .map(|f| f.id.clone())
            .collect();

        PlacementDump {
            strategy: result.strategy.to_string(),
            width,
            height,
            labels,
            dropped,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_placement_dump(dump: &PlacementDump, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionStrategy, CoverCollision};
    use crate::geometry::{Coord, Geometry};
    use crate::projection::PlanarProjection;
    use crate::surface::{TextExtent, TextMeasure};
    use crate::symbol::TextStyle;

    struct FixedSurface;

    impl TextMeasure for FixedSurface {
        fn measure_text(&self, _text: &str, _style: &TextStyle) -> TextExtent {
            TextExtent::new(20.0, 10.0)
        }
    }

    #[test]
    fn dump_lists_labels_and_dropped_ids() {
        let mut features = vec![
            Feature::new("A", Geometry::Point(Coord::new(0.0, 0.0))).with_property("name", "A"),
            Feature::new("B", Geometry::Point(Coord::new(5.0, 0.0))).with_property("name", "B"),
            Feature::new("C", Geometry::Point(Coord::new(100.0, 0.0))).with_property("name", "C"),
        ];
        let field = Field::new("name");
        let symbol = LabelSymbol::default();
        let proj = PlanarProjection::identity();
        let snapshot = features.clone();
        let accepted = CoverCollision::new(0.0).test(
            &mut features,
            Some(&field),
            Some(&symbol),
            &FixedSurface,
            &proj,
        );
        let result = PassResult {
            strategy: "cover",
            features: &snapshot,
            accepted: &accepted,
            field: &field,
            symbol: &symbol,
        };
        let dump = PlacementDump::from_result(&result, &FixedSurface, &proj, 200.0, 100.0);
        assert_eq!(dump.labels.len(), 2);
        assert_eq!(dump.labels[1].bound, Some([90.0, -5.0, 110.0, 5.0]));
        assert_eq!(dump.labels[0].placement, "center");
        assert_eq!(dump.dropped, ["B"]);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["strategy"], "cover");
        assert_eq!(json["labels"][0]["id"], "A");
    }
}
