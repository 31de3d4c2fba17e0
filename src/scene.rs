use crate::feature::Feature;
use serde::Deserialize;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read features: {0}")]
    Io(#[from] io::Error),
    #[error("invalid feature file: {json} (as JSON5: {json5})")]
    Parse {
        json: serde_json::Error,
        json5: json5::Error,
    },
    #[error("feature `{id}` has non-finite coordinates")]
    NonFinite { id: String },
    #[error("duplicate feature id `{id}`")]
    DuplicateId { id: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SceneFile {
    Collection { features: Vec<Feature> },
    List(Vec<Feature>),
}

/// Candidate features in draw-priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub features: Vec<Feature>,
}

impl Scene {
    /// Parses `{"features": [...]}` or a bare feature array, JSON or JSON5.
    pub fn parse(input: &str) -> Result<Self, SceneError> {
        let file: SceneFile = match serde_json::from_str(input) {
            Ok(file) => file,
            Err(json) => json5::from_str(input).map_err(|json5| SceneError::Parse { json, json5 })?,
        };
        let features = match file {
            SceneFile::Collection { features } | SceneFile::List(features) => features,
        };
        let scene = Scene { features };
        scene.validate()?;
        Ok(scene)
    }

    /// Reads a scene from `path`, or stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let input = if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path)?
        };
        Self::parse(&input)
    }

    fn validate(&self) -> Result<(), SceneError> {
        let mut seen = std::collections::HashSet::new();
        for feature in &self.features {
            if !feature.geometry.coords().all(|coord| coord.is_finite()) {
                return Err(SceneError::NonFinite {
                    id: feature.id.clone(),
                });
            }
            if !seen.insert(feature.id.as_str()) {
                return Err(SceneError::DuplicateId {
                    id: feature.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Geometry};

    #[test]
    fn parses_collection_and_bare_list() {
        let collection = r#"{"features":[
            {"id":"oslo","geometry":{"type":"Point","coordinates":[10.75,59.91]},"properties":{"name":"Oslo"}}
        ]}"#;
        let scene = Scene::parse(collection).unwrap();
        assert_eq!(scene.features.len(), 1);
        assert_eq!(scene.features[0].geometry, Geometry::Point(Coord::new(10.75, 59.91)));

        let list = r#"[{"id":"a","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}]"#;
        let scene = Scene::parse(list).unwrap();
        assert!(scene.features[0].properties.is_empty());
    }

    #[test]
    fn parses_json5() {
        let input = "[{ id: 'a', geometry: { type: 'Point', coordinates: [1, 2] }, }]";
        let scene = Scene::parse(input).unwrap();
        assert_eq!(scene.features[0].id, "a");
    }

    #[test]
    fn rejects_bad_scenes() {
        let dup = r#"[
            {"id":"a","geometry":{"type":"Point","coordinates":[0,0]}},
            {"id":"a","geometry":{"type":"Point","coordinates":[1,1]}}
        ]"#;
        assert!(matches!(Scene::parse(dup), Err(SceneError::DuplicateId { .. })));
        assert!(matches!(Scene::parse("{"), Err(SceneError::Parse { .. })));

        // JSON5 admits Infinity, which cannot be projected.
        let inf = "[{ id: 'x', geometry: { type: 'Point', coordinates: [Infinity, 0] } }]";
        assert!(matches!(Scene::parse(inf), Err(SceneError::NonFinite { .. })));
    }
}
