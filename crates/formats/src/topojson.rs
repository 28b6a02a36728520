//! TopoJSON topology decoding into geographic features.
//!
//! Arcs may be quantized (delta-encoded integers plus a `transform`) or
//! absolute. Geometries reference arcs by index; a negative index `!i`
//! walks arc `i` backwards.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::feature::{Feature, FeatureCollection, Properties};
use crate::geometry::{GeoPoint, Geometry};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl QuantizeTransform {
    fn apply(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<QuantizeTransform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub objects: Map<String, Value>,
}

#[derive(Debug)]
pub enum TopologyError {
    Parse(serde_json::Error),
    NotATopology { found: String },
    MissingObject(String),
    ArcOutOfRange { arc: i64 },
    InvalidGeometry { index: usize, reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Parse(e) => write!(f, "topology parse error: {e}"),
            TopologyError::NotATopology { found } => {
                write!(f, "expected type \"Topology\", found {found:?}")
            }
            TopologyError::MissingObject(name) => write!(f, "topology has no object {name:?}"),
            TopologyError::ArcOutOfRange { arc } => write!(f, "arc index {arc} out of range"),
            TopologyError::InvalidGeometry { index, reason } => {
                write!(f, "invalid geometry at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TopologyError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_str(payload).map_err(TopologyError::Parse)?;
        if topology.kind != "Topology" {
            return Err(TopologyError::NotATopology {
                found: topology.kind,
            });
        }
        Ok(topology)
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Converts the named object to features: one per member of a
    /// GeometryCollection, otherwise a single feature.
    pub fn feature(&self, name: &str) -> Result<FeatureCollection, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?;
        let arcs = self.decode_arcs()?;
        let decoder = Decoder {
            arcs: &arcs,
            transform: self.transform,
        };

        let obj = object.as_object().ok_or(TopologyError::InvalidGeometry {
            index: 0,
            reason: "object must be a JSON object".to_string(),
        })?;

        let features = if obj.get("type").and_then(Value::as_str) == Some("GeometryCollection") {
            let members = obj
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or(TopologyError::InvalidGeometry {
                    index: 0,
                    reason: "GeometryCollection missing geometries".to_string(),
                })?;
            let mut features = Vec::with_capacity(members.len());
            for (index, member) in members.iter().enumerate() {
                features.push(decoder.feature(index, member)?);
            }
            features
        } else {
            vec![decoder.feature(0, object)?]
        };

        Ok(FeatureCollection { features })
    }

    /// Absolute lon/lat positions of every arc.
    fn decode_arcs(&self) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
        let mut out = Vec::with_capacity(self.arcs.len());
        for (index, arc) in self.arcs.iter().enumerate() {
            let mut points = Vec::with_capacity(arc.len());
            let (mut x, mut y) = (0.0, 0.0);
            for position in arc {
                let [px, py] = position_xy(position).ok_or_else(|| {
                    TopologyError::InvalidGeometry {
                        index,
                        reason: "arc position needs two numbers".to_string(),
                    }
                })?;
                match self.transform {
                    Some(t) => {
                        x += px;
                        y += py;
                        points.push(t.apply(x, y));
                    }
                    None => points.push(GeoPoint::new(px, py)),
                }
            }
            out.push(points);
        }
        Ok(out)
    }
}

fn position_xy(position: &[f64]) -> Option<[f64; 2]> {
    match position {
        [x, y, ..] => Some([*x, *y]),
        _ => None,
    }
}

struct Decoder<'a> {
    arcs: &'a [Vec<GeoPoint>],
    transform: Option<QuantizeTransform>,
}

impl Decoder<'_> {
    fn feature(&self, index: usize, value: &Value) -> Result<Feature, TopologyError> {
        let invalid = |reason: String| TopologyError::InvalidGeometry { index, reason };
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("geometry must be an object".to_string()))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let properties = obj
            .get("properties")
            .and_then(Value::as_object)
            .map(Properties::from_json)
            .unwrap_or_default();
        let geometry = self.geometry(obj).map_err(|e| match e {
            GeometryError::Arc(arc) => TopologyError::ArcOutOfRange { arc },
            GeometryError::Shape(reason) => invalid(reason),
        })?;

        Ok(Feature {
            id,
            geometry,
            properties,
        })
    }

    fn geometry(&self, obj: &Map<String, Value>) -> Result<Option<Geometry>, GeometryError> {
        let ty = match obj.get("type") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) => s.as_str(),
            Some(_) => return Err(shape("geometry type must be a string")),
        };

        let geometry = match ty {
            "Point" => Geometry::Point(self.point(coordinates(obj)?)?),
            "MultiPoint" => Geometry::MultiPoint(self.points(coordinates(obj)?)?),
            "LineString" => Geometry::LineString(self.line(&arc_list(arcs_of(obj)?)?)?),
            "MultiLineString" => {
                let mut lines = Vec::new();
                for arcs in as_array(arcs_of(obj)?)? {
                    lines.push(self.line(&arc_list(arcs)?)?);
                }
                Geometry::MultiLineString(lines)
            }
            "Polygon" => Geometry::Polygon(self.polygon(arcs_of(obj)?)?),
            "MultiPolygon" => {
                let mut polygons = Vec::new();
                for rings in as_array(arcs_of(obj)?)? {
                    polygons.push(self.polygon(rings)?);
                }
                Geometry::MultiPolygon(polygons)
            }
            other => return Err(GeometryError::Shape(format!("unsupported geometry type: {other}"))),
        };
        Ok(Some(geometry))
    }

    fn point(&self, coords: &Value) -> Result<GeoPoint, GeometryError> {
        let arr = as_array(coords)?;
        let (Some(x), Some(y)) = (
            arr.first().and_then(Value::as_f64),
            arr.get(1).and_then(Value::as_f64),
        ) else {
            return Err(shape("point needs two numbers"));
        };
        // Points are quantized but never delta-encoded.
        Ok(match self.transform {
            Some(t) => t.apply(x, y),
            None => GeoPoint::new(x, y),
        })
    }

    fn points(&self, coords: &Value) -> Result<Vec<GeoPoint>, GeometryError> {
        as_array(coords)?.iter().map(|c| self.point(c)).collect()
    }

    fn polygon(&self, rings: &Value) -> Result<Vec<Vec<GeoPoint>>, GeometryError> {
        let mut out = Vec::new();
        for ring in as_array(rings)? {
            out.push(self.ring(&arc_list(ring)?)?);
        }
        Ok(out)
    }

    fn stitch(&self, indices: &[i64]) -> Result<Vec<GeoPoint>, GeometryError> {
        let mut points: Vec<GeoPoint> = Vec::new();
        for &i in indices {
            let (arc_index, reversed) = if i < 0 { (!i, true) } else { (i, false) };
            let arc = self
                .arcs
                .get(arc_index as usize)
                .ok_or(GeometryError::Arc(i))?;
            // Consecutive arcs share their joining point.
            points.pop();
            let start = points.len();
            points.extend_from_slice(arc);
            if reversed {
                points[start..].reverse();
            }
        }
        Ok(points)
    }

    fn line(&self, indices: &[i64]) -> Result<Vec<GeoPoint>, GeometryError> {
        let mut points = self.stitch(indices)?;
        if let Some(&first) = points.first() {
            if points.len() < 2 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn ring(&self, indices: &[i64]) -> Result<Vec<GeoPoint>, GeometryError> {
        let mut points = self.stitch(indices)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }
}

enum GeometryError {
    Arc(i64),
    Shape(String),
}

fn shape(reason: &str) -> GeometryError {
    GeometryError::Shape(reason.to_string())
}

fn coordinates(obj: &Map<String, Value>) -> Result<&Value, GeometryError> {
    obj.get("coordinates")
        .ok_or_else(|| shape("geometry missing coordinates"))
}

fn arcs_of(obj: &Map<String, Value>) -> Result<&Value, GeometryError> {
    obj.get("arcs").ok_or_else(|| shape("geometry missing arcs"))
}

fn as_array(value: &Value) -> Result<&Vec<Value>, GeometryError> {
    value.as_array().ok_or_else(|| shape("expected an array"))
}

fn arc_list(value: &Value) -> Result<Vec<i64>, GeometryError> {
    as_array(value)?
        .iter()
        .map(|v| v.as_i64().ok_or_else(|| shape("arc index must be an integer")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use crate::geometry::{GeoPoint, Geometry};
    use pretty_assertions::assert_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect()
    }

    const SQUARES: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [0, 0]},
        "arcs": [
            [[0, 0], [2, 0]],
            [[2, 0], [0, 2], [-2, -2]],
            [[0, 0], [1, 0], [0, 1], [-1, 0], [0, -1]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "004", "arcs": [[0, 1]], "properties": {"name": "Afghanistan"}},
                    {"type": "Polygon", "id": 8, "arcs": [[-3]]},
                    {"type": null, "id": "010"}
                ]
            }
        }
    }"#;

    #[test]
    fn decodes_collection_members_in_order() {
        let topo = Topology::from_json_str(SQUARES).expect("parse topology");
        let countries = topo.feature("countries").expect("feature");
        assert_eq!(countries.len(), 3);

        let ids: Vec<_> = countries.features.iter().map(|f| f.id.clone()).collect();
        assert_eq!(
            ids,
            vec![Some("004".to_string()), Some("8".to_string()), Some("010".to_string())]
        );
        assert_eq!(countries.features[0].property("name"), Some("Afghanistan"));
        assert!(countries.features[1].properties.is_empty());
        assert_eq!(countries.features[2].geometry, None);
    }

    #[test]
    fn stitched_arcs_share_joining_point() {
        let topo = Topology::from_json_str(SQUARES).expect("parse topology");
        let countries = topo.feature("countries").expect("feature");
        assert_eq!(
            countries.features[0].geometry,
            Some(Geometry::Polygon(vec![pts(&[
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 2.0),
                (0.0, 0.0)
            ])]))
        );
    }

    #[test]
    fn negative_index_reverses_arc() {
        let topo = Topology::from_json_str(SQUARES).expect("parse topology");
        let countries = topo.feature("countries").expect("feature");
        assert_eq!(
            countries.features[1].geometry,
            Some(Geometry::Polygon(vec![pts(&[
                (0.0, 0.0),
                (0.0, 1.0),
                (1.0, 1.0),
                (1.0, 0.0),
                (0.0, 0.0)
            ])]))
        );
    }

    #[test]
    fn quantized_points_are_absolute() {
        let topo = Topology::from_json_str(
            r#"{
                "type": "Topology",
                "transform": {"scale": [0.5, 2], "translate": [10, 20]},
                "arcs": [],
                "objects": {"capitals": {"type": "MultiPoint", "coordinates": [[4, 3], [4, 3]]}}
            }"#,
        )
        .expect("parse topology");
        let capitals = topo.feature("capitals").expect("feature");
        assert_eq!(
            capitals.features[0].geometry,
            Some(Geometry::MultiPoint(pts(&[(12.0, 26.0), (12.0, 26.0)])))
        );
    }

    #[test]
    fn short_rings_are_padded() {
        let topo = Topology::from_json_str(
            r#"{
                "type": "Topology",
                "arcs": [[[5, 5], [6, 6]]],
                "objects": {"sliver": {"type": "Polygon", "arcs": [[0]]}}
            }"#,
        )
        .expect("parse topology");
        let sliver = topo.feature("sliver").expect("feature");
        assert_eq!(
            sliver.features[0].geometry,
            Some(Geometry::Polygon(vec![pts(&[
                (5.0, 5.0),
                (6.0, 6.0),
                (5.0, 5.0),
                (5.0, 5.0)
            ])]))
        );
    }

    #[test]
    fn rejects_non_topology_payloads() {
        let err = Topology::from_json_str(r#"{"type": "FeatureCollection"}"#)
            .expect_err("not a topology");
        assert!(matches!(err, TopologyError::NotATopology { .. }));
    }

    #[test]
    fn reports_missing_objects_and_bad_arcs() {
        let topo = Topology::from_json_str(SQUARES).expect("parse topology");
        assert!(matches!(
            topo.feature("land"),
            Err(TopologyError::MissingObject(name)) if name == "land"
        ));

        let broken = Topology::from_json_str(
            r#"{"type": "Topology", "arcs": [], "objects": {"x": {"type": "LineString", "arcs": [7]}}}"#,
        )
        .expect("parse topology");
        assert!(matches!(
            broken.feature("x"),
            Err(TopologyError::ArcOutOfRange { arc: 7 })
        ));
    }
}
