use serde::{Deserialize, Serialize};

use crate::error::StacError;

/// GeoJSON geometry. Coordinates keep their raw nesting; positions may carry
/// an elevation component, only the first two values are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Vec<f64>),
    MultiPoint(Vec<Vec<f64>>),
    LineString(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        let mut any = false;
        self.for_each_position(&mut |_, _| any = true);
        !any
    }

    fn for_each_position(&self, f: &mut impl FnMut(f64, f64)) {
        let visit = |pos: &Vec<f64>, f: &mut dyn FnMut(f64, f64)| {
            if pos.len() >= 2 {
                f(pos[0], pos[1]);
            }
        };
        match self {
            Geometry::Point(pos) => visit(pos, f),
            Geometry::MultiPoint(line) | Geometry::LineString(line) => {
                for pos in line {
                    visit(pos, f);
                }
            }
            Geometry::MultiLineString(rings) | Geometry::Polygon(rings) => {
                for ring in rings {
                    for pos in ring {
                        visit(pos, f);
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for ring in rings {
                        for pos in ring {
                            visit(pos, f);
                        }
                    }
                }
            }
        }
    }
}

/// Bounding box as `[min_lon, min_lat, max_lon, max_lat]`. Geometries are
/// validated non-empty at item construction, so the fold always observes at
/// least one position.
pub fn bounds(geometry: &Geometry) -> [f64; 4] {
    let mut bbox = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
    geometry.for_each_position(&mut |lon, lat| {
        bbox[0] = bbox[0].min(lon);
        bbox[1] = bbox[1].min(lat);
        bbox[2] = bbox[2].max(lon);
        bbox[3] = bbox[3].max(lat);
    });
    bbox
}

/// Union of polygonal geometries, kept as a non-dissolved MultiPolygon whose
/// coverage is the union of all constituents. Non-polygonal members are
/// rejected rather than silently dropped.
pub fn union(geometries: &[&Geometry]) -> Result<Geometry, StacError> {
    let mut polygons = Vec::new();
    for geometry in geometries {
        match geometry {
            Geometry::Polygon(rings) => polygons.push(rings.clone()),
            Geometry::MultiPolygon(polys) => polygons.extend(polys.iter().cloned()),
            other => {
                return Err(StacError::Geometry(format!(
                    "union requires polygonal geometries, got {other:?}"
                )));
            }
        }
    }
    if polygons.is_empty() {
        return Err(StacError::Geometry(
            "union requires at least one geometry".to_string(),
        ));
    }
    Ok(Geometry::MultiPolygon(polygons))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            vec![x0, y0],
            vec![x1, y0],
            vec![x1, y1],
            vec![x0, y1],
            vec![x0, y0],
        ]])
    }

    #[test]
    fn deserializes_geojson_polygon() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
        }))
        .unwrap();
        assert_eq!(geometry, square(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn bounds_of_polygon() {
        assert_eq!(bounds(&square(-1.0, -2.0, 3.0, 4.0)), [-1.0, -2.0, 3.0, 4.0]);
    }

    #[test]
    fn union_spans_all_constituents() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(2.0, 2.0, 3.0, 3.0);
        let merged = union(&[&a, &b]).unwrap();
        assert_eq!(bounds(&merged), [0.0, 0.0, 3.0, 3.0]);
        match merged {
            Geometry::MultiPolygon(polys) => assert_eq!(polys.len(), 2),
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }

    #[test]
    fn union_rejects_points() {
        let point = Geometry::Point(vec![0.0, 0.0]);
        assert!(union(&[&point]).is_err());
    }
}
