//! World geometry for the choropleth map.
//!
//! Reads a GeoJSON `FeatureCollection` of country boundaries, keeps the outer
//! ring of every polygon, projects it to Web-Mercator, triangulates it for
//! filling and answers hover queries with a point-in-polygon test.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Latitudes beyond this are clamped before projecting.
const MAX_LATITUDE: f64 = 85.0;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to read geography file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
    #[error("no named polygon features found")]
    NoFeatures,
}

/// One named country with its projected outer rings.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    /// Feature name as given by the geography file.
    pub name: String,
    pub iso_a2: Option<String>,
    /// Projected `[x, y]` rings, one per polygon part.
    pub rings: Vec<Vec<[f64; 2]>>,
    /// Fill triangles covering all rings.
    pub triangles: Vec<Triangle>,
}

pub type Triangle = [[f64; 2]; 3];

impl CountryShape {
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, point))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Geography {
    pub shapes: Vec<CountryShape>,
}

impl Geography {
    /// First shape containing the projected `point`.
    pub fn hit_test(&self, point: [f64; 2]) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.contains(point))
    }
}

pub fn load_geography(path: &Path) -> Result<Geography, GeoError> {
    let text = std::fs::read_to_string(path)?;
    let geo = parse_geography(&text)?;
    log::info!(
        "Loaded {} country shapes from {}",
        geo.shapes.len(),
        path.display()
    );
    Ok(geo)
}

pub fn parse_geography(text: &str) -> Result<Geography, GeoError> {
    let root: JsonValue = serde_json::from_str(text)?;
    if root.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return Err(GeoError::NotFeatureCollection);
    }
    let features = root
        .get("features")
        .and_then(JsonValue::as_array)
        .ok_or(GeoError::NotFeatureCollection)?;

    let shapes: Vec<CountryShape> = features.iter().filter_map(feature_to_shape).collect();
    if shapes.is_empty() {
        return Err(GeoError::NoFeatures);
    }
    Ok(Geography { shapes })
}

fn feature_to_shape(feature: &JsonValue) -> Option<CountryShape> {
    let props = feature.get("properties")?;
    let name = ["name", "NAME", "ADMIN"]
        .iter()
        .find_map(|key| props.get(*key).and_then(JsonValue::as_str))?
        .to_string();
    let iso_a2 = ["iso_a2", "ISO_A2"]
        .iter()
        .find_map(|key| props.get(*key).and_then(JsonValue::as_str))
        .map(str::to_string);

    let geometry = feature.get("geometry")?;
    let coords = geometry.get("coordinates")?.as_array()?;
    let outer_rings: Vec<&JsonValue> = match geometry.get("type")?.as_str()? {
        "Polygon" => coords.first().into_iter().collect(),
        "MultiPolygon" => coords
            .iter()
            .filter_map(|poly| poly.as_array()?.first())
            .collect(),
        _ => return None,
    };

    let rings: Vec<Vec<[f64; 2]>> = outer_rings.into_iter().filter_map(parse_ring).collect();
    if rings.is_empty() {
        return None;
    }
    let triangles = rings.iter().flat_map(|ring| triangulate(ring)).collect();
    Some(CountryShape {
        name,
        iso_a2,
        rings,
        triangles,
    })
}

fn parse_ring(ring: &JsonValue) -> Option<Vec<[f64; 2]>> {
    let points: Vec<[f64; 2]> = ring
        .as_array()?
        .iter()
        .filter_map(|pos| {
            let pos = pos.as_array()?;
            let lon = pos.first()?.as_f64()?;
            let lat = pos.get(1)?.as_f64()?;
            Some(project(lon, lat))
        })
        .collect();
    (points.len() >= 3).then_some(points)
}

/// Web-Mercator projection of degrees to plot units (radians-scaled).
pub fn project(lon: f64, lat: f64) -> [f64; 2] {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    [lon.to_radians(), (FRAC_PI_4 + lat / 2.0).tan().ln()]
}

/// Ear-clipping triangulation of a simple ring (closed or open).
/// Degenerate rings yield no triangles.
pub fn triangulate(ring: &[[f64; 2]]) -> Vec<Triangle> {
    let open = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    let flat: Vec<f64> = open.iter().flatten().copied().collect();
    let indices = match earcutr::earcut(&flat, &[], 2) {
        Ok(indices) => indices,
        Err(e) => {
            log::debug!("Skipping ring that cannot be triangulated: {e:?}");
            return Vec::new();
        }
    };
    indices
        .chunks_exact(3)
        .map(|t| [open[t[0]], open[t[1]], open[t[2]]])
        .collect()
}

/// Even-odd rule point-in-polygon test.
pub fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Dataset entity name for a geography feature name.
pub fn data_name<'a>(feature_name: &'a str, aliases: &'a BTreeMap<String, String>) -> &'a str {
    aliases
        .get(feature_name)
        .map(String::as_str)
        .unwrap_or(feature_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Squareland", "iso_a2": "SQ"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"NAME": "Twin Isles"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [25, 0], [25, 5], [20, 0]]],
                        [[[30, 0], [35, 0], [35, 5], [30, 0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Pointy"},
                "geometry": {"type": "Point", "coordinates": [1, 1]}
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let geo = parse_geography(SAMPLE).unwrap();
        assert_eq!(geo.shapes.len(), 2);
        assert_eq!(geo.shapes[0].name, "Squareland");
        assert_eq!(geo.shapes[0].iso_a2.as_deref(), Some("SQ"));
        assert_eq!(geo.shapes[1].name, "Twin Isles");
        assert_eq!(geo.shapes[1].rings.len(), 2);
    }

    #[test]
    fn hit_test_finds_the_country_under_the_pointer() {
        let geo = parse_geography(SAMPLE).unwrap();
        let inside = project(5.0, 5.0);
        assert_eq!(geo.hit_test(inside).map(|s| s.name.as_str()), Some("Squareland"));
        let second_part = project(34.0, 1.0);
        assert_eq!(geo.hit_test(second_part).map(|s| s.name.as_str()), Some("Twin Isles"));
        assert!(geo.hit_test(project(-50.0, -50.0)).is_none());
    }

    fn area([a, b, c]: Triangle) -> f64 {
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
    }

    #[test]
    fn concave_ring_triangulates_to_its_area() {
        // L shape: a 2x2 square missing its top-right quarter.
        let ring = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0], [1.0, 2.0], [0.0, 2.0], [0.0, 0.0]];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 4);
        let total: f64 = triangles.iter().map(|t| area(*t)).sum();
        assert!((total - 3.0).abs() < 1e-12);
        // No triangle covers the missing quarter.
        assert!(!triangles.iter().any(|t| ring_contains(t, [1.5, 1.5])));
    }

    #[test]
    fn shapes_carry_fill_triangles() {
        let geo = parse_geography(SAMPLE).unwrap();
        assert_eq!(geo.shapes[0].triangles.len(), 2);
        assert_eq!(geo.shapes[1].triangles.len(), 2);
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
    }

    #[test]
    fn projection_is_mercator_and_clamped() {
        let [x, y] = project(180.0, 0.0);
        assert!((x - std::f64::consts::PI).abs() < 1e-12);
        assert!(y.abs() < 1e-12);
        assert_eq!(project(0.0, 89.0), project(0.0, 85.0));
        assert!(project(0.0, 45.0)[1] > 45f64.to_radians());
    }

    #[test]
    fn aliases_map_feature_names() {
        let mut aliases = BTreeMap::new();
        aliases.insert("United States of America".to_string(), "United States".to_string());
        assert_eq!(data_name("United States of America", &aliases), "United States");
        assert_eq!(data_name("France", &aliases), "France");
    }

    #[test]
    fn rejects_non_collections() {
        assert!(matches!(
            parse_geography(r#"{"type": "Feature"}"#),
            Err(GeoError::NotFeatureCollection)
        ));
        assert!(matches!(
            parse_geography(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(GeoError::NoFeatures)
        ));
        assert!(matches!(parse_geography("not json"), Err(GeoError::Json(_))));
    }

    #[test]
    fn load_geography_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let geo = load_geography(file.path()).unwrap();
        assert_eq!(geo.shapes.len(), 2);
        assert!(matches!(
            load_geography(Path::new("/nonexistent/world.geojson")),
            Err(GeoError::Io(_))
        ));
    }
}
