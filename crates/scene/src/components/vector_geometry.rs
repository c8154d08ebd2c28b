use foundation::bounds::GeoBounds;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// `[lon, lat]` in degrees.
pub type Position = [f64; 2];
/// A closed ring; the first ring of a polygon is the outer boundary.
pub type Ring = Vec<Position>;

/// Areal GeoJSON geometry in geographic coordinates.
///
/// Serialized exactly as GeoJSON, e.g.
/// `{"type":"Polygon","coordinates":[[[lon,lat],...]]}`. Positions carrying
/// altitude or further elements are accepted and truncated to `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    #[serde(deserialize_with = "polygon_rings")]
    Polygon(Vec<Ring>),
    #[serde(deserialize_with = "multipolygon_rings")]
    MultiPolygon(Vec<Vec<Ring>>),
}

/// A GeoJSON position with at least two elements.
struct LenientPosition(Position);

impl<'de> Deserialize<'de> for LenientPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            [lon, lat, ..] => Ok(LenientPosition([*lon, *lat])),
            _ => Err(D::Error::invalid_length(
                values.len(),
                &"a position with at least two elements",
            )),
        }
    }
}

fn into_rings(raw: Vec<Vec<LenientPosition>>) -> Vec<Ring> {
    raw.into_iter()
        .map(|ring| ring.into_iter().map(|p| p.0).collect())
        .collect()
}

fn polygon_rings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Ring>, D::Error> {
    Vec::<Vec<LenientPosition>>::deserialize(deserializer).map(into_rings)
}

fn multipolygon_rings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Vec<Ring>>, D::Error> {
    let raw = Vec::<Vec<Vec<LenientPosition>>>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(into_rings).collect())
}

impl Geometry {
    /// Parses a GeoJSON geometry object; anything that is not an areal
    /// geometry yields `None`.
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        Geometry::deserialize(value).ok()
    }

    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Polygons as ring lists.
    pub fn polygons(&self) -> impl Iterator<Item = &[Ring]> {
        let slice: &[Vec<Ring>] = match self {
            Geometry::Polygon(rings) => std::slice::from_ref(rings),
            Geometry::MultiPolygon(polys) => polys,
        };
        slice.iter().map(|p| p.as_slice())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.polygons().flatten().flatten()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_positions(self.positions())
    }

    /// True when no polygon has an outer ring that encloses any area.
    pub fn is_degenerate(&self) -> bool {
        !self
            .polygons()
            .filter_map(|rings| rings.first())
            .any(|outer| ring_encloses_area(outer))
    }
}

fn ring_encloses_area(ring: &[Position]) -> bool {
    if !ring.iter().all(|p| p[0].is_finite() && p[1].is_finite()) {
        return false;
    }
    // Three distinct vertices are enough; stop looking once found.
    let mut distinct: Vec<Position> = Vec::with_capacity(3);
    for p in ring {
        if distinct.len() == 3 {
            break;
        }
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }
    distinct.len() == 3 && shoelace_area(ring).abs() > 0.0
}

/// Signed planar area in square degrees.
pub fn shoelace_area(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        twice += a[0] * b[1] - b[0] * a[1];
    }
    twice * 0.5
}

#[cfg(test)]
mod tests {
    use super::{Geometry, shoelace_area};
    use foundation::bounds::GeoBounds;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn square() -> Geometry {
        Geometry::Polygon(vec![vec![
            [1.0, 43.0],
            [1.1, 43.0],
            [1.1, 43.1],
            [1.0, 43.1],
            [1.0, 43.0],
        ]])
    }

    #[test]
    fn parses_geojson_polygon() {
        let v = json!({
            "type": "Polygon",
            "coordinates": [[[1.0, 43.0], [1.1, 43.0], [1.1, 43.1], [1.0, 43.1], [1.0, 43.0]]]
        });
        assert_eq!(Geometry::from_geojson(&v), Some(square()));
        assert_eq!(square().to_geojson(), v);
    }

    #[test]
    fn rejects_non_areal_geometry() {
        let v = json!({"type": "Point", "coordinates": [1.0, 2.0]});
        assert_eq!(Geometry::from_geojson(&v), None);
        assert_eq!(Geometry::from_geojson(&json!(null)), None);
    }

    #[test]
    fn multipolygon_bounds_cover_all_parts() {
        let g = Geometry::MultiPolygon(vec![
            vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![vec![[5.0, 5.0], [6.0, 5.0], [6.0, 7.0], [5.0, 5.0]]],
        ]);
        assert_eq!(g.bounds(), Some(GeoBounds::new([0.0, 0.0], [6.0, 7.0])));
        assert!(!g.is_degenerate());
    }

    #[test]
    fn collapsed_rings_are_degenerate() {
        let line = Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]]);
        assert!(line.is_degenerate());
        let empty = Geometry::Polygon(vec![]);
        assert!(empty.is_degenerate());
        assert!(empty.bounds().is_none());
        let two = Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]);
        assert!(two.is_degenerate());
    }

    #[test]
    fn dense_rings_are_checked_in_one_pass() {
        let n = 20_000;
        let mut ring: Vec<[f64; 2]> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                [a.cos(), a.sin()]
            })
            .collect();
        ring.push(ring[0]);
        let circle = Geometry::Polygon(vec![ring.clone()]);
        assert!(!circle.is_degenerate());

        ring[n - 1] = [f64::NAN, 0.0];
        assert!(Geometry::Polygon(vec![ring]).is_degenerate());
    }

    #[test]
    fn positions_with_altitude_are_truncated() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[1.0, 43.0, 120.0], [1.1, 43.0, 95.5], [1.1, 43.1, 80.0],
                             [1.0, 43.1, 101.0, 7.0], [1.0, 43.0, 120.0]]]
        });
        assert_eq!(Geometry::from_geojson(&value), Some(square()));
        assert_eq!(square().to_geojson()["coordinates"][0][0], json!([1.0, 43.0]));

        let multi = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 0.0, 1.0]]]]
        });
        let parsed = Geometry::from_geojson(&multi).unwrap();
        assert_eq!(parsed.positions().next(), Some(&[0.0, 0.0]));
    }

    #[test]
    fn short_positions_are_rejected() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[1.0, 43.0], [2.0], [2.0, 44.0], [1.0, 43.0]]]
        });
        assert_eq!(Geometry::from_geojson(&value), None);
    }

    #[test]
    fn shoelace_sign_follows_winding() {
        let ccw = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        assert_eq!(shoelace_area(&ccw), 4.0);
        let mut cw = ccw;
        cw.reverse();
        assert_eq!(shoelace_area(&cw), -4.0);
    }
}
