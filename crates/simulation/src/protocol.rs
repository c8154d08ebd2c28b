//! Wire types exchanged with the simulation service.
//!
//! - `POST /api/simulate`: [`SimulateRequest`] → GeoJSON feature collection
//!   with a `meta` object (kept verbatim in [`SimulationResult`]).
//! - `POST /api/report`: [`ReportRequest`] → PDF bytes.
//! - `GET /api/selftest`: → [`SelfTestReport`].

use scene::components::{Geometry, HourFeature};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::export::png_data_url;

pub const SIMULATE_PATH: &str = "/api/simulate";
pub const REPORT_PATH: &str = "/api/report";
pub const SELFTEST_PATH: &str = "/api/selftest";

/// User-tunable simulation inputs.
///
/// `wind_deg` uses the meteorological "from" convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub hours: u32,
    pub wind_ms: f64,
    pub wind_deg: f64,
    pub base_ros_ms: f64,
    pub slope_tan: f64,
    pub accumulate: bool,
    /// Derive slope from the DEM instead of `slope_tan`.
    pub use_dem: bool,
    /// Use hourly forecast wind instead of `wind_ms`/`wind_deg`.
    pub use_meteo: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            hours: 12,
            wind_ms: 6.0,
            wind_deg: 0.0,
            base_ros_ms: 0.02,
            slope_tan: 0.05,
            accumulate: false,
            use_dem: false,
            use_meteo: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub perimeter: Geometry,
    #[serde(flatten)]
    pub params: SimulationParams,
}

/// One row of the forecast preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// ISO-8601 local timestamp.
    pub t: String,
    pub ws_ms: f64,
    pub wd_deg: f64,
}

/// Descriptive metadata attached to a simulation response.
///
/// Only the fields used for advisories are typed; everything else is kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub use_dem: bool,
    pub use_meteo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_from_dem_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_from_dem_p90: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dem_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meteo_preview: Option<Vec<WeatherSample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meteo_error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// The `hour` property; missing or non-numeric values read as 0.
    pub fn hour(&self) -> i64 {
        let Some(v) = self.properties.as_ref().and_then(|p| p.get("hour")) else {
            return 0;
        };
        v.as_i64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0)
    }

    pub fn to_hour_feature(&self) -> HourFeature {
        HourFeature::new(self.hour(), Geometry::from_geojson(&self.geometry))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// A successful simulation response.
///
/// Keeps the verbatim JSON for export alongside the parsed view.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    raw: Value,
    collection: FeatureCollection,
}

impl SimulationResult {
    pub fn from_json(raw: Value) -> Result<Self, serde_json::Error> {
        let collection = FeatureCollection::deserialize(&raw)?;
        Ok(Self { raw, collection })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    pub fn hour_features(&self) -> impl Iterator<Item = HourFeature> + '_ {
        self.collection.features.iter().map(Feature::to_hour_feature)
    }

    pub fn meta(&self) -> Meta {
        self.collection.meta.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub params: SimulationParams,
    /// `data:image/png;base64,...`
    pub map_png: String,
}

impl ReportRequest {
    pub fn new(params: SimulationParams, png: &[u8]) -> Self {
        Self {
            params,
            map_png: png_data_url(png),
        }
    }
}

/// Server-side geometric sanity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestReport {
    pub area_increasing: bool,
    pub nested: bool,
    #[serde(default)]
    pub areas_m2: Vec<f64>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        self.area_increasing && self.nested
    }

    pub fn summary(&self) -> String {
        format!(
            "Self-tests:\n- Area increasing: {}\n- H+1 nested in H+2: {}",
            verdict(self.area_increasing),
            verdict(self.nested)
        )
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok { "OK" } else { "KO" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"hour": 1},
                 "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}},
                {"type": "Feature", "properties": {"hour": 2.0},
                 "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
                {"type": "Feature", "properties": null, "geometry": null}
            ],
            "meta": {"use_dem": true, "slope_from_dem_mean": 0.12, "meteo_source": "open-meteo:forecast"}
        })
    }

    #[test]
    fn parses_simulation_response() {
        let result = SimulationResult::from_json(response()).unwrap();
        let hours: Vec<i64> = result.features().iter().map(Feature::hour).collect();
        assert_eq!(hours, vec![1, 2, 0]);

        let features: Vec<HourFeature> = result.hour_features().collect();
        assert!(features[0].geometry.is_some());
        assert!(features[1].geometry.is_none());

        let meta = result.meta();
        assert!(meta.use_dem);
        assert_eq!(meta.slope_from_dem_mean, Some(0.12));
        assert_eq!(meta.extra.get("meteo_source"), Some(&json!("open-meteo:forecast")));
    }

    #[test]
    fn keeps_raw_response_verbatim() {
        let result = SimulationResult::from_json(response()).unwrap();
        assert_eq!(result.raw(), &response());
    }

    #[test]
    fn missing_meta_defaults() {
        let result = SimulationResult::from_json(json!({"features": []})).unwrap();
        assert_eq!(result.meta(), Meta::default());
        assert!(result.features().is_empty());
    }

    #[test]
    fn rejects_malformed_collection() {
        assert!(SimulationResult::from_json(json!({"features": 3})).is_err());
    }

    #[test]
    fn request_flattens_params() {
        let req = SimulateRequest {
            perimeter: Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]),
            params: SimulationParams::default(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["perimeter"]["type"], json!("Polygon"));
        assert_eq!(v["hours"], json!(12));
        assert_eq!(v["wind_ms"], json!(6.0));
        assert_eq!(v["use_meteo"], json!(false));
    }

    #[test]
    fn self_test_summary_reports_each_check() {
        let report: SelfTestReport =
            serde_json::from_value(json!({"area_increasing": true, "nested": false})).unwrap();
        assert!(!report.passed());
        assert_eq!(
            report.summary(),
            "Self-tests:\n- Area increasing: OK\n- H+1 nested in H+2: KO"
        );
    }
}
