//! Human-readable advisories derived from response metadata.

use crate::protocol::{Meta, SimulationParams, WeatherSample};

/// Forecast rows shown in the weather advisory.
pub const WEATHER_PREVIEW_ROWS: usize = 6;

/// Where the slope used by the run came from.
pub fn slope_advisory(meta: &Meta, params: &SimulationParams) -> String {
    if meta.use_dem
        && let Some(mean) = meta.slope_from_dem_mean
    {
        return match meta.slope_from_dem_p90 {
            Some(p90) => format!("Slope (DEM): tanθ={mean:.3} (p90 {p90:.3})"),
            None => format!("Slope (DEM): tanθ={mean:.3}"),
        };
    }
    if let Some(err) = &meta.dem_error {
        return format!(
            "DEM unavailable ({err}). Manual slope: tanθ={:.3}",
            params.slope_tan
        );
    }
    format!("Manual slope: tanθ={:.3}", params.slope_tan)
}

/// Where the wind used by the run came from.
pub fn weather_advisory(meta: &Meta, params: &SimulationParams) -> String {
    if meta.use_meteo
        && let Some(preview) = &meta.meteo_preview
    {
        let rows: Vec<String> = preview
            .iter()
            .take(WEATHER_PREVIEW_ROWS)
            .map(preview_row)
            .collect();
        return format!("Weather (Open-Meteo), next hours: {}", rows.join(" | "));
    }
    if let Some(err) = &meta.meteo_error {
        return format!("Weather not used ({err}). Fixed wind applied.");
    }
    format!(
        "Fixed wind: {:.1} m/s, {:.0}° from",
        params.wind_ms, params.wind_deg
    )
}

fn preview_row(sample: &WeatherSample) -> String {
    format!(
        "{}: {:.1} m/s, {:.0}° from",
        clock_time(&sample.t),
        sample.ws_ms,
        sample.wd_deg
    )
}

/// `HH:MM` from an ISO timestamp, or the timestamp itself if it has no time
/// part.
fn clock_time(timestamp: &str) -> String {
    match timestamp.split('T').nth(1) {
        Some(time) if !time.is_empty() => time.chars().take(5).collect(),
        _ => timestamp.to_string(),
    }
}
