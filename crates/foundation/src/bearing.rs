/// Wind bearings follow the meteorological "from" convention.
///
/// Converts a "from" bearing to the direction the wind blows towards.
pub fn wind_towards_deg(from_deg: f64) -> f64 {
    (from_deg + 180.0).rem_euclid(360.0)
}
