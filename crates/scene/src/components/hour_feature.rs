use crate::components::vector_geometry::Geometry;

/// One simulated isochrone: the region reached after `hour` hours.
///
/// `geometry` is `None` when the source feature did not carry a usable
/// areal geometry. `hour` is kept signed so malformed inputs can be
/// recognised and ignored downstream rather than wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct HourFeature {
    pub hour: i64,
    pub geometry: Option<Geometry>,
}

impl HourFeature {
    pub fn new(hour: i64, geometry: Option<Geometry>) -> Self {
        Self { hour, geometry }
    }
}
