use foundation::bounds::GeoBounds;
use foundation::time::Hour;
use scene::components::Geometry;

use crate::layer::{Layer, LayerId};
use crate::symbology::PolygonStyle;

/// A renderable isochrone polygon for one hour.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLayer {
    id: LayerId,
    pub hour: Hour,
    pub geometry: Geometry,
    pub bounds: GeoBounds,
    pub style: PolygonStyle,
}

impl PolygonLayer {
    /// Returns `None` when the geometry cannot be drawn: it encloses no
    /// area or has no finite coordinates.
    pub fn new(id: LayerId, hour: Hour, geometry: Geometry, style: PolygonStyle) -> Option<Self> {
        if geometry.is_degenerate() {
            return None;
        }
        let bounds = geometry.bounds().filter(GeoBounds::is_valid)?;
        Some(Self {
            id,
            hour,
            geometry,
            bounds,
            style,
        })
    }

    pub fn set_style(&mut self, style: PolygonStyle) {
        self.style = style;
    }
}

impl Layer for PolygonLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}
