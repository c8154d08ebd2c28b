use foundation::bounds::GeoBounds;
use foundation::time::Hour;

use crate::labels::HourLabel;
use crate::symbology::PolygonStyle;
use crate::vector::PolygonLayer;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;
}

/// What a visible layer looked like when it was added to the map.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibleLayer {
    Isochrone {
        id: LayerId,
        hour: Hour,
        style: PolygonStyle,
        bounds: GeoBounds,
    },
    Label {
        id: LayerId,
        hour: Hour,
        text: String,
        position: [f64; 2],
        tooltip_open: bool,
    },
}

impl VisibleLayer {
    pub fn hour(&self) -> Hour {
        match self {
            VisibleLayer::Isochrone { hour, .. } | VisibleLayer::Label { hour, .. } => *hour,
        }
    }
}

/// The result overlay: layers currently drawn on the map, in draw order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LayerSet {
    layers: Vec<VisibleLayer>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn add_isochrone(&mut self, layer: &PolygonLayer) {
        self.layers.push(VisibleLayer::Isochrone {
            id: layer.id(),
            hour: layer.hour,
            style: layer.style,
            bounds: layer.bounds,
        });
    }

    pub fn add_label(&mut self, label: &HourLabel) {
        self.layers.push(VisibleLayer::Label {
            id: label.id(),
            hour: label.hour,
            text: label.text.clone(),
            position: label.position,
            tooltip_open: label.tooltip_open,
        });
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisibleLayer> {
        self.layers.iter()
    }

    /// Hours with a visible isochrone, in draw order.
    pub fn isochrone_hours(&self) -> Vec<Hour> {
        self.layers
            .iter()
            .filter(|l| matches!(l, VisibleLayer::Isochrone { .. }))
            .map(VisibleLayer::hour)
            .collect()
    }

    /// Hours with a visible label, in draw order.
    pub fn label_hours(&self) -> Vec<Hour> {
        self.layers
            .iter()
            .filter(|l| matches!(l, VisibleLayer::Label { .. }))
            .map(VisibleLayer::hour)
            .collect()
    }

    pub fn isochrone_style(&self, hour: Hour) -> Option<PolygonStyle> {
        self.layers.iter().find_map(|l| match l {
            VisibleLayer::Isochrone { hour: h, style, .. } if *h == hour => Some(*style),
            _ => None,
        })
    }

    /// Union of the visible isochrone bounds.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.layers
            .iter()
            .filter_map(|l| match l {
                VisibleLayer::Isochrone { bounds, .. } => Some(*bounds),
                VisibleLayer::Label { .. } => None,
            })
            .reduce(GeoBounds::union)
    }
}
