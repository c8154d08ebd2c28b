use foundation::time::{Hour, hour_label};

use crate::layer::{Layer, LayerId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TooltipDirection {
    Center,
}

/// Presentation of an hour label: an invisible marker carrying a permanent
/// tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub marker_opacity: f32,
    pub permanent: bool,
    pub direction: TooltipDirection,
    pub class_name: &'static str,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            marker_opacity: 0.0,
            permanent: true,
            direction: TooltipDirection::Center,
            class_name: "time-label",
        }
    }
}

/// `H+<hour>` tag anchored at the center of an isochrone's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct HourLabel {
    id: LayerId,
    pub hour: Hour,
    pub text: String,
    pub position: [f64; 2],
    pub style: LabelStyle,
    pub tooltip_open: bool,
}

impl HourLabel {
    pub fn new(id: LayerId, hour: Hour, position: [f64; 2]) -> Self {
        Self {
            id,
            hour,
            text: hour_label(hour),
            position,
            style: LabelStyle::default(),
            tooltip_open: false,
        }
    }

    pub fn open_tooltip(&mut self) {
        self.tooltip_open = true;
    }
}

impl Layer for HourLabel {
    fn id(&self) -> LayerId {
        self.id
    }
}
