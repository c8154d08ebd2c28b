use foundation::time::Hour;

use crate::isochrones::HourIndex;
use crate::layer::LayerSet;
use crate::symbology::{Emphasis, PolygonStyle};

/// Redraws the overlay for cursor hour `hour`.
///
/// Every indexed hour in `[1, min(hour, max_hour)]` is shown, the hour under
/// the cursor emphasized and earlier hours as a lighter trail. Each layer is
/// restyled from its own hour fraction, so repeated calls are idempotent.
/// Does nothing and returns `false` when the index is empty.
pub fn show_up_to(index: &mut HourIndex, visible: &mut LayerSet, hour: Hour) -> bool {
    let max_hour = index.max_hour;
    if max_hour == 0 {
        return false;
    }

    visible.clear();
    let upto = hour.min(max_hour);
    if upto == 0 {
        return true;
    }

    let HourIndex { layers, labels, .. } = index;
    for (&i, layer) in layers.range_mut(1..=upto) {
        let emphasis = if i == hour {
            Emphasis::Current
        } else {
            Emphasis::Trail
        };
        layer.set_style(PolygonStyle::for_hour(i, max_hour, emphasis));
        visible.add_isochrone(layer);

        if let Some(label) = labels.get_mut(&i) {
            label.open_tooltip();
            visible.add_label(label);
        }
    }
    true
}
