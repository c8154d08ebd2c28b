use std::collections::BTreeMap;

use foundation::time::Hour;
use scene::components::HourFeature;
use tracing::debug;

use crate::labels::HourLabel;
use crate::layer::LayerId;
use crate::symbology::{Emphasis, PolygonStyle};
use crate::vector::PolygonLayer;

/// Hour-indexed isochrone layers and their labels.
///
/// Lookups are explicit maps: an hour the simulation did not produce, or whose
/// geometry could not be drawn, is simply absent. The index spans
/// `[1, max_hour]`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HourIndex {
    pub(crate) max_hour: Hour,
    pub(crate) layers: BTreeMap<Hour, PolygonLayer>,
    pub(crate) labels: BTreeMap<Hour, HourLabel>,
}

impl HourIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indexes one layer (and label) per positive hour.
    ///
    /// `max_hour` is the largest positive hour present, or 0. Features with a
    /// non-positive hour, no geometry, or a degenerate geometry are skipped
    /// without affecting the others. When two features share an hour, the
    /// later drawable one wins.
    pub fn build<I>(features: I) -> Self
    where
        I: IntoIterator<Item = HourFeature>,
    {
        let features: Vec<HourFeature> = features.into_iter().collect();
        let max_hour = features
            .iter()
            .filter_map(|f| positive_hour(f.hour))
            .max()
            .unwrap_or(0);

        let mut index = HourIndex {
            max_hour,
            ..HourIndex::default()
        };
        let mut next_id = 0u64;
        let mut alloc = || {
            let id = LayerId(next_id);
            next_id += 1;
            id
        };

        for feature in features {
            let Some(hour) = positive_hour(feature.hour) else {
                debug!(hour = feature.hour, "ignoring feature outside the hour range");
                continue;
            };
            let Some(geometry) = feature.geometry else {
                debug!(hour, "ignoring feature without areal geometry");
                continue;
            };
            let style = PolygonStyle::for_hour(hour, max_hour, Emphasis::Base);
            let Some(layer) = PolygonLayer::new(alloc(), hour, geometry, style) else {
                debug!(hour, "ignoring degenerate isochrone");
                continue;
            };
            let label = HourLabel::new(alloc(), hour, layer.bounds.center());
            index.layers.insert(hour, layer);
            index.labels.insert(hour, label);
        }

        debug!(
            max_hour,
            indexed = index.layers.len(),
            "built hour index"
        );
        index
    }

    pub fn max_hour(&self) -> Hour {
        self.max_hour
    }

    pub fn layer(&self, hour: Hour) -> Option<&PolygonLayer> {
        self.layers.get(&hour)
    }

    pub fn label(&self, hour: Hour) -> Option<&HourLabel> {
        self.labels.get(&hour)
    }

    /// Indexed hours in ascending order.
    pub fn hours(&self) -> impl Iterator<Item = Hour> + '_ {
        self.layers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

fn positive_hour(hour: i64) -> Option<Hour> {
    Hour::try_from(hour).ok().filter(|h| *h >= 1)
}

#[cfg(test)]
mod tests {
    use super::HourIndex;
    use crate::symbology::{Emphasis, color_for};
    use pretty_assertions::assert_eq;
    use scene::components::{Geometry, HourFeature};

    fn square(size: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [size, 0.0],
            [size, size],
            [0.0, size],
            [0.0, 0.0],
        ]])
    }

    fn feature(hour: i64, size: f64) -> HourFeature {
        HourFeature::new(hour, Some(square(size)))
    }

    #[test]
    fn max_hour_is_largest_hour() {
        let index = HourIndex::build(vec![feature(2, 2.0), feature(5, 5.0), feature(1, 1.0)]);
        assert_eq!(index.max_hour(), 5);
        assert_eq!(index.hours().collect::<Vec<_>>(), vec![1, 2, 5]);
        assert!(index.layer(3).is_none());
        assert!(index.label(3).is_none());
    }

    #[test]
    fn empty_result_has_zero_max() {
        let index = HourIndex::build(Vec::new());
        assert_eq!(index.max_hour(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn non_positive_hours_are_ignored() {
        let index = HourIndex::build(vec![feature(0, 1.0), feature(-4, 1.0), feature(2, 2.0)]);
        assert_eq!(index.max_hour(), 2);
        assert_eq!(index.hours().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn degenerate_hour_is_skipped_but_counts_towards_max() {
        let flat = HourFeature::new(3, Some(Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 1.0]]])));
        let missing = HourFeature::new(4, None);
        let index = HourIndex::build(vec![feature(1, 1.0), flat, missing, feature(2, 2.0)]);
        assert_eq!(index.max_hour(), 4);
        assert_eq!(index.hours().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn layers_start_at_base_emphasis_colored_by_fraction() {
        let index = HourIndex::build(vec![feature(1, 1.0), feature(4, 4.0)]);
        let style = index.layer(1).unwrap().style;
        assert_eq!(style.emphasis, Emphasis::Base);
        assert_eq!(style.color, color_for(0.25));
        assert_eq!(index.layer(4).unwrap().style.color, color_for(1.0));
    }

    #[test]
    fn labels_sit_at_bounds_center() {
        let index = HourIndex::build(vec![feature(2, 4.0)]);
        let label = index.label(2).unwrap();
        assert_eq!(label.text, "H+2");
        assert_eq!(label.position, [2.0, 2.0]);
    }

    #[test]
    fn later_feature_wins_for_duplicate_hour() {
        let index = HourIndex::build(vec![feature(1, 1.0), feature(1, 3.0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.layer(1).unwrap().bounds.max, [3.0, 3.0]);
    }
}
