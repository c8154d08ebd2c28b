use foundation::time::{Hour, hour_label};

use crate::symbology::{Hsl, color_for};

pub const LEGEND_TITLE: &str = "Isochrones (hours)";
/// Representative hours shown at most.
pub const LEGEND_MAX_ENTRIES: Hour = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub hour: Hour,
    pub label: String,
    pub color: Hsl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Swatches for hours `1..=min(max_hour, 6)`, spread over the full color
    /// range of the shown entries.
    pub fn for_max_hour(max_hour: Hour) -> Self {
        let n = max_hour.min(LEGEND_MAX_ENTRIES);
        let entries = (1..=n)
            .map(|i| LegendEntry {
                hour: i,
                label: hour_label(i),
                color: color_for(f64::from(i) / f64::from(n.max(1))),
            })
            .collect();
        Self {
            title: LEGEND_TITLE.to_string(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Legend;
    use crate::symbology::color_for;

    #[test]
    fn caps_at_six_entries() {
        let legend = Legend::for_max_hour(12);
        assert_eq!(legend.entries.len(), 6);
        assert_eq!(legend.entries[0].label, "H+1");
        assert_eq!(legend.entries[5].color, color_for(1.0));
    }

    #[test]
    fn short_runs_use_their_own_range() {
        let legend = Legend::for_max_hour(2);
        let hues: Vec<f64> = legend.entries.iter().map(|e| e.color.hue_deg).collect();
        assert_eq!(hues, vec![170.0, 320.0]);
    }

    #[test]
    fn empty_run_has_no_entries() {
        assert!(Legend::for_max_hour(0).entries.is_empty());
    }
}
