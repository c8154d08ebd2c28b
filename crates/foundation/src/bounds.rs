/// Geographic axis-aligned bounds in degrees, `[lon, lat]` order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl GeoBounds {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        GeoBounds { min, max }
    }

    /// Bounds of a single position.
    pub fn point(p: [f64; 2]) -> Self {
        GeoBounds { min: p, max: p }
    }

    /// Bounds covering every finite position, or `None` if there is none.
    pub fn from_positions<'a, I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64; 2]>,
    {
        let mut out: Option<GeoBounds> = None;
        for p in positions {
            if !(p[0].is_finite() && p[1].is_finite()) {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.extend(*p),
                None => out = Some(GeoBounds::point(*p)),
            }
        }
        out
    }

    pub fn extend(&mut self, p: [f64; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    pub fn union(self, other: GeoBounds) -> GeoBounds {
        GeoBounds {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Finite corners with `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
            && self.min[0] <= self.max[0]
            && self.min[1] <= self.max[1]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;

    #[test]
    fn from_positions_skips_non_finite() {
        let pts = [[1.0, 2.0], [f64::NAN, 0.0], [3.0, -1.0]];
        let b = GeoBounds::from_positions(pts.iter()).unwrap();
        assert_eq!(b, GeoBounds::new([1.0, -1.0], [3.0, 2.0]));
        assert_eq!(b.center(), [2.0, 0.5]);
    }

    #[test]
    fn empty_positions_have_no_bounds() {
        let pts: [[f64; 2]; 0] = [];
        assert!(GeoBounds::from_positions(pts.iter()).is_none());
    }

    #[test]
    fn union_covers_both() {
        let a = GeoBounds::new([0.0, 0.0], [1.0, 1.0]);
        let b = GeoBounds::new([-2.0, 0.5], [0.5, 3.0]);
        assert_eq!(a.union(b), GeoBounds::new([-2.0, 0.0], [1.0, 3.0]));
        assert!(a.union(b).is_valid());
    }

    #[test]
    fn inverted_or_nan_bounds_are_invalid() {
        assert!(!GeoBounds::new([1.0, 0.0], [0.0, 1.0]).is_valid());
        assert!(!GeoBounds::new([f64::NAN, 0.0], [0.0, 1.0]).is_valid());
        assert!(GeoBounds::point([2.0, 44.5]).is_valid());
    }
}
