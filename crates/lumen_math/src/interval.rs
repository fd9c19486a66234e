/// A closed range `[min, max]` over the reals.
///
/// The default interval is empty (`min = +inf`, `max = -inf`), which makes it
/// the identity for [`Interval::surrounding`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Create the interval spanning `a` and `b`, whichever order they come in.
    pub fn spanning(a: f32, b: f32) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// True when no value lies inside the interval.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// Unlike `f32::clamp` this never panics on an inverted interval.
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Widens the interval to at least `min_width`, keeping it centered.
    pub fn pad_to(&self, min_width: f32) -> Interval {
        if self.size() < min_width {
            self.expand(min_width)
        } else {
            *self
        }
    }

    /// Adds a scalar displacement to both min and max.
    pub fn offset(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);

        let negative = Interval::new(-5.0, 5.0);
        assert_eq!(negative.size(), 10.0);
    }

    #[test]
    fn test_interval_contains_and_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(10.1));

        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 10.0);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(5.0), 5.0);
        assert_eq!(interval.clamp(15.0), 10.0);
    }

    #[test]
    fn test_interval_default_is_empty() {
        let empty = Interval::default();

        assert_eq!(empty, Interval::EMPTY);
        assert!(empty.is_empty());
        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f32::INFINITY));
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.contains(1e10));
        assert!(universe.contains(-1e10));
        assert_eq!(universe.size(), f32::INFINITY);
    }

    #[test]
    fn test_interval_spanning_orders_endpoints() {
        assert_eq!(Interval::spanning(3.0, -1.0), Interval::new(-1.0, 3.0));
        assert_eq!(Interval::spanning(-1.0, 3.0), Interval::new(-1.0, 3.0));
    }

    #[test]
    fn test_interval_pad_to() {
        let thin = Interval::new(1.0, 1.0).pad_to(0.0001);
        assert!((thin.size() - 0.0001).abs() < 1e-7);
        assert!(thin.contains(1.0));

        let wide = Interval::new(0.0, 2.0);
        assert_eq!(wide.pad_to(0.0001), wide);
    }

    #[test]
    fn test_union_contains_members_of_either() {
        let pairs = [
            (Interval::new(0.0, 1.0), Interval::new(5.0, 6.0)),
            (Interval::new(-3.0, 2.0), Interval::new(-1.0, 0.5)),
            (Interval::EMPTY, Interval::new(4.0, 8.0)),
        ];
        let points = [-3.0, -1.0, 0.0, 0.5, 1.0, 2.0, 4.0, 5.5, 6.0, 8.0];

        for (a, b) in pairs {
            let union = Interval::surrounding(&a, &b);
            for x in points {
                if a.contains(x) || b.contains(x) {
                    assert!(union.contains(x), "{x} missing from {union:?}");
                }
            }
        }
    }

    #[test]
    fn test_empty_is_union_identity() {
        let a = Interval::new(-2.0, 3.0);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
        assert_eq!(Interval::surrounding(&a, &Interval::EMPTY), a);
    }
}
