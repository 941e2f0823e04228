/// A closed range `[min, max]` along one axis or along a ray.
///
/// An interval with `min > max` is empty. `Interval::EMPTY` is the identity
/// for [`Interval::surrounding`], which is what lets bounding boxes start
/// empty and grow by repeated unions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns the midpoint of the interval.
    pub fn center(&self) -> f32 {
        self.min + self.size() * 0.5
    }

    /// True when the interval contains no value.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Grows the interval by `pad` on both ends.
    pub fn pad(&self, pad: f32) -> Interval {
        Interval::new(self.min - pad, self.max + pad)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size_and_center() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);
        assert_eq!(interval.center(), 4.5);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_pad() {
        let padded = Interval::new(0.0, 10.0).pad(2.0);
        assert_eq!(padded.min, -2.0);
        assert_eq!(padded.max, 12.0);
    }

    #[test]
    fn test_empty_is_identity_for_surrounding() {
        let a = Interval::new(-1.0, 3.0);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
        assert_eq!(Interval::surrounding(&a, &Interval::EMPTY), a);
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
    }

    #[test]
    fn test_empty_stays_empty_when_padded() {
        assert!(Interval::EMPTY.pad(1.0).is_empty());
    }
}
