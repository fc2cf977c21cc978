use crate::Vec3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box enclosing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut acc = BoundsAccumulator::default();
        for p in points {
            acc.include(p);
        }
        acc.finish()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Running min/max corner, folded one point at a time.
///
/// Starts at +inf/-inf; `finish` yields `None` until a point was included so
/// the infinite sentinel never escapes.
#[derive(Clone, Copy, Debug)]
pub struct BoundsAccumulator {
    min: Vec3,
    max: Vec3,
    count: usize,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
            count: 0,
        }
    }
}

impl BoundsAccumulator {
    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
        self.count += 1;
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(&self) -> Option<BoundingBox> {
        (self.count > 0).then(|| BoundingBox::new(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn empty_accumulator_has_no_box() {
        assert!(BoundsAccumulator::default().finish().is_none());
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn center_size_contains() {
        let b = BoundingBox::new(vec3(-1.0, 0.0, 0.0), vec3(3.0, 2.0, 4.0));
        assert_eq!(b.center(), vec3(1.0, 1.0, 2.0));
        assert_eq!(b.size(), vec3(4.0, 2.0, 4.0));
        assert!(b.contains(vec3(0.0, 1.0, 1.0)));
        assert!(!b.contains(vec3(0.0, 3.0, 1.0)));
    }
}
