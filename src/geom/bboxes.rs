use crate::{Point, Vector};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Smallest box holding all points `pts`. None if `pts` is empty.
    pub fn from_points(pts: &[Point]) -> Option<Self> {
        let first = *pts.first()?;
        let mut min = first;
        let mut max = first;
        for p in &pts[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        }
    }

    /// Checks whether a point is inside the box (boundary included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Extent of the box along each axis.
    pub fn size(&self) -> Vector {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = vec![
            Point::new(1., 5., -2.),
            Point::new(-3., 2., 7.),
            Point::new(0., 0., 0.),
        ];
        let bbox = BoundingBox::from_points(&pts).unwrap();
        assert!(bbox.min.is_close(&Point::new(-3., 0., -2.)));
        assert!(bbox.max.is_close(&Point::new(1., 5., 7.)));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_padded() {
        let bbox = BoundingBox::from_points(&[Point::new(0., 0., 0.), Point::new(1., 1., 1.)])
            .unwrap()
            .padded(0.5);
        assert!(bbox.min.is_close(&Point::new(-0.5, -0.5, -0.5)));
        assert!(bbox.max.is_close(&Point::new(1.5, 1.5, 1.5)));
    }

    #[test]
    fn test_contains() {
        let bbox =
            BoundingBox::from_points(&[Point::new(0., 0., 0.), Point::new(2., 2., 2.)]).unwrap();
        assert!(bbox.contains(Point::new(1., 1., 1.)));
        // Boundary is inside
        assert!(bbox.contains(Point::new(0., 0., 0.)));
        assert!(bbox.contains(Point::new(2., 2., 2.)));
        assert!(!bbox.contains(Point::new(2.001, 1., 1.)));
    }

    #[test]
    fn test_size() {
        let bbox =
            BoundingBox::from_points(&[Point::new(0., 0., 0.), Point::new(2., 3., 4.)]).unwrap();
        assert!(bbox.size().is_close(&Vector::new(2., 3., 4.)));
    }
}
