// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Areas of simple polygons.

/// A simple polygon, given by its vertices in order.
///
/// The polygon is implicitly closed: the last vertex connects back to the
/// first.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, x: f64, y: f64) {
        self.vertices.push((x, y));
    }

    /// Returns the area of the polygon, using the shoelace formula.
    ///
    /// The result doesn't depend on the orientation of the vertices.
    pub(crate) fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }

        let sum: f64 = (0..n)
            .map(|i| {
                let (x1, y1) = self.vertices[i];
                let (x2, y2) = self.vertices[(i + 1) % n];
                x1 * y2 - x2 * y1
            })
            .sum();

        sum.abs() / 2.0
    }
}

impl FromIterator<(f64, f64)> for Polygon {
    fn from_iter<T: IntoIterator<Item = (f64, f64)>>(iter: T) -> Self {
        Self {
            vertices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        let square: Polygon = [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]
            .into_iter()
            .collect();
        assert_eq!(square.area(), 4.0);

        let counter_clockwise: Polygon = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
            .into_iter()
            .collect();
        assert_eq!(counter_clockwise.area(), 4.0);

        let mut triangle = Polygon::new();
        triangle.push(0.0, 0.0);
        triangle.push(4.0, 0.0);
        triangle.push(0.0, 3.0);
        assert_eq!(triangle.area(), 6.0);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(Polygon::new().area(), 0.0);

        let line: Polygon = [(0.0, 0.0), (5.0, 5.0)].into_iter().collect();
        assert_eq!(line.area(), 0.0);

        let collinear: Polygon = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)].into_iter().collect();
        assert_eq!(collinear.area(), 0.0);
    }
}
