// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Piecewise linear curves, and the areas under them.

mod polygon;

use polygon::Polygon;

use crate::Error;

/// A piecewise linear curve through a list of points with strictly
/// increasing x values and non-negative y values.
///
/// Used to represent load-duration curves, where `y_at(x)` is the fraction of
/// time in which the load is at least `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: Vec<(f64, f64)>,
}

impl Curve {
    /// Creates a new curve from the given points.
    ///
    /// Returns an error if there are no points, if any coordinate is not
    /// finite, if a y value is negative or if the x values are not strictly
    /// increasing.
    pub fn try_new(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, Error> {
        let points: Vec<(f64, f64)> = points.into_iter().collect();

        if points.is_empty() {
            return Err(Error::invalid_curve("A curve needs at least one point."));
        }
        for &(x, y) in &points {
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::invalid_curve(format!(
                    "Point ({x}, {y}) is not finite."
                )));
            }
            if y < 0.0 {
                return Err(Error::invalid_curve(format!(
                    "Point ({x}, {y}) has a negative y value."
                )));
            }
        }
        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(Error::invalid_curve(format!(
                "x values must be strictly increasing, found {} after {}.",
                w[1].0, w[0].0
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Returns the y value of the curve at `x`.
    ///
    /// The curve is flat before its first point, and drops to `0.0` at its
    /// last point.
    pub fn y_at(&self, x: f64) -> f64 {
        if x == 0.0 {
            return self.points[0].1;
        }
        if x >= self.last_x() {
            return 0.0;
        }
        self.interpolate(x)
    }

    /// Returns the area under the curve between `x_left` and `x_right`.
    ///
    /// The arguments may be given in either order.  There is no area beyond
    /// the last point of the curve.
    pub fn area_between(&self, x_left: f64, x_right: f64) -> f64 {
        let (x_left, x_right) = if x_left <= x_right {
            (x_left, x_right)
        } else {
            (x_right, x_left)
        };
        let last_x = self.last_x();
        let (x_left, x_right) = (x_left.min(last_x), x_right.min(last_x));
        if x_left >= x_right {
            return 0.0;
        }

        // The drop to zero at the last point has no width, so the polygon
        // follows the last segment up to its end.
        let mut polygon = Polygon::new();
        polygon.push(x_left, 0.0);
        polygon.push(x_left, self.interpolate(x_left));
        for &(x, y) in self
            .points
            .iter()
            .filter(|(x, _)| *x > x_left && *x < x_right)
        {
            polygon.push(x, y);
        }
        polygon.push(x_right, self.interpolate(x_right));
        polygon.push(x_right, 0.0);

        polygon.area()
    }

    fn last_x(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }

    /// Linear interpolation between the two points around `x`, including the
    /// last point itself.
    fn interpolate(&self, x: f64) -> f64 {
        let (first_x, first_y) = self.points[0];
        if x <= first_x {
            return first_y;
        }

        let Some(w) = self
            .points
            .windows(2)
            .find(|w| w[0].0 <= x && x <= w[1].0)
        else {
            return 0.0;
        };
        let ((x1, y1), (x2, y2)) = (w[0], w[1]);

        let slope = (y2 - y1) / (x2 - x1);
        let intercept = y1 - slope * x1;
        let y = slope * x + intercept;
        if y.is_finite() {
            y
        } else {
            0.0
        }
    }
}
