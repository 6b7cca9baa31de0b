// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The residual load-duration curve: the load that remains for the
//! dispatchable converters after the must-run converters have produced.

use super::LoadProfile;
use crate::{Curve, Error};

/// Builds the residual load-duration curve.
///
/// The residual load of every hour is the load minus the must-run production,
/// but never negative.  The range between zero and the highest residual load
/// is divided into `buckets` equal parts, and at each boundary `x` the curve
/// holds the fraction of hours in which the residual load is at least `x`.
///
/// `capacities` holds the installed capacity of each must-run group, in the
/// order of the load profile's group columns.
pub(crate) fn residual_load_curve(
    profile: &LoadProfile,
    capacities: &[f64],
    peak_load: f64,
    buckets: usize,
) -> Result<Curve, Error> {
    let residuals: Vec<f64> = profile
        .hours()
        .iter()
        .map(|hour| {
            let must_run: f64 = hour
                .must_run
                .iter()
                .zip(capacities)
                .map(|(production, capacity)| production * capacity)
                .sum();
            (hour.normalized_load * peak_load - must_run).max(0.0)
        })
        .collect();

    let max = residuals.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        tracing::warn!("Must-run production covers the load in every hour.");
        return Curve::try_new([(0.0, 0.0)]);
    }

    let hours = residuals.len() as f64;
    let points = (0..=buckets).map(|i| {
        let x = if i == buckets {
            max
        } else {
            max * i as f64 / buckets as f64
        };
        let count = residuals.iter().filter(|&&r| r >= x).count();
        (x, count as f64 / hours)
    });

    Curve::try_new(points)
}
