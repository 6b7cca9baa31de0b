// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `EnergyGraph` and
//! the merit order scheduler.

use serde::Deserialize;

/// Configuration options for the `EnergyGraph`.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub struct EnergyGraphConfig {
    /// Whether to allow converters whose input or output slot conversions add
    /// up to more than 1.0.  When this is `true`, such converters are only
    /// logged instead of being rejected.
    pub allow_unbalanced_slots: bool,

    /// Whether to allow links that don't have a matching output slot on their
    /// parent or a matching input slot on their child.
    pub allow_missing_slots: bool,
}

/// Configuration options for the merit order scheduler.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MeritOrderConfig {
    /// The number of equal-width buckets the residual load-duration curve is
    /// divided into.
    pub curve_buckets: usize,

    /// The number of hours in a year, used to turn capacity factors into full
    /// load hours.
    pub hours_per_year: f64,

    /// The position assigned to dispatchable converters without any
    /// installed capacity.
    pub unused_position: u32,

    /// The number of decimals the capacity interval widths are rounded to.
    pub capacity_precision: i32,
}

impl Default for MeritOrderConfig {
    fn default() -> Self {
        Self {
            curve_buckets: 10,
            hours_per_year: 8760.0,
            unused_position: 1000,
            capacity_precision: 3,
        }
    }
}

/// A group of must-run converters whose hourly production is given by one
/// column of the load profile.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MustRunGroup {
    pub name: String,
    /// The keys of the converters in the group.  The group's capacity is the
    /// sum of their installed capacities.
    pub converters: Vec<String>,
}

/// The must-run groups of the merit order, in the order of the group columns
/// of the load profile.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MustRunConfig {
    pub groups: Vec<MustRunGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: MeritOrderConfig =
            serde_json::from_str(r#"{ "curve_buckets": 20 }"#).unwrap();
        assert_eq!(config.curve_buckets, 20);
        assert_eq!(config.hours_per_year, 8760.0);
        assert_eq!(config.unused_position, 1000);
        assert_eq!(config.capacity_precision, 3);

        let config: EnergyGraphConfig =
            serde_json::from_str(r#"{ "allow_missing_slots": true }"#).unwrap();
        assert!(config.allow_missing_slots);
        assert!(!config.allow_unbalanced_slots);
    }

    #[test]
    fn test_deserialize_must_run() {
        let config: MustRunConfig = serde_json::from_str(
            r#"[
                { "name": "chp", "converters": ["industry_chp", "households_chp"] },
                { "name": "solar", "converters": ["solar_pv"] }
            ]"#,
        )
        .unwrap();

        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].name, "chp");
        assert_eq!(config.groups[0].converters, ["industry_chp", "households_chp"]);
        assert_eq!(config.groups[1].converters, ["solar_pv"]);
    }
}
