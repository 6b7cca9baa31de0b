// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Carrier` struct, which represents the energy or
//! material type flowing through a link.

/// The key of the carrier through which converters emit their losses.
pub const LOSS: &str = "loss";

/// The key of the carrier dispatchable power plants produce.
pub const ELECTRICITY: &str = "electricity";

/// An energy or material type (electricity, gas, heat, ...) with its
/// physical constants.
///
/// Carriers are read-only for the duration of a calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct Carrier {
    key: String,
    sustainable_share: f64,
    co2_per_mj: f64,
    cost_per_mj: f64,
    is_infinite: bool,
}

impl Carrier {
    /// Creates a new carrier with no emissions, no costs and a sustainable
    /// share of zero.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sustainable_share: 0.0,
            co2_per_mj: 0.0,
            cost_per_mj: 0.0,
            is_infinite: false,
        }
    }

    pub fn with_sustainable_share(mut self, sustainable_share: f64) -> Self {
        self.sustainable_share = sustainable_share;
        self
    }

    pub fn with_co2_per_mj(mut self, co2_per_mj: f64) -> Self {
        self.co2_per_mj = co2_per_mj;
        self
    }

    pub fn with_cost_per_mj(mut self, cost_per_mj: f64) -> Self {
        self.cost_per_mj = cost_per_mj;
        self
    }

    /// Marks the carrier as an infinite (renewable) source, like wind or
    /// solar.
    pub fn infinite(mut self) -> Self {
        self.is_infinite = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the share of this carrier that is sustainable, between 0.0 and
    /// 1.0.
    pub fn sustainable_share(&self) -> f64 {
        self.sustainable_share
    }

    pub fn co2_per_mj(&self) -> f64 {
        self.co2_per_mj
    }

    pub fn cost_per_mj(&self) -> f64 {
        self.cost_per_mj
    }

    pub fn is_infinite(&self) -> bool {
        self.is_infinite
    }

    pub fn is_loss(&self) -> bool {
        self.key == LOSS
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
