// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating an [`EnergyGraph`].

mod validate_converters;
mod validate_links;

use crate::{EnergyGraph, Error};

/// The tolerance used when checking that slot conversions add up to at most
/// 1.0.
const CONVERSION_TOLERANCE: f64 = 1e-6;

pub(crate) struct EnergyGraphValidator<'a> {
    eg: &'a EnergyGraph,
}

impl EnergyGraph {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let validator = EnergyGraphValidator { eg: self };

        validator.validate_converters()?;
        validator.validate_slots()?;
        validator.validate_links()?;

        Ok(())
    }
}
