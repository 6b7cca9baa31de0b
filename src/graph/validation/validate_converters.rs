// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating the attributes and slots of the converters in an
//! [`EnergyGraph`][crate::EnergyGraph].

use std::collections::HashSet;

use crate::slot::SlotDirection;
use crate::{Converter, Error};

use super::{EnergyGraphValidator, CONVERSION_TOLERANCE};

impl EnergyGraphValidator<'_> {
    /// Validates that the numeric attributes of all converters are within
    /// their domains:
    ///  - availability between 0.0 and 1.0,
    ///  - demand and installed capacity, when known, not negative.
    pub(super) fn validate_converters(&self) -> Result<(), Error> {
        for converter in self.eg.converters() {
            let key = converter.key();
            let availability = converter.availability();
            if !(0.0..=1.0).contains(&availability) {
                return Err(Error::invalid_converter(format!(
                    "Converter {key} has an availability of {availability}, expected 0.0..=1.0."
                )));
            }
            if let Some(demand) = converter.demand() {
                if !(demand >= 0.0 && demand.is_finite()) {
                    return Err(Error::invalid_converter(format!(
                        "Converter {key} has an invalid demand: {demand}"
                    )));
                }
            }
            if let Some(capacity) = converter.installed_capacity() {
                if !(capacity >= 0.0 && capacity.is_finite()) {
                    return Err(Error::invalid_converter(format!(
                        "Converter {key} has an invalid installed capacity: {capacity}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validates that the slots of all converters:
    ///  - refer to known carriers,
    ///  - have conversions between 0.0 and 1.0,
    ///  - are unique per carrier and direction,
    ///  - have conversions that add up to at most 1.0 per direction.
    pub(super) fn validate_slots(&self) -> Result<(), Error> {
        for converter in self.eg.converters() {
            let key = converter.key();
            let mut seen = HashSet::new();

            for slot in converter.slots() {
                let carrier = slot.carrier();
                if !self.eg.carriers.contains_key(carrier) {
                    return Err(Error::carrier_not_found(format!(
                        "Converter {key}: {} slot refers to unknown carrier {carrier}",
                        slot.direction()
                    )));
                }
                if !(0.0..=1.0).contains(&slot.conversion()) {
                    return Err(Error::invalid_converter(format!(
                        "Converter {key}: {} slot for {carrier} has conversion {}, expected 0.0..=1.0.",
                        slot.direction(),
                        slot.conversion()
                    )));
                }
                if !seen.insert((slot.direction(), carrier)) {
                    return Err(Error::invalid_converter(format!(
                        "Converter {key} has multiple {} slots for {carrier}.",
                        slot.direction()
                    )));
                }
            }

            for direction in [SlotDirection::Input, SlotDirection::Output] {
                self.ensure_balanced(converter, direction)?;
            }
        }
        Ok(())
    }

    fn ensure_balanced(&self, converter: &Converter, direction: SlotDirection) -> Result<(), Error> {
        let total: f64 = converter
            .slots()
            .iter()
            .filter(|s| s.direction() == direction)
            .map(|s| s.conversion())
            .sum();

        if total <= 1.0 + CONVERSION_TOLERANCE {
            return Ok(());
        }

        if self.eg.config.allow_unbalanced_slots {
            tracing::warn!(
                "Converter {} has {} conversions adding up to {}.",
                converter.key(),
                direction,
                total
            );
            return Ok(());
        }

        Err(Error::invalid_converter(format!(
            "Converter {} has {} conversions adding up to {}, expected at most 1.0.",
            converter.key(),
            direction,
            total
        )))
    }
}
