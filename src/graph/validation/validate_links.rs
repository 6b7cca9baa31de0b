// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating the links of an [`EnergyGraph`][crate::EnergyGraph].

use crate::slot::SlotDirection;
use crate::{Error, Link};

use super::EnergyGraphValidator;

impl EnergyGraphValidator<'_> {
    /// Validates that all links:
    ///  - have a share between 0.0 and 1.0, when known,
    ///  - have a value that is not negative, when known,
    ///  - leave their parent through an output slot of their carrier,
    ///  - enter their child through an input slot of their carrier.
    pub(super) fn validate_links(&self) -> Result<(), Error> {
        for link in self.eg.links() {
            if let Some(share) = link.share() {
                if !(0.0..=1.0).contains(&share) {
                    return Err(Error::invalid_link(format!(
                        "Link {link} has a share of {share}, expected 0.0..=1.0."
                    )));
                }
            }
            if let Some(value) = link.value() {
                if !(value >= 0.0 && value.is_finite()) {
                    return Err(Error::invalid_link(format!(
                        "Link {link} has an invalid value: {value}"
                    )));
                }
            }

            self.ensure_slot(link, link.parent(), SlotDirection::Output)?;
            self.ensure_slot(link, link.child(), SlotDirection::Input)?;
        }
        Ok(())
    }

    fn ensure_slot(&self, link: &Link, key: &str, direction: SlotDirection) -> Result<(), Error> {
        let converter = self.eg.converter(key)?;
        if converter.slot(direction, link.carrier()).is_some() {
            return Ok(());
        }

        if self.eg.config.allow_missing_slots {
            tracing::warn!(
                "Link {} has no matching {} slot on converter {}.",
                link,
                direction,
                key
            );
            return Ok(());
        }

        Err(Error::invalid_link(format!(
            "Link {link} has no matching {direction} slot on converter {key}."
        )))
    }
}
