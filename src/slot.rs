// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Slot` struct, the typed connection points of a
//! converter.

use std::fmt::Display;

/// The direction energy flows through a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    Input,
    Output,
}

impl Display for SlotDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotDirection::Input => write!(f, "input"),
            SlotDirection::Output => write!(f, "output"),
        }
    }
}

/// A connection point on a converter for a single carrier.
///
/// The `conversion` is the share of the converter's total throughput in the
/// slot's direction that is attributed to the slot's carrier.  The links of a
/// slot are the links of the same carrier entering (for input slots) or
/// leaving (for output slots) the converter.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    carrier: String,
    direction: SlotDirection,
    conversion: f64,
}

impl Slot {
    pub fn new(carrier: impl Into<String>, direction: SlotDirection, conversion: f64) -> Self {
        Self {
            carrier: carrier.into(),
            direction,
            conversion,
        }
    }

    pub fn input(carrier: impl Into<String>, conversion: f64) -> Self {
        Self::new(carrier, SlotDirection::Input, conversion)
    }

    pub fn output(carrier: impl Into<String>, conversion: f64) -> Self {
        Self::new(carrier, SlotDirection::Output, conversion)
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn direction(&self) -> SlotDirection {
        self.direction
    }

    pub fn conversion(&self) -> f64 {
        self.conversion
    }
}
