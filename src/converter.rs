// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Converter` struct, the vertices of an
//! [`EnergyGraph`][crate::EnergyGraph].

use crate::carrier::LOSS;
use crate::converter_group::{ConverterGroup, GroupPredicates};
use crate::slot::{Slot, SlotDirection};
use crate::Error;

/// The cost components of a converter, used to order dispatchable converters
/// in the merit order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CostComponents {
    /// The variable costs per MWh of electricity produced.  When set, this
    /// takes precedence over the costs derived from the other components.
    pub marginal_costs: Option<f64>,
    /// Fuel costs per MJ of input.  When `None`, the cost-weighted mix of the
    /// carriers feeding the converter is used.
    pub fuel_costs_per_mj: Option<f64>,
    /// Variable operation and maintenance costs per MWh of electricity.
    pub variable_operation_and_maintenance_costs_per_mwh: Option<f64>,
    /// Fixed costs per MW of installed capacity per year.
    pub fixed_costs_per_mw_per_year: Option<f64>,
}

/// The attributes the merit order writes onto a dispatchable converter.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MeritOrderAttributes {
    pub(crate) start: Option<f64>,
    pub(crate) end: Option<f64>,
    pub(crate) position: Option<u32>,
    pub(crate) marginal_costs: Option<f64>,
    pub(crate) capacity_factor: Option<f64>,
    pub(crate) full_load_hours: Option<f64>,
}

/// A vertex in the energy graph: a power plant, a demand sink, a storage
/// unit, etc.
#[derive(Clone, Debug, PartialEq)]
pub struct Converter {
    key: String,
    demand: Option<f64>,
    availability: f64,
    installed_capacity: Option<f64>,
    groups: Vec<ConverterGroup>,
    slots: Vec<Slot>,
    costs: CostComponents,
    pub(crate) merit_order: MeritOrderAttributes,
}

impl Converter {
    /// Creates a new converter with an unknown demand, full availability and
    /// no slots.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            demand: None,
            availability: 1.0,
            installed_capacity: None,
            groups: Vec::new(),
            slots: Vec::new(),
            costs: CostComponents::default(),
            merit_order: MeritOrderAttributes::default(),
        }
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn with_availability(mut self, availability: f64) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_installed_capacity(mut self, installed_capacity: f64) -> Self {
        self.installed_capacity = Some(installed_capacity);
        self
    }

    pub fn with_group(mut self, group: ConverterGroup) -> Self {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_costs(mut self, costs: CostComponents) -> Self {
        self.costs = costs;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn demand(&self) -> Option<f64> {
        self.demand
    }

    pub fn availability(&self) -> f64 {
        self.availability
    }

    pub fn installed_capacity(&self) -> Option<f64> {
        self.installed_capacity
    }

    pub fn groups(&self) -> &[ConverterGroup] {
        &self.groups
    }

    pub fn costs(&self) -> &CostComponents {
        &self.costs
    }

    /// Returns all slots of the converter, in both directions.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn input_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|s| s.direction() == SlotDirection::Input)
    }

    pub fn output_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|s| s.direction() == SlotDirection::Output)
    }

    /// Returns the slot for the given carrier and direction, if there is one.
    pub fn slot(&self, direction: SlotDirection, carrier: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.direction() == direction && s.carrier() == carrier)
    }

    /// Returns the conversion of the input slot for the given carrier, or 0.0
    /// if the converter has no such slot.
    pub fn input_conversion(&self, carrier: &str) -> f64 {
        self.slot(SlotDirection::Input, carrier)
            .map_or(0.0, Slot::conversion)
    }

    /// Returns the conversion of the output slot for the given carrier, or
    /// 0.0 if the converter has no such slot.
    pub fn output_conversion(&self, carrier: &str) -> f64 {
        self.slot(SlotDirection::Output, carrier)
            .map_or(0.0, Slot::conversion)
    }

    /// Returns the demand of the converter for the given carrier.
    pub fn input_of(&self, carrier: &str) -> f64 {
        self.demand.unwrap_or(0.0) * self.input_conversion(carrier)
    }

    /// Returns the output of the converter for the given carrier.
    pub fn output_of(&self, carrier: &str) -> f64 {
        self.demand.unwrap_or(0.0) * self.output_conversion(carrier)
    }

    /// Returns the share of the converter's throughput that is lost.
    pub fn share_of_losses(&self) -> f64 {
        self.output_conversion(LOSS)
    }

    /// Returns the factor by which the useful output of the converter has to
    /// be scaled up to get its total demand.
    ///
    /// Returns `0.0` when all of the throughput is lost.
    pub fn loss_share(&self) -> f64 {
        let share = 1.0 / (1.0 - self.share_of_losses());
        if share.is_finite() {
            share
        } else {
            0.0
        }
    }

    /// Returns the start of the converter's capacity interval in the merit
    /// order, if the merit order has been calculated.
    pub fn merit_order_start(&self) -> Option<f64> {
        self.merit_order.start
    }

    /// Returns the end of the converter's capacity interval in the merit
    /// order.
    ///
    /// Returns an error if the start of the interval hasn't been set yet.
    pub fn merit_order_end(&self) -> Result<f64, Error> {
        let Some(start) = self.merit_order.start else {
            return Err(self.missing_merit_order_start());
        };
        Ok(self.merit_order.end.unwrap_or(start))
    }

    pub fn merit_order_position(&self) -> Option<u32> {
        self.merit_order.position
    }

    pub fn merit_order_capacity_factor(&self) -> Option<f64> {
        self.merit_order.capacity_factor
    }

    pub fn merit_order_full_load_hours(&self) -> Option<f64> {
        self.merit_order.full_load_hours
    }

    /// Returns the marginal costs per MWh the converter was ordered by in the
    /// last merit order run.
    pub fn merit_order_marginal_costs(&self) -> Option<f64> {
        self.merit_order.marginal_costs
    }

    /// Returns the marginal costs plus the fixed costs spread over the full
    /// load hours of the converter.
    ///
    /// `None` until the merit order has run, and for converters that don't
    /// run at all.
    pub fn total_costs_per_mwh(&self) -> Option<f64> {
        let marginal = self.merit_order.marginal_costs?;
        let full_load_hours = self.merit_order.full_load_hours?;
        if full_load_hours <= 0.0 {
            return None;
        }
        let fixed = self.costs.fixed_costs_per_mw_per_year.unwrap_or(0.0);
        Some(marginal + fixed / full_load_hours)
    }

    /// Computes the end of the capacity interval from its start: the
    /// available capacity is added to the start, and the sum is rounded to
    /// the given number of decimals.  Converters without installed capacity
    /// get an empty interval.
    pub(crate) fn capacity_interval_end(&self, precision: i32) -> Result<f64, Error> {
        let Some(start) = self.merit_order.start else {
            return Err(self.missing_merit_order_start());
        };
        match self.installed_capacity {
            Some(capacity) if capacity > 0.0 => {
                Ok(round_to(start + capacity * self.availability, precision))
            }
            _ => Ok(start),
        }
    }

    fn missing_merit_order_start(&self) -> Error {
        Error::missing_attribute(format!(
            "merit_order_start has not been set for converter: {}",
            self.key
        ))
    }
}

impl GroupPredicates for Converter {
    fn memberships(&self) -> &[ConverterGroup] {
        &self.groups
    }
}

fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}
