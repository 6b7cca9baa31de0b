// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - a default set of carriers, with realistic emission factors and costs.
//! - the `EnergyGraphBuilder`, which can declaratively build energy graph
//!   configurations for use in tests.

use crate::carrier::LOSS;
use crate::{
    Carrier, Converter, ConverterGroup, EnergyGraph, EnergyGraphConfig, Error, Link, LinkType,
    Slot,
};

/// Returns the carriers every `EnergyGraphBuilder` starts with.
pub(crate) fn default_carriers() -> Vec<Carrier> {
    vec![
        Carrier::new("coal")
            .with_co2_per_mj(0.1)
            .with_cost_per_mj(0.002),
        Carrier::new("natural_gas")
            .with_co2_per_mj(0.056)
            .with_cost_per_mj(0.008),
        Carrier::new("biomass")
            .with_sustainable_share(1.0)
            .with_cost_per_mj(0.004),
        Carrier::new("wind").with_sustainable_share(1.0).infinite(),
        Carrier::new("ambient_heat").infinite(),
        Carrier::new("electricity"),
        Carrier::new("heat"),
        Carrier::new(LOSS),
    ]
}

/// A builder for creating energy graph configurations easily, for use in
/// tests.
pub(crate) struct EnergyGraphBuilder {
    carriers: Vec<Carrier>,
    converters: Vec<Converter>,
    links: Vec<Link>,
}

impl EnergyGraphBuilder {
    /// Creates a new `EnergyGraphBuilder` with the default carriers.
    pub(crate) fn new() -> Self {
        EnergyGraphBuilder {
            carriers: default_carriers(),
            converters: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Adds a carrier, replacing a default carrier with the same key.
    pub(crate) fn carrier(&mut self, carrier: Carrier) -> &mut Self {
        self.carriers.retain(|c| c.key() != carrier.key());
        self.carriers.push(carrier);
        self
    }

    /// Adds a converter to the graph.
    pub(crate) fn add(&mut self, converter: Converter) -> &mut Self {
        self.converters.push(converter);
        self
    }

    /// Adds a primary energy converter, that supplies the given carrier
    /// without any inputs.
    pub(crate) fn primary(&mut self, key: &str, carrier: &str) -> &mut Self {
        self.add(
            Converter::new(key)
                .with_group(ConverterGroup::PrimaryEnergyDemand)
                .with_slot(Slot::output(carrier, 1.0)),
        )
    }

    /// Adds a link to the graph.
    pub(crate) fn link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }

    /// Connects two converters with a resolved `Share` link.
    pub(crate) fn connect(
        &mut self,
        parent: &str,
        child: &str,
        carrier: &str,
        share: f64,
        value: f64,
    ) -> &mut Self {
        self.link(
            Link::new(parent, child, carrier, LinkType::Share)
                .with_share(share)
                .with_value(value),
        )
    }

    /// Builds and returns the energy graph from the carriers, converters and
    /// links added to the builder, with the default configuration.
    pub(crate) fn build(&self) -> Result<EnergyGraph, Error> {
        self.build_with(EnergyGraphConfig::default())
    }

    /// Builds and returns the energy graph with the given configuration.
    pub(crate) fn build_with(&self, config: EnergyGraphConfig) -> Result<EnergyGraph, Error> {
        EnergyGraph::try_new(
            self.carriers.clone(),
            self.converters.clone(),
            self.links.clone(),
            config,
        )
    }
}
