// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A calculation on an energy graph: the traversal cache, the merit order
//! state, and the attributes derived from them.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::traversal::{Traversal, TraversalCache, TraversalKey};
use crate::{
    EnergyGraph, Error, LinkId, MeritOrderScheduler, Strategy, TraversalMode, Weighting,
};

/// The attributes of a converter that can be queried from a [`Calculation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Demand,
    PrimaryDemand,
    FinalDemand,
    SustainabilityShare,
    PrimaryCo2Emission,
    WeightedCarrierCost,
    MeritOrderStart,
    MeritOrderEnd,
    MeritOrderPosition,
    MeritOrderCapacityFactor,
    MeritOrderFullLoadHours,
    TotalCostsPerMwh,
}

impl Attribute {
    fn is_merit_order(&self) -> bool {
        matches!(
            self,
            Attribute::MeritOrderStart
                | Attribute::MeritOrderEnd
                | Attribute::MeritOrderPosition
                | Attribute::MeritOrderCapacityFactor
                | Attribute::MeritOrderFullLoadHours
                | Attribute::TotalCostsPerMwh
        )
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Demand => "demand",
            Attribute::PrimaryDemand => "primary_demand",
            Attribute::FinalDemand => "final_demand",
            Attribute::SustainabilityShare => "sustainability_share",
            Attribute::PrimaryCo2Emission => "primary_co2_emission",
            Attribute::WeightedCarrierCost => "weighted_carrier_cost_per_mj",
            Attribute::MeritOrderStart => "merit_order_start",
            Attribute::MeritOrderEnd => "merit_order_end",
            Attribute::MeritOrderPosition => "merit_order_position",
            Attribute::MeritOrderCapacityFactor => "merit_order_capacity_factor",
            Attribute::MeritOrderFullLoadHours => "merit_order_full_load_hours",
            Attribute::TotalCostsPerMwh => "total_costs_per_mwh",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "demand" => Attribute::Demand,
            "primary_demand" => Attribute::PrimaryDemand,
            "final_demand" => Attribute::FinalDemand,
            "sustainability_share" => Attribute::SustainabilityShare,
            "primary_co2_emission" => Attribute::PrimaryCo2Emission,
            "weighted_carrier_cost_per_mj" => Attribute::WeightedCarrierCost,
            "merit_order_start" => Attribute::MeritOrderStart,
            "merit_order_end" => Attribute::MeritOrderEnd,
            "merit_order_position" => Attribute::MeritOrderPosition,
            "merit_order_capacity_factor" => Attribute::MeritOrderCapacityFactor,
            "merit_order_full_load_hours" => Attribute::MeritOrderFullLoadHours,
            "total_costs_per_mwh" => Attribute::TotalCostsPerMwh,
            _ => {
                return Err(Error::missing_attribute(format!(
                    "Unknown attribute: {s}"
                )))
            }
        })
    }
}

/// A calculation owns an [`EnergyGraph`] together with the state computed on
/// it.
///
/// Traversal results are cached per strategy, so repeated queries are cheap.
/// The merit order, when configured with
/// [`with_merit_order`][Calculation::with_merit_order], runs once on the
/// first query that needs it.
pub struct Calculation {
    graph: EnergyGraph,
    cache: TraversalCache,
    start_values: HashMap<(NodeIndex, TraversalKey), f64>,
    merit_order: Option<(MeritOrderScheduler, f64)>,
    merit_order_finished: bool,
}

impl Calculation {
    /// Creates a new calculation on the given graph, with an empty cache.
    pub fn new(graph: EnergyGraph) -> Self {
        Self {
            graph,
            cache: TraversalCache::default(),
            start_values: HashMap::new(),
            merit_order: None,
            merit_order_finished: false,
        }
    }

    /// Configures the merit order to run on demand, at the given peak load.
    pub fn with_merit_order(mut self, scheduler: MeritOrderScheduler, peak_load: f64) -> Self {
        self.merit_order = Some((scheduler, peak_load));
        self
    }

    pub fn graph(&self) -> &EnergyGraph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut EnergyGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> EnergyGraph {
        self.graph
    }

    /// Propagates `strategy` through the inputs of the converter with the
    /// given `key`, taking demand and losses into account.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn traverse(
        &mut self,
        key: &str,
        strategy: Strategy,
        weighting: Option<Weighting>,
    ) -> Result<f64, Error> {
        let node = self.graph.index(key)?;
        let key = TraversalKey::new(strategy, weighting, TraversalMode::WithLosses);
        Ok(self.run(node, key))
    }

    /// Propagates `strategy` through the inputs of the converter with the
    /// given `key`, weighting the inputs by link shares and conversions.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn traverse_without_losses(&mut self, key: &str, strategy: Strategy) -> Result<f64, Error> {
        let node = self.graph.index(key)?;
        let key = TraversalKey::new(strategy, None, TraversalMode::WithoutLosses);
        Ok(self.run(node, key))
    }

    /// Propagates `strategy` in the strategy's own traversal mode.
    pub fn evaluate(&mut self, key: &str, strategy: Strategy) -> Result<f64, Error> {
        let node = self.graph.index(key)?;
        let mode = strategy.mode();
        Ok(self.run(node, TraversalKey::new(strategy, None, mode)))
    }

    /// Returns the value of `strategy` behind the given link: the value at
    /// the link's supplier, reached through the link.
    ///
    /// Returns an error if the link does not exist.
    pub fn traverse_from_link(
        &mut self,
        link: LinkId,
        strategy: Strategy,
        weighting: Option<Weighting>,
    ) -> Result<f64, Error> {
        let Some((parent, _)) = self.graph.inner().edge_endpoints(link) else {
            return Err(Error::invalid_link(format!(
                "Link with index {} not found.",
                link.index()
            )));
        };
        let mode = strategy.mode();
        let key = TraversalKey::new(strategy, weighting, mode);
        Ok(Traversal::new(&self.graph, &mut self.cache, &key).run_from_link(link, parent))
    }

    /// The primary energy needed to cover the converter's demand, including
    /// all losses on the way.  `None` when the demand is unknown.
    pub fn primary_demand(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.demand_times(key, Strategy::PrimaryDemand)
    }

    /// The part of the converter's primary demand that is met with the given
    /// carrier.
    pub fn primary_demand_of_carrier(
        &mut self,
        key: &str,
        carrier: &str,
    ) -> Result<Option<f64>, Error> {
        self.graph.carrier(carrier)?;
        self.demand_times(key, Strategy::PrimaryDemandOfCarrier(carrier.to_string()))
    }

    pub fn primary_demand_of_sustainable(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.demand_times(key, Strategy::PrimaryDemandOfSustainable)
    }

    pub fn primary_demand_of_fossil(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.demand_times(key, Strategy::PrimaryDemandOfFossil)
    }

    /// The CO2 emitted by the primary energy behind the converter's demand.
    pub fn primary_co2_emission(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.demand_times(key, Strategy::Co2)
    }

    /// The part of the converter's demand that ends up as final demand.
    pub fn final_demand(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.demand_times(key, Strategy::FinalDemand)
    }

    /// The sustainable share of the energy flowing into the converter.
    pub fn sustainability_share(&mut self, key: &str) -> Result<f64, Error> {
        self.evaluate(key, Strategy::SustainabilityShare)
    }

    /// The costs per MJ of the carrier mix flowing into the converter.
    pub fn weighted_carrier_cost(&mut self, key: &str) -> Result<f64, Error> {
        self.evaluate(key, Strategy::WeightedCarrierCost)
    }

    pub(crate) fn weighted_carrier_cost_at(&mut self, node: NodeIndex) -> f64 {
        let key = TraversalKey::new(
            Strategy::WeightedCarrierCost,
            None,
            TraversalMode::WithoutLosses,
        );
        self.run(node, key)
    }

    /// Runs the given merit order scheduler at the given peak load, and
    /// marks the merit order as finished.
    pub fn run_merit_order(
        &mut self,
        scheduler: &MeritOrderScheduler,
        peak_load: f64,
    ) -> Result<(), Error> {
        scheduler.run(self, peak_load)?;
        self.merit_order_finished = true;
        Ok(())
    }

    /// Returns whether the merit order has run on this calculation.
    pub fn is_merit_order_finished(&self) -> bool {
        self.merit_order_finished
    }

    /// Returns the full load hours of the converter, running the configured
    /// merit order first if it hasn't run yet.
    ///
    /// Returns an error if no merit order is configured and none has run.
    pub fn merit_order_full_load_hours(&mut self, key: &str) -> Result<Option<f64>, Error> {
        self.ensure_merit_order()?;
        Ok(self.graph.converter(key)?.merit_order_full_load_hours())
    }

    /// Returns the value of the given attribute of the converter with the
    /// given `key`.
    ///
    /// Merit order attributes trigger the configured merit order, if it
    /// hasn't run yet.
    pub fn query(&mut self, key: &str, attribute: Attribute) -> Result<Option<f64>, Error> {
        if attribute.is_merit_order() && self.merit_order.is_some() {
            self.ensure_merit_order()?;
        }

        let converter = self.graph.converter(key)?;
        match attribute {
            Attribute::Demand => Ok(converter.demand()),
            Attribute::PrimaryDemand => self.primary_demand(key),
            Attribute::FinalDemand => self.final_demand(key),
            Attribute::SustainabilityShare => self.sustainability_share(key).map(Some),
            Attribute::PrimaryCo2Emission => self.primary_co2_emission(key),
            Attribute::WeightedCarrierCost => self.weighted_carrier_cost(key).map(Some),
            Attribute::MeritOrderStart => Ok(converter.merit_order_start()),
            Attribute::MeritOrderEnd => converter.merit_order_end().map(Some),
            Attribute::MeritOrderPosition => Ok(converter.merit_order_position().map(f64::from)),
            Attribute::MeritOrderCapacityFactor => Ok(converter.merit_order_capacity_factor()),
            Attribute::MeritOrderFullLoadHours => Ok(converter.merit_order_full_load_hours()),
            Attribute::TotalCostsPerMwh => Ok(converter.total_costs_per_mwh()),
        }
    }

    /// Discards everything computed on the graph: the traversal cache, the
    /// merit order attributes and the finished flag.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.start_values.clear();
        self.merit_order_finished = false;
        for converter in self.graph.converters_mut() {
            converter.merit_order = Default::default();
        }
        tracing::debug!("Calculation reset.");
    }

    fn ensure_merit_order(&mut self) -> Result<(), Error> {
        if self.merit_order_finished {
            return Ok(());
        }
        let Some((scheduler, peak_load)) = self.merit_order.take() else {
            return Err(Error::missing_attribute(
                "No merit order configured for this calculation.",
            ));
        };
        let result = self.run_merit_order(&scheduler, peak_load);
        self.merit_order = Some((scheduler, peak_load));
        result
    }

    fn demand_times(&mut self, key: &str, strategy: Strategy) -> Result<Option<f64>, Error> {
        let Some(demand) = self.graph.converter(key)?.demand() else {
            return Ok(None);
        };
        let node = self.graph.index(key)?;
        let mode = strategy.mode();
        Ok(Some(demand * self.run(node, TraversalKey::new(strategy, None, mode))))
    }

    fn run(&mut self, node: NodeIndex, key: TraversalKey) -> f64 {
        let start = (node, key);
        if let Some(&value) = self.start_values.get(&start) {
            return value;
        }
        let value = Traversal::new(&self.graph, &mut self.cache, &start.1).run(node, None);
        self.start_values.insert(start, value);
        value
    }
}
