// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The strategies that can be propagated through an energy graph, and the
//! boundary conditions at which they stop.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::Direction;

use crate::converter_group::GroupPredicates;
use crate::{Carrier, Converter, EnergyGraph, Link};

use super::TraversalMode;

/// The signature of a boundary function.
///
/// It is called with the converter being visited and the link through which
/// the traversal arrived at it (`None` for the converter the traversal
/// started from).  Returning `Some(value)` ends the traversal of this branch
/// with `value`, returning `None` continues into the converter's inputs.
pub type FactorFn = fn(&EnergyGraph, &Converter, Option<&Link>) -> Option<f64>;

/// A user-defined strategy, identified by its name.
///
/// Two custom strategies with the same name share their cached values, so
/// names must be unique per boundary function.
#[derive(Clone, Copy)]
pub struct CustomStrategy {
    name: &'static str,
    mode: TraversalMode,
    factor: FactorFn,
}

impl CustomStrategy {
    pub fn new(name: &'static str, mode: TraversalMode, factor: FactorFn) -> Self {
        Self { name, mode, factor }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for CustomStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomStrategy")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

impl PartialEq for CustomStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.mode == other.mode
    }
}

impl Eq for CustomStrategy {}

impl std::hash::Hash for CustomStrategy {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.mode.hash(state);
    }
}

/// An attribute that is propagated through the graph by the traversal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The share of a converter's demand that is primary energy.
    PrimaryDemand,
    /// The share of a converter's demand that is primary energy of the given
    /// carrier.
    PrimaryDemandOfCarrier(String),
    /// The share of a converter's demand that is sustainable primary energy.
    PrimaryDemandOfSustainable,
    /// The share of a converter's demand that is fossil primary energy.
    PrimaryDemandOfFossil,
    /// The CO2 emitted per unit of a converter's demand.
    Co2,
    /// The share of a converter's demand that is final demand.
    FinalDemand,
    /// The sustainable share of the energy flowing into a converter.
    SustainabilityShare,
    /// The cost per MJ of the carrier mix flowing into a converter.
    WeightedCarrierCost,
    Custom(CustomStrategy),
}

impl Strategy {
    /// Returns whether the strategy is propagated with or without taking
    /// demand and losses into account.
    pub fn mode(&self) -> TraversalMode {
        match self {
            Strategy::SustainabilityShare | Strategy::WeightedCarrierCost => {
                TraversalMode::WithoutLosses
            }
            Strategy::Custom(custom) => custom.mode,
            _ => TraversalMode::WithLosses,
        }
    }

    /// Evaluates the boundary condition of the strategy at the given
    /// converter.
    pub(crate) fn factor(
        &self,
        graph: &EnergyGraph,
        node: NodeIndex,
        link: Option<EdgeIndex>,
    ) -> Option<f64> {
        let inner = graph.inner();
        let converter = &inner[node];
        let link = link.and_then(|l| inner.edge_weight(l));

        match self {
            Strategy::PrimaryDemand => primary_or_dead_end(graph, node, || Some(1.0)),
            Strategy::PrimaryDemandOfCarrier(key) => primary_or_dead_end(graph, node, || {
                supplied(graph, converter, link, |c| {
                    if c.key() == key.as_str() {
                        1.0
                    } else {
                        0.0
                    }
                })
            }),
            Strategy::PrimaryDemandOfSustainable => primary_or_dead_end(graph, node, || {
                supplied(graph, converter, link, Carrier::sustainable_share)
            }),
            Strategy::PrimaryDemandOfFossil => primary_or_dead_end(graph, node, || {
                supplied(graph, converter, link, |c| {
                    if c.is_infinite() {
                        0.0
                    } else {
                        1.0 - c.sustainable_share()
                    }
                })
            }),
            Strategy::Co2 => primary_or_dead_end(graph, node, || {
                supplied(graph, converter, link, Carrier::co2_per_mj)
            }),
            Strategy::FinalDemand => {
                if converter.is_final_demand() {
                    Some(1.0)
                } else if is_right_dead_end(graph, node) {
                    Some(0.0)
                } else {
                    None
                }
            }
            Strategy::SustainabilityShare => {
                if is_right_dead_end(graph, node) {
                    supplied(graph, converter, link, |c| {
                        if c.is_infinite() {
                            1.0
                        } else {
                            c.sustainable_share()
                        }
                    })
                } else {
                    None
                }
            }
            Strategy::WeightedCarrierCost => {
                if is_right_dead_end(graph, node) {
                    supplied(graph, converter, link, Carrier::cost_per_mj)
                } else {
                    None
                }
            }
            Strategy::Custom(custom) => (custom.factor)(graph, converter, link),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::PrimaryDemand => write!(f, "primary_demand"),
            Strategy::PrimaryDemandOfCarrier(carrier) => {
                write!(f, "primary_demand_of_{carrier}")
            }
            Strategy::PrimaryDemandOfSustainable => write!(f, "primary_demand_of_sustainable"),
            Strategy::PrimaryDemandOfFossil => write!(f, "primary_demand_of_fossil"),
            Strategy::Co2 => write!(f, "co2"),
            Strategy::FinalDemand => write!(f, "final_demand"),
            Strategy::SustainabilityShare => write!(f, "sustainability_share"),
            Strategy::WeightedCarrierCost => write!(f, "weighted_carrier_cost"),
            Strategy::Custom(custom) => write!(f, "{}", custom.name),
        }
    }
}

/// Stops at primary energy converters with the value of `at_primary`, and at
/// other converters without inputs with 0.0.
fn primary_or_dead_end(
    graph: &EnergyGraph,
    node: NodeIndex,
    at_primary: impl FnOnce() -> Option<f64>,
) -> Option<f64> {
    if graph.inner()[node].is_primary_energy_demand() {
        at_primary()
    } else if is_right_dead_end(graph, node) {
        Some(0.0)
    } else {
        None
    }
}

/// Returns `true` if the converter has no inputs, other than the ones coming
/// from the environment.
pub(crate) fn is_right_dead_end(graph: &EnergyGraph, node: NodeIndex) -> bool {
    let inner = graph.inner();
    !inner
        .neighbors_directed(node, Direction::Incoming)
        .any(|parent| !inner[parent].is_environment())
}

/// Returns the value of the carrier the converter supplies.
///
/// When the traversal arrived through a link, that is the link's carrier.
/// For the starting converter, it is the conversion-weighted average of its
/// non-loss output carriers.
fn supplied(
    graph: &EnergyGraph,
    converter: &Converter,
    link: Option<&Link>,
    value: impl Fn(&Carrier) -> f64,
) -> Option<f64> {
    if let Some(link) = link {
        return Some(graph.carrier(link.carrier()).map_or(0.0, &value));
    }

    let mut total = 0.0;
    let mut weights = 0.0;
    for slot in converter.output_slots() {
        let Ok(carrier) = graph.carrier(slot.carrier()) else {
            continue;
        };
        if carrier.is_loss() {
            continue;
        }
        total += slot.conversion() * value(carrier);
        weights += slot.conversion();
    }

    let average = total / weights;
    Some(if average.is_finite() { average } else { 0.0 })
}
