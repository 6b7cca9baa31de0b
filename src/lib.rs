// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy Converter Graph

This is a library for representing an energy system as a graph of converters
(power plants, heat pumps, households, ...) and the links through which
energy carriers flow between them, and for calculating attributes on that
graph.

## Building a graph

The main struct is [`EnergyGraph`], instances of which can be created by
passing the [`Carrier`]s, [`Converter`]s and [`Link`]s of an energy system to
the [`try_new`][EnergyGraph::try_new] method.

Links are directed from the supplying converter to the consuming converter.
Unlike many other graphs of physical systems, energy graphs may contain
cycles, for example when a refinery consumes part of its own output.

## Validation

The [`try_new`][EnergyGraph::try_new] method runs several checks on the
graph, including checking that:

- Converter and carrier keys are unique.
- Links point to existing converters and carriers, and don't loop back to
  the converter they start from.
- Slot conversions, availabilities and demands are within their domains.
- Links attach to matching slots of their converters.

Some of these checks can be relaxed through the [`EnergyGraphConfig`].

## Traversals

A [`Calculation`] owns a graph and propagates a [`Strategy`] through the
inputs of a converter until it reaches the primary energy converters, for
example:

- [`primary_demand`][Calculation::primary_demand]
- [`primary_demand_of_carrier`][Calculation::primary_demand_of_carrier]
- [`primary_co2_emission`][Calculation::primary_co2_emission]
- [`final_demand`][Calculation::final_demand]
- [`sustainability_share`][Calculation::sustainability_share]
- [`weighted_carrier_cost`][Calculation::weighted_carrier_cost]

Traversals terminate on cyclic graphs, and their results are cached.

## Merit order

The [`MeritOrderScheduler`] orders the dispatchable power plants by their
marginal costs, stacks their capacities, and derives capacity factors and
full load hours from the residual load-duration [`Curve`] of a
[`LoadProfile`].
*/

mod calculation;
pub use calculation::{Attribute, Calculation};

mod carrier;
pub use carrier::Carrier;

mod config;
pub use config::{EnergyGraphConfig, MeritOrderConfig, MustRunConfig, MustRunGroup};

mod converter;
pub use converter::{Converter, CostComponents};

mod converter_group;
pub use converter_group::ConverterGroup;

mod curve;
pub use curve::Curve;

mod graph;
pub use graph::{iterators, EnergyGraph, LinkId};

mod link;
pub use link::{Link, LinkType};

mod merit_order;
pub use merit_order::{LoadProfile, MeritOrderScheduler};

mod slot;
pub use slot::{Slot, SlotDirection};

mod traversal;
pub use traversal::{CustomStrategy, FactorFn, Strategy, TraversalMode, Weighting};

mod error;
pub use error::Error;
