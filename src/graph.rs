// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the converters of an energy system, and the
//! links between them.

mod creation;
mod retrieval;
mod validation;

pub mod iterators;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::{Carrier, Converter, EnergyGraphConfig, Link};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::HashMap;

/// Identifies a link in an [`EnergyGraph`].
pub type LinkId = EdgeIndex;

/// `Converter`s stored in the `DiGraph` instance can be addressed with
/// `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any converter key,
/// so that converters in the `DiGraph` can be retrieved from their keys.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// `CarrierMap` stores the carriers of the graph by their keys.
pub(crate) type CarrierMap = HashMap<String, Carrier>;

/// A graph representation of the converters of an energy system and the
/// links between them.
///
/// Links are stored as the edge weights of the underlying `DiGraph`, directed
/// from the supplying converter to the consuming converter.  Unlike a
/// component graph, the energy graph may contain cycles.
pub struct EnergyGraph {
    graph: DiGraph<Converter, Link>,
    node_indices: NodeIndexMap,
    carriers: CarrierMap,
    config: EnergyGraphConfig,
}
