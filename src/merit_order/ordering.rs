// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Ordering the dispatchable converters by their costs, and stacking their
//! capacities.

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;

use crate::{EnergyGraph, Error, MeritOrderConfig};

/// A dispatchable converter and the marginal costs it is ordered by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) index: NodeIndex,
    pub(crate) marginal_costs: Option<f64>,
}

/// Sorts the candidates by ascending marginal costs.
///
/// The sort is stable, and candidates without marginal costs come first.
pub(crate) fn sort_by_costs(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| c.marginal_costs.map(OrderedFloat));
}

/// Assigns consecutive capacity intervals and positions to the candidates,
/// in the given order.
///
/// The first interval starts at `0.0`, and every further interval starts
/// where the previous one ended.  Converters with installed capacity are
/// numbered from 1, all others get the configured unused position.
pub(crate) fn stack_capacities(
    graph: &mut EnergyGraph,
    candidates: &[Candidate],
    config: &MeritOrderConfig,
) -> Result<(), Error> {
    let mut start = 0.0;
    let mut position = 0;

    for candidate in candidates {
        let converter = graph.node_mut(candidate.index);
        converter.merit_order.start = Some(start);
        converter.merit_order.marginal_costs = candidate.marginal_costs;

        let end = converter.capacity_interval_end(config.capacity_precision)?;
        converter.merit_order.end = Some(end);

        converter.merit_order.position = match converter.installed_capacity() {
            Some(capacity) if capacity > 0.0 => {
                position += 1;
                Some(position)
            }
            _ => Some(config.unused_position),
        };

        tracing::debug!(
            "Merit order: {} from {} to {} at position {:?}.",
            converter.key(),
            start,
            end,
            converter.merit_order.position
        );
        start = end;
    }

    Ok(())
}
