// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Recursive propagation of attributes through the inputs of a converter.
//!
//! Starting from a converter, the traversal follows its input links towards
//! the suppliers, until every branch reaches a converter where the
//! [`Strategy`] returns a value.  The values of the branches are weighted by
//! the share of the converter's demand that flows through them, and summed.
//!
//! The graph may contain cycles.  Before the traversal crosses a link, it
//! marks the link as in progress for the current strategy.  When it meets the
//! mark again it has gone around a cycle, and the strategy is evaluated
//! directly at the supplier instead of following the link again.  Values
//! behind each link are cached, so repeated queries are cheap.

mod cache;
mod strategy;

pub(crate) use cache::TraversalCache;
pub use strategy::{CustomStrategy, FactorFn, Strategy};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::converter_group::GroupPredicates;
use crate::{Converter, EnergyGraph, Link};
use cache::CacheEntry;

/// How the contributions of the input links of a converter are weighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraversalMode {
    /// Weighted by the share of the converter's demand that flows through
    /// the link, scaled up by the losses of the supplier.
    WithLosses,
    /// Weighted by the share of the link and the conversion of the input slot
    /// it enters, for attributes that don't depend on the amount of energy.
    WithoutLosses,
}

/// An additional factor applied at every converter the traversal passes
/// through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Weighting {
    /// The availability of the converter.
    Availability,
    /// The output conversion of the converter for the given carrier.
    OutputConversion(String),
}

impl Weighting {
    fn factor(&self, converter: &Converter) -> f64 {
        match self {
            Weighting::Availability => converter.availability(),
            Weighting::OutputConversion(carrier) => converter.output_conversion(carrier),
        }
    }
}

/// Identifies the values of a traversal in the cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TraversalKey {
    pub(crate) strategy: Strategy,
    pub(crate) weighting: Option<Weighting>,
    pub(crate) mode: TraversalMode,
}

impl TraversalKey {
    pub(crate) fn new(strategy: Strategy, weighting: Option<Weighting>, mode: TraversalMode) -> Self {
        Self {
            strategy,
            weighting,
            mode,
        }
    }
}

/// A single traversal through an energy graph, memoizing into the cache of
/// the calculation it belongs to.
pub(crate) struct Traversal<'a> {
    graph: &'a EnergyGraph,
    cache: &'a mut TraversalCache,
    key: &'a TraversalKey,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        graph: &'a EnergyGraph,
        cache: &'a mut TraversalCache,
        key: &'a TraversalKey,
    ) -> Self {
        Self { graph, cache, key }
    }

    /// Computes the value of the strategy at the given converter.
    ///
    /// `link` is the link through which the converter was reached, if any.
    pub(crate) fn run(&mut self, node: NodeIndex, link: Option<EdgeIndex>) -> f64 {
        self.visit(node, link)
    }

    /// Computes the value behind the given link, with `parent` being the
    /// converter that supplies it.
    pub(crate) fn run_from_link(&mut self, link: EdgeIndex, parent: NodeIndex) -> f64 {
        self.cross(link, parent)
    }

    fn visit(&mut self, node: NodeIndex, link: Option<EdgeIndex>) -> f64 {
        if let Some(value) = self.key.strategy.factor(self.graph, node, link) {
            return value;
        }

        let graph = self.graph;
        let inner = graph.inner();
        let converter = &inner[node];
        let mut total = 0.0;

        for edge in inner.edges_directed(node, Direction::Incoming) {
            let parent = &inner[edge.source()];
            if parent.is_environment() {
                continue;
            }
            let Some(multiplier) = self.multiplier(converter, parent, edge.weight()) else {
                continue;
            };
            total += multiplier * self.cross(edge.id(), edge.source());
        }

        total
    }

    /// Returns the weight of the link's branch, or `None` if the branch
    /// doesn't contribute anything and doesn't have to be visited.
    fn multiplier(&self, converter: &Converter, parent: &Converter, link: &Link) -> Option<f64> {
        let weighting = self
            .key
            .weighting
            .as_ref()
            .map_or(1.0, |w| w.factor(converter));

        let factors = match self.key.mode {
            TraversalMode::WithLosses => [
                demanding_share(converter, link),
                parent.loss_share(),
                weighting,
            ],
            TraversalMode::WithoutLosses => [
                link.resolved_share(),
                converter.input_conversion(link.carrier()),
                weighting,
            ],
        };

        if factors.contains(&0.0) {
            None
        } else {
            Some(factors.iter().product())
        }
    }

    /// Returns the value behind the given link, computing it if necessary.
    fn cross(&mut self, link: EdgeIndex, parent: NodeIndex) -> f64 {
        match self.cache.get(self.key, link) {
            Some(CacheEntry::Value(value)) => return value,
            Some(CacheEntry::InProgress) => {
                let value = self
                    .key
                    .strategy
                    .factor(self.graph, parent, Some(link))
                    .unwrap_or(1.0);
                tracing::debug!(
                    "Cycle detected for {} at link {}, continuing with {}.",
                    self.key.strategy,
                    self.graph.inner()[link],
                    value
                );
                return value;
            }
            None => {}
        }

        self.cache.insert(self.key, link, CacheEntry::InProgress);
        let value = self.visit(parent, Some(link));
        self.cache.insert(self.key, link, CacheEntry::Value(value));
        value
    }
}

/// Returns the share of the converter's demand that flows through the link.
///
/// Loss links and converters without demand don't demand anything.
fn demanding_share(converter: &Converter, link: &Link) -> f64 {
    if link.is_loss() {
        return 0.0;
    }
    let share = link.value().unwrap_or(0.0) / converter.demand().unwrap_or(0.0);
    if share.is_finite() {
        share
    } else {
        0.0
    }
}
