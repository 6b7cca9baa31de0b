// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over converters and links in an `EnergyGraph`.

use petgraph::graph::DiGraph;
use petgraph::Directed;

use crate::{Converter, Link};

/// An iterator over the converters in an `EnergyGraph`.
pub struct Converters<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<Converter>>,
}

impl<'a> Iterator for Converters<'a> {
    type Item = &'a Converter;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the links in an `EnergyGraph`.
pub struct Links<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Edge<Link>>,
}

impl<'a> Iterator for Links<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| &e.weight)
    }
}

/// An iterator over the links entering or leaving a converter in an
/// `EnergyGraph`.
pub struct ConverterLinks<'a> {
    pub(crate) iter: petgraph::graph::Edges<'a, Link, Directed>,
}

impl<'a> Iterator for ConverterLinks<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| e.weight())
    }
}

/// An iterator over the neighbors of a converter in an `EnergyGraph`.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a DiGraph<Converter, Link>,
    pub(crate) iter: petgraph::graph::Neighbors<'a, Link>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Converter;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}
