// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving converters, links and carriers from an
//! [`EnergyGraph`].

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::converter_group::GroupPredicates;
use crate::iterators::{ConverterLinks, Converters, Links, Neighbors};
use crate::slot::SlotDirection;
use crate::{Carrier, Converter, ConverterGroup, EnergyGraph, Error, Link, LinkId};

/// `Converter`, `Link` and `Carrier` retrieval.
impl EnergyGraph {
    /// Returns the converter with the given `key`, if it exists.
    pub fn converter(&self, key: &str) -> Result<&Converter, Error> {
        self.index(key).map(|i| &self.graph[i])
    }

    /// Returns the carrier with the given `key`, if it exists.
    pub fn carrier(&self, key: &str) -> Result<&Carrier, Error> {
        self.carriers
            .get(key)
            .ok_or_else(|| Error::carrier_not_found(format!("Carrier with key {key} not found.")))
    }

    /// Returns an iterator over the converters in the graph.
    pub fn converters(&self) -> Converters<'_> {
        Converters {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the links in the graph.
    pub fn links(&self) -> Links<'_> {
        Links {
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the carriers in the graph, in no particular
    /// order.
    pub fn carriers(&self) -> impl Iterator<Item = &Carrier> {
        self.carriers.values()
    }

    /// Returns an iterator over the converters that are members of the given
    /// group, in the order in which they were added to the graph.
    pub fn converters_in_group(&self, group: ConverterGroup) -> impl Iterator<Item = &Converter> {
        self.converters().filter(move |c| c.in_group(group))
    }

    /// Returns an iterator over the links through which the converter with
    /// the given `key` receives its inputs.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn input_links(&self, key: &str) -> Result<ConverterLinks<'_>, Error> {
        self.index(key).map(|index| ConverterLinks {
            iter: self.graph.edges_directed(index, Direction::Incoming),
        })
    }

    /// Returns an iterator over the links through which the converter with
    /// the given `key` delivers its outputs.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn output_links(&self, key: &str) -> Result<ConverterLinks<'_>, Error> {
        self.index(key).map(|index| ConverterLinks {
            iter: self.graph.edges_directed(index, Direction::Outgoing),
        })
    }

    /// Returns the links attached to the given slot of the converter with the
    /// given `key`.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn slot_links(
        &self,
        key: &str,
        direction: SlotDirection,
        carrier: &str,
    ) -> Result<Vec<&Link>, Error> {
        let links = match direction {
            SlotDirection::Input => self.input_links(key)?,
            SlotDirection::Output => self.output_links(key)?,
        };
        Ok(links.filter(|l| l.carrier() == carrier).collect())
    }

    /// Returns an iterator over the converters that supply the converter with
    /// the given `key`.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn suppliers(&self, key: &str) -> Result<Neighbors<'_>, Error> {
        self.index(key).map(|index| Neighbors {
            graph: &self.graph,
            iter: self.graph.neighbors_directed(index, Direction::Incoming),
        })
    }

    /// Returns an iterator over the converters that consume the outputs of
    /// the converter with the given `key`.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn consumers(&self, key: &str) -> Result<Neighbors<'_>, Error> {
        self.index(key).map(|index| Neighbors {
            graph: &self.graph,
            iter: self.graph.neighbors_directed(index, Direction::Outgoing),
        })
    }

    /// Returns the id of the link from `parent` to `child` for the given
    /// carrier.
    ///
    /// Returns an error if either converter doesn't exist, or if they aren't
    /// linked through the carrier.
    pub fn link_id(&self, parent: &str, child: &str, carrier: &str) -> Result<LinkId, Error> {
        let parent_index = self.index(parent)?;
        let child_index = self.index(child)?;
        self.graph
            .edges_connecting(parent_index, child_index)
            .find(|e| e.weight().carrier() == carrier)
            .map(|e| e.id())
            .ok_or_else(|| {
                Error::invalid_link(format!(
                    "No {carrier} link from {parent} to {child} found."
                ))
            })
    }

    pub(crate) fn index(&self, key: &str) -> Result<NodeIndex, Error> {
        self.node_indices.get(key).copied().ok_or_else(|| {
            Error::converter_not_found(format!("Converter with key {key} not found."))
        })
    }

    pub(crate) fn inner(&self) -> &petgraph::graph::DiGraph<Converter, Link> {
        &self.graph
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Converter {
        &mut self.graph[index]
    }

    pub(crate) fn converters_mut(&mut self) -> impl Iterator<Item = &mut Converter> {
        self.graph.node_weights_mut()
    }

    /// Returns the indices of all converters in the given group, in the
    /// order in which they were added to the graph.
    pub(crate) fn indices_in_group(&self, group: ConverterGroup) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&i| self.graph[i].in_group(group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_utils::EnergyGraphBuilder;
    use crate::slot::SlotDirection;
    use crate::{Converter, ConverterGroup, Error, Link, LinkType, Slot};

    fn builder() -> EnergyGraphBuilder {
        let mut builder = EnergyGraphBuilder::new();
        builder.primary("coal_mine", "coal");
        builder.primary("gas_field", "natural_gas");
        builder.add(
            Converter::new("chp")
                .with_group(ConverterGroup::Dispatchable)
                .with_slot(Slot::input("coal", 0.5))
                .with_slot(Slot::input("natural_gas", 0.5))
                .with_slot(Slot::output("electricity", 0.4))
                .with_slot(Slot::output("heat", 0.4)),
        );
        builder.add(
            Converter::new("households")
                .with_group(ConverterGroup::FinalDemand)
                .with_slot(Slot::input("electricity", 0.5))
                .with_slot(Slot::input("heat", 0.5)),
        );
        builder.connect("coal_mine", "chp", "coal", 1.0, 50.0);
        builder.connect("gas_field", "chp", "natural_gas", 1.0, 50.0);
        builder.connect("chp", "households", "electricity", 1.0, 40.0);
        builder.connect("chp", "households", "heat", 1.0, 40.0);
        builder
    }

    #[test]
    fn test_converter() -> Result<(), Error> {
        let graph = builder().build()?;

        assert_eq!(graph.converter("chp")?.key(), "chp");
        assert_eq!(
            graph.converter("nuclear_plant"),
            Err(Error::converter_not_found(
                "Converter with key nuclear_plant not found."
            ))
        );
        assert_eq!(graph.carrier("coal")?.key(), "coal");
        assert_eq!(
            graph.carrier("unobtainium"),
            Err(Error::carrier_not_found("Carrier with key unobtainium not found."))
        );

        Ok(())
    }

    #[test]
    fn test_converters_and_links() -> Result<(), Error> {
        let graph = builder().build()?;

        assert!(graph
            .converters()
            .map(|c| c.key())
            .eq(["coal_mine", "gas_field", "chp", "households"]));
        assert_eq!(graph.links().count(), 4);
        assert!(graph
            .converters_in_group(ConverterGroup::PrimaryEnergyDemand)
            .map(|c| c.key())
            .eq(["coal_mine", "gas_field"]));
        assert!(graph
            .converters_in_group(ConverterGroup::Dispatchable)
            .map(|c| c.key())
            .eq(["chp"]));

        Ok(())
    }

    #[test]
    fn test_neighbors() -> Result<(), Error> {
        let graph = builder().build()?;

        let mut suppliers = graph.suppliers("chp")?.map(|c| c.key()).collect::<Vec<_>>();
        suppliers.sort();
        assert_eq!(suppliers, vec!["coal_mine", "gas_field"]);

        assert!(graph.consumers("households")?.next().is_none());
        assert!(graph.suppliers("coal_mine")?.next().is_none());
        assert_eq!(graph.consumers("chp")?.count(), 2);

        assert!(graph
            .suppliers("nuclear_plant")
            .is_err_and(|e| e
                == Error::converter_not_found("Converter with key nuclear_plant not found.")));

        Ok(())
    }

    #[test]
    fn test_slot_links() -> Result<(), Error> {
        let mut builder = builder();
        builder.link(
            Link::new("coal_mine", "chp", "coal", LinkType::Constant).with_value(10.0),
        );
        let graph = builder.build()?;

        let coal = graph.slot_links("chp", SlotDirection::Input, "coal")?;
        assert_eq!(coal.len(), 2);
        assert!(coal.iter().all(|l| l.parent() == "coal_mine"));

        let heat = graph.slot_links("chp", SlotDirection::Output, "heat")?;
        assert_eq!(heat.len(), 1);
        assert_eq!(heat[0].child(), "households");

        assert!(graph
            .slot_links("chp", SlotDirection::Input, "heat")?
            .is_empty());
        assert_eq!(graph.input_links("chp")?.count(), 3);
        assert_eq!(graph.output_links("chp")?.count(), 2);

        let id = graph.link_id("chp", "households", "heat")?;
        assert_eq!(graph.inner()[id].carrier(), "heat");
        assert_eq!(
            graph.link_id("chp", "households", "coal"),
            Err(Error::invalid_link(
                "No coal link from chp to households found."
            ))
        );

        Ok(())
    }
}
