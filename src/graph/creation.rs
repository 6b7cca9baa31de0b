// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`EnergyGraph`] instances from given carriers,
//! converters and links.

use petgraph::graph::DiGraph;

use crate::{Carrier, Converter, EnergyGraphConfig, Error, Link};

use super::{CarrierMap, EnergyGraph, NodeIndexMap};

/// `EnergyGraph` instantiation.
impl EnergyGraph {
    /// Creates a new [`EnergyGraph`] from the given carriers, converters and
    /// links.
    ///
    /// Returns an error if the graph is invalid.
    pub fn try_new<
        CarrierIterator: IntoIterator<Item = Carrier>,
        ConverterIterator: IntoIterator<Item = Converter>,
        LinkIterator: IntoIterator<Item = Link>,
    >(
        carriers: CarrierIterator,
        converters: ConverterIterator,
        links: LinkIterator,
        config: EnergyGraphConfig,
    ) -> Result<Self, Error> {
        let carriers = Self::create_carriers(carriers)?;
        let (graph, indices) = Self::create_graph(converters)?;

        let mut eg = Self {
            graph,
            node_indices: indices,
            carriers,
            config,
        };
        eg.add_links(links)?;

        eg.validate()?;

        tracing::debug!(
            "Created energy graph with {} converters, {} links and {} carriers.",
            eg.graph.node_count(),
            eg.graph.edge_count(),
            eg.carriers.len()
        );

        Ok(eg)
    }

    fn create_carriers(carriers: impl IntoIterator<Item = Carrier>) -> Result<CarrierMap, Error> {
        let mut map = CarrierMap::new();
        for carrier in carriers {
            if map.contains_key(carrier.key()) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate carrier key found: {}",
                    carrier.key()
                )));
            }
            if !(0.0..=1.0).contains(&carrier.sustainable_share()) {
                return Err(Error::invalid_graph(format!(
                    "Carrier {} has a sustainable share of {}, expected 0.0..=1.0.",
                    carrier.key(),
                    carrier.sustainable_share()
                )));
            }
            map.insert(carrier.key().to_string(), carrier);
        }
        Ok(map)
    }

    fn create_graph(
        converters: impl IntoIterator<Item = Converter>,
    ) -> Result<(DiGraph<Converter, Link>, NodeIndexMap), Error> {
        let mut graph = DiGraph::new();
        let mut indices = NodeIndexMap::new();

        for converter in converters {
            let key = converter.key().to_string();

            if key.is_empty() {
                return Err(Error::invalid_converter("Converter key must not be empty."));
            }
            if indices.contains_key(&key) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate converter key found: {key}"
                )));
            }

            let idx = graph.add_node(converter);
            indices.insert(key, idx);
        }

        Ok((graph, indices))
    }

    fn add_links(&mut self, links: impl IntoIterator<Item = Link>) -> Result<(), Error> {
        for link in links {
            let parent = link.parent();
            let child = link.child();

            if parent == child {
                return Err(Error::invalid_link(format!(
                    "Link:({parent}, {child}) Can't link a converter to itself."
                )));
            }
            for key in [parent, child] {
                if !self.node_indices.contains_key(key) {
                    return Err(Error::invalid_link(format!(
                        "Link:({parent}, {child}) Can't find a converter with key {key}"
                    )));
                }
            }
            if !self.carriers.contains_key(link.carrier()) {
                return Err(Error::invalid_link(format!(
                    "Link:({parent}, {child}) Can't find a carrier with key {}",
                    link.carrier()
                )));
            }

            let parent_idx = self.node_indices[parent];
            let child_idx = self.node_indices[child];
            self.graph.add_edge(parent_idx, child_idx, link);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::LOSS;
    use crate::{LinkType, Slot};

    fn carriers() -> Vec<Carrier> {
        vec![
            Carrier::new("coal").with_co2_per_mj(0.09),
            Carrier::new("electricity"),
            Carrier::new(LOSS),
        ]
    }

    fn converters_and_links() -> (Vec<Converter>, Vec<Link>) {
        let converters = vec![
            Converter::new("coal_mine").with_slot(Slot::output("coal", 1.0)),
            Converter::new("coal_plant")
                .with_slot(Slot::input("coal", 1.0))
                .with_slot(Slot::output("electricity", 0.4))
                .with_slot(Slot::output(LOSS, 0.6)),
            Converter::new("households").with_slot(Slot::input("electricity", 1.0)),
        ];
        let links = vec![
            Link::new("coal_mine", "coal_plant", "coal", LinkType::Flexible),
            Link::new("coal_plant", "households", "electricity", LinkType::Share),
        ];

        (converters, links)
    }

    #[test]
    fn test_converter_validation() {
        let config = EnergyGraphConfig::default();
        let (mut converters, links) = converters_and_links();

        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_ok());

        converters.push(Converter::new("coal_plant"));
        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e == Error::invalid_graph("Duplicate converter key found: coal_plant")));

        converters.pop();
        converters.push(Converter::new(""));
        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e == Error::invalid_converter("Converter key must not be empty.")));

        let mut duplicate_carriers = carriers();
        duplicate_carriers.push(Carrier::new("coal"));
        converters.pop();
        assert!(EnergyGraph::try_new(
            duplicate_carriers,
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e == Error::invalid_graph("Duplicate carrier key found: coal")));

        let mut invalid_carriers = carriers();
        invalid_carriers.push(Carrier::new("biogas").with_sustainable_share(1.5));
        assert!(EnergyGraph::try_new(
            invalid_carriers,
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e
            == Error::invalid_graph(
                "Carrier biogas has a sustainable share of 1.5, expected 0.0..=1.0."
            )));
    }

    #[test]
    fn test_link_validation() {
        let config = EnergyGraphConfig::default();
        let (converters, mut links) = converters_and_links();

        links.push(Link::new(
            "coal_plant",
            "coal_plant",
            "electricity",
            LinkType::Share,
        ));
        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e
            == Error::invalid_link(
                "Link:(coal_plant, coal_plant) Can't link a converter to itself."
            )));

        links.pop();
        links.push(Link::new("coal_plant", "industry", "electricity", LinkType::Share));
        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e
            == Error::invalid_link(
                "Link:(coal_plant, industry) Can't find a converter with key industry"
            )));

        links.pop();
        links.push(Link::new("coal_mine", "coal_plant", "lignite", LinkType::Share));
        assert!(EnergyGraph::try_new(
            carriers(),
            converters.clone(),
            links.clone(),
            config.clone()
        )
        .is_err_and(|e| e
            == Error::invalid_link(
                "Link:(coal_mine, coal_plant) Can't find a carrier with key lignite"
            )));

        links.pop();
        assert!(EnergyGraph::try_new(carriers(), converters, links, config).is_ok());
    }
}
