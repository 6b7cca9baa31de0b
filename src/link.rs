// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Link` struct, which connects the output slot of a
//! supplying converter to the input slot of a consuming converter.

use std::fmt::Display;

use crate::carrier::LOSS;

/// How the share of a link is determined when the graph is calculated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkType {
    Share,
    Flexible,
    InversedFlexible,
    Constant,
    Dependent,
}

impl Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkType::Share => write!(f, "Share"),
            LinkType::Flexible => write!(f, "Flexible"),
            LinkType::InversedFlexible => write!(f, "InversedFlexible"),
            LinkType::Constant => write!(f, "Constant"),
            LinkType::Dependent => write!(f, "Dependent"),
        }
    }
}

/// A directed connection along which a carrier flows from `parent` (the
/// supplier) to `child` (the consumer).
///
/// `share` is the fraction of the child's input slot demand that this link
/// satisfies and `value` the absolute flow.  `None` means the value has not
/// been resolved yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    parent: String,
    child: String,
    carrier: String,
    link_type: LinkType,
    share: Option<f64>,
    value: Option<f64>,
}

impl Link {
    pub fn new(
        parent: impl Into<String>,
        child: impl Into<String>,
        carrier: impl Into<String>,
        link_type: LinkType,
    ) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            carrier: carrier.into(),
            link_type,
            share: None,
            value: None,
        }
    }

    pub fn with_share(mut self, share: f64) -> Self {
        self.share = Some(share);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns the key of the supplying converter.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Returns the key of the consuming converter.
    pub fn child(&self) -> &str {
        &self.child
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn share(&self) -> Option<f64> {
        self.share
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_loss(&self) -> bool {
        self.carrier == LOSS
    }

    /// Returns the share of the link, substituting unresolved shares.
    ///
    /// Unresolved constant links resolve to `0.0`, all other unresolved links
    /// to `1.0`.
    pub fn resolved_share(&self) -> f64 {
        match (self.share, self.link_type) {
            (Some(share), _) => share,
            (None, LinkType::Constant) => 0.0,
            (None, _) => 1.0,
        }
    }
}

impl Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.parent, self.carrier, self.child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_share() {
        let constant = Link::new("a", "b", "gas", LinkType::Constant);
        assert_eq!(constant.resolved_share(), 0.0);

        let flexible = Link::new("a", "b", "gas", LinkType::Flexible);
        assert_eq!(flexible.resolved_share(), 1.0);

        let inversed = Link::new("a", "b", "gas", LinkType::InversedFlexible);
        assert_eq!(inversed.resolved_share(), 1.0);

        let share = Link::new("a", "b", "gas", LinkType::Share);
        assert_eq!(share.resolved_share(), 1.0);

        let dependent = Link::new("a", "b", "gas", LinkType::Dependent);
        assert_eq!(dependent.resolved_share(), 1.0);

        let constant = Link::new("a", "b", "gas", LinkType::Constant).with_share(0.4);
        assert_eq!(constant.resolved_share(), 0.4);

        let resolved = Link::new("a", "b", "gas", LinkType::Flexible).with_share(0.25);
        assert_eq!(resolved.resolved_share(), 0.25);
    }

    #[test]
    fn test_display() {
        let link = Link::new("coal_plant", "grid", "electricity", LinkType::Share);
        assert_eq!(link.to_string(), "coal_plant -[electricity]-> grid");
        assert!(!link.is_loss());
        assert!(Link::new("coal_plant", "loss_sink", LOSS, LinkType::Share).is_loss());
    }
}
