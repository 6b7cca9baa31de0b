// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `ConverterGroup` enum, which represents the roles
//! a converter can play in the calculations.

use std::fmt::Display;

/// Represents a group a converter belongs to.
///
/// A converter can be a member of any number of groups.  The groups decide
/// where traversals stop, and which converters take part in the merit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConverterGroup {
    /// Converters that directly consume primary energy, like extraction or
    /// import of fossil fuels, or wind turbines.
    PrimaryEnergyDemand,
    /// Converters where final demand is measured.
    FinalDemand,
    /// Power plants that are dispatched through the merit order.
    Dispatchable,
    /// Power plants that run regardless of the merit order.
    MustRun,
    /// Pseudo-converters that represent the environment, like ambient heat.
    /// Traversals never follow links coming from them.
    Environment,
}

impl Display for ConverterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConverterGroup::PrimaryEnergyDemand => write!(f, "PrimaryEnergyDemand"),
            ConverterGroup::FinalDemand => write!(f, "FinalDemand"),
            ConverterGroup::Dispatchable => write!(f, "Dispatchable"),
            ConverterGroup::MustRun => write!(f, "MustRun"),
            ConverterGroup::Environment => write!(f, "Environment"),
        }
    }
}

/// Predicates for checking the group membership of a converter.
pub(crate) trait GroupPredicates {
    fn memberships(&self) -> &[ConverterGroup];

    fn in_group(&self, group: ConverterGroup) -> bool {
        self.memberships().contains(&group)
    }

    fn is_primary_energy_demand(&self) -> bool {
        self.in_group(ConverterGroup::PrimaryEnergyDemand)
    }

    fn is_final_demand(&self) -> bool {
        self.in_group(ConverterGroup::FinalDemand)
    }

    fn is_environment(&self) -> bool {
        self.in_group(ConverterGroup::Environment)
    }
}
