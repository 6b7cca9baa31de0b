// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The merit order of the dispatchable electricity producers.
//!
//! The dispatchable converters are ordered by their marginal costs, and
//! their available capacities are stacked on top of each other in that
//! order.  The load that remains after the must-run converters have produced
//! is described by a load-duration curve, and every converter's capacity
//! factor is the part of its capacity interval that lies under this curve.

mod load_profile;
mod ordering;
mod residual_load;

pub use load_profile::LoadProfile;

use petgraph::graph::NodeIndex;

use crate::carrier::ELECTRICITY;
use crate::{Calculation, ConverterGroup, EnergyGraph, Error, MeritOrderConfig, MustRunConfig};
use ordering::Candidate;

const MJ_PER_MWH: f64 = 3600.0;

/// Runs the merit order on the converters of a [`Calculation`].
///
/// The load profile and must-run groups are validated against the graph
/// when the scheduler is created, so that configuration errors surface
/// before anything is calculated.
#[derive(Clone, Debug)]
pub struct MeritOrderScheduler {
    config: MeritOrderConfig,
    load_profile: LoadProfile,
    must_run: MustRunConfig,
}

impl MeritOrderScheduler {
    /// Creates a new scheduler for the given graph.
    ///
    /// Returns an error if the configuration is out of range, if the number
    /// of must-run groups doesn't match the number of group columns in the
    /// load profile, or if a must-run group refers to a converter that
    /// doesn't exist.
    pub fn try_new(
        graph: &EnergyGraph,
        config: MeritOrderConfig,
        load_profile: LoadProfile,
        must_run: MustRunConfig,
    ) -> Result<Self, Error> {
        if config.curve_buckets == 0 {
            return Err(Error::invalid_config("curve_buckets must be at least 1."));
        }
        if !(config.hours_per_year > 0.0 && config.hours_per_year.is_finite()) {
            return Err(Error::invalid_config(format!(
                "hours_per_year must be positive, found {}.",
                config.hours_per_year
            )));
        }
        if must_run.groups.len() != load_profile.group_count() {
            return Err(Error::invalid_config(format!(
                "The load profile has {} must-run columns, but {} must-run groups are configured.",
                load_profile.group_count(),
                must_run.groups.len()
            )));
        }
        for group in &must_run.groups {
            for key in &group.converters {
                if graph.converter(key).is_err() {
                    return Err(Error::converter_not_found(format!(
                        "Must-run group {} refers to unknown converter {key}.",
                        group.name
                    )));
                }
            }
        }

        Ok(Self {
            config,
            load_profile,
            must_run,
        })
    }

    pub fn config(&self) -> &MeritOrderConfig {
        &self.config
    }

    /// Orders the dispatchable converters of the calculation, and assigns
    /// their capacity intervals, positions, capacity factors and full load
    /// hours.
    pub(crate) fn run(&self, calculation: &mut Calculation, peak_load: f64) -> Result<(), Error> {
        if !(peak_load >= 0.0 && peak_load.is_finite()) {
            return Err(Error::invalid_config(format!(
                "The peak load must not be negative, found {peak_load}."
            )));
        }

        let mut candidates = calculation
            .graph()
            .indices_in_group(ConverterGroup::Dispatchable)
            .into_iter()
            .map(|index| Candidate {
                index,
                marginal_costs: marginal_costs(calculation, index),
            })
            .collect::<Vec<_>>();
        ordering::sort_by_costs(&mut candidates);

        let capacities = self.must_run_capacities(calculation.graph())?;
        let curve = residual_load::residual_load_curve(
            &self.load_profile,
            &capacities,
            peak_load,
            self.config.curve_buckets,
        )?;

        let graph = calculation.graph_mut();
        ordering::stack_capacities(graph, &candidates, &self.config)?;

        for candidate in &candidates {
            let converter = graph.node_mut(candidate.index);
            let Some(start) = converter.merit_order_start() else {
                return Err(Error::internal(format!(
                    "Converter {} was not assigned a capacity interval.",
                    converter.key()
                )));
            };
            let end = converter.merit_order_end()?;
            let availability = converter.availability();

            let span = (end - start).max(0.0);
            let capacity_factor = if span > 0.0 {
                let ratio = availability * curve.area_between(start, end) / span;
                if ratio.is_finite() {
                    ratio.min(availability)
                } else {
                    tracing::warn!(
                        "Capacity factor of {} is not finite, using 0.0.",
                        converter.key()
                    );
                    0.0
                }
            } else {
                0.0
            };

            converter.merit_order.capacity_factor = Some(capacity_factor);
            converter.merit_order.full_load_hours =
                Some(capacity_factor * self.config.hours_per_year);
        }

        tracing::info!(
            "Merit order finished for {} dispatchable converters at a peak load of {}.",
            candidates.len(),
            peak_load
        );

        Ok(())
    }

    /// Returns the installed capacity of each must-run group.
    fn must_run_capacities(&self, graph: &EnergyGraph) -> Result<Vec<f64>, Error> {
        self.must_run
            .groups
            .iter()
            .map(|group| {
                group
                    .converters
                    .iter()
                    .try_fold(0.0, |total, key| -> Result<f64, Error> {
                        Ok(total + graph.converter(key)?.installed_capacity().unwrap_or(0.0))
                    })
            })
            .collect()
    }
}

/// Returns the costs of producing one MWh of electricity with the converter.
///
/// Explicit marginal costs take precedence.  Otherwise the fuel costs are
/// converted to costs per MWh of electricity output, falling back to the
/// weighted costs of the carriers feeding the converter.  Converters that
/// don't produce electricity have no marginal costs.
fn marginal_costs(calculation: &mut Calculation, index: NodeIndex) -> Option<f64> {
    let converter = &calculation.graph().inner()[index];
    let costs = *converter.costs();
    if costs.marginal_costs.is_some() {
        return costs.marginal_costs;
    }

    let electricity = converter.output_conversion(ELECTRICITY);
    if electricity <= 0.0 {
        tracing::debug!(
            "{} has no electricity output, ordering it without costs.",
            converter.key()
        );
        return None;
    }

    let fuel_costs = match costs.fuel_costs_per_mj {
        Some(fuel_costs) => fuel_costs,
        None => calculation.weighted_carrier_cost_at(index),
    };
    let variable_costs = costs
        .variable_operation_and_maintenance_costs_per_mwh
        .unwrap_or(0.0);

    let marginal = fuel_costs * MJ_PER_MWH / electricity + variable_costs;
    marginal.is_finite().then_some(marginal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::LOSS;
    use crate::graph::test_utils::EnergyGraphBuilder;
    use crate::{Converter, CostComponents, MustRunGroup, Slot};

    fn assert_close(actual: Option<f64>, expected: f64) {
        let Some(actual) = actual else {
            panic!("expected {expected}, got None");
        };
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn plant(key: &str, capacity: f64, marginal_costs: f64, fixed_costs: f64) -> Converter {
        Converter::new(key)
            .with_group(ConverterGroup::Dispatchable)
            .with_installed_capacity(capacity)
            .with_costs(CostComponents {
                marginal_costs: Some(marginal_costs),
                fixed_costs_per_mw_per_year: Some(fixed_costs),
                ..Default::default()
            })
    }

    fn builder() -> EnergyGraphBuilder {
        let mut builder = EnergyGraphBuilder::new();
        builder
            .add(plant("gas_plant", 40.0, 60.0, 14_600.0))
            .add(plant("oil_plant", 0.0, 100.0, 0.0))
            .add(plant("coal_plant", 40.0, 30.0, 20_000.0))
            .add(plant("nuclear_plant", 40.0, 10.0, 300_000.0))
            .add(
                Converter::new("solar_pv")
                    .with_group(ConverterGroup::MustRun)
                    .with_installed_capacity(20.0),
            );
        builder
    }

    /// Residual loads of 90, 65, 50 and 25 at a peak load of 100.
    fn load_profile() -> Result<LoadProfile, Error> {
        LoadProfile::from_reader(
            "normalized_load,solar\n\
             1.0,0.5\n\
             0.75,0.5\n\
             0.5,0.0\n\
             0.25,0.0\n"
                .as_bytes(),
        )
    }

    fn must_run() -> MustRunConfig {
        MustRunConfig {
            groups: vec![MustRunGroup {
                name: "solar".to_string(),
                converters: vec!["solar_pv".to_string()],
            }],
        }
    }

    fn config() -> MeritOrderConfig {
        MeritOrderConfig {
            curve_buckets: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_validation() -> Result<(), Error> {
        let graph = builder().build()?;

        assert!(
            MeritOrderScheduler::try_new(&graph, config(), load_profile()?, must_run()).is_ok()
        );

        assert!(MeritOrderScheduler::try_new(
            &graph,
            config(),
            load_profile()?,
            MustRunConfig::default()
        )
        .is_err_and(|e| e
            == Error::invalid_config(
                "The load profile has 1 must-run columns, but 0 must-run groups are configured."
            )));

        let mut unknown = must_run();
        unknown.groups[0].converters.push("wind_turbine".to_string());
        assert!(
            MeritOrderScheduler::try_new(&graph, config(), load_profile()?, unknown).is_err_and(
                |e| e
                    == Error::converter_not_found(
                        "Must-run group solar refers to unknown converter wind_turbine."
                    )
            )
        );

        let no_buckets = MeritOrderConfig {
            curve_buckets: 0,
            ..Default::default()
        };
        assert!(
            MeritOrderScheduler::try_new(&graph, no_buckets, load_profile()?, must_run())
                .is_err_and(|e| e == Error::invalid_config("curve_buckets must be at least 1."))
        );

        Ok(())
    }

    #[test]
    fn test_run() -> Result<(), Error> {
        let graph = builder().build()?;
        let scheduler = MeritOrderScheduler::try_new(&graph, config(), load_profile()?, must_run())?;
        let mut calculation = Calculation::new(graph);
        calculation.run_merit_order(&scheduler, 100.0)?;

        let graph = calculation.graph();
        let nuclear = graph.converter("nuclear_plant")?;
        assert_eq!(nuclear.merit_order_start(), Some(0.0));
        assert_eq!(nuclear.merit_order_end(), Ok(40.0));
        assert_eq!(nuclear.merit_order_position(), Some(1));
        assert_close(nuclear.merit_order_capacity_factor(), 5.0 / 6.0);
        assert_close(nuclear.merit_order_full_load_hours(), 7300.0);

        let coal = graph.converter("coal_plant")?;
        assert_eq!(coal.merit_order_start(), Some(40.0));
        assert_eq!(coal.merit_order_position(), Some(2));
        assert_close(coal.merit_order_capacity_factor(), 0.5);
        assert_close(coal.total_costs_per_mwh(), 30.0 + 20_000.0 / 4380.0);

        let gas = graph.converter("gas_plant")?;
        assert_eq!(gas.merit_order_start(), Some(80.0));
        assert_eq!(gas.merit_order_end(), Ok(120.0));
        assert_eq!(gas.merit_order_position(), Some(3));
        // Only 80..90 of the interval lies under the curve.
        assert_close(gas.merit_order_capacity_factor(), 7.0 / 96.0);
        assert_close(gas.merit_order_full_load_hours(), 638.75);
        assert_close(gas.total_costs_per_mwh(), 580.0 / 7.0);

        let oil = graph.converter("oil_plant")?;
        assert_eq!(oil.merit_order_start(), Some(120.0));
        assert_eq!(oil.merit_order_end(), Ok(120.0));
        assert_eq!(oil.merit_order_position(), Some(1000));
        assert_eq!(oil.merit_order_capacity_factor(), Some(0.0));
        assert_eq!(oil.total_costs_per_mwh(), None);

        assert_eq!(graph.converter("solar_pv")?.merit_order_start(), None);

        Ok(())
    }

    #[test]
    fn test_capacity_factor_is_bounded_by_availability() -> Result<(), Error> {
        let mut builder = builder();
        builder.add(plant("hydro_plant", 40.0, 1.0, 0.0).with_availability(0.8));
        let graph = builder.build()?;
        let scheduler = MeritOrderScheduler::try_new(&graph, config(), load_profile()?, must_run())?;
        let mut calculation = Calculation::new(graph);

        for peak_load in [0.0, 50.0, 100.0, 1000.0] {
            calculation.run_merit_order(&scheduler, peak_load)?;
            for converter in calculation
                .graph()
                .converters_in_group(ConverterGroup::Dispatchable)
            {
                let Some(capacity_factor) = converter.merit_order_capacity_factor() else {
                    panic!("{} has no capacity factor", converter.key());
                };
                assert!(capacity_factor >= 0.0);
                assert!(capacity_factor <= converter.availability());
            }
        }

        // At a peak load of 1000 the curve falls from 1.0 to 0.75 at 330.
        let hydro = calculation.graph().converter("hydro_plant")?;
        assert_eq!(hydro.merit_order_end(), Ok(32.0));
        assert_close(
            hydro.merit_order_capacity_factor(),
            0.8 * (1.0 + (1.0 - 0.25 * 32.0 / 330.0)) / 2.0,
        );

        assert!(calculation
            .run_merit_order(&scheduler, -1.0)
            .is_err_and(|e| e
                == Error::invalid_config("The peak load must not be negative, found -1.")));

        Ok(())
    }

    #[test]
    fn test_marginal_costs() -> Result<(), Error> {
        let mut builder = EnergyGraphBuilder::new();
        builder.primary("gas_field", "natural_gas");
        builder
            .add(
                Converter::new("gas_plant")
                    .with_group(ConverterGroup::Dispatchable)
                    .with_installed_capacity(10.0)
                    .with_slot(Slot::input("natural_gas", 1.0))
                    .with_slot(Slot::output("electricity", 0.5))
                    .with_slot(Slot::output(LOSS, 0.5))
                    .with_costs(CostComponents {
                        variable_operation_and_maintenance_costs_per_mwh: Some(5.0),
                        ..Default::default()
                    }),
            )
            .add(
                Converter::new("coal_plant")
                    .with_group(ConverterGroup::Dispatchable)
                    .with_installed_capacity(10.0)
                    .with_slot(Slot::output("electricity", 0.4))
                    .with_costs(CostComponents {
                        fuel_costs_per_mj: Some(0.002),
                        ..Default::default()
                    }),
            )
            .add(
                Converter::new("boiler")
                    .with_group(ConverterGroup::Dispatchable)
                    .with_installed_capacity(10.0)
                    .with_slot(Slot::output("heat", 0.9)),
            );
        builder.connect("gas_field", "gas_plant", "natural_gas", 1.0, 20.0);
        let graph = builder.build()?;

        let profile = LoadProfile::from_reader("normalized_load\n1.0\n".as_bytes())?;
        let scheduler = MeritOrderScheduler::try_new(
            &graph,
            MeritOrderConfig::default(),
            profile,
            MustRunConfig::default(),
        )?;
        let mut calculation = Calculation::new(graph);
        calculation.run_merit_order(&scheduler, 15.0)?;

        let graph = calculation.graph();
        let boiler = graph.converter("boiler")?;
        assert_eq!(boiler.merit_order_marginal_costs(), None);
        assert_eq!(boiler.merit_order_position(), Some(1));

        let coal = graph.converter("coal_plant")?;
        assert_close(coal.merit_order_marginal_costs(), 18.0);
        assert_eq!(coal.merit_order_position(), Some(2));

        let gas = graph.converter("gas_plant")?;
        assert_close(gas.merit_order_marginal_costs(), 62.6);
        assert_eq!(gas.merit_order_position(), Some(3));

        Ok(())
    }
}
