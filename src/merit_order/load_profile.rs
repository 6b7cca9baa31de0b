// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The hourly load profile the merit order is calculated from.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::Error;

/// One hour of the load profile.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LoadHour {
    /// The load in this hour, relative to the peak load.
    pub(crate) normalized_load: f64,
    /// The production of each must-run group in this hour, relative to the
    /// group's installed capacity.
    pub(crate) must_run: Vec<f64>,
}

/// An hourly profile of the normalized electricity load, and of the
/// production of the must-run groups.
///
/// The profile is read from a CSV file with a header row.  The first column
/// holds the normalized load, every further column the normalized production
/// of one must-run group:
///
/// ```text
/// normalized_load,column_1,column_2
/// 0.8,0.5,0.1
/// 1.0,0.4,0.0
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LoadProfile {
    group_columns: Vec<String>,
    hours: Vec<LoadHour>,
}

impl LoadProfile {
    /// Reads a load profile from the CSV file at the given path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::invalid_load_profile(format!(
                "Can't open load profile {}: {e}",
                path.display()
            ))
        })?;
        Self::from_reader(file)
    }

    /// Reads a load profile from CSV data.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::invalid_load_profile(format!("Can't read header: {e}")))?
            .clone();
        if headers.is_empty() {
            return Err(Error::invalid_load_profile(
                "Load profile has no columns.",
            ));
        }

        let mut hours = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record = record
                .map_err(|e| Error::invalid_load_profile(format!("Row {row}: {e}")))?;
            hours.push(parse_hour(row, &headers, &record)?);
        }

        if hours.is_empty() {
            return Err(Error::invalid_load_profile("Load profile has no rows."));
        }

        let group_columns = headers.iter().skip(1).map(String::from).collect();
        tracing::debug!(
            "Read load profile with {} hours and {} must-run columns.",
            hours.len(),
            headers.len() - 1
        );

        Ok(Self {
            group_columns,
            hours,
        })
    }

    /// Returns the number of must-run group columns.
    pub fn group_count(&self) -> usize {
        self.group_columns.len()
    }

    /// Returns the names of the must-run group columns.
    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    /// Returns the number of hours in the profile.
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub(crate) fn hours(&self) -> &[LoadHour] {
        &self.hours
    }
}

fn parse_hour(row: usize, headers: &StringRecord, record: &StringRecord) -> Result<LoadHour, Error> {
    let mut values = Vec::with_capacity(record.len());
    for (field, column) in record.iter().zip(headers.iter()) {
        let value = field.parse::<f64>().map_err(|_| {
            Error::invalid_load_profile(format!(
                "Row {row}, column {column}: can't parse {field:?} as a number."
            ))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid_load_profile(format!(
                "Row {row}, column {column}: expected a non-negative value, found {value}."
            )));
        }
        values.push(value);
    }

    let Some((&normalized_load, must_run)) = values.split_first() else {
        return Err(Error::invalid_load_profile(format!("Row {row} is empty.")));
    };
    Ok(LoadHour {
        normalized_load,
        must_run: must_run.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() -> Result<(), Error> {
        let data = "normalized_load, column_1, column_2\n\
                    0.8, 0.5, 0.1\n\
                    1.0, 0.4, 0.0\n\
                    0.3, 0.0, 0.2\n";
        let profile = LoadProfile::from_reader(data.as_bytes())?;

        assert_eq!(profile.len(), 3);
        assert_eq!(profile.group_count(), 2);
        assert_eq!(profile.group_columns(), ["column_1", "column_2"]);
        assert_eq!(
            profile.hours()[1],
            LoadHour {
                normalized_load: 1.0,
                must_run: vec![0.4, 0.0],
            }
        );

        let without_groups = LoadProfile::from_reader("normalized_load\n0.5\n".as_bytes())?;
        assert_eq!(without_groups.group_count(), 0);
        assert!(without_groups.hours()[0].must_run.is_empty());

        Ok(())
    }

    #[test]
    fn test_invalid_profiles() {
        assert_eq!(
            LoadProfile::from_reader("".as_bytes()),
            Err(Error::invalid_load_profile("Load profile has no columns."))
        );
        assert_eq!(
            LoadProfile::from_reader("normalized_load,column_1\n".as_bytes()),
            Err(Error::invalid_load_profile("Load profile has no rows."))
        );
        assert_eq!(
            LoadProfile::from_reader("normalized_load,column_1\n0.5,high\n".as_bytes()),
            Err(Error::invalid_load_profile(
                "Row 1, column column_1: can't parse \"high\" as a number."
            ))
        );
        assert_eq!(
            LoadProfile::from_reader("normalized_load\n0.5\n-0.1\n".as_bytes()),
            Err(Error::invalid_load_profile(
                "Row 2, column normalized_load: expected a non-negative value, found -0.1."
            ))
        );
        assert!(
            LoadProfile::from_reader("normalized_load,column_1\n0.5,0.1\n0.5\n".as_bytes())
                .is_err_and(|e| e.to_string().starts_with("InvalidLoadProfile: Row 2:"))
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(LoadProfile::from_path("/nonexistent/load_profile.csv")
            .is_err_and(|e| e
                .to_string()
                .starts_with("InvalidLoadProfile: Can't open load profile")));
    }
}
