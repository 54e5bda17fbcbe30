use std::collections::HashSet;

use thiserror::Error;

use crate::model::dataset::{PreparedDataset, Record};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("dataset has no rows to select a cohort from")]
    EmptyDataset,
    #[error("unknown drug '{requested}' (available: {available})")]
    UnknownDrug { requested: String, available: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortFilter {
    pub drug: String,
    pub therapy: String,
}

impl CohortFilter {
    pub fn new(drug: impl Into<String>, therapy: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            therapy: therapy.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.drug == self.drug && record.therapy == self.therapy
    }

    pub fn select<'a>(&'a self, dataset: &'a PreparedDataset) -> impl Iterator<Item = &'a Record> {
        dataset.records.iter().filter(move |r| self.matches(r))
    }
}

pub fn drug_options(dataset: &PreparedDataset) -> Vec<&str> {
    unique_in_order(dataset.records.iter().map(|r| r.drug.as_str()))
}

pub fn therapy_options<'a>(dataset: &'a PreparedDataset, drug: &str) -> Vec<&'a str> {
    unique_in_order(
        dataset
            .records
            .iter()
            .filter(|r| r.drug == drug)
            .map(|r| r.therapy.as_str()),
    )
}

/// Picks the cohort for a drug/therapy request. Missing values default to the
/// first available option; a therapy the drug was never paired with falls
/// back to the drug's first therapy.
pub fn resolve_cohort(
    dataset: &PreparedDataset,
    drug: Option<&str>,
    therapy: Option<&str>,
) -> Result<CohortFilter, SelectionError> {
    let drugs = drug_options(dataset);
    let Some(&first_drug) = drugs.first() else {
        return Err(SelectionError::EmptyDataset);
    };

    let drug = match drug {
        Some(requested) if drugs.contains(&requested) => requested,
        Some(requested) => {
            return Err(SelectionError::UnknownDrug {
                requested: requested.to_string(),
                available: drugs.join(", "),
            });
        }
        None => first_drug,
    };

    let therapies = therapy_options(dataset, drug);
    // A drug present in the dataset always has at least one row.
    let first_therapy = therapies.first().copied().unwrap_or_default();
    let therapy = match therapy {
        Some(requested) if therapies.contains(&requested) => requested,
        Some(requested) => {
            tracing::warn!(
                drug = %drug,
                requested = %requested,
                fallback = %first_therapy,
                "therapy not available for drug; using first available therapy"
            );
            first_therapy
        }
        None => first_therapy,
    };

    Ok(CohortFilter::new(drug, therapy))
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_cohort.rs"]
mod tests;
