use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::dataset::PreparedDataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeSexCount {
    pub sex: String,
    pub age: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugTherapyCount {
    pub drug: String,
    pub therapy: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExploreOutput {
    pub age_sex: Vec<AgeSexCount>,
    pub drug_therapy: Vec<DrugTherapyCount>,
}

pub fn run_stage4(dataset: &PreparedDataset) -> ExploreOutput {
    ExploreOutput {
        age_sex: age_sex_counts(dataset),
        drug_therapy: drug_therapy_counts(dataset),
    }
}

pub fn age_sex_counts(dataset: &PreparedDataset) -> Vec<AgeSexCount> {
    count_pairs(
        dataset
            .records
            .iter()
            .map(|r| (r.sex.as_str().to_string(), r.age)),
    )
    .into_iter()
    .map(|((sex, age), count)| AgeSexCount { sex, age, count })
    .collect()
}

pub fn drug_therapy_counts(dataset: &PreparedDataset) -> Vec<DrugTherapyCount> {
    count_pairs(
        dataset
            .records
            .iter()
            .map(|r| (r.drug.clone(), r.therapy.clone())),
    )
    .into_iter()
    .map(|((drug, therapy), count)| DrugTherapyCount {
        drug,
        therapy,
        count,
    })
    .collect()
}

// Descending by count; ties keep key order.
fn count_pairs<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut out: Vec<(K, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_explore.rs"]
mod tests;
