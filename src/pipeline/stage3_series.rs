use crate::input::InputError;
use crate::model::dataset::PreparedDataset;
use crate::model::scale::{ScoreSelector, VISIT_COUNT, Visit, Z_95};
use crate::model::series::{VisitPoint, VisitSeries, VisitStats};
use crate::pipeline::stage2_cohort::CohortFilter;

pub fn compute_series(
    dataset: &PreparedDataset,
    filter: &CohortFilter,
    selector: ScoreSelector,
) -> Result<VisitSeries, InputError> {
    if let ScoreSelector::Item(item) = selector {
        for visit in Visit::all() {
            if !dataset.column_map.has(visit, item) {
                return Err(InputError::Schema(format!(
                    "column {} is absent from {}",
                    selector.column_name(visit),
                    dataset.source.display()
                )));
            }
        }
    }

    let cohort: Vec<_> = filter.select(dataset).collect();

    let mut points = Vec::with_capacity(VISIT_COUNT);
    let mut values = Vec::with_capacity(cohort.len());
    for visit in Visit::all() {
        values.clear();
        values.extend(cohort.iter().filter_map(|r| r.score(visit, selector)));
        points.push(VisitPoint {
            visit: visit.number(),
            column: selector.column_name(visit),
            stats: confidence_interval(&values),
        });
    }

    tracing::debug!(
        selector = %selector.label(),
        drug = %filter.drug,
        therapy = %filter.therapy,
        cohort = cohort.len(),
        empty_visits = points.iter().filter(|p| p.stats.empty).count(),
        "computed visit series"
    );

    Ok(VisitSeries {
        selector,
        drug: filter.drug.clone(),
        therapy: filter.therapy.clone(),
        cohort_size: cohort.len(),
        points,
    })
}

/// Normal-approximation 95% interval around the mean. No values yields the
/// empty sentinel; a single value has zero spread.
pub fn confidence_interval(values: &[f64]) -> VisitStats {
    let count = values.len();
    if count == 0 {
        return VisitStats::empty_sentinel();
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sd = sample_sd(values, mean);
    let margin = Z_95 * sd / n.sqrt();

    VisitStats {
        mean,
        lower: mean - margin,
        upper: mean + margin,
        count,
        empty: false,
    }
}

pub fn sample_sd(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_series.rs"]
mod tests;
