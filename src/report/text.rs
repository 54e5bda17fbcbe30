use std::collections::BTreeMap;

use crate::model::dataset::PreparedDataset;
use crate::model::scale::Visit;
use crate::model::series::VisitSeries;
use crate::pipeline::stage4_explore::ExploreOutput;
use crate::report::chart::{StackedBar, render_interval_chart, render_stacked_bars};
use crate::report::{HamdView, format_opt_f64, pad_right};

const BAR_WIDTH: usize = 50;
const INTERVAL_WIDTH: usize = 40;

const INTRODUCTION: &[&str] = &[
    "The Hamilton Depression Rating Scale (HDRS, or HAMD) is a clinician-administered \
     instrument for rating the severity of depression. It was first designed for hospital \
     inpatients and covers symptoms over the preceding week, which has made it a standard \
     tool in both clinical practice and research.",
    "This dataset holds HDRS17 (17-item) evaluations. The items cover depressed mood, \
     feelings of guilt, suicidal ideation, insomnia, work impairment, psychomotor agitation \
     or retardation and further symptoms. Higher scores indicate more severe depression.",
    "The goal of this exploration is to surface trends and patterns across visits, drugs and \
     therapies, and to show how symptom severity evolves for each treatment cohort.",
    "For the HDRS17 a total of 0-7 is generally read as within the normal range (clinical \
     remission), while 20 or more (at least moderate severity) is usually required for entry \
     into a clinical trial.",
];

pub fn render_introduction(dataset: &PreparedDataset, preview_rows: usize) -> String {
    let mut out = String::new();
    out.push_str("Introduction\n");
    out.push_str("============\n\n");
    for paragraph in INTRODUCTION {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "Rows read: {}\nRows kept: {}\nRows dropped (missing AGE): {}\n\n",
        dataset.rows_read,
        dataset.len(),
        dataset.rows_dropped
    ));

    let shown = preview_rows.min(dataset.len());
    out.push_str(&format!(
        "Sample of the dataset ({} of {} rows):\n",
        shown,
        dataset.len()
    ));

    let mut header = vec![
        "PID".to_string(),
        "AGE".to_string(),
        "SEX".to_string(),
        "DRUG".to_string(),
        "THERAPY".to_string(),
    ];
    for visit in Visit::all() {
        header.push(format!("{}-TOTAL", visit.label()));
    }
    let mut rows = vec![header];
    for record in dataset.records.iter().take(shown) {
        let mut row = vec![
            record.pid.clone(),
            record.age.to_string(),
            record.sex.to_string(),
            record.drug.clone(),
            record.therapy.clone(),
        ];
        for total in &record.totals {
            row.push(format_opt_f64(*total));
        }
        rows.push(row);
    }
    out.push_str(&render_table(&rows));
    out
}

pub fn render_eda(explore: &ExploreOutput) -> String {
    let mut out = String::new();
    out.push_str("Exploratory Data Analysis\n");
    out.push_str("=========================\n\n");

    out.push_str("Patients by age and sex\n");
    let mut by_age: BTreeMap<u32, Vec<(String, usize)>> = BTreeMap::new();
    for row in &explore.age_sex {
        by_age
            .entry(row.age)
            .or_default()
            .push((row.sex.clone(), row.count));
    }
    let bars: Vec<StackedBar> = by_age
        .into_iter()
        .map(|(age, mut segments)| {
            segments.sort();
            StackedBar {
                label: age.to_string(),
                segments,
            }
        })
        .collect();
    out.push_str(&render_stacked_bars(&bars, BAR_WIDTH));
    out.push('\n');

    out.push_str("Patients by drug and therapy\n");
    let mut by_drug: BTreeMap<&str, Vec<(String, usize)>> = BTreeMap::new();
    for row in &explore.drug_therapy {
        by_drug
            .entry(row.drug.as_str())
            .or_default()
            .push((row.therapy.clone(), row.count));
    }
    let bars: Vec<StackedBar> = by_drug
        .into_iter()
        .map(|(drug, mut segments)| {
            segments.sort();
            StackedBar {
                label: drug.to_string(),
                segments,
            }
        })
        .collect();
    out.push_str(&render_stacked_bars(&bars, BAR_WIDTH));
    out
}

pub fn render_hamd(view: &HamdView<'_>) -> String {
    let mut out = String::new();
    out.push_str("HAMD\n");
    out.push_str("====\n\n");
    out.push_str(&format!("Drug: {}\n", view.cohort.drug));
    out.push_str(&format!(
        "Therapy: {} (available for this drug: {})\n",
        view.cohort.therapy,
        view.therapies.join(", ")
    ));
    out.push_str(&format!("Cohort size: {}\n\n", view.total.cohort_size));

    out.push_str("Total HAMD\n");
    out.push_str("----------\n");
    out.push_str(&render_series(view.total));
    out.push('\n');

    out.push_str(&format!("Sectional HAMD: {}\n", view.item));
    out.push_str("--------------\n");
    out.push_str(&view.description);
    out.push_str("\n\n");
    out.push_str(&render_series(view.subscale));
    out
}

fn render_series(series: &VisitSeries) -> String {
    let mut out = render_interval_chart(series, INTERVAL_WIDTH);
    if series.points.iter().any(|p| p.stats.empty) {
        out.push_str("Visits marked (no data) have no scores for this cohort; their zeros are placeholders.\n");
    }
    out
}

fn render_table(rows: &[Vec<String>]) -> String {
    let n_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; n_cols];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_right(cell, widths[i]))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
