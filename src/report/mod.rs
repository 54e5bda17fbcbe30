pub mod chart;
pub mod json;
pub mod text;

use crate::model::scale::Item;
use crate::model::series::VisitSeries;
use crate::pipeline::stage2_cohort::CohortFilter;

#[derive(Debug, Clone)]
pub struct HamdView<'a> {
    pub cohort: &'a CohortFilter,
    pub therapies: Vec<&'a str>,
    pub total: &'a VisitSeries,
    pub subscale: &'a VisitSeries,
    pub item: Item,
    pub description: String,
}

pub fn format_f64_3(v: f64) -> String {
    format!("{:.3}", v)
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_opt_f64(v: Option<f64>) -> String {
    match v {
        Some(x) if x.fract() == 0.0 => format!("{}", x as i64),
        Some(x) => format_f64_3(x),
        None => "NA".to_string(),
    }
}

/// Strips characters that would break a TSV cell.
pub fn tsv_cell(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

pub fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
