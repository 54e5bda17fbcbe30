use serde::Serialize;

use crate::model::series::VisitSeries;
use crate::pipeline::stage4_explore::ExploreOutput;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputMeta,
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eda: Option<ExploreOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hamd: Option<HamdSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub path: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped_missing_age: usize,
    pub item_columns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HamdSummary {
    pub drug: String,
    pub therapy: String,
    pub subscale: String,
    pub cohort_size: usize,
    pub total: SeriesSummary,
    pub sectional: SeriesSummary,
}

/// Visit-aligned sequences; index i is visit i + 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub selector: String,
    pub columns: Vec<String>,
    pub ci_lower: Vec<f64>,
    pub ci_upper: Vec<f64>,
    pub mean: Vec<f64>,
    pub count: Vec<usize>,
    pub empty: Vec<bool>,
}

impl From<&VisitSeries> for SeriesSummary {
    fn from(series: &VisitSeries) -> Self {
        Self {
            selector: series.selector.label(),
            columns: series.points.iter().map(|p| p.column.clone()).collect(),
            ci_lower: series.lower_bounds(),
            ci_upper: series.upper_bounds(),
            mean: series.means(),
            count: series.counts(),
            empty: series.points.iter().map(|p| p.stats.empty).collect(),
        }
    }
}

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
