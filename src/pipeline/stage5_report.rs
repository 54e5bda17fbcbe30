use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::dataset::PreparedDataset;
use crate::model::scale::{Item, Visit, item_column_name, total_column_name};
use crate::model::series::VisitSeries;
use crate::pipeline::stage4_explore::ExploreOutput;
use crate::report::json::{HamdSummary, InputMeta, SeriesSummary, SummaryData, ToolMeta, render_summary_json};
use crate::report::text::{render_eda, render_hamd, render_introduction};
use crate::report::{HamdView, format_f64_6, format_opt_f64, tsv_cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Introduction,
    Eda,
    Hamd,
    All,
}

impl Page {
    pub fn includes(self, page: Page) -> bool {
        self == Page::All || self == page
    }

    pub fn name(self) -> &'static str {
        match self {
            Page::Introduction => "introduction",
            Page::Eda => "eda",
            Page::Hamd => "hamd",
            Page::All => "all",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub dataset: &'a PreparedDataset,
    pub page: Page,
    pub preview_rows: usize,
    pub explore: Option<&'a ExploreOutput>,
    pub hamd: Option<HamdView<'a>>,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    if input.page.includes(Page::Introduction) {
        let text = render_introduction(input.dataset, input.preview_rows);
        write_text(&out_dir.join("introduction.txt"), &text)?;
        write_preview_tsv(input.dataset, input.preview_rows, &out_dir.join("preview.tsv"))?;
    }

    if input.page.includes(Page::Eda) {
        if let Some(explore) = input.explore {
            write_age_sex_tsv(explore, &out_dir.join("age_sex_counts.tsv"))?;
            write_drug_therapy_tsv(explore, &out_dir.join("drug_therapy_counts.tsv"))?;
            write_text(&out_dir.join("eda.txt"), &render_eda(explore))?;
        }
    }

    if input.page.includes(Page::Hamd) {
        if let Some(view) = &input.hamd {
            write_series_tsv(view.total, &out_dir.join("hamd_total.tsv"))?;
            write_series_tsv(view.subscale, &out_dir.join("hamd_subscale.tsv"))?;
            write_text(&out_dir.join("hamd.txt"), &render_hamd(view))?;
        }
    }

    let summary = build_summary(input);
    let json = render_summary_json(&summary).map_err(std::io::Error::other)?;
    write_text(&out_dir.join("summary.json"), &json)?;

    tracing::info!(
        out_dir = %out_dir.display(),
        page = input.page.name(),
        "reports written"
    );
    Ok(())
}

pub fn build_summary(input: &Stage5Input<'_>) -> SummaryData {
    let dataset = input.dataset;
    SummaryData {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
        },
        input: InputMeta {
            path: dataset.source.display().to_string(),
            rows_read: dataset.rows_read,
            rows_kept: dataset.len(),
            rows_dropped_missing_age: dataset.rows_dropped,
            item_columns: dataset.column_map.n_present(),
        },
        page: input.page.name().to_string(),
        eda: input
            .explore
            .filter(|_| input.page.includes(Page::Eda))
            .cloned(),
        hamd: input
            .hamd
            .as_ref()
            .filter(|_| input.page.includes(Page::Hamd))
            .map(|view| HamdSummary {
                drug: view.cohort.drug.clone(),
                therapy: view.cohort.therapy.clone(),
                subscale: view.item.label(),
                cohort_size: view.total.cohort_size,
                total: SeriesSummary::from(view.total),
                sectional: SeriesSummary::from(view.subscale),
            }),
    }
}

fn write_preview_tsv(dataset: &PreparedDataset, n_rows: usize, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = vec![
        "PID".to_string(),
        "AGE".to_string(),
        "SEX".to_string(),
        "DRUG".to_string(),
        "THERAPY".to_string(),
    ];
    for visit in Visit::all() {
        for item in Item::all() {
            if dataset.column_map.has(visit, item) {
                header.push(item_column_name(visit, item));
            }
        }
        header.push(total_column_name(visit));
    }
    writeln!(w, "{}", header.join("\t"))?;

    for record in dataset.records.iter().take(n_rows) {
        let mut row = vec![
            tsv_cell(&record.pid),
            record.age.to_string(),
            tsv_cell(record.sex.as_str()),
            tsv_cell(&record.drug),
            tsv_cell(&record.therapy),
        ];
        for visit in Visit::all() {
            for item in Item::all() {
                if dataset.column_map.has(visit, item) {
                    row.push(format_opt_f64(record.items[visit.index()][item.index()]));
                }
            }
            row.push(format_opt_f64(record.totals[visit.index()]));
        }
        writeln!(w, "{}", row.join("\t"))?;
    }
    w.flush()
}

fn write_age_sex_tsv(explore: &ExploreOutput, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "SEX\tAGE\tcount")?;
    for row in &explore.age_sex {
        writeln!(w, "{}\t{}\t{}", tsv_cell(&row.sex), row.age, row.count)?;
    }
    w.flush()
}

fn write_drug_therapy_tsv(explore: &ExploreOutput, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "DRUG\tTHERAPY\tcount")?;
    for row in &explore.drug_therapy {
        writeln!(
            w,
            "{}\t{}\t{}",
            tsv_cell(&row.drug),
            tsv_cell(&row.therapy),
            row.count
        )?;
    }
    w.flush()
}

fn write_series_tsv(series: &VisitSeries, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "visit\tcolumn\tci_lower\tci_upper\tmean\tcount\tempty")?;
    for point in &series.points {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            point.visit,
            point.column,
            format_f64_6(point.stats.lower),
            format_f64_6(point.stats.upper),
            format_f64_6(point.stats.mean),
            point.stats.count,
            point.stats.empty
        )?;
    }
    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
