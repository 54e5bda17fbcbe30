mod input;
mod model;
mod pipeline;
mod report;
mod tracing;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::input::{DatasetCache, ItemDescriptions, load_item_descriptions};
use crate::model::scale::{Item, ScoreSelector};
use crate::pipeline::stage2_cohort::{drug_options, resolve_cohort, therapy_options};
use crate::pipeline::stage3_series::compute_series;
use crate::pipeline::stage4_explore::run_stage4;
use crate::pipeline::stage5_report::{Page, Stage5Input, write_reports};
use crate::report::HamdView;

#[derive(Debug, Parser)]
#[command(name = "hamd-explorer", version)]
#[command(about = "Explore HDRS17 (HAMD) rating data: cleaning, cohort trends and confidence bands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prepare the dataset and render the selected pages to an output directory
    Run(RunArgs),
    /// List the drugs and, per drug, the therapies available for selection
    Options(OptionsArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Tabular source (CSV, or TSV for .tsv/.tab/.txt; optionally .gz)
    #[arg(long)]
    input: PathBuf,

    /// Item description file: 17 blank-line separated blocks
    #[arg(long)]
    descriptions: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = PageArg::All)]
    page: PageArg,

    /// Drug to analyse (defaults to the first drug in the data)
    #[arg(long)]
    drug: Option<String>,

    /// Therapy to analyse (defaults to the first therapy of the drug)
    #[arg(long)]
    therapy: Option<String>,

    /// Sub-scale for the sectional chart, HAMD01..HAMD17
    #[arg(long, default_value = "HAMD01")]
    subscale: Item,

    /// Rows shown in the introduction preview
    #[arg(long, default_value_t = 10)]
    preview_rows: usize,
}

#[derive(Debug, Args)]
struct OptionsArgs {
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PageArg {
    Introduction,
    Eda,
    Hamd,
    All,
}

impl From<PageArg> for Page {
    fn from(value: PageArg) -> Self {
        match value {
            PageArg::Introduction => Page::Introduction,
            PageArg::Eda => Page::Eda,
            PageArg::Hamd => Page::Hamd,
            PageArg::All => Page::All,
        }
    }
}

#[derive(Debug, Clone)]
struct RunConfig {
    input: PathBuf,
    descriptions: Option<PathBuf>,
    out_dir: PathBuf,
    page: Page,
    drug: Option<String>,
    therapy: Option<String>,
    subscale: Item,
    preview_rows: usize,
}

impl RunConfig {
    fn from_args(args: RunArgs) -> Result<Self, String> {
        let page = Page::from(args.page);
        if page.includes(Page::Hamd) && args.descriptions.is_none() {
            return Err(format!(
                "--descriptions is required for page {}",
                page.name()
            ));
        }
        Ok(Self {
            input: args.input,
            descriptions: args.descriptions,
            out_dir: args.out,
            page,
            drug: args.drug,
            therapy: args.therapy,
            subscale: args.subscale,
            preview_rows: args.preview_rows,
        })
    }
}

fn main() {
    tracing::init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => RunConfig::from_args(args).and_then(|config| run(&config)),
        Command::Options(args) => list_options(&args),
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<(), String> {
    // Configuration errors surface before any data work.
    let descriptions: Option<ItemDescriptions> =
        match (&config.descriptions, config.page.includes(Page::Hamd)) {
            (Some(path), true) => Some(load_item_descriptions(path).map_err(|e| e.to_string())?),
            _ => None,
        };

    let mut cache = DatasetCache::new();
    let dataset = cache
        .get_or_prepare(&config.input)
        .map_err(|e| e.to_string())?;
    log_cache(&cache);

    let explore = config
        .page
        .includes(Page::Eda)
        .then(|| run_stage4(&dataset));

    let hamd = match &descriptions {
        Some(descriptions) => {
            let cohort = resolve_cohort(
                &dataset,
                config.drug.as_deref(),
                config.therapy.as_deref(),
            )
            .map_err(|e| e.to_string())?;
            let total = compute_series(&dataset, &cohort, ScoreSelector::Total)
                .map_err(|e| e.to_string())?;
            let subscale = compute_series(&dataset, &cohort, ScoreSelector::Item(config.subscale))
                .map_err(|e| e.to_string())?;
            ::tracing::info!(
                drug = %cohort.drug,
                therapy = %cohort.therapy,
                subscale = %config.subscale,
                cohort = total.cohort_size,
                "computed HAMD series"
            );
            Some((cohort, total, subscale, descriptions.describe(config.subscale)))
        }
        None => None,
    };

    let hamd_view = hamd
        .as_ref()
        .map(|(cohort, total, subscale, description)| HamdView {
            cohort,
            therapies: therapy_options(&dataset, &cohort.drug),
            total,
            subscale,
            item: config.subscale,
            description: description.clone(),
        });

    let input = Stage5Input {
        dataset: &dataset,
        page: config.page,
        preview_rows: config.preview_rows,
        explore: explore.as_ref(),
        hamd: hamd_view,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    write_reports(&input, &config.out_dir).map_err(|e| e.to_string())?;

    Ok(())
}

fn list_options(args: &OptionsArgs) -> Result<(), String> {
    let mut cache = DatasetCache::new();
    let dataset = cache.get_or_prepare(&args.input).map_err(|e| e.to_string())?;
    log_cache(&cache);
    print!("{}", render_options(&dataset));
    Ok(())
}

fn log_cache(cache: &DatasetCache) {
    ::tracing::debug!(
        entries = cache.len(),
        hits = cache.hits(),
        misses = cache.misses(),
        "prepared dataset cache"
    );
}

fn render_options(dataset: &model::dataset::PreparedDataset) -> String {
    let drugs = drug_options(dataset);
    let mut out = format!("drugs: {}\n", drugs.len());
    for drug in drugs {
        out.push_str(&format!(
            "  {}: {}\n",
            drug,
            therapy_options(dataset, drug).join(", ")
        ));
    }
    out
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
