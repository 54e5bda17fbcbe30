use thiserror::Error;

pub mod cache;
pub mod descriptions;
pub mod table;

pub use cache::DatasetCache;
pub use descriptions::{ItemDescriptions, load_item_descriptions};
pub use table::{RawTable, load_table};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("data load error: {0}")]
    DataLoad(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("configuration error: {0}")]
    Config(String),
}

// Tokens the source spreadsheet tooling writes for an empty cell.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
