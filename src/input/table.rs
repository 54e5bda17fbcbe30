use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;

#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, InputError> {
        self.column_index(name).ok_or_else(|| {
            InputError::Schema(format!(
                "required column {} is absent from {}",
                name,
                self.source.display()
            ))
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

pub fn load_table(path: &Path) -> Result<RawTable, InputError> {
    let reader = open_maybe_gz(path)?;
    let delimiter = delimiter_for(path);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| InputError::DataLoad(format!("{}: {e}", path.display())))?
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(InputError::DataLoad(format!(
            "{}: header row is empty",
            path.display()
        )));
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for name in &columns {
        if !name.is_empty() && !seen.insert(name.as_str()) {
            return Err(InputError::Schema(format!(
                "{}: duplicate column {}",
                path.display(),
                name
            )));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| {
            InputError::DataLoad(format!("{} (record {}): {e}", path.display(), idx + 1))
        })?;
        if record.len() > columns.len() {
            tracing::warn!(
                line = idx + 2,
                extra = record.len() - columns.len(),
                "row has more fields than the header; extra fields ignored"
            );
        }
        let mut row = Vec::with_capacity(columns.len());
        for col in 0..columns.len() {
            row.push(record.get(col).unwrap_or("").to_string());
        }
        rows.push(row);
    }

    tracing::info!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "loaded source table"
    );

    Ok(RawTable {
        source: path.to_path_buf(),
        columns,
        rows,
    })
}

pub fn delimiter_for(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".tab") || name.ends_with(".txt") {
        b'\t'
    } else {
        b','
    }
}
