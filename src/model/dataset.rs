use std::fmt;
use std::path::PathBuf;

use crate::model::columns::ColumnMap;
use crate::model::scale::{ITEM_COUNT, ScoreSelector, VISIT_COUNT, Visit};

pub const PID_COLUMN: &str = "PID";
pub const AGE_COLUMN: &str = "AGE";
pub const SEX_COLUMN: &str = "SEX";
pub const DRUG_COLUMN: &str = "DRUG";
pub const THERAPY_COLUMN: &str = "THERAPY";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    Male,
    Female,
    Unmapped(String),
}

impl Sex {
    pub fn from_code(raw: &str) -> Self {
        match raw {
            "M" => Sex::Male,
            "F" => Sex::Female,
            other => Sex::Unmapped(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Unmapped(raw) => raw,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type VisitItems = [Option<f64>; ITEM_COUNT];

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub pid: String,
    pub age: u32,
    pub sex: Sex,
    pub drug: String,
    pub therapy: String,
    pub items: [VisitItems; VISIT_COUNT],
    pub totals: [Option<f64>; VISIT_COUNT],
}

impl Record {
    pub fn score(&self, visit: Visit, selector: ScoreSelector) -> Option<f64> {
        match selector {
            ScoreSelector::Total => self.totals[visit.index()],
            ScoreSelector::Item(item) => self.items[visit.index()][item.index()],
        }
    }
}

/// Cleaned records plus derived visit totals. Immutable once built.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub source: PathBuf,
    pub column_map: ColumnMap,
    pub records: Vec<Record>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl PreparedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
