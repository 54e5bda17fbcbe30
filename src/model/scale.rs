use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const VISIT_COUNT: usize = 9;
pub const ITEM_COUNT: usize = 17;

// Standard normal critical value for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Visit(u8);

impl Visit {
    pub fn new(number: u8) -> Option<Self> {
        if (1..=VISIT_COUNT as u8).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Visit> {
        (1..=VISIT_COUNT as u8).map(Visit)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn label(self) -> String {
        format!("V{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item(u8);

impl Item {
    pub fn new(number: u8) -> Option<Self> {
        if (1..=ITEM_COUNT as u8).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Item> {
        (1..=ITEM_COUNT as u8).map(Item)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HAMD{:02}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sub-scale '{0}' (expected TOTAL or HAMD01..HAMD17)")]
pub struct UnknownSelector(pub String);

impl FromStr for Item {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let digits = upper.strip_prefix("HAMD").unwrap_or(&upper);
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(UnknownSelector(s.to_string()));
        }
        digits
            .parse::<u8>()
            .ok()
            .and_then(Item::new)
            .ok_or_else(|| UnknownSelector(s.to_string()))
    }
}

/// Which score a visit series is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreSelector {
    Total,
    Item(Item),
}

impl ScoreSelector {
    pub fn label(self) -> String {
        match self {
            ScoreSelector::Total => "TOTAL".to_string(),
            ScoreSelector::Item(item) => item.label(),
        }
    }

    pub fn column_name(self, visit: Visit) -> String {
        match self {
            ScoreSelector::Total => total_column_name(visit),
            ScoreSelector::Item(item) => item_column_name(visit, item),
        }
    }
}

impl FromStr for ScoreSelector {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("TOTAL") {
            return Ok(ScoreSelector::Total);
        }
        s.parse::<Item>().map(ScoreSelector::Item)
    }
}

pub fn item_column_name(visit: Visit, item: Item) -> String {
    format!("V{}-HAMD{:02}", visit.number(), item.number())
}

pub fn total_column_name(visit: Visit) -> String {
    format!("V{}-HAMD-TOTAL", visit.number())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/scale.rs"]
mod tests;
