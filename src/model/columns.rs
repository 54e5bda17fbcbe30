use crate::input::InputError;
use crate::model::scale::{ITEM_COUNT, Item, VISIT_COUNT, Visit, item_column_name};

/// Source column index for every (visit, item) pair, resolved once from the
/// `V{visit}-HAMD{item:02}` naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    slots: [[Option<usize>; ITEM_COUNT]; VISIT_COUNT],
}

impl ColumnMap {
    pub fn from_header(columns: &[String]) -> Result<Self, InputError> {
        let mut slots = [[None; ITEM_COUNT]; VISIT_COUNT];

        for (idx, name) in columns.iter().enumerate() {
            match parse_item_column(name) {
                Some((visit, item)) => {
                    let slot = &mut slots[visit.index()][item.index()];
                    if let Some(existing) = *slot {
                        return Err(InputError::Schema(format!(
                            "columns {} and {} both resolve to {}",
                            columns[existing],
                            name,
                            item_column_name(visit, item)
                        )));
                    }
                    *slot = Some(idx);
                }
                None => {
                    if looks_like_visit_column(name) {
                        tracing::debug!(column = %name, "visit-like column ignored");
                    }
                }
            }
        }

        for visit in Visit::all() {
            let row = &slots[visit.index()];
            if row.iter().all(|s| s.is_none()) {
                return Err(InputError::Schema(format!(
                    "no HAMD item columns found for visit {}",
                    visit.label()
                )));
            }
            for item in Item::all() {
                if row[item.index()].is_none() {
                    tracing::warn!(
                        column = %item_column_name(visit, item),
                        "item column absent; visit total sums the remaining items"
                    );
                }
            }
        }

        Ok(Self { slots })
    }

    pub fn column(&self, visit: Visit, item: Item) -> Option<usize> {
        self.slots[visit.index()][item.index()]
    }

    pub fn has(&self, visit: Visit, item: Item) -> bool {
        self.column(visit, item).is_some()
    }

    pub fn items_present(&self, visit: Visit) -> usize {
        self.slots[visit.index()]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }

    pub fn n_present(&self) -> usize {
        Visit::all().map(|v| self.items_present(v)).sum()
    }
}

pub fn parse_item_column(name: &str) -> Option<(Visit, Item)> {
    let upper = name.trim().to_ascii_uppercase();
    let rest = upper.strip_prefix('V')?;
    let (visit_part, item_part) = rest.split_once('-')?;
    if visit_part.len() != 1 {
        return None;
    }
    let visit = Visit::new(visit_part.parse().ok()?)?;
    let digits = item_part.strip_prefix("HAMD")?;
    if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let item = Item::new(digits.parse().ok()?)?;
    Some((visit, item))
}

fn looks_like_visit_column(name: &str) -> bool {
    let mut chars = name.trim().chars();
    matches!(chars.next(), Some('V' | 'v')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/columns.rs"]
mod tests;
