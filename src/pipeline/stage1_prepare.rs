use crate::input::{InputError, RawTable, is_missing};
use crate::model::columns::ColumnMap;
use crate::model::dataset::{
    AGE_COLUMN, DRUG_COLUMN, PID_COLUMN, PreparedDataset, Record, SEX_COLUMN, THERAPY_COLUMN,
    Sex, VisitItems,
};
use crate::model::scale::{ITEM_COUNT, Item, VISIT_COUNT, Visit};

pub fn prepare(raw: &RawTable) -> Result<PreparedDataset, InputError> {
    let age_col = raw.require_column(AGE_COLUMN)?;
    let sex_col = raw.require_column(SEX_COLUMN)?;
    let drug_col = raw.require_column(DRUG_COLUMN)?;
    let therapy_col = raw.require_column(THERAPY_COLUMN)?;
    let pid_col = raw.column_index(PID_COLUMN);
    let column_map = ColumnMap::from_header(&raw.columns)?;

    let mut records = Vec::with_capacity(raw.n_rows());
    let mut rows_dropped = 0usize;

    for row in 0..raw.n_rows() {
        // Header occupies line 1.
        let line_no = row + 2;

        let age_raw = raw.cell(row, age_col);
        if is_missing(age_raw) {
            rows_dropped += 1;
            continue;
        }
        let age = coerce_age(age_raw, line_no)?;

        let pid = match pid_col {
            Some(col) => raw.cell(row, col).to_string(),
            None => (row + 1).to_string(),
        };

        let mut items: [VisitItems; VISIT_COUNT] = [[None; ITEM_COUNT]; VISIT_COUNT];
        for visit in Visit::all() {
            for item in Item::all() {
                if let Some(col) = column_map.column(visit, item) {
                    items[visit.index()][item.index()] =
                        parse_score(raw.cell(row, col), &raw.columns[col], line_no)?;
                }
            }
        }

        let mut totals = [None; VISIT_COUNT];
        for visit in Visit::all() {
            totals[visit.index()] = visit_total(&items[visit.index()], &column_map, visit);
        }

        records.push(Record {
            pid,
            age,
            sex: Sex::from_code(raw.cell(row, sex_col)),
            drug: raw.cell(row, drug_col).to_string(),
            therapy: raw.cell(row, therapy_col).to_string(),
            items,
            totals,
        });
    }

    tracing::info!(
        rows_read = raw.n_rows(),
        rows_kept = records.len(),
        rows_dropped_missing_age = rows_dropped,
        item_columns = column_map.n_present(),
        "prepared dataset"
    );

    Ok(PreparedDataset {
        source: raw.source.clone(),
        column_map,
        records,
        rows_read: raw.n_rows(),
        rows_dropped,
    })
}

pub fn coerce_age(raw: &str, line_no: usize) -> Result<u32, InputError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        InputError::DataLoad(format!("line {}: AGE '{}' is not numeric", line_no, raw))
    })?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(InputError::DataLoad(format!(
            "line {}: AGE '{}' is out of range",
            line_no, raw
        )));
    }
    Ok(value.trunc() as u32)
}

pub fn parse_score(raw: &str, column: &str, line_no: usize) -> Result<Option<f64>, InputError> {
    if is_missing(raw) {
        return Ok(None);
    }
    let value: f64 = raw.trim().parse().map_err(|_| {
        InputError::DataLoad(format!(
            "line {}: column {} has non-numeric score '{}'",
            line_no, column, raw
        ))
    })?;
    if !value.is_finite() {
        return Err(InputError::DataLoad(format!(
            "line {}: column {} has non-finite score '{}'",
            line_no, column, raw
        )));
    }
    Ok(Some(value))
}

/// Sum of the visit's mapped item columns. Any missing item value makes the
/// whole total missing; absent columns do not contribute.
pub fn visit_total(items: &VisitItems, column_map: &ColumnMap, visit: Visit) -> Option<f64> {
    let mut total = 0.0;
    for item in Item::all() {
        if !column_map.has(visit, item) {
            continue;
        }
        total += items[item.index()]?;
    }
    Some(total)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_prepare.rs"]
mod tests;
