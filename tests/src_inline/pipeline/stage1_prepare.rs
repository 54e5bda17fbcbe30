use std::path::PathBuf;

use super::*;
use crate::model::scale::{ScoreSelector, item_column_name};

fn base_header() -> Vec<String> {
    ["PID", "AGE", "SEX", "DRUG", "THERAPY"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn full_header() -> Vec<String> {
    let mut header = base_header();
    for visit in Visit::all() {
        for item in Item::all() {
            header.push(item_column_name(visit, item));
        }
    }
    header
}

// Score for (visit, item) = visit number, so each visit total is 17 * visit.
fn scored_row(header: &[String], pid: &str, age: &str, sex: &str) -> Vec<String> {
    header
        .iter()
        .map(|name| match name.as_str() {
            "PID" => pid.to_string(),
            "AGE" => age.to_string(),
            "SEX" => sex.to_string(),
            "DRUG" => "DrugA".to_string(),
            "THERAPY" => "CBT".to_string(),
            other => match crate::model::columns::parse_item_column(other) {
                Some((visit, _)) => visit.number().to_string(),
                None => "note".to_string(),
            },
        })
        .collect()
}

fn table(columns: Vec<String>, rows: Vec<Vec<String>>) -> RawTable {
    RawTable {
        source: PathBuf::from("memory.csv"),
        columns,
        rows,
    }
}

fn set_cell(table: &mut RawTable, row: usize, column: &str, value: &str) {
    let col = table.column_index(column).unwrap();
    table.rows[row][col] = value.to_string();
}

#[test]
fn test_drops_rows_with_missing_age() {
    let header = full_header();
    let rows = vec![
        scored_row(&header, "P1", "30", "M"),
        scored_row(&header, "P2", "", "F"),
        scored_row(&header, "P3", "NaN", "F"),
        scored_row(&header, "P4", "NA", "M"),
        scored_row(&header, "P5", "61", "F"),
    ];
    let prepared = prepare(&table(header, rows)).unwrap();
    assert_eq!(prepared.rows_read, 5);
    assert_eq!(prepared.rows_dropped, 3);
    assert_eq!(prepared.len(), 2);
    let pids: Vec<&str> = prepared.records.iter().map(|r| r.pid.as_str()).collect();
    assert_eq!(pids, vec!["P1", "P5"]);
}

#[test]
fn test_age_is_truncated_to_integer() {
    let header = full_header();
    let rows = vec![
        scored_row(&header, "P1", "34.0", "M"),
        scored_row(&header, "P2", "34.7", "M"),
        scored_row(&header, "P3", " 0 ", "M"),
    ];
    let prepared = prepare(&table(header, rows)).unwrap();
    let ages: Vec<u32> = prepared.records.iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![34, 34, 0]);
}

#[test]
fn test_invalid_age_is_data_load_error() {
    let header = full_header();
    for bad in ["abc", "-3"] {
        let rows = vec![scored_row(&header, "P1", bad, "M")];
        let err = prepare(&table(header.clone(), rows)).unwrap_err();
        assert!(matches!(err, InputError::DataLoad(_)), "{bad}: {err}");
    }
}

#[test]
fn test_sex_codes_are_mapped_or_passed_through() {
    let header = full_header();
    let rows = vec![
        scored_row(&header, "P1", "30", "M"),
        scored_row(&header, "P2", "30", "F"),
        scored_row(&header, "P3", "30", "X"),
        scored_row(&header, "P4", "30", "Female"),
    ];
    let prepared = prepare(&table(header, rows)).unwrap();
    let sexes: Vec<&str> = prepared.records.iter().map(|r| r.sex.as_str()).collect();
    assert_eq!(sexes, vec!["Male", "Female", "X", "Female"]);
    assert_eq!(prepared.records[2].sex, Sex::Unmapped("X".to_string()));
    assert_eq!(prepared.records[3].sex, Sex::Unmapped("Female".to_string()));
}

#[test]
fn test_visit_totals_equal_item_sums() {
    let header = full_header();
    let mut raw = table(header.clone(), vec![scored_row(&header, "P1", "30", "M")]);
    set_cell(&mut raw, 0, "V2-HAMD05", "4.5");
    let prepared = prepare(&raw).unwrap();
    let record = &prepared.records[0];
    for visit in Visit::all() {
        let expected: f64 = Item::all()
            .map(|item| record.items[visit.index()][item.index()].unwrap())
            .sum();
        assert_eq!(record.totals[visit.index()], Some(expected));
        assert_eq!(record.score(visit, ScoreSelector::Total), Some(expected));
    }
    assert_eq!(record.totals[0], Some(17.0));
    assert_eq!(record.totals[1], Some(16.0 * 2.0 + 4.5));
    assert_eq!(record.totals[8], Some(17.0 * 9.0));
}

#[test]
fn test_missing_item_propagates_to_visit_total() {
    let header = full_header();
    let mut raw = table(header.clone(), vec![scored_row(&header, "P1", "30", "M")]);
    set_cell(&mut raw, 0, "V3-HAMD11", "");
    let prepared = prepare(&raw).unwrap();
    let record = &prepared.records[0];
    let v3 = Visit::new(3).unwrap();
    let i11 = Item::new(11).unwrap();
    assert_eq!(record.items[v3.index()][i11.index()], None);
    assert_eq!(record.totals[v3.index()], None);
    assert_eq!(record.totals[1], Some(34.0));
    assert_eq!(record.totals[3], Some(68.0));
}

#[test]
fn test_non_numeric_score_is_data_load_error() {
    let header = full_header();
    let mut raw = table(header.clone(), vec![scored_row(&header, "P1", "30", "M")]);
    set_cell(&mut raw, 0, "V1-HAMD01", "severe");
    let err = prepare(&raw).unwrap_err();
    assert!(err.to_string().contains("V1-HAMD01"));
    assert!(matches!(err, InputError::DataLoad(_)));
}

#[test]
fn test_non_finite_score_is_data_load_error() {
    let header = full_header();
    for bad in ["inf", "-Infinity", "NAN"] {
        let mut raw = table(header.clone(), vec![scored_row(&header, "P1", "30", "M")]);
        set_cell(&mut raw, 0, "V1-HAMD03", bad);
        let err = prepare(&raw).unwrap_err();
        assert!(matches!(err, InputError::DataLoad(_)), "{bad}: {err}");
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("V1-HAMD03"));
    }
}

#[test]
fn test_missing_drug_and_therapy_pass_through() {
    let header = full_header();
    let mut raw = table(
        header.clone(),
        vec![
            scored_row(&header, "P1", "30", "M"),
            scored_row(&header, "P2", "31", "F"),
        ],
    );
    set_cell(&mut raw, 0, "DRUG", "");
    set_cell(&mut raw, 1, "THERAPY", "NA");
    let prepared = prepare(&raw).unwrap();
    assert_eq!(prepared.len(), 2);
    assert_eq!(prepared.records[0].drug, "");
    assert_eq!(prepared.records[1].therapy, "NA");
}

#[test]
fn test_missing_required_column_is_schema_error() {
    let header: Vec<String> = full_header()
        .into_iter()
        .filter(|c| c != "THERAPY")
        .collect();
    let rows = vec![scored_row(&header, "P1", "30", "M")];
    let err = prepare(&table(header, rows)).unwrap_err();
    assert!(matches!(err, InputError::Schema(_)));
}

#[test]
fn test_visit_without_item_columns_is_schema_error() {
    let header: Vec<String> = full_header()
        .into_iter()
        .filter(|c| !c.starts_with("V7-"))
        .collect();
    let rows = vec![scored_row(&header, "P1", "30", "M")];
    let err = prepare(&table(header, rows)).unwrap_err();
    assert!(err.to_string().contains("V7"));
}

#[test]
fn test_absent_item_column_is_skipped_in_total() {
    let header: Vec<String> = full_header()
        .into_iter()
        .filter(|c| c != "V1-HAMD17")
        .collect();
    let rows = vec![scored_row(&header, "P1", "30", "M")];
    let prepared = prepare(&table(header, rows)).unwrap();
    assert_eq!(prepared.records[0].totals[0], Some(16.0));
    assert_eq!(prepared.records[0].totals[1], Some(34.0));
    assert_eq!(prepared.column_map.n_present(), 9 * 17 - 1);
}

#[test]
fn test_unrelated_visit_like_columns_are_ignored() {
    let mut header = full_header();
    header.push("V1-COMMENT".to_string());
    header.push("V1-HAMD-TOTAL".to_string());
    let rows = vec![scored_row(&header, "P1", "30", "M")];
    let prepared = prepare(&table(header, rows)).unwrap();
    assert_eq!(prepared.records[0].totals[0], Some(17.0));
}

#[test]
fn test_pid_falls_back_to_row_number() {
    let header: Vec<String> = full_header().into_iter().filter(|c| c != "PID").collect();
    let rows = vec![
        scored_row(&header, "", "", "M"),
        scored_row(&header, "", "30", "M"),
    ];
    let prepared = prepare(&table(header, rows)).unwrap();
    assert_eq!(prepared.records[0].pid, "2");
}

#[test]
fn test_raw_table_is_not_mutated() {
    let header = full_header();
    let raw = table(header.clone(), vec![scored_row(&header, "P1", "30", "M")]);
    let before = raw.rows.clone();
    let _ = prepare(&raw).unwrap();
    assert_eq!(raw.rows, before);
    assert_eq!(raw.columns, header);
}
