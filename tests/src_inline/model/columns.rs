use super::*;

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn full_header() -> Vec<String> {
    let mut out = header(&["AGE", "SEX"]);
    for visit in Visit::all() {
        for item in Item::all() {
            out.push(item_column_name(visit, item));
        }
    }
    out
}

#[test]
fn test_parse_item_column() {
    let (visit, item) = parse_item_column("V3-HAMD07").unwrap();
    assert_eq!((visit.number(), item.number()), (3, 7));
    assert!(parse_item_column(" v9-hamd17 ").is_some());
    assert!(parse_item_column("V1-HAMD-TOTAL").is_none());
    assert!(parse_item_column("V10-HAMD01").is_none());
    assert!(parse_item_column("V1-HAMD1").is_none());
    assert!(parse_item_column("V1-HAMD18").is_none());
    assert!(parse_item_column("V0-HAMD01").is_none());
    assert!(parse_item_column("AGE").is_none());
}

#[test]
fn test_map_resolves_every_pair() {
    let cols = full_header();
    let map = ColumnMap::from_header(&cols).unwrap();
    assert_eq!(map.n_present(), VISIT_COUNT * ITEM_COUNT);
    let v2 = Visit::new(2).unwrap();
    let i5 = Item::new(5).unwrap();
    let idx = map.column(v2, i5).unwrap();
    assert_eq!(cols[idx], "V2-HAMD05");
}

#[test]
fn test_duplicate_resolution_is_schema_error() {
    let mut cols = full_header();
    cols.push("v2-hamd05".to_string());
    let err = ColumnMap::from_header(&cols).unwrap_err();
    assert!(matches!(err, InputError::Schema(_)));
}

#[test]
fn test_partial_visits() {
    let cols: Vec<String> = full_header()
        .into_iter()
        .filter(|c| c != "V5-HAMD03" && c != "V5-HAMD04")
        .collect();
    let map = ColumnMap::from_header(&cols).unwrap();
    let v5 = Visit::new(5).unwrap();
    assert_eq!(map.items_present(v5), ITEM_COUNT - 2);
    assert!(!map.has(v5, Item::new(3).unwrap()));

    let err = ColumnMap::from_header(&header(&["AGE", "V1-HAMD01"])).unwrap_err();
    assert!(err.to_string().contains("V2"));
}
