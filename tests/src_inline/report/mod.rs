use super::*;

#[test]
fn test_format_opt_f64() {
    assert_eq!(format_opt_f64(Some(17.0)), "17");
    assert_eq!(format_opt_f64(Some(4.5)), "4.500");
    assert_eq!(format_opt_f64(None), "NA");
}

#[test]
fn test_fixed_precision() {
    assert_eq!(format_f64_3(9.47358), "9.474");
    assert_eq!(format_f64_6(0.0), "0.000000");
}

#[test]
fn test_tsv_cell_strips_separators() {
    assert_eq!(tsv_cell("a\tb\nc"), "a b c");
    assert_eq!(tsv_cell("plain"), "plain");
}

#[test]
fn test_pad_right() {
    assert_eq!(pad_right("ab", 4), "ab  ");
    assert_eq!(pad_right("abcdef", 4), "abcdef");
}
