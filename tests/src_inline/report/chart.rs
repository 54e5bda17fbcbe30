use super::*;
use crate::model::scale::ScoreSelector;
use crate::model::series::{VisitPoint, VisitStats};

fn series(stats: Vec<VisitStats>) -> VisitSeries {
    VisitSeries {
        selector: ScoreSelector::Total,
        drug: "A".to_string(),
        therapy: "CBT".to_string(),
        cohort_size: 3,
        points: stats
            .into_iter()
            .enumerate()
            .map(|(i, stats)| VisitPoint {
                visit: i as u8 + 1,
                column: format!("V{}-HAMD-TOTAL", i + 1),
                stats,
            })
            .collect(),
    }
}

fn measured(mean: f64, margin: f64, count: usize) -> VisitStats {
    VisitStats {
        mean,
        lower: mean - margin,
        upper: mean + margin,
        count,
        empty: false,
    }
}

#[test]
fn test_stacked_bars_scale_to_width() {
    let bars = vec![
        StackedBar {
            label: "30".to_string(),
            segments: vec![("Female".to_string(), 2), ("Male".to_string(), 2)],
        },
        StackedBar {
            label: "45".to_string(),
            segments: vec![("Male".to_string(), 1)],
        },
    ];
    let out = render_stacked_bars(&bars, 8);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Legend: # Female, = Male");
    assert_eq!(lines[1], "30 | ####==== 4");
    assert_eq!(lines[2], "45 | == 1");
}

#[test]
fn test_small_counts_stay_visible() {
    let bars = vec![
        StackedBar {
            label: "a".to_string(),
            segments: vec![("x".to_string(), 1000)],
        },
        StackedBar {
            label: "b".to_string(),
            segments: vec![("x".to_string(), 1)],
        },
    ];
    let out = render_stacked_bars(&bars, 10);
    assert!(out.contains("b | # 1"));
}

#[test]
fn test_interval_chart_marks_bounds_and_mean() {
    let s = series(vec![measured(10.0, 2.0, 3), measured(14.0, 0.0, 1), VisitStats::empty_sentinel()]);
    let out = render_interval_chart(&s, 11);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("V1  |[--*---]   | mean 10.000"));
    assert!(lines[1].contains("*| mean 14.000 CI [14.000, 14.000] n=1"));
    assert!(lines[2].ends_with("(no data)"));
    assert_eq!(lines[3], "    scale 8.000 .. 14.000");
}

#[test]
fn test_interval_chart_without_data() {
    let s = series(vec![VisitStats::empty_sentinel(); 9]);
    assert_eq!(render_interval_chart(&s, 20), "(no data for this cohort)\n");
}
