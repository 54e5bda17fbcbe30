use crate::model::series::VisitSeries;
use crate::report::{format_f64_3, pad_right};

const SEGMENT_GLYPHS: &[char] = &['#', '=', '+', '*', 'o', '%', '@', '~'];

#[derive(Debug, Clone)]
pub struct StackedBar {
    pub label: String,
    pub segments: Vec<(String, usize)>,
}

impl StackedBar {
    pub fn total(&self) -> usize {
        self.segments.iter().map(|(_, c)| c).sum()
    }
}

pub fn render_stacked_bars(bars: &[StackedBar], width: usize) -> String {
    let mut legend: Vec<&str> = Vec::new();
    for bar in bars {
        for (name, _) in &bar.segments {
            if !legend.contains(&name.as_str()) {
                legend.push(name);
            }
        }
    }

    let max_total = bars.iter().map(StackedBar::total).max().unwrap_or(0);
    let label_width = bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let entries: Vec<String> = legend
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", glyph(i), name))
        .collect();
    out.push_str(&format!("Legend: {}\n", entries.join(", ")));

    for bar in bars {
        let mut body = String::new();
        for (name, count) in &bar.segments {
            let idx = legend.iter().position(|l| *l == name.as_str()).unwrap_or(0);
            let len = scaled(*count, max_total, width);
            body.extend(std::iter::repeat_n(glyph(idx), len));
        }
        out.push_str(&format!(
            "{} | {} {}\n",
            pad_right(&bar.label, label_width),
            body,
            bar.total()
        ));
    }
    out
}

pub fn render_interval_chart(series: &VisitSeries, width: usize) -> String {
    let width = width.max(3);
    let measured: Vec<_> = series.points.iter().filter(|p| !p.stats.empty).collect();
    if measured.is_empty() {
        return "(no data for this cohort)\n".to_string();
    }

    let lo = measured
        .iter()
        .map(|p| p.stats.lower)
        .fold(f64::INFINITY, f64::min);
    let hi = measured
        .iter()
        .map(|p| p.stats.upper)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = if hi - lo > 0.0 { hi - lo } else { 1.0 };
    let pos = |x: f64| -> usize {
        let p = ((x - lo) / span * (width - 1) as f64).round();
        (p.max(0.0) as usize).min(width - 1)
    };

    let mut out = String::new();
    for point in &series.points {
        let label = format!("V{}", point.visit);
        let stats = &point.stats;
        if stats.empty {
            out.push_str(&format!("{:<3} |{}| (no data)\n", label, " ".repeat(width)));
            continue;
        }
        let mut row = vec![' '; width];
        let (a, b) = (pos(stats.lower), pos(stats.upper));
        for cell in row.iter_mut().take(b + 1).skip(a) {
            *cell = '-';
        }
        row[a] = '[';
        row[b] = ']';
        row[pos(stats.mean)] = '*';
        out.push_str(&format!(
            "{:<3} |{}| mean {} CI [{}, {}] n={}\n",
            label,
            row.into_iter().collect::<String>(),
            format_f64_3(stats.mean),
            format_f64_3(stats.lower),
            format_f64_3(stats.upper),
            stats.count
        ));
    }
    out.push_str(&format!(
        "    scale {} .. {}\n",
        format_f64_3(lo),
        format_f64_3(hi)
    ));
    out
}

fn glyph(idx: usize) -> char {
    SEGMENT_GLYPHS[idx % SEGMENT_GLYPHS.len()]
}

fn scaled(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let len = (count as f64 * width as f64 / max as f64).round() as usize;
    len.max(1)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/chart.rs"]
mod tests;
