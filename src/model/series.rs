use crate::model::scale::ScoreSelector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitStats {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Set when no values were available; the zeros are a placeholder,
    /// not a measurement.
    pub empty: bool,
}

impl VisitStats {
    pub fn empty_sentinel() -> Self {
        Self {
            mean: 0.0,
            lower: 0.0,
            upper: 0.0,
            count: 0,
            empty: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitPoint {
    pub visit: u8,
    pub column: String,
    pub stats: VisitStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitSeries {
    pub selector: ScoreSelector,
    pub drug: String,
    pub therapy: String,
    pub cohort_size: usize,
    pub points: Vec<VisitPoint>,
}

impl VisitSeries {
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.stats.lower).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.stats.upper).collect()
    }

    pub fn means(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.stats.mean).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.stats.count).collect()
    }
}
