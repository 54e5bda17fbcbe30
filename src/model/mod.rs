pub mod columns;
pub mod dataset;
pub mod scale;
pub mod series;
