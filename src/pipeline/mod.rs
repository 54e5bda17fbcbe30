pub mod stage1_prepare;
pub mod stage2_cohort;
pub mod stage3_series;
pub mod stage4_explore;
pub mod stage5_report;
