//! Core pipeline - period derivation, cohorts, aggregation and comparison

mod aggregator;
mod analysis;
mod cohort;
mod compare;
mod filter;
mod periods;
mod stats;
mod types;

pub(crate) use analysis::{AnalysisConfig, AnalysisReport, CohortReport, run_analysis};
pub(crate) use periods::derive_periods;
pub(crate) use types::{
    CohortKind, Dataset, DateWindow, DiffBasis, Period, PeriodSet, Record, Significance,
};
