//! Domain types and the lookup workflows built on the source clients.

pub mod drug;
pub mod report;

pub use drug::DrugEntry;
pub use report::{
    AnalysisResult, CombinedEffect, IndividualDrugAnalysis, InteractionDetail, RiskLevel,
    SideEffect,
};
