//! The two interchangeable analysis back ends behind one contract.

mod database;
mod severity;
mod structured;

pub use database::DatabaseAnalyzer;
pub use severity::{classify_severity, extract_symptom};
pub use structured::StructuredAnalyzer;

pub use crate::sources::gemini::{DEFAULT_GEMINI_MODEL, GeminiConfig};

use async_trait::async_trait;

use crate::entities::{AnalysisResult, DrugEntry};
use crate::error::MedcheckError;

/// Shared contract for the analysis back ends.
///
/// Implementations take a snapshot of the drug roster and produce one
/// immutable [`AnalysisResult`]; transport, format, and empty-payload
/// failures propagate to the caller, which owns presentation and retry.
#[async_trait]
pub trait InteractionAnalyzer: Send + Sync {
    async fn analyze(&self, drugs: &[DrugEntry]) -> Result<AnalysisResult, MedcheckError>;
}
