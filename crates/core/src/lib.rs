//! # Repertory Core
//!
//! Core repertorization logic for the repertory service.
//!
//! This crate contains pure computation over reference data supplied by an
//! association store:
//! - Symptom selection intake (validation and de-duplication)
//! - Evidence aggregation over symptom-remedy associations
//! - Scoring, ranking and truncation of remedy candidates
//!
//! **No API concerns**: HTTP routing, status codes and OpenAPI documentation
//! belong in `api-rest`. The engine holds no stored state of its own; every
//! analysis call is independent and deterministic given its inputs.

pub mod config;
pub mod engine;
pub mod model;
pub mod selection;
pub mod store;

pub use config::EngineConfig;
pub use engine::AnalysisService;
pub use model::{
    AnalysisResult, Association, AssociationRow, MatchedSymptom, RankedCandidate, Remedy,
    RemedyRef, Section, Symptom,
};
pub use selection::SymptomSelection;
pub use store::{AssociationStore, ReferenceStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RepertoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("association lookup failed: {0}")]
    UpstreamFailure(#[from] StoreError),
}

pub type RepertoryResult<T> = std::result::Result<T, RepertoryError>;
