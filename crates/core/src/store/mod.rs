//! Collaborator boundary for repertory reference data.
//!
//! The engine never owns stored state; it consumes reference data through the
//! traits below. `AssociationStore` is the narrow seam the engine itself
//! needs (one batched lookup per analysis). `ReferenceStore` is the wider
//! browse/search surface used by the REST layer and the CLI.
//!
//! Trait methods return `Send` futures so a remote store fits the same seam
//! and handlers remain spawnable on a multi-threaded runtime.

pub mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use crate::model::{AssociationRow, Remedy, Section, Symptom};

/// Failures raised by a store at lookup time.
///
/// Any of these abort the whole analysis; the engine never returns a partial
/// ranking built from a failed lookup.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("association store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed reference data: {0}")]
    Malformed(String),
}

/// Batched symptom-to-remedy evidence lookup.
pub trait AssociationStore: Send + Sync {
    /// Retrieves every association whose symptom identifier is in
    /// `symptom_ids`, in one call.
    ///
    /// Implementations must accept the full identifier set at once; the
    /// engine never issues one lookup per symptom. Identifiers with no
    /// matching symptom record simply produce no rows.
    fn fetch_associations(
        &self,
        symptom_ids: &[String],
    ) -> impl Future<Output = Result<Vec<AssociationRow>, StoreError>> + Send;
}

/// Read-only browse and search surface over the repertory reference data.
pub trait ReferenceStore: Send + Sync {
    /// All repertory sections, ordered by name.
    fn list_sections(&self) -> impl Future<Output = Result<Vec<Section>, StoreError>> + Send;

    /// Symptoms belonging to one section, ordered by rubric text.
    fn symptoms_in_section(
        &self,
        section_id: &str,
    ) -> impl Future<Output = Result<Vec<Symptom>, StoreError>> + Send;

    /// Case-insensitive substring search over rubric text, capped at `limit`.
    fn search_symptoms(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Symptom>, StoreError>> + Send;

    /// All remedies, ordered by name.
    fn list_remedies(&self) -> impl Future<Output = Result<Vec<Remedy>, StoreError>> + Send;

    /// A single remedy by identifier, if present.
    fn get_remedy(
        &self,
        remedy_id: &str,
    ) -> impl Future<Output = Result<Option<Remedy>, StoreError>> + Send;

    /// Case-insensitive substring search over remedy name and common name,
    /// capped at `limit`.
    fn search_remedies(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Remedy>, StoreError>> + Send;
}
