//! Shared domain and wire types for the repertory service.
//!
//! Reference data (sections, symptoms, remedies, associations) is immutable
//! and read-only to the engine. The analysis types at the bottom of this file
//! are the REST response shapes, so they carry `utoipa` schema derives
//! alongside `serde`.

use repertory_types::Grade;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A repertory chapter grouping related symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Section {
    pub id: String,
    pub name: String,
}

/// A discrete clinical observation from the repertory vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Symptom {
    pub id: String,
    /// Descriptive rubric text.
    pub symptom: String,
    pub section_id: String,
}

/// A candidate treatment with a known profile of associated symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Remedy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A (symptom, remedy, grade) triple from the reference data.
///
/// At most one grade exists per (symptom, remedy) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub symptom_id: String,
    pub remedy_id: String,
    pub grade: Grade,
}

/// One row of evidence returned by a batched association lookup.
///
/// The remedy name columns are denormalised onto the row so the engine can
/// shape its output without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRow {
    pub symptom_id: String,
    pub remedy_id: String,
    pub grade: Grade,
    pub remedy_name: String,
    pub remedy_common_name: Option<String>,
}

/// Identifying fields of a remedy as carried in a ranked result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RemedyRef {
    pub id: String,
    pub name: String,
    pub common_name: Option<String>,
}

/// One selected symptom matched by a remedy, with its association grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchedSymptom {
    pub symptom_id: String,
    #[schema(value_type = u8)]
    pub grade: Grade,
}

/// A remedy with its aggregated evidence against one symptom selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankedCandidate {
    pub remedy: RemedyRef,
    /// Sum of grades over the matched associations.
    pub total_score: u32,
    /// Number of distinct selected symptoms this remedy matches.
    pub symptom_count: usize,
    /// Percentage of the de-duplicated selection matched, in `[0, 100]`.
    pub coverage: f64,
    pub symptoms: Vec<MatchedSymptom>,
}

/// Ranked output of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub results: Vec<RankedCandidate>,
    /// De-duplicated size of the caller's symptom selection.
    pub total_symptoms: usize,
    /// Number of remedies returned, after truncation.
    pub total_remedies: usize,
}
