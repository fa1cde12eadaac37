//! In-memory reference store.
//!
//! Answers every lookup from owned vectors. Used directly by tests and the
//! CLI, and as the serving half of the JSON-backed store once its files are
//! loaded and validated.

use std::collections::HashSet;

use crate::model::{Association, AssociationRow, Remedy, Section, Symptom};
use crate::store::{AssociationStore, ReferenceStore, StoreError};

/// Immutable reference dataset held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sections: Vec<Section>,
    symptoms: Vec<Symptom>,
    remedies: Vec<Remedy>,
    associations: Vec<Association>,
}

impl MemoryStore {
    pub fn new(
        sections: Vec<Section>,
        symptoms: Vec<Symptom>,
        remedies: Vec<Remedy>,
        associations: Vec<Association>,
    ) -> Self {
        Self {
            sections,
            symptoms,
            remedies,
            associations,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn remedies(&self) -> &[Remedy] {
        &self.remedies
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    fn remedy_by_id(&self, remedy_id: &str) -> Option<&Remedy> {
        self.remedies.iter().find(|r| r.id == remedy_id)
    }
}

impl AssociationStore for MemoryStore {
    async fn fetch_associations(
        &self,
        symptom_ids: &[String],
    ) -> Result<Vec<AssociationRow>, StoreError> {
        let wanted: HashSet<&str> = symptom_ids.iter().map(String::as_str).collect();

        let mut rows = Vec::new();
        for assoc in &self.associations {
            if !wanted.contains(assoc.symptom_id.as_str()) {
                continue;
            }

            let remedy = self.remedy_by_id(&assoc.remedy_id).ok_or_else(|| {
                StoreError::Malformed(format!(
                    "association references unknown remedy: {}",
                    assoc.remedy_id
                ))
            })?;

            rows.push(AssociationRow {
                symptom_id: assoc.symptom_id.clone(),
                remedy_id: assoc.remedy_id.clone(),
                grade: assoc.grade,
                remedy_name: remedy.name.clone(),
                remedy_common_name: remedy.common_name.clone(),
            });
        }

        Ok(rows)
    }
}

impl ReferenceStore for MemoryStore {
    async fn list_sections(&self) -> Result<Vec<Section>, StoreError> {
        let mut sections = self.sections.clone();
        sections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sections)
    }

    async fn symptoms_in_section(&self, section_id: &str) -> Result<Vec<Symptom>, StoreError> {
        let mut symptoms: Vec<Symptom> = self
            .symptoms
            .iter()
            .filter(|s| s.section_id == section_id)
            .cloned()
            .collect();
        symptoms.sort_by(|a, b| a.symptom.cmp(&b.symptom));
        Ok(symptoms)
    }

    async fn search_symptoms(&self, query: &str, limit: usize) -> Result<Vec<Symptom>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .symptoms
            .iter()
            .filter(|s| s.symptom.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_remedies(&self) -> Result<Vec<Remedy>, StoreError> {
        let mut remedies = self.remedies.clone();
        remedies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(remedies)
    }

    async fn get_remedy(&self, remedy_id: &str) -> Result<Option<Remedy>, StoreError> {
        Ok(self.remedy_by_id(remedy_id).cloned())
    }

    async fn search_remedies(&self, query: &str, limit: usize) -> Result<Vec<Remedy>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .remedies
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.common_name
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
