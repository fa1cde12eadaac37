//! # Repertory Store
//!
//! File-backed reference store for the repertory service.
//!
//! Reference data lives as four JSON files under a data directory:
//! `sections.json`, `symptoms.json`, `remedies.json` and
//! `associations.json`. The whole dataset is loaded and cross-checked once
//! at startup; afterwards every lookup is answered from memory. Reference
//! data is immutable, so nothing is ever written back.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use repertory_core::model::{Association, AssociationRow, Remedy, Section, Symptom};
use repertory_core::store::{AssociationStore, MemoryStore, ReferenceStore, StoreError};
use serde::de::DeserializeOwned;

/// File names expected under the data directory.
pub const SECTIONS_FILE: &str = "sections.json";
pub const SYMPTOMS_FILE: &str = "symptoms.json";
pub const REMEDIES_FILE: &str = "remedies.json";
pub const ASSOCIATIONS_FILE: &str = "associations.json";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read reference file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse reference file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid reference data: {0}")]
    Validation(String),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Reference store loaded from JSON files.
///
/// Wraps an in-memory store built from the validated files; the trait
/// implementations delegate to it.
#[derive(Debug, Clone)]
pub struct JsonStore {
    inner: MemoryStore,
}

impl JsonStore {
    /// Loads and validates the reference dataset under `data_dir`.
    ///
    /// # Errors
    /// Fails if any file is missing or unreadable, fails to parse (including
    /// out-of-scale grades), or the dataset is internally inconsistent:
    /// duplicate identifiers, symptoms referencing unknown sections, or
    /// associations referencing unknown symptoms/remedies or repeating a
    /// (symptom, remedy) pair.
    pub fn load(data_dir: &Path) -> LoadResult<Self> {
        let sections: Vec<Section> = read_reference_file(&data_dir.join(SECTIONS_FILE))?;
        let symptoms: Vec<Symptom> = read_reference_file(&data_dir.join(SYMPTOMS_FILE))?;
        let remedies: Vec<Remedy> = read_reference_file(&data_dir.join(REMEDIES_FILE))?;
        let associations: Vec<Association> =
            read_reference_file(&data_dir.join(ASSOCIATIONS_FILE))?;

        validate(&sections, &symptoms, &remedies, &associations)?;

        tracing::info!(
            sections = sections.len(),
            symptoms = symptoms.len(),
            remedies = remedies.len(),
            associations = associations.len(),
            "loaded repertory reference data from {}",
            data_dir.display()
        );

        Ok(Self {
            inner: MemoryStore::new(sections, symptoms, remedies, associations),
        })
    }
}

fn read_reference_file<T: DeserializeOwned>(path: &Path) -> LoadResult<Vec<T>> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(
    sections: &[Section],
    symptoms: &[Symptom],
    remedies: &[Remedy],
    associations: &[Association],
) -> LoadResult<()> {
    let mut section_ids = HashSet::new();
    for section in sections {
        if !section_ids.insert(section.id.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate section id: {}",
                section.id
            )));
        }
    }

    let mut symptom_ids = HashSet::new();
    for symptom in symptoms {
        if !symptom_ids.insert(symptom.id.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate symptom id: {}",
                symptom.id
            )));
        }
        if !section_ids.contains(symptom.section_id.as_str()) {
            return Err(LoadError::Validation(format!(
                "symptom {} references unknown section: {}",
                symptom.id, symptom.section_id
            )));
        }
    }

    let mut remedy_ids = HashSet::new();
    for remedy in remedies {
        if !remedy_ids.insert(remedy.id.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate remedy id: {}",
                remedy.id
            )));
        }
    }

    let mut pairs = HashSet::new();
    for assoc in associations {
        if !symptom_ids.contains(assoc.symptom_id.as_str()) {
            return Err(LoadError::Validation(format!(
                "association references unknown symptom: {}",
                assoc.symptom_id
            )));
        }
        if !remedy_ids.contains(assoc.remedy_id.as_str()) {
            return Err(LoadError::Validation(format!(
                "association references unknown remedy: {}",
                assoc.remedy_id
            )));
        }
        if !pairs.insert((assoc.symptom_id.as_str(), assoc.remedy_id.as_str())) {
            return Err(LoadError::Validation(format!(
                "duplicate association for symptom {} and remedy {}",
                assoc.symptom_id, assoc.remedy_id
            )));
        }
    }

    Ok(())
}

impl AssociationStore for JsonStore {
    async fn fetch_associations(
        &self,
        symptom_ids: &[String],
    ) -> Result<Vec<AssociationRow>, StoreError> {
        self.inner.fetch_associations(symptom_ids).await
    }
}

impl ReferenceStore for JsonStore {
    async fn list_sections(&self) -> Result<Vec<Section>, StoreError> {
        self.inner.list_sections().await
    }

    async fn symptoms_in_section(&self, section_id: &str) -> Result<Vec<Symptom>, StoreError> {
        self.inner.symptoms_in_section(section_id).await
    }

    async fn search_symptoms(&self, query: &str, limit: usize) -> Result<Vec<Symptom>, StoreError> {
        self.inner.search_symptoms(query, limit).await
    }

    async fn list_remedies(&self) -> Result<Vec<Remedy>, StoreError> {
        self.inner.list_remedies().await
    }

    async fn get_remedy(&self, remedy_id: &str) -> Result<Option<Remedy>, StoreError> {
        self.inner.get_remedy(remedy_id).await
    }

    async fn search_remedies(&self, query: &str, limit: usize) -> Result<Vec<Remedy>, StoreError> {
        self.inner.search_remedies(query, limit).await
    }
}
