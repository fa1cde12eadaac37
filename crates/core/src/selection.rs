//! Symptom selection intake.

use std::collections::HashSet;

use crate::{RepertoryError, RepertoryResult};

/// A validated, de-duplicated set of selected symptom identifiers.
///
/// Construction fails on an empty selection. Duplicate identifiers are
/// collapsed while preserving first-seen order; the surviving order is what
/// the engine's tie-break ultimately falls back on, so it must be stable.
///
/// Identifiers are opaque to the engine. An identifier with no matching
/// symptom record is *not* rejected here — it simply contributes no evidence
/// downstream.
#[derive(Debug, Clone)]
pub struct SymptomSelection {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl SymptomSelection {
    /// Builds a selection from the caller-supplied identifier sequence.
    ///
    /// # Errors
    /// Returns `RepertoryError::InvalidInput` if the sequence is empty.
    pub fn new<I, T>(symptom_ids: I) -> RepertoryResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut ids = Vec::new();
        let mut seen = HashSet::new();

        for id in symptom_ids {
            let id = id.into();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }

        if ids.is_empty() {
            return Err(RepertoryError::InvalidInput(
                "no symptoms provided".into(),
            ));
        }

        Ok(Self { ids, seen })
    }

    /// Identifiers in first-seen order, duplicates removed.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// De-duplicated selection size `N`.
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, symptom_id: &str) -> bool {
        self.seen.contains(symptom_id)
    }
}
