//! Repertorization engine: evidence aggregation, scoring and ranking.
//!
//! One analysis call is a pure pipeline: validate the selection, fetch the
//! matching associations in a single batched lookup, accumulate evidence per
//! remedy, then rank and truncate. Nothing here survives the call; candidate
//! accumulators are built fresh each time and converted into the immutable
//! result, so concurrent calls share no mutable state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::model::{AnalysisResult, MatchedSymptom, RankedCandidate, RemedyRef};
use crate::selection::SymptomSelection;
use crate::store::AssociationStore;
use crate::RepertoryResult;

/// Per-remedy evidence accumulated during one analysis call.
///
/// `first_seen` records the order in which remedies first appeared in the
/// fetched rows. The accumulator map is unordered hashing, so this rank is
/// re-imposed as an explicit tertiary sort key rather than relying on any
/// incidental iteration order.
struct CandidateAccumulator {
    remedy: RemedyRef,
    total_score: u32,
    symptoms: Vec<MatchedSymptom>,
    first_seen: usize,
}

/// Ranks candidate remedies against a symptom selection.
///
/// Stateless apart from the configuration and store handles; safe to clone
/// into concurrent request handlers.
pub struct AnalysisService<S> {
    cfg: Arc<EngineConfig>,
    store: Arc<S>,
}

impl<S> Clone for AnalysisService<S> {
    fn clone(&self) -> Self {
        Self {
            cfg: self.cfg.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: AssociationStore> AnalysisService<S> {
    pub fn new(cfg: Arc<EngineConfig>, store: Arc<S>) -> Self {
        Self { cfg, store }
    }

    /// Analyses a symptom selection and returns the ranked remedy list.
    ///
    /// Ranking is by distinct symptoms matched (descending), then total
    /// score (descending), then first appearance in the evidence. A remedy
    /// matching more of the selection outranks one scoring deeper on fewer
    /// symptoms. The list is truncated to the configured cap.
    ///
    /// # Errors
    /// * `RepertoryError::InvalidInput` - the selection is empty; no lookup
    ///   is performed.
    /// * `RepertoryError::UpstreamFailure` - the batched association lookup
    ///   failed; the whole analysis aborts rather than returning a partial
    ///   ranking.
    pub async fn analyze<T: AsRef<str>>(&self, symptom_ids: &[T]) -> RepertoryResult<AnalysisResult> {
        let selection =
            SymptomSelection::new(symptom_ids.iter().map(|id| id.as_ref().to_string()))?;

        let rows = self.store.fetch_associations(selection.ids()).await?;
        tracing::debug!(
            selected = selection.count(),
            rows = rows.len(),
            "fetched association evidence"
        );

        let mut by_remedy: HashMap<String, CandidateAccumulator> = HashMap::new();
        for row in rows {
            // A misbehaving store must not widen the selection.
            if !selection.contains(&row.symptom_id) {
                continue;
            }

            let first_seen = by_remedy.len();
            let acc = by_remedy
                .entry(row.remedy_id.clone())
                .or_insert_with(|| CandidateAccumulator {
                    remedy: RemedyRef {
                        id: row.remedy_id.clone(),
                        name: row.remedy_name.clone(),
                        common_name: row.remedy_common_name.clone(),
                    },
                    total_score: 0,
                    symptoms: Vec::new(),
                    first_seen,
                });

            // At most one grade exists per (symptom, remedy) pair; a repeat
            // row is the same association re-sent and earns no extra credit.
            if acc.symptoms.iter().any(|m| m.symptom_id == row.symptom_id) {
                continue;
            }

            acc.total_score += u32::from(row.grade.value());
            acc.symptoms.push(MatchedSymptom {
                symptom_id: row.symptom_id,
                grade: row.grade,
            });
        }

        let n = selection.count();
        let mut candidates: Vec<CandidateAccumulator> = by_remedy.into_values().collect();
        candidates.sort_by(|a, b| {
            b.symptoms
                .len()
                .cmp(&a.symptoms.len())
                .then_with(|| b.total_score.cmp(&a.total_score))
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        candidates.truncate(self.cfg.max_results());

        let results: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|acc| {
                let symptom_count = acc.symptoms.len();
                RankedCandidate {
                    remedy: acc.remedy,
                    total_score: acc.total_score,
                    symptom_count,
                    coverage: symptom_count as f64 / n as f64 * 100.0,
                    symptoms: acc.symptoms,
                }
            })
            .collect();

        Ok(AnalysisResult {
            total_remedies: results.len(),
            total_symptoms: n,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Association, AssociationRow, Remedy, Section, Symptom};
    use crate::store::{MemoryStore, StoreError};
    use crate::RepertoryError;
    use repertory_types::Grade;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap()
    }

    fn assoc(symptom_id: &str, remedy_id: &str, value: u8) -> Association {
        Association {
            symptom_id: symptom_id.into(),
            remedy_id: remedy_id.into(),
            grade: grade(value),
        }
    }

    fn remedy(id: &str, name: &str) -> Remedy {
        Remedy {
            id: id.into(),
            name: name.into(),
            common_name: None,
            description: None,
        }
    }

    /// The worked reference dataset: {(S1,R1,3), (S2,R1,2), (S1,R2,4), (S3,R3,1)}.
    fn reference_store() -> MemoryStore {
        MemoryStore::new(
            vec![Section {
                id: "sec".into(),
                name: "Mind".into(),
            }],
            vec!["s1", "s2", "s3"]
                .into_iter()
                .map(|id| Symptom {
                    id: id.into(),
                    symptom: format!("rubric {id}"),
                    section_id: "sec".into(),
                })
                .collect(),
            vec![
                remedy("r1", "Arsenicum album"),
                remedy("r2", "Belladonna"),
                remedy("r3", "Sulphur"),
            ],
            vec![
                assoc("s1", "r1", 3),
                assoc("s2", "r1", 2),
                assoc("s1", "r2", 4),
                assoc("s3", "r3", 1),
            ],
        )
    }

    fn service(store: MemoryStore) -> AnalysisService<MemoryStore> {
        AnalysisService::new(Arc::new(EngineConfig::default()), Arc::new(store))
    }

    /// Store wrapper that counts batched lookups.
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl AssociationStore for CountingStore {
        async fn fetch_associations(
            &self,
            symptom_ids: &[String],
        ) -> Result<Vec<AssociationRow>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_associations(symptom_ids).await
        }
    }

    /// Store whose lookup always fails.
    struct UnreachableStore;

    impl AssociationStore for UnreachableStore {
        async fn fetch_associations(
            &self,
            _symptom_ids: &[String],
        ) -> Result<Vec<AssociationRow>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_analyze_worked_example() {
        let result = service(reference_store())
            .analyze(&["s1", "s2"])
            .await
            .unwrap();

        assert_eq!(result.total_symptoms, 2);
        assert_eq!(result.total_remedies, 2);
        assert_eq!(result.results.len(), 2);

        let r1 = &result.results[0];
        assert_eq!(r1.remedy.id, "r1");
        assert_eq!(r1.symptom_count, 2);
        assert_eq!(r1.total_score, 5);
        assert_eq!(r1.coverage, 100.0);

        let r2 = &result.results[1];
        assert_eq!(r2.remedy.id, "r2");
        assert_eq!(r2.symptom_count, 1);
        assert_eq!(r2.total_score, 4);
        assert_eq!(r2.coverage, 50.0);

        // r3 matches nothing in the selection and must be absent.
        assert!(result.results.iter().all(|c| c.remedy.id != "r3"));
    }

    #[tokio::test]
    async fn test_analyze_duplicate_ids_equal_deduplicated_input() {
        let svc = service(reference_store());
        let with_dupes = svc.analyze(&["s1", "s1", "s2"]).await.unwrap();
        let deduped = svc.analyze(&["s1", "s2"]).await.unwrap();

        assert_eq!(with_dupes, deduped);
        assert_eq!(with_dupes.total_symptoms, 2);
    }

    #[tokio::test]
    async fn test_analyze_unknown_symptom_yields_empty_result() {
        let result = service(reference_store()).analyze(&["s9"]).await.unwrap();

        assert!(result.results.is_empty());
        assert_eq!(result.total_symptoms, 1);
        assert_eq!(result.total_remedies, 0);
    }

    #[tokio::test]
    async fn test_analyze_unknown_ids_mixed_with_known_do_not_error() {
        let result = service(reference_store())
            .analyze(&["s1", "s9", "s2"])
            .await
            .unwrap();

        assert_eq!(result.total_symptoms, 3);
        let r1 = &result.results[0];
        assert_eq!(r1.symptom_count, 2);
        // s9 contributes no evidence but still counts toward N.
        assert!((r1.coverage - 2.0 / 3.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_empty_selection_performs_no_lookup() {
        let store = Arc::new(CountingStore {
            inner: reference_store(),
            calls: AtomicUsize::new(0),
        });
        let svc = AnalysisService::new(Arc::new(EngineConfig::default()), store.clone());

        let err = svc
            .analyze::<&str>(&[])
            .await
            .expect_err("empty selection should be rejected");
        assert!(matches!(err, RepertoryError::InvalidInput(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_performs_exactly_one_batched_lookup() {
        let store = Arc::new(CountingStore {
            inner: reference_store(),
            calls: AtomicUsize::new(0),
        });
        let svc = AnalysisService::new(Arc::new(EngineConfig::default()), store.clone());

        svc.analyze(&["s1", "s2", "s3"]).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_store_failure_aborts_whole_analysis() {
        let svc = AnalysisService::new(Arc::new(EngineConfig::default()), Arc::new(UnreachableStore));

        let err = svc
            .analyze(&["s1"])
            .await
            .expect_err("store failure should propagate");
        assert!(matches!(
            err,
            RepertoryError::UpstreamFailure(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_duplicate_upstream_row_earns_no_extra_credit() {
        // Same (s1, r1) association delivered twice.
        let store = MemoryStore::new(
            Vec::new(),
            Vec::new(),
            vec![remedy("r1", "Arsenicum album")],
            vec![
                assoc("s1", "r1", 3),
                assoc("s1", "r1", 3),
                assoc("s2", "r1", 2),
            ],
        );

        let result = service(store).analyze(&["s1", "s2"]).await.unwrap();
        let r1 = &result.results[0];
        assert_eq!(r1.symptom_count, 2);
        assert_eq!(r1.total_score, 5);
    }

    #[tokio::test]
    async fn test_analyze_score_breaks_symptom_count_ties() {
        let store = MemoryStore::new(
            Vec::new(),
            Vec::new(),
            vec![remedy("weak", "Weak"), remedy("strong", "Strong")],
            vec![assoc("s1", "weak", 1), assoc("s1", "strong", 4)],
        );

        let result = service(store).analyze(&["s1"]).await.unwrap();
        let ids: Vec<&str> = result.results.iter().map(|c| c.remedy.id.as_str()).collect();
        assert_eq!(ids, ["strong", "weak"]);
    }

    #[tokio::test]
    async fn test_analyze_full_ties_keep_first_seen_order() {
        // Identical count and score; order must follow first appearance in
        // the fetched evidence, which MemoryStore yields in data order.
        let remedies: Vec<Remedy> = (0..8).map(|i| remedy(&format!("r{i}"), &format!("Remedy {i}"))).collect();
        let associations: Vec<Association> =
            (0..8).map(|i| assoc("s1", &format!("r{i}"), 2)).collect();
        let store = MemoryStore::new(Vec::new(), Vec::new(), remedies, associations);

        let result = service(store).analyze(&["s1"]).await.unwrap();
        let ids: Vec<String> = result.results.iter().map(|c| c.remedy.id.clone()).collect();
        let expected: Vec<String> = (0..8).map(|i| format!("r{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_analyze_truncates_to_configured_cap() {
        let remedies: Vec<Remedy> = (0..40).map(|i| remedy(&format!("r{i}"), &format!("Remedy {i}"))).collect();
        let associations: Vec<Association> =
            (0..40).map(|i| assoc("s1", &format!("r{i}"), 1)).collect();
        let store = MemoryStore::new(Vec::new(), Vec::new(), remedies, associations);

        let result = service(store).analyze(&["s1"]).await.unwrap();
        assert_eq!(result.results.len(), 30);
        assert_eq!(result.total_remedies, 30);
    }

    #[tokio::test]
    async fn test_analyze_ordering_invariants_hold() {
        let result = service(reference_store())
            .analyze(&["s1", "s2", "s3"])
            .await
            .unwrap();
        let n = result.total_symptoms;

        for window in result.results.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            assert!(a.symptom_count >= b.symptom_count);
            if a.symptom_count == b.symptom_count {
                assert!(a.total_score >= b.total_score);
            }
        }
        for candidate in &result.results {
            assert!(candidate.symptom_count <= n);
            assert!((0.0..=100.0).contains(&candidate.coverage));
        }
    }
}
