//! Engine runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in
//! multi-threaded runtimes and test harnesses.

use crate::{RepertoryError, RepertoryResult};

/// Maximum number of ranked remedies returned per analysis.
pub const DEFAULT_MAX_RESULTS: usize = 30;

/// Minimum query length for symptom substring search.
pub const MIN_SYMPTOM_QUERY_LEN: usize = 3;

/// Minimum query length for remedy substring search.
pub const MIN_REMEDY_QUERY_LEN: usize = 2;

/// Maximum rows returned by a symptom substring search.
pub const SYMPTOM_SEARCH_LIMIT: usize = 100;

/// Maximum rows returned by a remedy substring search.
pub const REMEDY_SEARCH_LIMIT: usize = 50;

/// Engine configuration resolved at startup.
///
/// The result cap and query-length gates are policy constants of the service,
/// not caller-controlled knobs; they can only be set here, once.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    max_results: usize,
    min_symptom_query_len: usize,
    min_remedy_query_len: usize,
}

impl EngineConfig {
    /// Create a new `EngineConfig` with an explicit result cap.
    pub fn new(max_results: usize) -> RepertoryResult<Self> {
        if max_results == 0 {
            return Err(RepertoryError::InvalidInput(
                "max_results must be at least 1".into(),
            ));
        }

        Ok(Self {
            max_results,
            min_symptom_query_len: MIN_SYMPTOM_QUERY_LEN,
            min_remedy_query_len: MIN_REMEDY_QUERY_LEN,
        })
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn min_symptom_query_len(&self) -> usize {
        self.min_symptom_query_len
    }

    pub fn min_remedy_query_len(&self) -> usize {
        self.min_remedy_query_len
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            min_symptom_query_len: MIN_SYMPTOM_QUERY_LEN,
            min_remedy_query_len: MIN_REMEDY_QUERY_LEN,
        }
    }
}

/// Parse the result cap from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns the default cap.
pub fn max_results_from_env_value(value: Option<String>) -> RepertoryResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_MAX_RESULTS),
        Some(v) => v.parse::<usize>().map_err(|_| {
            RepertoryError::InvalidInput(format!("REPERTORY_MAX_RESULTS is not a number: {v}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_cap() {
        let err = EngineConfig::new(0).expect_err("should reject zero cap");
        assert!(matches!(err, RepertoryError::InvalidInput(msg) if msg.contains("at least 1")));
    }

    #[test]
    fn test_default_uses_policy_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_results(), DEFAULT_MAX_RESULTS);
        assert_eq!(cfg.min_symptom_query_len(), MIN_SYMPTOM_QUERY_LEN);
        assert_eq!(cfg.min_remedy_query_len(), MIN_REMEDY_QUERY_LEN);
    }

    #[test]
    fn test_max_results_from_env_value_defaults_when_unset() {
        assert_eq!(
            max_results_from_env_value(None).unwrap(),
            DEFAULT_MAX_RESULTS
        );
        assert_eq!(
            max_results_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_MAX_RESULTS
        );
    }

    #[test]
    fn test_max_results_from_env_value_parses_number() {
        assert_eq!(max_results_from_env_value(Some("10".into())).unwrap(), 10);
    }

    #[test]
    fn test_max_results_from_env_value_rejects_garbage() {
        assert!(max_results_from_env_value(Some("ten".into())).is_err());
    }
}
