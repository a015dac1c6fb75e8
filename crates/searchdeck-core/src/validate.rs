use thiserror::Error;

use crate::params::QueryParameters;

/// A reason a query cannot be submitted. These are operator-input problems,
/// caught before any request leaves the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("index id must not be empty")]
    EmptyIndexId,
    #[error("llm base url must not be empty")]
    EmptyLlmBaseUrl,
    #[error("llm key must not be empty")]
    EmptyLlmKey,
    #[error("search service endpoint must not be empty")]
    EmptySearchServiceUrl,
    #[error("at least one of vector or sparse index must be enabled")]
    NoIndexEnabled,
}

/// Runs the mandatory-field checks in a fixed order and reports the first
/// failure. A passing parameter set is ready to become a request envelope.
pub fn validate_submit(params: &QueryParameters) -> Result<(), ValidationError> {
    if params.question.is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    if params.index_id.is_empty() {
        return Err(ValidationError::EmptyIndexId);
    }
    if params.llm_base_url.is_empty() {
        return Err(ValidationError::EmptyLlmBaseUrl);
    }
    if params.llm_key.is_empty() {
        return Err(ValidationError::EmptyLlmKey);
    }
    if params.search_service_url.is_empty() {
        return Err(ValidationError::EmptySearchServiceUrl);
    }
    if !params.vector_enabled && !params.sparse_enabled {
        return Err(ValidationError::NoIndexEnabled);
    }
    Ok(())
}
