use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::params::{FilterEntry, QueryParameters};

/// Request body for the search endpoint. Field names and nesting follow the
/// service contract, so everything here serializes as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    pub question: String,
    pub retrieval: RetrievalRequest,
    pub generation: GenerationRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalRequest {
    pub enabled: bool,
    pub index_id: String,
    pub pre_filter_fetch_k: u32,
    pub filter_metadata: IndexMap<String, String>,
    pub top_k: u32,
    pub datasource: DatasourceRequest,
    pub hybrid_search: HybridSearchRequest,
    pub custom_metadata_filter: CustomMetadataFilterRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasourceRequest {
    pub vectorindex: IndexToggle,
    pub sparseindex: IndexToggle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexToggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HybridSearchRequest {
    pub rrf: IndexToggle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomMetadataFilterRequest {
    pub enabled: bool,
    pub model_name: String,
    pub deployment_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub enabled: bool,
    pub model_name: String,
    pub deployment_name: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_k_used: u32,
    pub total_attempts: u32,
}

/// Collapses the operator's filter rows into the wire map. Rows with an
/// empty key or value are skipped; surviving keys are wrapped in literal
/// double quotes. Insertion order is kept, and a repeated key keeps its
/// first position while taking the last value.
pub fn build_filter_metadata(entries: &[FilterEntry]) -> IndexMap<String, String> {
    let mut metadata = IndexMap::new();
    for entry in entries {
        if entry.key.is_empty() || entry.value.is_empty() {
            continue;
        }
        metadata.insert(format!("\"{}\"", entry.key), entry.value.clone());
    }
    metadata
}

/// Maps one parameter set onto the request envelope. The custom metadata
/// filter rides on the same model and deployment identity as generation.
pub fn build_request(params: &QueryParameters) -> RequestEnvelope {
    RequestEnvelope {
        question: params.question.clone(),
        retrieval: RetrievalRequest {
            enabled: params.retrieval_enabled,
            index_id: params.index_id.clone(),
            pre_filter_fetch_k: params.pre_filter_fetch_k,
            filter_metadata: build_filter_metadata(&params.filter_entries),
            top_k: params.top_k,
            datasource: DatasourceRequest {
                vectorindex: IndexToggle {
                    enabled: params.vector_enabled,
                },
                sparseindex: IndexToggle {
                    enabled: params.sparse_enabled,
                },
            },
            hybrid_search: HybridSearchRequest {
                rrf: IndexToggle {
                    enabled: params.rrf_enabled,
                },
            },
            custom_metadata_filter: CustomMetadataFilterRequest {
                enabled: params.custom_metadata_filter_enabled,
                model_name: params.model_name.clone(),
                deployment_name: params.deployment_name.clone(),
            },
        },
        generation: GenerationRequest {
            enabled: params.generation_enabled,
            model_name: params.model_name.clone(),
            deployment_name: params.deployment_name.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_k_used: params.generation_top_k,
            total_attempts: params.total_attempts,
        },
    }
}
