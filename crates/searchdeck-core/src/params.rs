use serde::{Deserialize, Serialize};

pub const DEFAULT_PRE_FILTER_FETCH_K: u32 = 10;
pub const DEFAULT_RETRIEVAL_TOP_K: u32 = 5;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_GENERATION_TOP_K: u32 = 2;
pub const DEFAULT_TOTAL_ATTEMPTS: u32 = 1;

/// One metadata filter row as the operator typed it. Keys are stored bare;
/// the wire quoting happens when the request body is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterEntry {
    pub key: String,
    pub value: String,
}

impl FilterEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("", "")
    }
}

/// Everything one search submission depends on, captured as a single value.
/// Each console invocation owns exactly one of these; there is no second
/// copy of the state to drift from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryParameters {
    pub question: String,
    pub search_service_url: String,
    pub resource_service_url: String,
    pub llm_base_url: String,
    pub llm_key: String,
    pub retrieval_enabled: bool,
    pub index_id: String,
    pub pre_filter_fetch_k: u32,
    pub filter_entries: Vec<FilterEntry>,
    pub top_k: u32,
    pub vector_enabled: bool,
    pub sparse_enabled: bool,
    pub rrf_enabled: bool,
    pub custom_metadata_filter_enabled: bool,
    pub generation_enabled: bool,
    pub model_name: String,
    pub deployment_name: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub generation_top_k: u32,
    pub total_attempts: u32,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            question: String::new(),
            search_service_url: String::new(),
            resource_service_url: String::new(),
            llm_base_url: String::new(),
            llm_key: String::new(),
            retrieval_enabled: true,
            index_id: String::new(),
            pre_filter_fetch_k: DEFAULT_PRE_FILTER_FETCH_K,
            filter_entries: Vec::new(),
            top_k: DEFAULT_RETRIEVAL_TOP_K,
            vector_enabled: true,
            sparse_enabled: true,
            rrf_enabled: true,
            custom_metadata_filter_enabled: true,
            generation_enabled: false,
            model_name: String::new(),
            deployment_name: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            generation_top_k: DEFAULT_GENERATION_TOP_K,
            total_attempts: DEFAULT_TOTAL_ATTEMPTS,
        }
    }
}

impl QueryParameters {
    /// Appends a blank filter row for the operator to fill in.
    pub fn add_filter_entry(&mut self) {
        self.filter_entries.push(FilterEntry::empty());
    }

    /// Removes the filter row at `index`; out-of-range indexes are ignored.
    pub fn remove_filter_entry(&mut self, index: usize) {
        if index < self.filter_entries.len() {
            self.filter_entries.remove(index);
        }
    }
}
