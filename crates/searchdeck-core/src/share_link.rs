use indexmap::IndexMap;
use thiserror::Error;
use url::form_urlencoded;

use crate::envelope::build_filter_metadata;
use crate::params::{FilterEntry, QueryParameters};
use crate::secret;

/// Route fragment the document screen is reachable under.
pub const DOCUMENT_ROUTE: &str = "/#/document";
/// Filter key the document screen pins to the linked document.
pub const DOC_NAME_FILTER_KEY: &str = "docName";

pub const PARAM_FILE_NAME: &str = "fileName";
pub const PARAM_DOC_NAME: &str = "docName";
pub const PARAM_INDEX_ID: &str = "retrieveIndexId";
pub const PARAM_QUERY: &str = "query";
pub const PARAM_SEARCH_SERVICE_URL: &str = "searchServiceUrl";
pub const PARAM_LLM_BASE_URL: &str = "llmBaseUrl";
pub const PARAM_MODEL_NAME: &str = "generateModelName";
pub const PARAM_DEPLOY_NAME: &str = "generateDeployName";
pub const PARAM_FILTER_METADATA: &str = "retrieveFilterMetadata";
pub const PARAM_EXTRA: &str = "extraParams";
pub const PARAM_VECTOR_ENABLED: &str = "retrieveVectorEnabled";
pub const PARAM_SPARSE_ENABLED: &str = "retrieveSparseEnabled";
pub const PARAM_RRF_ENABLED: &str = "retrieveRrfEnabled";
pub const PARAM_TOP_K: &str = "retrieveTopK";
pub const PARAM_PRE_FILTER_K: &str = "retrieverPreFilterK";
pub const PARAM_RESOURCE_SERVICE_URL: &str = "resourceServiceUrl";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareLinkError {
    #[error("share link carries no query parameters")]
    MissingQuery,
}

/// A parsed document deep link: which file to open, which document it shows,
/// and the query state to rebuild around it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareLink {
    pub file_name: String,
    pub doc_name: String,
    pub params: QueryParameters,
}

impl ShareLink {
    /// Parameter set for the document screen. The linked document's name is
    /// appended as a filter row, even when an equal row already exists, so
    /// follow-up queries stay scoped to that document.
    pub fn document_view_params(&self) -> QueryParameters {
        let mut params = self.params.clone();
        params
            .filter_entries
            .push(FilterEntry::new(DOC_NAME_FILTER_KEY, self.doc_name.clone()));
        params
    }
}

/// Builds the document deep link for one result. Parameter order is part of
/// the link contract, and every value is percent-encoded on the way in.
pub fn build_share_url(
    base_url: &str,
    params: &QueryParameters,
    file_name: &str,
    doc_name: &str,
) -> String {
    let file_base = base_name(file_name);
    let metadata = build_filter_metadata(&params.filter_entries);
    let metadata_json =
        serde_json::to_string(&metadata).unwrap_or_else(|_| "{}".to_string());
    let encoded_key = secret::encode(&params.llm_key);

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair(PARAM_FILE_NAME, file_base);
    query.append_pair(PARAM_DOC_NAME, doc_name);
    query.append_pair(PARAM_INDEX_ID, &params.index_id);
    query.append_pair(PARAM_QUERY, &params.question);
    query.append_pair(PARAM_SEARCH_SERVICE_URL, &params.search_service_url);
    query.append_pair(PARAM_LLM_BASE_URL, &params.llm_base_url);
    query.append_pair(PARAM_MODEL_NAME, &params.model_name);
    query.append_pair(PARAM_DEPLOY_NAME, &params.deployment_name);
    query.append_pair(PARAM_FILTER_METADATA, &metadata_json);
    query.append_pair(PARAM_EXTRA, &encoded_key);
    query.append_pair(PARAM_VECTOR_ENABLED, bool_text(params.vector_enabled));
    query.append_pair(PARAM_SPARSE_ENABLED, bool_text(params.sparse_enabled));
    query.append_pair(PARAM_RRF_ENABLED, bool_text(params.rrf_enabled));
    query.append_pair(PARAM_TOP_K, &params.top_k.to_string());
    query.append_pair(PARAM_PRE_FILTER_K, &params.pre_filter_fetch_k.to_string());
    query.append_pair(PARAM_RESOURCE_SERVICE_URL, &params.resource_service_url);

    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}{DOCUMENT_ROUTE}?{}", query.finish())
}

/// Parses a deep link back into query state. Missing or malformed values
/// fall back to the field's default; fields the link never carries (the
/// generation tuning block) always read as defaults. A path-prefixed file
/// name is reduced to its base name, the same as on the build side.
pub fn parse_share_url(url: &str) -> Result<ShareLink, ShareLinkError> {
    let query = query_string(url).ok_or(ShareLinkError::MissingQuery)?;
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    Ok(parse_share_pairs(&pairs))
}

fn query_string(url: &str) -> Option<&str> {
    let tail = match url.split_once('#') {
        Some((_, fragment)) => fragment,
        None => url,
    };
    let (_, query) = tail.split_once('?')?;
    Some(query)
}

/// Decodes already-split query pairs into a [`ShareLink`].
pub fn parse_share_pairs(pairs: &[(String, String)]) -> ShareLink {
    let defaults = QueryParameters::default();
    let params = QueryParameters {
        question: string_param(pairs, PARAM_QUERY),
        search_service_url: string_param(pairs, PARAM_SEARCH_SERVICE_URL),
        resource_service_url: string_param(pairs, PARAM_RESOURCE_SERVICE_URL),
        llm_base_url: string_param(pairs, PARAM_LLM_BASE_URL),
        llm_key: secret::decode(&string_param(pairs, PARAM_EXTRA)),
        index_id: string_param(pairs, PARAM_INDEX_ID),
        pre_filter_fetch_k: u32_param(pairs, PARAM_PRE_FILTER_K, defaults.pre_filter_fetch_k),
        filter_entries: parse_filter_metadata(&string_param(pairs, PARAM_FILTER_METADATA)),
        top_k: u32_param(pairs, PARAM_TOP_K, defaults.top_k),
        vector_enabled: bool_param(pairs, PARAM_VECTOR_ENABLED, defaults.vector_enabled),
        sparse_enabled: bool_param(pairs, PARAM_SPARSE_ENABLED, defaults.sparse_enabled),
        rrf_enabled: bool_param(pairs, PARAM_RRF_ENABLED, defaults.rrf_enabled),
        model_name: string_param(pairs, PARAM_MODEL_NAME),
        deployment_name: string_param(pairs, PARAM_DEPLOY_NAME),
        ..defaults
    };
    let file_name = string_param(pairs, PARAM_FILE_NAME);
    ShareLink {
        file_name: base_name(&file_name).to_string(),
        doc_name: string_param(pairs, PARAM_DOC_NAME),
        params,
    }
}

/// Decodes the JSON filter map from a link back into editable rows, with
/// the wire quoting stripped from keys. Anything unparseable degrades to an
/// empty row list.
pub fn parse_filter_metadata(raw: &str) -> Vec<FilterEntry> {
    if raw.is_empty() {
        return Vec::new();
    }
    let Ok(metadata) = serde_json::from_str::<IndexMap<String, String>>(raw) else {
        return Vec::new();
    };
    metadata
        .into_iter()
        .map(|(key, value)| FilterEntry::new(key.replace('"', ""), value))
        .collect()
}

/// Last path segment of `name`. Link file names are bare on the build side
/// and when read back; the document flow writes under exactly this name.
fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn first_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn string_param(pairs: &[(String, String)], name: &str) -> String {
    first_value(pairs, name).unwrap_or_default().to_string()
}

fn bool_param(pairs: &[(String, String)], name: &str, default: bool) -> bool {
    match first_value(pairs, name) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

fn u32_param(pairs: &[(String, String)], name: &str, default: u32) -> u32 {
    first_value(pairs, name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
