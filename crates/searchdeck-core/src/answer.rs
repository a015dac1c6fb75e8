use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level reply from the search endpoint. `response_cde` is the in-body
/// verdict; an HTTP 200 with a non-success code is still a failed query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchReply {
    #[serde(default)]
    pub response: Option<AnswerSet>,
    #[serde(rename = "responseCde")]
    pub response_cde: i64,
    #[serde(rename = "responseMsg", default)]
    pub response_msg: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "responseTimeInSecs", default)]
    pub response_time_in_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AnswerSet {
    pub answers: Vec<Answer>,
}

/// One answer record. The console renders the first one; everything loose in
/// the upstream contract (string-or-number fields, placeholder empties) stays
/// as `Value` until display time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Answer {
    pub db_name: String,
    pub doc_name: String,
    pub answer: String,
    pub chunk_id: String,
    pub page_num: Value,
    pub segment_num: Value,
    pub source_metadata: Vec<SourceMetadata>,
    pub top_k: i64,
    pub top_k_list: Vec<ResultBucket>,
    pub top_k_aggregated: i64,
    pub llm_model_name: String,
    pub llm_total_attempts: i64,
    pub llm_response: LlmResponse,
    pub llm_prompt: LlmPrompt,
    pub version: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SourceMetadata {
    pub chunk_id: String,
    pub bbox_format: String,
    pub bbox: Option<Vec<Value>>,
    pub doc_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LlmResponse {
    pub response: String,
    pub from_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LlmPrompt {
    pub prompt_template: String,
    pub context: String,
    pub question: String,
    pub parameters: PromptParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PromptParameters {
    pub temperature: f64,
}

/// One ranked slot holding parallel hit lists per retrieval source. Any of
/// the three lists may be absent in the reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResultBucket {
    pub vectordb: Vec<SourceHit>,
    pub sparseindex: Vec<SourceHit>,
    pub rrf: Vec<SourceHit>,
}

/// One retrieved chunk. `score` and `meta_data` arrive as empty strings when
/// the upstream store had nothing to report, so both stay untyped here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SourceHit {
    pub file_path: String,
    pub score: Value,
    pub min_distance: Value,
    pub max_distance: Value,
    pub content: String,
    pub meta_data: Value,
    pub message: Option<String>,
}

impl SourceHit {
    /// Numeric score when the reply carried one.
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_f64()
    }

    pub fn doc_name(&self) -> Option<&str> {
        self.meta_data.get("doc_name")?.as_str()
    }

    /// Page number rendered for display; the reply uses both numbers and
    /// strings for this field.
    pub fn page_label(&self) -> Option<String> {
        display_label(self.meta_data.get("page_no")?)
    }
}

/// Renders a string-or-number JSON field for display. Other shapes yield
/// nothing rather than leaking raw JSON into the view.
pub fn display_label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
