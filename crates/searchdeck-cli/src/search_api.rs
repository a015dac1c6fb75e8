use thiserror::Error;

use searchdeck_core::answer::{Answer, SearchReply};
use searchdeck_core::envelope::RequestEnvelope;

pub const SEARCH_ROUTE: &str = "/api/v1/inference/search";
pub const SUCCESS_RESPONSE_CDE: i64 = 200;

/// Per-request credentials forwarded to the generation backend. These ride
/// as headers on every search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub llm_base_url: String,
    pub llm_key: String,
}

/// A successful query: the first answer plus the reply bookkeeping the view
/// footer shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub answer: Answer,
    pub timestamp: String,
    pub response_time_in_secs: f64,
}

pub fn submit_query(
    envelope: &RequestEnvelope,
    auth: &AuthHeaders,
    base_url: &str,
) -> Result<SearchOutcome, SearchApiError> {
    let client = reqwest::blocking::Client::new();

    let mut request = client.post(search_endpoint(base_url)).json(envelope);
    for (name, value) in build_headers(auth) {
        request = request.header(name, value);
    }

    let response = request
        .send()
        .map_err(|source| SearchApiError::Transport { source })?;

    let status_code = response.status().as_u16();
    let body = response
        .text()
        .map_err(|source| SearchApiError::Transport { source })?;

    parse_search_response(status_code, &body)
}

/// Joins the search route onto the configured base, tolerating one trailing
/// slash on the base.
pub fn search_endpoint(base_url: &str) -> String {
    format!("{}{SEARCH_ROUTE}", normalize_base_url(base_url))
}

pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

/// Baseline header set for a search call: JSON in and out, plus the llm
/// credential pair the service forwards downstream.
pub fn build_headers(auth: &AuthHeaders) -> Vec<(&'static str, String)> {
    vec![
        ("accept", "application/json".to_string()),
        ("api-endpoint", auth.llm_base_url.clone()),
        ("api-key", auth.llm_key.clone()),
        ("Content-Type", "application/json".to_string()),
    ]
}

pub fn parse_search_response(
    status_code: u16,
    body: &str,
) -> Result<SearchOutcome, SearchApiError> {
    if !(200..=299).contains(&status_code) {
        let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {status_code}"));
        return Err(SearchApiError::Http {
            status: status_code,
            message,
        });
    }

    let reply: SearchReply =
        serde_json::from_str(body).map_err(SearchApiError::InvalidResponse)?;

    if reply.response_cde != SUCCESS_RESPONSE_CDE {
        return Err(SearchApiError::Rejected {
            code: reply.response_cde,
            message: reply.response_msg,
        });
    }

    let answer = reply
        .response
        .map(|set| set.answers)
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(SearchApiError::NoAnswers)?;

    Ok(SearchOutcome {
        answer,
        timestamp: reply.timestamp,
        response_time_in_secs: reply.response_time_in_secs,
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    first_non_empty_string(&[
        value.get("responseMsg").and_then(serde_json::Value::as_str),
        value.get("message").and_then(serde_json::Value::as_str),
        value.get("detail").and_then(serde_json::Value::as_str),
        value.get("error").and_then(serde_json::Value::as_str),
    ])
}

fn first_non_empty_string(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[derive(Debug, Error)]
pub enum SearchApiError {
    #[error("search request failed")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("search api error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("search service rejected the query ({code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("search response contained no answers")]
    NoAnswers,
    #[error("invalid search api response")]
    InvalidResponse(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_success_body() -> &'static str {
        r#"{
          "response": {
            "answers": [
              {
                "doc_name": "policy.pdf",
                "answer": "Five years.",
                "top_k_list": [
                  {"vectordb": [{"file_path": "docs/policy.pdf", "score": 0.8, "content": "x", "meta_data": {}}]}
                ]
              }
            ]
          },
          "responseCde": 200,
          "responseMsg": "success",
          "timestamp": "2024-05-02 10:11:12",
          "responseTimeInSecs": 1.42
        }"#
    }

    #[test]
    fn search_api_endpoint_appends_the_route_once() {
        assert_eq!(
            search_endpoint("https://search.example.com"),
            "https://search.example.com/api/v1/inference/search"
        );
        assert_eq!(
            search_endpoint("https://search.example.com/"),
            "https://search.example.com/api/v1/inference/search",
            "one trailing slash is absorbed"
        );
    }

    #[test]
    fn search_api_headers_carry_the_credential_pair() {
        let headers = build_headers(&AuthHeaders {
            llm_base_url: "https://llm.example.com".to_string(),
            llm_key: "sk-123".to_string(),
        });

        assert!(
            headers.contains(&("accept", "application/json".to_string())),
            "accept header should request JSON"
        );
        assert!(
            headers.contains(&("Content-Type", "application/json".to_string())),
            "body is always JSON"
        );
        assert!(
            headers.contains(&("api-endpoint", "https://llm.example.com".to_string())),
            "llm base url rides the api-endpoint header"
        );
        assert!(
            headers.contains(&("api-key", "sk-123".to_string())),
            "llm key rides the api-key header"
        );
    }

    #[test]
    fn search_api_parses_a_successful_reply() {
        let outcome =
            parse_search_response(200, fixture_success_body()).expect("reply should parse");

        assert_eq!(outcome.answer.doc_name, "policy.pdf");
        assert_eq!(outcome.answer.answer, "Five years.");
        assert_eq!(outcome.timestamp, "2024-05-02 10:11:12");
        assert_eq!(outcome.response_time_in_secs, 1.42);
    }

    #[test]
    fn search_api_treats_in_body_rejection_as_failure() {
        let body = r#"{
          "response": null,
          "responseCde": 999,
          "responseMsg": "index not found"
        }"#;

        let err = parse_search_response(200, body).expect_err("rejection should fail");
        match err {
            SearchApiError::Rejected { code, message } => {
                assert_eq!(code, 999);
                assert_eq!(message, "index not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_api_reports_empty_answer_lists() {
        let body = r#"{
          "response": {"answers": []},
          "responseCde": 200,
          "responseMsg": "success"
        }"#;

        let err = parse_search_response(200, body).expect_err("no answers should fail");
        assert!(matches!(err, SearchApiError::NoAnswers));
    }

    #[test]
    fn search_api_surfaces_http_error_detail() {
        let body = r#"{"detail": "index id missing"}"#;

        let err = parse_search_response(422, body).expect_err("non-2xx should fail");
        match err {
            SearchApiError::Http { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "index id missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_api_prefers_the_service_message_field() {
        let body = r#"{"responseMsg": "backend offline", "detail": "ignored"}"#;

        let err = parse_search_response(500, body).expect_err("non-2xx should fail");
        match err {
            SearchApiError::Http { message, .. } => assert_eq!(message, "backend offline"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_api_falls_back_to_the_status_code() {
        let err = parse_search_response(502, "<html>bad gateway</html>")
            .expect_err("non-2xx should fail");
        match err {
            SearchApiError::Http { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_api_rejects_invalid_success_json() {
        let err = parse_search_response(200, "not-json").expect_err("invalid JSON should fail");
        assert!(matches!(err, SearchApiError::InvalidResponse(_)));
    }
}
