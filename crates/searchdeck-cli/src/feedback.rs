use serde_json::Value;

use searchdeck_core::answer::{Answer, SourceHit, display_label};
use searchdeck_core::params::QueryParameters;
use searchdeck_core::results::FilteredHits;
use searchdeck_core::share_link::build_share_url;
use searchdeck_view::{AnswerPanel, Citation, DocumentPanel, SourceItem, View, ViewMeta};

use crate::resource_api::MediaKind;

const UNNAMED_SOURCE_TITLE: &str = "(unnamed source)";
const SNIPPET_MAX_CHARS: usize = 120;
const REDACTED_KEY: &str = "<redacted>";

/// Assembles the result view for one successful query: the filtered hit
/// rows, the answer panel when the reply carried one, and any filter
/// warning.
pub fn search_view(
    answer: &Answer,
    filtered: &FilteredHits,
    params: &QueryParameters,
    share_base: &str,
    meta: ViewMeta,
) -> View {
    let items = filtered
        .hits
        .iter()
        .map(|hit| hit_to_item(hit, params, share_base))
        .collect();

    let mut view = View::new(items).with_meta(meta);
    if let Some(panel) = answer_panel(answer) {
        view = view.with_answer(panel);
    }
    if let Some(warning) = filtered.warning {
        view = view.with_warning(warning);
    }
    view
}

/// Assembles the document view: the fetched file summary plus the query
/// state reconstructed from the link, so the shell can re-render the form.
pub fn document_view(
    file_name: &str,
    doc_name: &str,
    kind: MediaKind,
    byte_len: u64,
    saved_to: Option<&str>,
    params: &QueryParameters,
    meta: ViewMeta,
) -> View {
    let mut panel = DocumentPanel::new(file_name, doc_name)
        .with_mime(kind.mime())
        .with_image(kind.renders_as_image())
        .with_byte_len(byte_len);
    if let Some(path) = saved_to {
        panel = panel.with_saved_to(path);
    }

    View::new(Vec::new())
        .with_document(panel)
        .with_parameters(parameters_value(params))
        .with_meta(meta)
}

/// Serializes parameters for display. Key material never enters a rendered
/// payload; only the share link carries it, in encoded form.
pub fn parameters_value(params: &QueryParameters) -> Value {
    let mut value = serde_json::to_value(params).unwrap_or(Value::Null);
    if let Some(key) = value.get_mut("llm_key") {
        if key.as_str().is_some_and(|key| !key.is_empty()) {
            *key = Value::String(REDACTED_KEY.to_string());
        }
    }
    value
}

fn hit_to_item(hit: &SourceHit, params: &QueryParameters, share_base: &str) -> SourceItem {
    let doc_name = hit.doc_name().map(ToOwned::to_owned);
    let file_base = hit.file_path.rsplit('/').next().unwrap_or("");

    let title = doc_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            if file_base.is_empty() {
                UNNAMED_SOURCE_TITLE.to_string()
            } else {
                file_base.to_string()
            }
        });

    let mut item = SourceItem::new(title);

    let snippet = if hit.content.trim().is_empty() {
        hit.message.as_deref().unwrap_or("").to_string()
    } else {
        single_line_snippet(&hit.content, SNIPPET_MAX_CHARS)
    };
    if !snippet.is_empty() {
        item = item.with_snippet(snippet);
    }

    if !hit.file_path.is_empty() {
        item = item.with_open_url(build_share_url(
            share_base,
            params,
            &hit.file_path,
            doc_name.as_deref().unwrap_or(""),
        ));
    }
    if let Some(name) = doc_name.filter(|name| !name.is_empty()) {
        item = item.with_doc_name(name);
    }
    if let Some(page) = hit.page_label() {
        item = item.with_page(page);
    }
    if let Some(score) = hit.score_value() {
        item = item.with_score(score);
    }

    item
}

fn answer_panel(answer: &Answer) -> Option<AnswerPanel> {
    let text = if !answer.answer.trim().is_empty() {
        answer.answer.clone()
    } else if !answer.llm_response.response.trim().is_empty() {
        answer.llm_response.response.clone()
    } else {
        return None;
    };

    let mut panel = AnswerPanel::new(text).with_from_cache(answer.llm_response.from_cache);
    if !answer.doc_name.is_empty() {
        panel = panel.with_doc_name(&answer.doc_name);
    }
    if !answer.db_name.is_empty() {
        panel = panel.with_db_name(&answer.db_name);
    }
    if !answer.chunk_id.is_empty() {
        panel = panel.with_chunk_id(&answer.chunk_id);
    }
    if let Some(page) = display_label(&answer.page_num) {
        panel = panel.with_page(page);
    }
    if let Some(segment) = display_label(&answer.segment_num) {
        panel = panel.with_segment(segment);
    }
    if !answer.llm_model_name.is_empty() {
        panel = panel.with_model_name(&answer.llm_model_name);
    }
    if answer.llm_total_attempts > 0 {
        panel = panel.with_total_attempts(answer.llm_total_attempts);
    }
    for source in &answer.source_metadata {
        let mut citation = Citation::new(&source.chunk_id);
        if !source.doc_name.is_empty() {
            citation = citation.with_doc_name(&source.doc_name);
        }
        if !source.bbox_format.is_empty() {
            citation = citation.with_bbox_format(&source.bbox_format);
        }
        if let Some(bbox) = &source.bbox {
            citation = citation.with_bbox(bbox.clone());
        }
        panel = panel.with_citation(citation);
    }

    Some(panel)
}

fn single_line_snippet(input: &str, max_chars: usize) -> String {
    let compact = input.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.chars().count() <= max_chars {
        return compact;
    }

    if max_chars <= 3 {
        return "...".chars().take(max_chars).collect();
    }

    let truncated: String = compact.chars().take(max_chars - 3).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use searchdeck_core::answer::{LlmResponse, SourceMetadata};
    use searchdeck_core::params::FilterEntry;

    use super::*;

    fn fixture_params() -> QueryParameters {
        QueryParameters {
            question: "what is the retention period?".to_string(),
            index_id: "idx-docs".to_string(),
            llm_key: "sk-123".to_string(),
            filter_entries: vec![FilterEntry::new("department", "finance")],
            ..QueryParameters::default()
        }
    }

    fn fixture_hit() -> SourceHit {
        SourceHit {
            file_path: "bucket/2024/policy.pdf".to_string(),
            score: serde_json::json!(0.8124),
            content: "retention period of five years".to_string(),
            meta_data: serde_json::json!({"doc_name": "policy.pdf", "page_no": 12}),
            ..SourceHit::default()
        }
    }

    fn fixture_filtered(hits: Vec<SourceHit>) -> FilteredHits {
        FilteredHits {
            hits,
            warning: None,
        }
    }

    #[test]
    fn maps_hit_fields_onto_the_result_item() {
        let view = search_view(
            &Answer::default(),
            &fixture_filtered(vec![fixture_hit()]),
            &fixture_params(),
            "https://console.example.com",
            ViewMeta::new(),
        );
        let item = view.items.first().expect("expected one item");

        assert_eq!(item.title, "policy.pdf");
        assert_eq!(item.snippet.as_deref(), Some("retention period of five years"));
        assert_eq!(item.doc_name.as_deref(), Some("policy.pdf"));
        assert_eq!(item.page.as_deref(), Some("12"));
        assert_eq!(item.score, Some(0.8124));

        let url = item.open_url.as_deref().expect("item should deep-link");
        assert!(url.starts_with("https://console.example.com/#/document?"));
        assert!(
            url.contains("fileName=policy.pdf"),
            "link should carry the base file name: {url}"
        );
        assert!(url.contains("docName=policy.pdf"), "got {url}");
    }

    #[test]
    fn placeholder_hits_render_without_a_link() {
        let placeholder = SourceHit {
            message: Some("no sparse hits".to_string()),
            ..SourceHit::default()
        };
        let view = search_view(
            &Answer::default(),
            &fixture_filtered(vec![placeholder]),
            &fixture_params(),
            "https://console.example.com",
            ViewMeta::new(),
        );
        let item = view.items.first().expect("expected one item");

        assert_eq!(item.title, UNNAMED_SOURCE_TITLE);
        assert_eq!(item.snippet.as_deref(), Some("no sparse hits"));
        assert!(item.open_url.is_none(), "nothing to open for a placeholder");
        assert!(item.score.is_none());
    }

    #[test]
    fn snippets_are_single_line_and_bounded() {
        let mut hit = fixture_hit();
        hit.content = " line1\nline2\tline3 ".repeat(30);
        let view = search_view(
            &Answer::default(),
            &fixture_filtered(vec![hit]),
            &fixture_params(),
            "",
            ViewMeta::new(),
        );
        let snippet = view.items[0]
            .snippet
            .as_deref()
            .expect("snippet should exist");

        assert!(!snippet.contains('\n'), "snippet should be single-line");
        assert!(!snippet.contains('\t'), "snippet should normalize tabs");
        assert!(
            snippet.chars().count() <= SNIPPET_MAX_CHARS,
            "snippet should not exceed max length"
        );
    }

    #[test]
    fn answer_panel_carries_provenance_and_citations() {
        let answer = Answer {
            answer: "Five years.".to_string(),
            doc_name: "policy.pdf".to_string(),
            chunk_id: "c-17".to_string(),
            page_num: serde_json::json!("12"),
            llm_model_name: "gpt-4".to_string(),
            llm_total_attempts: 1,
            llm_response: LlmResponse {
                response: "Five years.".to_string(),
                from_cache: true,
            },
            source_metadata: vec![SourceMetadata {
                chunk_id: "c-17".to_string(),
                bbox_format: "x1,y1,x2,y2".to_string(),
                bbox: Some(vec![serde_json::json!(1), serde_json::json!(2)]),
                doc_name: "policy.pdf".to_string(),
            }],
            ..Answer::default()
        };

        let view = search_view(
            &answer,
            &fixture_filtered(Vec::new()),
            &fixture_params(),
            "",
            ViewMeta::new(),
        );
        let panel = view.answer.expect("answer panel should be present");

        assert_eq!(panel.text, "Five years.");
        assert_eq!(panel.doc_name.as_deref(), Some("policy.pdf"));
        assert_eq!(panel.page.as_deref(), Some("12"));
        assert_eq!(panel.model_name.as_deref(), Some("gpt-4"));
        assert_eq!(panel.from_cache, Some(true));
        assert_eq!(panel.citations.len(), 1);
        assert_eq!(panel.citations[0].chunk_id, "c-17");
    }

    #[test]
    fn generation_off_replies_have_no_answer_panel() {
        let view = search_view(
            &Answer::default(),
            &fixture_filtered(vec![fixture_hit()]),
            &fixture_params(),
            "",
            ViewMeta::new(),
        );
        assert!(view.answer.is_none(), "blank answers render no panel");
    }

    #[test]
    fn answer_text_falls_back_to_the_llm_response() {
        let answer = Answer {
            llm_response: LlmResponse {
                response: "From the model.".to_string(),
                from_cache: false,
            },
            ..Answer::default()
        };
        let view = search_view(
            &answer,
            &fixture_filtered(Vec::new()),
            &fixture_params(),
            "",
            ViewMeta::new(),
        );

        assert_eq!(
            view.answer.expect("panel should exist").text,
            "From the model."
        );
    }

    #[test]
    fn filter_warnings_surface_in_the_view() {
        let filtered = FilteredHits {
            hits: Vec::new(),
            warning: Some("no index selected"),
        };
        let view = search_view(
            &Answer::default(),
            &filtered,
            &fixture_params(),
            "",
            ViewMeta::new(),
        );

        assert!(view.items.is_empty());
        assert_eq!(view.warning.as_deref(), Some("no index selected"));
    }

    #[test]
    fn document_view_describes_the_fetched_file() {
        let view = document_view(
            "guide.pdf",
            "guide",
            MediaKind::Pdf,
            2048,
            Some("/tmp/guide.pdf"),
            &fixture_params(),
            ViewMeta::new().with_app_version("0.3.1"),
        );
        let panel = view.document.expect("document panel should exist");

        assert_eq!(panel.file_name, "guide.pdf");
        assert_eq!(panel.mime, "application/pdf");
        assert!(!panel.image);
        assert_eq!(panel.byte_len, 2048);
        assert_eq!(panel.saved_to.as_deref(), Some("/tmp/guide.pdf"));
        assert_eq!(
            view.meta.and_then(|meta| meta.app_version),
            Some("0.3.1".to_string())
        );
    }

    #[test]
    fn rendered_parameters_never_expose_key_material() {
        let value = parameters_value(&fixture_params());

        assert_eq!(value["llm_key"], REDACTED_KEY);
        assert_eq!(value["question"], "what is the retention period?");
        assert_eq!(value["filter_entries"][0]["key"], "department");
    }

    #[test]
    fn an_absent_key_is_not_marked_redacted() {
        let params = QueryParameters {
            llm_key: String::new(),
            ..fixture_params()
        };
        assert_eq!(parameters_value(&params)["llm_key"], "");
    }
}
