use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One render-ready payload per console invocation. The presentation shell
/// consumes this JSON verbatim; nothing here is wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct View {
    pub items: Vec<SourceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ViewMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Transient completion line the shell shows once and discards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl View {
    pub fn new(items: Vec<SourceItem>) -> Self {
        Self {
            items,
            answer: None,
            document: None,
            meta: None,
            parameters: None,
            notice: None,
            warning: None,
        }
    }

    pub fn with_answer(mut self, answer: AnswerPanel) -> Self {
        self.answer = Some(answer);
        self
    }

    pub fn with_document(mut self, document: DocumentPanel) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_meta(mut self, meta: ViewMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One retrieved chunk row in the results list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SourceItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: None,
            open_url: None,
            doc_name: None,
            page: None,
            score: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_open_url(mut self, open_url: impl Into<String>) -> Self {
        self.open_url = Some(open_url.into());
        self
    }

    pub fn with_doc_name(mut self, doc_name: impl Into<String>) -> Self {
        self.doc_name = Some(doc_name.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Generated answer plus the provenance the answering model reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerPanel {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_attempts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl AnswerPanel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc_name: None,
            db_name: None,
            chunk_id: None,
            page: None,
            segment: None,
            model_name: None,
            total_attempts: None,
            from_cache: None,
            citations: Vec::new(),
        }
    }

    pub fn with_doc_name(mut self, doc_name: impl Into<String>) -> Self {
        self.doc_name = Some(doc_name.into());
        self
    }

    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = Some(db_name.into());
        self
    }

    pub fn with_chunk_id(mut self, chunk_id: impl Into<String>) -> Self {
        self.chunk_id = Some(chunk_id.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_total_attempts(mut self, total_attempts: i64) -> Self {
        self.total_attempts = Some(total_attempts);
        self
    }

    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = Some(from_cache);
        self
    }

    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citations.push(citation);
        self
    }
}

/// Pointer from the answer back into a source document region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub chunk_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<Value>>,
}

impl Citation {
    pub fn new(chunk_id: impl Into<String>) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            doc_name: None,
            bbox_format: None,
            bbox: None,
        }
    }

    pub fn with_doc_name(mut self, doc_name: impl Into<String>) -> Self {
        self.doc_name = Some(doc_name.into());
        self
    }

    pub fn with_bbox_format(mut self, bbox_format: impl Into<String>) -> Self {
        self.bbox_format = Some(bbox_format.into());
        self
    }

    pub fn with_bbox(mut self, bbox: Vec<Value>) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// Fetched document summary for the document screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentPanel {
    pub file_name: String,
    pub doc_name: String,
    pub mime: String,
    pub image: bool,
    pub byte_len: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

impl DocumentPanel {
    pub fn new(file_name: impl Into<String>, doc_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            doc_name: doc_name.into(),
            mime: String::new(),
            image: false,
            byte_len: 0,
            saved_to: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn with_image(mut self, image: bool) -> Self {
        self.image = image;
        self
    }

    pub fn with_byte_len(mut self, byte_len: u64) -> Self {
        self.byte_len = byte_len;
        self
    }

    pub fn with_saved_to(mut self, saved_to: impl Into<String>) -> Self {
        self.saved_to = Some(saved_to.into());
        self
    }
}

/// Invocation bookkeeping shown in the view footer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served_in_secs: Option<f64>,
}

impl ViewMeta {
    pub fn new() -> Self {
        Self {
            app_version: None,
            served_at: None,
            served_in_secs: None,
        }
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    pub fn with_served_at(mut self, served_at: impl Into<String>) -> Self {
        self.served_at = Some(served_at.into());
        self
    }

    pub fn with_served_in_secs(mut self, served_in_secs: f64) -> Self {
        self.served_in_secs = Some(served_in_secs);
        self
    }
}

impl Default for ViewMeta {
    fn default() -> Self {
        Self::new()
    }
}
