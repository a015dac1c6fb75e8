use std::collections::BTreeMap;

use thiserror::Error;

pub const CODE_QUERY_SUCCEEDED: u32 = 101;
pub const CODE_SEARCH_FAILED: u32 = 102;
pub const CODE_VALIDATION_FAILED: u32 = 103;
pub const CODE_DOCUMENT_FETCH_FAILED: u32 = 104;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
}

/// One operator-facing notification line, already resolved against the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub code: Option<u32>,
    pub text: String,
}

impl Notice {
    /// Display line for the notice. A code whose catalog text was blank
    /// still renders something traceable.
    pub fn render(&self) -> String {
        if !self.text.is_empty() {
            return self.text.clone();
        }
        match self.code {
            Some(code) => format!("notification code {code}"),
            None => String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("message catalog is not a JSON object of code/text pairs")]
    Invalid(#[source] serde_json::Error),
}

/// Code-to-text table backing operator notifications. Built once from a
/// bundled JSON object; before that load completes every lookup yields an
/// empty string, so early notices render blank rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: BTreeMap<u32, String>,
}

impl MessageCatalog {
    /// Catalog with no entries, the state before assets are loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `{"101": "…", "102": "…"}`. Keys that are not numeric are
    /// skipped rather than rejected.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let table: BTreeMap<String, String> =
            serde_json::from_str(raw).map_err(CatalogError::Invalid)?;
        let messages = table
            .into_iter()
            .filter_map(|(key, text)| Some((key.parse::<u32>().ok()?, text)))
            .collect();
        Ok(Self { messages })
    }

    /// Catalog text for `code`, or an empty string for unknown codes.
    pub fn text_for(&self, code: u32) -> &str {
        self.messages
            .get(&code)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn success(&self, code: u32) -> Notice {
        Notice {
            severity: Severity::Success,
            code: Some(code),
            text: self.text_for(code).to_string(),
        }
    }

    pub fn failure(&self, code: u32) -> Notice {
        Notice {
            severity: Severity::Failure,
            code: Some(code),
            text: self.text_for(code).to_string(),
        }
    }

    /// Failure notice carrying a caller-supplied detail. With a code, the
    /// catalog text becomes a prefix for the detail; without one the detail
    /// stands alone.
    pub fn failure_with_message(&self, detail: &str, code: Option<u32>) -> Notice {
        let text = match code {
            Some(code) => {
                let prefix = self.text_for(code);
                if prefix.is_empty() {
                    detail.to_string()
                } else {
                    format!("{prefix}: {detail}")
                }
            }
            None => detail.to_string(),
        };
        Notice {
            severity: Severity::Failure,
            code,
            text,
        }
    }
}
