use serde::Serialize;
use thiserror::Error;

pub const FETCH_FILE_ROUTE: &str = "/api/v1/resource/fetch_file";

/// Request body for the resource fetch endpoint.
#[derive(Debug, Serialize)]
pub struct FetchFileRequest<'a> {
    pub resource_file_name: &'a str,
}

/// Rendering class a fetched file falls into, decided purely from its file
/// name extension. The comparison is exact; `PDF` is not `pdf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Jpeg,
    Png,
    Text,
    Binary,
}

impl MediaKind {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Text => "text/plain",
            Self::Binary => "application/octet-stream",
        }
    }

    /// Whether the document screen renders this inline as an image.
    pub fn renders_as_image(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

pub fn classify_file_name(file_name: &str) -> MediaKind {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return MediaKind::Binary;
    };
    match extension {
        "pdf" => MediaKind::Pdf,
        "jpg" | "jpeg" => MediaKind::Jpeg,
        "png" => MediaKind::Png,
        "txt" => MediaKind::Text,
        _ => MediaKind::Binary,
    }
}

/// Fetches the named document's bytes. The endpoint answers a JSON request
/// with the raw file body.
pub fn fetch_document(file_name: &str, base_url: &str) -> Result<Vec<u8>, ResourceApiError> {
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(fetch_file_endpoint(base_url))
        .json(&FetchFileRequest {
            resource_file_name: file_name,
        })
        .send()
        .map_err(|source| ResourceApiError::Transport { source })?;

    let status_code = response.status().as_u16();
    if !(200..=299).contains(&status_code) {
        let body = response
            .text()
            .map_err(|source| ResourceApiError::Transport { source })?;
        let message = extract_error_message(&body).unwrap_or_else(|| format!("HTTP {status_code}"));
        return Err(ResourceApiError::Http {
            status: status_code,
            message,
        });
    }

    let bytes = response
        .bytes()
        .map_err(|source| ResourceApiError::Transport { source })?;
    Ok(bytes.to_vec())
}

/// Joins the fetch route onto the configured base, tolerating one trailing
/// slash on the base.
pub fn fetch_file_endpoint(base_url: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}{FETCH_FILE_ROUTE}")
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    let detail = value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty());
    let message = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty());

    detail.or(message).map(ToOwned::to_owned)
}

#[derive(Debug, Error)]
pub enum ResourceApiError {
    #[error("document fetch failed")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("resource api error ({status}): {message}")]
    Http { status: u16, message: String },
}
