//! Response envelope and pagination wrappers.
//!
//! Every backend response is `{success, data, message, statusCode}`.
//! Paginated data is `{items, pageNumber, pageSize, totalCount}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

/// Pagination metadata without the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl PageMeta {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) < self.total_pages()
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 20,
            search: None,
        }
    }
}

impl PageQuery {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
            search: None,
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Decode a raw response into the envelope's data.
///
/// `Ok(None)` means a successful response without data (e.g., 204 or a
/// delete acknowledgement).
pub fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
    path: &str,
) -> Result<Option<T>, ApiError> {
    let http_ok = (200..300).contains(&status);

    if body.iter().all(u8::is_ascii_whitespace) {
        return if http_ok {
            Ok(None)
        } else {
            Err(ApiError::from_status(status, default_message(status)))
        };
    }

    match serde_json::from_slice::<ApiEnvelope<T>>(body) {
        Ok(envelope) => {
            let code = envelope.status_code.unwrap_or(status);
            if envelope.success && http_ok && (200..300).contains(&code) {
                Ok(envelope.data)
            } else {
                let message = envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| default_message(code));
                // An error envelope may carry a 2xx HTTP status; trust the envelope.
                let code = if (200..300).contains(&code) { 400 } else { code };
                Err(ApiError::from_status(code, message))
            }
        }
        Err(e) if http_ok => Err(ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(ApiError::from_status(status, fallback_message(status, body))),
    }
}

/// Pull a message out of a non-envelope error body (e.g. problem details).
fn fallback_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "title", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or_else(|| default_message(status))
}

fn default_message(status: u16) -> String {
    match status {
        400 => "The request was invalid".to_string(),
        401 => "Please sign in again".to_string(),
        403 => "You do not have permission to do that".to_string(),
        404 => "The requested record does not exist".to_string(),
        500..=599 => "The server encountered an error".to_string(),
        _ => format!("Request failed with status {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn success_envelope_yields_data() {
        let body = br#"{"success":true,"data":{"id":7},"message":"ok","statusCode":200}"#;
        let data: Option<Item> = decode_envelope(200, body, "/x").unwrap();
        assert_eq!(data, Some(Item { id: 7 }));
    }

    #[test]
    fn failure_envelope_uses_backend_message() {
        let body = br#"{"success":false,"data":null,"message":"Blood group required","statusCode":400}"#;
        let err = decode_envelope::<Item>(400, body, "/x").unwrap_err();
        assert_eq!(err.user_message(), "Blood group required");
    }

    #[test]
    fn envelope_status_code_overrides_http_status() {
        let body = br#"{"success":false,"message":"No donor profile","statusCode":404}"#;
        let err = decode_envelope::<Item>(200, body, "/x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unsuccessful_envelope_with_2xx_code_is_rejected() {
        let body = br#"{"success":false,"message":"Nope","statusCode":200}"#;
        let err = decode_envelope::<Item>(200, body, "/x").unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
    }

    #[test]
    fn empty_body_is_none_on_success() {
        let data: Option<Item> = decode_envelope(204, b"", "/x").unwrap();
        assert!(data.is_none());
        assert!(decode_envelope::<Item>(500, b" ", "/x").is_err());
    }

    #[test]
    fn problem_details_title_is_used() {
        let body = br#"{"title":"One or more validation errors occurred.","status":400}"#;
        let err = decode_envelope::<Item>(400, body, "/x").unwrap_err();
        assert_eq!(err.user_message(), "One or more validation errors occurred.");
    }

    #[test]
    fn garbage_on_success_is_decode_error() {
        let err = decode_envelope::<Item>(200, b"<html>", "/x").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn missing_data_and_items_decode_without_default() {
        // `Item` has no `Default`; the wrappers must not require one.
        let data: Option<Item> = decode_envelope(200, br#"{"success":true}"#, "/x").unwrap();
        assert!(data.is_none());

        let body = br#"{"success":true,"data":{"pageNumber":1,"pageSize":20,"totalCount":0}}"#;
        let page: Option<Page<Item>> = decode_envelope(200, body, "/x").unwrap();
        let page = page.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta().total_count, 0);
    }

    #[test]
    fn page_meta_math() {
        let meta = PageMeta {
            page_number: 2,
            page_size: 10,
            total_count: 25,
        };
        assert_eq!(meta.total_pages(), 3);
        assert!(meta.has_next());
        assert!(!PageMeta { page_number: 3, ..meta }.has_next());
    }

    #[test]
    fn page_query_pairs_skip_empty_search() {
        let mut q = PageQuery::page(0, 0);
        assert_eq!(q.page_number, 1);
        q.search = Some(String::new());
        assert_eq!(q.to_pairs().len(), 2);
    }
}
