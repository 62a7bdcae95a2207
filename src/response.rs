use std::fmt;

use serde::Serialize;

/// `200 OK`
pub const OK: u16 = 200;
/// `403 Forbidden`
pub const FORBIDDEN: u16 = 403;
/// `429 Too Many Requests`
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Body encoding of an [`HttpResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `text/plain; charset=utf-8`
    Text,
    /// `application/json`
    Json,
}

impl ContentType {
    /// Returns the MIME type for the `Content-Type` header.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Text => "text/plain; charset=utf-8",
            ContentType::Json => "application/json",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A framework-agnostic HTTP response.
///
/// Framework integrations convert this into their own response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Body encoding
    pub content_type: ContentType,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Creates a plain-text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: ContentType::Text,
            body: body.into(),
        }
    }

    /// Creates a JSON response from a serializable value.
    ///
    /// A value that fails to serialize produces an empty JSON object.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        Self {
            status,
            content_type: ContentType::Json,
            body: serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// Creates a `200 OK` plain-text response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(OK, body)
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_response() {
        let response = HttpResponse::text(FORBIDDEN, "nope");
        assert_eq!(response.status, 403);
        assert_eq!(response.content_type.mime(), "text/plain; charset=utf-8");
        assert!(!response.is_success());
    }

    #[test]
    fn json_response() {
        let response = HttpResponse::json(OK, &serde_json::json!({ "pets": [] }));
        assert_eq!(response.body, r#"{"pets":[]}"#);
        assert_eq!(response.content_type, ContentType::Json);
        assert!(response.is_success());
    }
}
