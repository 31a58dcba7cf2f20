//! Request and response values seen by the worker

use reqwest::Url;
use std::collections::BTreeMap;

/// How a request was initiated, mirroring the Fetch API's request modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    /// A top-level page navigation
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// An outgoing request intercepted by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::default(),
        }
    }

    pub fn navigate(url: Url) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Key under which the response to this request is cached
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

/// Visibility class of a response, mirroring the Fetch API's response types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin response with full access
    Basic,
    /// Cross-origin response allowed by CORS
    Cors,
    /// Cross-origin `no-cors` response; status and body are hidden
    Opaque,
    /// A synthesized response
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub response_type: ResponseType,
    /// Header names are stored lower-case
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, response_type: ResponseType, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            response_type,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// An opaque response as produced for cross-origin `no-cors` requests
    pub fn opaque() -> Self {
        Self::new(0, ResponseType::Opaque, Vec::new())
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// True for 2xx statuses
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = Request::get(Url::parse("https://eds.local/index.html").unwrap());
        assert!(request.is_get());
        assert_eq!(request.mode, RequestMode::Cors);
        assert_eq!(request.cache_key(), "https://eds.local/index.html");
    }

    #[test]
    fn test_method_comparison_ignores_case() {
        let url = Url::parse("https://eds.local/").unwrap();
        assert!(Request::get(url.clone()).with_method("get").is_get());
        assert!(!Request::get(url).with_method("POST").is_get());
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let response = Response::new(200, ResponseType::Basic, "hi").with_header("Content-Type", "text/plain");
        assert_eq!(response.content_type(), Some("text/plain"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
    }

    #[test]
    fn test_opaque_response_is_not_ok() {
        assert!(!Response::opaque().ok());
        assert!(Response::new(204, ResponseType::Basic, Vec::new()).ok());
    }
}
