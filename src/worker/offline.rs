//! Fallback page served for navigations while offline

use super::http::{Response, ResponseType};

const OFFLINE_HTML: &str = include_str!("offline.html");

/// A `200 text/html` response explaining that the app is offline
pub fn offline_page() -> Response {
    Response::new(200, ResponseType::Default, OFFLINE_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_page_is_html() {
        let page = offline_page();
        assert_eq!(page.status, 200);
        assert!(page.content_type().unwrap().starts_with("text/html"));
        assert!(page.text().contains("Bağlantı Yok"));
    }
}
