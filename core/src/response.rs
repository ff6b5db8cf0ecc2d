//! Buffered HTTP response returned by [`execute`](crate::execute).

use serde::de::DeserializeOwned;
use ureq::http::HeaderMap;

use crate::error::FetchError;

/// Status, headers and fully buffered body of a completed request.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header map, multi-valued headers preserved.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The raw body. Fails with `EmptyBody` when nothing was received.
    pub fn body(&self) -> Result<&[u8], FetchError> {
        if self.body.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(&self.body)
    }

    /// Decode the body as JSON into `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        let body = self.body()?;
        serde_json::from_slice(body).map_err(|e| FetchError::DeserializationError(e.to_string()))
    }

    /// The body as text; invalid UTF-8 is replaced, an empty body gives `""`.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use ureq::http::HeaderValue;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Todo {
        title: String,
        completed: bool,
    }

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, HeaderMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn empty_body_accessors() {
        let resp = response(204, "");
        assert!(matches!(resp.body(), Err(FetchError::EmptyBody)));
        assert!(matches!(
            resp.load::<serde_json::Value>(),
            Err(FetchError::EmptyBody)
        ));
        assert_eq!(resp.as_string(), "");
    }

    #[test]
    fn load_decodes_json() {
        let resp = response(200, r#"{"title":"Test","completed":true}"#);
        let todo: Todo = resp.load().unwrap();
        assert_eq!(
            todo,
            Todo {
                title: "Test".to_string(),
                completed: true
            }
        );
    }

    #[test]
    fn load_bad_json() {
        let resp = response(200, "not json");
        let err = resp.load::<Todo>().unwrap_err();
        assert!(matches!(err, FetchError::DeserializationError(_)));
    }

    #[test]
    fn body_and_string_views() {
        let resp = response(200, "hello");
        assert_eq!(resp.body().unwrap(), b"hello");
        assert_eq!(resp.as_string(), "hello");
    }

    #[test]
    fn status_helpers() {
        assert!(response(201, "").is_success());
        assert!(!response(404, "").is_success());
        assert_eq!(response(500, "").status(), 500);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        let resp = Response::new(200, headers, Vec::new());

        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.headers().get_all("Set-Cookie").iter().count(), 2);
        assert_eq!(resp.header("x-missing"), None);
    }
}
