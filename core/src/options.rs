//! Mutable request builder consumed by [`execute`](crate::execute).
//!
//! # Design
//! `Options` accumulates everything about a request except its destination.
//! Mutators take `&mut self` and return it so calls chain; nothing is
//! validated until the executor turns the options into an `http::Request`.
//! Header keys are stored lower-cased so set/add are case-insensitive.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use ureq::config::Config;
use ureq::http::Method;
use ureq::Agent;

use crate::error::FetchError;
use crate::form::{FormFile, FormValue, MultipartWriter};

/// Total-request timeout of a default [`Client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPTED_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::CONNECT,
    Method::TRACE,
];

/// HTTP client handle: a ureq agent plus a total-request timeout.
///
/// The agent reports 4xx/5xx responses as data, not errors, so callers see
/// every status through `Response::status`.
#[derive(Debug, Clone)]
pub struct Client {
    agent: Agent,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new() -> Self {
        Self::with_timeout(Some(DEFAULT_TIMEOUT))
    }

    /// `None` disables the client-side timeout; a context deadline still applies.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let config = Config::builder().http_status_as_error(false).build();
        Self {
            agent: Agent::new_with_config(config),
            timeout,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Method, query, headers, body and form fields for one request.
#[derive(Debug, Clone)]
pub struct Options {
    client: Client,
    method: Method,
    queries: BTreeMap<String, String>,
    forms: BTreeMap<String, Vec<FormValue>>,
    headers: BTreeMap<String, Vec<String>>,
    body: Vec<u8>,
}

impl Options {
    /// GET with no query, headers, form or body, on a default [`Client`].
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            method: Method::GET,
            queries: BTreeMap::new(),
            forms: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Set the method if `method` is one of the nine standard verbs.
    /// Anything else is ignored.
    pub fn set_method(&mut self, method: &str) -> &mut Self {
        if let Some(accepted) = ACCEPTED_METHODS.iter().find(|m| m.as_str() == method) {
            self.method = accepted.clone();
        }
        self
    }

    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> &mut Self {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        self.set_header("Authorization", &format!("Basic {credentials}"))
    }

    pub fn set_bearer_auth(&mut self, token: &str) -> &mut Self {
        self.set_header("Authorization", &format!("Bearer {token}"))
    }

    /// Store a query parameter. A repeated key overwrites the earlier value.
    pub fn query(&mut self, key: &str, value: &str) -> &mut Self {
        self.queries.insert(key.to_string(), value.to_string());
        self
    }

    /// Replace every value of `key` with `value`.
    pub fn set_header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers
            .insert(key.to_ascii_lowercase(), vec![value.to_string()]);
        self
    }

    /// Append `value` to the values of `key`.
    pub fn add_header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn add_form_value(&mut self, key: &str, value: &str) -> &mut Self {
        self.forms
            .entry(key.to_string())
            .or_default()
            .push(FormValue::Text(value.to_string()));
        self
    }

    pub fn add_form_file(&mut self, key: &str, file: FormFile) -> &mut Self {
        self.forms
            .entry(key.to_string())
            .or_default()
            .push(FormValue::File(file));
        self
    }

    /// Encode the accumulated form entries as the `multipart/form-data` body.
    ///
    /// When at least one part is written this replaces the body, sets
    /// `Content-Type` to the multipart type and forces the method to POST.
    /// With no form entries nothing changes.
    pub fn submit_form_data(&mut self) -> &mut Self {
        if self.forms.is_empty() {
            tracing::debug!("forms empty, nothing to submit");
            return self;
        }

        let mut writer = MultipartWriter::new();
        for (key, values) in &self.forms {
            for value in values {
                match value {
                    FormValue::Text(text) => writer.write_field(key, text),
                    FormValue::File(file) => writer.write_file(key, file),
                }
            }
        }

        if writer.parts() > 0 {
            let content_type = writer.content_type();
            self.set_header("Content-Type", &content_type);
            self.method = Method::POST;
            self.body = writer.finish();
        }
        self
    }

    /// Copy `body` into the request body. An empty slice leaves the current
    /// body in place.
    pub fn set_data(&mut self, body: &[u8]) -> &mut Self {
        if !body.is_empty() {
            self.body = body.to_vec();
        }
        self
    }

    /// Serialize `value` as the JSON request body.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, FetchError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| FetchError::SerializationError(e.to_string()))?;
        self.set_header("Content-Type", "application/json");
        Ok(self.set_data(&body))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn queries(&self) -> &BTreeMap<String, String> {
        &self.queries
    }

    pub fn forms(&self) -> &BTreeMap<String, Vec<FormValue>> {
        &self.forms
    }

    /// Headers keyed by lower-cased name, values in insertion order.
    pub fn headers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
