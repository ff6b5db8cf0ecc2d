//! One-shot request execution.
//!
//! # Design
//! `execute` is the only place that touches the network. It turns
//! `Options` into an `http::Request`, runs it through the options' ureq
//! agent and buffers the whole body into a [`Response`]. The ureq response
//! is dropped before returning on every path; a [`RequestTimer`] guard logs
//! the elapsed time no matter how the call exits.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use ureq::http::{HeaderName, HeaderValue, Request};
use ureq::AsSendBody;

use crate::context::Context;
use crate::error::FetchError;
use crate::options::Options;
use crate::response::Response;
use crate::url::normalize;

/// Diagnostic header carrying the Unix time the request was sent.
pub const HEADER_CLIENT_UNIX: &str = "x-client-unix";

/// Send a request to `dst_url` described by `options` and buffer the reply.
///
/// `None` options behave like `Options::default()`. Websocket URLs are
/// rejected before any normalization or network access. Non-2xx statuses are
/// returned as a normal `Response`.
pub fn execute(
    ctx: &Context,
    dst_url: &str,
    options: Option<&Options>,
) -> Result<Response, FetchError> {
    let default_options;
    let options = match options {
        Some(options) => options,
        None => {
            default_options = Options::default();
            &default_options
        }
    };

    let mut timer = RequestTimer::start(dst_url);

    if dst_url.starts_with("ws") {
        return Err(FetchError::UnsupportedProtocol(dst_url.to_string()));
    }

    let url = append_queries(normalize(dst_url), options);
    timer.url.clone_from(&url);

    let client = options.client();
    let timeout = client_timeout(ctx, options)?;

    // `()` keeps bodiless requests free of a zero-length body.
    let response = if options.body().is_empty() {
        let request = build_request(&url, options, ())?;
        send(client.agent(), request, timeout)?
    } else {
        let request = build_request(&url, options, options.body().to_vec())?;
        send(client.agent(), request, timeout)?
    };

    Ok(response)
}

/// Append every query parameter as raw `key=value`, `?` before the first and
/// `&` before the rest. An existing `?` in `url` is not taken into account.
fn append_queries(mut url: String, options: &Options) -> String {
    for (i, (key, value)) in options.queries().iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }
    url
}

fn client_timeout(
    ctx: &Context,
    options: &Options,
) -> Result<Option<std::time::Duration>, FetchError> {
    if ctx.remaining().is_some_and(|remaining| remaining.is_zero()) {
        return Err(FetchError::DeadlineExceeded);
    }
    Ok(ctx.effective_timeout(options.client().timeout()))
}

fn build_request<S>(url: &str, options: &Options, body: S) -> Result<Request<S>, FetchError> {
    let mut request = Request::builder()
        .method(options.method().clone())
        .uri(url)
        .body(body)?;

    let headers = request.headers_mut();
    for (key, values) in options.headers() {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(ureq::http::Error::from)?;
        for (i, value) in values.iter().enumerate() {
            let value = HeaderValue::from_str(value).map_err(ureq::http::Error::from)?;
            if i == 0 {
                headers.insert(name.clone(), value);
            } else {
                headers.append(name.clone(), value);
            }
        }
    }

    let sent_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    headers.insert(HEADER_CLIENT_UNIX, HeaderValue::from(sent_at));

    Ok(request)
}

fn send<S: AsSendBody>(
    agent: &ureq::Agent,
    request: Request<S>,
    timeout: Option<std::time::Duration>,
) -> Result<Response, FetchError> {
    let request = agent
        .configure_request(request)
        .timeout_global(timeout)
        .build();

    let mut response = agent.run(request).map_err(FetchError::Transport)?;
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(FetchError::BodyRead)?;

    Ok(Response::new(
        response.status().as_u16(),
        response.headers().clone(),
        body,
    ))
}

/// Logs the destination and elapsed time when dropped.
struct RequestTimer {
    url: String,
    started: Instant,
}

impl RequestTimer {
    fn start(url: &str) -> Self {
        Self {
            url: url.to_string(),
            started: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        tracing::debug!(url = %self.url, elapsed = ?self.started.elapsed(), "request finished");
    }
}
