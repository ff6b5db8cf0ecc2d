//! `MultipartForm` driven through an axum router with `tower::oneshot`.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use fetch_core::{FormFile, MultipartForm, Options};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Extracted {
    titles: Vec<String>,
    missing: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
    missing_files: usize,
}

async fn upload(form: MultipartForm) -> Json<Extracted> {
    Json(Extracted {
        titles: form.values("title"),
        missing: form.values("nope"),
        files: form
            .files("doc")
            .into_iter()
            .map(|f| (f.filename().to_string(), f.content().to_vec()))
            .collect(),
        missing_files: form.files("nope").len(),
    })
}

fn app() -> Router {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::disable())
}

fn multipart_request(content_type: &str, body: Vec<u8>) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, content_type)
        .body(axum::body::Body::from(body))
        .unwrap()
}

async fn extracted(response: axum::response::Response) -> Extracted {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn extracts_values_and_files_from_builder_payload() {
    let mut options = Options::new();
    options
        .add_form_value("title", "first")
        .add_form_value("title", "second")
        .add_form_file("doc", FormFile::new("a.bin", vec![0u8, 1, 2, 255]))
        .add_form_file("doc", FormFile::new("b.txt", "bee"))
        .submit_form_data();
    let content_type = options.headers()["content-type"][0].clone();

    let resp = app()
        .oneshot(multipart_request(&content_type, options.body().to_vec()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let got = extracted(resp).await;
    assert_eq!(got.titles, vec!["first", "second"]);
    assert!(got.missing.is_empty());
    assert_eq!(
        got.files,
        vec![
            ("a.bin".to_string(), vec![0u8, 1, 2, 255]),
            ("b.txt".to_string(), b"bee".to_vec()),
        ]
    );
    assert_eq!(got.missing_files, 0);
}

#[tokio::test]
async fn unnamed_parts_are_skipped() {
    let body = concat!(
        "--B\r\n",
        "Content-Disposition: form-data\r\n\r\n",
        "orphan\r\n",
        "--B\r\n",
        "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
        "kept\r\n",
        "--B--\r\n",
    );
    let resp = app()
        .oneshot(multipart_request(
            "multipart/form-data; boundary=B",
            body.as_bytes().to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let got = extracted(resp).await;
    assert_eq!(got.titles, vec!["kept"]);
}

#[tokio::test]
async fn unreadable_file_is_skipped_and_earlier_parts_kept() {
    let body = concat!(
        "--B\r\n",
        "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
        "kept\r\n",
        "--B\r\n",
        "Content-Disposition: form-data; name=\"doc\"; filename=\"good.txt\"\r\n\r\n",
        "good\r\n",
        "--B\r\n",
        "Content-Disposition: form-data; name=\"doc\"; filename=\"cut.txt\"\r\n\r\n",
        "never closed",
    );
    let resp = app()
        .oneshot(multipart_request(
            "multipart/form-data; boundary=B",
            body.as_bytes().to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let got = extracted(resp).await;
    assert_eq!(got.titles, vec!["kept"]);
    assert_eq!(got.files, vec![("good.txt".to_string(), b"good".to_vec())]);
}

#[tokio::test]
async fn missing_boundary_is_rejected() {
    let resp = app()
        .oneshot(multipart_request("multipart/form-data", b"irrelevant".to_vec()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).starts_with("malformed multipart request"));
}

#[tokio::test]
async fn truncated_body_is_rejected() {
    let body = concat!(
        "--B\r\n",
        "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
        "never closed",
    );
    let resp = app()
        .oneshot(multipart_request(
            "multipart/form-data; boundary=B",
            body.as_bytes().to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
