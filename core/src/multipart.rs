//! Inbound `multipart/form-data` extraction for axum handlers.
//!
//! # Design
//! The whole form is read up front into owned maps, so lookups hand out
//! copies and never borrow from the request. There is no size cap here;
//! routes that accept uploads should disable axum's `DefaultBodyLimit`.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

use crate::error::FetchError;
use crate::form::FormFile;

/// Text fields and uploaded files of a parsed multipart request.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    values: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FormFile>>,
}

impl MultipartForm {
    /// Read every part of `multipart`.
    ///
    /// Parts with a filename become files, the rest text values. A file
    /// whose content cannot be read is logged and skipped, and the parts read
    /// so far are returned: a failed read leaves the stream unusable, so no
    /// later part can be recovered. Any other parse failure fails the whole
    /// form with `MalformedRequest`.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, FetchError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| FetchError::MalformedRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                tracing::debug!("skipping multipart part without a name");
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => match field.bytes().await {
                    Ok(content) => {
                        tracing::debug!(key = %name, %filename, "received file");
                        form.files
                            .entry(name)
                            .or_default()
                            .push(FormFile::new(filename, content.to_vec()));
                    }
                    Err(e) => {
                        let err = FetchError::FileRead {
                            filename,
                            reason: e.to_string(),
                        };
                        tracing::warn!(key = %name, error = %err, "skipping uploaded file");
                        break;
                    }
                },
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| FetchError::MalformedRequest(e.to_string()))?;
                    form.values.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// Text values submitted under `key`, empty if there are none.
    pub fn values(&self, key: &str) -> Vec<String> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Files submitted under `key`, empty if there are none.
    pub fn files(&self, key: &str) -> Vec<FormFile> {
        tracing::debug!(
            requested = key,
            available = ?self.files.keys().collect::<Vec<_>>(),
            "multipart file keys"
        );
        self.files.get(key).cloned().unwrap_or_default()
    }
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = match Multipart::from_request(req, state).await {
            Ok(multipart) => Self::from_multipart(multipart).await,
            Err(rejection) => Err(FetchError::MalformedRequest(rejection.body_text())),
        };
        parsed.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}
