//! Form values and the `multipart/form-data` encoder used by
//! `Options::submit_form_data`.

use uuid::Uuid;

/// An uploaded or to-be-uploaded file: a filename and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    filename: String,
    content: Vec<u8>,
}

impl FormFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// A single entry under a form key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FormFile),
}

/// Writes parts into an in-memory `multipart/form-data` payload.
#[derive(Debug)]
pub(crate) struct MultipartWriter {
    boundary: String,
    payload: Vec<u8>,
    parts: usize,
}

impl MultipartWriter {
    pub(crate) fn new() -> Self {
        Self {
            boundary: Uuid::new_v4().simple().to_string(),
            payload: Vec::new(),
            parts: 0,
        }
    }

    /// Value for the `Content-Type` header of the finished payload.
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub(crate) fn parts(&self) -> usize {
        self.parts
    }

    pub(crate) fn write_field(&mut self, name: &str, value: &str) {
        self.open_part();
        self.payload.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                encode_param(name)
            )
            .as_bytes(),
        );
        self.payload.extend_from_slice(value.as_bytes());
    }

    pub(crate) fn write_file(&mut self, name: &str, file: &FormFile) {
        self.open_part();
        self.payload.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                encode_param(name),
                encode_param(file.filename())
            )
            .as_bytes(),
        );
        self.payload
            .extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        self.payload.extend_from_slice(file.content());
    }

    /// Close the payload with the terminating boundary.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.parts > 0 {
            self.payload.extend_from_slice(b"\r\n");
        }
        self.payload
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.payload
    }

    fn open_part(&mut self) {
        if self.parts > 0 {
            self.payload.extend_from_slice(b"\r\n");
        }
        self.payload
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.parts += 1;
    }
}

/// Percent-encode the characters that would break a quoted
/// `Content-Disposition` parameter, as browsers do.
fn encode_param(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}
