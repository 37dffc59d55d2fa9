use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;

use super::client::ApiClient;
use super::error::ApiError;

pub const UPLOAD_PATH: &str = "/upload";
pub const UPLOAD_FIELD: &str = "image";
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.")]
    UnsupportedType,

    #[error("Empty file")]
    Empty,

    #[error("File too large. Maximum size is 5MB.")]
    TooLarge,

    #[error("File content does not match an allowed image type.")]
    InvalidContent,

    #[error("Upload response did not include a URL")]
    MissingUrl,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// An image picked for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

/// Local checks run before anything is sent. Returns the sniffed mime type.
pub fn validate_image(file: &ImageFile) -> Result<&'static str, UploadError> {
    if !ALLOWED_EXTENSIONS.contains(&file.extension().as_str()) {
        return Err(UploadError::UnsupportedType);
    }
    if file.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge);
    }
    sniff_mime(&file.bytes).ok_or(UploadError::InvalidContent)
}

/// Uploads an image and returns the hosted URL.
pub async fn upload_image(client: &ApiClient, file: ImageFile) -> Result<String, UploadError> {
    let mime = validate_image(&file)?;
    let size = file.bytes.len();

    let part = Part::bytes(file.bytes)
        .file_name(file.file_name.clone())
        .mime_str(mime)
        .map_err(ApiError::from)?;
    let form = Form::new().part(UPLOAD_FIELD, part);

    let value = client.send_multipart(UPLOAD_PATH, form, true).await?;
    let url = value
        .get("url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(UploadError::MissingUrl)?;

    tracing::info!(file = %file.file_name, size = size, url = %url, "image uploaded");
    Ok(url)
}
