//! Image upload validation and storage.
//!
//! Uploaded product images are validated by content sniffing (not just
//! the declared content type), capped in size, checked for an allowed
//! extension, and stored under the media directory with a UUID filename.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};
use uuid::Uuid;

const ALLOWED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Upload validation failures.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid file type. Only JPEG and PNG images are allowed.")]
    UnsupportedType,

    #[error("File too large. Maximum allowed size is {0} bytes.")]
    TooLarge(u64),

    #[error("Invalid file extension. File must be .png, .jpg, or .jpeg.")]
    BadExtension,

    #[error("Uploaded file does not have a usable filename.")]
    BadFilename,

    #[error("storing image: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores validated images under `<media_dir>/images/`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    media_dir: PathBuf,
    max_bytes: u64,
}

impl ImageStore {
    /// Create a store rooted at the media directory.
    pub fn new(media_dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            media_dir: media_dir.into(),
            max_bytes,
        }
    }

    /// The directory served under `/static`.
    pub fn static_root(&self) -> &Path {
        &self.media_dir
    }

    /// Validate and persist an uploaded image.
    ///
    /// Returns the public URL of the stored file, e.g.
    /// `/static/images/<uuid>.png`.
    #[instrument(skip(self, bytes))]
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        // Sniff the actual content; the client-declared type is not trusted.
        let format = image::guess_format(bytes).map_err(|_| UploadError::UnsupportedType)?;
        if !ALLOWED_FORMATS.contains(&format) {
            return Err(UploadError::UnsupportedType);
        }

        if bytes.len() as u64 > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(UploadError::BadFilename)?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::BadExtension);
        }

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let images_dir = self.media_dir.join("images");
        fs::create_dir_all(&images_dir).await?;
        fs::write(images_dir.join(&stored_name), bytes).await?;

        debug!(name = %stored_name, "stored uploaded image");
        Ok(format!("/static/images/{stored_name}"))
    }

    /// Read a stored image back as an inline `data:` URI.
    ///
    /// Returns `None` when the file no longer exists on disk.
    pub async fn to_data_uri(&self, image_url: &str) -> Result<Option<String>> {
        let relative = image_url
            .strip_prefix("/static/")
            .unwrap_or(image_url)
            .trim_start_matches('/');
        let path = self.media_dir.join(relative);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading image: {}", path.display()));
            }
        };

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        Ok(Some(format!(
            "data:{};base64,{}",
            mime,
            BASE64.encode(bytes)
        )))
    }
}
