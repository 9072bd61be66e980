use std::path::{Path, PathBuf};

use rand::Rng;

use crate::entities::ImageUpload;
use crate::error::{validation_error, Error, FieldError};

/// Directory that stores uploaded point images (and the item artwork).
#[derive(Clone, Debug)]
pub struct Uploads {
    dir: PathBuf,
    max_image_bytes: usize,
}

impl Uploads {
    pub fn new(dir: impl Into<PathBuf>, max_image_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_image_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    pub async fn ensure_dir(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir).await?;

        Ok(())
    }

    /// Writes the image under a fresh name and returns that name. The
    /// extension follows the content type, never the client's file name.
    #[tracing::instrument(skip(self, image), fields(file_name = %image.file_name, size = image.bytes.len()))]
    pub async fn store(&self, image: &ImageUpload) -> Result<String, Error> {
        let extension = image.extension().ok_or_else(|| {
            validation_error(vec![FieldError::new("image", "unsupported image type")])
        })?;
        let name = stored_name(&image.file_name, extension);

        tokio::fs::write(self.dir.join(&name), &image.bytes).await?;

        Ok(name)
    }

    pub async fn discard(&self, name: &str) {
        if let Err(err) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!(error = %err, name, "could not remove orphaned upload");
        }
    }
}

/// `{12 hex chars}-{sanitized original stem}.{extension}`.
pub fn stored_name(original: &str, extension: &str) -> String {
    let hash: [u8; 6] = rand::thread_rng().gen();
    let prefix: String = hash.iter().map(|byte| format!("{:02x}", byte)).collect();

    format!("{}-{}.{}", prefix, stem(&sanitize(original)), extension)
}

fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

fn sanitize(original: &str) -> String {
    let base = original.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".into()
    } else {
        cleaned.into()
    }
}
