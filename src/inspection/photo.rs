//! Inspection photos.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{FimsError, Result};
use crate::inspection::record::string_or_number;
use crate::store::Row;

/// Photos allowed per inspection, counting stored and pending ones.
pub const MAX_PHOTOS: usize = 5;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
];

/// A photo chosen during the wizard but not uploaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPhoto {
    pub path: PathBuf,
    pub description: String,
}

impl PendingPhoto {
    /// Accept an image file from disk.
    pub fn new(path: impl Into<PathBuf>, description: &str) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(FimsError::InvalidField {
                key: "photo".to_string(),
                message: format!("{} is not a file", path.display()),
            });
        }
        if content_type(&path).is_none() {
            return Err(FimsError::InvalidField {
                key: "photo".to_string(),
                message: format!("{} is not a supported image", path.display()),
            });
        }
        Ok(Self {
            path,
            description: description.trim().to_string(),
        })
    }

    /// Original file name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string())
    }

    pub fn content_type(&self) -> &'static str {
        content_type(&self.path).unwrap_or("application/octet-stream")
    }
}

/// MIME type for an image path, by extension.
pub fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// A row of the photos table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub inspection_id: String,
    pub photo_url: String,
    pub photo_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub photo_order: u32,
}

impl PhotoRecord {
    pub fn from_row(row: Row) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(row))
            .map_err(|e| FimsError::backend("decode", e))
    }
}

fn opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("invalid id {}", other))),
    }
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Storage path for a photo: `<inspection>/<order>-<hash>-<safe name>`.
///
/// The hash covers the original name and the upload timestamp so that
/// re-uploading the same file never collides with an earlier object.
pub fn object_path(inspection_id: &str, order: u32, file_name: &str, stamp_millis: i64) -> String {
    let safe = UNSAFE_CHARS.replace_all(file_name, "_");
    let safe = safe.trim_matches(|c| c == '_' || c == '.');
    let safe = if safe.is_empty() { "photo" } else { safe };

    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(stamp_millis.to_le_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("{}/{}-{}-{}", inspection_id, order, &digest[..8], safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn accepts_images_only() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("front.JPG");
        let text = temp.path().join("notes.txt");
        fs::write(&image, b"\xff\xd8").unwrap();
        fs::write(&text, b"hello").unwrap();

        let photo = PendingPhoto::new(&image, "  Front gate ").unwrap();
        assert_eq!(photo.description, "Front gate");
        assert_eq!(photo.content_type(), "image/jpeg");
        assert_eq!(photo.file_name(), "front.JPG");

        assert!(PendingPhoto::new(&text, "").is_err());
        assert!(PendingPhoto::new(temp.path().join("missing.png"), "").is_err());
    }

    #[test]
    fn object_path_is_sanitized() {
        let path = object_path("12", 3, "../site photo (1).jpg", 1_000);
        assert!(path.starts_with("12/3-"));
        assert!(path.ends_with("-site_photo_1_.jpg"));
        assert!(!path.contains(".."));
    }

    #[test]
    fn object_path_varies_with_time() {
        assert_ne!(
            object_path("1", 1, "a.jpg", 1),
            object_path("1", 1, "a.jpg", 2)
        );
    }

    #[test]
    fn decodes_photo_rows() {
        let row = json!({
            "id": 5,
            "inspection_id": 2,
            "photo_url": "file:///tmp/a.jpg",
            "photo_name": "a.jpg",
            "photo_order": 1
        });
        let photo = PhotoRecord::from_row(row.as_object().unwrap().clone()).unwrap();
        assert_eq!(photo.id.as_deref(), Some("5"));
        assert_eq!(photo.inspection_id, "2");
        assert!(photo.description.is_none());
    }
}
