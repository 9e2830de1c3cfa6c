//! Gallery handlers
//!
//! Gallery images live under `<gallery>/<Category>/` and are named by their
//! sequence number (`<n>.<ext>`). The manifest file keeps the per-category
//! counters the client uses to pick the next sequence number.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::fs;

use crate::config::StorageConfig;
use crate::error::ApiError;
use crate::http;
use crate::logger;

/// The fixed category buckets, in listing order
const CATEGORIES: [&str; 2] = ["Male", "Female"];

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub const GALLERY_UPLOAD_UNIMPLEMENTED: &str =
    "Gallery upload requires PHP server for full functionality";
pub const GALLERY_DELETE_UNIMPLEMENTED: &str =
    "Gallery delete requires PHP server for full functionality";

/// One gallery image, derived from the filesystem on every request
#[derive(Debug, Serialize)]
pub struct GalleryImage {
    filename: String,
    path: String,
    category: String,
    size: u64,
    sequence: i64,
    /// Seconds since epoch, fractional
    modified: f64,
}

/// GET /gallery-list.php
///
/// A scan failure is reported inside the JSON envelope rather than as a
/// plain error response.
pub async fn gallery_list(storage: &StorageConfig) -> Result<Response<Full<Bytes>>, ApiError> {
    match scan_gallery(storage).await {
        Ok(images) => Ok(http::build_json_response(
            StatusCode::OK,
            &serde_json::json!({
                "success": true,
                "images": images,
                "total": images.len(),
            }),
        )),
        Err(e) => {
            logger::log_error(&format!("Gallery list error: {e}"));
            Ok(http::build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({
                    "success": false,
                    "error": e,
                    "images": [],
                    "total": 0,
                }),
            ))
        }
    }
}

async fn scan_gallery(storage: &StorageConfig) -> Result<Vec<GalleryImage>, String> {
    fs::create_dir_all(&storage.gallery_dir)
        .await
        .map_err(|e| format!("Cannot create gallery directory: {e}"))?;

    let mut images = Vec::new();

    for category in CATEGORIES {
        let dir = Path::new(&storage.gallery_dir).join(category);
        if !dir.is_dir() {
            continue;
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| format!("Cannot read {}: {e}", dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| format!("Cannot read {}: {e}", dir.display()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some((stem, ext)) = name.rsplit_once('.') else {
                continue;
            };
            if !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            // Only numeric stems are gallery images; everything else is skipped
            let Ok(sequence) = stem.parse::<i64>() else {
                continue;
            };

            match entry.metadata().await {
                Ok(meta) => {
                    let modified = meta
                        .modified()
                        .ok()
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map_or(0.0, |d| d.as_secs_f64());

                    images.push(GalleryImage {
                        path: format!(
                            "{}/{category}/{name}",
                            storage.gallery_dir.trim_end_matches('/')
                        )
                        .replace('\\', "/"),
                        filename: name,
                        category: category.to_string(),
                        size: meta.len(),
                        sequence,
                        modified,
                    });
                }
                Err(e) => {
                    // A single unreadable file must not abort the scan
                    logger::log_warning(&format!(
                        "Error processing file {}: {e}",
                        entry.path().display()
                    ));
                }
            }
        }
    }

    images.sort_by_key(|img| (category_rank(&img.category), img.sequence));
    Ok(images)
}

/// Sort key for the fixed category order (Male before Female)
fn category_rank(category: &str) -> usize {
    CATEGORIES
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORIES.len())
}

/// GET /gallery-manifest.php
pub async fn manifest_get(storage: &StorageConfig) -> Result<Response<Full<Bytes>>, ApiError> {
    let manifest: serde_json::Value = if Path::new(&storage.manifest_file).exists() {
        let data = fs::read(&storage.manifest_file)
            .await
            .map_err(|e| ApiError::Internal(format!("Error reading manifest: {e}")))?;
        serde_json::from_slice(&data)
            .map_err(|e| ApiError::Internal(format!("Error reading manifest: {e}")))?
    } else {
        serde_json::json!({"Male": 0, "Female": 0})
    };

    Ok(http::build_json_response(
        StatusCode::OK,
        &serde_json::json!({"success": true, "manifest": manifest}),
    ))
}

/// POST /gallery-manifest.php
///
/// Requires both category keys; values are loosely coerced to integers.
/// A body that is not JSON at all, or a value that cannot be coerced, is an
/// internal error rather than a 400 (only the missing-key case is a client
/// error).
pub async fn manifest_post(
    storage: &StorageConfig,
    body: &[u8],
) -> Result<Response<Full<Bytes>>, ApiError> {
    let data: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Internal(format!("Error saving manifest: {e}")))?;

    let (Some(male_raw), Some(female_raw)) = (data.get("Male"), data.get("Female")) else {
        return Err(ApiError::bad_request("Invalid manifest structure"));
    };

    let male = coerce_int(male_raw)
        .map_err(|e| ApiError::Internal(format!("Error saving manifest: {e}")))?;
    let female = coerce_int(female_raw)
        .map_err(|e| ApiError::Internal(format!("Error saving manifest: {e}")))?;

    let manifest = serde_json::json!({"Male": male, "Female": female});

    let pretty = serde_json::to_string_pretty(&manifest)
        .map_err(|e| ApiError::Internal(format!("Error saving manifest: {e}")))?;
    fs::write(&storage.manifest_file, pretty)
        .await
        .map_err(|e| ApiError::Internal(format!("Error saving manifest: {e}")))?;

    Ok(http::build_json_response(
        StatusCode::OK,
        &serde_json::json!({"success": true, "manifest": manifest}),
    ))
}

/// Loose integer coercion: numbers truncate, numeric strings parse,
/// booleans map to 0/1
fn coerce_int(value: &serde_json::Value) -> Result<i64, String> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| format!("not an integer: {n}")),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid literal for int: '{s}'")),
        serde_json::Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(format!("cannot convert {other} to int")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testutil::{body_bytes, temp_storage};

    fn seed_gallery(storage: &StorageConfig, files: &[(&str, &str)]) {
        for (category, name) in files {
            let dir = Path::new(&storage.gallery_dir).join(category);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(name), b"fake image bytes").unwrap();
        }
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(&serde_json::json!(5)).unwrap(), 5);
        assert_eq!(coerce_int(&serde_json::json!("7")).unwrap(), 7);
        assert_eq!(coerce_int(&serde_json::json!(" 7 ")).unwrap(), 7);
        assert_eq!(coerce_int(&serde_json::json!(7.9)).unwrap(), 7);
        assert_eq!(coerce_int(&serde_json::json!(true)).unwrap(), 1);
        assert!(coerce_int(&serde_json::json!("abc")).is_err());
        assert!(coerce_int(&serde_json::json!(null)).is_err());
        assert!(coerce_int(&serde_json::json!([1])).is_err());
    }

    #[tokio::test]
    async fn test_list_skips_non_numeric_and_sorts() {
        let storage = temp_storage("gal-list");
        seed_gallery(
            &storage,
            &[
                ("Male", "3.jpg"),
                ("Male", "1.png"),
                ("Female", "2.webp"),
                ("Male", "abc.jpg"),
                ("Male", "notes.txt"),
            ],
        );

        let resp = gallery_list(&storage).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let result: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["total"], 3);

        let images = result["images"].as_array().unwrap();
        let order: Vec<(&str, i64)> = images
            .iter()
            .map(|i| {
                (
                    i["category"].as_str().unwrap(),
                    i["sequence"].as_i64().unwrap(),
                )
            })
            .collect();
        assert_eq!(order, vec![("Male", 1), ("Male", 3), ("Female", 2)]);

        let first = &images[0];
        assert_eq!(first["filename"], "1.png");
        assert_eq!(first["size"], 16);
        assert!(first["path"].as_str().unwrap().ends_with("Male/1.png"));
        assert!(first["modified"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_list_on_empty_tree_creates_root() {
        let storage = temp_storage("gal-empty");
        let resp = gallery_list(&storage).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let result: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(result["total"], 0);
        assert!(Path::new(&storage.gallery_dir).is_dir());
    }

    #[tokio::test]
    async fn test_manifest_get_defaults_to_zero() {
        let storage = temp_storage("man-default");
        let resp = manifest_get(&storage).await.unwrap();
        let result: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(result["manifest"]["Male"], 0);
        assert_eq!(result["manifest"]["Female"], 0);
    }

    #[tokio::test]
    async fn test_manifest_post_coerces_and_round_trips() {
        let storage = temp_storage("man-post");
        let body = br#"{"Male": 5, "Female": "7"}"#;

        let resp = manifest_post(&storage, body).await.unwrap();
        let result: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(result["manifest"]["Male"], 5);
        assert_eq!(result["manifest"]["Female"], 7);

        let persisted: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&storage.manifest_file).unwrap()).unwrap();
        assert_eq!(persisted, serde_json::json!({"Male": 5, "Female": 7}));

        let resp = manifest_get(&storage).await.unwrap();
        let result: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(result["manifest"], serde_json::json!({"Male": 5, "Female": 7}));
    }

    #[tokio::test]
    async fn test_manifest_post_missing_key_is_client_error() {
        let storage = temp_storage("man-missing");
        let err = manifest_post(&storage, br#"{"Male": 5}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid manifest structure");
    }

    #[tokio::test]
    async fn test_manifest_post_uncoercible_value_is_internal() {
        let storage = temp_storage("man-coerce");
        let err = manifest_post(&storage, br#"{"Male": "abc", "Female": 0}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
