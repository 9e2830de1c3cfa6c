//! Collection list handlers
//!
//! The collection list is an opaque JSON array persisted verbatim in a single
//! file. The server never interprets individual elements; it only checks that
//! the top-level value is an array. A timestamped copy of the previous file is
//! taken before every overwrite, and backups are never pruned.

use chrono::Local;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::Path;
use tokio::fs;

use crate::config::StorageConfig;
use crate::error::ApiError;
use crate::http;
use crate::logger;

/// GET /save-collections.php
///
/// Echoes the stored file back verbatim when it holds valid JSON. A missing
/// or corrupted file degrades to an empty list rather than an error.
pub async fn get_collections(storage: &StorageConfig) -> Result<Response<Full<Bytes>>, ApiError> {
    if !Path::new(&storage.collections_file).exists() {
        return Ok(http::build_raw_json_response(b"[]".to_vec()));
    }

    let data = fs::read(&storage.collections_file)
        .await
        .map_err(|e| ApiError::Internal(format!("Error loading collections: {e}")))?;

    if serde_json::from_slice::<serde_json::Value>(&data).is_err() {
        logger::log_warning(&format!(
            "{} holds invalid JSON, returning empty list",
            storage.collections_file
        ));
        return Ok(http::build_raw_json_response(b"[]".to_vec()));
    }

    Ok(http::build_raw_json_response(data))
}

/// POST /save-collections.php
///
/// Body must be a JSON array. The previous file contents are copied to a
/// timestamped backup before the overwrite; a failed backup is logged and
/// does not block the save.
pub async fn save_collections(
    storage: &StorageConfig,
    body: &[u8],
) -> Result<Response<Full<Bytes>>, ApiError> {
    let data: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("Invalid JSON data"))?;

    let count = data
        .as_array()
        .ok_or_else(|| ApiError::bad_request("Collections must be an array"))?
        .len();

    backup_existing(storage).await;

    let pretty = serde_json::to_string_pretty(&data)
        .map_err(|e| ApiError::Internal(format!("Error saving collections: {e}")))?;
    fs::write(&storage.collections_file, pretty)
        .await
        .map_err(|e| ApiError::Internal(format!("Error saving collections: {e}")))?;

    let response = serde_json::json!({
        "success": true,
        "message": "Collections saved successfully",
        "count": count,
        "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    });

    Ok(http::build_json_response(StatusCode::OK, &response))
}

/// Copy the current collections file to `<file>.backup.<timestamp>`.
/// Best effort: the save proceeds even if the copy fails.
async fn backup_existing(storage: &StorageConfig) {
    if !Path::new(&storage.collections_file).exists() {
        return;
    }

    let backup_name = format!(
        "{}.backup.{}",
        storage.collections_file,
        Local::now().format("%Y-%m-%d-%H-%M-%S")
    );

    if let Err(e) = fs::copy(&storage.collections_file, &backup_name).await {
        logger::log_warning(&format!("Failed to back up collections to {backup_name}: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testutil::{body_bytes, temp_storage};

    #[tokio::test]
    async fn test_get_without_file_returns_empty_array() {
        let storage = temp_storage("col-get-missing");
        let resp = get_collections(&storage).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, b"[]");
    }

    #[tokio::test]
    async fn test_get_with_corrupted_file_returns_empty_array() {
        let storage = temp_storage("col-get-corrupt");
        std::fs::write(&storage.collections_file, b"[{\"truncated\": ").unwrap();
        let resp = get_collections(&storage).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, b"[]");
    }

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let storage = temp_storage("col-round-trip");
        let body = br#"[{"name":"caps","items":[1,2,3]},{"name":"pins"}]"#;

        let resp = save_collections(&storage, body).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let saved: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(saved["success"], true);
        assert_eq!(saved["count"], 2);
        assert_eq!(saved["message"], "Collections saved successfully");

        let resp = get_collections(&storage).await.unwrap();
        let echoed: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        let expected: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(echoed, expected);
    }

    #[tokio::test]
    async fn test_save_preserves_non_ascii() {
        let storage = temp_storage("col-non-ascii");
        let body = "[\"caf\u{e9}\", \"\u{65e5}\u{672c}\"]".as_bytes();
        save_collections(&storage, body).await.unwrap();

        let on_disk = std::fs::read_to_string(&storage.collections_file).unwrap();
        assert!(on_disk.contains('\u{e9}'), "non-ASCII must stay literal");
        assert!(!on_disk.contains("\\u"), "no escape sequences expected");
    }

    #[tokio::test]
    async fn test_save_non_array_is_rejected() {
        let storage = temp_storage("col-non-array");
        let err = save_collections(&storage, br#"{"a":1}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Collections must be an array");
        assert!(!Path::new(&storage.collections_file).exists());
    }

    #[tokio::test]
    async fn test_save_invalid_json_takes_precedence() {
        let storage = temp_storage("col-bad-json");
        let err = save_collections(&storage, b"{not json").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid JSON data");
    }

    #[tokio::test]
    async fn test_save_creates_backup_with_prior_bytes() {
        let storage = temp_storage("col-backup");
        let first = br#"[1, 2, 3]"#;
        save_collections(&storage, first).await.unwrap();
        let first_on_disk = std::fs::read(&storage.collections_file).unwrap();

        save_collections(&storage, br#"["replaced"]"#).await.unwrap();

        let dir = Path::new(&storage.collections_file).parent().unwrap();
        let backups: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("collections.json.backup.")
            })
            .collect();
        assert_eq!(backups.len(), 1, "exactly one backup per save over a file");
        assert_eq!(std::fs::read(backups[0].path()).unwrap(), first_on_disk);
    }

    #[tokio::test]
    async fn test_first_save_creates_no_backup() {
        let storage = temp_storage("col-first-save");
        save_collections(&storage, b"[]").await.unwrap();

        let dir = Path::new(&storage.collections_file).parent().unwrap();
        let backups = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
            .count();
        assert_eq!(backups, 0);
    }
}
