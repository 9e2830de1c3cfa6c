//! Image upload handler
//!
//! Accepts a JSON body carrying a base64 data URL plus a client-supplied
//! filename, validates type and size, sanitizes the name, and writes the
//! decoded bytes into the images directory. An existing file with the same
//! name is overwritten without warning.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

use crate::config::StorageConfig;
use crate::error::ApiError;
use crate::http;

/// POST /upload-image.php
pub async fn upload_image(
    storage: &StorageConfig,
    body: &[u8],
) -> Result<Response<Full<Bytes>>, ApiError> {
    let data: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("Invalid JSON data"))?;

    let image_data = data.get("imageData").and_then(serde_json::Value::as_str);
    let filename = data.get("filename").and_then(serde_json::Value::as_str);
    let (Some(image_data), Some(filename)) = (image_data, filename) else {
        return Err(ApiError::bad_request("Missing imageData or filename"));
    };

    let (subtype, payload) = parse_data_url(image_data)
        .ok_or_else(|| ApiError::bad_request("Invalid image data format"))?;

    // Exact match against the configured subtypes, case-sensitive
    if !storage.allowed_image_types.iter().any(|t| t == subtype) {
        return Err(ApiError::bad_request("Invalid image type"));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| ApiError::bad_request("Invalid base64 data"))?;

    if decoded.len() as u64 > storage.max_image_size {
        return Err(ApiError::bad_request("Image too large. Maximum size is 5MB"));
    }

    let filename = final_filename(filename, subtype);

    fs::create_dir_all(&storage.images_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Error uploading image: {e}")))?;

    let target = format!(
        "{}/{}",
        storage.images_dir.trim_end_matches('/'),
        filename
    )
    .replace('\\', "/");

    fs::write(&target, &decoded)
        .await
        .map_err(|e| ApiError::Internal(format!("Error uploading image: {e}")))?;

    let response = serde_json::json!({
        "success": true,
        "filename": filename,
        "path": target,
        "size": decoded.len(),
        "type": format!("image/{subtype}"),
    });

    Ok(http::build_json_response(StatusCode::OK, &response))
}

/// Split `data:image/<subtype>;base64,<payload>` into subtype and payload.
/// The subtype is limited to word characters; the payload must be non-empty.
fn parse_data_url(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix("data:image/")?;
    let (subtype, payload) = rest.split_once(";base64,")?;
    if subtype.is_empty() || payload.is_empty() {
        return None;
    }
    if !subtype
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return None;
    }
    Some((subtype, payload))
}

/// Strip every character that is not an ASCII letter, digit, hyphen,
/// underscore, or dot.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

/// Split on the last dot; a dot at position 0 does not start an extension
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Sanitize the client filename, falling back to a generated name, and make
/// sure the extension matches a known image type. A detected `jpeg` subtype
/// maps to the `jpg` extension.
fn final_filename(raw: &str, subtype: &str) -> String {
    let mut filename = sanitize_filename(raw);
    if filename.is_empty() {
        filename = format!(
            "collection_{}.{}",
            chrono::Utc::now().timestamp(),
            subtype
        );
    }

    let (stem, ext) = split_extension(&filename);
    let ext_ok = ext.is_some_and(|e| {
        matches!(
            e.to_ascii_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp"
        )
    });

    if ext_ok {
        filename
    } else {
        let mapped = if subtype == "jpeg" { "jpg" } else { subtype };
        format!("{stem}.{mapped}")
    }
}
