//! Static file fallback
//!
//! GET paths with no registered handler serve files from the process working
//! directory, the way a generic file server would. Conditional requests,
//! ranges, and caching are intentionally not supported here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::http::{self, mime};
use crate::logger;

/// Serve a file from the working directory, or 404
pub async fn serve(path: &str) -> Response<Full<Bytes>> {
    match load_from_working_dir(path).await {
        Some((content, content_type)) => http::build_static_file_response(content, content_type),
        None => http::build_404_response(),
    }
}

async fn load_from_working_dir(path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let root = Path::new(".");
    let mut file_path = root.join(&clean_path);

    // Directory requests resolve to their index.html
    if clean_path.is_empty() || clean_path.ends_with('/') || file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    // Security: the resolved file must stay inside the working directory
    let root_canonical = root.canonicalize().ok()?;
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let content = fs::read(&file_canonical).await.ok()?;
    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
