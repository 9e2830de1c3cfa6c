//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: exact (method, path) dispatch to
//! one handler, the CORS preflight short-circuit, the request body size
//! guard, and the error-to-response adapter.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::handler::{collections, gallery, static_files, upload};
use crate::http;
use crate::logger;

type HandlerResponse = Response<http_body_util::Full<Bytes>>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<Config>,
) -> Result<HandlerResponse, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let access_log = config.logging.access_log;

    if access_log {
        logger::log_request(&method, &path);
    }

    // CORS preflight succeeds for any path, before routing
    if method == Method::OPTIONS {
        return Ok(http::build_options_response());
    }

    if let Some(resp) = check_body_size(&req, config.http.max_body_size) {
        return Ok(resp);
    }

    let response = match dispatch(req, &method, &path, &config).await {
        Ok(resp) => resp,
        Err(err) => {
            if matches!(err, ApiError::Internal(_)) {
                logger::log_error(&err.to_string());
            }
            http::build_error_response(err.status(), &err.to_string())
        }
    };

    if access_log {
        logger::log_response(response.status().as_u16());
    }

    Ok(response)
}

/// Route the request to its handler by exact method and path
async fn dispatch<B>(
    req: Request<B>,
    method: &Method,
    path: &str,
    config: &Arc<Config>,
) -> Result<HandlerResponse, ApiError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let storage = &config.storage;

    match (method, path) {
        (&Method::GET, "/save-collections.php") => collections::get_collections(storage).await,
        (&Method::POST, "/save-collections.php") => {
            let body = read_body(req).await?;
            collections::save_collections(storage, &body).await
        }
        (&Method::POST, "/upload-image.php") => {
            let body = read_body(req).await?;
            upload::upload_image(storage, &body).await
        }
        (&Method::GET, "/gallery-list.php") => gallery::gallery_list(storage).await,
        (&Method::GET, "/gallery-manifest.php") => gallery::manifest_get(storage).await,
        (&Method::POST, "/gallery-manifest.php") => {
            let body = read_body(req).await?;
            gallery::manifest_post(storage, &body).await
        }
        (&Method::POST, "/gallery-upload.php") => Err(ApiError::NotImplemented(
            gallery::GALLERY_UPLOAD_UNIMPLEMENTED,
        )),
        (&Method::POST, "/gallery-delete.php") => Err(ApiError::NotImplemented(
            gallery::GALLERY_DELETE_UNIMPLEMENTED,
        )),
        // Unmatched GET paths fall through to the static file server
        (&Method::GET, _) => Ok(static_files::serve(path).await),
        _ => Err(ApiError::NotFound),
    }
}

/// Collect the request body in full
async fn read_body<B>(req: Request<B>) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    req.collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ApiError::Internal(format!("Failed to read request body: {e}")))
}

/// Validate Content-Length and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HandlerResponse> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
