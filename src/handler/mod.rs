//! Request handler module
//!
//! Routing dispatch and the endpoint handlers: collection persistence,
//! image upload, gallery listing/manifest, and the static file fallback.

pub mod collections;
pub mod gallery;
pub mod router;
pub mod static_files;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
