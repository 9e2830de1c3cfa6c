//! HTTP protocol layer module
//!
//! Response building and MIME detection, decoupled from the business handlers.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_413_response, build_error_response, build_json_response,
    build_options_response, build_raw_json_response, build_static_file_response,
};
