// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Pre-read request body cap. Kept above the decoded image limit so an
    /// oversized upload still reaches the handler's own 400 path.
    pub max_body_size: u64,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// Storage configuration - every path the handlers touch
///
/// Injected into the handlers rather than hard-coded so tests can point
/// the server at temporary directories.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the collection list
    pub collections_file: String,
    /// Directory for uploaded collection images
    pub images_dir: String,
    /// Gallery root containing the category subdirectories
    pub gallery_dir: String,
    /// Per-category gallery counters file
    pub manifest_file: String,
    /// Maximum decoded upload size in bytes
    pub max_image_size: u64,
    /// Accepted data-URL image subtypes
    pub allowed_image_types: Vec<String>,
}
