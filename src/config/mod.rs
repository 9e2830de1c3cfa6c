// Configuration module entry point
// Loads settings from an optional TOML file, environment overrides, and defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "server.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8888)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.max_body_size", 20_971_520)? // 20MB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("storage.collections_file", "collections.json")?
            .set_default("storage.images_dir", "img/collections")?
            .set_default("storage.gallery_dir", "img/gallery")?
            .set_default("storage.manifest_file", "gallery_manifest.json")?
            .set_default("storage.max_image_size", 5_242_880)? // 5MB
            .set_default(
                "storage.allowed_image_types",
                vec!["jpeg", "jpg", "png", "webp"],
            )?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from the default "server.toml"
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("server")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should load");
        assert_eq!(cfg.server.port, 8888);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.collections_file, "collections.json");
        assert_eq!(cfg.storage.max_image_size, 5_242_880);
        assert_eq!(
            cfg.storage.allowed_image_types,
            vec!["jpeg", "jpg", "png", "webp"]
        );
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("nonexistent-config").expect("defaults should load");
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 9000;
        let addr = cfg.get_socket_addr().expect("valid address");
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
    }
}
