//! Logger module
//!
//! Console logging for the collection server:
//! - Server lifecycle logging (startup banner, shutdown)
//! - Access logging, gated by configuration
//! - Error and warning logging

use crate::config::Config;
use std::net::SocketAddr;

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| ".".to_string());

    write_info("======================================");
    write_info("Collection management server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Serving from: {cwd}"));
    write_info(&format!(
        "Collections file: {}",
        config.storage.collections_file
    ));
    write_info(&format!("Images folder: {}/", config.storage.images_dir));
    write_info(&format!("Gallery folder: {}/", config.storage.gallery_dir));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

pub fn log_request(method: &hyper::Method, path: &str) {
    write_info(&format!("[Request] {method} {path}"));
}

pub fn log_response(status: u16) {
    write_info(&format!("[Response] {status}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_port_in_use(addr: &SocketAddr) {
    write_error(&format!("[ERROR] Port {} is already in use", addr.port()));
    write_error("        Stop the other server or choose a different port");
}

pub fn log_startup_failure(addr: &SocketAddr, err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to bind {addr}: {err}"));
}

pub fn log_shutdown() {
    write_info("\nServer stopped by user");
}
