// Server module entry point
// Listener creation, per-connection serving, and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// Re-export commonly used functions
pub use connection::handle_connection;
pub use listener::create_reusable_listener;
pub use signal::shutdown_signal;
