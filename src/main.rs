use std::sync::Arc;
use tokio::net::TcpListener;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::Config::load()?;

    // First CLI argument overrides the configured port
    if let Some(arg) = std::env::args().nth(1) {
        cfg.server.port = arg
            .parse()
            .map_err(|e| format!("Invalid port '{arg}': {e}"))?;
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Upload and gallery directories exist before the first request
    tokio::fs::create_dir_all(&cfg.storage.images_dir).await?;
    tokio::fs::create_dir_all(&cfg.storage.gallery_dir).await?;

    let listener = match server::create_reusable_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                logger::log_port_in_use(&addr);
            } else {
                logger::log_startup_failure(&addr, &e);
            }
            return Err(e.into());
        }
    };

    logger::log_server_start(&addr, &cfg);

    run_accept_loop(listener, Arc::new(cfg)).await
}

async fn run_accept_loop(
    listener: TcpListener,
    config: Arc<config::Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = server::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        server::handle_connection(stream, Arc::clone(&config));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
