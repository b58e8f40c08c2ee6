use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sporlproxy::{config, config::Config, server};

#[tokio::main]
async fn main() {
    let env_loaded = config::load_env();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging(config::DEFAULT_LOG_LEVEL);
            error!("Cannot load configuration. Err: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);
    if let Err(e) = env_loaded {
        warn!("Cannot load environment. Err: {}", e);
    }
    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if let Err(e) = server::start_api_server(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` directives win over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
