use std::sync::Arc;

use minipub::broker::Broker;
use minipub::config::{Settings, load_config};
use minipub::transport::start_http_server;
use minipub::utils::error::{Error, Result};
use minipub::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("{}", Error::from(e));
            std::process::exit(1);
        }
    };

    logging::init(&settings.log.level);

    if let Err(e) = run_server(settings).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run_server(settings: Settings) -> Result<()> {
    let broker = Arc::new(Broker::new());

    start_http_server(&settings.listen_addr(), broker, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received");
    })
    .await
}
