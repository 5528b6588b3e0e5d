use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use users_crud::api::server::start_server;
use users_crud::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("users_crud=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    if let Err(err) = start_server(&config).await {
        error!(error = %err, "users front-end stopped");
        std::process::exit(1);
    }
}
