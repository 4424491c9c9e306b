use abi::Config;
use booking_service::start_server;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/config.yml".to_string());
    let config = Config::load(path)?;
    start_server(&config).await
}
