use std::net::TcpListener;

use env_logger::Env;
use pagelens::{configuration::get_configuration, services::FirecrawlClient, startup::run};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    // A missing key is a per-submission validation error, not a startup failure.
    let api_key = configuration.firecrawl_api_key();
    if api_key.is_none() {
        log::warn!("No Firecrawl API key configured; submissions will be rejected until one is set");
    }
    let firecrawl_client = FirecrawlClient::new(api_key);

    run(listener, firecrawl_client)?.await
}
