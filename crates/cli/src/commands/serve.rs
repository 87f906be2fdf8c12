//! `supportbot serve`: Start the HTTP API server.

use supportbot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🤖 supportbot gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   FAQ dataset: {}", config.faq.dataset_path);
    println!("   History: {} ({})", config.memory.backend, config.memory.path);

    supportbot_gateway::start(config).await?;

    Ok(())
}
