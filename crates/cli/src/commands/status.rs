//! `supportbot status`: Show the effective configuration.

use supportbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🤖 supportbot status");
    println!("====================");
    println!("  Config file:  {}", AppConfig::config_path().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.effective_model());
    println!("  API key:      {}", if config.has_api_key() { "set" } else { "missing" });
    println!("  Temperature:  {}", config.default_temperature);
    println!("  FAQ dataset:  {}", config.faq.dataset_path);
    println!("  Threshold:    {}", config.faq.match_threshold);
    println!("  Context:      last {} turn(s)", config.conversation.context_turns);
    println!("  History:      {} ({})", config.memory.backend, config.memory.path);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults. Run `supportbot init` to create one.");
    }

    Ok(())
}
