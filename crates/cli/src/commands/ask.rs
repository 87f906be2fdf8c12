//! `supportbot ask`: Route one message and print the reply.

use supportbot_agent::ChatService;
use supportbot_config::AppConfig;
use supportbot_core::SessionId;

pub async fn run(message: String, session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    if message.is_empty() {
        return Err("Message must not be empty".into());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let service = ChatService::from_config(&config).await?;

    let session_id = session.map(SessionId::from).unwrap_or_else(SessionId::generate);
    let reply = service.chat(&session_id, &message).await?;

    println!("[{}] {}", reply.source, reply.reply);
    println!("\n   session: {session_id}");

    Ok(())
}
