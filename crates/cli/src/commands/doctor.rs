//! `supportbot doctor`: Diagnose system health.

use std::path::Path;
use supportbot_agent::{ChatService, load_corpus};
use supportbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 supportbot doctor");
    println!("====================\n");

    let mut issues = 0;

    // Config
    let config = if AppConfig::config_path().exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                println!("\n  ⚠️  Fix the config file and re-run.");
                return Ok(());
            }
        }
    } else {
        println!("  ⚠️  No config file, using defaults (run `supportbot init`)");
        issues += 1;
        AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?
    };

    // API key
    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key; set GEMINI_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    // FAQ corpus
    match load_corpus(Path::new(&config.faq.dataset_path)) {
        Ok(corpus) if corpus.is_empty() => {
            println!("  ⚠️  FAQ dataset is empty; every message goes to the AI");
            issues += 1;
        }
        Ok(corpus) => println!("  ✅ FAQ dataset loaded ({} entries)", corpus.len()),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // History store + generation service
    match ChatService::from_config(&config).await {
        Ok(service) => {
            match service.session_count().await {
                Ok(n) => println!("  ✅ History store ready ({}, {n} session(s))", service.store_name()),
                Err(e) => {
                    println!("  ❌ History store unreadable ({}): {e}", service.store_name());
                    issues += 1;
                }
            }
            if service.ai_available().await {
                println!("  ✅ AI service reachable ({})", config.default_provider);
            } else {
                println!("  ❌ AI service unavailable ({})", config.default_provider);
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Service could not start: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
