//! `supportbot faqs`: List the FAQ corpus.

use supportbot_agent::load_corpus;
use supportbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let path = std::path::Path::new(&config.faq.dataset_path);

    let corpus = load_corpus(path)?;
    if corpus.is_empty() {
        println!("No FAQs in {}", path.display());
        return Ok(());
    }

    println!("📚 {} FAQ(s) from {}\n", corpus.len(), path.display());
    for (i, faq) in corpus.records().iter().enumerate() {
        println!("  {:>3}. {}", i + 1, faq.question);
        if !faq.keywords.is_empty() {
            println!("       keywords: {}", faq.keywords.join(", "));
        }
    }

    Ok(())
}
