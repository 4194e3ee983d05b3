//! `quizgen serve`: Start the HTTP generation service.

use quizgen_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("quizgen gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Context:   {}", config.context.backend);
    println!("   Audit:     {}", config.audit.backend);
    println!("   Workers:   {}", config.generation.max_workers);

    quizgen_gateway::start(config).await?;

    Ok(())
}
