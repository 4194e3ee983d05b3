//! `quizgen config`: Configuration management commands.

use quizgen_config::AppConfig;

pub fn print_default() {
    println!("{}", AppConfig::default_toml());
}

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let warnings = warnings_for(&config);
            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   warning: {w}");
                }
            }

            println!();
            println!(
                "   Gateway:   {}:{}",
                config.gateway.host, config.gateway.port
            );
            println!("   Context:   {}", config.context.backend);
            println!("   Audit:     {}", config.audit.backend);
            println!(
                "   Limits:    {} items, {} workers",
                config.generation.max_total_items, config.generation.max_workers
            );
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Settings that load fine but are probably not what the operator wants.
fn warnings_for(config: &AppConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.context.backend == "search" && config.context.search.api_key.is_none() {
        warnings.push("No search API key set (QUIZGEN_SEARCH_API_KEY)");
    }

    if config.context.backend == "static" && config.context.static_text.is_none() {
        warnings.push("Static context backend without context.static_text serves demo text");
    }

    if config.context.summary_chars > config.context.max_chars {
        warnings.push("context.summary_chars exceeds context.max_chars");
    }

    if config.gateway.host == "0.0.0.0" && config.gateway.allowed_origins.iter().any(|o| o == "*")
    {
        warnings.push("Gateway bound to 0.0.0.0 with CORS open to any origin");
    }

    warnings
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
}
