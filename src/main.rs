use readme_translator::{Orchestrator, TranslatorConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match TranslatorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let translation = &config.translation;
    match Orchestrator::from_config(translation).run().await {
        Ok(_) => {
            tracing::info!("Translation saved to {}", translation.output_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
