//! bedrock binary entry point

use std::sync::Arc;

use bedrock_llm::{
    cli::{image_mime_type, Cli, Commands, QueryArgs},
    BedrockConfig, BedrockLlm, ContentPart, LlmOptions, MessageContent, TracingCallbackHandler,
};
use color_eyre::{eyre::eyre, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bedrock_llm=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    // Handle commands
    match cli.command {
        Commands::Query(args) => run_query(config, args).await?,
        Commands::Config { show } => {
            if show {
                println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            } else {
                println!("region:   {}", config.region);
                println!("endpoint: {}", config.effective_endpoint());
                println!("model:    {}", config.default_model);
            }
        }
        Commands::Version => {
            println!("bedrock-llm version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<BedrockConfig> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = BedrockConfig::load_from_path(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => BedrockConfig::load()?,
    };
    Ok(config)
}

async fn run_query(config: BedrockConfig, args: QueryArgs) -> Result<()> {
    let mut messages = Vec::new();
    if let Some(system) = &args.system {
        messages.push(MessageContent::system(system.clone()));
    }

    let mut prompt = MessageContent::human(args.prompt.clone());
    if let Some(path) = &args.image {
        let mime_type = image_mime_type(path)
            .ok_or_else(|| eyre!("unsupported image type: {}", path.display()))?;
        let data = std::fs::read(path)?;
        prompt = prompt.with_part(ContentPart::binary(mime_type, data));
    }
    messages.push(prompt);

    let llm = BedrockLlm::new(
        LlmOptions::new()
            .with_config(config)
            .with_callback(Arc::new(TracingCallbackHandler)),
    )?;
    let response = llm.generate_content(&messages, args.call_options()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for (i, choice) in response.choices.iter().enumerate() {
            if response.choices.len() > 1 {
                println!("--- choice {i} ({}) ---", choice.stop_reason);
            }
            println!("{}", choice.content.trim());
        }
    }

    Ok(())
}
