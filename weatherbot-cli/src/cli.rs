use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use weatherbot_core::{
    Assistant, Config, LexiconModel, ProviderId, Query, WeatherProvider,
    provider::{default_provider_from_config, provider_from_config},
};

type BoxedAssistant = Assistant<Box<dyn WeatherProvider>>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherbot", version, about = "Ask about the weather in plain English")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Answer a single question, e.g. `weatherbot ask "Is it windy in Paris?"`.
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,

        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Show how the question was understood before answering.
        #[arg(long)]
        explain: bool,
    },

    /// Ask questions interactively until `exit` or `quit`.
    Chat {
        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Ask { question, provider, explain } => {
                let assistant = build_assistant(provider.as_deref())?;
                ask(&assistant, &question.join(" "), explain).await
            }
            Command::Chat { provider } => {
                let assistant = build_assistant(provider.as_deref())?;
                chat(&assistant).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    let path = config.save()?;
    println!("Saved {id} credentials to {}", path.display());

    Ok(())
}

async fn ask(assistant: &BoxedAssistant, question: &str, explain: bool) -> anyhow::Result<()> {
    if explain {
        print_query(&assistant.understand(question));
    }

    match assistant.answer(question).await {
        Ok(answer) => {
            if explain {
                let observed = answer.record.timestamp.with_timezone(&chrono::Local);
                println!("observed:   {}", observed.format("%Y-%m-%d %H:%M"));
            }
            println!("{}", answer.text);
            Ok(())
        }
        Err(err) => {
            let message = err.user_message();
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

async fn chat(assistant: &BoxedAssistant) -> anyhow::Result<()> {
    println!("Hello! I am a weather bot. Ask me a question about the weather.");
    println!(
        "For example: 'What is the temperature in London?' or 'Tell me the forecast for New York.'"
    );

    loop {
        let question = match Text::new(">").prompt() {
            Ok(question) => question,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read question"),
        };

        let question = question.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        match assistant.answer(question).await {
            Ok(answer) => println!("{}", answer.text),
            Err(err) => {
                tracing::debug!(%err, "question not answered");
                println!("{}", err.user_message());
            }
        }
    }

    Ok(())
}

fn print_query(query: &Query) {
    let attributes: Vec<&str> = query.attributes.iter().map(|a| a.as_str()).collect();

    println!("location:   {}", query.location.as_deref().unwrap_or("(none)"));
    println!("intent:     {}", query.intent);
    println!("attributes: {}", attributes.join(", "));
}

fn build_assistant(provider: Option<&str>) -> anyhow::Result<BoxedAssistant> {
    let mut config = Config::load()?;
    apply_env_keys(&mut config);

    let provider = match provider {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, &config)?,
        None => default_provider_from_config(&config)?,
    };

    let model = LexiconModel::load(&config.places);

    Ok(Assistant::new(Arc::new(model), provider))
}

/// Environment variable consulted when the config file has no key.
fn env_var(id: ProviderId) -> &'static str {
    match id {
        ProviderId::OpenWeather => "OPENWEATHERMAP_API_KEY",
        ProviderId::WeatherApi => "WEATHERAPI_KEY",
    }
}

fn apply_env_keys(config: &mut Config) {
    for &id in ProviderId::all() {
        if config.is_provider_configured(id) {
            continue;
        }
        if let Ok(key) = std::env::var(env_var(id)) {
            if !key.trim().is_empty() {
                tracing::debug!(provider = %id, "using API key from environment");
                config.upsert_provider_api_key(id, key.trim().to_string());
            }
        }
    }
}
