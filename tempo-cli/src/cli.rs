use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tempo_core::{Config, OutputFormat, WeatherAgent, WeatherError, config::API_KEY_ENV};

const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

/// Top-level CLI struct.
///
/// A first argument equal to a subcommand name (`configure`) is always taken
/// as that subcommand, so a city with that exact name cannot be looked up.
#[derive(Debug, Parser)]
#[command(
    name = "tempo",
    version,
    about = "Agente Meteorológico CLI (batch e interativo)",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Cidades brasileiras (ex: "São Paulo" Recife). Se omitido, entra no modo interativo.
    pub cidades: Vec<String>,

    /// Exibe resultado em formato JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(Command::Configure) = self.command {
            return configure();
        }

        let config = Config::load()?;
        let settings = config.agent_settings(std::env::var(API_KEY_ENV).ok())?;
        let mut agent = WeatherAgent::new(settings);
        let format = OutputFormat::from_json_flag(self.json);

        if self.cidades.is_empty() {
            run_interactive(&mut agent, format).await
        } else {
            run_batch(&mut agent, &self.cidades, format).await;
            Ok(())
        }
    }
}

async fn lookup(agent: &mut WeatherAgent, city: &str, format: OutputFormat) -> Result<String, WeatherError> {
    let raw = agent.get_weather(city).await?;
    agent.analyze_weather(&raw, format)
}

/// Each city is independent: failures are logged and the loop moves on.
async fn run_batch(agent: &mut WeatherAgent, cities: &[String], format: OutputFormat) {
    for city in cities {
        match lookup(agent, city, format).await {
            Ok(output) => println!("{output}\n"),
            Err(err) => tracing::error!(city = %city, kind = ?err.kind(), "{err}"),
        }
    }
}

async fn run_interactive(agent: &mut WeatherAgent, format: OutputFormat) -> anyhow::Result<()> {
    println!("🚀 Modo interativo: digite o nome da cidade ou 'sair' para encerrar.");

    loop {
        let input = match Text::new("Cidade:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                String::new()
            }
            Err(err) => return Err(err).context("Failed to read city"),
        };
        let city = input.trim();

        if is_exit(city) {
            println!("Encerrando. Até a próxima!");
            return Ok(());
        }

        match lookup(agent, city, format).await {
            Ok(output) => println!("{output}\n"),
            Err(err) => tracing::error!(city = %city, kind = ?err.kind(), "{err}"),
        }
    }
}

fn is_exit(input: &str) -> bool {
    input.is_empty() || EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}
