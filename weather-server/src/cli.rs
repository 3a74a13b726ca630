use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{Config, NormalizedWeather, ProviderId, WeatherService};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-proxy", version, about = "Weather lookup proxy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather API over HTTP.
    Serve {
        /// Interface to bind; defaults to the configured host.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on; defaults to the configured port or $PORT.
        #[arg(long)]
        port: Option<u16>,

        /// Provider short name: "open-meteo", "openweather" or "mock".
        #[arg(long)]
        provider: Option<String>,
    },

    /// Look up current weather for a city once and print it.
    Lookup {
        /// City name.
        city: String,

        /// Provider short name; defaults to the configured provider.
        #[arg(long)]
        provider: Option<String>,
    },

    /// Configure a provider and make it the default.
    Configure {
        /// Provider short name, e.g. "open-meteo" or "openweather".
        provider: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port, provider } => {
                let config = load_config()?;
                let service = build_service(&config, provider.as_deref())?;

                let host = host.unwrap_or_else(|| config.server.host.clone());
                let port = port.unwrap_or(config.server.port);
                server::run(service, &host, port).await
            }
            Command::Lookup { city, provider } => {
                let config = load_config()?;
                let service = build_service(&config, provider.as_deref())?;

                let weather = service.lookup(&city).await?;
                print_weather(&weather);
                Ok(())
            }
            Command::Configure { provider } => configure(&provider),
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env().context("Invalid environment override")?;
    Ok(config)
}

fn build_service(config: &Config, provider: Option<&str>) -> anyhow::Result<WeatherService> {
    let id = match provider {
        Some(name) => ProviderId::try_from(name)?,
        None => config.effective_provider_id()?,
    };

    if id == ProviderId::Mock {
        tracing::warn!("Serving built-in mock weather data");
    }

    WeatherService::from_config(config, id)
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = inquire::Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?;

        let api_key = api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        config.upsert_provider_api_key(id, api_key.to_string());
    }

    config.set_default_provider(id);
    config.save()?;

    println!(
        "Default provider set to {id}. Config saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn print_weather(weather: &NormalizedWeather) {
    println!("{} {}", weather.icon, weather.city);
    println!("  Temperature: {}°C", weather.temperature_celsius);
    println!("  Condition:   {}", weather.condition);
    println!("  Wind:        {}", weather.wind_speed);
    println!("  Humidity:    {}", weather.humidity);
    println!("  AQI:         {}", weather.air_quality_index);
    println!("  Location:    {:.4}, {:.4}", weather.latitude, weather.longitude);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::try_parse_from(["weather-proxy", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { host, port, provider } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
                assert_eq!(provider, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_provider_wins_over_config() {
        let mut config = Config::default();
        config.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());

        let service = build_service(&config, Some("mock")).unwrap();
        assert_eq!(service.provider_id(), ProviderId::Mock);

        let service = build_service(&config, None).unwrap();
        assert_eq!(service.provider_id(), ProviderId::OpenWeather);
    }

    #[test]
    fn unknown_provider_flag_is_rejected() {
        let err = build_service(&Config::default(), Some("darksky")).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }
}
