//! Hearth CLI - inspect and change the persisted UI config

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hearth_app::{dictionary_fetcher, theme_fetcher, AppSettings, ConfigOptions, ConfigProvider};
use hearth_core::{ArgValue, Params};
use hearth_storage::FileStore;
use hearth_theme::{detect_from_env, Classes, ColorScheme};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, long_about = None)]
#[command(about = "Hearth UI config - color scheme, language and theme")]
struct Cli {
    /// Settings file
    #[arg(short, long, global = true, default_value = "hearth.toml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective config
    Show,

    /// Switch language and fetch its dictionary
    SetLanguage {
        /// Language code (e.g. `eo`, `en_US`)
        language: String,
    },

    /// Switch theme
    SetTheme {
        /// Theme identifier
        theme: String,
    },

    /// Set the color scheme (`light`, `dark`, `toggle`, `system`, `none`, or a custom name)
    SetScheme {
        scheme: String,
    },

    /// Translate a key in the current language
    Translate {
        key: String,

        /// Parameters as `name=value`
        #[arg(value_parser = parse_param)]
        params: Vec<(String, ArgValue)>,
    },

    /// Resolve class names of a namespace against the current theme
    Styles {
        namespace: String,

        classes: Vec<String>,
    },

    /// Delete the persisted config
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = AppSettings::load(&cli.settings)
        .with_context(|| format!("Failed to load {}", cli.settings.display()))?;

    let store = FileStore::open(&settings.storage.file)
        .with_context(|| format!("Failed to open {}", settings.storage.file.display()))?;
    let options = ConfigOptions::new()
        .key(settings.storage.key.clone())
        .defaults(settings.config_defaults())
        .dictionaries(dictionary_fetcher(&settings.resources.dictionaries))
        .themes(theme_fetcher(&settings.resources.themes));
    let config = ConfigProvider::new(Arc::new(store), options);

    match cli.command {
        Commands::Show => {
            config.initial_load().await;
            show(&config)?;
        }
        Commands::SetLanguage { language } => {
            config.set_language(language)?.await;
            report_fetch_error("dictionary", config.locale().error());
            info!(language = ?config.language(), "Language updated");
        }
        Commands::SetTheme { theme } => {
            config.set_theme(theme)?.await;
            report_fetch_error("theme", config.theme_provider().error());
            info!(theme = ?config.theme(), "Theme updated");
        }
        Commands::SetScheme { scheme } => {
            match scheme.trim().to_ascii_lowercase().as_str() {
                "toggle" => config.toggle_color_scheme()?,
                "none" => config.set_color_scheme(None)?,
                "system" => config.set_color_scheme(detect_from_env())?,
                _ => config.set_color_scheme(Some(ColorScheme::from(scheme.as_str())))?,
            }
            info!(scheme = ?config.color_scheme(), "Color scheme updated");
        }
        Commands::Translate { key, params } => {
            config.initial_load().await;
            let params = params
                .into_iter()
                .fold(Params::new(), |p, (name, value)| p.arg(name, value));
            println!("{}", config.locale().translate(&key, &params));
        }
        Commands::Styles { namespace, classes } => {
            config.initial_load().await;
            let resolver = config.theme_provider().use_styles(namespace, None);
            println!("{}", resolver.resolve(Classes::from(classes)));
        }
        Commands::Reset => {
            config.reset()?;
            info!("Persisted config removed");
        }
    }

    Ok(())
}

fn show(config: &ConfigProvider) -> Result<()> {
    let effective = config.config();
    println!(
        "{}",
        serde_json::to_string_pretty(&effective).context("Failed to serialize config")?
    );
    report_fetch_error("dictionary", config.locale().error());
    report_fetch_error("theme", config.theme_provider().error());
    Ok(())
}

fn report_fetch_error(what: &str, error: Option<hearth_core::FetchError>) {
    if let Some(e) = error {
        warn!(error = %e, "Failed to load {what}");
    }
}

/// Parse `name=value`; numbers and booleans keep their type
fn parse_param(s: &str) -> Result<(String, ArgValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in `{s}`"));
    }
    let value = if let Ok(i) = value.parse::<i64>() {
        ArgValue::from(i)
    } else if let Ok(f) = value.parse::<f64>() {
        ArgValue::from(f)
    } else if let Ok(b) = value.parse::<bool>() {
        ArgValue::from(b)
    } else {
        ArgValue::from(value)
    };
    Ok((name.to_string(), value))
}
