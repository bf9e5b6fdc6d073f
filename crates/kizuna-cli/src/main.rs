//! Kizuna CLI - Call operations and score history
//!
//! Simple CLI for operating the Kizuna API without raw curl.

mod api;
mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use uuid::Uuid;

use api::KizunaClient;
use config::Config;

#[derive(Parser)]
#[command(name = "kizuna")]
#[command(about = "Kizuna CLI - voice companion call operations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Prepare a call and print the connection bundle
    Call {
        /// User ID
        user_id: Uuid,

        /// Phone number to dial; omitting it only prepares the bundle
        #[arg(short, long)]
        number: Option<String>,
    },

    /// Show score history for a user
    History {
        /// User ID
        user_id: Uuid,

        /// Number of events to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key),
        Commands::Call { user_id, number } => cmd_call(user_id, number).await,
        Commands::History { user_id, limit } => cmd_history(user_id, limit).await,
        Commands::Health => cmd_health().await,
    }
}

fn cmd_login(key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => Password::new()
            .with_prompt("API key")
            .interact()?,
    };

    let mut config = Config::load()?;
    config.set_api_key(key);
    config.save()?;

    println!("{}", "✅ API key saved".green());
    println!("Config: {:?}", Config::config_path()?);
    Ok(())
}

fn client() -> Result<KizunaClient> {
    let config = Config::load()?;
    let Some(api_key) = config.api_key else {
        bail!("Not logged in. Run `kizuna login` first.");
    };
    Ok(KizunaClient::new(&config.base_url, &api_key))
}

async fn cmd_call(user_id: Uuid, number: Option<String>) -> Result<()> {
    let client = client()?;

    match number {
        Some(number) => {
            let result = client.outbound_call(user_id, &number).await?;
            if result.success {
                println!(
                    "{} call {}",
                    "📞 Placed".green(),
                    result.call_id.unwrap_or_default().bold()
                );
            } else {
                println!("{} {}", "❌".red(), result.message);
                if let Some(error) = result.error {
                    println!("   {}", error.dimmed());
                }
            }
        }
        None => {
            let bundle = client.initiate_call(user_id).await?;
            println!("{}", "📦 Connection bundle".green());
            println!("  session: {}", bundle.session_id.bold());
            println!("  agent:   {}", bundle.agent_id.unwrap_or_default());
            println!("  token:   {}", bundle.token.dimmed());
        }
    }

    Ok(())
}

async fn cmd_history(user_id: Uuid, limit: usize) -> Result<()> {
    let client = client()?;
    let events = client.history(user_id).await?;

    if events.is_empty() {
        println!("{}", "No calls recorded yet".dimmed());
        return Ok(());
    }

    for event in events.iter().take(limit) {
        let arrow = if event.new_score >= event.old_score {
            "↑".green()
        } else {
            "↓".red()
        };
        println!(
            "{} {} {:.1} {} {:.1}  ({}s)  {}",
            event.created_at.dimmed(),
            event.event_type.bold(),
            event.old_score,
            arrow,
            event.new_score,
            event.duration_seconds,
            event.explanation
        );
    }

    Ok(())
}

async fn cmd_health() -> Result<()> {
    let config = Config::load()?;
    let client = KizunaClient::new(&config.base_url, config.api_key.as_deref().unwrap_or(""));

    if client.health().await? {
        println!("{} {}", "✅".green(), config.base_url);
    } else {
        println!("{} {}", "❌".red(), config.base_url);
    }

    Ok(())
}
