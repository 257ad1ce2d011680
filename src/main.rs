mod bot;
mod server;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use creatorflow_core::config;
use creatorflow_store::Store;
use creatorflow_telegram::TelegramApi;
use tracing::warn;

use bot::Bot;
use server::AppState;

#[derive(Parser)]
#[command(
    name = "creatorflow",
    version,
    about = "CreatorFlow — Telegram intake bot for the content tracker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server.
    Start,
    /// Check configuration, database, and Telegram API access.
    Status,
    /// Manage CreatorFlow accounts.
    #[command(subcommand)]
    User(UserCommands),
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create an account.
    Add {
        /// Name the bot greets this account with.
        display_name: String,
    },
    /// Issue a one-time Telegram linking code for an account.
    Link {
        /// The account's user id.
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.creatorflow.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let Some(token) = cfg.telegram.resolve_token() else {
                anyhow::bail!(
                    "Telegram bot_token is empty. \
                     Set it in config.toml or TELEGRAM_BOT_TOKEN env var."
                );
            };

            let store = Store::new(&cfg.database).await?;
            let api = TelegramApi::new(&token);

            if cfg.telegram.webhook_url.is_empty() {
                warn!("telegram.webhook_url is empty, skipping webhook registration");
            } else if let Err(e) = api
                .set_webhook(&cfg.telegram.webhook_url, &cfg.telegram.webhook_secret)
                .await
            {
                warn!("webhook registration failed: {e}");
            }
            api.register_commands().await;

            let bot = Bot::new(store, Arc::new(api), cfg.telegram.site_url.clone());
            let state = AppState {
                bot: Arc::new(bot),
                webhook_secret: cfg.telegram.webhook_secret.clone(),
            };

            let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
            println!("CreatorFlow — listening on {addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, server::build_router(state)).await?;
        }
        Commands::Status => {
            println!("CreatorFlow — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Data dir: {}", cfg.creatorflow.data_dir);
            println!();

            let store = Store::new(&cfg.database).await?;
            let size = store.db_size().await?;
            println!("  database: ok ({size} bytes)");

            match cfg.telegram.resolve_token() {
                Some(token) => {
                    let api = TelegramApi::new(&token);
                    match api.get_me().await {
                        Ok(me) => {
                            let name = me.username.unwrap_or(me.first_name);
                            println!("  telegram: @{name} reachable");
                        }
                        Err(e) => println!("  telegram: unreachable ({e})"),
                    }
                }
                None => println!("  telegram: missing bot_token"),
            }

            println!(
                "  webhook: {}",
                if cfg.telegram.webhook_url.is_empty() {
                    "not configured"
                } else {
                    &cfg.telegram.webhook_url
                }
            );
        }
        Commands::User(cmd) => {
            let store = Store::new(&cfg.database).await?;
            match cmd {
                UserCommands::Add { display_name } => {
                    let user_id = store.create_user(&display_name).await?;
                    println!("Created account {user_id} for {display_name}");
                    println!("Next: creatorflow user link {user_id}");
                }
                UserCommands::Link { user_id } => {
                    let token = store.issue_linking_token(&user_id).await?;
                    println!("One-time linking code for {user_id}: {token}");
                    println!("Send the bot: /start {token}");
                }
            }
        }
    }

    Ok(())
}
