pub mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "staydesk-api")]
#[command(about = "StayDesk API - multi-tenant property management backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Mint a session token for local development")]
    Token {
        #[arg(long, help = "User id placed in the token subject")]
        user: Uuid,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(config, port).await,
        Commands::Token { user, email } => commands::token::handle(&config, user, email),
    }
}
