//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, sets up diagnostics, and hands
//! off to the interactive chat, the one-shot `say` command or configuration.

pub mod chat;
pub mod persona_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::chat::run_chat;
use crate::cli::persona_list::list_personas;
use crate::cli::say::run_say;
use crate::cli::settings::{run_set, run_unset};
use crate::commands::{ChatContext, ChatSession};
use crate::core::config::Config;
use crate::core::dispatch::Dispatcher;
use crate::core::fallback::FallbackSynthesizer;
use crate::core::persona::{parse_multiplier, ContextParams, Persona};
use crate::core::transport::{HttpTransport, Transport};
use crate::utils::logging::LoggingState;

/// Environment variable holding the diagnostic log filter.
pub const LOG_FILTER_ENV: &str = "SWITCHBOARD_LOG";

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version = VERSION)]
#[command(about = "Chat with operations personas, online or off")]
#[command(
    long_about = "Switchboard is a line-oriented chat client for a set of business personas \
(growth, infrastructure, operations, developer). Each persona keeps its own conversation and \
backend session. When the chat backend cannot be reached, a built-in responder answers from \
canned templates so the conversation can continue.\n\n\
Environment Variables:\n\
  SWITCHBOARD_BASE_URL   Chat backend base URL (defaults to http://localhost:8000/api)\n\
  SWITCHBOARD_LOG        Diagnostic log filter (defaults to warn)\n\n\
Commands:\n\
  /help             Show chat commands\n\
  /persona <id>     Switch persona\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Persona to chat as (growth, infra, ops, dev)
    #[arg(short = 'P', long, global = true, value_name = "PERSONA")]
    pub persona: Option<Persona>,

    /// Chat backend base URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Merchant id sent with growth and infra messages
    #[arg(short = 'm', long, global = true, value_name = "ID")]
    pub merchant: Option<String>,

    /// Traffic multiplier sent with infra messages
    #[arg(short = 'x', long, global = true, value_name = "N", value_parser = parse_multiplier)]
    pub multiplier: Option<u32>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic output to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the available personas
    Personas,
    /// Set configuration values, or show them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// Startup choices after merging command-line flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSettings {
    pub persona: Persona,
    pub base_url: String,
    pub params: ContextParams,
}

impl StartupSettings {
    pub fn resolve(args: &Args, config: &Config) -> Self {
        let persona = args.persona.unwrap_or_else(|| config.resolved_persona());
        let base_url = args
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| config.resolved_base_url());
        let defaults = config.context_params();
        let params = ContextParams::new(
            args.merchant.clone().or(defaults.merchant_id),
            args.multiplier.unwrap_or(defaults.multiplier),
        );
        Self {
            persona,
            base_url,
            params,
        }
    }
}

fn init_tracing(debug_log: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    match debug_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}

fn build_context(args: &Args, config: &Config) -> Result<ChatContext, Box<dyn Error>> {
    let settings = StartupSettings::resolve(args, config);
    tracing::info!(
        persona = settings.persona.id(),
        base_url = %settings.base_url,
        "starting session"
    );

    let transport: Box<dyn Transport> = Box::new(HttpTransport::with_timeout(
        settings.base_url,
        config.request_timeout(),
    )?);
    let dispatcher = Dispatcher::new(
        transport,
        FallbackSynthesizer::new(config.fallback_latency()),
    );
    let session = ChatSession::new(dispatcher, settings.persona, settings.params);
    let logging = LoggingState::new(args.log.clone())?;
    Ok(ChatContext::new(session, logging))
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;

    match args.command.clone().unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => run_set(key, value),
        Commands::Unset { key } => run_unset(key),
        Commands::Personas => {
            let config = Config::load()?;
            list_personas(args.persona.unwrap_or_else(|| config.resolved_persona()));
            Ok(())
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            run_say(build_context(&args, &config)?, prompt).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            run_chat(build_context(&args, &config)?).await
        }
    }
}
