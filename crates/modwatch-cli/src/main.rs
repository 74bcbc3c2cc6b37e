//! modwatch — moderation and audit queries against the Twitch REST APIs

use anyhow::{anyhow, Result};
use clap::Parser;
use log::LevelFilter;
use modwatch_core::{ClientConfig, Config, Dispatcher, HttpTransport, SystemClock};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod commands;
mod registry;
mod usage;

use registry::{CommandContext, Registry};

#[derive(Parser, Debug)]
#[clap(
    name = "modwatch",
    version = "0.1.0",
    about = "Moderation and audit queries against the Twitch APIs",
    disable_help_subcommand = true
)]
struct Cli {
    /// Path to the configuration file
    #[clap(long, short)]
    config: Option<PathBuf>,

    /// Log level filter (error, warn, info, debug, trace)
    #[clap(long, default_value = "warn")]
    log_level: String,

    /// Command to execute; use `help <CMD>` for command details
    command: Option<String>,

    /// Arguments for the command
    #[clap(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = LevelFilter::from_str(&cli.log_level)
        .map_err(|_| anyhow!("invalid log level '{}'", cli.log_level))?;
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let registry = Registry::build();
    let command_name = match &cli.command {
        Some(name) => name.as_str(),
        None => {
            usage::print_overall(&registry);
            return Ok(());
        }
    };
    if command_name == "help" {
        match cli.args.first() {
            Some(name) => match registry.get(name) {
                Some(command) => usage::print_command(command),
                None => {
                    usage::print_overall(&registry);
                    return Err(anyhow!("no such command '{}'", name));
                }
            },
            None => usage::print_overall(&registry),
        }
        return Ok(());
    }
    let command = registry.get(command_name).ok_or_else(|| {
        usage::print_overall(&registry);
        anyhow!("no such command '{}'", command_name)
    })?;

    let config = Config::discover(cli.config.as_deref())?;

    // Advisory shutdown flag, polled by commands between pages.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        })?;
    }

    let ca_bundle = config.ca_bundle_bytes()?;
    let transport = Arc::new(HttpTransport::new(ca_bundle.as_deref())?);
    let clock = Arc::new(SystemClock::new());
    let dispatcher = Dispatcher::new();
    dispatcher.start(
        ClientConfig {
            client_id: config.client_id.clone(),
            oauth_token: config.oauth_token.clone(),
            ..ClientConfig::default()
        },
        transport,
        clock,
    );

    let ctx = CommandContext {
        args: &cli.args,
        config: &config,
        dispatcher: &dispatcher,
        shutdown: &shutdown,
    };
    let result = (command.execute)(&ctx);
    dispatcher.stop();
    result?;
    Ok(())
}
