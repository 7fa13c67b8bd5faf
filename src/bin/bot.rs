//! Demo dispatcher wiring the gate into a serenity event handler.
//!
//! Handlers here only log; the point of the binary is to show the
//! collaborator contract: the dispatcher builds the invocation context,
//! filters disabled commands before calling `execute`, and handles
//! handler failures itself.

use anyhow::Result;
use log::{error, info};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::time::Duration;

use gatekeeper::command::{Command, CommandOptions};
use gatekeeper::config::Config;
use gatekeeper::context::{CommandContext, Module};
use gatekeeper::decorators::{dm_only, guild_only, rate_limit};

struct Handler {
    commands: Vec<Command>,
    prefix: String,
}

impl Handler {
    fn new(config: &Config) -> Result<Self> {
        Ok(Handler {
            commands: build_commands(config)?,
            prefix: config.command_prefix.clone(),
        })
    }

    fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| {
            c.name().eq_ignore_ascii_case(name)
                || c.options
                    .aliases
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }
}

fn build_commands(config: &Config) -> Result<Vec<Command>> {
    let module = Module::new("demo");
    let limited = rate_limit(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );

    let mut ping = Command::new(
        "ping",
        |_module, ctx| async move {
            info!("🏓 Pong! (user {})", ctx.author);
            Ok(())
        },
        CommandOptions {
            aliases: vec!["p".to_string()],
            module: Some(module.clone()),
            ..Default::default()
        },
    )?;
    limited.apply(&mut ping)?;

    let mut whoami = Command::new(
        "whoami",
        |module, ctx| async move {
            let owner = module.map(|m| m.name.clone()).unwrap_or_default();
            info!("👤 User {} checked in over DM (module '{}')", ctx.author, owner);
            Ok(())
        },
        CommandOptions {
            module: Some(module.clone()),
            ..Default::default()
        },
    )?;
    dm_only().apply(&mut whoami)?;
    limited.apply(&mut whoami)?;

    let mut server = Command::new(
        "server",
        |_module, ctx| async move {
            match ctx.guild {
                Some(guild) => info!("🏠 Guild {} asked for server info", guild),
                None => info!("Server command ran without a guild reference"),
            }
            Ok(())
        },
        CommandOptions {
            module: Some(module),
            ..Default::default()
        },
    )?;
    guild_only().apply(&mut server)?;
    limited.apply(&mut server)?;

    Ok(vec![ping, whoami, server])
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let content = msg.content.trim();
        let rest = match content.strip_prefix(&self.prefix) {
            Some(rest) => rest,
            None => return,
        };
        let name = match rest.split_whitespace().next() {
            Some(name) => name,
            None => return,
        };

        let command = match self.find_command(name) {
            Some(command) => command,
            None => return,
        };

        // disabled commands are filtered here, before execute is called
        if !command.is_enabled() {
            info!("Skipping disabled command '{}'", command.name());
            return;
        }

        let invocation = CommandContext::from_message(&msg);
        if let Err(e) = command.execute(invocation).await {
            error!("Error running command '{}': {}", command.name(), e);
            if let Err(why) = msg
                .channel_id
                .say(&ctx.http, "Sorry, I encountered an error running that command.")
                .await
            {
                error!("Failed to send error message: {}", why);
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🚪 Gate armed with {} commands", self.commands.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting gatekeeper demo bot...");

    let handler = Handler::new(&config)?;

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
