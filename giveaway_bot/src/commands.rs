//! Text commands: `giveaway`, `list_giveaways` and `clear_all`.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    duration::parse_duration,
    engine::{GiveawayEngine, StartRequest},
    error::GiveawayError,
    gateway::{mention, ChatGateway},
    giveaway::Giveaway,
};

static ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("argument pattern is valid"));

const DEFAULT_PURGE_LIMIT: usize = 100;
const PURGE_NOTICE_TTL: Duration = Duration::from_secs(5);

const GIVEAWAY_USAGE: &str =
    "Please provide all required arguments: `!giveaway <time> <winners> <prizes>`";
const CLEAR_USAGE: &str = "Please provide a valid message count: `!clear_all [limit]`";
const START_FAILED: &str = "There was an issue with the giveaway. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Giveaway(Vec<String>),
    ListGiveaways,
    ClearAll(Option<String>),
}

impl Command {
    /// Parse `content` as a command. `None` when it is ordinary chat.
    pub fn parse(prefix: &str, content: &str) -> Option<Command> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let mut args = split_args(body).into_iter();
        match args.next()?.as_str() {
            "giveaway" => Some(Command::Giveaway(args.collect())),
            "list_giveaways" => Some(Command::ListGiveaways),
            "clear_all" => Some(Command::ClearAll(args.next())),
            _ => None,
        }
    }
}

/// Whitespace separated arguments; double quotes group words.
fn split_args(body: &str) -> Vec<String> {
    ARG.captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Who sent a command, and where.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub channel: String,
    pub author: String,
}

pub struct CommandSurface {
    engine: Arc<GiveawayEngine>,
    gateway: Arc<dyn ChatGateway>,
}

impl CommandSurface {
    pub fn new(engine: Arc<GiveawayEngine>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self { engine, gateway }
    }

    /// Run `content` if it is a command. Returns whether it was one.
    pub async fn dispatch(&self, ctx: &CommandContext, content: &str) -> bool {
        let Some(command) = Command::parse(&self.engine.settings().prefix, content) else {
            return false;
        };
        debug!(author = %ctx.author, channel = %ctx.channel, ?command, "command received");

        if let Err(e) = self.authorize(&ctx.author).await {
            info!(author = %ctx.author, error = %e, "command refused");
            self.reply(
                ctx,
                &format!(
                    "{}, you do not have the required role to use this command.",
                    mention(&ctx.author)
                ),
            )
            .await;
            return true;
        }

        match command {
            Command::Giveaway(args) => self.start_giveaway(ctx, args).await,
            Command::ListGiveaways => self.list_giveaways(ctx).await,
            Command::ClearAll(limit) => self.clear_all(ctx, limit).await,
        }
        true
    }

    async fn authorize(&self, user: &str) -> Result<(), GiveawayError> {
        let role = &self.engine.settings().organizer_role;
        let roles = self.gateway.list_roles(user).await.unwrap_or_else(|e| {
            warn!(user, error = %e, "role lookup failed");
            Default::default()
        });
        if self.engine.settings().is_organizer(&roles) {
            Ok(())
        } else {
            Err(GiveawayError::MissingPermission { role: role.clone() })
        }
    }

    async fn start_giveaway(&self, ctx: &CommandContext, args: Vec<String>) {
        let request = match parse_start(&ctx.channel, args) {
            Ok(request) => request,
            Err(message) => return self.reply(ctx, &message).await,
        };

        match self.engine.start(request).await {
            Ok(started) => debug!(giveaway = %started.id, "lifecycle detached"),
            Err(GiveawayError::Gateway(e)) => {
                warn!(channel = %ctx.channel, error = %e, "failed to announce giveaway");
                self.reply(ctx, START_FAILED).await;
            }
            Err(
                e @ (GiveawayError::InvalidArgument(_) | GiveawayError::InvalidDurationFormat(_)),
            ) => self.reply(ctx, &e.to_string()).await,
            Err(e) => {
                warn!(channel = %ctx.channel, error = %e, "giveaway could not be started");
                self.reply(ctx, START_FAILED).await;
            }
        }
    }

    async fn list_giveaways(&self, ctx: &CommandContext) {
        let active = self.engine.list_active().await;
        self.reply(ctx, &render_active(&active)).await;
    }

    async fn clear_all(&self, ctx: &CommandContext, limit: Option<String>) {
        let limit = match limit.as_deref().map(str::parse::<usize>) {
            None => DEFAULT_PURGE_LIMIT,
            Some(Ok(n)) if n > 0 => n,
            Some(_) => return self.reply(ctx, CLEAR_USAGE).await,
        };

        match self.gateway.purge_channel(&ctx.channel, limit).await {
            Ok(deleted) => {
                info!(channel = %ctx.channel, deleted, "channel purged");
                let notice = match self
                    .gateway
                    .send_message(&ctx.channel, &format!("Deleted {deleted} message(s)!"))
                    .await
                {
                    Ok(notice) => notice,
                    Err(e) => {
                        warn!(channel = %ctx.channel, error = %e, "failed to confirm purge");
                        return;
                    }
                };

                let gateway = self.gateway.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(PURGE_NOTICE_TTL).await;
                    if let Err(e) = gateway.delete_message(&notice).await {
                        debug!(message = %notice, error = %e, "failed to remove purge notice");
                    }
                });
            }
            Err(e) => self.reply(ctx, &format!("An error occurred: {e}")).await,
        }
    }

    async fn reply(&self, ctx: &CommandContext, text: &str) {
        if let Err(e) = self.gateway.send_message(&ctx.channel, text).await {
            warn!(channel = %ctx.channel, error = %e, "failed to reply");
        }
    }
}

/// Validate `giveaway` arguments in the order users see the errors.
fn parse_start(channel: &str, args: Vec<String>) -> Result<StartRequest, String> {
    let mut args = args.into_iter();
    let (Some(time), Some(winners)) = (args.next(), args.next()) else {
        return Err(GIVEAWAY_USAGE.to_string());
    };

    let winner_count = match winners.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err("Number of winners must be a positive number!".to_string()),
    };
    let prizes: Vec<String> = args.collect();
    if prizes.is_empty() {
        return Err("Please provide at least one prize.".to_string());
    }
    let duration = parse_duration(&time).map_err(|e| e.to_string())?;

    Ok(StartRequest {
        channel: channel.to_string(),
        duration,
        winner_count,
        prizes,
    })
}

fn render_active(active: &[Giveaway]) -> String {
    if active.is_empty() {
        return "No active giveaways.".to_string();
    }
    let lines: Vec<String> = active
        .iter()
        .map(|g| {
            format!(
                "Giveaway ID: {} | Prize(s): {} | Ends at: {}",
                g.id(),
                g.prizes().join(", "),
                g.end_time().format("%Y-%m-%d %H:%M:%S UTC")
            )
        })
        .collect();
    format!("Active giveaways:\n{}", lines.join("\n"))
}
