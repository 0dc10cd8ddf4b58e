use futures::future::BoxFuture;
use tracing::{error, info};

use super::parser::SlashCommand;
use super::router::{CommandTable, split_command_line};
use crate::api::{routes, signature};
use crate::core::config::AppConfig;
use crate::mattermost::Platform;
use crate::mattermost::dialog::build_create_dialog;
use crate::mattermost::response_builder::{CommandResponse, ephemeral, ephemeral_attachment};
use crate::notice::digest::fetch_digest;
use crate::notice::membership::ensure_registered;
use crate::notice::messages;
use crate::notify::NotificationService;

/// Word that starts every command line.
pub const TRIGGER: &str = "/mbotc";

pub const HELP_TEXT: &str = "###### Mattermost MBotC Plugin - Slash Command Help\n\
    * `/mbotc help` - Show this help text.\n\
    * `/mbotc create` - Open a dialog to register a notification.\n\
    * `/mbotc today` - List the notifications due today.\n";

/// What a command handler can reach while answering one command.
pub struct CommandContext<'a> {
    pub config: &'a AppConfig,
    pub platform: &'a dyn Platform,
    pub notifications: &'a dyn NotificationService,
    pub command: &'a SlashCommand,
    pub correlation_id: &'a str,
}

pub type CommandHandler =
    for<'a> fn(&'a CommandContext<'a>, &'a [&'a str]) -> BoxFuture<'a, CommandResponse>;

/// The command table; `help` doubles as the fallback.
#[must_use]
pub fn command_table() -> CommandTable<CommandHandler> {
    CommandTable::new(execute_help as CommandHandler)
        .with("help", execute_help)
        .with("create", execute_create)
        .with("today", execute_today)
}

/// Resolves the command line of `ctx.command` against `table` and runs the
/// matching handler.
pub async fn dispatch(
    table: &CommandTable<CommandHandler>,
    ctx: &CommandContext<'_>,
) -> CommandResponse {
    let line = ctx.command.command_line();
    let Some(args) = split_command_line(&line, TRIGGER) else {
        return help();
    };

    let resolved = table.resolve(&args);
    info!(
        correlation_id = %ctx.correlation_id,
        path = resolved.path.unwrap_or("<default>"),
        "Dispatching slash command"
    );
    (resolved.handler)(ctx, resolved.args).await
}

fn help() -> CommandResponse {
    ephemeral(HELP_TEXT)
}

fn execute_help<'a>(
    _ctx: &'a CommandContext<'a>,
    _args: &'a [&'a str],
) -> BoxFuture<'a, CommandResponse> {
    Box::pin(async { help() })
}

fn execute_create<'a>(
    ctx: &'a CommandContext<'a>,
    _args: &'a [&'a str],
) -> BoxFuture<'a, CommandResponse> {
    Box::pin(async move {
        let command = ctx.command;
        if let Err(denied) = ensure_registered(ctx.notifications, &command.user_id).await {
            return ephemeral(&denied.message(&ctx.config.client_url));
        }

        let state = signature::sign_dialog_state(
            &ctx.config.signing_secret,
            &command.user_id,
            &command.channel_id,
        );
        let dialog = build_create_dialog(&state);
        let callback_url = format!("{}{}", ctx.config.public_url, routes::CREATE_WITH_COMMAND);

        match ctx
            .platform
            .open_dialog(&command.trigger_id, &callback_url, &dialog)
            .await
        {
            Ok(()) => ephemeral(""),
            Err(e) => {
                error!(
                    correlation_id = %ctx.correlation_id,
                    "Failed to open creation dialog: {}", e
                );
                ephemeral(&messages::with_ref(messages::SOMETHING_WRONG, ctx.correlation_id))
            }
        }
    })
}

fn execute_today<'a>(
    ctx: &'a CommandContext<'a>,
    _args: &'a [&'a str],
) -> BoxFuture<'a, CommandResponse> {
    Box::pin(async move {
        let user_id = &ctx.command.user_id;
        if let Err(denied) = ensure_registered(ctx.notifications, user_id).await {
            return ephemeral(&denied.message(&ctx.config.client_url));
        }

        let today = ctx.config.now();
        match fetch_digest(ctx.notifications, user_id, &ctx.config.client_url, &today).await {
            Ok(card) => ephemeral_attachment(card),
            Err(e) => {
                error!(
                    correlation_id = %ctx.correlation_id,
                    "Failed to fetch today's notifications: {}", e
                );
                ephemeral(&messages::with_ref(messages::SOMETHING_WRONG, ctx.correlation_id))
            }
        }
    })
}
