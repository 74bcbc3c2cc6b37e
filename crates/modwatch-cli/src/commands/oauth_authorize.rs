//! `oauth-authorize` — request a new OAuth token

use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{fetch, Api, ModwatchError};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "oauth-authorize",
        summary: "Get OAuth token",
        details: "Get OAuth token using the OIDC implicit code flow.",
        arg_summary: "<REDIR> <SCOPE>...",
        arg_details: &[
            ("REDIR", "Redirect URI"),
            ("SCOPE", "A scope to request for the new token"),
        ],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let redirect_uri = ctx
        .args
        .first()
        .ok_or_else(|| ModwatchError::UsageError("redirect URI required".into()))?;
    let scopes = &ctx.args[1..];
    if scopes.is_empty() {
        return Err(ModwatchError::UsageError(
            "at least one OAuth scope required".into(),
        ));
    }
    let url = format!(
        "id.twitch.tv/oauth2/authorize?client_id={}&redirect_uri={}&response_type=token&scope={}",
        ctx.config.client_id,
        redirect_uri,
        scopes.join("%20")
    );
    let response = fetch(ctx.dispatcher, Api::RawGet, &url).map_err(ModwatchError::ApiError)?;
    println!("{}", response);
    Ok(())
}
