//! `oauth-revoke` — revoke the configured OAuth token

use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{fetch, Api, ModwatchError};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "oauth-revoke",
        summary: "Revoke OAuth token",
        details: "Revoke configured OAuth token.",
        arg_summary: "",
        arg_details: &[],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let token = ctx.config.oauth_token.as_ref().ok_or_else(|| {
        ModwatchError::ConfigError("no OAuth token configured".into())
    })?;
    let url = format!(
        "id.twitch.tv/oauth2/revoke?client_id={}&token={}",
        ctx.config.client_id, token
    );
    match fetch(ctx.dispatcher, Api::RawPost, &url) {
        Ok(_) => println!("OAuth token revoked."),
        Err(_) => println!("OAuth token invalid."),
    }
    Ok(())
}
