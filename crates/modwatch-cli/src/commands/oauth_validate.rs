//! `oauth-validate` — validate the configured OAuth token

use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{fetch, Api, ModwatchError};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "oauth-validate",
        summary: "Validate OAuth token",
        details: "Validate configured OAuth token.",
        arg_summary: "",
        arg_details: &[],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let response =
        fetch(ctx.dispatcher, Api::OAuth2, "validate").map_err(ModwatchError::ApiError)?;
    println!("Login: {}", response["login"].as_str().unwrap_or(""));
    println!("Expires in: {}", response["expires_in"].as_i64().unwrap_or(0));
    println!("Scopes:");
    for scope in response["scopes"].as_array().into_iter().flatten() {
        println!("  {}", scope.as_str().unwrap_or(""));
    }
    Ok(())
}
