//! `info` — look up general information about a channel

use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{fetch, Api, ModwatchError};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "info",
        summary: "Query channel and user information",
        details: "Look up general information about a Twitch channel.",
        arg_summary: "<CHANNEL>",
        arg_details: &[(
            "CHANNEL",
            "Name of the channel for which to return information",
        )],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let channel = ctx
        .args
        .first()
        .ok_or_else(|| ModwatchError::UsageError("channel name expected".into()))?;
    let resource = format!("users?login={}", channel);
    let response = fetch(ctx.dispatcher, Api::Helix, &resource)
        .map_err(ModwatchError::ApiError)?;
    let user = &response["data"][0];
    if user.is_null() {
        return Err(ModwatchError::LookupError(format!(
            "no such channel '{}'",
            channel
        )));
    }
    println!("ID:           {}", user["id"].as_str().unwrap_or(""));
    println!("Login:        {}", user["login"].as_str().unwrap_or(""));
    println!("Display name: {}", user["display_name"].as_str().unwrap_or(""));
    println!("Type:         {}", user["broadcaster_type"].as_str().unwrap_or(""));
    println!("Views:        {}", user["view_count"].as_i64().unwrap_or(0));
    let description = user["description"].as_str().unwrap_or("");
    if !description.is_empty() {
        println!("Description:  {}", description);
    }
    Ok(())
}
