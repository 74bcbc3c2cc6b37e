//! `followers` — download a user's follower list

use super::RULE;
use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{paginate, Api, ModwatchError, PageFlow};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "followers",
        summary: "Download follower list",
        details: "Download complete follower list.",
        arg_summary: "<USER>",
        arg_details: &[(
            "USER",
            "Name of the user for which to download follower information",
        )],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let user = ctx
        .args
        .first()
        .ok_or_else(|| ModwatchError::UsageError("user name expected".into()))?;
    let user_id = ctx.dispatcher.user_id_by_login(user).ok_or_else(|| {
        ModwatchError::LookupError(format!("could not get ID of user '{}'", user))
    })?;
    let resource = format!("users/follows?to_id={}&first=100", user_id);
    println!("{}", RULE);
    let mut total = 0i64;
    paginate(ctx.dispatcher, Api::Helix, &resource, ctx.shutdown, |page| {
        if let Some(reported) = page["total"].as_i64() {
            total = reported;
        }
        for follower in page["data"].as_array().into_iter().flatten() {
            println!(
                "{} - {}",
                follower["followed_at"].as_str().unwrap_or(""),
                follower["from_name"].as_str().unwrap_or("")
            );
        }
        PageFlow::Continue
    });
    println!("{}", RULE);
    println!("User '{}' has {} total followers.", user, total);
    Ok(())
}
