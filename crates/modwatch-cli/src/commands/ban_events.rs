//! `ban-events` — list a channel's ban/unban events

use super::RULE;
use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{paginate, Api, ModwatchError, PageFlow};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "ban-events",
        summary: "List channel ban events",
        details: "List all channel ban/unban events.",
        arg_summary: "<CHANNEL>",
        arg_details: &[(
            "CHANNEL",
            "Name of the channel for which to list ban events",
        )],
        execute: run,
    });
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    let channel = ctx
        .args
        .first()
        .ok_or_else(|| ModwatchError::UsageError("channel name expected".into()))?;
    let channel_id = ctx.dispatcher.user_id_by_login(channel).ok_or_else(|| {
        ModwatchError::LookupError(format!("could not get ID of channel '{}'", channel))
    })?;
    let resource = format!(
        "moderation/banned/events?broadcaster_id={}&first=100",
        channel_id
    );
    println!("{}", RULE);
    let mut total_events = 0usize;
    paginate(ctx.dispatcher, Api::Helix, &resource, ctx.shutdown, |page| {
        for event in page["data"].as_array().into_iter().flatten() {
            let event_data = &event["event_data"];
            let user_id = match event_data["user_id"]
                .as_str()
                .and_then(|raw| raw.parse::<u64>().ok())
            {
                Some(id) => id,
                None => continue,
            };
            total_events += 1;
            println!(
                "{}: {} for {} ({})",
                event["event_timestamp"].as_str().unwrap_or(""),
                event["event_type"].as_str().unwrap_or(""),
                event_data["user_name"].as_str().unwrap_or(""),
                user_id
            );
        }
        PageFlow::Continue
    });
    println!("{}", RULE);
    println!(
        "Channel '{}' has had {} total ban/unban events.",
        channel, total_events
    );
    Ok(())
}
