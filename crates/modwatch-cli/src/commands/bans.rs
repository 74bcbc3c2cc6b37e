//! `bans` — download or query a channel's banned users list

use super::RULE;
use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{paginate, Api, ModwatchError, PageFlow};
use std::collections::HashSet;

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "bans",
        summary: "Download or query banned users list",
        details: "Download complete banned users list, or query the list to \
                  see if a specific user is banned.",
        arg_summary: "<CHANNEL> [USER]",
        arg_details: &[
            (
                "CHANNEL",
                "Name of the channel for which to download banned user list",
            ),
            ("USER", "Name of the user to check if banned"),
        ],
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
    let target = match ctx.args.get(1) {
        Some(name) => {
            let id = ctx.dispatcher.user_id_by_login(name).ok_or_else(|| {
                ModwatchError::LookupError(format!("could not get ID of user '{}'", name))
            })?;
            Some((name.as_str(), id))
        }
        None => None,
    };
    let mut resource = format!("moderation/banned?broadcaster_id={}", channel_id);
    match target {
        Some((_, target_id)) => resource.push_str(&format!("&user_id={}", target_id)),
        None => resource.push_str("&first=100"),
    }
    let mut banned: HashSet<u64> = HashSet::new();
    if target.is_none() {
        println!("{}", RULE);
    }
    paginate(ctx.dispatcher, Api::Helix, &resource, ctx.shutdown, |page| {
        let mut new_ids = 0usize;
        for entry in page["data"].as_array().into_iter().flatten() {
            let id = match entry["user_id"].as_str().and_then(|raw| raw.parse::<u64>().ok()) {
                Some(id) => id,
                None => continue,
            };
            if banned.insert(id) {
                new_ids += 1;
                if target.is_none() {
                    println!("{} ({})", entry["user_name"].as_str().unwrap_or(""), id);
                }
            }
        }
        // Stop once a page contributes nothing new, even if the endpoint
        // keeps returning a cursor.
        if new_ids > 0 {
            PageFlow::Continue
        } else {
            PageFlow::Stop
        }
    });
    match target {
        None => {
            println!("{}", RULE);
            println!("Channel '{}' has {} total Bans.", channel, banned.len());
        }
        Some((name, id)) => {
            println!(
                "User {} ({}) {}.",
                name,
                id,
                if banned.is_empty() {
                    "is not banned"
                } else {
                    "is banned"
                }
            );
        }
    }
    Ok(())
}
