//! `following` — check which of a set of users follow each other

use super::RULE;
use crate::registry::{Command, CommandContext, Registry};
use log::warn;
use modwatch_core::{fetch, Api, ModwatchError};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

const MAX_USERS: usize = 100;

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "following",
        summary: "Check if users are following each other",
        details: "For a given set of users, check which ones are following \
                  the others.",
        arg_summary: "<USER>...",
        arg_details: &[("USER", "Name of one user to query (list at least two)")],
        execute: run,
    });
}

/// Builds the batch `users` lookup resource for a set of login names.
fn logins_query(logins: &[String]) -> String {
    let mut resource = String::from("users");
    for (i, login) in logins.iter().enumerate() {
        resource.push(if i == 0 { '?' } else { '&' });
        resource.push_str("login=");
        resource.push_str(login);
    }
    resource
}

fn run(ctx: &CommandContext) -> Result<(), ModwatchError> {
    if ctx.args.len() < 2 {
        return Err(ModwatchError::UsageError(
            "at least two user names expected".into(),
        ));
    }
    if ctx.args.len() > MAX_USERS {
        return Err(ModwatchError::UsageError(format!(
            "too many user names provided ({} maximum)",
            MAX_USERS
        )));
    }
    let mut unresolved: Vec<&str> = ctx.args.iter().map(String::as_str).collect();
    let mut ids_by_login: BTreeMap<String, u64> = BTreeMap::new();
    match fetch(ctx.dispatcher, Api::Helix, &logins_query(ctx.args)) {
        Ok(response) => {
            for user in response["data"].as_array().into_iter().flatten() {
                let id = match user["id"].as_str().and_then(|raw| raw.parse::<u64>().ok()) {
                    Some(id) => id,
                    None => continue,
                };
                if let Some(login) = user["login"].as_str() {
                    ids_by_login.insert(login.to_string(), id);
                    unresolved.retain(|name| *name != login);
                }
            }
        }
        Err(status) => return Err(ModwatchError::ApiError(status)),
    }
    for name in &unresolved {
        warn!("Could not get ID of user '{}'", name);
    }
    if ids_by_login.len() < 2 {
        return Err(ModwatchError::LookupError(
            "at least two user IDs needed to compare followers".into(),
        ));
    }
    println!("{}", RULE);
    'outer: for (_, &to_id) in &ids_by_login {
        for (_, &from_id) in &ids_by_login {
            if to_id == from_id {
                continue;
            }
            if ctx.shutdown.load(Ordering::Relaxed) {
                break 'outer;
            }
            let resource = format!("users/follows?to_id={}&from_id={}", to_id, from_id);
            if let Ok(response) = fetch(ctx.dispatcher, Api::Helix, &resource) {
                for follow in response["data"].as_array().into_iter().flatten() {
                    println!(
                        "{} followed {} at {}",
                        follow["from_name"].as_str().unwrap_or(""),
                        follow["to_name"].as_str().unwrap_or(""),
                        follow["followed_at"].as_str().unwrap_or("")
                    );
                }
            }
        }
    }
    println!("{}", RULE);
    Ok(())
}
