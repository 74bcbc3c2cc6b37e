//! `kraken` / `helix` — raw API escape hatches
//!
//! Issue an arbitrary resource request against either API generation and
//! pretty-print whatever comes back.

use crate::registry::{Command, CommandContext, Registry};
use modwatch_core::{fetch, Api, ModwatchError};

pub fn register(registry: &mut Registry) {
    registry.add(Command {
        name: "kraken",
        summary: "Issue a Kraken API request",
        details: "Issue a Kraken API request.",
        arg_summary: "<RESOURCE>",
        arg_details: &[("RESOURCE", "Name of the API endpoint resource to request")],
        execute: run_kraken,
    });
    registry.add(Command {
        name: "helix",
        summary: "Issue a Helix API request",
        details: "Issue a Helix API request.",
        arg_summary: "<RESOURCE>",
        arg_details: &[("RESOURCE", "Name of the API endpoint resource to request")],
        execute: run_helix,
    });
}

fn run_kraken(ctx: &CommandContext) -> Result<(), ModwatchError> {
    run(ctx, Api::Kraken)
}

fn run_helix(ctx: &CommandContext) -> Result<(), ModwatchError> {
    run(ctx, Api::Helix)
}

fn run(ctx: &CommandContext, api: Api) -> Result<(), ModwatchError> {
    let resource = ctx
        .args
        .first()
        .ok_or_else(|| ModwatchError::UsageError("resource expected".into()))?;
    let response = fetch(ctx.dispatcher, api, resource).map_err(ModwatchError::ApiError)?;
    let pretty = serde_json::to_string_pretty(&response)
        .unwrap_or_else(|_| response.to_string());
    println!("{}", pretty);
    Ok(())
}
