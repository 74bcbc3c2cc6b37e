//! The individual commands and their registration

use crate::registry::Registry;

pub mod api;
pub mod ban_events;
pub mod bans;
pub mod followers;
pub mod following;
pub mod info;
pub mod oauth_authorize;
pub mod oauth_revoke;
pub mod oauth_validate;

/// Horizontal rule printed around listing output.
pub const RULE: &str = "--------------------------------------------------";

/// Registers every command. Called once at startup; plain function calls,
/// so the set of commands is visible in one place and needs no load-time
/// magic.
pub fn register_all(registry: &mut Registry) {
    api::register(registry);
    ban_events::register(registry);
    bans::register(registry);
    followers::register(registry);
    following::register(registry);
    info::register(registry);
    oauth_authorize::register(registry);
    oauth_revoke::register(registry);
    oauth_validate::register(registry);
}
