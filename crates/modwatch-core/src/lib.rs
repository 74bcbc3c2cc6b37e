//! Core library for the modwatch moderation/audit client
//!
//! Everything a command needs to talk to the Twitch REST APIs lives here:
//! the rate-limited call dispatcher, the cursor pagination driver, the
//! one-shot signal used to bridge async completions back into sequential
//! command code, and the configuration types shared with the CLI.

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod oneshot;
pub mod pagination;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use dispatch::{Api, ClientConfig, Dispatcher};
pub use errors::ModwatchError;
pub use oneshot::OneShot;
pub use pagination::{fetch, paginate, PageFlow};
pub use transport::{ApiRequest, HttpTransport, Method, Transport, TRANSPORT_FAILED};
