//! Cursor pagination driver and the blocking single-fetch helper
//!
//! Every listing command follows the same protocol: fetch a page, process
//! it, thread the opaque continuation cursor into the next request, stop on
//! an empty cursor or when the page handler says there is nothing new left.
//! Each fetch blocks on a fresh one-shot signal, so a paginating command
//! never has more than one call outstanding even though the dispatcher
//! itself is asynchronous.

use crate::dispatch::{Api, Dispatcher};
use crate::oneshot::OneShot;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What the page handler wants the driver to do after a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFlow {
    Continue,
    /// Stop even if the remote returned a non-empty cursor. This is how
    /// commands bound loops against endpoints that keep handing out cursors
    /// after the data has been exhausted.
    Stop,
}

/// Submits one call and blocks until it resolves, converting the two
/// continuations into a plain `Result`.
pub fn fetch(dispatcher: &Dispatcher, api: Api, resource: &str) -> Result<Value, u16> {
    let signal = Arc::new(OneShot::<Result<Value, u16>>::new());
    let resolved = Arc::clone(&signal);
    let failed = Arc::clone(&signal);
    dispatcher.submit(
        api,
        resource,
        move |response| {
            resolved.resolve(Ok(response));
        },
        move |status| {
            failed.resolve(Err(status));
        },
    );
    signal.wait()
}

/// Walks a paginated listing endpoint. `resource` must already carry its
/// query string; the driver appends `&after=<cursor>` from the second page
/// on. A failed fetch truncates the walk: pages processed so far stand, and
/// the command reports what it has. The shutdown flag is polled between
/// pages so an interrupt ends a long walk at the next page boundary.
pub fn paginate<F>(
    dispatcher: &Dispatcher,
    api: Api,
    resource: &str,
    shutdown: &AtomicBool,
    mut on_page: F,
) where
    F: FnMut(&Value) -> PageFlow,
{
    let mut cursor = String::new();
    loop {
        let page_resource = if cursor.is_empty() {
            resource.to_string()
        } else {
            format!("{}&after={}", resource, cursor)
        };
        let page = match fetch(dispatcher, api, &page_resource) {
            Ok(page) => page,
            Err(_) => return,
        };
        cursor = page["pagination"]["cursor"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        if on_page(&page) == PageFlow::Stop {
            return;
        }
        if cursor.is_empty() {
            return;
        }
        if shutdown.load(Ordering::Relaxed) {
            log::info!("interrupted; stopping pagination early");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, SystemClock};
    use crate::dispatch::ClientConfig;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::collections::HashSet;
    use std::time::Duration;

    fn scripted_dispatcher(transport: &Arc<ScriptedTransport>, clock: Arc<SystemClock>) -> Dispatcher {
        let dispatcher = Dispatcher::new();
        dispatcher.start(
            ClientConfig {
                client_id: "testclient".into(),
                oauth_token: None,
                cooldown: 0.0,
            },
            Arc::clone(transport) as _,
            clock,
        );
        dispatcher
    }

    fn page(cursor: &str, ids: std::ops::RangeInclusive<u64>) -> String {
        let data: Vec<Value> = ids
            .map(|id| json!({"user_id": id.to_string(), "user_name": format!("user{}", id)}))
            .collect();
        json!({"pagination": {"cursor": cursor}, "data": data}).to_string()
    }

    #[test]
    fn walks_three_pages_threading_the_cursor() {
        let clock: Arc<SystemClock> = Arc::new(SystemClock::new());
        let transport = Arc::new(ScriptedTransport::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::from_millis(1),
        ));
        transport.respond_with(200, &page("a", 1..=100));
        transport.respond_with(200, &page("b", 101..=200));
        transport.respond_with(200, &page("", 201..=250));
        let dispatcher = scripted_dispatcher(&transport, clock);
        let shutdown = AtomicBool::new(false);
        let mut items = 0usize;
        paginate(
            &dispatcher,
            Api::Helix,
            "moderation/banned?broadcaster_id=1&first=100",
            &shutdown,
            |page| {
                items += page["data"].as_array().map_or(0, Vec::len);
                PageFlow::Continue
            },
        );
        assert_eq!(items, 250);
        let log = transport.log();
        let issues = log.issues.lock().unwrap();
        let base = "https://api.twitch.tv/helix/moderation/banned?broadcaster_id=1&first=100";
        let urls: Vec<&str> = issues.iter().map(|(url, _)| url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                base.to_string(),
                format!("{}&after=a", base),
                format!("{}&after=b", base),
            ]
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn stops_when_a_page_adds_nothing_new_despite_a_cursor() {
        let clock: Arc<SystemClock> = Arc::new(SystemClock::new());
        let transport = Arc::new(ScriptedTransport::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::from_millis(1),
        ));
        transport.respond_with(200, &page("x", 1..=50));
        // The same ids again with yet another cursor; without the dedup
        // predicate this would loop forever.
        transport.respond_with(200, &page("y", 1..=50));
        transport.respond_with(200, &page("z", 1..=50));
        let dispatcher = scripted_dispatcher(&transport, clock);
        let shutdown = AtomicBool::new(false);
        let mut seen = HashSet::new();
        paginate(
            &dispatcher,
            Api::Helix,
            "moderation/banned?broadcaster_id=1&first=100",
            &shutdown,
            |page| {
                let mut new = 0usize;
                for entry in page["data"].as_array().into_iter().flatten() {
                    if let Some(id) = entry["user_id"].as_str() {
                        if seen.insert(id.to_string()) {
                            new += 1;
                        }
                    }
                }
                if new > 0 {
                    PageFlow::Continue
                } else {
                    PageFlow::Stop
                }
            },
        );
        assert_eq!(seen.len(), 50);
        assert_eq!(transport.log().issues.lock().unwrap().len(), 2);
    }

    #[test]
    fn a_failed_page_truncates_the_walk() {
        let clock: Arc<SystemClock> = Arc::new(SystemClock::new());
        let transport = Arc::new(ScriptedTransport::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::from_millis(1),
        ));
        transport.respond_with(200, &page("a", 1..=100));
        transport.respond_with(502, "");
        let dispatcher = scripted_dispatcher(&transport, clock);
        let shutdown = AtomicBool::new(false);
        let mut items = 0usize;
        paginate(
            &dispatcher,
            Api::Helix,
            "users/follows?to_id=1&first=100",
            &shutdown,
            |page| {
                items += page["data"].as_array().map_or(0, Vec::len);
                PageFlow::Continue
            },
        );
        // The first page's results stand; the walk just ends.
        assert_eq!(items, 100);
        assert_eq!(transport.log().issues.lock().unwrap().len(), 2);
    }

    #[test]
    fn shutdown_flag_stops_the_walk_between_pages() {
        let clock: Arc<SystemClock> = Arc::new(SystemClock::new());
        let transport = Arc::new(ScriptedTransport::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::from_millis(1),
        ));
        transport.respond_with(200, &page("a", 1..=100));
        transport.respond_with(200, &page("b", 101..=200));
        let dispatcher = scripted_dispatcher(&transport, clock);
        let shutdown = AtomicBool::new(false);
        paginate(
            &dispatcher,
            Api::Helix,
            "users/follows?to_id=1&first=100",
            &shutdown,
            |_| {
                shutdown.store(true, Ordering::Relaxed);
                PageFlow::Continue
            },
        );
        assert_eq!(transport.log().issues.lock().unwrap().len(), 1);
    }

    #[test]
    fn fetch_surfaces_the_failure_status() {
        let clock: Arc<SystemClock> = Arc::new(SystemClock::new());
        let transport = Arc::new(ScriptedTransport::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::from_millis(1),
        ));
        transport.respond_with(404, "{}");
        let dispatcher = scripted_dispatcher(&transport, clock);
        assert_eq!(
            fetch(&dispatcher, Api::Helix, "users?login=foo"),
            Err(404)
        );
    }
}
