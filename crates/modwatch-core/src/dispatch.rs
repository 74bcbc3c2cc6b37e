//! Rate-limited, single-worker API call dispatcher
//!
//! All remote traffic funnels through the [`Dispatcher`]. Callers enqueue
//! calls from any thread with [`Dispatcher::submit`]; a single dedicated
//! worker thread pops them in FIFO order and issues at most one request at a
//! time, with a minimum cooldown between the completion of one call and the
//! dispatch of the next. Completions arrive on a transport thread and are
//! bridged back to the caller's continuations with the dispatcher's
//! bookkeeping (in-flight flag, cooldown stamp, transaction table) already
//! settled under the lock.
//!
//! The completion delegate holds a weak back-reference: a dispatcher torn
//! down mid-flight is neither resurrected nor touched by a late completion.

use crate::clock::Clock;
use crate::oneshot::OneShot;
use crate::transport::{ApiRequest, Completion, Method, Transport};
use log::{debug, warn};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

/// Minimum gap, in clock seconds, between the completion of one API call
/// and the dispatch of the next.
pub const API_CALL_COOLDOWN: f64 = 1.0;

/// The API surface a call targets. Each variant maps to a fixed base URL
/// and header set; see [`build_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    /// Legacy v5 API.
    Kraken,
    /// Current API.
    Helix,
    /// Plain GET of a caller-supplied URL (scheme added, nothing else).
    RawGet,
    /// Plain POST of a caller-supplied URL (scheme added, nothing else).
    RawPost,
    /// OAuth token service.
    OAuth2,
}

/// Settings the dispatcher needs to build requests and pace itself.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub oauth_token: Option<String>,
    /// Cooldown between calls, in clock seconds.
    pub cooldown: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            oauth_token: None,
            cooldown: API_CALL_COOLDOWN,
        }
    }
}

type OnSuccess = Box<dyn FnOnce(Value) + Send + 'static>;
type OnFailure = Box<dyn FnOnce(u16) + Send + 'static>;

/// A call waiting in the queue. Owned exclusively by the queue until the
/// worker pops it.
struct QueuedCall {
    api: Api,
    resource: String,
    on_success: OnSuccess,
    on_failure: OnFailure,
}

/// One in-flight HTTP exchange. Removed from the table the moment its
/// completion delegate runs, success or not.
struct Transaction {
    #[allow(dead_code)]
    request: ApiRequest,
}

struct State {
    queue: VecDeque<QueuedCall>,
    in_flight: bool,
    /// Clock time before which nothing may be dispatched; 0 means no
    /// cooldown is pending.
    next_eligible: f64,
    stopping: bool,
    /// Never reused; the first transaction is number 1.
    next_transaction_id: u64,
    transactions: HashMap<u64, Transaction>,
    worker: Option<JoinHandle<()>>,
    worker_thread: Option<ThreadId>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            in_flight: false,
            next_eligible: 0.0,
            stopping: false,
            next_transaction_id: 1,
            transactions: HashMap::new(),
            worker: None,
            worker_thread: None,
        }
    }
}

/// Collaborators handed to the worker at start.
struct Deps {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    config: ClientConfig,
}

struct Inner {
    state: Mutex<State>,
    wake: Condvar,
    weak_self: Weak<Inner>,
}

pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let inner = Arc::new_cyclic(|weak| Inner {
            state: Mutex::new(State::default()),
            wake: Condvar::new(),
            weak_self: weak.clone(),
        });
        Self { inner }
    }

    /// Starts the worker thread. Idempotent: a second call while the worker
    /// is running does nothing.
    pub fn start(
        &self,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) {
        let mut state = self.inner.state.lock().unwrap();
        if state.worker.is_some() {
            return;
        }
        state.stopping = false;
        let inner = Arc::clone(&self.inner);
        let deps = Deps {
            transport,
            clock,
            config,
        };
        let handle = thread::spawn(move || Inner::worker(inner, deps));
        state.worker_thread = Some(handle.thread().id());
        state.worker = Some(handle);
    }

    /// Signals the worker to stop, wakes it, and waits for it to exit.
    /// Idempotent. When called from the worker's own execution context
    /// (for example from a continuation it invoked) the thread is detached
    /// instead of joined, to avoid self-deadlock.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock().unwrap();
        let handle = match state.worker.take() {
            Some(handle) => handle,
            None => return,
        };
        state.stopping = true;
        let worker_thread = state.worker_thread.take();
        self.inner.wake.notify_one();
        if worker_thread == Some(thread::current().id()) {
            // Joining our own thread would deadlock; let it run out.
            drop(handle);
        } else {
            drop(state);
            let _ = handle.join();
        }
    }

    /// Enqueues a call. Returns immediately; safe to call from any thread.
    /// Exactly one of `on_success` / `on_failure` eventually runs for every
    /// call the worker pops; calls still queued at teardown are dropped.
    pub fn submit<S, F>(&self, api: Api, resource: impl Into<String>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(u16) + Send + 'static,
    {
        let mut state = self.inner.state.lock().unwrap();
        state.queue.push_back(QueuedCall {
            api,
            resource: resource.into(),
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        });
        self.inner.wake.notify_one();
    }

    /// Resolves a login name to its numeric user ID, blocking the calling
    /// thread until the lookup completes. `None` if the lookup fails or the
    /// remote returns something that is not an integer ID.
    pub fn user_id_by_login(&self, login: &str) -> Option<u64> {
        let signal = Arc::new(OneShot::<Option<u64>>::new());
        let resolved = Arc::clone(&signal);
        let failed = Arc::clone(&signal);
        let name = login.to_string();
        self.submit(
            Api::Kraken,
            format!("users?login={}", login),
            move |response| {
                let id = response["users"][0]["_id"]
                    .as_str()
                    .and_then(|raw| raw.parse::<u64>().ok());
                if id.is_none() {
                    warn!("API returned invalid ID for user '{}'", name);
                }
                resolved.resolve(id);
            },
            move |_status| {
                failed.resolve(None);
            },
        );
        signal.wait()
    }

    #[cfg(test)]
    pub(crate) fn open_transactions(&self) -> usize {
        self.inner.state.lock().unwrap().transactions.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    /// Worker loop: a cooperative state machine over Idle (queue empty, no
    /// cooldown), Cooldown (sleeping out the gap), and Dispatch-eligible.
    /// A new submission never shortens a cooldown wait; only the deadline
    /// or shutdown ends it.
    fn worker(inner: Arc<Inner>, deps: Deps) {
        debug!("dispatch worker starting");
        let mut state = inner.state.lock().unwrap();
        while !state.stopping {
            let now = deps.clock.now();
            if !state.in_flight && now >= state.next_eligible {
                if let Some(call) = state.queue.pop_front() {
                    state = inner.dispatch_call(state, &deps, call);
                    // Re-evaluate immediately: a rejected call must not
                    // stall the calls queued behind it.
                    continue;
                }
                state.next_eligible = 0.0;
            }
            if !state.in_flight && state.next_eligible != 0.0 {
                let now = deps.clock.now();
                if state.next_eligible > now {
                    let timeout = Duration::from_secs_f64(state.next_eligible - now);
                    let (guard, _) = inner.wake.wait_timeout(state, timeout).unwrap();
                    state = guard;
                }
            } else {
                state = inner.wake.wait(state).unwrap();
            }
        }
        debug!("dispatch worker stopping");
    }

    /// Issues one popped call. Runs on the worker thread with the lock held;
    /// a rejected call resolves its failure continuation outside the lock
    /// without marking in-flight or arming a cooldown.
    fn dispatch_call<'a>(
        &'a self,
        mut state: MutexGuard<'a, State>,
        deps: &Deps,
        call: QueuedCall,
    ) -> MutexGuard<'a, State> {
        let request = match build_request(call.api, &call.resource, &deps.config) {
            Ok(request) => request,
            Err(reason) => {
                warn!("rejecting call for '{}': {}", call.resource, reason);
                drop(state);
                (call.on_failure)(400);
                return self.state.lock().unwrap();
            }
        };
        state.in_flight = true;
        let id = state.next_transaction_id;
        state.next_transaction_id += 1;
        debug!("api call {} request: {}", id, request.url);
        state.transactions.insert(
            id,
            Transaction {
                request: request.clone(),
            },
        );
        let weak = self.weak_self.clone();
        let clock = Arc::clone(&deps.clock);
        let cooldown = deps.config.cooldown;
        let url = request.url.clone();
        let on_success = call.on_success;
        let on_failure = call.on_failure;
        let done: Completion = Box::new(move |status, body| {
            // A dispatcher torn down mid-flight must not be revived by a
            // late completion.
            let inner = match weak.upgrade() {
                Some(inner) => inner,
                None => return,
            };
            let mut state = inner.state.lock().unwrap();
            state.in_flight = false;
            state.next_eligible = clock.now() + cooldown;
            inner.wake.notify_one();
            if state.transactions.remove(&id).is_none() {
                return;
            }
            // Continuations run arbitrary caller code; never under the lock.
            drop(state);
            if status == 200 {
                let value = match serde_json::from_slice::<Value>(&body) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!("api call {} returned an undecodable body: {}", id, err);
                        Value::Null
                    }
                };
                debug!("api call {} success", id);
                on_success(value);
            } else {
                warn!("api call {} ({}) failure: {}", id, url, status);
                on_failure(status);
            }
        });
        deps.transport.send(request, done);
        state
    }
}

/// The closed API-variant table: base URL prefix and required headers for
/// each variant. A resource that cannot form a valid request URL is the one
/// synchronous rejection path (status 400, no cooldown consumed). Resources
/// must already be URL-encoded; whitespace and control characters are
/// rejected rather than silently re-encoded.
fn build_request(api: Api, resource: &str, config: &ClientConfig) -> Result<ApiRequest, String> {
    if resource
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(format!("malformed resource '{}'", resource));
    }
    let mut headers = Vec::new();
    let (method, url) = match api {
        Api::Kraken => {
            headers.push(("Accept", "application/vnd.twitchtv.v5+json".to_string()));
            headers.push(("Client-ID", config.client_id.clone()));
            (
                Method::Get,
                format!("https://api.twitch.tv/kraken/{}", resource),
            )
        }
        Api::Helix => {
            headers.push(("Client-ID", config.client_id.clone()));
            if let Some(token) = &config.oauth_token {
                headers.push(("Authorization", format!("Bearer {}", token)));
            }
            (
                Method::Get,
                format!("https://api.twitch.tv/helix/{}", resource),
            )
        }
        Api::OAuth2 => {
            if let Some(token) = &config.oauth_token {
                headers.push(("Authorization", format!("OAuth {}", token)));
            }
            (
                Method::Get,
                format!("https://id.twitch.tv/oauth2/{}", resource),
            )
        }
        Api::RawGet => (Method::Get, format!("https://{}", resource)),
        Api::RawPost => (Method::Post, format!("https://{}", resource)),
    };
    if reqwest::Url::parse(&url).is_err() {
        return Err(format!("invalid request URL '{}'", url));
    }
    Ok(ApiRequest {
        method,
        url,
        headers,
    })
}
