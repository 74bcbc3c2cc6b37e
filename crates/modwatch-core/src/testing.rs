//! Scripted collaborators for dispatcher and pagination tests

use crate::clock::Clock;
use crate::transport::{ApiRequest, Completion, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Everything the scripted transport observed: request URLs with their
/// issue times, and completion times, both in clock seconds and in the
/// order they happened.
pub(crate) struct TransportLog {
    pub issues: Mutex<Vec<(String, f64)>>,
    pub completions: Mutex<Vec<f64>>,
}

/// A transport that answers from a prearranged script. Each send consumes
/// the next scripted response and delivers it from a spawned thread after
/// `delay`, so completions arrive off the worker thread just as they do in
/// production. An exhausted script answers 599 to make the test fail loudly
/// rather than hang.
pub(crate) struct ScriptedTransport {
    clock: Arc<dyn Clock>,
    delay: Duration,
    responses: Mutex<VecDeque<(u16, String)>>,
    log: Arc<TransportLog>,
}

impl ScriptedTransport {
    pub fn new(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            responses: Mutex::new(VecDeque::new()),
            log: Arc::new(TransportLog {
                issues: Mutex::new(Vec::new()),
                completions: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn respond_with(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn log(&self) -> Arc<TransportLog> {
        Arc::clone(&self.log)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest, done: Completion) {
        self.log
            .issues
            .lock()
            .unwrap()
            .push((request.url.clone(), self.clock.now()));
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((599, String::new()));
        let clock = Arc::clone(&self.clock);
        let log = Arc::clone(&self.log);
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            log.completions.lock().unwrap().push(clock.now());
            done(status, body.into_bytes());
        });
    }
}
